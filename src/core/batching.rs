//! Greedy batching of texts and the lazy translated stream built on it

use async_trait::async_trait;
use futures::stream::{self, Stream, StreamExt};
use std::collections::VecDeque;
use std::iter::Fuse;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::core::errors::{BatchError, Result, TranslationError};
use crate::core::models::TranslateRequest;

/// Something that can translate one batch of texts in a single call.
///
/// On success the returned list is aligned with `texts`.
#[async_trait]
pub trait BatchTranslate: Send + Sync {
    /// Translate `texts` with the direction and format in `request`
    async fn translate_batch(
        &self,
        texts: &[String],
        request: &TranslateRequest,
    ) -> Result<Vec<String>>;
}

/// Size of one text item, in characters
pub fn text_len(text: &str) -> usize {
    text.chars().count()
}

/// Splits a sequence of texts into contiguous batches whose total length
/// stays within `max_batch_size`.
///
/// Items are never reordered or split. An item longer than the ceiling is
/// emitted as a batch of its own. Input is pulled only as far as needed to
/// close the current batch.
pub struct Batches<I: Iterator<Item = String>> {
    texts: Fuse<I>,
    max_batch_size: usize,
    /// Item that overflowed the previous batch and opens the next one
    carry: Option<(String, usize)>,
}

impl<I: Iterator<Item = String>> Batches<I> {
    /// Batch `texts` under a ceiling of `max_batch_size` characters
    pub fn new<T>(texts: T, max_batch_size: usize) -> Self
    where
        T: IntoIterator<IntoIter = I>,
    {
        Self {
            texts: texts.into_iter().fuse(),
            max_batch_size,
            carry: None,
        }
    }
}

impl<I: Iterator<Item = String>> Iterator for Batches<I> {
    type Item = Vec<String>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut batch = Vec::new();
        let mut total = 0;

        if let Some((text, len)) = self.carry.take() {
            batch.push(text);
            total = len;
        }

        for text in self.texts.by_ref() {
            let len = text_len(&text);
            if !batch.is_empty() && total + len > self.max_batch_size {
                self.carry = Some((text, len));
                break;
            }
            total += len;
            batch.push(text);
        }

        if batch.is_empty() {
            None
        } else {
            Some(batch)
        }
    }
}

/// Partition `texts` eagerly into batches
pub fn partition<T>(texts: T, max_batch_size: usize) -> Vec<Vec<String>>
where
    T: IntoIterator<Item = String>,
{
    Batches::new(texts, max_batch_size).collect()
}

struct StreamState<I: Iterator<Item = String>> {
    batches: Batches<I>,
    buffered: VecDeque<std::result::Result<String, BatchError>>,
    next_batch: usize,
}

/// Translate `texts` batch by batch, yielding one result per input item in
/// input order.
///
/// A batch is submitted only once the consumer has drained everything
/// produced by the previous one, so dropping the stream early stops all
/// further requests. When a batch fails, each of its items is yielded as an
/// `Err` carrying the shared failure, and the next batch is still attempted.
/// Empty input produces no request.
pub fn translate_iter<'a, T, I>(
    translator: &'a T,
    texts: I,
    request: &'a TranslateRequest,
    max_batch_size: usize,
) -> impl Stream<Item = std::result::Result<String, BatchError>> + 'a
where
    T: BatchTranslate + ?Sized,
    I: IntoIterator<Item = String> + 'a,
    I::IntoIter: Send + 'a,
{
    let state = StreamState {
        batches: Batches::new(texts, max_batch_size),
        buffered: VecDeque::new(),
        next_batch: 0,
    };

    stream::unfold(state, move |mut state| async move {
        loop {
            if let Some(item) = state.buffered.pop_front() {
                return Some((item, state));
            }

            let batch = state.batches.next()?;
            let index = state.next_batch;
            state.next_batch += 1;

            info!(
                "Submitting batch {} ({} items, {} chars)",
                index,
                batch.len(),
                batch.iter().map(|t| text_len(t)).sum::<usize>()
            );

            let outcome = match translator.translate_batch(&batch, request).await {
                Ok(translated) if translated.len() == batch.len() => Ok(translated),
                Ok(translated) => Err(TranslationError::InvalidResponseError {
                    message: format!(
                        "expected {} translations, got {}",
                        batch.len(),
                        translated.len()
                    ),
                }),
                Err(e) => Err(e),
            };

            match outcome {
                Ok(translated) => {
                    debug!("Batch {} translated", index);
                    state.buffered.extend(translated.into_iter().map(Ok));
                }
                Err(e) => {
                    warn!("Batch {} failed: {}", index, e);
                    let failure = BatchError {
                        batch: index,
                        size: batch.len(),
                        error: Arc::new(e),
                    };
                    state
                        .buffered
                        .extend(std::iter::repeat(Err(failure)).take(batch.len()));
                }
            }
        }
    })
}

/// Run [`translate_iter`] to completion
pub async fn translate_all<'a, T, I>(
    translator: &'a T,
    texts: I,
    request: &'a TranslateRequest,
    max_batch_size: usize,
) -> Vec<std::result::Result<String, BatchError>>
where
    T: BatchTranslate + ?Sized,
    I: IntoIterator<Item = String> + 'a,
    I::IntoIter: Send + 'a,
{
    translate_iter(translator, texts, request, max_batch_size)
        .collect()
        .await
}
