//! CLI command definitions and handlers

use clap::Subcommand;
use futures::{Stream, StreamExt};
use indicatif::ProgressBar;
use std::io::Write;
use std::path::PathBuf;

use crate::core::errors::BatchError;
use crate::core::models::TextFormat;

/// Commands for Yandex Translator
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Translate text, one item per input line
    Translate {
        /// Input file (reads stdin if not specified)
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Output file (writes stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Source language (auto-detect if not specified)
        #[arg(long)]
        from: Option<String>,

        /// Target language
        #[arg(short, long)]
        to: String,

        /// Text format: plain or html
        #[arg(long, default_value_t = TextFormat::Plain)]
        format: TextFormat,

        /// Service translation options
        #[arg(long)]
        options: Option<String>,

        /// Maximum characters per request (defaults to MAX_BATCH_SIZE or 100000)
        #[arg(long, value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..))]
        max_batch_size: Option<usize>,
    },

    /// Detect the language of a text
    Detect {
        /// Text to inspect
        text: String,

        /// Comma-separated list of likely languages
        #[arg(long)]
        hint: Option<String>,
    },

    /// List supported translation directions
    Langs {
        /// Language for the language names (default: configured UI language)
        #[arg(long)]
        ui: Option<String>,
    },
}

/// Split input into text items, one per line
pub fn read_items(input: &str) -> Vec<String> {
    input.lines().map(|line| line.to_string()).collect()
}

/// Counts of written items for one translate run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TranslateSummary {
    /// Items written with their translation
    pub translated: usize,
    /// Items written as empty lines because their batch failed
    pub failed: usize,
}

impl TranslateSummary {
    /// Fail when any item could not be translated
    pub fn ensure_complete(self) -> anyhow::Result<Self> {
        if self.failed > 0 {
            anyhow::bail!(
                "{} of {} items failed to translate",
                self.failed,
                self.translated + self.failed
            );
        }
        Ok(self)
    }
}

/// Write one line per stream item. Failed items become empty lines and each
/// failed batch is reported once on stderr.
pub async fn write_results<S, W>(
    stream: S,
    out: &mut W,
    pb: &ProgressBar,
) -> anyhow::Result<TranslateSummary>
where
    S: Stream<Item = Result<String, BatchError>>,
    W: Write + ?Sized,
{
    let mut summary = TranslateSummary {
        translated: 0,
        failed: 0,
    };
    let mut last_failed_batch = None;

    futures::pin_mut!(stream);
    while let Some(item) = stream.next().await {
        match item {
            Ok(text) => {
                summary.translated += 1;
                writeln!(out, "{}", text)?;
            }
            Err(e) => {
                summary.failed += 1;
                if last_failed_batch != Some(e.batch) {
                    last_failed_batch = Some(e.batch);
                    pb.set_message(format!("Batch {} failed", e.batch));
                    eprintln!("Error: {}", e);
                }
                writeln!(out)?;
            }
        }
        pb.inc(1);
    }

    out.flush()?;
    Ok(summary)
}

/// Handle translate command
pub async fn handle_translate(
    file: Option<PathBuf>,
    output: Option<PathBuf>,
    from: Option<String>,
    to: String,
    format: TextFormat,
    options: Option<String>,
    max_batch_size: Option<usize>,
) -> anyhow::Result<()> {
    use crate::core::client::YandexTranslator;
    use crate::core::models::TranslateRequest;
    use indicatif::ProgressStyle;
    use std::io::BufWriter;
    use std::time::Instant;
    use tracing::info;

    let start_time = Instant::now();

    let input = match &file {
        Some(path) => std::fs::read_to_string(path)?,
        None => std::io::read_to_string(std::io::stdin())?,
    };
    let texts = read_items(&input);

    if texts.is_empty() {
        anyhow::bail!("No input text");
    }

    let translator = YandexTranslator::from_env()?;

    let mut request = TranslateRequest::new(to).with_format(format);
    if let Some(from) = from {
        request = request.with_source_lang(from);
    }
    if let Some(options) = options {
        request = request.with_options(options);
    }

    info!("Starting translation");
    info!("Items: {}", texts.len());
    info!("Direction: {}", request.lang_param());

    let (mut out, pb): (Box<dyn Write>, ProgressBar) = match &output {
        Some(path) => {
            let pb = ProgressBar::new(texts.len() as u64);
            pb.set_style(ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")?
                .progress_chars("=>-"));
            (Box::new(BufWriter::new(std::fs::File::create(path)?)), pb)
        }
        None => (Box::new(std::io::stdout().lock()), ProgressBar::hidden()),
    };

    let stream = translator.translate_iter(texts, &request, max_batch_size);
    let summary = write_results(stream, &mut *out, &pb).await?;
    pb.finish_with_message("Completed");

    let duration = start_time.elapsed();
    info!(
        "Completed: {} translated, {} failed in {:?}",
        summary.translated, summary.failed, duration
    );

    if let Some(path) = &output {
        println!("\n✅ Translation completed!");
        println!("   Output: {}", path.display());
        println!("   Translated: {}", summary.translated);
        println!("   Failed: {}", summary.failed);
        println!("   Time: {:?}", duration);
    }

    summary.ensure_complete()?;

    Ok(())
}

/// Handle detect command
pub async fn handle_detect(text: String, hint: Option<String>) -> anyhow::Result<()> {
    use crate::core::client::YandexTranslator;

    let translator = YandexTranslator::from_env()?;
    let response = translator
        .detect_language(&text, hint.as_deref(), None)
        .await?;

    println!("{}", serde_json::to_string_pretty(&response)?);

    Ok(())
}

/// Handle langs command
pub async fn handle_langs(ui: Option<String>) -> anyhow::Result<()> {
    use crate::core::client::YandexTranslator;

    let translator = YandexTranslator::from_env()?;
    let response = translator.list_languages(ui.as_deref(), None).await?;

    println!("{}", serde_json::to_string_pretty(&response)?);

    Ok(())
}
