//! Client tests against a local fake of the translation service

use assert_json_diff::assert_json_include;
use axum::{
    extract::{Form, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use futures::StreamExt;
use serde_json::json;
use std::sync::{Arc, Mutex};

use yandex_translator::{
    ErrorKind, TextFormat, TranslateRequest, TranslationError, TranslatorConfig, YandexTranslator,
};

type Params = Vec<(String, String)>;

/// Every request the fake service received: (method name, parameters)
#[derive(Clone, Default)]
struct Recorded(Arc<Mutex<Vec<(String, Params)>>>);

impl Recorded {
    fn push(&self, method: &str, params: Params) {
        self.0.lock().unwrap().push((method.to_string(), params));
    }

    fn all(&self) -> Vec<(String, Params)> {
        self.0.lock().unwrap().clone()
    }

    fn count(&self, method: &str) -> usize {
        self.all().iter().filter(|(m, _)| m == method).count()
    }
}

fn param<'a>(params: &'a Params, name: &str) -> Option<&'a str> {
    params
        .iter()
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.as_str())
}

/// Maps the special test keys onto the service's documented failures
fn key_failure(params: &Params) -> Option<Response> {
    let (code, message) = match param(params, "key") {
        Some("bad") => (401, "API key is invalid"),
        Some("blocked") => (402, "API key is blocked"),
        Some("exhausted") => (404, "Exceeded the daily limit on the amount of translated text"),
        _ => return None,
    };
    let status = StatusCode::from_u16(code).unwrap();
    Some((status, Json(json!({ "code": code, "message": message }))).into_response())
}

async fn translate(State(recorded): State<Recorded>, Form(params): Form<Params>) -> Response {
    recorded.push("translate", params.clone());

    if let Some(failure) = key_failure(&params) {
        return failure;
    }

    let texts: Vec<&str> = params
        .iter()
        .filter(|(k, _)| k == "text")
        .map(|(_, v)| v.as_str())
        .collect();

    if texts.contains(&"boom") {
        return (StatusCode::INTERNAL_SERVER_ERROR, "oops").into_response();
    }

    let translated: Vec<String> = texts.iter().map(|t| t.chars().rev().collect()).collect();
    Json(json!({
        "code": 200,
        "lang": param(&params, "lang"),
        "text": translated,
    }))
    .into_response()
}

async fn detect(State(recorded): State<Recorded>, Query(params): Query<Params>) -> Response {
    recorded.push("detect", params.clone());

    if let Some(failure) = key_failure(&params) {
        return failure;
    }

    let lang = param(&params, "hint")
        .and_then(|h| h.split(',').next())
        .unwrap_or("en");
    Json(json!({ "code": 200, "lang": lang })).into_response()
}

async fn get_langs(State(recorded): State<Recorded>, Query(params): Query<Params>) -> Response {
    recorded.push("getLangs", params.clone());

    if let Some(failure) = key_failure(&params) {
        return failure;
    }

    let names = match param(&params, "ui") {
        Some("ru") => json!({ "en": "английский", "ru": "русский" }),
        _ => json!({ "en": "English", "ru": "Russian" }),
    };
    Json(json!({ "dirs": ["en-ru", "ru-en"], "langs": names })).into_response()
}

/// Start the fake service and return a translator pointed at it
async fn start(key: &str) -> (YandexTranslator, Recorded) {
    let recorded = Recorded::default();
    let app = Router::new()
        .route("/translate", post(translate))
        .route("/detect", get(detect))
        .route("/getLangs", get(get_langs))
        .with_state(recorded.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let config = TranslatorConfig {
        api_endpoint: format!("http://{}", addr),
        ..TranslatorConfig::with_key(key)
    };
    (YandexTranslator::new(config).unwrap(), recorded)
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[tokio::test]
async fn test_translate_sends_one_text_field_per_item() {
    let (translator, recorded) = start("test_key").await;
    let request = TranslateRequest::new("ru").with_source_lang("en");

    let result = translator
        .translate(&strings(&["hello", "world"]), &request)
        .await
        .unwrap();
    assert_eq!(result, vec!["olleh", "dlrow"]);

    let calls = recorded.all();
    assert_eq!(calls.len(), 1);
    let (method, params) = &calls[0];
    assert_eq!(method, "translate");
    assert_eq!(
        params,
        &vec![
            ("key".to_string(), "test_key".to_string()),
            ("text".to_string(), "hello".to_string()),
            ("text".to_string(), "world".to_string()),
            ("lang".to_string(), "en-ru".to_string()),
            ("format".to_string(), "plain".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_translate_passes_format_and_options() {
    let (translator, recorded) = start("test_key").await;
    let request = TranslateRequest::new("de")
        .with_format(TextFormat::Html)
        .with_options("1");

    translator
        .translate(&strings(&["<b>hi</b>"]), &request)
        .await
        .unwrap();

    let (_, params) = &recorded.all()[0];
    assert_eq!(param(params, "lang"), Some("de"));
    assert_eq!(param(params, "format"), Some("html"));
    assert_eq!(param(params, "options"), Some("1"));
    assert_eq!(param(params, "callback"), None);
}

#[tokio::test]
async fn test_translate_maps_service_errors() {
    let request = TranslateRequest::new("ru");
    let texts = strings(&["a"]);

    for (key, kind, status) in [
        ("bad", ErrorKind::InvalidKey, 401),
        ("blocked", ErrorKind::BlockedKey, 402),
        ("exhausted", ErrorKind::DailyLimitExceeded, 404),
    ] {
        let (translator, _) = start(key).await;
        let err = translator.translate(&texts, &request).await.unwrap_err();
        assert_eq!(err.kind(), kind);
        assert_eq!(err.status(), Some(status));
    }

    let (translator, _) = start("blocked").await;
    let err = translator.translate(&texts, &request).await.unwrap_err();
    assert!(matches!(
        err,
        TranslationError::BlockedKey { ref message } if message == "API key is blocked"
    ));
}

#[tokio::test]
async fn test_non_json_error_uses_reason_phrase() {
    let (translator, _) = start("test_key").await;
    let err = translator
        .translate(&strings(&["boom"]), &TranslateRequest::new("ru"))
        .await
        .unwrap_err();

    match err {
        TranslationError::UnexpectedStatus { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "Internal Server Error");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_translate_iter_batches_requests_in_order() {
    let (translator, recorded) = start("test_key").await;
    let request = TranslateRequest::new("ru").with_source_lang("en");
    let texts = strings(&["abc", "de", "fghij", "k", "lmnopqrstu", "vw"]);

    let results: Vec<String> = translator
        .translate_iter(texts, &request, Some(6))
        .map(|r| r.unwrap())
        .collect()
        .await;

    assert_eq!(results, vec!["cba", "ed", "jihgf", "k", "utsrqponml", "wv"]);

    let batches: Vec<Vec<String>> = recorded
        .all()
        .into_iter()
        .map(|(_, params)| {
            params
                .into_iter()
                .filter(|(k, _)| k == "text")
                .map(|(_, v)| v)
                .collect()
        })
        .collect();
    assert_eq!(
        batches,
        vec![
            strings(&["abc", "de"]),
            strings(&["fghij", "k"]),
            strings(&["lmnopqrstu"]),
            strings(&["vw"]),
        ]
    );
}

#[tokio::test]
async fn test_translate_iter_uses_configured_ceiling() {
    let (translator, recorded) = start("test_key").await;
    let request = TranslateRequest::new("ru");
    let texts: Vec<String> = (0..50).map(|i| format!("item {}", i)).collect();

    let results: Vec<_> = translator
        .translate_iter(texts, &request, None)
        .collect()
        .await;

    assert_eq!(results.len(), 50);
    assert!(results.iter().all(|r| r.is_ok()));
    assert_eq!(recorded.count("translate"), 1);
}

#[tokio::test]
async fn test_failed_batch_does_not_stop_later_batches() {
    let (translator, recorded) = start("test_key").await;
    let request = TranslateRequest::new("ru");
    let texts = strings(&["one", "two", "boom", "six"]);

    let results: Vec<_> = translator
        .translate_iter(texts, &request, Some(7))
        .collect()
        .await;

    assert_eq!(results.len(), 4);
    assert_eq!(results[0].as_ref().unwrap(), "eno");
    assert_eq!(results[1].as_ref().unwrap(), "owt");

    let failure = results[2].as_ref().unwrap_err();
    assert_eq!(failure.batch, 1);
    assert_eq!(failure.size, 2);
    assert_eq!(failure.kind(), ErrorKind::UnexpectedStatus);
    assert_eq!(failure.error.status(), Some(500));

    // "six" was batched with "boom"
    assert_eq!(results[3].as_ref().unwrap_err().batch, 1);
    assert_eq!(recorded.count("translate"), 2);
}

#[tokio::test]
async fn test_blocked_key_marks_every_item_of_batch() {
    let (translator, _) = start("blocked").await;
    let request = TranslateRequest::new("ru");

    let results: Vec<_> = translator
        .translate_iter(strings(&["a", "b", "c"]), &request, None)
        .collect()
        .await;

    assert_eq!(results.len(), 3);
    for result in &results {
        let err = result.as_ref().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BlockedKey);
        assert_eq!(err.size, 3);
    }
}

#[tokio::test]
async fn test_translate_iter_stops_when_consumer_stops() {
    let (translator, recorded) = start("test_key").await;
    let request = TranslateRequest::new("ru");
    let texts = strings(&["aaaa", "bbbb", "cccc", "dddd"]);

    let first: Vec<_> = translator
        .translate_iter(texts, &request, Some(4))
        .take(1)
        .collect()
        .await;

    assert_eq!(first.len(), 1);
    assert_eq!(first[0].as_ref().unwrap(), "aaaa");
    assert_eq!(recorded.count("translate"), 1);
}

#[tokio::test]
async fn test_empty_input_sends_nothing() {
    let (translator, recorded) = start("test_key").await;
    let request = TranslateRequest::new("ru");

    let results: Vec<_> = translator
        .translate_iter(Vec::new(), &request, None)
        .collect()
        .await;

    assert!(results.is_empty());
    assert!(recorded.all().is_empty());
}

#[tokio::test]
async fn test_detect_language() {
    let (translator, recorded) = start("test_key").await;

    let response = translator
        .detect_language("Guten Tag", Some("de,en"), None)
        .await
        .unwrap();
    assert_eq!(response["lang"], "de");

    let response = translator
        .detect_language("Hello", None, None)
        .await
        .unwrap();
    assert_eq!(response["lang"], "en");

    let calls = recorded.all();
    assert_eq!(param(&calls[0].1, "text"), Some("Guten Tag"));
    assert_eq!(param(&calls[0].1, "hint"), Some("de,en"));
    assert_eq!(param(&calls[1].1, "hint"), None);
}

#[tokio::test]
async fn test_list_languages() {
    let (translator, recorded) = start("test_key").await;

    let default_ui = translator.list_languages(None, None).await.unwrap();
    assert_json_include!(
        actual: default_ui,
        expected: json!({ "dirs": ["en-ru", "ru-en"], "langs": { "en": "English" } })
    );

    let russian_ui = translator.list_languages(Some("ru"), None).await.unwrap();
    assert_json_include!(
        actual: russian_ui,
        expected: json!({ "langs": { "ru": "русский" } })
    );

    let calls = recorded.all();
    assert_eq!(param(&calls[0].1, "ui"), Some("en"));
    assert_eq!(param(&calls[0].1, "key"), Some("test_key"));
    assert_eq!(param(&calls[1].1, "ui"), Some("ru"));
}

#[tokio::test]
async fn test_list_languages_invalid_key() {
    let (translator, _) = start("bad").await;

    let err = translator.list_languages(None, None).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidKey);
}
