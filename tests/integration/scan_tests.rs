//! Integration tests for the scan pipeline
//!
//! These tests use wiremock to stand in for the audited site, the
//! text-generation service and the email service.

use site_audit::audit::{FetchError, ScanError, ScanRequest, Scanner, ScoringStrategy};
use site_audit::config::{EmailConfig, SummarizerConfig};
use site_audit::notify::ResendMailer;
use site_audit::storage::{open_storage, ReportStore, SqliteStorage};
use site_audit::summary::{
    fallback_summary, GenerationRequest, Lang, OpenAiClient, Summarizer, Summary, TextGenerator,
};
use site_audit::Signals;
use std::sync::Arc;
use std::time::{Duration, Instant};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CAFE_PAGE: &str = r#"<html>
<head>
  <title>Kahvila Aurinko</title>
  <meta name="description" content="Paras kahvi Tampereella">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <link rel="icon" href="/favicon.ico">
</head>
<body>
  <h1>Tervetuloa</h1>
  <p>Käytämme evästeitä sivuston toiminnan varmistamiseksi.</p>
  <a href="/tietosuoja">Tietosuojaseloste</a>
  <img src="/a.jpg" width="100" height="100">
  <script src="/app.js"></script>
</body>
</html>"#;

async fn page_server(body: &str) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html"),
        )
        .mount(&server)
        .await;
    server
}

fn memory_store() -> Arc<SqliteStorage> {
    Arc::new(SqliteStorage::new_in_memory().expect("Failed to create in-memory store"))
}

fn chat_response(content: &str) -> serde_json::Value {
    serde_json::json!({
        "id": "chatcmpl-1",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content }
        }]
    })
}

fn openai_client(server: &MockServer) -> OpenAiClient {
    let config = SummarizerConfig {
        api_base: format!("{}/v1", server.uri()),
        ..SummarizerConfig::default()
    };
    OpenAiClient::new(&config, "test-key".to_string()).expect("Failed to build client")
}

#[tokio::test]
async fn test_full_scan_is_stored() {
    let site = page_server(CAFE_PAGE).await;
    let store = memory_store();
    let scanner = Scanner::new(store.clone()).unwrap();

    let outcome = scanner
        .scan(ScanRequest::new(site.uri()).with_lang(Lang::En))
        .await
        .expect("Scan should succeed");

    // meta 20 + mobile 20 + no https 0 + speed 20 + gdpr 20
    assert_eq!(outcome.score, 80);
    assert_eq!(
        outcome.summary.good,
        vec!["Viewport set for mobile", "Favicon present"]
    );
    assert!(outcome.summary.issues.is_empty());
    assert_eq!(outcome.summary.steps.len(), 3);

    let record = store
        .find_by_id(&outcome.id)
        .unwrap()
        .expect("Record should be stored");
    assert_eq!(record.url, format!("{}/", site.uri()));
    assert_eq!(record.score, outcome.score);
    assert_eq!(record.summary, outcome.summary);
    assert_eq!(record.lang, Lang::En);
    assert_eq!(record.email, None);
    assert_eq!(record.signals.title.as_deref(), Some("Kahvila Aurinko"));
    assert!(record.signals.has_cookie_words);
    assert!(record.signals.privacy_policy_url_found);
    assert!(!record.signals.has_https);
    assert_eq!(record.signals.avg_img_bytes_approx, Some(2500));
}

#[tokio::test]
async fn test_flags_strategy() {
    let site = page_server(CAFE_PAGE).await;
    let scanner = Scanner::new(memory_store())
        .unwrap()
        .with_strategy(ScoringStrategy::Flags);

    let outcome = scanner.scan(ScanRequest::new(site.uri())).await.unwrap();

    // viewport, title + description, h1, favicon; no https
    assert_eq!(outcome.score, 80);
}

#[tokio::test]
async fn test_finnish_fallback_summary() {
    let site = page_server("<html><body></body></html>").await;
    let scanner = Scanner::new(memory_store()).unwrap();

    let outcome = scanner
        .scan(ScanRequest::new(site.uri()).with_lang(Lang::Fi))
        .await
        .unwrap();

    assert_eq!(
        outcome.summary,
        fallback_summary(Lang::Fi, &Signals::default())
    );
    assert!(outcome.summary.issues.contains(&"Puuttuva H1-otsikko".to_string()));
}

#[tokio::test]
async fn test_fetch_timeout_fails_promptly() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(CAFE_PAGE)
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let store = memory_store();
    let scanner = Scanner::new(store.clone())
        .unwrap()
        .with_fetch_timeout(Duration::from_millis(200));

    let started = Instant::now();
    let result = scanner.scan(ScanRequest::new(server.uri())).await;

    assert!(started.elapsed() < Duration::from_secs(3));
    match result {
        Err(ScanError::Fetch(e)) => assert!(e.is_timeout(), "expected timeout, got {}", e),
        other => panic!("expected fetch timeout, got {:?}", other),
    }
    assert!(store.list_recent(10).unwrap().is_empty());
}

#[tokio::test]
async fn test_http_error_status_fails_scan() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let scanner = Scanner::new(memory_store()).unwrap();
    let result = scanner.scan(ScanRequest::new(server.uri())).await;

    assert!(matches!(
        result,
        Err(ScanError::Fetch(FetchError::HttpStatus { status: 404, .. }))
    ));
}

#[tokio::test]
async fn test_redirects_are_followed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(ResponseTemplate::new(301).insert_header("location", "/new"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/new"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<h1>Moved</h1>"))
        .mount(&server)
        .await;

    let store = memory_store();
    let scanner = Scanner::new(store.clone()).unwrap();
    let outcome = scanner
        .scan(ScanRequest::new(format!("{}/old", server.uri())))
        .await
        .unwrap();

    let record = store.find_by_id(&outcome.id).unwrap().unwrap();
    assert_eq!(record.signals.h1.as_deref(), Some("Moved"));
}

#[tokio::test]
async fn test_openai_client_request_and_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer test-key"))
        .and(body_partial_json(serde_json::json!({
            "model": "gpt-4.1-mini",
            "response_format": { "type": "json_object" },
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_response(
            r#"{"good":["Fast"],"issues":["No HTTPS"],"steps":["a","b","c","d"]}"#,
        )))
        .expect(1)
        .mount(&server)
        .await;

    let summarizer =
        Summarizer::with_generator(Arc::new(openai_client(&server)), Duration::from_secs(5));
    let summary = summarizer
        .summarize("https://example.com/", Lang::En, &Signals::default())
        .await;

    assert_eq!(summary.good, vec!["Fast"]);
    assert_eq!(summary.issues, vec!["No HTTPS"]);
    assert_eq!(summary.steps, vec!["a", "b", "c"]);
}

#[tokio::test]
async fn test_openai_client_sends_system_role_and_payload() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_response("{}")))
        .mount(&server)
        .await;

    let client = openai_client(&server);
    let request = GenerationRequest::new("https://example.fi/", Lang::Fi, &Signals::default());
    client.generate(&request).await.unwrap();

    let received = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&received[0].body).unwrap();
    assert_eq!(body["messages"][0]["role"], "system");
    assert_eq!(body["messages"][1]["role"], "user");
    let user = body["messages"][1]["content"].as_str().unwrap();
    assert!(user.contains("\"lang\":\"fi\""));
    assert!(user.contains("\"url\":\"https://example.fi/\""));
}

#[tokio::test]
async fn test_malformed_generator_content_yields_empty_lists() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_response("this is not json")))
        .mount(&server)
        .await;

    let summarizer =
        Summarizer::with_generator(Arc::new(openai_client(&server)), Duration::from_secs(5));
    let summary = summarizer
        .summarize("https://example.com/", Lang::En, &Signals::default())
        .await;

    assert_eq!(summary, Summary::default());
}

#[tokio::test]
async fn test_generator_failure_falls_back() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(CAFE_PAGE))
        .mount(&server)
        .await;

    let summarizer =
        Summarizer::with_generator(Arc::new(openai_client(&server)), Duration::from_secs(5));
    let scanner = Scanner::new(memory_store())
        .unwrap()
        .with_summarizer(summarizer);

    let outcome = scanner
        .scan(ScanRequest::new(server.uri()).with_lang(Lang::Fi))
        .await
        .expect("Generator failure must not fail the scan");

    assert_eq!(outcome.summary.good, vec!["Mobiili-viewport löytyy", "Favicon asetettu"]);
}

#[tokio::test]
async fn test_empty_choices_falls_back() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"choices": []})))
        .mount(&server)
        .await;

    let signals = Signals {
        has_https: true,
        ..Signals::default()
    };
    let summarizer =
        Summarizer::with_generator(Arc::new(openai_client(&server)), Duration::from_secs(5));
    let summary = summarizer.summarize("https://example.com/", Lang::En, &signals).await;

    assert_eq!(summary, fallback_summary(Lang::En, &signals));
}

#[tokio::test]
async fn test_report_ready_email_is_sent() {
    let site = page_server(CAFE_PAGE).await;
    let mail = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/emails"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"id": "m1"})))
        .expect(1)
        .mount(&mail)
        .await;

    let mailer = ResendMailer::new(
        &EmailConfig {
            api_base: mail.uri(),
            ..EmailConfig::default()
        },
        "mail-key".to_string(),
    )
    .unwrap();
    let scanner = Scanner::new(memory_store())
        .unwrap()
        .with_notifier(Arc::new(mailer))
        .with_public_base_url("https://audit.example.fi");

    let outcome = scanner
        .scan(ScanRequest::new(site.uri()).with_email("owner@example.com"))
        .await
        .unwrap();

    let received = mail.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&received[0].body).unwrap();
    assert_eq!(body["to"][0], "owner@example.com");
    let html = body["html"].as_str().unwrap();
    assert!(html.contains(&format!("https://audit.example.fi/report/{}", outcome.id)));
}

#[tokio::test]
async fn test_email_failure_does_not_fail_scan() {
    let site = page_server(CAFE_PAGE).await;
    let mail = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mail)
        .await;

    let mailer = ResendMailer::new(
        &EmailConfig {
            api_base: mail.uri(),
            ..EmailConfig::default()
        },
        "mail-key".to_string(),
    )
    .unwrap();
    let store = memory_store();
    let scanner = Scanner::new(store.clone())
        .unwrap()
        .with_notifier(Arc::new(mailer));

    let outcome = scanner
        .scan(ScanRequest::new(site.uri()).with_email("owner@example.com"))
        .await
        .unwrap();

    let record = store.find_by_id(&outcome.id).unwrap().unwrap();
    assert_eq!(record.email.as_deref(), Some("owner@example.com"));
}

#[tokio::test]
async fn test_scan_persists_to_disk() {
    let site = page_server(CAFE_PAGE).await;
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("scans.db");

    let id = {
        let store = open_storage(&db_path).unwrap();
        let scanner = Scanner::new(Arc::new(store)).unwrap();
        scanner
            .scan(ScanRequest::new(site.uri()).with_lang(Lang::Fi))
            .await
            .unwrap()
            .id
    };

    let reopened = open_storage(&db_path).unwrap();
    let record = reopened.find_by_id(&id).unwrap().expect("Record should survive reopen");
    assert_eq!(record.lang, Lang::Fi);
    assert_eq!(reopened.count_scans().unwrap(), 1);
}
