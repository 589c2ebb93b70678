//! Integration tests for the HTTP server
//!
//! Each test binds the router to an ephemeral port and talks to it with
//! reqwest; the audited site is a wiremock server.

use site_audit::audit::Scanner;
use site_audit::server::{build_router, AdminCredentials, AppState, WWW_AUTHENTICATE};
use site_audit::storage::{ReportStore, ScanRecord, SqliteStorage, StorageError, StorageResult};
use std::sync::Arc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PAGE: &str = r#"<html><head><title>Shop</title>
<meta name="viewport" content="width=device-width"></head>
<body><h1>Welcome</h1><a href="/privacy">Privacy</a></body></html>"#;

async fn page_server() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(PAGE))
        .mount(&server)
        .await;
    server
}

async fn spawn_app(state: AppState) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, build_router(state)).await.unwrap();
    });
    format!("http://{}", addr)
}

fn state_with_store(store: Arc<dyn ReportStore>) -> AppState {
    AppState::new(Scanner::new(store).unwrap(), 50)
}

async fn default_app() -> String {
    let store = Arc::new(SqliteStorage::new_in_memory().unwrap());
    spawn_app(state_with_store(store)).await
}

/// Store whose writes always fail
struct FailingStore;

impl ReportStore for FailingStore {
    fn create(&self, record: &ScanRecord) -> StorageResult<String> {
        Err(StorageError::Corrupt {
            id: record.id.clone(),
            reason: "disk full".to_string(),
        })
    }

    fn find_by_id(&self, _id: &str) -> StorageResult<Option<ScanRecord>> {
        Ok(None)
    }

    fn list_recent(&self, _limit: usize) -> StorageResult<Vec<ScanRecord>> {
        Ok(Vec::new())
    }
}

#[tokio::test]
async fn test_healthz() {
    let app = default_app().await;
    let body = reqwest::get(format!("{}/healthz", app))
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert_eq!(body, "ok");
}

#[tokio::test]
async fn test_analyze_then_read_report() {
    let site = page_server().await;
    let app = default_app().await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/api/analyze", app))
        .json(&serde_json::json!({ "url": site.uri(), "lang": "fi" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let outcome: serde_json::Value = response.json().await.unwrap();
    let id = outcome["id"].as_str().expect("id in response").to_string();
    assert!(outcome["score"].as_u64().unwrap() <= 100);
    assert_eq!(outcome["summary"]["steps"].as_array().unwrap().len(), 3);

    let record: serde_json::Value = client
        .get(format!("{}/api/report", app))
        .query(&[("id", id.as_str())])
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(record["id"], id.as_str());
    assert_eq!(record["lang"], "fi");
    assert_eq!(record["signals"]["title"], "Shop");
    assert_eq!(record["signals"]["privacyPolicyUrlFound"], true);
    assert_eq!(record["score"], outcome["score"]);

    let page = client
        .get(format!("{}/report/{}", app, id))
        .send()
        .await
        .unwrap();
    assert_eq!(page.status(), 200);
    let html = page.text().await.unwrap();
    assert!(html.contains("Kokonaispisteet"));
    assert!(html.contains("Mikä toimii"));

    let markdown = client
        .get(format!("{}/report/{}/report.md", app, id))
        .send()
        .await
        .unwrap();
    assert_eq!(markdown.status(), 200);
    assert!(markdown.headers()["content-type"]
        .to_str()
        .unwrap()
        .starts_with("text/markdown"));
    assert!(markdown.text().await.unwrap().contains("## Seuraavat askeleet"));

    let pdf = client
        .get(format!("{}/report/{}/report.pdf", app, id))
        .send()
        .await
        .unwrap();
    assert_eq!(pdf.status(), 200);
    assert_eq!(pdf.headers()["content-type"], "application/pdf");
    assert!(pdf.headers()["content-disposition"]
        .to_str()
        .unwrap()
        .contains("website-report.pdf"));
    assert!(pdf.bytes().await.unwrap().starts_with(b"%PDF"));

    let missing = client
        .get(format!("{}/report/nope/report.pdf", app))
        .send()
        .await
        .unwrap();
    assert_eq!(missing.status(), 404);
}

#[tokio::test]
async fn test_analyze_rejects_empty_url() {
    let app = default_app().await;
    let response = reqwest::Client::new()
        .post(format!("{}/api/analyze", app))
        .json(&serde_json::json!({ "url": "   " }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 400);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "URL is empty");
}

#[tokio::test]
async fn test_analyze_rejects_malformed_body() {
    let app = default_app().await;
    let response = reqwest::Client::new()
        .post(format!("{}/api/analyze", app))
        .header("content-type", "application/json")
        .body("{\"url\":")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 400);
    let body: serde_json::Value = response.json().await.unwrap();
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_analyze_unreachable_site_is_bad_request() {
    let site = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&site)
        .await;
    let app = default_app().await;

    let response = reqwest::Client::new()
        .post(format!("{}/api/analyze", app))
        .json(&serde_json::json!({ "url": site.uri() }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 400);
    let body: serde_json::Value = response.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("HTTP 404"));
}

#[tokio::test]
async fn test_analyze_persistence_failure_is_server_error() {
    let site = page_server().await;
    let app = spawn_app(state_with_store(Arc::new(FailingStore))).await;

    let response = reqwest::Client::new()
        .post(format!("{}/api/analyze", app))
        .json(&serde_json::json!({ "url": site.uri() }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 500);
    let body: serde_json::Value = response.json().await.unwrap();
    assert!(body.get("id").is_none());
    assert_eq!(body["error"], "Internal error");
    assert!(!body.to_string().contains("disk full"));
}

#[tokio::test]
async fn test_report_lookup_errors() {
    let app = default_app().await;

    let missing = reqwest::get(format!("{}/api/report", app)).await.unwrap();
    assert_eq!(missing.status(), 400);

    let unknown = reqwest::get(format!("{}/api/report?id=nope", app)).await.unwrap();
    assert_eq!(unknown.status(), 404);

    let page = reqwest::get(format!("{}/report/nope", app)).await.unwrap();
    assert_eq!(page.status(), 404);
    assert!(page.text().await.unwrap().contains("Not found"));
}

#[tokio::test]
async fn test_admin_open_without_credentials() {
    let app = default_app().await;
    let response = reqwest::get(format!("{}/admin", app)).await.unwrap();
    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn test_admin_requires_basic_auth_when_configured() {
    let store = Arc::new(SqliteStorage::new_in_memory().unwrap());
    let state = state_with_store(store).with_admin_credentials(AdminCredentials::new("admin", "pw"));
    let app = spawn_app(state).await;
    let client = reqwest::Client::new();

    let anonymous = client.get(format!("{}/admin", app)).send().await.unwrap();
    assert_eq!(anonymous.status(), 401);
    assert_eq!(
        anonymous.headers()["www-authenticate"].to_str().unwrap(),
        WWW_AUTHENTICATE
    );

    let wrong = client
        .get(format!("{}/admin/export.csv", app))
        .basic_auth("admin", Some("nope"))
        .send()
        .await
        .unwrap();
    assert_eq!(wrong.status(), 401);

    let ok = client
        .get(format!("{}/admin", app))
        .basic_auth("admin", Some("pw"))
        .send()
        .await
        .unwrap();
    assert_eq!(ok.status(), 200);
    assert!(ok.text().await.unwrap().contains("<h1>Admin</h1>"));
}

#[tokio::test]
async fn test_admin_csv_export() {
    let site = page_server().await;
    let store = Arc::new(SqliteStorage::new_in_memory().unwrap());
    let state = state_with_store(store).with_admin_credentials(AdminCredentials::new("admin", "pw"));
    let app = spawn_app(state).await;
    let client = reqwest::Client::new();

    let empty = client
        .get(format!("{}/admin/export.csv", app))
        .basic_auth("admin", Some("pw"))
        .send()
        .await
        .unwrap();
    assert_eq!(empty.status(), 200);
    assert_eq!(empty.text().await.unwrap(), "");

    client
        .post(format!("{}/api/analyze", app))
        .json(&serde_json::json!({ "url": site.uri(), "email": "owner@example.com" }))
        .send()
        .await
        .unwrap()
        .error_for_status()
        .unwrap();

    let response = client
        .get(format!("{}/admin/export.csv", app))
        .basic_auth("admin", Some("pw"))
        .send()
        .await
        .unwrap();
    assert!(response.headers()["content-type"]
        .to_str()
        .unwrap()
        .starts_with("text/csv"));

    let csv = response.text().await.unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines[0], "date,url,email,score,lang");
    assert_eq!(lines.len(), 2);
    assert!(lines[1].contains("\"owner@example.com\""));
    assert!(lines[1].ends_with(",\"en\""));
}
