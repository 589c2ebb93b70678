//! Route handlers

use crate::audit::ScanRequest;
use crate::output::html::{
    render_admin_page, render_landing_page, render_not_found_page, render_report_page,
};
use crate::output::{export_csv, format_markdown_report, render_pdf_report};
use crate::server::AppState;
use crate::summary::Lang;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct ReportQuery {
    pub id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LandingQuery {
    pub lang: Option<String>,
}

fn json_error(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(serde_json::json!({ "error": message.into() })),
    )
        .into_response()
}

fn storage_failure(error: impl std::fmt::Display) -> Response {
    tracing::error!(error = %error, "Report store failure");
    json_error(StatusCode::INTERNAL_SERVER_ERROR, "Internal error")
}

pub async fn healthz_handler() -> &'static str {
    "ok"
}

pub async fn landing_handler(Query(query): Query<LandingQuery>) -> Html<String> {
    let lang = query
        .lang
        .and_then(|lang| lang.parse::<Lang>().ok())
        .unwrap_or_default();
    Html(render_landing_page(lang))
}

/// `POST /api/analyze`
pub async fn analyze_handler(
    State(state): State<AppState>,
    payload: Result<Json<ScanRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return json_error(StatusCode::BAD_REQUEST, rejection.body_text()),
    };

    match state.scanner().scan(request).await {
        Ok(outcome) => Json(outcome).into_response(),
        Err(e) if e.is_client_error() => json_error(StatusCode::BAD_REQUEST, e.to_string()),
        Err(e) => storage_failure(e),
    }
}

/// `GET /api/report?id=…`
pub async fn report_api_handler(
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> Response {
    let Some(id) = query.id.filter(|id| !id.trim().is_empty()) else {
        return json_error(StatusCode::BAD_REQUEST, "Missing id");
    };

    match state.store().find_by_id(id.trim()) {
        Ok(Some(record)) => Json(record).into_response(),
        Ok(None) => json_error(StatusCode::NOT_FOUND, "Not found"),
        Err(e) => storage_failure(e),
    }
}

/// `GET /report/:id`
pub async fn report_page_handler(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match state.store().find_by_id(&id) {
        Ok(Some(record)) => Html(render_report_page(&record)).into_response(),
        Ok(None) => (StatusCode::NOT_FOUND, Html(render_not_found_page())).into_response(),
        Err(e) => storage_failure(e),
    }
}

/// `GET /report/:id/report.md`
pub async fn report_markdown_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    match state.store().find_by_id(&id) {
        Ok(Some(record)) => (
            [
                (header::CONTENT_TYPE, "text/markdown; charset=utf-8"),
                (
                    header::CONTENT_DISPOSITION,
                    "attachment; filename=\"website-report.md\"",
                ),
            ],
            format_markdown_report(&record),
        )
            .into_response(),
        Ok(None) => (StatusCode::NOT_FOUND, Html(render_not_found_page())).into_response(),
        Err(e) => storage_failure(e),
    }
}

/// `GET /report/:id/report.pdf`
pub async fn report_pdf_handler(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let record = match state.store().find_by_id(&id) {
        Ok(Some(record)) => record,
        Ok(None) => return (StatusCode::NOT_FOUND, Html(render_not_found_page())).into_response(),
        Err(e) => return storage_failure(e),
    };

    match render_pdf_report(&record) {
        Ok(bytes) => (
            [
                (header::CONTENT_TYPE, "application/pdf"),
                (
                    header::CONTENT_DISPOSITION,
                    "attachment; filename=\"website-report.pdf\"",
                ),
            ],
            bytes,
        )
            .into_response(),
        Err(e) => {
            tracing::error!(id = %id, error = %e, "PDF rendering failed");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "Internal error")
        }
    }
}

/// `GET /admin`
pub async fn admin_handler(State(state): State<AppState>) -> Response {
    match state.store().list_recent(state.export_limit()) {
        Ok(records) => Html(render_admin_page(&records)).into_response(),
        Err(e) => storage_failure(e),
    }
}

/// `GET /admin/export.csv`
pub async fn admin_csv_handler(State(state): State<AppState>) -> Response {
    match state.store().list_recent(state.export_limit()) {
        Ok(records) => (
            [
                (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
                (header::CONTENT_DISPOSITION, "attachment; filename=\"scans.csv\""),
            ],
            export_csv(&records),
        )
            .into_response(),
        Err(e) => storage_failure(e),
    }
}
