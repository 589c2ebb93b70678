//! HTTP server
//!
//! Routes:
//! - `POST /api/analyze`, `GET /api/report?id=`
//! - `GET /report/:id`, `GET /report/:id/report.pdf` and `GET /report/:id/report.md`
//! - `GET /admin` and `GET /admin/export.csv` (Basic auth when configured)
//! - `GET /` landing page, `GET /healthz`

mod auth;
pub mod handlers;

pub use auth::{is_authorized, require_admin, AdminCredentials, WWW_AUTHENTICATE};

use crate::audit::Scanner;
use crate::config::Config;
use crate::storage::{open_storage, ReportStore};
use axum::middleware::from_fn_with_state;
use axum::routing::{get, post};
use axum::Router;
use std::path::Path;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    scanner: Scanner,
    admin: Option<Arc<AdminCredentials>>,
    export_limit: usize,
}

impl AppState {
    pub fn new(scanner: Scanner, export_limit: usize) -> Self {
        Self {
            scanner,
            admin: None,
            export_limit,
        }
    }

    pub fn with_admin_credentials(mut self, credentials: AdminCredentials) -> Self {
        self.admin = Some(Arc::new(credentials));
        self
    }

    /// Builds the state from configuration and an opened store
    pub fn from_config(config: &Config, store: Arc<dyn ReportStore>) -> crate::Result<Self> {
        let scanner = Scanner::from_config(config, store)?;
        let state = Self::new(scanner, config.server.export_limit);

        Ok(match config.admin.credentials() {
            Some((username, password)) => {
                state.with_admin_credentials(AdminCredentials::new(username, password))
            }
            None => {
                tracing::warn!("Admin credentials not configured, /admin is unprotected");
                state
            }
        })
    }

    pub fn scanner(&self) -> &Scanner {
        &self.scanner
    }

    pub fn store(&self) -> &Arc<dyn ReportStore> {
        self.scanner.store()
    }

    pub fn admin_credentials(&self) -> Option<&AdminCredentials> {
        self.admin.as_deref()
    }

    pub fn export_limit(&self) -> usize {
        self.export_limit
    }
}

/// Builds the application router
pub fn build_router(state: AppState) -> Router {
    let admin = Router::new()
        .route("/admin", get(handlers::admin_handler))
        .route("/admin/export.csv", get(handlers::admin_csv_handler))
        .route_layer(from_fn_with_state(state.clone(), require_admin));

    Router::new()
        .route("/", get(handlers::landing_handler))
        .route("/healthz", get(handlers::healthz_handler))
        .route("/api/analyze", post(handlers::analyze_handler))
        .route("/api/report", get(handlers::report_api_handler))
        .route("/report/:id", get(handlers::report_page_handler))
        .route("/report/:id/report.pdf", get(handlers::report_pdf_handler))
        .route("/report/:id/report.md", get(handlers::report_markdown_handler))
        .merge(admin)
        .with_state(state)
}

/// Opens the store and serves HTTP until Ctrl-C
pub async fn serve(config: &Config) -> crate::Result<()> {
    let store = open_storage(Path::new(&config.storage.database_path))?;
    let state = AppState::from_config(config, Arc::new(store))?;
    let app = build_router(state);

    let listener = TcpListener::bind(config.server.bind.as_str()).await?;
    tracing::info!(
        bind = %listener.local_addr()?,
        strategy = %config.scoring.strategy,
        "Listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
