//! HTTP Basic authentication for the admin pages

use crate::server::AppState;
use axum::extract::{Request, State};
use axum::http::{header, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// Challenge sent with every 401 from the admin area
pub const WWW_AUTHENTICATE: &str = "Basic realm=\"Admin\", charset=\"UTF-8\"";

/// Expected admin user name and password
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminCredentials {
    pub username: String,
    pub password: String,
}

impl AdminCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// Checks an `Authorization` header value against the expected credentials
///
/// Without configured credentials every request is allowed. The password is
/// everything after the first colon of the decoded pair.
pub fn is_authorized(authorization: Option<&str>, expected: Option<&AdminCredentials>) -> bool {
    let Some(expected) = expected else {
        return true;
    };

    let Some(encoded) = authorization.and_then(|value| value.strip_prefix("Basic ")) else {
        return false;
    };

    let Ok(decoded) = STANDARD.decode(encoded.trim()) else {
        return false;
    };
    let Ok(decoded) = String::from_utf8(decoded) else {
        return false;
    };

    match decoded.split_once(':') {
        Some((username, password)) => {
            username == expected.username && password == expected.password
        }
        None => false,
    }
}

/// Middleware guarding the admin routes
pub async fn require_admin(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let authorization = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    if is_authorized(authorization, state.admin_credentials()) {
        return next.run(req).await;
    }

    tracing::warn!(path = %req.uri().path(), "Rejected admin request");
    (
        StatusCode::UNAUTHORIZED,
        [(header::WWW_AUTHENTICATE, WWW_AUTHENTICATE)],
        "Unauthorized",
    )
        .into_response()
}
