//! Credential exchange. Sits outside the shared CORS layer and sets its own
//! headers for the configured frontend.

use std::sync::Arc;

use axum::{
    Extension, Json, Router,
    body::Bytes,
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
    routing::post,
};
use chrono::Utc;

use folio_auth::verify_password;
use folio_core::{AccountId, Record};

use crate::app::dto::{self, LoginRequest, LoginResponse};
use crate::app::errors::ApiError;
use crate::app::services::AppServices;

const INVALID_CREDENTIALS: ApiError = ApiError::Unauthorized("Invalid credentials");

pub fn router() -> Router {
    Router::new().route("/login", post(login).options(preflight))
}

pub async fn preflight(Extension(services): Extension<Arc<AppServices>>) -> Response {
    (StatusCode::OK, cors_headers(&services)).into_response()
}

pub async fn login(Extension(services): Extension<Arc<AppServices>>, body: Bytes) -> Response {
    let headers = cors_headers(&services);
    match authenticate(&services, &body).await {
        Ok(token) => (headers, Json(LoginResponse { token })).into_response(),
        Err(e) => (headers, e).into_response(),
    }
}

async fn authenticate(services: &AppServices, body: &[u8]) -> Result<String, ApiError> {
    let req: LoginRequest = dto::decode(body)?;

    let user = services.repos.users.find_by_email(&req.email).await.map_err(|e| {
        tracing::debug!(error = %e, "login lookup failed");
        INVALID_CREDENTIALS
    })?;

    if !verify_password(&req.password, &user.password_hash) {
        return Err(INVALID_CREDENTIALS);
    }

    services
        .tokens
        .issue(AccountId::new(user.id().get()), Utc::now())
        .map_err(|e| {
            tracing::error!(error = %e, "token signing failed");
            ApiError::Internal("Error generating token".to_string())
        })
}

fn cors_headers(services: &AppServices) -> HeaderMap {
    let mut headers = HeaderMap::new();
    if let Some(origin) = services.login_origin.as_deref().and_then(|o| HeaderValue::from_str(o).ok()) {
        headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, origin);
    }
    headers.insert(header::ACCESS_CONTROL_ALLOW_METHODS, HeaderValue::from_static("POST, OPTIONS"));
    headers.insert(header::ACCESS_CONTROL_ALLOW_HEADERS, HeaderValue::from_static("Content-Type"));
    headers
}
