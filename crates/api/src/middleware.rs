use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{Request, State},
    http::{HeaderMap, HeaderValue, Method, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use tracing::Instrument;
use uuid::Uuid;

use folio_auth::TokenVerifier;

use crate::app::errors::ApiError;
use crate::context::AuthContext;

#[derive(Clone)]
pub struct AuthState {
    pub tokens: Arc<dyn TokenVerifier>,
}

/// Rejects the request with 401 unless it carries a valid bearer token.
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth = authenticate(state.tokens.as_ref(), req.headers())?;
    req.extensions_mut().insert(auth);

    Ok(next.run(req).await)
}

/// Resolve the caller from the `Authorization` header.
pub fn authenticate(tokens: &dyn TokenVerifier, headers: &HeaderMap) -> Result<AuthContext, ApiError> {
    let token = extract_bearer(headers)?;

    let account_id = tokens.verify(token, Utc::now()).map_err(|e| {
        tracing::debug!(error = %e, "rejected bearer token");
        ApiError::Unauthorized("Invalid token")
    })?;

    Ok(AuthContext::new(account_id))
}

fn extract_bearer(headers: &HeaderMap) -> Result<&str, ApiError> {
    let header = headers
        .get(header::AUTHORIZATION)
        .ok_or(ApiError::Unauthorized("Authorization header is required"))?;

    let header = header
        .to_str()
        .map_err(|_| ApiError::Unauthorized("Invalid authorization header format"))?;

    let token = header
        .strip_prefix("Bearer ")
        .ok_or(ApiError::Unauthorized("Invalid authorization header format"))?
        .trim();

    if token.is_empty() || token.contains(' ') {
        return Err(ApiError::Unauthorized("Invalid authorization header format"));
    }

    Ok(token)
}

const CORS_METHODS: &str = "GET, POST, PUT, DELETE, OPTIONS";
const CORS_HEADERS: &str = "Content-Type, Authorization";

/// Origins allowed to call the API from a browser.
#[derive(Debug, Clone, Default)]
pub struct CorsState {
    origins: Arc<[String]>,
}

impl CorsState {
    pub fn new(origins: impl IntoIterator<Item = String>) -> Self {
        Self {
            origins: origins.into_iter().collect(),
        }
    }

    fn allows(&self, origin: &str) -> bool {
        self.origins.iter().any(|o| o == origin)
    }
}

/// Echoes allowed origins and answers preflight requests directly.
pub async fn cors_middleware(State(cors): State<CorsState>, req: Request, next: Next) -> Response {
    let origin = req
        .headers()
        .get(header::ORIGIN)
        .filter(|v| v.to_str().is_ok_and(|o| cors.allows(o)))
        .cloned();

    let preflight =
        req.method() == Method::OPTIONS && req.headers().contains_key(header::ACCESS_CONTROL_REQUEST_METHOD);

    let mut response = if preflight {
        axum::http::StatusCode::NO_CONTENT.into_response()
    } else {
        next.run(req).await
    };

    let headers = response.headers_mut();
    headers.append(header::VARY, HeaderValue::from_static("Origin"));
    if let Some(origin) = origin {
        headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, origin);
        headers.insert(header::ACCESS_CONTROL_ALLOW_METHODS, HeaderValue::from_static(CORS_METHODS));
        headers.insert(header::ACCESS_CONTROL_ALLOW_HEADERS, HeaderValue::from_static(CORS_HEADERS));
    }

    response
}

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Runs each request inside a span tagged with a fresh request id and logs
/// its outcome.
pub async fn trace_middleware(req: Request, next: Next) -> Response {
    let request_id = Uuid::now_v7();
    let span = tracing::info_span!(
        "request",
        %request_id,
        method = %req.method(),
        path = %req.uri().path(),
    );

    let started = Instant::now();
    let mut response = next.run(req).instrument(span.clone()).await;

    span.in_scope(|| {
        tracing::info!(
            status = response.status().as_u16(),
            latency_ms = started.elapsed().as_millis() as u64,
            "request completed"
        );
    });

    if let Ok(value) = HeaderValue::from_str(&request_id.to_string()) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(auth: &str) -> HeaderMap {
        let mut h = HeaderMap::new();
        h.insert(header::AUTHORIZATION, HeaderValue::from_str(auth).unwrap());
        h
    }

    #[test]
    fn bearer_token_is_extracted() {
        assert_eq!(extract_bearer(&headers("Bearer abc.def.ghi")).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn missing_header_is_rejected() {
        let err = extract_bearer(&HeaderMap::new()).unwrap_err();
        assert_eq!(err, ApiError::Unauthorized("Authorization header is required"));
    }

    #[test]
    fn malformed_headers_are_rejected() {
        for bad in ["abc.def.ghi", "Basic abc", "Bearer ", "Bearer a b", "bearer abc"] {
            let err = extract_bearer(&headers(bad)).unwrap_err();
            assert_eq!(err, ApiError::Unauthorized("Invalid authorization header format"), "{bad}");
        }
    }

    #[test]
    fn cors_only_allows_configured_origins() {
        let cors = CorsState::new(["http://localhost:3000".to_string()]);
        assert!(cors.allows("http://localhost:3000"));
        assert!(!cors.allows("http://evil.example"));
        assert!(!CorsState::default().allows("http://localhost:3000"));
    }
}
