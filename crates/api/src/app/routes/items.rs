//! `/<kind>/<id>`: one handler for every resource kind.
//!
//! The kind is resolved from the first path segment and the operation from
//! the method: `GET` reads, `PUT` merges the body onto the stored record.

use std::sync::Arc;

use axum::{
    Extension, Json,
    body::Bytes,
    http::{HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
};

use folio_content::{Contribution, Education, MusicWork, ResourceKind, Skill, Website, overlay, parse_object};
use folio_core::RecordId;
use folio_infra::Stored;

use crate::app::errors::ApiError;
use crate::app::services::AppServices;
use crate::middleware::authenticate;

/// A parsed item path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourcePath {
    pub kind: ResourceKind,
    pub id: RecordId,
}

impl ResourcePath {
    /// Parse `/<kind>/<id>`; anything else is a client error.
    pub fn parse(path: &str) -> Result<Self, ApiError> {
        let mut segments = path.trim_start_matches('/').split('/');
        let (Some(kind), Some(id), None) = (segments.next(), segments.next(), segments.next()) else {
            return Err(ApiError::bad_request("Invalid URL"));
        };

        let kind = ResourceKind::from_segment(kind).ok_or_else(|| ApiError::bad_request("Invalid resource type"))?;
        let id = id.parse().map_err(|_| ApiError::bad_request("Invalid ID"))?;
        Ok(Self { kind, id })
    }
}

/// Run `$body` with `$t` bound to the record type of `$kind`.
macro_rules! with_resource {
    ($kind:expr, $t:ident => $body:expr) => {
        match $kind {
            ResourceKind::Website => {
                type $t = Website;
                $body
            }
            ResourceKind::MusicWork => {
                type $t = MusicWork;
                $body
            }
            ResourceKind::Contribution => {
                type $t = Contribution;
                $body
            }
            ResourceKind::Skill => {
                type $t = Skill;
                $body
            }
            ResourceKind::Education => {
                type $t = Education;
                $body
            }
        }
    };
}

pub async fn handle(
    Extension(services): Extension<Arc<AppServices>>,
    method: Method,
    uri: Uri,
    body: Bytes,
) -> Result<Response, ApiError> {
    let path = ResourcePath::parse(uri.path())?;

    match method {
        Method::GET => with_resource!(path.kind, T => get::<T>(&services, path.id).await),
        Method::PUT => with_resource!(path.kind, T => update::<T>(&services, path.id, &body).await),
        _ => Err(ApiError::MethodNotAllowed),
    }
}

/// Paths under a resource kind that no route matched, such as `/skills/`
/// or `/skills/1/extra`. They pass the same token check as item routes and
/// then fail path parsing; paths outside every kind stay a plain 404.
pub async fn unmatched(
    Extension(services): Extension<Arc<AppServices>>,
    headers: HeaderMap,
    uri: Uri,
) -> Result<Response, ApiError> {
    let first = uri.path().trim_start_matches('/').split('/').next().unwrap_or_default();
    if ResourceKind::from_segment(first).is_none() {
        return Ok(StatusCode::NOT_FOUND.into_response());
    }

    authenticate(&services.tokens, &headers)?;
    ResourcePath::parse(uri.path())?;
    Ok(StatusCode::NOT_FOUND.into_response())
}

async fn get<T: Stored>(services: &AppServices, id: RecordId) -> Result<Response, ApiError> {
    let record: T = services.repos.of::<T>().find_by_id(id).await?;
    Ok(Json(record).into_response())
}

async fn update<T: Stored>(services: &AppServices, id: RecordId, body: &[u8]) -> Result<Response, ApiError> {
    let repo = services.repos.of::<T>();
    let existing = repo.find_by_id(id).await?;
    let merged = overlay(&existing, parse_object(body)?)?;
    let saved = repo.save(merged).await?;

    services.revalidator.notify(T::KIND.segment());
    Ok(Json(saved).into_response())
}
