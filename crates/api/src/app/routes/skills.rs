use std::sync::Arc;

use axum::{Extension, Json, extract::Query};

use folio_core::RecordId;

use crate::app::dto::{DeleteSkillQuery, MessageResponse};
use crate::app::errors::ApiError;
use crate::app::services::AppServices;

/// Soft-delete a skill by its `id` query parameter.
pub async fn delete_skill(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<DeleteSkillQuery>,
) -> Result<Json<MessageResponse>, ApiError> {
    let raw = query
        .id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| ApiError::bad_request("Skill ID is required"))?;
    let id: RecordId = raw.parse().map_err(|_| ApiError::bad_request("Invalid ID"))?;

    tracing::info!(%id, "deleting skill");
    let removed = services.repos.skills.delete(id).await.map_err(|e| {
        tracing::error!(%id, error = %e, "failed to delete skill");
        ApiError::Internal("Failed to delete skill".to_string())
    })?;

    if removed == 0 {
        tracing::info!(%id, "no skill to delete");
        return Err(ApiError::NotFound("Skill not found"));
    }

    Ok(Json(MessageResponse {
        message: "Skill deleted successfully",
    }))
}
