use std::sync::Arc;

use axum::{Extension, Json, body::Bytes};

use folio_auth::hash_password;
use folio_content::User;
use folio_core::Record;

use crate::app::dto::{self, CreateUserRequest};
use crate::app::errors::ApiError;
use crate::app::services::AppServices;
use crate::context::AuthContext;

pub async fn list_users(Extension(services): Extension<Arc<AppServices>>) -> Result<Json<Vec<User>>, ApiError> {
    Ok(Json(services.repos.users.find_all(None).await?))
}

pub async fn create_user(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(auth): Extension<AuthContext>,
    body: Bytes,
) -> Result<Json<User>, ApiError> {
    let req: CreateUserRequest = dto::decode(&body)?;
    if req.email.trim().is_empty() || req.password.is_empty() {
        return Err(ApiError::bad_request("email and password are required"));
    }

    let hash = hash_password(&req.password).map_err(|e| ApiError::Internal(e.to_string()))?;
    let user = services.repos.users.insert(User::new(req.name, req.email.trim(), hash)).await?;

    tracing::info!(by = %auth.account_id(), id = %user.id(), "user created");
    Ok(Json(user))
}
