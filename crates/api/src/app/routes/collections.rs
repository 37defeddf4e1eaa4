//! List and create, bound once per resource kind.

use std::sync::Arc;

use axum::{Extension, Json, body::Bytes};

use folio_content::{Website, new_resource, parse_object};
use folio_infra::Stored;

use crate::app::errors::ApiError;
use crate::app::services::AppServices;
use crate::context::AuthContext;

const WEBSITES_CACHE_KEY: &str = "websites";

/// Records of kind `T` owned by the configured account, straight from storage.
pub async fn list<T: Stored>(Extension(services): Extension<Arc<AppServices>>) -> Result<Json<Vec<T>>, ApiError> {
    let records = services.repos.of::<T>().find_all(Some(services.owner)).await?;
    Ok(Json(records))
}

/// The website list is the one cached read path.
pub async fn list_websites(
    Extension(services): Extension<Arc<AppServices>>,
) -> Result<Json<Vec<Website>>, ApiError> {
    let websites = services
        .website_cache
        .get_or_compute(WEBSITES_CACHE_KEY, || async {
            tracing::info!("fetching websites from storage");
            services.repos.websites.find_all(Some(services.owner)).await
        })
        .await?;

    tracing::info!(count = websites.len(), "returning websites");
    Ok(Json(websites))
}

pub async fn create<T: Stored>(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(auth): Extension<AuthContext>,
    body: Bytes,
) -> Result<Json<T>, ApiError> {
    let record: T = new_resource(parse_object(&body)?, services.owner)?;
    let record = services.repos.of::<T>().insert(record).await?;

    tracing::info!(by = %auth.account_id(), kind = %T::KIND, id = %record.id(), "record created");
    if T::KIND.notifies_on_create() {
        services.revalidator.notify(T::KIND.segment());
    }
    Ok(Json(record))
}
