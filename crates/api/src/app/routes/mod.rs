use axum::{
    Router,
    routing::{any, get, post},
};

use folio_content::{Contribution, Education, MusicWork, ResourceKind, Skill, Website};

pub mod collections;
pub mod items;
pub mod login;
pub mod skills;
pub mod system;
pub mod users;

/// Unauthenticated reads.
pub fn public_router() -> Router {
    Router::new()
        .route("/users", get(users::list_users))
        .route("/websites", get(collections::list_websites))
        .route("/music", get(collections::list::<MusicWork>))
        .route("/contributions", get(collections::list::<Contribution>))
        .route("/skills", get(collections::list::<Skill>))
        .route("/education", get(collections::list::<Education>))
}

/// Writes and item lookups; the caller wraps these in the auth gate.
pub fn protected_router() -> Router {
    let router = Router::new()
        .route("/users/create", post(users::create_user))
        .route("/websites/create", post(collections::create::<Website>))
        .route("/music/create", post(collections::create::<MusicWork>))
        .route("/contributions/create", post(collections::create::<Contribution>))
        .route("/skills/create", post(collections::create::<Skill>))
        .route("/education/create", post(collections::create::<Education>))
        .route("/skills/delete", any(skills::delete_skill));

    ResourceKind::ALL.into_iter().fold(router, |router, kind| {
        router.route(&format!("/{}/:id", kind.segment()), any(items::handle))
    })
}
