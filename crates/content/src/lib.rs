//! `folio-content`: the portfolio's record types and their write rules.
//!
//! Pure domain: shapes, the closed set of resource kinds, and how inbound
//! JSON payloads become (or are merged onto) records.

pub mod kind;
pub mod payload;
pub mod resources;
pub mod user;

pub use kind::ResourceKind;
pub use payload::{new_record, new_resource, overlay, parse_object, Payload};
pub use resources::{Contribution, Education, MusicWork, Resource, Skill, Website};
pub use user::User;
