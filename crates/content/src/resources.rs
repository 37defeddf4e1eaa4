//! Owner-scoped content records.
//!
//! Every field is optional on the wire: an omitted field decodes to its zero
//! value on create and keeps its stored value on update.

use serde::{Deserialize, Serialize};

use folio_core::{AccountId, Record, RecordMeta};

use crate::ResourceKind;

/// A record attributed to an owning account.
pub trait Resource: Record {
    const KIND: ResourceKind;

    fn owner(&self) -> AccountId;

    fn set_owner(&mut self, owner: AccountId);
}

/// A website built for the portfolio owner.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Website {
    #[serde(flatten)]
    pub meta: RecordMeta,
    pub user_id: AccountId,
    pub title: String,
    pub description: String,
    pub url: String,
    /// Markdown body.
    pub content: String,
}

/// A piece of music; `url` usually points at embedded audio or video.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MusicWork {
    #[serde(flatten)]
    pub meta: RecordMeta,
    pub user_id: AccountId,
    pub title: String,
    pub description: String,
    pub url: String,
    pub content: String,
}

/// An open-source or community contribution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Contribution {
    #[serde(flatten)]
    pub meta: RecordMeta,
    pub user_id: AccountId,
    pub title: String,
    pub description: String,
    pub url: String,
    pub content: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Skill {
    #[serde(flatten)]
    pub meta: RecordMeta,
    pub user_id: AccountId,
    pub name: String,
    pub description: String,
}

/// A degree or course. Dates are free-form strings and are not validated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Education {
    #[serde(flatten)]
    pub meta: RecordMeta,
    pub user_id: AccountId,
    pub institution: String,
    pub degree: String,
    pub field_of_study: String,
    pub start_date: String,
    pub end_date: String,
    pub description: String,
}

macro_rules! impl_resource {
    ($t:ty, $kind:expr) => {
        impl Record for $t {
            fn meta(&self) -> &RecordMeta {
                &self.meta
            }

            fn meta_mut(&mut self) -> &mut RecordMeta {
                &mut self.meta
            }
        }

        impl Resource for $t {
            const KIND: ResourceKind = $kind;

            fn owner(&self) -> AccountId {
                self.user_id
            }

            fn set_owner(&mut self, owner: AccountId) {
                self.user_id = owner;
            }
        }
    };
}

impl_resource!(Website, ResourceKind::Website);
impl_resource!(MusicWork, ResourceKind::MusicWork);
impl_resource!(Contribution, ResourceKind::Contribution);
impl_resource!(Skill, ResourceKind::Skill);
impl_resource!(Education, ResourceKind::Education);

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::RecordId;

    #[test]
    fn serialises_flat_snake_case_shape() {
        let mut edu = Education {
            institution: "MIT".to_string(),
            field_of_study: "Music".to_string(),
            ..Default::default()
        };
        edu.meta.id = RecordId::new(3);
        edu.user_id = AccountId::new(1);

        let json = serde_json::to_value(&edu).unwrap();
        assert_eq!(json["id"], 3);
        assert_eq!(json["user_id"], 1);
        assert_eq!(json["field_of_study"], "Music");
        assert!(json["deleted_at"].is_null());
        assert!(json.get("meta").is_none());
    }

    #[test]
    fn kinds_are_bound_to_types() {
        assert_eq!(Website::KIND, ResourceKind::Website);
        assert_eq!(MusicWork::KIND.segment(), "music");
        assert_eq!(Education::KIND.table(), "educations");
    }
}
