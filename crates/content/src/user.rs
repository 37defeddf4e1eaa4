use serde::{Deserialize, Serialize};

use folio_core::{Record, RecordMeta};

/// An account able to log in.
///
/// `password_hash` is a PHC-format string and is never serialised.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct User {
    #[serde(flatten)]
    pub meta: RecordMeta,
    #[serde(alias = "Name")]
    pub name: String,
    #[serde(alias = "Email")]
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
}

impl User {
    pub fn new(name: impl Into<String>, email: impl Into<String>, password_hash: impl Into<String>) -> Self {
        Self {
            meta: RecordMeta::default(),
            name: name.into(),
            email: email.into(),
            password_hash: password_hash.into(),
        }
    }
}

impl Record for User {
    fn meta(&self) -> &RecordMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut RecordMeta {
        &mut self.meta
    }
}
