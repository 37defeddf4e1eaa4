//! Base shape shared by every stored record.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::RecordId;

/// Identity and lifecycle timestamps carried by every record.
///
/// A record whose `deleted_at` is set is logically absent even though its row
/// still exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordMeta {
    pub id: RecordId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Default for RecordMeta {
    fn default() -> Self {
        Self {
            id: RecordId::default(),
            created_at: DateTime::<Utc>::UNIX_EPOCH,
            updated_at: DateTime::<Utc>::UNIX_EPOCH,
            deleted_at: None,
        }
    }
}

impl RecordMeta {
    /// JSON keys owned by the server; inbound payloads never set them.
    pub const KEYS: [&'static str; 4] = ["id", "created_at", "updated_at", "deleted_at"];
}

/// A stored record: serialisable, cloneable, and carrying a [`RecordMeta`].
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    fn meta(&self) -> &RecordMeta;

    fn meta_mut(&mut self) -> &mut RecordMeta;

    fn id(&self) -> RecordId {
        self.meta().id
    }
}
