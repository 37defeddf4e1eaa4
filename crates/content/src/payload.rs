//! Turning inbound JSON bodies into records.
//!
//! Create decodes onto a zero-valued record; update decodes onto the stored
//! record so that omitted keys keep their stored values. A key set to `null`
//! counts as omitted. The base keys in [`RecordMeta::KEYS`] (and their
//! capitalised forms from older clients) are always ignored.

use serde_json::{Map, Value};

use folio_core::{AccountId, DomainError, DomainResult, Record, RecordMeta};

use crate::Resource;

/// A decoded JSON object body.
pub type Payload = Map<String, Value>;

/// Parse a request body into a JSON object. An empty body is `{}`.
pub fn parse_object(body: &[u8]) -> DomainResult<Payload> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Payload::new());
    }
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(DomainError::invalid_payload("expected a JSON object")),
        Err(e) => Err(DomainError::invalid_payload(e.to_string())),
    }
}

const LEGACY_META_KEYS: [&str; 4] = ["ID", "CreatedAt", "UpdatedAt", "DeletedAt"];

/// Drop server-owned keys and `null` values before decoding.
fn strip_meta(mut payload: Payload) -> Payload {
    for key in RecordMeta::KEYS.into_iter().chain(LEGACY_META_KEYS) {
        payload.remove(key);
    }
    payload.retain(|_, value| !value.is_null());
    payload
}

/// Decode a payload into a fresh, unsaved record.
pub fn new_record<T: Record>(payload: Payload) -> DomainResult<T> {
    let mut record: T = serde_json::from_value(Value::Object(strip_meta(payload)))
        .map_err(|e| DomainError::invalid_payload(e.to_string()))?;
    *record.meta_mut() = RecordMeta::default();
    Ok(record)
}

/// Decode a payload into a fresh resource owned by `owner`, whatever owner
/// id the payload carried.
pub fn new_resource<T: Resource>(payload: Payload, owner: AccountId) -> DomainResult<T> {
    let mut record: T = new_record(payload)?;
    record.set_owner(owner);
    Ok(record)
}

/// Merge a payload onto a stored record.
///
/// Present keys overwrite, omitted keys keep their stored values. The owner
/// id is overwritable here.
pub fn overlay<T: Record>(existing: &T, payload: Payload) -> DomainResult<T> {
    let mut merged = match serde_json::to_value(existing) {
        Ok(Value::Object(map)) => map,
        Ok(_) => return Err(DomainError::invalid_payload("record is not a JSON object")),
        Err(e) => return Err(DomainError::invalid_payload(e.to_string())),
    };
    merged.extend(strip_meta(payload));

    let mut record: T =
        serde_json::from_value(Value::Object(merged)).map_err(|e| DomainError::invalid_payload(e.to_string()))?;
    *record.meta_mut() = existing.meta().clone();
    Ok(record)
}
