//! Request/response bodies that are not records themselves.

use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;

use folio_content::parse_object;

use crate::app::errors::ApiError;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    #[serde(default, alias = "Name")]
    pub name: String,
    #[serde(alias = "Email")]
    pub email: String,
    #[serde(alias = "Password")]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct DeleteSkillQuery {
    pub id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// Decode a JSON object body, mapping malformed input to 400.
pub fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
    let object = parse_object(body)?;
    serde_json::from_value(serde_json::Value::Object(object)).map_err(|e| ApiError::bad_request(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_rejects_malformed_bodies() {
        assert!(decode::<LoginRequest>(b"{not json").is_err());
        assert!(decode::<LoginRequest>(b"[1,2]").is_err());
        assert!(decode::<CreateUserRequest>(br#"{"name":"Andrew"}"#).is_err());
    }

    #[test]
    fn decode_fills_defaults() {
        let req: LoginRequest = decode(b"").unwrap();
        assert_eq!(req.email, "");
        let req: LoginRequest = decode(br#"{"email":"a@x.com","password":"pw","extra":1}"#).unwrap();
        assert_eq!(req.email, "a@x.com");
        assert_eq!(req.password, "pw");
    }

    #[test]
    fn create_user_accepts_capitalised_keys() {
        let req: CreateUserRequest = decode(br#"{"Name":"Guest","Email":"g@x.com","Password":"pw"}"#).unwrap();
        assert_eq!(req.name, "Guest");
        assert_eq!(req.email, "g@x.com");
        assert_eq!(req.password, "pw");
    }
}
