//! `folio-auth`: credential primitives (signed tokens, password hashes).
//!
//! This crate is intentionally decoupled from HTTP and storage.

pub mod claims;
pub mod password;
pub mod token;

pub use claims::{TokenClaims, TokenValidationError, validate_claims};
pub use password::{PasswordError, hash_password, verify_password};
pub use token::{Hs256Tokens, TOKEN_TTL_HOURS, TokenError, TokenVerifier};
