//! HMAC-signed login tokens.

use std::collections::HashSet;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use thiserror::Error;

use folio_core::AccountId;

use crate::claims::{TokenClaims, TokenValidationError, validate_claims};

/// Lifetime of an issued token.
pub const TOKEN_TTL_HOURS: i64 = 24;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("token signing failed: {0}")]
    Signing(String),

    #[error("invalid token: {0}")]
    Invalid(String),

    #[error(transparent)]
    Claims(#[from] TokenValidationError),
}

/// Verifies bearer tokens on protected routes.
pub trait TokenVerifier: Send + Sync {
    /// Returns the embedded account id of a well-signed, unexpired token.
    fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<AccountId, TokenError>;
}

/// Issues HS256 tokens and verifies any HMAC-family token signed with the
/// same symmetric key.
#[derive(Clone)]
pub struct Hs256Tokens {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl core::fmt::Debug for Hs256Tokens {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Hs256Tokens").field("ttl", &self.ttl).finish_non_exhaustive()
    }
}

impl Hs256Tokens {
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.algorithms = vec![Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];
        // Expiry is checked against the caller's clock in `validate_claims`.
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.required_spec_claims = HashSet::from(["exp".to_string()]);

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            ttl: Duration::hours(TOKEN_TTL_HOURS),
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Sign a token for `account` that expires `ttl` after `now`.
    pub fn issue(&self, account: AccountId, now: DateTime<Utc>) -> Result<String, TokenError> {
        let claims = TokenClaims::new(account, now, self.ttl);
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }
}

impl TokenVerifier for Hs256Tokens {
    fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<AccountId, TokenError> {
        let data = jsonwebtoken::decode::<TokenClaims>(token, &self.decoding, &self.validation)
            .map_err(|e| TokenError::Invalid(e.to_string()))?;
        validate_claims(&data.claims, now)?;
        Ok(data.claims.user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"test-secret";

    #[test]
    fn issued_token_verifies_to_the_account() {
        let tokens = Hs256Tokens::new(SECRET);
        let now = Utc::now();
        let token = tokens.issue(AccountId::new(1), now).unwrap();

        assert_eq!(tokens.verify(&token, now), Ok(AccountId::new(1)));
    }

    #[test]
    fn token_expires_after_a_day() {
        let tokens = Hs256Tokens::new(SECRET);
        let now = Utc::now();
        let token = tokens.issue(AccountId::new(1), now).unwrap();

        assert!(tokens.verify(&token, now + Duration::hours(23)).is_ok());
        assert_eq!(
            tokens.verify(&token, now + Duration::hours(24)),
            Err(TokenError::Claims(TokenValidationError::Expired))
        );
    }

    #[test]
    fn wrong_key_is_rejected() {
        let now = Utc::now();
        let token = Hs256Tokens::new(b"other-secret").issue(AccountId::new(1), now).unwrap();

        assert!(matches!(Hs256Tokens::new(SECRET).verify(&token, now), Err(TokenError::Invalid(_))));
    }

    #[test]
    fn any_hmac_algorithm_with_the_same_key_is_accepted() {
        let now = Utc::now();
        let claims = TokenClaims::new(AccountId::new(3), now, Duration::hours(1));
        let token = jsonwebtoken::encode(
            &Header::new(Algorithm::HS512),
            &claims,
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap();

        assert_eq!(Hs256Tokens::new(SECRET).verify(&token, now), Ok(AccountId::new(3)));
    }

    #[test]
    fn unsigned_token_is_rejected() {
        // {"alg":"none","typ":"JWT"} . {"user_id":1,"iat":1700000000,"exp":4102444800} . <empty>
        let token = "eyJhbGciOiJub25lIiwidHlwIjoiSldUIn0.eyJ1c2VyX2lkIjoxLCJpYXQiOjE3MDAwMDAwMDAsImV4cCI6NDEwMjQ0NDgwMH0.";
        assert!(matches!(
            Hs256Tokens::new(SECRET).verify(token, Utc::now()),
            Err(TokenError::Invalid(_))
        ));
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(Hs256Tokens::new(SECRET).verify("not-a-token", Utc::now()).is_err());
    }
}
