//! Identity token service
//!
//! Stateless signed bearer tokens: HS256 JWT carrying the user id, valid
//! for 12 hours from issuance. Nothing is persisted server-side.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Token lifetime: 12 hours from issuance
pub const TOKEN_TTL: Duration = Duration::from_secs(12 * 60 * 60);

/// Token claims
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: Uuid,
    iat: usize,
    exp: usize,
}

/// Token errors
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    /// Bad signature, expired, or otherwise unusable token
    #[error("Invalid token")]
    Invalid,

    #[error("Token service failure: {0}")]
    Internal(String),
}

/// Issues and validates identity tokens with a shared signing key.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenService {
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
        }
    }

    /// Issue a signed token embedding `user_id`, expiring after 12 hours.
    pub fn issue(&self, user_id: Uuid) -> Result<String, TokenError> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|_| TokenError::Internal("System clock is before UNIX_EPOCH".into()))?;
        let exp = now + TOKEN_TTL;

        let claims = Claims {
            sub: user_id,
            iat: now.as_secs() as usize,
            exp: exp.as_secs() as usize,
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Internal(format!("Failed to sign token: {e}")))
    }

    /// Validate a token and return the embedded user id.
    ///
    /// Tampering, expiry, and malformed tokens all collapse into
    /// `TokenError::Invalid`; callers learn nothing beyond "not valid".
    pub fn validate(&self, token: &str) -> Result<Uuid, TokenError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims.sub)
            .map_err(|err| match err.kind() {
                jsonwebtoken::errors::ErrorKind::Base64(_)
                | jsonwebtoken::errors::ErrorKind::Json(_)
                | jsonwebtoken::errors::ErrorKind::Utf8(_) => TokenError::Invalid,
                jsonwebtoken::errors::ErrorKind::ExpiredSignature
                | jsonwebtoken::errors::ErrorKind::InvalidToken
                | jsonwebtoken::errors::ErrorKind::InvalidSignature
                | jsonwebtoken::errors::ErrorKind::ImmatureSignature
                | jsonwebtoken::errors::ErrorKind::MissingRequiredClaim(_) => TokenError::Invalid,
                other => TokenError::Internal(format!("Failed to validate token: {other:?}")),
            })
    }
}
