// src/core/auth/token.rs

//! HMAC-SHA256 signed bearer tokens.
//!
//! A token is `hex(claims_json) . hex(hmac_sha256(claims_json))`. Validation
//! verifies the signature in constant time before the claims are trusted,
//! then checks expiry.

use crate::core::StratoError;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use std::time::Duration;

type HmacSha256 = Hmac<Sha256>;

const INVALID_CREDENTIALS: &str = "Invalid authentication credentials";
const TOKEN_EXPIRED: &str = "Token has expired";

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    username: String,
    /// Expiry as UTC seconds since the epoch.
    exp: i64,
}

/// A freshly issued token together with its expiry instant.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Issues and validates bearer credentials carrying the caller's identity.
pub struct TokenService {
    secret: Vec<u8>,
    ttl: ChronoDuration,
}

impl TokenService {
    pub fn new(secret: impl Into<Vec<u8>>, ttl: Duration) -> Self {
        Self {
            secret: secret.into(),
            ttl: ChronoDuration::from_std(ttl).unwrap_or_else(|_| ChronoDuration::seconds(0)),
        }
    }

    fn sign(&self, payload: &[u8]) -> Vec<u8> {
        let mut mac = HmacSha256::new_from_slice(&self.secret)
            .expect("HMAC accepts keys of any length");
        mac.update(payload);
        mac.finalize().into_bytes().to_vec()
    }

    /// Issues a token for `username`, valid for the configured TTL.
    pub fn issue(&self, username: &str) -> Result<IssuedToken, StratoError> {
        let expires_at = Utc::now() + self.ttl;
        let claims = Claims {
            username: username.to_string(),
            exp: expires_at.timestamp(),
        };
        let payload = serde_json::to_vec(&claims)?;
        let signature = self.sign(&payload);
        Ok(IssuedToken {
            token: format!("{}.{}", hex::encode(&payload), hex::encode(signature)),
            expires_at,
        })
    }

    /// Validates a token and returns the username it was issued for.
    pub fn validate(&self, token: &str) -> Result<String, StratoError> {
        let invalid = || StratoError::Authentication(INVALID_CREDENTIALS.to_string());

        let (payload_hex, signature_hex) = token.split_once('.').ok_or_else(invalid)?;
        let payload = hex::decode(payload_hex).map_err(|_| invalid())?;
        let signature = hex::decode(signature_hex).map_err(|_| invalid())?;

        let mut mac = HmacSha256::new_from_slice(&self.secret)
            .expect("HMAC accepts keys of any length");
        mac.update(&payload);
        mac.verify_slice(&signature).map_err(|_| invalid())?;

        let claims: Claims = serde_json::from_slice(&payload).map_err(|_| invalid())?;
        if claims.exp <= Utc::now().timestamp() {
            return Err(StratoError::Authentication(TOKEN_EXPIRED.to_string()));
        }
        Ok(claims.username)
    }
}
