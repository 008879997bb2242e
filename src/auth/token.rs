//! Bearer token decoding
//!
//! The client never verifies signatures; it only reads the payload to learn who
//! is signed in and when the session ends. Any decoding problem means "no
//! session" and is never reported as an error.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use serde::{Deserialize, Deserializer, Serialize};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Claims carried in the token payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPayload {
    /// The user id
    pub sub: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub login: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub is_admin: bool,

    /// Expiry, seconds since the epoch
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,

    /// Issued at, seconds since the epoch
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
}

impl TokenPayload {
    /// Whether the token has expired at `now_ms` (milliseconds since the epoch).
    ///
    /// A payload without `exp` never expires.
    pub fn is_expired_at(&self, now_ms: i64) -> bool {
        match self.exp {
            Some(exp) => now_ms >= exp.saturating_mul(1000),
            None => false,
        }
    }

    /// Whether the token has expired now
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(now_millis())
    }
}

/// The signed-in user derived from a token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: String,
    pub login: String,
    pub is_admin: bool,
}

impl From<TokenPayload> for AuthUser {
    fn from(payload: TokenPayload) -> Self {
        Self {
            id: payload.sub,
            login: payload.login,
            is_admin: payload.is_admin,
        }
    }
}

/// Decode the payload segment of a `header.payload.signature` token.
///
/// Returns `None` for a wrong segment count, bad base64url, or a payload that
/// is not the expected JSON.
pub fn decode_payload(token: &str) -> Option<TokenPayload> {
    let mut segments = token.split('.');
    let (_header, payload, _signature) = (segments.next()?, segments.next()?, segments.next()?);
    if segments.next().is_some() {
        return None;
    }

    let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
    serde_json::from_slice(&bytes).ok()
}

/// The user a token belongs to, if it decodes and has not expired
pub fn user_from_token(token: &str) -> Option<AuthUser> {
    let payload = decode_payload(token)?;
    if payload.is_expired() {
        return None;
    }
    Some(payload.into())
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn now_millis() -> i64 {
    let elapsed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::from_secs(0));
    i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX)
}
