//! Unverified inspection of bearer token claims
//!
//! Tokens are decoded only to learn when they expire, so refreshes can be
//! scheduled ahead of time. The signature is never checked here; the server
//! validates every token on every protected request, and nothing in this
//! module is an authorization decision.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use serde_json::{Map, Value};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Refresh this long before the access token expires.
pub(crate) const REFRESH_MARGIN_MS: i64 = 60_000;

/// Never arm a refresh timer shorter than this.
pub(crate) const MIN_REFRESH_WAIT_MS: i64 = 30_000;

/// Decode the claims of a JWT-shaped bearer token without verifying it.
///
/// Returns `None` for anything that is not three dot-separated segments
/// with a base64url JSON object in the middle. Decode failure is not an
/// error condition: it means "no claims available".
pub fn decode_claims(token: &str) -> Option<Map<String, Value>> {
    let payload = token.split('.').nth(1)?;
    let bytes = URL_SAFE_NO_PAD.decode(payload).ok()?;
    match serde_json::from_slice::<Value>(&bytes).ok()? {
        Value::Object(claims) => Some(claims),
        _ => None,
    }
}

/// Absolute expiry of a token in milliseconds since the epoch, from its
/// `exp` claim. `None` when the token is absent, undecodable, or carries
/// no expiry.
pub fn token_expiry(token: &str) -> Option<i64> {
    let claims = decode_claims(token)?;
    let exp = claims.get("exp")?.as_i64()?;
    Some(exp * 1000)
}

/// Current wall-clock time in milliseconds since the epoch.
pub(crate) fn now_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::from_secs(0))
        .as_millis() as i64
}

/// How long to wait before proactively refreshing a token that expires at
/// `expires_at_ms`: one margin before expiry, clamped to the floor so a
/// stale expiry never produces a zero or negative wait.
pub(crate) fn refresh_delay(expires_at_ms: i64, now_ms: i64) -> Duration {
    let wait = (expires_at_ms - now_ms - REFRESH_MARGIN_MS).max(MIN_REFRESH_WAIT_MS);
    Duration::from_millis(wait as u64)
}
