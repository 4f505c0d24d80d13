use base64::engine::general_purpose::{STANDARD_NO_PAD, URL_SAFE_NO_PAD};
use base64::Engine;

use gather_types::api::TokenClaims;

/// Ways a bearer token can fail local inspection. Every variant forces a
/// logout — a token that cannot be decoded is never treated as valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("token is not three dot-separated segments")]
    Malformed,
    #[error("token payload is not base64 JSON")]
    Payload,
    #[error("token payload carries no exp claim")]
    MissingExp,
}

/// Decode the claims out of the middle segment of a JWT-shaped token.
///
/// No signature verification happens here — the backend owns that. The
/// client only needs `exp` (and opportunistically `sub`) to know when to
/// end the session on its own.
pub fn decode_claims(token: &str) -> Result<TokenClaims, TokenError> {
    let mut segments = token.split('.');
    let (Some(_), Some(payload), Some(_), None) = (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) else {
        return Err(TokenError::Malformed);
    };

    let bytes = decode_segment(payload).ok_or(TokenError::Payload)?;
    let value: serde_json::Value =
        serde_json::from_slice(&bytes).map_err(|_| TokenError::Payload)?;

    let exp = value
        .get("exp")
        .and_then(|v| v.as_i64())
        .ok_or(TokenError::MissingExp)?;
    let sub = value
        .get("sub")
        .and_then(|v| v.as_str())
        .map(str::to_string);

    Ok(TokenClaims { exp, sub })
}

/// Absolute expiry in epoch milliseconds (`exp` is in seconds on the wire).
pub fn decode_expiry_ms(token: &str) -> Result<i64, TokenError> {
    decode_claims(token).map(|claims| claims.exp * 1000)
}

fn decode_segment(segment: &str) -> Option<Vec<u8>> {
    let trimmed = segment.trim_end_matches('=');
    URL_SAFE_NO_PAD
        .decode(trimmed)
        .or_else(|_| STANDARD_NO_PAD.decode(trimmed))
        .ok()
}
