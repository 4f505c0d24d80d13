//! Storage key names, kept byte-identical to what earlier client builds
//! persisted so existing state stays readable.

/// Current bearer token key.
pub const AUTH_TOKEN: &str = "authToken";
/// Legacy bearer token key; still written and read for compatibility.
pub const LEGACY_TOKEN: &str = "token";
pub const USER_ID: &str = "userId";
/// Cached profile JSON.
pub const USER_DATA: &str = "userData";
/// Absolute expiry of the current token, epoch milliseconds.
pub const TOKEN_EXPIRATION: &str = "tokenExpiration";
/// Transient message shown once after an expiry-driven logout.
pub const AUTH_EXPIRED_MESSAGE: &str = "authExpiredMessage";

/// Everything a forced logout must remove, in both scopes.
pub const AUTH_KEYS: &[&str] = &[AUTH_TOKEN, LEGACY_TOKEN, USER_ID, USER_DATA, TOKEN_EXPIRATION];
