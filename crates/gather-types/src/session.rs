use serde::{Deserialize, Serialize};

/// Why a session ended. Expiry-driven logouts surface a "please log in
/// again" message; user-requested ones do not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogoutReason {
    UserRequested,
    Expired,
    InvalidToken,
}

/// Broadcast to every open view when the session changes, so none of them
/// has to poll storage.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum SessionEvent {
    LoggedIn { user_id: String },
    LoggedOut { reason: LogoutReason },
}
