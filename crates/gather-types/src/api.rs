use serde::{Deserialize, Serialize};

use crate::models::{EventStatus, FeedbackKind, UserProfile};

// -- Token claims --

/// Claims the client reads out of the bearer token payload. The canonical
/// definition lives here in gather-types — the session monitor decodes the
/// payload without verifying the signature (verification is the backend's
/// job), so only the fields the client acts on are modeled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Expiry, seconds since the epoch.
    pub exp: i64,
    #[serde(default)]
    pub sub: Option<String>,
}

// -- Auth --

#[derive(Debug, PartialEq, Serialize)]
pub struct RegisterRequest {
    #[serde(rename = "fName")]
    pub first_name: String,
    #[serde(rename = "lName")]
    pub last_name: String,
    pub email: String,
    /// Digits only — validation strips formatting before submit.
    pub phone: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login/registration response. Some backend versions return the id at the
/// top level, others only inside the user object; registration may return
/// no token at all, in which case the user logs in manually afterwards.
#[derive(Debug, Deserialize)]
pub struct AuthResponse {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(rename = "userId", default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub user: Option<UserProfile>,
}

impl AuthResponse {
    pub fn resolved_user_id(&self) -> Option<&str> {
        self.user_id
            .as_deref()
            .or_else(|| self.user.as_ref().map(|u| u.id.as_str()))
    }
}

#[derive(Debug, Serialize)]
pub struct UpdateProfileRequest {
    #[serde(rename = "fName")]
    pub first_name: String,
    #[serde(rename = "lName")]
    pub last_name: String,
    pub email: String,
    pub phone: String,
}

// -- Events --

/// Body for event creation and full update.
#[derive(Debug, Clone, Serialize)]
pub struct EventInput {
    pub title: String,
    pub description: String,
    /// `YYYY-MM-DD`, as the date picker produces.
    pub date: String,
    /// `HH:MM`.
    pub time: String,
    pub location: String,
    pub organizer: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(rename = "userId")]
    pub creator_id: String,
}

#[derive(Debug, Serialize)]
pub struct AttendRequest {
    #[serde(rename = "userId")]
    pub user_id: String,
}

#[derive(Debug, Serialize)]
pub struct UpdateStatusRequest {
    pub eventstatus: EventStatus,
}

// -- Feedbacks --

#[derive(Debug, Clone, Serialize)]
pub struct FeedbackInput {
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(rename = "eventId")]
    pub event_id: String,
    pub comment: String,
    #[serde(rename = "type")]
    pub kind: FeedbackKind,
    pub rating: u8,
    #[serde(rename = "isAnonymous")]
    pub is_anonymous: bool,
}

/// Aggregate numbers from `feedbacks/stats/all`. The exact shape varies by
/// backend version; everything is optional with sane zero defaults.
#[derive(Debug, Default, Deserialize)]
pub struct FeedbackStatistics {
    #[serde(rename = "totalFeedbacks", alias = "total", default)]
    pub total: u64,
    #[serde(rename = "averageRating", default)]
    pub average_rating: Option<f64>,
    #[serde(rename = "positiveCount", default)]
    pub positive: u64,
    #[serde(rename = "neutralCount", default)]
    pub neutral: u64,
    #[serde(rename = "negativeCount", default)]
    pub negative: u64,
}

// -- Emails --

#[derive(Debug, Serialize)]
pub struct InvitationRequest {
    pub email: String,
    #[serde(rename = "eventId", skip_serializing_if = "Option::is_none")]
    pub event_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct BulkInvitationRequest {
    pub emails: Vec<String>,
    #[serde(rename = "eventId", skip_serializing_if = "Option::is_none")]
    pub event_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
