//! Normalization boundary between backend response shapes and the internal
//! model types.
//!
//! The backend returns differently-shaped payloads for the same logical
//! resource depending on the endpoint (Mongo `_id` vs `id`, date-only vs
//! full ISO timestamps, bare arrays vs wrapped arrays). Every accepted
//! shape is mapped into exactly one internal variant here; anything
//! unrecognized is a decode error, never a silent empty result.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::Deserialize;
use tracing::warn;

use crate::models::{Event, EventRef, EventStatus, Feedback, FeedbackKind};

#[derive(Debug, thiserror::Error)]
pub enum NormalizeError {
    #[error("unparseable event date '{0}'")]
    Date(String),
    #[error("feedback rating {0} outside 1..=5")]
    Rating(i64),
}

// -- Events --

#[derive(Debug, Deserialize)]
pub struct EventWire {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub date: String,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub organizer: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(rename = "userId", default)]
    pub user_id: String,
    #[serde(default)]
    pub attendees: Vec<String>,
    #[serde(default = "default_status")]
    pub eventstatus: EventStatus,
    #[serde(rename = "averageRating", default)]
    pub average_rating: Option<f64>,
    #[serde(rename = "feedbackCount", default)]
    pub feedback_count: Option<u64>,
}

fn default_status() -> EventStatus {
    EventStatus::Upcoming
}

impl TryFrom<EventWire> for Event {
    type Error = NormalizeError;

    fn try_from(wire: EventWire) -> Result<Self, Self::Error> {
        let date = parse_event_date(&wire.date)?;
        let time = wire.time.as_deref().and_then(|t| parse_event_time(&wire.id, t));

        Ok(Event {
            id: wire.id,
            title: wire.title,
            description: wire.description,
            date,
            time,
            location: wire.location,
            organizer: wire.organizer,
            image: wire.image.filter(|s| !s.is_empty()),
            creator_id: wire.user_id,
            attendees: wire.attendees,
            status: wire.eventstatus,
            average_rating: wire.average_rating,
            feedback_count: wire.feedback_count,
        })
    }
}

/// Accepts both shapes the backend emits: a bare `YYYY-MM-DD` and a full
/// RFC 3339 timestamp.
fn parse_event_date(raw: &str) -> Result<NaiveDate, NormalizeError> {
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.date_naive());
    }
    Err(NormalizeError::Date(raw.to_string()))
}

/// `HH:MM` as entered in the form, occasionally `HH:MM:SS`. A missing or
/// garbled time degrades to "time unknown" rather than failing the whole
/// collection — deadline gating then treats the event as date-only.
fn parse_event_time(event_id: &str, raw: &str) -> Option<NaiveTime> {
    if raw.is_empty() {
        return None;
    }
    NaiveTime::parse_from_str(raw, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .map_err(|e| warn!("event {}: ignoring unparseable time '{}': {}", event_id, raw, e))
        .ok()
}

// -- Feedbacks --

#[derive(Debug, Deserialize)]
pub struct FeedbackWire {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(rename = "eventId")]
    pub event_id: EventRef,
    #[serde(default)]
    pub comment: String,
    #[serde(rename = "type")]
    pub kind: FeedbackKind,
    pub rating: i64,
    #[serde(rename = "isAnonymous", default)]
    pub is_anonymous: bool,
    #[serde(rename = "createdAt", default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl TryFrom<FeedbackWire> for Feedback {
    type Error = NormalizeError;

    fn try_from(wire: FeedbackWire) -> Result<Self, Self::Error> {
        if !(1..=5).contains(&wire.rating) {
            return Err(NormalizeError::Rating(wire.rating));
        }
        Ok(Feedback {
            id: wire.id,
            user_id: wire.user_id,
            event_id: wire.event_id,
            comment: wire.comment,
            kind: wire.kind,
            rating: wire.rating as u8,
            is_anonymous: wire.is_anonymous,
            created_at: wire.created_at,
        })
    }
}

/// The feedbacks-by-user endpoint wraps the array in an object; the
/// by-event endpoint returns it bare.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum FeedbackList {
    Wrapped { feedbacks: Vec<Feedback> },
    Bare(Vec<Feedback>),
}

impl FeedbackList {
    pub fn into_vec(self) -> Vec<Feedback> {
        match self {
            Self::Wrapped { feedbacks } => feedbacks,
            Self::Bare(list) => list,
        }
    }
}
