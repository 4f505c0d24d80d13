use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::wire::{EventWire, FeedbackWire};

/// Server-assigned lifecycle status of an event.
///
/// `completed` and `finished` are distinct values on the wire but mean the
/// same thing to the client: the event has ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    Upcoming,
    Ongoing,
    Completed,
    Finished,
}

impl EventStatus {
    pub fn has_ended(self) -> bool {
        matches!(self, Self::Completed | Self::Finished)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackKind {
    Positive,
    Neutral,
    Negative,
}

/// An event as the client sees it after wire normalization.
///
/// `average_rating` and `feedback_count` are per-page caches the backend
/// attaches on some endpoints only — they are never authoritative.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "EventWire")]
pub struct Event {
    pub id: String,
    pub title: String,
    pub description: String,
    pub date: NaiveDate,
    pub time: Option<NaiveTime>,
    pub location: String,
    pub organizer: String,
    pub image: Option<String>,
    pub creator_id: String,
    pub attendees: Vec<String>,
    pub status: EventStatus,
    pub average_rating: Option<f64>,
    pub feedback_count: Option<u64>,
}

impl Event {
    /// The exact start instant, when the backend supplied a time of day.
    pub fn start_instant(&self) -> Option<chrono::NaiveDateTime> {
        self.time.map(|t| self.date.and_time(t))
    }

    pub fn has_attendee(&self, user_id: &str) -> bool {
        self.attendees.iter().any(|a| a == user_id)
    }
}

/// Reference to an event carried inside a feedback record.
///
/// The backend returns either the plain id or the populated event object
/// depending on the endpoint; both compare through [`EventRef::id`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EventRef {
    Id(String),
    Embedded {
        #[serde(rename = "_id")]
        id: String,
    },
}

impl EventRef {
    pub fn id(&self) -> &str {
        match self {
            Self::Id(id) => id,
            Self::Embedded { id } => id,
        }
    }
}

/// One user's feedback on one event. By convention there is at most one
/// per (user, event) pair; the client searches for a single match and the
/// convention is not enforced here.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "FeedbackWire")]
pub struct Feedback {
    pub id: String,
    pub user_id: String,
    pub event_id: EventRef,
    pub comment: String,
    pub kind: FeedbackKind,
    pub rating: u8,
    pub is_anonymous: bool,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "fName", default)]
    pub first_name: String,
    #[serde(rename = "lName", default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
}

impl UserProfile {
    /// Display name as the pages render it: "First Last", trimmed.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}
