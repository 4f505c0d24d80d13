//! Derived state, recomputed from scratch on every fetch. All functions
//! take "now" as an argument so one snapshot covers a whole pass.
//!
//! Two temporal rules coexist deliberately: list partitions compare
//! date-only (an event later today still counts as available), while the
//! join/cancel deadlines compare the full date+time instant.

use std::collections::HashSet;

use chrono::{NaiveDate, NaiveDateTime};

use gather_types::models::{Event, Feedback};

/// Join deadline: registration closes this many hours before start.
pub const JOIN_CUTOFF_HOURS: f64 = 24.0;
/// Cancellation deadline.
pub const CANCEL_CUTOFF_HOURS: f64 = 3.0;

/// Every event id whose attendee list contains the user. Rebuilt whole on
/// each ingest — never patched incrementally.
pub fn joined_event_ids(events: &[Event], user_id: &str) -> HashSet<String> {
    events
        .iter()
        .filter(|event| event.has_attendee(user_id))
        .map(|event| event.id.clone())
        .collect()
}

/// Date-only: the event's day is strictly before today.
pub fn is_past(event: &Event, today: NaiveDate) -> bool {
    event.date < today
}

/// Split into (available, past). Ties — events today — go to available.
pub fn partition_by_date<'a>(
    events: &'a [Event],
    today: NaiveDate,
) -> (Vec<&'a Event>, Vec<&'a Event>) {
    let mut available = Vec::new();
    let mut past = Vec::new();
    for event in events {
        if is_past(event, today) {
            past.push(event);
        } else {
            available.push(event);
        }
    }
    (available, past)
}

/// Signed hours from `now` to the event's exact start. `None` when the
/// backend never supplied a time of day — deadline gating then stays out
/// of the way and the date-only checks decide.
pub fn hours_until(event: &Event, now: NaiveDateTime) -> Option<f64> {
    let start = event.start_instant()?;
    let millis = (start - now).num_milliseconds();
    Some(millis as f64 / 3_600_000.0)
}

/// Strictly inside the window: already-started events are someone else's
/// problem (the earlier past/status checks).
fn within_cutoff(event: &Event, now: NaiveDateTime, cutoff_hours: f64) -> bool {
    match hours_until(event, now) {
        Some(hours) => hours > 0.0 && hours < cutoff_hours,
        None => false,
    }
}

pub fn within_join_cutoff(event: &Event, now: NaiveDateTime) -> bool {
    within_cutoff(event, now, JOIN_CUTOFF_HOURS)
}

pub fn within_cancel_cutoff(event: &Event, now: NaiveDateTime) -> bool {
    within_cutoff(event, now, CANCEL_CUTOFF_HOURS)
}

/// The user's feedback for an event — at most one by convention. The id
/// on the feedback may be plain or an embedded object; `EventRef::id`
/// unwraps both.
pub fn feedback_for_event<'a>(
    feedbacks: &'a [Feedback],
    event_id: &str,
) -> Option<&'a Feedback> {
    feedbacks
        .iter()
        .find(|feedback| feedback.event_id.id() == event_id)
}

/// Mean rating for display next to an event. Not authoritative — a cache
/// over whatever page of feedback happens to be loaded.
pub fn average_rating(feedbacks: &[Feedback]) -> Option<f64> {
    if feedbacks.is_empty() {
        return None;
    }
    let sum: u32 = feedbacks.iter().map(|f| f.rating as u32).sum();
    Some(sum as f64 / feedbacks.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use gather_types::models::{EventRef, EventStatus, FeedbackKind};

    fn event(id: &str, date: &str, time: Option<&str>, attendees: &[&str]) -> Event {
        Event {
            id: id.into(),
            title: format!("event {}", id),
            description: String::new(),
            date: date.parse().unwrap(),
            time: time.map(|t| chrono::NaiveTime::parse_from_str(t, "%H:%M").unwrap()),
            location: "here".into(),
            organizer: "org".into(),
            image: None,
            creator_id: "creator".into(),
            attendees: attendees.iter().map(|s| s.to_string()).collect(),
            status: EventStatus::Upcoming,
            average_rating: None,
            feedback_count: None,
        }
    }

    fn feedback(id: &str, event_id: EventRef, rating: u8) -> Feedback {
        Feedback {
            id: id.into(),
            user_id: "u1".into(),
            event_id,
            comment: "ok".into(),
            kind: FeedbackKind::Neutral,
            rating,
            is_anonymous: false,
            created_at: None,
        }
    }

    #[test]
    fn joined_set_matches_attendee_membership_exactly() {
        let events = vec![
            event("e1", "2025-08-10", None, &["u1", "u2"]),
            event("e2", "2025-08-11", None, &["u2"]),
            event("e3", "2025-08-12", None, &["u1", "u1"]), // duplicate entry
            event("e4", "2025-08-13", None, &[]),
        ];

        let joined = joined_event_ids(&events, "u1");
        assert_eq!(
            joined,
            HashSet::from(["e1".to_string(), "e3".to_string()])
        );
        assert!(joined_event_ids(&events, "nobody").is_empty());
    }

    #[test]
    fn partition_sends_today_to_available() {
        let today = NaiveDate::from_ymd_opt(2025, 8, 6).unwrap();
        let events = vec![
            event("past", "2025-08-05", None, &[]),
            event("today", "2025-08-06", None, &[]),
            event("future", "2025-08-07", None, &[]),
        ];

        let (available, past) = partition_by_date(&events, today);
        let ids = |v: &[&Event]| v.iter().map(|e| e.id.clone()).collect::<Vec<_>>();
        assert_eq!(ids(&available), vec!["today", "future"]);
        assert_eq!(ids(&past), vec!["past"]);
    }

    #[test]
    fn twenty_hours_out_blocks_join_but_not_cancel() {
        // Event tomorrow at 10:00; now is 20 hours before that.
        let e = event("e1", "2025-08-07", Some("10:00"), &[]);
        let now = NaiveDate::from_ymd_opt(2025, 8, 6)
            .unwrap()
            .and_hms_opt(14, 0, 0)
            .unwrap();

        assert_eq!(hours_until(&e, now), Some(20.0));
        assert!(within_join_cutoff(&e, now));
        assert!(!within_cancel_cutoff(&e, now));
    }

    #[test]
    fn cutoffs_are_strict_at_both_ends() {
        let e = event("e1", "2025-08-07", Some("10:00"), &[]);
        let at = |h: u32, m: u32| {
            NaiveDate::from_ymd_opt(2025, 8, 6)
                .unwrap()
                .and_hms_opt(h, m, 0)
                .unwrap()
        };

        // Exactly 24h out: not yet inside the window.
        assert!(!within_join_cutoff(&e, at(10, 0)));
        // A minute later it is.
        assert!(within_join_cutoff(&e, at(10, 1)));

        // Start time reached: duration is zero, the window no longer applies.
        let start = NaiveDate::from_ymd_opt(2025, 8, 7)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        assert!(!within_join_cutoff(&e, start));
        assert!(!within_cancel_cutoff(&e, start));
    }

    #[test]
    fn missing_time_disables_deadline_gating() {
        let e = event("e1", "2025-08-07", None, &[]);
        let now = NaiveDate::from_ymd_opt(2025, 8, 6)
            .unwrap()
            .and_hms_opt(23, 0, 0)
            .unwrap();
        assert_eq!(hours_until(&e, now), None);
        assert!(!within_join_cutoff(&e, now));
        assert!(!within_cancel_cutoff(&e, now));
    }

    #[test]
    fn feedback_lookup_unwraps_embedded_event_ids() {
        let feedbacks = vec![
            feedback("f1", EventRef::Id("E9".into()), 4),
            feedback("f2", EventRef::Embedded { id: "E1".into() }, 5),
        ];

        let hit = feedback_for_event(&feedbacks, "E1").unwrap();
        assert_eq!(hit.id, "f2");
        assert!(feedback_for_event(&feedbacks, "E2").is_none());
    }

    #[test]
    fn average_rating_over_loaded_feedback() {
        assert_eq!(average_rating(&[]), None);
        let feedbacks = vec![
            feedback("f1", EventRef::Id("e".into()), 2),
            feedback("f2", EventRef::Id("e".into()), 5),
        ];
        assert_eq!(average_rating(&feedbacks), Some(3.5));
    }
}
