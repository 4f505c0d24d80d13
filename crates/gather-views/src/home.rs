//! Dashboard reconciler: all events plus the current user's feedback,
//! with join/cancel gating and the optimistic attendance overlay.

use std::collections::HashSet;

use chrono::{NaiveDate, NaiveDateTime};
use futures_util::future::join;
use tracing::warn;

use gather_client::ApiClient;
use gather_types::api::FeedbackInput;
use gather_types::models::{Event, EventStatus, Feedback, FeedbackKind};

use crate::derive;
use crate::notice::{Notice, NoticeQueue};
use crate::overlay::AttendanceOverlay;
use crate::pagination::Pager;

/// What the feedback form submits.
#[derive(Debug, Clone)]
pub struct FeedbackDraft {
    pub comment: String,
    pub kind: FeedbackKind,
    pub rating: u8,
    pub is_anonymous: bool,
}

pub struct HomeView {
    user_id: Option<String>,
    events: Vec<Event>,
    feedbacks: Vec<Feedback>,
    /// Confirmed joins, rebuilt from every fetch.
    joined: HashSet<String>,
    overlay: AttendanceOverlay,
    pub available_pager: Pager,
    pub past_pager: Pager,
    pub feedback_pager: Pager,
    pub notices: NoticeQueue,
    error: Option<String>,
    loading: bool,
}

impl HomeView {
    pub fn new(user_id: Option<String>) -> Self {
        Self {
            user_id,
            events: Vec::new(),
            feedbacks: Vec::new(),
            joined: HashSet::new(),
            overlay: AttendanceOverlay::default(),
            available_pager: Pager::new(8),
            past_pager: Pager::new(8),
            feedback_pager: Pager::new(5),
            notices: NoticeQueue::default(),
            error: None,
            loading: false,
        }
    }

    /// Fetch the working set and re-derive everything. `today` is the
    /// snapshot used to reconcile the partition pagers.
    pub async fn load(&mut self, api: &ApiClient, today: NaiveDate) {
        self.loading = true;

        let events_client = api.events();
        let feedbacks_client = api.feedbacks();
        let events_fut = events_client.list();
        let feedbacks_fut = async {
            match self.user_id.as_deref() {
                Some(user_id) => feedbacks_client.by_user(user_id).await,
                None => Ok(Vec::new()),
            }
        };
        let (events_res, feedbacks_res) = join(events_fut, feedbacks_fut).await;

        match events_res {
            Ok(events) => {
                self.error = None;
                self.ingest_events(events, today);
            }
            Err(e) => {
                warn!("loading events failed: {}", e);
                self.error = Some(e.to_string());
                self.ingest_events(Vec::new(), today);
            }
        }

        match feedbacks_res {
            Ok(feedbacks) => self.ingest_feedbacks(feedbacks),
            Err(e) => {
                warn!("loading feedbacks failed: {}", e);
                self.ingest_feedbacks(Vec::new());
            }
        }

        self.loading = false;
    }

    /// Replace the event collection with an authoritative fetch: joined is
    /// rebuilt from scratch and every pending optimistic edit is settled.
    fn ingest_events(&mut self, events: Vec<Event>, today: NaiveDate) {
        self.joined = match self.user_id.as_deref() {
            Some(user_id) => derive::joined_event_ids(&events, user_id),
            None => HashSet::new(),
        };
        self.overlay.confirm_all();
        self.events = events;

        let (available, past) = derive::partition_by_date(&self.events, today);
        self.available_pager.reconcile(available.len());
        self.past_pager.reconcile(past.len());
    }

    fn ingest_feedbacks(&mut self, feedbacks: Vec<Feedback>) {
        self.feedbacks = feedbacks;
        self.feedback_pager.reconcile(self.feedbacks.len());
    }

    // -- Derived accessors --

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn feedbacks(&self) -> &[Feedback] {
        &self.feedbacks
    }

    /// The joined set as rendered: confirmed plus pending edits.
    pub fn joined(&self) -> HashSet<String> {
        self.overlay.joined_view(&self.joined)
    }

    pub fn available_page(&self, today: NaiveDate) -> Vec<&Event> {
        let (available, _) = derive::partition_by_date(&self.events, today);
        self.available_pager.slice(&available).to_vec()
    }

    pub fn past_page(&self, today: NaiveDate) -> Vec<&Event> {
        let (_, past) = derive::partition_by_date(&self.events, today);
        self.past_pager.slice(&past).to_vec()
    }

    pub fn feedback_page(&self) -> &[Feedback] {
        self.feedback_pager.slice(&self.feedbacks)
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    // -- Actions --

    /// Join an event. Gating runs in the same order the page applied it;
    /// each violation is a warning notice, not an error.
    pub async fn join_event(&mut self, api: &ApiClient, event_id: &str, now: NaiveDateTime) {
        let Some(user_id) = self.user_id.clone() else {
            self.notices.push(Notice::warning(
                "Please log in to join events",
                "Authentication Required",
            ));
            return;
        };

        if self.joined().contains(event_id) {
            self.notices.push(Notice::info(
                "You have already joined this event",
                "Already Registered",
            ));
            return;
        }

        if let Some(event) = self.events.iter().find(|e| e.id == event_id) {
            if event.status == EventStatus::Ongoing {
                self.notices.push(Notice::warning(
                    "Cannot join an event that is currently ongoing",
                    "Event Already Started",
                ));
                return;
            }
            if event.status.has_ended() {
                self.notices.push(Notice::warning(
                    "Cannot join an event that has already ended",
                    "Event Completed",
                ));
                return;
            }
            if derive::within_join_cutoff(event, now) {
                self.notices.push(Notice::warning(
                    "Registration closes 24 hours before the event. You cannot join this event as it is within 24 hours of the start time.",
                    "Registration Deadline Passed",
                ));
                return;
            }
        }

        self.overlay.mark_join(event_id);

        match api.events().attend(event_id, &user_id).await {
            Ok(()) => {
                self.notices.push(Notice::success(
                    "Successfully joined the event! We look forward to seeing you there.",
                ));
                self.load(api, now.date()).await;
            }
            Err(e) => {
                self.overlay.revert(event_id);
                self.notices
                    .push(Notice::error(&e.to_string(), "Join Event Failed"));
            }
        }
    }

    pub async fn cancel_event(&mut self, api: &ApiClient, event_id: &str, now: NaiveDateTime) {
        let Some(user_id) = self.user_id.clone() else {
            self.notices.push(Notice::warning(
                "Please log in to cancel event participation",
                "Authentication Required",
            ));
            return;
        };

        if let Some(event) = self.events.iter().find(|e| e.id == event_id) {
            if event.status == EventStatus::Ongoing {
                self.notices.push(Notice::warning(
                    "You cannot cancel your participation while the event is ongoing.",
                    "Event Currently Active",
                ));
                return;
            }
            if derive::within_cancel_cutoff(event, now) {
                self.notices.push(Notice::warning(
                    "You cannot cancel your participation within 3 hours of the event start time.",
                    "Cancellation Deadline Passed",
                ));
                return;
            }
        }

        self.overlay.mark_cancel(event_id);

        match api.events().cancel_attendance(event_id, &user_id).await {
            Ok(()) => {
                self.notices.push(Notice::success(
                    "Successfully cancelled your participation. You can rejoin anytime!",
                ));
                self.load(api, now.date()).await;
            }
            Err(e) => {
                self.overlay.revert(event_id);
                self.notices
                    .push(Notice::error(&e.to_string(), "Cancellation Failed"));
            }
        }
    }

    /// Create or update the user's feedback for an event. The duplicate
    /// check routes a second submission into an update of the existing
    /// entry rather than a new row.
    pub async fn submit_feedback(&mut self, api: &ApiClient, event_id: &str, draft: FeedbackDraft) {
        let Some(user_id) = self.user_id.clone() else {
            self.notices.push(Notice::warning(
                "Please log in to submit feedback",
                "Authentication Required",
            ));
            return;
        };

        if draft.comment.trim().is_empty() || !(1..=5).contains(&draft.rating) {
            self.notices.push(Notice::error(
                "Missing required feedback fields",
                "Feedback Failed",
            ));
            return;
        }

        let input = FeedbackInput {
            user_id,
            event_id: event_id.to_string(),
            comment: draft.comment,
            kind: draft.kind,
            rating: draft.rating,
            is_anonymous: draft.is_anonymous,
        };

        let existing = derive::feedback_for_event(&self.feedbacks, event_id).map(|f| f.id.clone());
        let result = match &existing {
            Some(feedback_id) => api.feedbacks().update(feedback_id, &input).await,
            None => api.feedbacks().create(&input).await,
        };

        match result {
            Ok(()) => {
                let message = if existing.is_some() {
                    "Your feedback has been updated successfully!"
                } else {
                    "Thank you for your valuable feedback!"
                };
                self.notices.push(Notice::success(message));

                match api.feedbacks().by_user(input.user_id.as_str()).await {
                    Ok(feedbacks) => self.ingest_feedbacks(feedbacks),
                    Err(e) => warn!("feedback refetch failed: {}", e),
                }
            }
            Err(e) => {
                self.notices
                    .push(Notice::error(&e.to_string(), "Feedback Failed"));
            }
        }
    }
}
