//! Event-management reconciler: the create form flow, the user's own
//! events, and the same feedback plumbing as the dashboard. This page has
//! no deadline gating on join/cancel — status checks only.

use std::collections::HashSet;

use chrono::NaiveDate;
use futures_util::future::join3;
use tracing::warn;

use gather_client::uploads::UploadFile;
use gather_client::ApiClient;
use gather_types::api::{EventInput, FeedbackInput};
use gather_types::models::{Event, EventStatus, Feedback};

use crate::derive;
use crate::home::FeedbackDraft;
use crate::notice::{Notice, NoticeQueue};
use crate::overlay::AttendanceOverlay;

/// Create-event form state, as typed. `date` and `time` stay strings here
/// — the pickers produce `YYYY-MM-DD` and `HH:MM` and the backend wants
/// them verbatim.
#[derive(Debug, Default, Clone)]
pub struct EventForm {
    pub title: String,
    pub description: String,
    pub date: String,
    pub time: String,
    pub location: String,
    pub organizer: String,
}

impl EventForm {
    fn has_required_fields(&self) -> bool {
        !(self.title.trim().is_empty()
            || self.description.trim().is_empty()
            || self.date.trim().is_empty()
            || self.time.trim().is_empty()
            || self.location.trim().is_empty())
    }
}

pub struct EventsView {
    user_id: Option<String>,
    events: Vec<Event>,
    my_events: Vec<Event>,
    feedbacks: Vec<Feedback>,
    joined: HashSet<String>,
    overlay: AttendanceOverlay,
    pub notices: NoticeQueue,
    error: Option<String>,
    loading: bool,
}

impl EventsView {
    pub fn new(user_id: Option<String>) -> Self {
        Self {
            user_id,
            events: Vec::new(),
            my_events: Vec::new(),
            feedbacks: Vec::new(),
            joined: HashSet::new(),
            overlay: AttendanceOverlay::default(),
            notices: NoticeQueue::default(),
            error: None,
            loading: false,
        }
    }

    pub async fn load(&mut self, api: &ApiClient) {
        self.loading = true;

        let events_client = api.events();
        let feedbacks_client = api.feedbacks();
        let all_fut = events_client.list();
        let mine_fut = async {
            match self.user_id.as_deref() {
                Some(user_id) => events_client.by_user(user_id).await,
                None => Ok(Vec::new()),
            }
        };
        let feedbacks_fut = async {
            match self.user_id.as_deref() {
                Some(user_id) => feedbacks_client.by_user(user_id).await,
                None => Ok(Vec::new()),
            }
        };

        let (all_res, mine_res, feedbacks_res) = join3(all_fut, mine_fut, feedbacks_fut).await;

        match all_res {
            Ok(events) => {
                self.error = None;
                self.ingest_events(events);
            }
            Err(e) => {
                warn!("loading events failed: {}", e);
                self.error = Some(e.to_string());
                self.ingest_events(Vec::new());
            }
        }

        self.my_events = mine_res.unwrap_or_else(|e| {
            warn!("loading own events failed: {}", e);
            Vec::new()
        });
        self.feedbacks = feedbacks_res.unwrap_or_else(|e| {
            warn!("loading feedbacks failed: {}", e);
            Vec::new()
        });

        self.loading = false;
    }

    fn ingest_events(&mut self, events: Vec<Event>) {
        self.joined = match self.user_id.as_deref() {
            Some(user_id) => derive::joined_event_ids(&events, user_id),
            None => HashSet::new(),
        };
        self.overlay.confirm_all();
        self.events = events;
    }

    // -- Derived accessors --

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn my_events(&self) -> &[Event] {
        &self.my_events
    }

    pub fn feedbacks(&self) -> &[Feedback] {
        &self.feedbacks
    }

    pub fn joined(&self) -> HashSet<String> {
        self.overlay.joined_view(&self.joined)
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Date-only split of the full list; ties go to available.
    pub fn partitioned(&self, today: NaiveDate) -> (Vec<&Event>, Vec<&Event>) {
        derive::partition_by_date(&self.events, today)
    }

    pub fn my_partitioned(&self, today: NaiveDate) -> (Vec<&Event>, Vec<&Event>) {
        derive::partition_by_date(&self.my_events, today)
    }

    pub fn feedback_for(&self, event_id: &str) -> Option<&Feedback> {
        derive::feedback_for_event(&self.feedbacks, event_id)
    }

    // -- Actions --

    /// Create an event, uploading the image first when one was picked.
    /// An upload failure aborts the whole submission. Returns whether the
    /// event was created.
    pub async fn create_event(
        &mut self,
        api: &ApiClient,
        form: &EventForm,
        image: Option<UploadFile>,
    ) -> bool {
        let Some(user_id) = self.user_id.clone() else {
            self.notices.push(Notice::warning(
                "Please log in to create events",
                "Authentication Required",
            ));
            return false;
        };

        if !form.has_required_fields() {
            self.error = Some("Please fill in all required fields".to_string());
            return false;
        }

        let image_url = match image {
            Some(file) => match api.uploads().upload_image(file).await {
                Ok(url) => Some(url),
                Err(e) => {
                    self.notices
                        .push(Notice::error(&e.to_string(), "Image Upload Failed"));
                    return false;
                }
            },
            None => None,
        };

        let input = EventInput {
            title: form.title.trim().to_string(),
            description: form.description.trim().to_string(),
            date: form.date.clone(),
            time: form.time.clone(),
            location: form.location.trim().to_string(),
            organizer: form.organizer.trim().to_string(),
            image: image_url,
            creator_id: user_id,
        };

        match api.events().create(&input).await {
            Ok(()) => {
                self.error = None;
                self.notices.push(Notice::success(
                    "Event created successfully! Your event is now live and ready for registrations.",
                ));
                self.load(api).await;
                true
            }
            Err(e) => {
                self.error = Some(e.to_string());
                false
            }
        }
    }

    pub async fn delete_event(&mut self, api: &ApiClient, event_id: &str) {
        match api.events().delete(event_id).await {
            Ok(()) => {
                self.notices
                    .push(Notice::success("Event deleted successfully!"));
                self.load(api).await;
            }
            Err(e) => {
                warn!("delete failed: {}", e);
                self.notices.push(Notice::error(
                    "Failed to delete event. Please try again.",
                    "Deletion Failed",
                ));
            }
        }
    }

    pub async fn join_event(&mut self, api: &ApiClient, event_id: &str) {
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

        self.overlay.mark_join(event_id);

        match api.events().attend(event_id, &user_id).await {
            Ok(()) => {
                self.notices.push(Notice::success(
                    "Successfully joined the event! We look forward to seeing you there.",
                ));
                self.load(api).await;
            }
            Err(e) => {
                self.overlay.revert(event_id);
                self.notices
                    .push(Notice::error(&e.to_string(), "Join Event Failed"));
            }
        }
    }

    pub async fn cancel_event(&mut self, api: &ApiClient, event_id: &str) {
        let Some(user_id) = self.user_id.clone() else {
            self.notices.push(Notice::warning(
                "Please log in to cancel event participation",
                "Authentication Required",
            ));
            return;
        };

        self.overlay.mark_cancel(event_id);

        match api.events().cancel_attendance(event_id, &user_id).await {
            Ok(()) => {
                self.notices.push(Notice::success(
                    "Successfully cancelled your participation. You can rejoin anytime!",
                ));
                self.load(api).await;
            }
            Err(e) => {
                self.overlay.revert(event_id);
                self.notices
                    .push(Notice::error(&e.to_string(), "Cancellation Failed"));
            }
        }
    }

    /// Same duplicate-aware submit as the dashboard: an existing entry for
    /// the event becomes an update, a second fresh submission is refused.
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

        let existing = self.feedback_for(event_id).map(|f| f.id.clone());
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
                self.load(api).await;
            }
            Err(e) => {
                self.notices
                    .push(Notice::error(&e.to_string(), "Feedback Failed"));
            }
        }
    }

    /// Flag a second fresh submission before the form even opens.
    pub fn can_open_feedback_form(&mut self, event_id: &str) -> bool {
        if self.feedback_for(event_id).is_some() {
            self.notices.push(Notice::info(
                "You have already submitted feedback for this event. You can edit your existing feedback instead.",
                "Feedback Already Submitted",
            ));
            return false;
        }
        true
    }

    /// Mark an event ended, then refetch. Creator-side action.
    pub async fn mark_event_completed(&mut self, api: &ApiClient, event_id: &str) {
        match api
            .events()
            .update_status(event_id, EventStatus::Completed)
            .await
        {
            Ok(()) => self.load(api).await,
            Err(e) => {
                self.notices
                    .push(Notice::error(&e.to_string(), "Status Update Failed"));
            }
        }
    }

    /// Email every current attendee of one of the user's events.
    pub async fn invite_attendees(&mut self, api: &ApiClient, event_id: &str) {
        match api.emails().send_attendee_invitations(event_id).await {
            Ok(()) => {
                self.notices
                    .push(Notice::success("Invitations sent to all attendees!"));
            }
            Err(e) => {
                self.notices
                    .push(Notice::error(&e.to_string(), "Invitation Failed"));
            }
        }
    }
}
