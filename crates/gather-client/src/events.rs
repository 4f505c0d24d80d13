use gather_types::api::{AttendRequest, EventInput, FeedbackInput, UpdateStatusRequest};
use gather_types::models::{Event, EventStatus, Feedback};

use crate::{ApiClient, ApiError};

/// CRUD plus the attendance actions on `events/*`.
///
/// Mutations return `()` — the pages refetch the authoritative state
/// afterwards instead of trusting whatever shape the mutation echoes back.
pub struct EventsClient<'a> {
    pub(crate) api: &'a ApiClient,
}

impl EventsClient<'_> {
    pub async fn list(&self) -> Result<Vec<Event>, ApiError> {
        Ok(self
            .api
            .get_optional("events/getAllEvents")
            .await?
            .unwrap_or_default())
    }

    pub async fn get_by_id(&self, event_id: &str) -> Result<Option<Event>, ApiError> {
        self.api
            .get_optional(&format!("events/getEventById/{}", event_id))
            .await
    }

    pub async fn by_user(&self, user_id: &str) -> Result<Vec<Event>, ApiError> {
        Ok(self
            .api
            .get_optional(&format!("events/getEventsByUserId/{}", user_id))
            .await?
            .unwrap_or_default())
    }

    pub async fn create(&self, input: &EventInput) -> Result<(), ApiError> {
        self.api.post_ack("events/createEvent", input).await
    }

    pub async fn update(&self, event_id: &str, input: &EventInput) -> Result<(), ApiError> {
        self.api
            .put_ack(&format!("events/updateEvent/{}", event_id), input)
            .await
    }

    pub async fn delete(&self, event_id: &str) -> Result<(), ApiError> {
        self.api
            .delete_ack(&format!("events/deleteEvent/{}", event_id))
            .await
    }

    pub async fn update_status(
        &self,
        event_id: &str,
        status: EventStatus,
    ) -> Result<(), ApiError> {
        self.api
            .put_ack(
                &format!("events/updateEventStatus/{}", event_id),
                &UpdateStatusRequest {
                    eventstatus: status,
                },
            )
            .await
    }

    /// Ask the backend to geocode the event's stored location. The path
    /// spelling is the backend's own.
    pub async fn request_coordinates(&self, event_id: &str) -> Result<(), ApiError> {
        self.api
            .get_optional::<serde_json::Value>(&format!("events/inputCordinates/{}", event_id))
            .await
            .map(|_| ())
    }

    pub async fn attend(&self, event_id: &str, user_id: &str) -> Result<(), ApiError> {
        self.api
            .post_ack(
                &format!("events/attendEvent/{}", event_id),
                &AttendRequest {
                    user_id: user_id.to_string(),
                },
            )
            .await
    }

    pub async fn cancel_attendance(&self, event_id: &str, user_id: &str) -> Result<(), ApiError> {
        self.api
            .post_ack(
                &format!("events/cancelEventAttendance/{}", event_id),
                &AttendRequest {
                    user_id: user_id.to_string(),
                },
            )
            .await
    }

    /// Event-scoped feedback creation; the backend also accepts these
    /// through `feedbacks/create`.
    pub async fn add_feedback(
        &self,
        event_id: &str,
        input: &FeedbackInput,
    ) -> Result<(), ApiError> {
        self.api
            .post_ack(&format!("events/addFeedbackToEvent/{}", event_id), input)
            .await
    }

    /// Event-scoped feedback listing (`events/getEventFeedbacks`); the
    /// general-purpose listing lives on [`crate::FeedbacksClient`].
    pub async fn feedbacks_for(&self, event_id: &str) -> Result<Vec<Feedback>, ApiError> {
        Ok(self
            .api
            .get_optional::<gather_types::wire::FeedbackList>(&format!(
                "events/getEventFeedbacks/{}",
                event_id
            ))
            .await?
            .map(|list| list.into_vec())
            .unwrap_or_default())
    }
}
