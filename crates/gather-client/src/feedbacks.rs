use gather_types::api::{FeedbackInput, FeedbackStatistics};
use gather_types::models::Feedback;
use gather_types::wire::FeedbackList;

use crate::{ApiClient, ApiError};

pub struct FeedbacksClient<'a> {
    pub(crate) api: &'a ApiClient,
}

impl FeedbacksClient<'_> {
    pub async fn create(&self, input: &FeedbackInput) -> Result<(), ApiError> {
        self.api.post_ack("feedbacks/create", input).await
    }

    pub async fn by_event(&self, event_id: &str) -> Result<Vec<Feedback>, ApiError> {
        Ok(self
            .api
            .get_optional::<FeedbackList>(&format!("feedbacks/event/{}", event_id))
            .await?
            .map(FeedbackList::into_vec)
            .unwrap_or_default())
    }

    /// The by-user endpoint sometimes wraps the array in `{ feedbacks }`;
    /// [`FeedbackList`] absorbs both shapes.
    pub async fn by_user(&self, user_id: &str) -> Result<Vec<Feedback>, ApiError> {
        Ok(self
            .api
            .get_optional::<FeedbackList>(&format!("feedbacks/user/{}", user_id))
            .await?
            .map(FeedbackList::into_vec)
            .unwrap_or_default())
    }

    pub async fn get_by_id(&self, feedback_id: &str) -> Result<Option<Feedback>, ApiError> {
        self.api
            .get_optional(&format!("feedbacks/{}", feedback_id))
            .await
    }

    pub async fn update(&self, feedback_id: &str, input: &FeedbackInput) -> Result<(), ApiError> {
        self.api
            .put_ack(&format!("feedbacks/{}", feedback_id), input)
            .await
    }

    pub async fn delete(&self, feedback_id: &str) -> Result<(), ApiError> {
        self.api
            .delete_ack(&format!("feedbacks/{}", feedback_id))
            .await
    }

    pub async fn statistics(&self) -> Result<FeedbackStatistics, ApiError> {
        self.api.get_json("feedbacks/stats/all").await
    }
}
