use gather_types::api::{BulkInvitationRequest, InvitationRequest};

use crate::{ApiClient, ApiError};

/// Invitation mail, sent by the backend on the client's behalf.
pub struct EmailsClient<'a> {
    pub(crate) api: &'a ApiClient,
}

impl EmailsClient<'_> {
    pub async fn send_invitation(&self, req: &InvitationRequest) -> Result<(), ApiError> {
        self.api.post_ack("emails/send-invitation", req).await
    }

    pub async fn send_bulk_invitations(&self, req: &BulkInvitationRequest) -> Result<(), ApiError> {
        self.api.post_ack("emails/send-bulk-invitations", req).await
    }

    /// Invite everyone currently attending an event; the backend resolves
    /// the recipient list.
    pub async fn send_attendee_invitations(&self, event_id: &str) -> Result<(), ApiError> {
        self.api
            .post_empty(&format!("emails/send-attendee-invitation/{}", event_id))
            .await
    }
}
