use gather_types::api::{AuthResponse, LoginRequest, RegisterRequest, UpdateProfileRequest};
use gather_types::models::UserProfile;

use crate::{ApiClient, ApiError};

pub struct UsersClient<'a> {
    pub(crate) api: &'a ApiClient,
}

impl UsersClient<'_> {
    pub async fn register(&self, req: &RegisterRequest) -> Result<AuthResponse, ApiError> {
        self.api.post_json("users/reguser", req).await
    }

    pub async fn login(&self, req: &LoginRequest) -> Result<AuthResponse, ApiError> {
        self.api.post_json("users/loginUser", req).await
    }

    pub async fn profile(&self, user_id: &str) -> Result<Option<UserProfile>, ApiError> {
        self.api
            .get_optional(&format!("users/getUserbyId/{}", user_id))
            .await
    }

    pub async fn update_profile(
        &self,
        user_id: &str,
        req: &UpdateProfileRequest,
    ) -> Result<(), ApiError> {
        self.api
            .put_ack(&format!("users/updateUser/{}", user_id), req)
            .await
    }
}
