//! Stateless request wrappers around the backend REST API.
//!
//! Every resource client goes through one [`ApiClient`]: bearer token
//! attached from the store when present, 404-on-read normalized to
//! empty/null, and error messages extracted in a fixed priority order so
//! callers can show them as-is.

pub mod emails;
pub mod events;
pub mod feedbacks;
pub mod uploads;
pub mod users;
pub mod validate;

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use gather_store::Store;

pub use emails::EmailsClient;
pub use events::EventsClient;
pub use feedbacks::FeedbacksClient;
pub use reqwest::StatusCode;
pub use uploads::UploadsClient;
pub use users::UsersClient;

const GENERIC_ERROR: &str = "An error occurred";

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// No response was received at all.
    #[error("Network error. Please check your connection.")]
    Network(#[source] reqwest::Error),

    /// The server answered with an error status. `message` follows the
    /// extraction priority: server `message` field, server `error` field,
    /// then a generic fallback.
    #[error("{message}")]
    Status { status: StatusCode, message: String },

    /// A response arrived but its shape was unrecognized.
    #[error("unrecognized response shape: {0}")]
    Decode(String),

    /// Client-side validation rejected the input before any request.
    #[error("{0}")]
    Validation(String),
}

impl ApiError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Pick the user-facing message out of an error body. Priority: `message`,
/// then `error`, then the generic fallback.
pub(crate) fn extract_message(body: Option<&serde_json::Value>) -> String {
    body.and_then(|value| {
        value
            .get("message")
            .and_then(|m| m.as_str())
            .or_else(|| value.get("error").and_then(|m| m.as_str()))
    })
    .unwrap_or(GENERIC_ERROR)
    .to_string()
}

#[derive(Debug, Clone)]
pub struct Config {
    pub base_url: String,
}

impl Config {
    /// `GATHER_API_URL` with the development default, `.env` honored.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        let base_url = std::env::var("GATHER_API_URL")
            .unwrap_or_else(|_| "http://localhost:5000/api".into());
        Self { base_url }
    }
}

/// Shared HTTP plumbing for all resource clients.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    store: Arc<Store>,
}

impl ApiClient {
    pub fn new(config: Config, store: Arc<Store>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            store,
        }
    }

    pub fn events(&self) -> EventsClient<'_> {
        EventsClient { api: self }
    }

    pub fn feedbacks(&self) -> FeedbacksClient<'_> {
        FeedbacksClient { api: self }
    }

    pub fn users(&self) -> UsersClient<'_> {
        UsersClient { api: self }
    }

    pub fn uploads(&self) -> UploadsClient<'_> {
        UploadsClient { api: self }
    }

    pub fn emails(&self) -> EmailsClient<'_> {
        EmailsClient { api: self }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// Re-read the token on every request — it can change under us.
    fn authorize(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.store.token() {
            Ok(Some(token)) => req.bearer_auth(token),
            _ => req,
        }
    }

    async fn send(&self, req: reqwest::RequestBuilder) -> Result<reqwest::Response, ApiError> {
        self.authorize(req).send().await.map_err(ApiError::Network)
    }

    async fn error_from(&self, resp: reqwest::Response) -> ApiError {
        let status = resp.status();
        let body: Option<serde_json::Value> = resp.json().await.ok();
        let message = extract_message(body.as_ref());
        debug!("request failed with {}: {}", status, message);
        ApiError::Status { status, message }
    }

    async fn decode<T: DeserializeOwned>(&self, resp: reqwest::Response) -> Result<T, ApiError> {
        if !resp.status().is_success() {
            return Err(self.error_from(resp).await);
        }
        let bytes = resp.bytes().await.map_err(ApiError::Network)?;
        serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode(e.to_string()))
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let resp = self.send(self.http.get(self.url(path))).await?;
        self.decode(resp).await
    }

    /// GET with 404 normalized to `None` — "not found" is not an error on
    /// read operations.
    pub(crate) async fn get_optional<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<Option<T>, ApiError> {
        let resp = self.send(self.http.get(self.url(path))).await?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        self.decode(resp).await.map(Some)
    }

    pub(crate) async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let resp = self.send(self.http.post(self.url(path)).json(body)).await?;
        self.decode(resp).await
    }

    /// POST where the caller only cares that the server accepted it — the
    /// views refetch afterwards instead of trusting mutation responses.
    pub(crate) async fn post_ack<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<(), ApiError> {
        let resp = self.send(self.http.post(self.url(path)).json(body)).await?;
        self.ack(resp).await
    }

    pub(crate) async fn post_empty(&self, path: &str) -> Result<(), ApiError> {
        let resp = self.send(self.http.post(self.url(path))).await?;
        self.ack(resp).await
    }

    pub(crate) async fn put_ack<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<(), ApiError> {
        let resp = self.send(self.http.put(self.url(path)).json(body)).await?;
        self.ack(resp).await
    }

    pub(crate) async fn delete_ack(&self, path: &str) -> Result<(), ApiError> {
        let resp = self.send(self.http.delete(self.url(path))).await?;
        self.ack(resp).await
    }

    pub(crate) async fn post_multipart(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> Result<serde_json::Value, ApiError> {
        let resp = self
            .send(self.http.post(self.url(path)).multipart(form))
            .await?;
        self.decode(resp).await
    }

    async fn ack(&self, resp: reqwest::Response) -> Result<(), ApiError> {
        if resp.status().is_success() {
            Ok(())
        } else {
            Err(self.error_from(resp).await)
        }
    }
}
