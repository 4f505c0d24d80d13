//! Login/register flows: pre-submit validation, the users client, then
//! handing the fresh token to the session monitor.

use std::sync::Arc;

use gather_client::validate::RegistrationForm;
use gather_client::{ApiClient, StatusCode};
use gather_session::{SessionMonitor, SessionStatus};
use gather_types::api::LoginRequest;

use crate::notice::Notice;

#[derive(Debug)]
pub enum RegisterOutcome {
    /// The backend returned a token; the session is live.
    LoggedIn(SessionStatus),
    /// Account created, no token issued — the user signs in manually.
    ProceedToLogin,
}

pub async fn login(
    api: &ApiClient,
    monitor: &Arc<SessionMonitor>,
    email: &str,
    password: &str,
) -> Result<SessionStatus, Notice> {
    if email.trim().is_empty() || password.is_empty() {
        return Err(Notice::warning("Please fill in all fields", "Login Failed"));
    }

    let req = LoginRequest {
        email: email.trim().to_lowercase(),
        password: password.to_string(),
    };
    let users_client = api.users();
    let resp = users_client
        .login(&req)
        .await
        .map_err(|e| Notice::error(&e.to_string(), "Login Failed"))?;

    let Some(token) = resp.token.clone() else {
        return Err(Notice::error(
            "Login succeeded but the response carried no token",
            "Login Failed",
        ));
    };
    let Some(user_id) = resp.resolved_user_id().map(str::to_string) else {
        return Err(Notice::error(
            "Login succeeded but the response carried no user id",
            "Login Failed",
        ));
    };

    monitor
        .login(&token, &user_id, resp.user.as_ref())
        .map_err(|e| Notice::error(&e.to_string(), "Login Failed"))
}

pub async fn register(
    api: &ApiClient,
    monitor: &Arc<SessionMonitor>,
    form: &RegistrationForm,
) -> Result<RegisterOutcome, Notice> {
    // Client-side rules block the request entirely.
    let req = form
        .validate()
        .map_err(|e| Notice::error(&e.to_string(), "Registration Failed"))?;

    let users_client = api.users();
    let resp = users_client.register(&req).await.map_err(|e| {
        let message = match e.status() {
            Some(StatusCode::CONFLICT) => {
                "An account with this email already exists.".to_string()
            }
            _ => e.to_string(),
        };
        Notice::error(&message, "Registration Failed")
    })?;

    match resp.token.clone() {
        Some(token) => {
            let Some(user_id) = resp.resolved_user_id().map(str::to_string) else {
                return Err(Notice::error(
                    "Registration succeeded but the response carried no user id",
                    "Registration Failed",
                ));
            };
            let status = monitor
                .login(&token, &user_id, resp.user.as_ref())
                .map_err(|e| Notice::error(&e.to_string(), "Registration Failed"))?;
            Ok(RegisterOutcome::LoggedIn(status))
        }
        None => Ok(RegisterOutcome::ProceedToLogin),
    }
}
