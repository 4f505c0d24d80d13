use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Result;
use chrono::Utc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use gather_store::Store;
use gather_types::models::UserProfile;
use gather_types::session::{LogoutReason, SessionEvent};

use crate::gate::Route;
use crate::hub::SessionHub;
use crate::token::{self, TokenError};

/// Period of the recurring expiry re-check. The one-shot timer can be lost
/// across suspend/resume, so the persisted expiry is re-read on this cadence
/// as well.
pub const POLL_PERIOD: Duration = Duration::from_secs(60);

const EXPIRED_MESSAGE: &str = "Your session has expired. Please log in again.";

/// Navigation seam. The monitor decides *where* to send the user; the shell
/// that owns the routing decides *how*.
pub trait Navigate: Send + Sync {
    fn navigate(&self, route: Route);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    /// No token in the store.
    Absent,
    Valid {
        expires_at_ms: i64,
    },
    /// Token present but already past its expiry; logout was forced.
    Expired,
    /// Token present but undecodable; logout was forced.
    Invalid(TokenError),
}

/// Owns the session lifecycle: decodes the persisted token, schedules the
/// one-shot logout at expiry, runs the recurring re-check, and performs
/// forced logout. Both background tasks die with the monitor.
pub struct SessionMonitor {
    store: Arc<Store>,
    hub: SessionHub,
    navigator: Arc<dyn Navigate>,
    expiry_task: Mutex<Option<JoinHandle<()>>>,
    poll_task: Mutex<Option<JoinHandle<()>>>,
}

impl SessionMonitor {
    pub fn new(store: Arc<Store>, hub: SessionHub, navigator: Arc<dyn Navigate>) -> Arc<Self> {
        Arc::new(Self {
            store,
            hub,
            navigator,
            expiry_task: Mutex::new(None),
            poll_task: Mutex::new(None),
        })
    }

    pub fn hub(&self) -> &SessionHub {
        &self.hub
    }

    /// Evaluate the persisted session and arm the timers.
    ///
    /// Called once at shell startup and again on every route change (the
    /// route matters only for where an unauthenticated user gets sent).
    pub fn start(self: &Arc<Self>, current_route: Route) -> Result<SessionStatus> {
        let Some(token) = self.store.token()? else {
            if !current_route.is_public() {
                self.navigator.navigate(Route::Login);
            }
            return Ok(SessionStatus::Absent);
        };

        match token::decode_expiry_ms(&token) {
            Err(e) => {
                warn!("could not read token expiry ({}), logging out", e);
                self.force_logout(LogoutReason::InvalidToken)?;
                Ok(SessionStatus::Invalid(e))
            }
            Ok(expires_at_ms) if expires_at_ms <= Utc::now().timestamp_millis() => {
                info!("token already expired, logging out");
                self.force_logout(LogoutReason::Expired)?;
                Ok(SessionStatus::Expired)
            }
            Ok(expires_at_ms) => {
                self.store.set_expiry(expires_at_ms)?;
                self.arm_expiry_timer(expires_at_ms);
                self.spawn_poll();
                let minutes = (expires_at_ms - Utc::now().timestamp_millis()) / 60_000;
                info!("session valid, auto logout in ~{} min", minutes);
                Ok(SessionStatus::Valid { expires_at_ms })
            }
        }
    }

    /// Install a fresh token after login/registration and arm the timers.
    pub fn login(
        self: &Arc<Self>,
        token: &str,
        user_id: &str,
        profile: Option<&UserProfile>,
    ) -> Result<SessionStatus> {
        let expires_at_ms = match token::decode_expiry_ms(token) {
            Ok(ms) => ms,
            Err(e) => {
                warn!("refusing login with undecodable token: {}", e);
                self.force_logout(LogoutReason::InvalidToken)?;
                return Ok(SessionStatus::Invalid(e));
            }
        };
        if expires_at_ms <= Utc::now().timestamp_millis() {
            warn!("refusing login with already-expired token");
            self.force_logout(LogoutReason::Expired)?;
            return Ok(SessionStatus::Expired);
        }

        self.store.set_token(token)?;
        self.store.set_user_id(user_id)?;
        if let Some(profile) = profile {
            self.store.cache_profile(profile)?;
        }
        self.store.set_expiry(expires_at_ms)?;

        self.arm_expiry_timer(expires_at_ms);
        self.spawn_poll();

        self.hub.emit(SessionEvent::LoggedIn {
            user_id: user_id.to_string(),
        });
        self.navigator.navigate(Route::Dashboard);
        Ok(SessionStatus::Valid { expires_at_ms })
    }

    /// User-requested logout.
    pub fn logout(&self) -> Result<()> {
        self.force_logout(LogoutReason::UserRequested)
    }

    /// End the session: cancel the pending one-shot, clear every auth key
    /// from both scopes, notify subscribers, and send the user to Login.
    ///
    /// Idempotent — from a logged-out state this only re-navigates.
    pub fn force_logout(&self, reason: LogoutReason) -> Result<()> {
        if let Some(handle) = self.expiry_task.lock().unwrap().take() {
            handle.abort();
        }

        let had_session = self.store.token()?.is_some();
        self.store.clear_auth_keys()?;

        if had_session {
            if reason == LogoutReason::Expired {
                self.store.set_expired_message(EXPIRED_MESSAGE)?;
            }
            info!("session ended ({:?})", reason);
            self.hub.emit(SessionEvent::LoggedOut { reason });
        }

        self.navigator.navigate(Route::Login);
        Ok(())
    }

    /// Cancel both background tasks. Called by the owning shell on
    /// teardown; also runs on Drop.
    pub fn teardown(&self) {
        if let Some(handle) = self.expiry_task.lock().unwrap().take() {
            handle.abort();
        }
        if let Some(handle) = self.poll_task.lock().unwrap().take() {
            handle.abort();
        }
    }

    fn arm_expiry_timer(self: &Arc<Self>, expires_at_ms: i64) {
        let delay_ms = (expires_at_ms - Utc::now().timestamp_millis()).max(0) as u64;
        let weak = Arc::downgrade(self);

        let handle = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            let Some(monitor) = weak.upgrade() else {
                return;
            };
            info!("token reached its expiry");
            if let Err(e) = monitor.force_logout(LogoutReason::Expired) {
                warn!("logout at expiry failed: {}", e);
            }
        });

        if let Some(old) = self.expiry_task.lock().unwrap().replace(handle) {
            old.abort();
        }
    }

    fn spawn_poll(self: &Arc<Self>) {
        let mut guard = self.poll_task.lock().unwrap();
        if guard.as_ref().is_some_and(|h| !h.is_finished()) {
            return;
        }

        let weak = Arc::downgrade(self);
        *guard = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(POLL_PERIOD);
            // interval fires immediately; the startup path already checked.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let Some(monitor) = weak.upgrade() else {
                    return;
                };
                monitor.poll_once();
            }
        }));
    }

    /// One recurring check: logout if the persisted expiry has passed.
    fn poll_once(&self) {
        let expired = matches!(
            (self.store.token(), self.store.expiry()),
            (Ok(Some(_)), Ok(Some(expiry_ms))) if expiry_ms <= Utc::now().timestamp_millis()
        );
        if expired {
            info!("periodic check found the persisted expiry in the past");
            if let Err(e) = self.force_logout(LogoutReason::Expired) {
                warn!("logout from periodic check failed: {}", e);
            }
        }
    }
}

impl Drop for SessionMonitor {
    fn drop(&mut self) {
        self.teardown();
    }
}
