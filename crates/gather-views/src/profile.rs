//! Profile reconciler. The profile is fetched fresh and written through
//! to the store's cache; when the backend is unreachable the cached copy
//! keeps the page usable.

use chrono::NaiveDate;
use futures_util::future::join3;
use tracing::warn;

use gather_client::ApiClient;
use gather_store::Store;
use gather_types::api::UpdateProfileRequest;
use gather_types::models::{Event, UserProfile};

use crate::derive;
use crate::notice::{Notice, NoticeQueue};

/// Editable profile fields, as typed into the form.
#[derive(Debug, Default, Clone)]
pub struct ProfileForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
}

pub struct ProfileView {
    user_id: Option<String>,
    profile: Option<UserProfile>,
    my_events: Vec<Event>,
    attended_count: usize,
    pub notices: NoticeQueue,
    error: Option<String>,
    loading: bool,
}

impl ProfileView {
    pub fn new(user_id: Option<String>) -> Self {
        Self {
            user_id,
            profile: None,
            my_events: Vec::new(),
            attended_count: 0,
            notices: NoticeQueue::default(),
            error: None,
            loading: false,
        }
    }

    pub async fn load(&mut self, api: &ApiClient, store: &Store) {
        let Some(user_id) = self.user_id.clone() else {
            // The auth gate redirects before this page renders.
            return;
        };
        self.loading = true;

        let users_client = api.users();
        let events_client = api.events();
        let (profile_res, mine_res, all_res) = join3(
            users_client.profile(&user_id),
            events_client.by_user(&user_id),
            events_client.list(),
        )
        .await;

        match profile_res {
            Ok(Some(profile)) => {
                if let Err(e) = store.cache_profile(&profile) {
                    warn!("could not cache profile: {}", e);
                }
                self.error = None;
                self.profile = Some(profile);
            }
            Ok(None) => {
                // The account vanished server-side; whatever is cached is
                // the best the page can show.
                self.profile = store.cached_profile().ok().flatten();
            }
            Err(e) => {
                warn!("profile fetch failed, falling back to cache: {}", e);
                self.profile = store.cached_profile().ok().flatten();
                if self.profile.is_none() {
                    self.error = Some(e.to_string());
                }
            }
        }

        self.my_events = mine_res.unwrap_or_else(|e| {
            warn!("loading own events failed: {}", e);
            Vec::new()
        });

        self.attended_count = match all_res {
            Ok(events) => derive::joined_event_ids(&events, &user_id).len(),
            Err(e) => {
                warn!("loading events for attendance count failed: {}", e);
                0
            }
        };

        self.loading = false;
    }

    // -- Derived accessors --

    pub fn profile(&self) -> Option<&UserProfile> {
        self.profile.as_ref()
    }

    pub fn my_events(&self) -> &[Event] {
        &self.my_events
    }

    pub fn attended_count(&self) -> usize {
        self.attended_count
    }

    pub fn upcoming_created(&self, today: NaiveDate) -> usize {
        derive::partition_by_date(&self.my_events, today).0.len()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Write the edited profile through to the backend and the cache. A
    /// rejected server write still updates the local copy so the page
    /// reflects what the user typed; the cache reconciles on next load.
    pub async fn update_profile(&mut self, api: &ApiClient, store: &Store, form: &ProfileForm) {
        let Some(user_id) = self.user_id.clone() else {
            return;
        };

        let req = UpdateProfileRequest {
            first_name: form.first_name.trim().to_string(),
            last_name: form.last_name.trim().to_string(),
            email: form.email.trim().to_lowercase(),
            phone: form.phone.trim().to_string(),
        };

        let updated = UserProfile {
            id: user_id.clone(),
            first_name: req.first_name.clone(),
            last_name: req.last_name.clone(),
            email: req.email.clone(),
            phone: req.phone.clone(),
        };

        match api.users().update_profile(&user_id, &req).await {
            Ok(()) => {
                self.notices
                    .push(Notice::success("Profile updated successfully!"));
            }
            Err(e) => {
                warn!("server rejected profile update, keeping local copy: {}", e);
                self.notices.push(Notice::warning(
                    "Profile saved locally; the server could not be updated.",
                    "Partial Update",
                ));
            }
        }

        if let Err(e) = store.cache_profile(&updated) {
            warn!("could not cache profile: {}", e);
        }
        self.profile = Some(updated);
    }
}
