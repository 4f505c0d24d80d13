use anyhow::Result;
use rusqlite::OptionalExtension;
use tracing::debug;

use gather_types::models::UserProfile;

use crate::keys;
use crate::{Scope, Store};

impl Store {
    // -- Raw key-value access --

    pub fn get(&self, scope: Scope, key: &str) -> Result<Option<String>> {
        match scope {
            Scope::Persistent => self.with_conn(|conn| {
                let value = conn
                    .query_row("SELECT value FROM kv WHERE key = ?1", [key], |row| {
                        row.get(0)
                    })
                    .optional()?;
                Ok(value)
            }),
            Scope::Session => self.with_session(|map| map.get(key).cloned()),
        }
    }

    pub fn set(&self, scope: Scope, key: &str, value: &str) -> Result<()> {
        match scope {
            Scope::Persistent => self.with_conn(|conn| {
                conn.execute(
                    "INSERT INTO kv (key, value, updated_at) VALUES (?1, ?2, datetime('now'))
                     ON CONFLICT(key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
                    (key, value),
                )?;
                Ok(())
            }),
            Scope::Session => self.with_session(|map| {
                map.insert(key.to_string(), value.to_string());
            }),
        }
    }

    pub fn remove(&self, scope: Scope, key: &str) -> Result<()> {
        match scope {
            Scope::Persistent => self.with_conn(|conn| {
                conn.execute("DELETE FROM kv WHERE key = ?1", [key])?;
                Ok(())
            }),
            Scope::Session => self.with_session(|map| {
                map.remove(key);
            }),
        }
    }

    // -- Session keys --

    /// Current bearer token: the `authToken` key, falling back to the
    /// legacy `token` key older clients wrote.
    pub fn token(&self) -> Result<Option<String>> {
        if let Some(token) = self.get(Scope::Persistent, keys::AUTH_TOKEN)? {
            if !token.is_empty() {
                return Ok(Some(token));
            }
        }
        Ok(self
            .get(Scope::Persistent, keys::LEGACY_TOKEN)?
            .filter(|t| !t.is_empty()))
    }

    /// Tokens are replaced wholesale, never patched. Both key spellings
    /// are written so legacy readers keep working.
    pub fn set_token(&self, token: &str) -> Result<()> {
        self.set(Scope::Persistent, keys::AUTH_TOKEN, token)?;
        self.set(Scope::Persistent, keys::LEGACY_TOKEN, token)
    }

    pub fn user_id(&self) -> Result<Option<String>> {
        Ok(self
            .get(Scope::Persistent, keys::USER_ID)?
            .filter(|id| !id.is_empty()))
    }

    pub fn set_user_id(&self, user_id: &str) -> Result<()> {
        self.set(Scope::Persistent, keys::USER_ID, user_id)
    }

    /// Absolute token expiry in epoch milliseconds, as persisted by the
    /// session monitor. An unparseable value reads as absent.
    pub fn expiry(&self) -> Result<Option<i64>> {
        Ok(self
            .get(Scope::Persistent, keys::TOKEN_EXPIRATION)?
            .and_then(|raw| raw.parse::<i64>().ok()))
    }

    pub fn set_expiry(&self, epoch_ms: i64) -> Result<()> {
        self.set(Scope::Persistent, keys::TOKEN_EXPIRATION, &epoch_ms.to_string())
    }

    pub fn cached_profile(&self) -> Result<Option<UserProfile>> {
        let Some(raw) = self.get(Scope::Persistent, keys::USER_DATA)? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(profile) => Ok(Some(profile)),
            Err(e) => {
                debug!("discarding unreadable cached profile: {}", e);
                Ok(None)
            }
        }
    }

    pub fn cache_profile(&self, profile: &UserProfile) -> Result<()> {
        self.set(
            Scope::Persistent,
            keys::USER_DATA,
            &serde_json::to_string(profile)?,
        )
    }

    pub fn set_expired_message(&self, message: &str) -> Result<()> {
        self.set(Scope::Persistent, keys::AUTH_EXPIRED_MESSAGE, message)
    }

    /// Read-and-clear: the message is shown once.
    pub fn take_expired_message(&self) -> Result<Option<String>> {
        let msg = self.get(Scope::Persistent, keys::AUTH_EXPIRED_MESSAGE)?;
        if msg.is_some() {
            self.remove(Scope::Persistent, keys::AUTH_EXPIRED_MESSAGE)?;
        }
        Ok(msg)
    }

    /// Remove every auth key from both scopes. Safe to call when already
    /// logged out.
    pub fn clear_auth_keys(&self) -> Result<()> {
        for key in keys::AUTH_KEYS {
            self.remove(Scope::Persistent, key)?;
            self.remove(Scope::Session, key)?;
        }
        Ok(())
    }
}
