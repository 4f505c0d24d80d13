pub mod keys;
pub mod migrations;
pub mod queries;

use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

/// Where a value lives. `Persistent` survives restarts (the localStorage
/// analogue); `Session` dies with the process (the sessionStorage
/// analogue). Auth keys are mirrored into both and cleared from both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Persistent,
    Session,
}

/// Persisted client state. Single source of truth for "is a user logged
/// in": a non-empty token means authenticated until proven expired.
pub struct Store {
    conn: Mutex<Connection>,
    session: Mutex<HashMap<String, String>>,
}

impl Store {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;

        // WAL mode for concurrent reads
        conn.pragma_update(None, "journal_mode", "WAL")?;

        migrations::run(&conn)?;

        info!("Client state store opened at {}", path.display());
        Ok(Self {
            conn: Mutex::new(conn),
            session: Mutex::new(HashMap::new()),
        })
    }

    /// Throwaway store for tests and ephemeral shells.
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        migrations::run(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
            session: Mutex::new(HashMap::new()),
        })
    }

    pub fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let conn = self
            .conn
            .lock()
            .map_err(|e| anyhow::anyhow!("store lock poisoned: {}", e))?;
        f(&conn)
    }

    pub(crate) fn with_session<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut HashMap<String, String>) -> T,
    {
        let mut map = self
            .session
            .lock()
            .map_err(|e| anyhow::anyhow!("session map poisoned: {}", e))?;
        Ok(f(&mut map))
    }
}
