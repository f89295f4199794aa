//! Persistence for the session blob: one JSON file, overwritten wholesale
//! on every change and removed wholesale on reset.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::StoreError;
use crate::session::Session;

/// Reads and writes the single persisted session file.
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).ok();
            }
        }
        SessionStore { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the stored session. `Ok(None)` when no file exists yet.
    pub fn load(&self) -> Result<Option<Session>, StoreError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let json = fs::read_to_string(&self.path).map_err(|e| StoreError::Read {
            path: self.path.clone(),
            source: e,
        })?;
        let session = serde_json::from_str(&json).map_err(|e| StoreError::Parse {
            path: self.path.clone(),
            source: e,
        })?;
        Ok(Some(session))
    }

    /// Rehydrate at startup: a missing file yields the default lobby
    /// session, and an unreadable one degrades to an in-memory run.
    pub fn load_or_default(&self) -> Session {
        match self.load() {
            Ok(Some(session)) => {
                debug!(path = %self.path.display(), "restored stored session");
                session
            }
            Ok(None) => Session::new(),
            Err(err) => {
                warn!(%err, "stored session unreadable, starting fresh");
                Session::new()
            }
        }
    }

    /// Write the session, replacing any previous blob. Writes to a
    /// temporary file first so a failed write never truncates the old state.
    pub fn save(&self, session: &Session) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(session)?;

        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, json).map_err(|e| StoreError::Write {
            path: tmp.clone(),
            source: e,
        })?;
        fs::rename(&tmp, &self.path).map_err(|e| StoreError::Write {
            path: self.path.clone(),
            source: e,
        })?;
        Ok(())
    }

    /// Best-effort save after a transition. A failed write is logged and
    /// otherwise unobserved; the in-memory session stays authoritative.
    pub fn persist(&self, session: &Session) {
        if let Err(err) = self.save(session) {
            warn!(%err, "could not persist session");
        }
    }

    /// Remove the stored blob entirely (session reset).
    pub fn clear(&self) -> Result<(), StoreError> {
        if self.path.exists() {
            fs::remove_file(&self.path).map_err(|e| StoreError::Write {
                path: self.path.clone(),
                source: e,
            })?;
        }
        Ok(())
    }

    /// Best-effort variant of [`clear`](Self::clear).
    pub fn discard(&self) {
        if let Err(err) = self.clear() {
            warn!(%err, "could not remove stored session");
        }
    }
}
