//! In-memory session store
//!
//! Maps session identifiers to their [`SessionState`]. A session without a
//! selected case has no entry. Entries idle for longer than the store's max
//! age are dropped on access and purged on every selection.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;

use super::{SessionError, SessionId, SessionState};
use crate::catalogue::Catalogue;

#[derive(Debug)]
struct Entry {
    state: SessionState,
    last_accessed: DateTime<Utc>,
}

impl Entry {
    fn is_expired(&self, max_age: Duration, now: DateTime<Utc>) -> bool {
        now - self.last_accessed > max_age
    }
}

/// Shared, cloneable session store
#[derive(Debug, Clone)]
pub struct SessionStore {
    entries: Arc<RwLock<HashMap<SessionId, Entry>>>,
    max_age: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(Duration::hours(24))
    }
}

impl SessionStore {
    /// Create a store whose sessions expire after `max_age` of inactivity
    #[must_use]
    pub fn new(max_age: Duration) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            max_age,
        }
    }

    /// Select a case for a session, replacing any previous state
    ///
    /// An unknown case is logged and leaves the session untouched.
    pub fn select_case(
        &self,
        id: &SessionId,
        catalogue: &Catalogue,
        case_id: &str,
    ) -> Result<(), SessionError> {
        let state = match SessionState::select(catalogue, case_id) {
            Ok(state) => state,
            Err(err) => {
                tracing::error!(session = %id, case_id, "Template not found");
                return Err(err);
            }
        };

        self.purge_expired();
        self.entries.write().insert(
            id.clone(),
            Entry {
                state,
                last_accessed: Utc::now(),
            },
        );
        tracing::info!(session = %id, case_id, "Case selected");
        Ok(())
    }

    /// Run `f` against the session state
    pub fn read<R>(
        &self,
        id: &SessionId,
        f: impl FnOnce(&SessionState) -> R,
    ) -> Result<R, SessionError> {
        self.update(id, |state| Ok(f(state)))
    }

    /// Run `f` against the mutable session state
    pub fn update<R>(
        &self,
        id: &SessionId,
        f: impl FnOnce(&mut SessionState) -> Result<R, SessionError>,
    ) -> Result<R, SessionError> {
        let now = Utc::now();
        let mut entries = self.entries.write();

        if entries
            .get(id)
            .is_some_and(|entry| entry.is_expired(self.max_age, now))
        {
            entries.remove(id);
        }

        let entry = entries.get_mut(id).ok_or(SessionError::NoSelection)?;
        entry.last_accessed = now;
        f(&mut entry.state)
    }

    /// Drop a session's state
    pub fn clear(&self, id: &SessionId) {
        self.entries.write().remove(id);
    }

    /// Remove every expired session, returning how many were dropped
    pub fn purge_expired(&self) -> usize {
        let now = Utc::now();
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired(self.max_age, now));
        let purged = before - entries.len();
        if purged > 0 {
            tracing::debug!(purged, "Expired sessions purged");
        }
        purged
    }

    /// Number of sessions with a selected case
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Whether no session has a selected case
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}
