//! Per-user intake sessions
//!
//! Sessions live only for the lifetime of the process. Each user has its own
//! async mutex slot, so two turns for the same user run one after the other
//! while different users never wait on each other.

mod clock;

pub use clock::{Clock, SystemClock};

use crate::state_machine::{AdviceMode, Needs, Stage};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};

/// Default session lifetime
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(30 * 60);

/// Intake state for one user
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub stage: Stage,
    pub mode: Option<AdviceMode>,
    pub location: Option<String>,
    pub symptoms: Option<String>,
}

impl Session {
    pub fn new(user_id: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            user_id: user_id.into(),
            created_at: now,
            stage: Stage::AskMode,
            mode: None,
            location: None,
            symptoms: None,
        }
    }

    /// True once the session is strictly older than `ttl`.
    ///
    /// A clock that moved backwards never expires a session.
    pub fn is_expired(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        (now - self.created_at)
            .to_std()
            .is_ok_and(|age| age > ttl)
    }

    /// Start the next consultation: back to `AskMode` with nothing collected.
    /// `created_at` is kept, the TTL still counts from creation.
    pub fn begin_cycle(&mut self) {
        self.stage = Stage::AskMode;
        self.mode = None;
        self.location = None;
        self.symptoms = None;
    }

    pub fn needs(&self) -> Needs {
        self.stage.needs()
    }
}

/// Exclusive access to one user's session for the duration of a turn
pub type SessionGuard = OwnedMutexGuard<Session>;

/// Keyed map from user id to session, with TTL expiry on access
pub struct SessionStore {
    ttl: Duration,
    clock: Arc<dyn Clock>,
    slots: RwLock<HashMap<String, Arc<Mutex<Session>>>>,
}

impl SessionStore {
    pub fn new(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            ttl,
            clock,
            slots: RwLock::new(HashMap::new()),
        }
    }

    /// Lock the caller's session and expire it against the clock.
    ///
    /// The clock is read once the lock is held, since acquiring it may have
    /// waited on another turn's backend call.
    pub async fn checkout(&self, user_id: &str) -> SessionGuard {
        let slot = self.slot(user_id, self.clock.now()).await;
        let session = slot.lock_owned().await;
        self.renew_if_expired(session, user_id, self.clock.now())
    }

    /// Return the live session for `user_id`, replacing it with a fresh one
    /// when it is older than the TTL at `now`.
    ///
    /// The returned guard holds the user's lock; other turns for the same
    /// user wait until it is dropped.
    pub async fn get_or_create(&self, user_id: &str, now: DateTime<Utc>) -> SessionGuard {
        let slot = self.slot(user_id, now).await;
        let session = slot.lock_owned().await;
        self.renew_if_expired(session, user_id, now)
    }

    fn renew_if_expired(
        &self,
        mut session: SessionGuard,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> SessionGuard {
        if session.is_expired(now, self.ttl) {
            tracing::info!(
                user_id = %user_id,
                stage = %session.stage,
                created_at = %session.created_at,
                "Session expired, starting fresh"
            );
            *session = Session::new(user_id, now);
        }

        session
    }

    /// Number of users with a session slot
    pub async fn len(&self) -> usize {
        self.slots.read().await.len()
    }

    async fn slot(&self, user_id: &str, now: DateTime<Utc>) -> Arc<Mutex<Session>> {
        {
            let slots = self.slots.read().await;
            if let Some(slot) = slots.get(user_id) {
                return slot.clone();
            }
        }

        let mut slots = self.slots.write().await;
        slots
            .entry(user_id.to_string())
            .or_insert_with(|| {
                tracing::debug!(user_id = %user_id, "Creating session");
                Arc::new(Mutex::new(Session::new(user_id, now)))
            })
            .clone()
    }
}
