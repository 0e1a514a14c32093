//! Cookie-backed sessions with sliding expiration.
//!
//! The store owns every session; handlers see a cloneable [`Session`]
//! handle. Each store operation is atomic on its own, nothing more: two
//! requests interleaving reads and writes on the same session id race,
//! and that window is accepted rather than designed away.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use serde_json::Value;
use uuid::Uuid;

/// Name of the cookie carrying the session id.
pub const SESSION_COOKIE_NAME: &str = "tinyweb_session";

#[derive(Debug)]
struct SessionInner {
    data: HashMap<String, Value>,
    expires: Instant,
}

/// Handle to one server-side session.
///
/// Cloning is cheap and refers to the same underlying state. Data access
/// takes a short lock per call; values are cloned out rather than borrowed.
#[derive(Debug, Clone)]
pub struct Session {
    id: Arc<str>,
    inner: Arc<Mutex<SessionInner>>,
}

impl Session {
    /// Creates a session with a fresh v4 UUID id, expiring after `ttl`.
    pub fn new(ttl: Duration) -> Self {
        Self::with_id(Uuid::new_v4().to_string(), ttl)
    }

    pub fn with_id(id: impl Into<Arc<str>>, ttl: Duration) -> Self {
        Self {
            id: id.into(),
            inner: Arc::new(Mutex::new(SessionInner {
                data: HashMap::new(),
                expires: Instant::now() + ttl,
            })),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns a clone of the value stored under `key`.
    pub fn get(&self, key: &str) -> Option<Value> {
        self.lock().data.get(key).cloned()
    }

    pub fn set(&self, key: impl Into<String>, value: Value) {
        self.lock().data.insert(key.into(), value);
    }

    pub fn remove(&self, key: &str) -> Option<Value> {
        self.lock().data.remove(key)
    }

    /// Pushes expiry out to `now + ttl` (sliding expiration).
    pub fn touch(&self, ttl: Duration) {
        self.lock().expires = Instant::now() + ttl;
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        self.lock().expires < now
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, SessionInner> {
        // Lock poisoning only happens if a holder panicked; the data is
        // plain key/value state, safe to keep serving.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Concurrent id -> session map.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: Mutex<HashMap<String, Session>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> Option<Session> {
        self.lock().get(id).cloned()
    }

    pub fn insert(&self, session: Session) {
        self.lock().insert(session.id().to_string(), session);
    }

    pub fn remove(&self, id: &str) {
        self.lock().remove(id);
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Point-in-time listing of all sessions.
    ///
    /// The lock is held only while handles are cloned out, so the sweep
    /// never serializes against request traffic while it iterates.
    pub fn snapshot(&self) -> Vec<Session> {
        self.lock().values().cloned().collect()
    }

    /// Removes every session whose expiry has passed. Returns the number
    /// of sessions removed.
    pub fn sweep_expired(&self, now: Instant) -> usize {
        let mut removed = 0;

        for session in self.snapshot() {
            if session.is_expired(now) {
                self.remove(session.id());
                removed += 1;
            }
        }

        removed
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Session>> {
        self.sessions.lock().unwrap_or_else(|e| e.into_inner())
    }
}
