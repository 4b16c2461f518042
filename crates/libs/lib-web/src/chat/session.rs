//! # Session Registry
//!
//! Tracks the WebSocket sessions currently connected to the global room.
//!
//! Each session owns the sending half of a bounded channel; the connection
//! task drains the receiving half into the socket. Delivery never blocks:
//! a full or closed channel drops the payload for that session only.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::{mpsc, RwLock};
use tracing::debug;
use uuid::Uuid;

/// Outbound buffer per session before payloads start being dropped.
pub const OUTBOUND_BUFFER: usize = 64;

/// Opaque connection identity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Result of handing a payload to a session's outbound channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Delivery {
    Queued,
    /// Channel full; the payload was dropped for this session. Only
    /// broadcasts see this; replies wait for room instead.
    Dropped,
    /// The connection task has gone away.
    Closed,
}

/// A connected client handle.
#[derive(Clone, Debug)]
pub struct Session {
    id: SessionId,
    outbound: mpsc::Sender<String>,
}

impl Session {
    /// Open a new session and return it with the receiver its connection task drains.
    pub fn open() -> (Self, mpsc::Receiver<String>) {
        Self::with_capacity(OUTBOUND_BUFFER)
    }

    pub fn with_capacity(capacity: usize) -> (Self, mpsc::Receiver<String>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self { id: SessionId::new(), outbound: tx }, rx)
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Queue a payload without waiting.
    pub fn deliver(&self, payload: String) -> Delivery {
        match self.outbound.try_send(payload) {
            Ok(()) => Delivery::Queued,
            Err(mpsc::error::TrySendError::Full(_)) => Delivery::Dropped,
            Err(mpsc::error::TrySendError::Closed(_)) => Delivery::Closed,
        }
    }

    /// Queue a payload, waiting for buffer room if the client is behind.
    pub async fn deliver_waiting(&self, payload: String) -> Delivery {
        match self.outbound.send(payload).await {
            Ok(()) => Delivery::Queued,
            Err(_) => Delivery::Closed,
        }
    }
}

/// Live set of connected sessions.
pub struct SessionRegistry {
    sessions: RwLock<HashMap<SessionId, Session>>,
    /// Tracks the map size so count queries skip the lock.
    active_count: AtomicUsize,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            active_count: AtomicUsize::new(0),
        }
    }

    /// Add a session.
    pub async fn register(&self, session: Session) {
        let id = session.id();
        let mut sessions = self.sessions.write().await;
        if sessions.insert(id, session).is_none() {
            self.active_count.fetch_add(1, Ordering::Relaxed);
        }
        debug!(session_id = %id, active = sessions.len(), "session registered");
    }

    /// Remove a session. Unknown ids are ignored.
    pub async fn unregister(&self, id: SessionId) {
        let mut sessions = self.sessions.write().await;
        if sessions.remove(&id).is_some() {
            self.active_count.fetch_sub(1, Ordering::Relaxed);
        }
        debug!(session_id = %id, active = sessions.len(), "session unregistered");
    }

    /// Snapshot of every connected session, in no particular order.
    ///
    /// The lock is released before the caller iterates, so connects and
    /// disconnects proceed while a broadcast is in flight.
    pub async fn all(&self) -> Vec<Session> {
        self.sessions.read().await.values().cloned().collect()
    }

    pub async fn get(&self, id: SessionId) -> Option<Session> {
        self.sessions.read().await.get(&id).cloned()
    }

    /// Number of connected sessions.
    pub fn connection_count(&self) -> usize {
        self.active_count.load(Ordering::Relaxed)
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
