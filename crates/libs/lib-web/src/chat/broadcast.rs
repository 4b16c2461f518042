//! Payload fan-out to connected sessions.

use std::sync::Arc;

use tracing::{debug, warn};

use super::session::{Delivery, SessionId, SessionRegistry};

/// Delivers payloads to one session or to every connected session.
#[derive(Clone)]
pub struct BroadcastEngine {
    registry: Arc<SessionRegistry>,
}

impl BroadcastEngine {
    pub fn new(registry: Arc<SessionRegistry>) -> Self {
        Self { registry }
    }

    /// Unicast to a single session. Returns whether the payload was queued.
    ///
    /// Unlike broadcasts, a reply is never dropped for a full buffer: it
    /// waits until the connection task drains room. A session that has
    /// already disconnected is skipped silently.
    pub async fn reply_to(&self, session_id: SessionId, payload: &str) -> bool {
        let Some(session) = self.registry.get(session_id).await else {
            debug!(session_id = %session_id, "reply target already disconnected");
            return false;
        };
        match session.deliver_waiting(payload.to_string()).await {
            Delivery::Queued => true,
            Delivery::Dropped | Delivery::Closed => {
                debug!(session_id = %session_id, "reply target closed");
                false
            }
        }
    }

    /// Deliver to every session in the registry at call time, the sender included.
    ///
    /// Returns the number of sessions the payload was queued for. A failed
    /// recipient never stops delivery to the rest.
    pub async fn broadcast_all(&self, payload: &str) -> usize {
        let sessions = self.registry.all().await;
        let mut delivered = 0usize;
        for session in &sessions {
            match session.deliver(payload.to_string()) {
                Delivery::Queued => delivered += 1,
                Delivery::Dropped => {
                    warn!(session_id = %session.id(), "broadcast dropped (outbound channel full)");
                }
                Delivery::Closed => {
                    debug!(session_id = %session.id(), "skipping closed session");
                }
            }
        }
        debug!(recipients = sessions.len(), delivered, "broadcast payload");
        delivered
    }
}
