// Connection registry
// Tracks attached robot channels and fans serialized commands out to them

use parking_lot::Mutex;
use std::collections::HashMap;
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{debug, info, warn};
use uuid::Uuid;

pub type ConnectionId = String;

/// Result of one fan-out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BroadcastOutcome {
    /// Whether any channel was registered when the broadcast started
    pub had_channels: bool,
    /// Channels the payload was queued on
    pub delivered: usize,
    /// Channels detached because their queue was full or closed
    pub dropped: Vec<ConnectionId>,
}

/// Set of live channels. A channel present here has an open outbound queue.
///
/// One lock covers registration and fan-out, so queue order on every
/// channel matches the order in which broadcasts were issued.
pub struct ConnectionRegistry {
    channels: Mutex<HashMap<ConnectionId, mpsc::Sender<String>>>,
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self {
            channels: Mutex::new(HashMap::new()),
        }
    }

    /// Register a channel's outbound queue and return its id.
    pub fn attach(&self, sender: mpsc::Sender<String>) -> ConnectionId {
        let connection_id = Uuid::new_v4().to_string();
        self.channels.lock().insert(connection_id.clone(), sender);
        info!("Robot channel attached: {}", connection_id);
        connection_id
    }

    /// Remove a channel. Returns false if it was already gone.
    pub fn detach(&self, connection_id: &ConnectionId) -> bool {
        let removed = self.channels.lock().remove(connection_id).is_some();
        if removed {
            info!("Robot channel detached: {}", connection_id);
        } else {
            debug!("Channel {} already detached", connection_id);
        }
        removed
    }

    /// Queue `payload` on every channel without waiting. Channels whose
    /// queue is full or closed are detached; the rest are unaffected.
    pub fn broadcast(&self, payload: &str) -> BroadcastOutcome {
        let mut channels = self.channels.lock();
        if channels.is_empty() {
            return BroadcastOutcome::default();
        }

        let mut outcome = BroadcastOutcome {
            had_channels: true,
            ..BroadcastOutcome::default()
        };

        channels.retain(|connection_id, sender| match sender.try_send(payload.to_string()) {
            Ok(()) => {
                outcome.delivered += 1;
                true
            }
            Err(TrySendError::Full(_)) => {
                warn!("Outbound queue full for {}, detaching channel", connection_id);
                outcome.dropped.push(connection_id.clone());
                false
            }
            Err(TrySendError::Closed(_)) => {
                warn!("Outbound queue closed for {}, detaching channel", connection_id);
                outcome.dropped.push(connection_id.clone());
                false
            }
        });

        outcome
    }

    pub fn len(&self) -> usize {
        self.channels.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.lock().is_empty()
    }

    pub fn contains(&self, connection_id: &ConnectionId) -> bool {
        self.channels.lock().contains_key(connection_id)
    }
}
