//! Relay - the context object shared by both request surfaces
//!
//! Owns the robot state and the connection registry. Request handlers and
//! channel handlers only ever reach them through the methods here.

use crate::config::RelayConfig;
use crate::registry::{BroadcastOutcome, ConnectionId, ConnectionRegistry};
use crate::state::RobotState;
use parking_lot::Mutex;
use rover_core::protocol::{Position, RobotCommand, Telemetry};
use rover_core::Error;
use serde_json::json;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Where captured frames reported on a channel are sent.
#[derive(Debug, Clone)]
pub enum FrameIngress {
    /// Submit in-process through [`Relay::submit_frame`].
    Direct,
    /// POST `{"image": ...}` to a frame endpoint, normally this relay's own.
    Http {
        client: reqwest::Client,
        url: String,
        timeout: Duration,
    },
}

impl FrameIngress {
    pub fn http(url: impl Into<String>, timeout: Duration) -> Self {
        FrameIngress::Http {
            client: reqwest::Client::new(),
            url: url.into(),
            timeout,
        }
    }
}

pub struct Relay {
    state: Mutex<RobotState>,
    registry: ConnectionRegistry,
    frame_ingress: FrameIngress,
}

impl Default for Relay {
    fn default() -> Self {
        Self::new(FrameIngress::Direct)
    }
}

impl Relay {
    pub fn new(frame_ingress: FrameIngress) -> Self {
        Self {
            state: Mutex::new(RobotState::new()),
            registry: ConnectionRegistry::new(),
            frame_ingress,
        }
    }

    /// Build from config. `bound_http_url` is the base URL of the bound
    /// HTTP surface, used when no explicit ingress URL is configured.
    pub fn from_config(config: &RelayConfig, bound_http_url: &str) -> Self {
        let ingress = if config.forward_frames_over_http {
            let url = config
                .frame_ingress_url
                .clone()
                .unwrap_or_else(|| format!("{}/frame", bound_http_url.trim_end_matches('/')));
            info!("Captured frames will be forwarded to {}", url);
            FrameIngress::http(url, Duration::from_millis(config.forward_timeout_ms))
        } else {
            FrameIngress::Direct
        };
        Self::new(ingress)
    }

    /// Register a channel's outbound queue.
    pub fn attach(&self, sender: mpsc::Sender<String>) -> ConnectionId {
        self.registry.attach(sender)
    }

    /// Remove a channel; idempotent.
    pub fn detach(&self, connection_id: &ConnectionId) -> bool {
        self.registry.detach(connection_id)
    }

    pub fn connection_count(&self) -> usize {
        self.registry.len()
    }

    /// Serialize `command` and queue it on every attached channel. Returns
    /// whether any channel existed.
    pub fn broadcast(&self, command: &RobotCommand) -> bool {
        self.dispatch(command).had_channels
    }

    /// Like [`Relay::broadcast`], reporting per-channel delivery.
    pub fn dispatch(&self, command: &RobotCommand) -> BroadcastOutcome {
        let payload = match command.to_json() {
            Ok(payload) => payload,
            Err(e) => {
                warn!("Failed to serialize {} command: {}", command.name(), e);
                return BroadcastOutcome::default();
            }
        };

        let outcome = self.registry.broadcast(&payload);
        if !outcome.had_channels {
            debug!("No channels attached, {} command not sent", command.name());
            return outcome;
        }

        debug!(
            "Broadcast {} to {} channel(s), {} dropped",
            command.name(),
            outcome.delivered,
            outcome.dropped.len()
        );
        outcome
    }

    /// Handle one inbound channel message. Malformed input is logged and
    /// dropped; it never affects the channel.
    pub async fn ingest_telemetry(&self, text: &str) {
        let aspects = match Telemetry::parse(text) {
            Ok(aspects) => aspects,
            Err(e) => {
                warn!("Dropping malformed telemetry: {}", e);
                return;
            }
        };

        for aspect in aspects {
            match aspect {
                Telemetry::CapturedFrame(image) => self.forward_frame(image).await,
                other => {
                    debug!("Applying telemetry: {:?}", other);
                    self.state.lock().apply(&other);
                }
            }
        }
    }

    async fn forward_frame(&self, image: String) {
        match &self.frame_ingress {
            FrameIngress::Direct => self.submit_frame(image),
            FrameIngress::Http { client, url, timeout } => {
                let result = client
                    .post(url)
                    .json(&json!({ "image": image }))
                    .timeout(*timeout)
                    .send()
                    .await;
                match result {
                    Ok(resp) if resp.status().is_success() => {
                        debug!("Forwarded captured frame to {}", url);
                    }
                    Ok(resp) => warn!("Frame ingress {} answered {}", url, resp.status()),
                    Err(e) => warn!("Failed to forward captured frame to {}: {}", url, e),
                }
            }
        }
    }

    /// The only write path for the latest frame.
    pub fn submit_frame(&self, image: String) {
        self.state.lock().latest_frame = Some(image);
        debug!("Latest frame updated");
    }

    pub fn query_position(&self) -> Position {
        self.state.lock().position
    }

    pub fn query_frame(&self) -> Result<String, Error> {
        self.state
            .lock()
            .latest_frame
            .clone()
            .ok_or(Error::FrameUnavailable)
    }

    pub fn query_collisions(&self) -> u64 {
        self.state.lock().collision_count
    }

    /// Snapshot of the whole state record.
    pub fn snapshot(&self) -> RobotState {
        self.state.lock().clone()
    }

    /// Zero collisions and position (frame untouched), then notify every
    /// channel. Returns whether any channel received the notice; channels
    /// dropped for a full queue do not count.
    pub fn reset(&self) -> bool {
        self.state.lock().reset();
        info!("Robot state reset");
        self.dispatch(&RobotCommand::Reset).delivered > 0
    }
}
