//! Client side of the relay's HTTP surface.
//!
//! Commands are fire-and-forget: a failed or slow call is logged and the
//! controller carries on with whatever it already knows.

use crate::config::NavigationConfig;
use async_trait::async_trait;
use rover_core::Error;
use serde_json::{json, Value as JsonValue};
use std::time::Duration;
use tracing::{debug, warn};

#[async_trait]
pub trait RelayClient: Send + Sync {
    async fn reset(&self);
    async fn capture(&self);
    async fn move_relative(&self, turn: f64, distance: f64);
    /// Latest frame, or `None` when the relay has none or cannot be reached.
    async fn fetch_frame(&self) -> Option<String>;
}

pub struct HttpRelayClient {
    client: reqwest::Client,
    base_url: String,
    command_timeout: Duration,
    frame_timeout: Duration,
}

impl HttpRelayClient {
    pub fn new(
        base_url: impl Into<String>,
        command_timeout: Duration,
        frame_timeout: Duration,
    ) -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| Error::Transport(format!("Failed to build HTTP client: {}", e)))?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { client, base_url, command_timeout, frame_timeout })
    }

    pub fn from_config(base_url: impl Into<String>, config: &NavigationConfig) -> Result<Self, Error> {
        Self::new(
            base_url,
            Duration::from_millis(config.command_timeout_ms),
            Duration::from_millis(config.frame_timeout_ms),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn post_command(&self, endpoint: &str, payload: Option<JsonValue>) -> Result<(), Error> {
        let url = format!("{}/{}", self.base_url, endpoint);
        let mut request = self.client.post(&url).timeout(self.command_timeout);
        if let Some(payload) = payload {
            request = request.json(&payload);
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::Transport(e.to_string()))?;
        if !response.status().is_success() {
            return Err(Error::Transport(format!("{} answered {}", url, response.status())));
        }
        Ok(())
    }

    async fn fire(&self, endpoint: &str, payload: Option<JsonValue>) {
        // the command timeout is short, so timeouts here are routine
        if let Err(e) = self.post_command(endpoint, payload).await {
            debug!("Command /{} not confirmed: {}", endpoint, e);
        }
    }

    async fn get_frame(&self) -> Result<Option<String>, Error> {
        let url = format!("{}/frame", self.base_url);
        let response = self
            .client
            .get(&url)
            .timeout(self.frame_timeout)
            .send()
            .await
            .map_err(|e| Error::Transport(e.to_string()))?;

        if !response.status().is_success() {
            debug!("No frame available ({})", response.status());
            return Ok(None);
        }

        let body: JsonValue = response
            .json()
            .await
            .map_err(|e| Error::Serialization(e.to_string()))?;
        Ok(body.get("image").and_then(|v| v.as_str()).map(str::to_string))
    }
}

#[async_trait]
impl RelayClient for HttpRelayClient {
    async fn reset(&self) {
        self.fire("reset", None).await;
    }

    async fn capture(&self) {
        self.fire("capture", None).await;
    }

    async fn move_relative(&self, turn: f64, distance: f64) {
        self.fire("move_rel", Some(json!({ "turn": turn, "distance": distance }))).await;
    }

    async fn fetch_frame(&self) -> Option<String> {
        match self.get_frame().await {
            Ok(frame) => frame,
            Err(e) => {
                warn!("Failed to fetch frame: {}", e);
                None
            }
        }
    }
}
