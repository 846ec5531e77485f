//! Configuration for the relay

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

/// Configuration for the relay server
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
    /// Listen address of the request/response surface
    pub http_addr: String,

    /// Listen address of the robot channel surface
    pub ws_addr: String,

    /// Outbound queue depth per attached channel; a full queue detaches it
    pub channel_queue_capacity: usize,

    /// Forward captured frames through the HTTP `/frame` endpoint instead of
    /// submitting them in-process
    pub forward_frames_over_http: bool,

    /// Frame ingress URL; derived from the bound HTTP address when unset
    pub frame_ingress_url: Option<String>,

    /// Timeout for one forwarded frame, in milliseconds
    pub forward_timeout_ms: u64,

    /// Largest accepted request body, in bytes
    pub max_body_bytes: usize,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            http_addr: "127.0.0.1:5000".to_string(),
            ws_addr: "127.0.0.1:8080".to_string(),
            channel_queue_capacity: 64,
            forward_frames_over_http: false,
            frame_ingress_url: None,
            forward_timeout_ms: 1000,
            max_body_bytes: 16 * 1024 * 1024,
        }
    }
}

impl RelayConfig {
    /// Validate configuration values
    pub fn validate(&self) -> Result<(), String> {
        self.http_addr
            .parse::<SocketAddr>()
            .map_err(|e| format!("Invalid http_addr '{}': {}", self.http_addr, e))?;
        self.ws_addr
            .parse::<SocketAddr>()
            .map_err(|e| format!("Invalid ws_addr '{}': {}", self.ws_addr, e))?;

        if self.channel_queue_capacity == 0 {
            return Err("channel_queue_capacity must be > 0".to_string());
        }

        if self.forward_timeout_ms == 0 {
            return Err("forward_timeout_ms must be > 0".to_string());
        }

        if self.max_body_bytes == 0 {
            return Err("max_body_bytes must be > 0".to_string());
        }

        if let Some(url) = &self.frame_ingress_url {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(format!("frame_ingress_url must be an http(s) URL, got '{}'", url));
            }
        }

        Ok(())
    }
}
