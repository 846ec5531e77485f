//! Relay server: binds both listeners around one shared relay

use crate::config::RelayConfig;
use crate::http::create_router;
use crate::relay::Relay;
use crate::websocket::websocket_handler;
use axum::{routing::get, Router};
use rover_core::Error;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// State shared by every handler on both surfaces.
#[derive(Clone)]
pub struct RelayState {
    pub relay: Arc<Relay>,
    pub queue_capacity: usize,
}

impl RelayState {
    pub fn new(relay: Arc<Relay>, queue_capacity: usize) -> Self {
        Self { relay, queue_capacity }
    }
}

/// Router for the robot channel surface. Robots may connect at `/` or `/ws`.
pub fn create_channel_router(state: RelayState) -> Router {
    Router::new()
        .route("/", get(websocket_handler))
        .route("/ws", get(websocket_handler))
        .with_state(state)
}

pub struct RelayServer {
    config: RelayConfig,
}

impl RelayServer {
    pub fn new(config: RelayConfig) -> Result<Self, Error> {
        config
            .validate()
            .map_err(|e| Error::Configuration(format!("Invalid relay configuration: {}", e)))?;
        Ok(Self { config })
    }

    /// Bind both listeners and start serving in the background.
    pub async fn start(self) -> Result<RelayHandle, Error> {
        let http_listener = TcpListener::bind(self.config.http_addr.as_str()).await?;
        let ws_listener = TcpListener::bind(self.config.ws_addr.as_str()).await?;
        let http_addr = http_listener.local_addr()?;
        let ws_addr = ws_listener.local_addr()?;

        let relay = Arc::new(Relay::from_config(&self.config, &format!("http://{}", http_addr)));
        let state = RelayState::new(relay.clone(), self.config.channel_queue_capacity);

        let http_app = create_router(state.clone(), self.config.max_body_bytes);
        let ws_app = create_channel_router(state);

        info!("HTTP surface listening on {}", http_addr);
        let http_task = tokio::spawn(async move {
            if let Err(e) = axum::serve(http_listener, http_app).await {
                error!("HTTP server error: {}", e);
            }
        });

        info!("Robot channel surface listening on ws://{}", ws_addr);
        let ws_task = tokio::spawn(async move {
            if let Err(e) = axum::serve(ws_listener, ws_app).await {
                error!("WebSocket server error: {}", e);
            }
        });

        Ok(RelayHandle {
            relay,
            http_addr,
            ws_addr,
            http_task,
            ws_task,
        })
    }
}

/// A running relay.
pub struct RelayHandle {
    pub relay: Arc<Relay>,
    pub http_addr: SocketAddr,
    pub ws_addr: SocketAddr,
    http_task: JoinHandle<()>,
    ws_task: JoinHandle<()>,
}

impl RelayHandle {
    /// Resolve when either listener stops.
    pub async fn wait(&mut self) {
        tokio::select! {
            _ = &mut self.http_task => error!("HTTP surface stopped"),
            _ = &mut self.ws_task => error!("Robot channel surface stopped"),
        }
    }

    pub fn shutdown(self) {
        self.http_task.abort();
        self.ws_task.abort();
        info!("Relay stopped");
    }
}
