//! Relay between an external controller and attached robots (rover-relay)
//!
//! Holds the robot's live telemetry (pose, latest camera frame, collision
//! count) behind a request/response HTTP surface, and fans motion and
//! sensing commands out to every robot attached over a WebSocket channel.
//!
//! All shared state lives in one [`Relay`] context object; every read and
//! mutation goes through its methods.

pub mod config;
pub mod state;
pub mod registry;
pub mod relay;
pub mod http;
pub mod websocket;
pub mod server;

pub use config::RelayConfig;
pub use registry::{BroadcastOutcome, ConnectionId, ConnectionRegistry};
pub use relay::{FrameIngress, Relay};
pub use server::{RelayHandle, RelayServer, RelayState};
pub use state::RobotState;
