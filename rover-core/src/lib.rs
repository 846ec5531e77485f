//! rover-core: shared types for the rover bridge.
//!
//! Holds the wire protocol spoken between the relay and attached robots,
//! the error type shared by every crate, goal resolution for named floor
//! corners, and config file loading.

pub mod error;
pub mod protocol;
pub mod goal;
pub mod config;

pub use error::{Error, Result};
pub use protocol::{Position, RobotCommand, Telemetry};
pub use goal::{corner_to_position, GoalRequest};
