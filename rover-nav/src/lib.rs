//! rover-nav: Bug-2 navigation controller for the rover bridge.
//!
//! Drives a robot toward a goal through the relay's HTTP surface, using
//! color-threshold vision to detect obstacles and dead reckoning from the
//! commands it issues as its only position source.

pub mod client;
pub mod clock;
pub mod config;
pub mod controller;
pub mod navigator;
pub mod pose;

pub use client::{HttpRelayClient, RelayClient};
pub use clock::{InstantTicker, Ticker, TokioTicker};
pub use config::NavigationConfig;
pub use controller::{Controller, RunOutcome, RunReport};
pub use navigator::{Maneuver, Mode, NavigationState, Navigator, StepDecision};
pub use pose::Pose;
