//! rover-eye: color-threshold vision for the rover bridge.
//!
//! Turns a camera frame into an obstacle signal by measuring how much of the
//! robot's forward travel corridor is filled with the target color.

pub mod classifier;
pub mod config;
pub mod error;
pub mod frame;
pub mod processing;

pub use classifier::{classify, Classifier, VisionResult};
pub use config::VisionConfig;
pub use error::VisionError;
pub use frame::{decode_frame, encode_png, frame_from_fn, solid_frame};
