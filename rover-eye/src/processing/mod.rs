//! Pixel-level processing steps used by the classifier

pub mod color;
pub mod roi;

pub use color::{to_hsv, ColorBand};
pub use roi::Roi;
