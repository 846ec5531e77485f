//! Obstacle classifier.
//!
//! Counts target-colored pixels inside the forward corridor of the lower
//! half of the frame and reports an obstacle when the corridor is more than
//! `fill_threshold` full. One threshold drives the single obstacle signal.

use crate::config::VisionConfig;
use crate::error::VisionError;
use crate::frame::decode_frame;
use crate::processing::{ColorBand, Roi};
use opencv::core::CV_8UC3;
use opencv::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Per-frame result. Nothing is retained between frames.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisionResult {
    pub obstacle_near: bool,
    pub center_pixel_count: u32,
}

impl VisionResult {
    /// Result for a missing or undecodable frame.
    pub const NOTHING: VisionResult = VisionResult { obstacle_near: false, center_pixel_count: 0 };
}

#[derive(Debug, Clone)]
pub struct Classifier {
    config: VisionConfig,
    band: ColorBand,
}

impl Default for Classifier {
    fn default() -> Self {
        let config = VisionConfig::default();
        let band = ColorBand::new(config.hsv_lower, config.hsv_upper);
        Self { config, band }
    }
}

impl Classifier {
    pub fn new(config: VisionConfig) -> Result<Self, VisionError> {
        config.validate().map_err(VisionError::Config)?;
        let band = ColorBand::new(config.hsv_lower, config.hsv_upper);
        Ok(Self { config, band })
    }

    pub fn config(&self) -> &VisionConfig {
        &self.config
    }

    /// Classify a decoded BGR frame. An absent frame is never an error;
    /// a frame OpenCV cannot process is logged and reads as clear.
    pub fn classify(&self, frame: Option<&Mat>) -> VisionResult {
        let Some(frame) = frame else {
            return VisionResult::NOTHING;
        };
        match self.measure(frame) {
            Ok(result) => result,
            Err(e) => {
                warn!("Failed to classify frame, treating as absent: {}", e);
                VisionResult::NOTHING
            }
        }
    }

    fn measure(&self, frame: &Mat) -> Result<VisionResult, VisionError> {
        if frame.typ() != CV_8UC3 {
            return Err(VisionError::Decode(format!(
                "Expected an 8-bit BGR frame, got type {}",
                frame.typ()
            )));
        }

        let (width, height) = (frame.cols().max(0) as u32, frame.rows().max(0) as u32);
        let roi = Roi::corridor(
            width,
            height,
            self.config.roi_top,
            self.config.band_start,
            self.config.band_end,
        );
        let area = roi.area();
        if area == 0 {
            debug!("Corridor is empty for a {}x{} frame", width, height);
            return Ok(VisionResult::NOTHING);
        }

        let corridor = Mat::roi(frame, roi.rect())?;
        let count = self.band.count(&corridor)?;

        let fill = count as f64 / area as f64;
        Ok(VisionResult {
            obstacle_near: fill > self.config.fill_threshold,
            center_pixel_count: count,
        })
    }

    /// Decode and classify an encoded frame; undecodable input counts as
    /// no frame.
    pub fn classify_encoded(&self, encoded: Option<&str>) -> VisionResult {
        match encoded.map(decode_frame) {
            None => VisionResult::NOTHING,
            Some(Ok(frame)) => self.classify(Some(&frame)),
            Some(Err(e)) => {
                warn!("Failed to decode frame, treating as absent: {}", e);
                VisionResult::NOTHING
            }
        }
    }
}

/// Classify with the default thresholds.
pub fn classify(frame: Option<&Mat>) -> VisionResult {
    Classifier::default().classify(frame)
}
