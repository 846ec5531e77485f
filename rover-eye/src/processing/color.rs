//! HSV conversion and color band masking.
//!
//! Frames are 8-bit BGR as decoded by OpenCV. In the 8-bit HSV space hue is
//! degrees / 2 (0..180); saturation and value span 0..255.

use crate::error::VisionError;
use opencv::core::{self, Scalar, ToInputArray};
use opencv::imgproc;
use opencv::prelude::*;

/// Convert a BGR frame (or region) to HSV.
pub fn to_hsv<A: ToInputArray>(bgr: &A) -> Result<Mat, VisionError> {
    let mut hsv = Mat::default();
    imgproc::cvt_color(bgr, &mut hsv, imgproc::COLOR_BGR2HSV, 0)
        .map_err(|e| VisionError::OpenCv(format!("Failed to convert to HSV: {}", e)))?;
    Ok(hsv)
}

/// Inclusive HSV box selecting the target color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorBand {
    pub lower: [u8; 3],
    pub upper: [u8; 3],
}

impl ColorBand {
    pub fn new(lower: [u8; 3], upper: [u8; 3]) -> Self {
        Self { lower, upper }
    }

    fn scalar(bound: [u8; 3]) -> Scalar {
        Scalar::new(bound[0] as f64, bound[1] as f64, bound[2] as f64, 0.0)
    }

    /// 255 where the HSV pixel lies inside the band, 0 elsewhere.
    pub fn mask<A: ToInputArray>(&self, hsv: &A) -> Result<Mat, VisionError> {
        let mut mask = Mat::default();
        core::in_range(hsv, &Self::scalar(self.lower), &Self::scalar(self.upper), &mut mask)
            .map_err(|e| VisionError::OpenCv(format!("Failed to threshold: {}", e)))?;
        Ok(mask)
    }

    /// Number of pixels of a BGR frame (or region) inside the band.
    pub fn count<A: ToInputArray>(&self, bgr: &A) -> Result<u32, VisionError> {
        let mask = self.mask(&to_hsv(bgr)?)?;
        let count = core::count_non_zero(&mask)
            .map_err(|e| VisionError::OpenCv(format!("Failed to count mask: {}", e)))?;
        Ok(count.max(0) as u32)
    }
}
