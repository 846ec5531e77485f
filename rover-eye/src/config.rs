//! Configuration for rover-eye

use serde::{Deserialize, Serialize};

/// Thresholds and region of interest for the color classifier.
///
/// Hue uses the 8-bit convention (degrees halved, 0..180); saturation and
/// value span 0..255.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisionConfig {
    /// Inclusive lower HSV bound of the target color
    pub hsv_lower: [u8; 3],
    /// Inclusive upper HSV bound of the target color
    pub hsv_upper: [u8; 3],
    /// Fraction of the frame height where the near field starts
    pub roi_top: f64,
    /// Left edge of the forward corridor as a fraction of width
    pub band_start: f64,
    /// Right edge of the forward corridor as a fraction of width
    pub band_end: f64,
    /// Fill fraction above which an obstacle is reported (strict)
    pub fill_threshold: f64,
}

impl Default for VisionConfig {
    fn default() -> Self {
        Self {
            hsv_lower: [40, 150, 150],
            hsv_upper: [80, 255, 255],
            roi_top: 0.5,
            band_start: 0.45,
            band_end: 0.55,
            fill_threshold: 0.2,
        }
    }
}

impl VisionConfig {
    pub fn validate(&self) -> Result<(), String> {
        for channel in 0..3 {
            if self.hsv_lower[channel] > self.hsv_upper[channel] {
                return Err(format!(
                    "hsv_lower[{}] ({}) exceeds hsv_upper[{}] ({})",
                    channel, self.hsv_lower[channel], channel, self.hsv_upper[channel]
                ));
            }
        }

        if self.hsv_upper[0] > 180 {
            return Err("Hue bound must be at most 180".to_string());
        }

        if !(0.0..1.0).contains(&self.roi_top) {
            return Err("roi_top must be in [0, 1)".to_string());
        }

        if !(0.0..=1.0).contains(&self.band_start)
            || !(0.0..=1.0).contains(&self.band_end)
            || self.band_start >= self.band_end
        {
            return Err("Corridor band must satisfy 0 <= band_start < band_end <= 1".to_string());
        }

        if !(0.0..=1.0).contains(&self.fill_threshold) {
            return Err("fill_threshold must be between 0.0 and 1.0".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = VisionConfig::default();
        assert_eq!(config.hsv_lower, [40, 150, 150]);
        assert_eq!(config.hsv_upper, [80, 255, 255]);
        assert_eq!(config.roi_top, 0.5);
        assert_eq!(config.band_start, 0.45);
        assert_eq!(config.band_end, 0.55);
        assert_eq!(config.fill_threshold, 0.2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_inverted_bounds() {
        let mut config = VisionConfig::default();
        config.hsv_lower[1] = 200;
        config.hsv_upper[1] = 100;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_hue_range() {
        let mut config = VisionConfig::default();
        config.hsv_upper[0] = 181;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_band() {
        let mut config = VisionConfig::default();
        config.band_start = 0.6;
        assert!(config.validate().is_err());

        config.band_start = 0.45;
        config.band_end = 1.2;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_roi_and_threshold() {
        let mut config = VisionConfig::default();
        config.roi_top = 1.0;
        assert!(config.validate().is_err());

        let mut config = VisionConfig::default();
        config.fill_threshold = -0.1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_partial_deserialize() {
        let config: VisionConfig = serde_json::from_str(r#"{"fill_threshold": 0.3}"#).unwrap();
        assert_eq!(config.fill_threshold, 0.3);
        assert_eq!(config.band_start, 0.45);
    }
}
