//! Dead-reckoned pose on the floor plane.
//!
//! Angles are degrees. Heading 0 points along +x and grows toward +z.

use serde::{Deserialize, Serialize};

/// Wrap an angle into [0, 360).
pub fn normalize_angle(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Signed difference `target - current` wrapped into [-180, 180).
pub fn angle_difference(target: f64, current: f64) -> f64 {
    (target - current + 180.0).rem_euclid(360.0) - 180.0
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Pose {
    pub x: f64,
    pub z: f64,
    /// Degrees in [0, 360)
    pub heading: f64,
}

impl Pose {
    pub fn new(x: f64, z: f64, heading: f64) -> Self {
        Self { x, z, heading: normalize_angle(heading) }
    }

    pub fn distance_to(&self, x: f64, z: f64) -> f64 {
        ((x - self.x).powi(2) + (z - self.z).powi(2)).sqrt()
    }

    /// Heading that would point straight at `(x, z)`, in [0, 360).
    pub fn bearing_to(&self, x: f64, z: f64) -> f64 {
        normalize_angle((z - self.z).atan2(x - self.x).to_degrees())
    }

    /// Apply a relative move exactly as issued: turn first, then travel
    /// `distance` along the new heading.
    pub fn advance(&mut self, turn: f64, distance: f64) {
        self.heading = normalize_angle(self.heading + turn);
        let rad = self.heading.to_radians();
        self.x += distance * rad.cos();
        self.z += distance * rad.sin();
    }
}
