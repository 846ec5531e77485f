//! Configuration for the navigation controller

use rover_eye::VisionConfig;
use serde::{Deserialize, Serialize};

/// Constants of the Bug-2 controller and its polling loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
    /// Goal on the floor plane (x)
    pub goal_x: f64,
    /// Goal on the floor plane (z)
    pub goal_z: f64,
    /// Distance below which the goal counts as reached
    pub goal_threshold: f64,
    /// Forward distance of every regular move
    pub step_distance: f64,
    /// Largest heading correction per step while seeking the goal
    pub max_turn: f64,
    /// Turn of the maneuver issued on obstacle contact
    pub recovery_turn: f64,
    /// Displacement of the recovery maneuver (negative backs up)
    pub recovery_distance: f64,
    /// Outward turn while the corridor is crowded
    pub wall_turn_large: f64,
    /// Outward turn otherwise
    pub wall_turn_small: f64,
    /// Corridor pixel count separating crowded from clear
    pub occupancy_threshold: u32,
    /// Half-angle of the cone in which the goal counts as ahead
    pub goal_cone_deg: f64,
    /// Hit distance multiplier for the progress test
    pub progress_margin: f64,
    /// Steps in wall-follow after which the controller is forced back
    pub wall_follow_timeout: u32,
    pub max_steps: u32,
    /// Wait between capture trigger and frame fetch
    pub settle_ms: u64,
    /// Send a reset before the first step
    pub reset_on_start: bool,
    /// Wait after the start reset
    pub reset_settle_ms: u64,
    pub command_timeout_ms: u64,
    pub frame_timeout_ms: u64,
    /// Classifier thresholds, `[vision]` in a config file
    pub vision: VisionConfig,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            goal_x: 45.0,
            goal_z: 45.0,
            goal_threshold: 3.0,
            step_distance: 5.0,
            max_turn: 10.0,
            recovery_turn: 45.0,
            recovery_distance: -2.0,
            wall_turn_large: 40.0,
            wall_turn_small: 5.0,
            occupancy_threshold: 1200,
            goal_cone_deg: 70.0,
            progress_margin: 1.05,
            wall_follow_timeout: 40,
            max_steps: 1000,
            settle_ms: 100,
            reset_on_start: true,
            reset_settle_ms: 1000,
            command_timeout_ms: 100,
            frame_timeout_ms: 1000,
            vision: VisionConfig::default(),
        }
    }
}

impl NavigationConfig {
    pub fn validate(&self) -> Result<(), String> {
        if !self.goal_x.is_finite() || !self.goal_z.is_finite() {
            return Err("Goal coordinates must be finite".to_string());
        }

        if self.goal_threshold <= 0.0 {
            return Err("goal_threshold must be positive".to_string());
        }

        if self.step_distance <= 0.0 {
            return Err("step_distance must be positive".to_string());
        }

        if self.max_turn <= 0.0 || self.max_turn > 180.0 {
            return Err("max_turn must be in (0, 180]".to_string());
        }

        if self.goal_cone_deg <= 0.0 || self.goal_cone_deg > 180.0 {
            return Err("goal_cone_deg must be in (0, 180]".to_string());
        }

        if self.progress_margin < 1.0 {
            return Err("progress_margin must be at least 1".to_string());
        }

        if self.max_steps == 0 {
            return Err("max_steps must be greater than 0".to_string());
        }

        if self.command_timeout_ms == 0 || self.frame_timeout_ms == 0 {
            return Err("Request timeouts must be greater than 0".to_string());
        }

        self.vision.validate()
    }
}
