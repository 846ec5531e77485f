//! Bug-2 state machine.
//!
//! Two modes: drive straight at the goal until the corridor fills, then
//! follow the obstacle outward until the corridor clears with the goal ahead
//! and no worse than where the obstacle was hit. A step budget inside
//! wall-following forces the return to goal seeking.

use crate::config::NavigationConfig;
use crate::pose::{angle_difference, Pose};
use rover_eye::VisionResult;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    SeekGoal,
    WallFollow,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NavigationState {
    pub mode: Mode,
    pub pose: Pose,
    /// Distance to goal when wall-following began
    pub hit_distance: f64,
    pub wall_enter_step: Option<u32>,
}

impl Default for NavigationState {
    fn default() -> Self {
        Self {
            mode: Mode::SeekGoal,
            pose: Pose::default(),
            hit_distance: f64::INFINITY,
            wall_enter_step: None,
        }
    }
}

/// A relative move as sent to the robot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Maneuver {
    pub turn: f64,
    pub distance: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepDecision {
    /// Distance to goal fell below the threshold; nothing is issued.
    GoalReached { distance: f64 },
    /// Issue `maneuver`. `distance` is the distance to goal before it.
    Drive { maneuver: Maneuver, distance: f64 },
}

pub struct Navigator {
    config: NavigationConfig,
    state: NavigationState,
}

impl Navigator {
    pub fn new(config: NavigationConfig) -> Self {
        Self::with_state(config, NavigationState::default())
    }

    pub fn with_state(config: NavigationConfig, state: NavigationState) -> Self {
        Self { config, state }
    }

    pub fn state(&self) -> &NavigationState {
        &self.state
    }

    pub fn mode(&self) -> Mode {
        self.state.mode
    }

    pub fn pose(&self) -> Pose {
        self.state.pose
    }

    pub fn distance_to_goal(&self) -> f64 {
        self.state.pose.distance_to(self.config.goal_x, self.config.goal_z)
    }

    fn bearing_error(&self) -> f64 {
        let bearing = self.state.pose.bearing_to(self.config.goal_x, self.config.goal_z);
        angle_difference(bearing, self.state.pose.heading)
    }

    /// Decide the move for `step` from this step's vision reading.
    pub fn step(&mut self, step: u32, vision: &VisionResult) -> StepDecision {
        let distance = self.distance_to_goal();
        if distance < self.config.goal_threshold {
            info!("Goal reached at step {} (distance {:.2})", step, distance);
            return StepDecision::GoalReached { distance };
        }

        let maneuver = match self.state.mode {
            Mode::SeekGoal => self.seek_goal(step, distance, vision),
            Mode::WallFollow => self.follow_wall(step, distance, vision),
        };

        debug!(
            "Step {} {:?}: turn {:.1}, distance {:.1}, pose ({:.1}, {:.1}) heading {:.1}",
            step,
            self.state.mode,
            maneuver.turn,
            maneuver.distance,
            self.state.pose.x,
            self.state.pose.z,
            self.state.pose.heading
        );
        StepDecision::Drive { maneuver, distance }
    }

    fn seek_goal(&mut self, step: u32, distance: f64, vision: &VisionResult) -> Maneuver {
        if vision.obstacle_near {
            info!(
                "Obstacle at step {} ({} px), switching to wall-follow",
                step, vision.center_pixel_count
            );
            self.state.mode = Mode::WallFollow;
            self.state.hit_distance = distance;
            self.state.wall_enter_step = Some(step);
            return self.issue(self.config.recovery_turn, self.config.recovery_distance);
        }

        let limit = self.config.max_turn;
        let turn = self.bearing_error().clamp(-limit, limit);
        self.issue(turn, self.config.step_distance)
    }

    fn follow_wall(&mut self, step: u32, distance: f64, vision: &VisionResult) -> Maneuver {
        let turn = if vision.center_pixel_count > self.config.occupancy_threshold {
            self.config.wall_turn_large
        } else {
            self.config.wall_turn_small
        };
        let maneuver = self.issue(turn, self.config.step_distance);

        let clear = vision.center_pixel_count < self.config.occupancy_threshold;
        let goal_ahead = self.bearing_error().abs() < self.config.goal_cone_deg;
        let closer = distance < self.state.hit_distance * self.config.progress_margin;

        if clear && goal_ahead && closer {
            info!("Corridor clear at step {}, back to goal seeking", step);
            self.leave_wall();
        } else if let Some(entered) = self.state.wall_enter_step {
            if step.saturating_sub(entered) > self.config.wall_follow_timeout {
                info!(
                    "Wall-follow timed out at step {} (entered at {}), back to goal seeking",
                    step, entered
                );
                self.leave_wall();
            }
        }

        maneuver
    }

    fn leave_wall(&mut self) {
        self.state.mode = Mode::SeekGoal;
        self.state.wall_enter_step = None;
    }

    /// Every issued move updates dead reckoning as if executed exactly.
    fn issue(&mut self, turn: f64, distance: f64) -> Maneuver {
        self.state.pose.advance(turn, distance);
        Maneuver { turn, distance }
    }
}
