//! Robot state record owned by the relay

use rover_core::protocol::{Position, Telemetry, RELATIVE_ECHO_SCALE};
use serde::Serialize;

/// Live telemetry of the attached robot. Guarded by the relay's state lock;
/// never shared outside it.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RobotState {
    pub position: Position,
    pub latest_frame: Option<String>,
    pub collision_count: u64,
}

impl RobotState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one state-mutating telemetry aspect. Captured frames take the
    /// frame ingress path instead and are ignored here.
    pub fn apply(&mut self, aspect: &Telemetry) {
        match aspect {
            Telemetry::MoveEcho { x, z } => {
                if let Some(x) = x {
                    self.position.x = *x;
                }
                if let Some(z) = z {
                    self.position.z = *z;
                }
            }
            Telemetry::MoveRelativeEcho { distance, .. } => {
                self.position.x += distance * RELATIVE_ECHO_SCALE;
                self.position.z += distance * RELATIVE_ECHO_SCALE;
            }
            Telemetry::Position(position) => self.position = *position,
            Telemetry::Collision => self.collision_count += 1,
            Telemetry::CapturedFrame(_) => {}
        }
    }

    /// Zero position and collisions. The frame is kept.
    pub fn reset(&mut self) {
        self.position = Position::ORIGIN;
        self.collision_count = 0;
    }
}
