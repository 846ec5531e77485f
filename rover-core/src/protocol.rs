//! Wire protocol between the relay and attached robots.
//!
//! Outbound commands are JSON objects tagged by a `command` field. Inbound
//! telemetry is shape-dispatched: a single message may carry several
//! recognized aspects, and anything unrecognized is ignored.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use tracing::warn;

/// Scale applied to both axes by the naive `move_relative` echo.
pub const RELATIVE_ECHO_SCALE: f64 = 0.7;

/// A point in the simulator's world frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default)]
    pub z: f64,
}

impl Position {
    pub const ORIGIN: Position = Position { x: 0.0, y: 0.0, z: 0.0 };

    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Point on the floor plane (`y = 0`).
    pub fn on_floor(x: f64, z: f64) -> Self {
        Self { x, y: 0.0, z }
    }
}

/// Commands sent from the relay to every attached robot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum RobotCommand {
    Move { target: Position },
    MoveRelative { turn: f64, distance: f64 },
    Stop,
    CaptureImage,
    SetGoal { position: Position },
    Reset,
}

impl RobotCommand {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_value(&self) -> Result<JsonValue> {
        Ok(serde_json::to_value(self)?)
    }

    /// Short name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            RobotCommand::Move { .. } => "move",
            RobotCommand::MoveRelative { .. } => "move_relative",
            RobotCommand::Stop => "stop",
            RobotCommand::CaptureImage => "capture_image",
            RobotCommand::SetGoal { .. } => "set_goal",
            RobotCommand::Reset => "reset",
        }
    }
}

/// One recognized aspect of an inbound telemetry message.
#[derive(Debug, Clone, PartialEq)]
pub enum Telemetry {
    /// Simulation echo of an absolute move. Components absent from the
    /// target keep their current value.
    MoveEcho { x: Option<f64>, z: Option<f64> },
    /// Simulation echo of a relative move.
    MoveRelativeEcho { turn: f64, distance: f64 },
    /// Pose reported by the robot.
    Position(Position),
    /// Encoded image answering a capture request.
    CapturedFrame(String),
    /// A collision was reported.
    Collision,
}

impl Telemetry {
    /// Parse a raw text message. Invalid JSON is an error; valid JSON that
    /// is not an object yields no aspects.
    pub fn parse(text: &str) -> Result<Vec<Telemetry>> {
        let value: JsonValue = serde_json::from_str(text)?;
        Ok(Self::from_value(&value))
    }

    /// Extract every recognized aspect, in the order they must be applied.
    pub fn from_value(value: &JsonValue) -> Vec<Telemetry> {
        let Some(obj) = value.as_object() else {
            return Vec::new();
        };
        let mut aspects = Vec::new();

        match obj.get("command").and_then(|v| v.as_str()) {
            Some("move") => {
                if let Some(target) = obj.get("target").and_then(|t| t.as_object()) {
                    if !target.is_empty() {
                        aspects.push(Telemetry::MoveEcho {
                            x: target.get("x").and_then(|v| v.as_f64()),
                            z: target.get("z").and_then(|v| v.as_f64()),
                        });
                    }
                }
            }
            Some("move_relative") => {
                aspects.push(Telemetry::MoveRelativeEcho {
                    turn: obj.get("turn").and_then(|v| v.as_f64()).unwrap_or(0.0),
                    distance: obj.get("distance").and_then(|v| v.as_f64()).unwrap_or(0.0),
                });
            }
            _ => {}
        }

        if let Some(position) = obj.get("position") {
            match serde_json::from_value::<Position>(position.clone()) {
                Ok(p) => aspects.push(Telemetry::Position(p)),
                Err(e) => warn!("Ignoring malformed position payload: {}", e),
            }
        }

        match obj.get("type").and_then(|v| v.as_str()) {
            Some("capture_image_response") => match obj.get("image").and_then(|v| v.as_str()) {
                Some(image) => aspects.push(Telemetry::CapturedFrame(image.to_string())),
                None => warn!("capture_image_response without an image payload"),
            },
            Some("collision") => {
                if obj.get("collision").and_then(|v| v.as_bool()) == Some(true) {
                    aspects.push(Telemetry::Collision);
                }
            }
            _ => {}
        }

        aspects
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_command_wire_shapes() {
        let mv = RobotCommand::Move { target: Position::on_floor(3.0, -4.0) };
        assert_eq!(
            mv.to_value().unwrap(),
            json!({"command": "move", "target": {"x": 3.0, "y": 0.0, "z": -4.0}})
        );

        let rel = RobotCommand::MoveRelative { turn: 10.0, distance: 5.0 };
        assert_eq!(
            rel.to_value().unwrap(),
            json!({"command": "move_relative", "turn": 10.0, "distance": 5.0})
        );

        assert_eq!(RobotCommand::Stop.to_value().unwrap(), json!({"command": "stop"}));
        assert_eq!(
            RobotCommand::CaptureImage.to_value().unwrap(),
            json!({"command": "capture_image"})
        );
        assert_eq!(RobotCommand::Reset.to_value().unwrap(), json!({"command": "reset"}));
    }

    #[test]
    fn test_command_names() {
        assert_eq!(RobotCommand::CaptureImage.name(), "capture_image");
        assert_eq!(
            RobotCommand::SetGoal { position: Position::ORIGIN }.name(),
            "set_goal"
        );
    }

    #[test]
    fn test_parse_position() {
        let aspects = Telemetry::parse(r#"{"position": {"x": 1.5, "y": 0.2, "z": -3}}"#).unwrap();
        assert_eq!(aspects, vec![Telemetry::Position(Position::new(1.5, 0.2, -3.0))]);
    }

    #[test]
    fn test_parse_partial_position_defaults_missing_axes() {
        let aspects = Telemetry::parse(r#"{"position": {"x": 2}}"#).unwrap();
        assert_eq!(aspects, vec![Telemetry::Position(Position::new(2.0, 0.0, 0.0))]);
    }

    #[test]
    fn test_parse_collision_flag() {
        let hit = Telemetry::parse(r#"{"type": "collision", "collision": true}"#).unwrap();
        assert_eq!(hit, vec![Telemetry::Collision]);

        let miss = Telemetry::parse(r#"{"type": "collision", "collision": false}"#).unwrap();
        assert!(miss.is_empty());
    }

    #[test]
    fn test_parse_capture_response() {
        let aspects =
            Telemetry::parse(r#"{"type": "capture_image_response", "image": "abc"}"#).unwrap();
        assert_eq!(aspects, vec![Telemetry::CapturedFrame("abc".to_string())]);

        let missing = Telemetry::parse(r#"{"type": "capture_image_response"}"#).unwrap();
        assert!(missing.is_empty());
    }

    #[test]
    fn test_parse_move_echoes() {
        let mv = Telemetry::parse(r#"{"command": "move", "target": {"x": 7}}"#).unwrap();
        assert_eq!(mv, vec![Telemetry::MoveEcho { x: Some(7.0), z: None }]);

        let empty_target = Telemetry::parse(r#"{"command": "move", "target": {}}"#).unwrap();
        assert!(empty_target.is_empty());

        let rel = Telemetry::parse(r#"{"command": "move_relative", "distance": 5}"#).unwrap();
        assert_eq!(rel, vec![Telemetry::MoveRelativeEcho { turn: 0.0, distance: 5.0 }]);
    }

    #[test]
    fn test_parse_multiple_aspects_in_order() {
        let aspects = Telemetry::parse(
            r#"{"position": {"x": 1, "z": 2}, "type": "collision", "collision": true}"#,
        )
        .unwrap();
        assert_eq!(
            aspects,
            vec![
                Telemetry::Position(Position::new(1.0, 0.0, 2.0)),
                Telemetry::Collision,
            ]
        );
    }

    #[test]
    fn test_parse_unrecognized_and_malformed() {
        assert!(Telemetry::parse(r#"{"hello": "world"}"#).unwrap().is_empty());
        assert!(Telemetry::parse("[1, 2, 3]").unwrap().is_empty());
        assert!(Telemetry::parse(r#"{"position": "nowhere"}"#).unwrap().is_empty());
        assert!(Telemetry::parse("{not json").is_err());
    }
}
