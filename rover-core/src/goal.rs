//! Goal resolution: named floor corners or explicit coordinates.

use crate::error::{Error, Result};
use crate::protocol::Position;
use serde_json::Value as JsonValue;

/// Half the side length of the simulated floor.
pub const FLOOR_HALF: f64 = 50.0;

/// Distance kept between a corner goal and the floor edge.
pub const CORNER_MARGIN: f64 = 5.0;

/// Map a corner name (`NE`, `SW`, `TL`, `BR`, ...) to floor coordinates.
///
/// North is `-z`, east is `+x`. Names outside the alias table fall back to
/// letter matching: `E` selects the east half, `S` or `B` the south half.
pub fn corner_to_position(corner: &str, floor_half: f64, margin: f64) -> Position {
    let c = corner.to_uppercase();
    let edge = floor_half - margin;

    let (x, z) = match c.as_str() {
        "NE" | "EN" | "TR" => (edge, -edge),
        "NW" | "WN" | "TL" => (-edge, -edge),
        "SE" | "ES" | "BR" => (edge, edge),
        "SW" | "WS" | "BL" => (-edge, edge),
        _ => {
            let x = if c.contains('E') { edge } else { -edge };
            let z = if c.contains('S') || c.contains('B') { edge } else { -edge };
            (x, z)
        }
    };

    Position::on_floor(x, z)
}

/// Body of a set-goal request.
#[derive(Debug, Clone, PartialEq)]
pub enum GoalRequest {
    Corner(String),
    Coordinates { x: f64, y: f64, z: f64 },
}

impl GoalRequest {
    /// `corner` wins over coordinates; coordinates need both `x` and `z`.
    pub fn from_json(body: &JsonValue) -> Result<Self> {
        if let Some(corner) = body.get("corner") {
            let name = match corner {
                JsonValue::String(s) => s.clone(),
                other => other.to_string(),
            };
            return Ok(GoalRequest::Corner(name));
        }

        match (body.get("x"), body.get("z")) {
            (Some(x), Some(z)) => Ok(GoalRequest::Coordinates {
                x: coerce_number("x", x)?,
                y: body.get("y").map(|y| coerce_number("y", y)).transpose()?.unwrap_or(0.0),
                z: coerce_number("z", z)?,
            }),
            _ => Err(Error::InvalidRequest(
                r#"Provide {"corner":"NE|NW|SE|SW"} OR {"x":..,"z":..}"#.to_string(),
            )),
        }
    }

    pub fn resolve(&self) -> Position {
        match self {
            GoalRequest::Corner(name) => corner_to_position(name, FLOOR_HALF, CORNER_MARGIN),
            GoalRequest::Coordinates { x, y, z } => Position::new(*x, *y, *z),
        }
    }
}

fn coerce_number(field: &str, value: &JsonValue) -> Result<f64> {
    match value {
        JsonValue::Number(n) => n
            .as_f64()
            .ok_or_else(|| Error::InvalidRequest(format!("'{}' is not a finite number", field))),
        JsonValue::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| Error::InvalidRequest(format!("'{}' is not a number: {}", field, s))),
        _ => Err(Error::InvalidRequest(format!("'{}' must be a number", field))),
    }
}
