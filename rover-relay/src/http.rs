//! Request/response surface of the relay.
//!
//! Command endpoints broadcast to attached robots and answer 400 when none
//! is attached. Telemetry endpoints read the relay's state. Bodies are
//! parsed leniently: an absent or invalid JSON body is treated as empty.

use crate::server::RelayState;
use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use rover_core::protocol::{Position, RobotCommand};
use rover_core::{Error, GoalRequest};
use serde_json::{json, Value as JsonValue};
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

type ApiResponse = (StatusCode, Json<JsonValue>);

/// Build the HTTP router.
pub fn create_router(state: RelayState, max_body_bytes: usize) -> Router {
    Router::new()
        .route("/position", get(get_position))
        .route("/move", post(move_to))
        .route("/move_rel", post(move_relative))
        .route("/stop", post(stop))
        .route("/capture", post(capture))
        .route("/frame", get(get_frame).post(receive_frame))
        .route("/collisions", get(get_collisions))
        .route("/reset", post(reset))
        .route("/goal", post(set_goal))
        .route("/health", get(health_check))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn parse_body(body: &Bytes) -> JsonValue {
    serde_json::from_slice(body).unwrap_or(JsonValue::Null)
}

fn error_response(status: StatusCode, message: &str) -> ApiResponse {
    (status, Json(json!({ "error": message })))
}

fn number(payload: &JsonValue, field: &str) -> Option<f64> {
    payload.get(field).and_then(|v| v.as_f64())
}

/// Broadcast `command` and describe it in the response.
fn dispatch(state: &RelayState, command: RobotCommand, status: &str) -> ApiResponse {
    let wire = match command.to_value() {
        Ok(wire) => wire,
        Err(e) => {
            warn!("Failed to encode {} command: {}", command.name(), e);
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string());
        }
    };

    if !state.relay.broadcast(&command) {
        return error_response(StatusCode::BAD_REQUEST, &format!("{}.", Error::NoChannels));
    }

    (StatusCode::OK, Json(json!({ "status": status, "command": wire })))
}

async fn get_position(State(state): State<RelayState>) -> Json<JsonValue> {
    Json(json!({ "position": state.relay.query_position() }))
}

async fn move_to(State(state): State<RelayState>, body: Bytes) -> ApiResponse {
    let payload = parse_body(&body);
    let (Some(x), Some(z)) = (number(&payload, "x"), number(&payload, "z")) else {
        return error_response(
            StatusCode::BAD_REQUEST,
            r#"Missing parameters. Please provide "x" and "z"."#,
        );
    };

    let command = RobotCommand::Move { target: Position::on_floor(x, z) };
    dispatch(&state, command, "move command sent")
}

async fn move_relative(State(state): State<RelayState>, body: Bytes) -> ApiResponse {
    let payload = parse_body(&body);
    let (Some(turn), Some(distance)) = (number(&payload, "turn"), number(&payload, "distance"))
    else {
        return error_response(
            StatusCode::BAD_REQUEST,
            r#"Missing parameters. Please provide "turn" and "distance"."#,
        );
    };

    let command = RobotCommand::MoveRelative { turn, distance };
    dispatch(&state, command, "move relative command sent")
}

async fn stop(State(state): State<RelayState>) -> ApiResponse {
    dispatch(&state, RobotCommand::Stop, "stop command sent")
}

async fn capture(State(state): State<RelayState>) -> ApiResponse {
    dispatch(&state, RobotCommand::CaptureImage, "capture command sent")
}

async fn receive_frame(State(state): State<RelayState>, body: Bytes) -> ApiResponse {
    let payload = parse_body(&body);
    let Some(image) = payload.get("image").and_then(|v| v.as_str()) else {
        return error_response(StatusCode::BAD_REQUEST, "Missing 'image' key");
    };

    state.relay.submit_frame(image.to_string());
    (StatusCode::OK, Json(json!({ "status": "ok", "message": "frame received" })))
}

async fn get_frame(State(state): State<RelayState>) -> ApiResponse {
    match state.relay.query_frame() {
        Ok(image) => (StatusCode::OK, Json(json!({ "image": image }))),
        Err(e) => error_response(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string()),
    }
}

async fn get_collisions(State(state): State<RelayState>) -> Json<JsonValue> {
    Json(json!({ "count": state.relay.query_collisions() }))
}

async fn reset(State(state): State<RelayState>) -> ApiResponse {
    let status = if state.relay.reset() {
        "reset broadcast"
    } else {
        "reset done (no simulators connected)"
    };
    // zero is the count at the reset point, whatever arrives afterwards
    (StatusCode::OK, Json(json!({ "status": status, "collisions": 0 })))
}

async fn set_goal(State(state): State<RelayState>, body: Bytes) -> ApiResponse {
    let payload = parse_body(&body);
    let request = match GoalRequest::from_json(&payload) {
        Ok(request) => request,
        Err(Error::InvalidRequest(msg)) => return error_response(StatusCode::BAD_REQUEST, &msg),
        Err(e) => return error_response(StatusCode::BAD_REQUEST, &e.to_string()),
    };

    let goal = request.resolve();
    if !state.relay.broadcast(&RobotCommand::SetGoal { position: goal }) {
        return error_response(StatusCode::BAD_REQUEST, &format!("{}.", Error::NoChannels));
    }

    info!("Goal set to ({}, {}, {})", goal.x, goal.y, goal.z);
    (StatusCode::OK, Json(json!({ "status": "goal set", "goal": goal })))
}

async fn health_check(State(state): State<RelayState>) -> Json<JsonValue> {
    Json(json!({
        "status": "healthy",
        "connections": state.relay.connection_count(),
    }))
}
