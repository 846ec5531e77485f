// End-to-end navigation tests: the controller drives a scripted robot
// through a real relay

mod common;

use common::*;
use futures_util::StreamExt;
use rover_nav::{Controller, HttpRelayClient, Mode, NavigationConfig, RunOutcome, TokioTicker};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;

fn fast_config(max_steps: u32) -> NavigationConfig {
    NavigationConfig {
        max_steps,
        settle_ms: 10,
        reset_settle_ms: 10,
        command_timeout_ms: 1000,
        ..Default::default()
    }
}

/// Answer every capture with `frame` and record every command received.
fn spawn_robot(mut robot: Robot, frame: String) -> (JoinHandle<()>, Arc<Mutex<Vec<Value>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let log = seen.clone();
    let task = tokio::spawn(async move {
        while let Some(Ok(msg)) = robot.next().await {
            let Message::Text(text) = msg else { continue };
            let Ok(command) = serde_json::from_str::<Value>(&text) else { continue };
            if command["command"] == "capture_image" {
                let reply = json!({"type": "capture_image_response", "image": frame});
                send_json(&mut robot, reply).await;
            }
            log.lock().unwrap().push(command);
        }
    });
    (task, seen)
}

/// Connect a robot whose first frame is already stored on the relay.
async fn connect_with_frame(handle: &rover_relay::RelayHandle, frame: &str) -> Robot {
    let mut robot = connect_robot(handle).await;
    send_json(&mut robot, json!({"type": "capture_image_response", "image": frame})).await;
    let relay = handle.relay.clone();
    wait_until(|| {
        let relay = relay.clone();
        async move { relay.query_frame().is_ok() }
    })
    .await;
    robot
}

fn moves(seen: &Arc<Mutex<Vec<Value>>>) -> Vec<Value> {
    seen.lock()
        .unwrap()
        .iter()
        .filter(|c| c["command"] == "move_relative")
        .cloned()
        .collect()
}

#[tokio::test]
async fn test_controller_reaches_goal_through_relay() {
    let handle = start_relay(test_config()).await;
    let frame = rover_eye::encode_png(&rover_eye::solid_frame(160, 120, [30, 30, 30]).unwrap()).unwrap();
    let robot = connect_with_frame(&handle, &frame).await;
    let (task, seen) = spawn_robot(robot, frame);

    let config = fast_config(200);
    let client = HttpRelayClient::from_config(base_url(&handle), &config).unwrap();
    let mut controller = Controller::new(config, client, TokioTicker).unwrap();
    let report = controller.run().await;

    assert_eq!(report.outcome, RunOutcome::GoalReached);
    assert_eq!(report.mode, Mode::SeekGoal);
    assert!(report.final_distance < 3.0);

    let expected = report.steps as usize - 1;
    let log = seen.clone();
    wait_until(|| {
        let log = log.clone();
        async move { moves(&log).len() == expected }
    })
    .await;

    assert_eq!(seen.lock().unwrap()[0], json!({"command": "reset"}));
    for command in moves(&seen) {
        assert!(command["turn"].as_f64().unwrap().abs() <= 10.0);
        assert_eq!(command["distance"], 5.0);
    }

    task.abort();
    handle.shutdown();
}

#[tokio::test]
async fn test_controller_backs_off_green_wall() {
    let handle = start_relay(test_config()).await;
    let frame = rover_eye::encode_png(&rover_eye::solid_frame(320, 240, [0, 255, 0]).unwrap()).unwrap();
    let robot = connect_with_frame(&handle, &frame).await;
    let (task, seen) = spawn_robot(robot, frame);

    let mut config = fast_config(10);
    config.reset_on_start = false;
    let client = HttpRelayClient::from_config(base_url(&handle), &config).unwrap();
    let mut controller = Controller::new(config, client, TokioTicker).unwrap();
    let report = controller.run().await;

    assert_eq!(report.outcome, RunOutcome::StepBudgetExhausted);
    assert_eq!(report.steps, 10);
    assert_eq!(report.mode, Mode::WallFollow);

    let log = seen.clone();
    wait_until(|| {
        let log = log.clone();
        async move { moves(&log).len() == 10 }
    })
    .await;

    let issued = moves(&seen);
    assert_eq!(issued[0], json!({"command": "move_relative", "turn": 45.0, "distance": -2.0}));
    for command in &issued[1..] {
        assert_eq!(command["turn"], 40.0);
    }

    task.abort();
    handle.shutdown();
}
