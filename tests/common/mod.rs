// Shared harness for the end-to-end tests: a relay on ephemeral ports and
// a scripted robot on its duplex channel

#![allow(dead_code)]

use futures_util::{SinkExt, StreamExt};
use rover_relay::{RelayConfig, RelayHandle, RelayServer};
use serde_json::Value;
use std::future::Future;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time::{sleep, timeout};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

pub type Robot = WebSocketStream<MaybeTlsStream<TcpStream>>;

pub fn test_config() -> RelayConfig {
    RelayConfig {
        http_addr: "127.0.0.1:0".to_string(),
        ws_addr: "127.0.0.1:0".to_string(),
        ..Default::default()
    }
}

pub async fn start_relay(config: RelayConfig) -> RelayHandle {
    RelayServer::new(config).unwrap().start().await.unwrap()
}

pub fn base_url(handle: &RelayHandle) -> String {
    format!("http://{}", handle.http_addr)
}

/// Connect a robot and wait until the relay has registered it.
pub async fn connect_robot(handle: &RelayHandle) -> Robot {
    let before = handle.relay.connection_count();
    let (robot, _) = connect_async(format!("ws://{}/ws", handle.ws_addr)).await.unwrap();
    let relay = handle.relay.clone();
    wait_until(|| {
        let relay = relay.clone();
        async move { relay.connection_count() > before }
    })
    .await;
    robot
}

pub async fn send_json(robot: &mut Robot, value: Value) {
    robot.send(Message::Text(value.to_string())).await.unwrap();
}

/// Next text message from the relay, parsed.
pub async fn recv_json(robot: &mut Robot) -> Value {
    loop {
        let msg = timeout(Duration::from_secs(2), robot.next())
            .await
            .expect("timed out waiting for a command")
            .expect("channel closed")
            .unwrap();
        if let Message::Text(text) = msg {
            return serde_json::from_str(&text).unwrap();
        }
    }
}

pub async fn get(client: &reqwest::Client, url: &str) -> (u16, Value) {
    let resp = client.get(url).send().await.unwrap();
    let status = resp.status().as_u16();
    (status, resp.json().await.unwrap_or(Value::Null))
}

pub async fn post(client: &reqwest::Client, url: &str, body: Option<Value>) -> (u16, Value) {
    let mut request = client.post(url);
    if let Some(body) = body {
        request = request.json(&body);
    }
    let resp = request.send().await.unwrap();
    let status = resp.status().as_u16();
    (status, resp.json().await.unwrap_or(Value::Null))
}

pub async fn wait_until<F, Fut>(mut check: F)
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    for _ in 0..150 {
        if check().await {
            return;
        }
        sleep(Duration::from_millis(20)).await;
    }
    panic!("condition not met within 3s");
}
