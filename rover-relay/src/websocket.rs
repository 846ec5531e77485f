// Robot channel handler
// One task pair per attached robot: a writer draining the outbound queue and
// a reader feeding inbound telemetry to the relay

use crate::server::RelayState;
use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// WebSocket upgrade handler
pub async fn websocket_handler(ws: WebSocketUpgrade, State(state): State<RelayState>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Drive one robot channel until either direction fails or closes.
pub async fn handle_socket(socket: WebSocket, state: RelayState) {
    let (tx, mut rx) = mpsc::channel::<String>(state.queue_capacity);
    let connection_id = state.relay.attach(tx);

    let (mut sender, mut receiver) = socket.split();

    let writer_id = connection_id.clone();
    let mut send_task = tokio::spawn(async move {
        while let Some(payload) = rx.recv().await {
            if let Err(e) = sender.send(Message::Text(payload)).await {
                warn!("Failed to write to channel {}: {}", writer_id, e);
                break;
            }
        }
        // queue closed: the registry detached us
        if let Err(e) = sender.close().await {
            debug!("Failed to close channel {}: {}", writer_id, e);
        }
    });

    let reader_id = connection_id.clone();
    let relay = state.relay.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            match msg {
                Ok(Message::Text(text)) => {
                    debug!("Channel {} sent: {}", reader_id, truncate_for_log(&text));
                    relay.ingest_telemetry(&text).await;
                }
                Ok(Message::Binary(bytes)) => match String::from_utf8(bytes) {
                    Ok(text) => relay.ingest_telemetry(&text).await,
                    Err(_) => warn!("Ignoring non-UTF-8 binary message from {}", reader_id),
                },
                Ok(Message::Close(_)) => {
                    debug!("Channel {} closed by robot", reader_id);
                    break;
                }
                Ok(Message::Ping(_)) | Ok(Message::Pong(_)) => {}
                Err(e) => {
                    warn!("Channel {} read error: {}", reader_id, e);
                    break;
                }
            }
        }
    });

    tokio::select! {
        _ = &mut send_task => {
            recv_task.abort();
            debug!("Writer finished for channel {}", connection_id);
        }
        _ = &mut recv_task => {
            send_task.abort();
            debug!("Reader finished for channel {}", connection_id);
        }
    }

    state.relay.detach(&connection_id);
    info!("Robot channel closed: {}", connection_id);
}

fn truncate_for_log(text: &str) -> &str {
    const MAX: usize = 200;
    if text.len() <= MAX {
        return text;
    }
    let mut end = MAX;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}
