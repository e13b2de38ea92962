//! WebSocket handling for live report updates

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use solgraph_core::SolutionReport;
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, info, warn};

use crate::ServerState;

/// WebSocket message types for client-server communication
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum WsMessage {
    /// Client asks for the current report
    #[serde(rename = "request_report")]
    RequestReport,
    /// Server answers a request, and greets new clients
    #[serde(rename = "full_report")]
    FullReport { report: SolutionReport },
    /// Server broadcasts a reloaded report
    #[serde(rename = "report_updated")]
    ReportUpdated { report: SolutionReport },
    #[serde(rename = "ping")]
    Ping,
    #[serde(rename = "pong")]
    Pong,
    #[serde(rename = "error")]
    Error { message: String },
}

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<ServerState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn full_report(state: &ServerState) -> WsMessage {
    WsMessage::FullReport {
        report: state.report.read().await.clone(),
    }
}

async fn handle_socket(socket: WebSocket, state: Arc<ServerState>) {
    info!("New WebSocket connection established");

    let (mut sender, mut receiver) = socket.split();
    let mut updates = state.updates_tx.subscribe();

    match serde_json::to_string(&full_report(&state).await) {
        Ok(json) => {
            if sender.send(Message::Text(json)).await.is_err() {
                warn!("Failed to send initial report to WebSocket client");
                return;
            }
        }
        Err(e) => warn!("Failed to serialize report: {}", e),
    }

    // Replies meant for this client only
    let (reply_tx, mut reply_rx) = mpsc::unbounded_channel::<String>();

    let state_clone = Arc::clone(&state);
    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = receiver.next().await {
            match msg {
                Message::Text(text) => {
                    debug!("Received WebSocket message: {}", text);
                    let reply = match serde_json::from_str::<WsMessage>(&text) {
                        Ok(ws_msg) => handle_client_message(ws_msg, &state_clone).await,
                        Err(e) => {
                            warn!("Failed to parse WebSocket message: {}", e);
                            Some(WsMessage::Error {
                                message: format!("Invalid message: {}", e),
                            })
                        }
                    };

                    if let Some(reply) = reply {
                        match serde_json::to_string(&reply) {
                            Ok(json) => {
                                if reply_tx.send(json).is_err() {
                                    break;
                                }
                            }
                            Err(e) => warn!("Failed to serialize reply: {}", e),
                        }
                    }
                }
                Message::Close(_) => {
                    debug!("WebSocket client disconnected");
                    break;
                }
                _ => {}
            }
        }
    });

    let mut send_task = tokio::spawn(async move {
        loop {
            let outgoing = tokio::select! {
                reply = reply_rx.recv() => match reply {
                    Some(json) => json,
                    None => break,
                },
                update = updates.recv() => match update {
                    Ok(json) => json,
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!("WebSocket client lagged behind by {} updates", skipped);
                        continue;
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                },
            };

            if sender.send(Message::Text(outgoing)).await.is_err() {
                debug!("Failed to send message to WebSocket client");
                break;
            }
        }
    });

    tokio::select! {
        _ = (&mut send_task) => {
            recv_task.abort();
        }
        _ = (&mut recv_task) => {
            send_task.abort();
        }
    }

    info!("WebSocket connection closed");
}

/// Reply, if any, to one client message.
async fn handle_client_message(msg: WsMessage, state: &ServerState) -> Option<WsMessage> {
    match msg {
        WsMessage::RequestReport => {
            debug!("Client requested the report");
            Some(full_report(state).await)
        }
        WsMessage::Ping => Some(WsMessage::Pong),
        WsMessage::Pong => None,
        other => {
            debug!("Ignoring server-side message from client: {:?}", other);
            None
        }
    }
}
