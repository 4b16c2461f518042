//! # Chat WebSocket Handler
//!
//! **Route**: `GET /ws`
//!
//! Every text frame a client sends is one inbound message for the room; every
//! text frame it receives is either a relayed chat line, an assistant answer,
//! or a notice meant for that client alone.
//!
//! ```javascript
//! const ws = new WebSocket('ws://localhost:5000/ws');
//! ws.onmessage = (event) => console.log(event.data);
//! ws.send('/help what is glaucoma');
//! ```

use crate::chat::session::{Session, SessionId};
use crate::chat::state::ChatAppState;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{ConnectInfo, State};
use axum::http::HeaderMap;
use axum::response::Response;
use futures_util::{SinkExt, StreamExt};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// Upgrade the request and join the global room.
pub async fn chat_websocket(
    ws: WebSocketUpgrade,
    headers: HeaderMap,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    State(chat): State<Arc<ChatAppState>>,
) -> Response {
    let client_ip = headers
        .get("x-forwarded-for")
        .or_else(|| headers.get("x-real-ip"))
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.split(',').next())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| addr.ip().to_string());

    debug!(client_ip = %client_ip, "[WS] CONNECT_ATTEMPT path=/ws");

    ws.on_upgrade(move |socket| async move {
        let (session, outbound_rx) = Session::open();
        let session_id = session.id();
        chat.registry.register(session).await;

        handle_chat_socket(socket, Arc::clone(&chat), session_id, outbound_rx, client_ip).await;

        chat.registry.unregister(session_id).await;
    })
}

/// Pump one connection: outbound channel → socket, socket → dispatcher.
async fn handle_chat_socket(
    socket: WebSocket,
    chat: Arc<ChatAppState>,
    session_id: SessionId,
    mut outbound_rx: mpsc::Receiver<String>,
    client_ip: String,
) {
    let (mut sender, mut receiver) = socket.split();
    let connection_start = Instant::now();
    let messages_sent = Arc::new(AtomicU64::new(0));
    let messages_received = Arc::new(AtomicU64::new(0));

    info!(
        session_id = %session_id,
        client_ip = %client_ip,
        active = chat.registry.connection_count(),
        "[WS] CONNECTED session_id={} ip={}",
        session_id,
        client_ip
    );

    let sent = Arc::clone(&messages_sent);
    let mut send_task = tokio::spawn(async move {
        while let Some(payload) = outbound_rx.recv().await {
            if let Err(e) = sender.send(Message::Text(payload.into())).await {
                warn!(session_id = %session_id, error = %e, "[WS] SEND_ERROR");
                break;
            }
            sent.fetch_add(1, Ordering::Relaxed);
        }
    });

    let received = Arc::clone(&messages_received);
    let dispatcher = Arc::clone(&chat.dispatcher);
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            match msg {
                Ok(Message::Text(text)) => {
                    received.fetch_add(1, Ordering::Relaxed);
                    debug!(session_id = %session_id, size = text.len(), "[WS] MESSAGE_RECEIVED");
                    dispatcher.submit(session_id, text.as_str().to_owned()).await;
                }
                Ok(Message::Close(frame)) => {
                    let reason = frame
                        .map(|f| f.code.to_string())
                        .unwrap_or_else(|| "unknown".to_string());
                    debug!(session_id = %session_id, reason = %reason, "[WS] CLOSE_RECEIVED");
                    break;
                }
                // Ping/pong are answered by axum; binary frames are not part of the protocol
                Ok(Message::Binary(data)) => {
                    debug!(session_id = %session_id, size = data.len(), "[WS] BINARY_IGNORED");
                }
                Ok(_) => {}
                Err(e) => {
                    error!(session_id = %session_id, error = %e, "[WS] RECV_ERROR");
                    break;
                }
            }
        }
    });

    // Whichever side finishes first ends the connection
    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }

    let duration = connection_start.elapsed();
    info!(
        session_id = %session_id,
        client_ip = %client_ip,
        duration_ms = duration.as_millis(),
        messages_sent = messages_sent.load(Ordering::Relaxed),
        messages_received = messages_received.load(Ordering::Relaxed),
        "[WS] DISCONNECTED session_id={} duration={:.2}s",
        session_id,
        duration.as_secs_f64()
    );
}
