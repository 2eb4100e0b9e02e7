use crate::handlers::dispatcher::dispatch;
use crate::{
    ConnectionConfig, HandlerContext, Metrics, Result as WsErrorResult, ShutdownGuard, WsError,
};

use fanout_core::ConnectionId;

use std::panic::Location;
use std::time::{Duration, Instant};

use axum::extract::ws::{CloseFrame, Message, WebSocket, close_code};
use error_location::ErrorLocation;
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;

/// How long queued frames get to reach the client once the socket loop ends
const SEND_DRAIN_TIMEOUT: Duration = Duration::from_secs(2);
/// Close reasons are limited to 123 bytes by the WebSocket protocol
pub const MAX_CLOSE_REASON_BYTES: usize = 123;

/// Close frame carrying `reason`, cut to the protocol limit on a char boundary
pub fn close_frame(code: u16, reason: &str) -> Message {
    let mut end = reason.len().min(MAX_CLOSE_REASON_BYTES);
    while !reason.is_char_boundary(end) {
        end -= 1;
    }
    Message::Close(Some(CloseFrame {
        code,
        reason: reason[..end].to_string().into(),
    }))
}

/// Manages a single WebSocket connection after its connect handler succeeded
pub struct WebSocketConnection {
    connection_id: ConnectionId,
    config: ConnectionConfig,
    metrics: Metrics,
    context: HandlerContext,
}

impl WebSocketConnection {
    pub fn new(
        connection_id: ConnectionId,
        config: ConnectionConfig,
        metrics: Metrics,
        context: HandlerContext,
    ) -> Self {
        Self {
            connection_id,
            config,
            metrics,
            context,
        }
    }

    /// Run the socket until the client leaves, the heartbeat lapses, or shutdown.
    ///
    /// `outbound` is the receiving half of the channel registered in the hub;
    /// `tx` is a sender on that same channel used for replies and pings.
    pub async fn handle(
        self,
        socket: WebSocket,
        tx: mpsc::Sender<Message>,
        mut outbound: mpsc::Receiver<Message>,
        mut shutdown_guard: ShutdownGuard,
    ) -> WsErrorResult<()> {
        log::info!("WebSocket connection {} established", self.connection_id);
        self.metrics.connection_established();

        let (mut ws_sender, mut ws_receiver) = socket.split();

        let mut send_task = tokio::spawn(async move {
            while let Some(msg) = outbound.recv().await {
                let closing = matches!(msg, Message::Close(_));
                if ws_sender.send(msg).await.is_err() || closing {
                    break;
                }
            }
        });

        let mut heartbeat = tokio::time::interval(self.config.heartbeat_interval);
        heartbeat.tick().await;
        let mut last_seen = Instant::now();
        // Set when a close frame is queued and should reach the client
        let mut drain = false;

        let result = loop {
            tokio::select! {
                msg = ws_receiver.next() => {
                    match msg {
                        Some(Ok(msg)) => {
                            last_seen = Instant::now();
                            if matches!(msg, Message::Close(_)) {
                                log::info!("Received close frame from connection {}", self.connection_id);
                                break Ok(());
                            }
                            self.handle_client_message(msg, &tx);
                        }
                        Some(Err(e)) => {
                            log::error!("WebSocket error on connection {}: {}", self.connection_id, e);
                            break Err(WsError::ConnectionClosed {
                                reason: format!("WebSocket error: {}", e),
                                location: ErrorLocation::from(Location::caller()),
                            });
                        }
                        None => {
                            log::info!("Connection {} closed by client", self.connection_id);
                            break Ok(());
                        }
                    }
                }

                _ = heartbeat.tick() => {
                    if last_seen.elapsed() > self.config.heartbeat_timeout {
                        log::warn!("Connection {} missed heartbeats, closing", self.connection_id);
                        drain = tx.try_send(close_frame(close_code::AWAY, "heartbeat timeout")).is_ok();
                        break Err(WsError::HeartbeatTimeout {
                            timeout_secs: self.config.heartbeat_timeout.as_secs(),
                            location: ErrorLocation::from(Location::caller()),
                        });
                    }
                    let _ = tx.try_send(Message::Ping(Default::default()));
                }

                _ = shutdown_guard.wait() => {
                    log::info!("Shutting down connection {} gracefully", self.connection_id);
                    drain = tx.try_send(close_frame(close_code::AWAY, "server shutting down")).is_ok();
                    break Ok(());
                }
            }
        };

        drop(tx);
        if !drain
            || tokio::time::timeout(SEND_DRAIN_TIMEOUT, &mut send_task)
                .await
                .is_err()
        {
            send_task.abort();
        }

        self.metrics.connection_closed(match &result {
            Ok(()) => "normal",
            Err(e) => e.kind(),
        });

        log::info!("WebSocket connection {} closed", self.connection_id);

        result
    }

    /// Handle a message from the client. Routed frames run on their own task.
    fn handle_client_message(&self, msg: Message, tx: &mpsc::Sender<Message>) {
        let frame = match msg {
            Message::Text(text) => text.as_str().to_string(),
            Message::Binary(data) => String::from_utf8_lossy(&data).into_owned(),
            Message::Ping(data) => {
                if tx.try_send(Message::Pong(data)).is_err() {
                    log::debug!("Dropping pong for busy connection {}", self.connection_id);
                }
                return;
            }
            Message::Pong(_) | Message::Close(_) => return,
        };

        if frame.len() > self.config.max_message_bytes {
            log::warn!(
                "Dropping {} byte frame from connection {} (limit {})",
                frame.len(),
                self.connection_id,
                self.config.max_message_bytes
            );
            self.metrics.error_occurred("frame_too_large");
            return;
        }

        let ctx = self.context.next_request();
        let reply_tx = tx.clone();
        tokio::spawn(async move {
            let response = dispatch(&frame, ctx).await;
            let _ = reply_tx.send(Message::Text(response.to_json().into())).await;
        });
    }
}
