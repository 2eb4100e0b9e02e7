use axum_test::{TestServer, TestWebSocket};
use serde_json::{Value, json};

/// WebSocket test client wrapper
pub struct WsTestClient {
    ws: TestWebSocket,
}

impl WsTestClient {
    pub async fn connect(server: &TestServer) -> Self {
        let ws = server.get_websocket("/ws").await.into_websocket().await;
        Self { ws }
    }

    /// Publish `data` on the broadcast route
    pub async fn send_message(&mut self, data: Value) {
        self.send_text(json!({ "message": "sendmessage", "data": data }))
            .await;
    }

    pub async fn send_text(&mut self, text: impl std::fmt::Display) {
        self.ws.send_text(text).await;
    }

    pub async fn receive_text(&mut self) -> String {
        self.ws.receive_text().await
    }

    pub async fn receive_json(&mut self) -> Value {
        self.ws.receive_json().await
    }

    pub async fn close(self) {
        self.ws.close().await;
    }
}

/// Connect `count` clients to the same server
pub async fn connect_clients(server: &TestServer, count: usize) -> Vec<WsTestClient> {
    let mut clients = Vec::with_capacity(count);
    for _ in 0..count {
        clients.push(WsTestClient::connect(server).await);
    }
    clients
}
