//! Integration tests for the REST surface: health check and the
//! room-existence probe.

use futures_util::{SinkExt, StreamExt};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio_tungstenite::tungstenite::Message;

use roomcast::rooms::{RegistryPolicy, RoomRegistry};
use roomcast::state::AppState;

async fn start_test_server() -> SocketAddr {
    let state = AppState {
        rooms: Arc::new(RoomRegistry::new(RegistryPolicy::default())),
    };
    let app = roomcast::routes::build_router(state);
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    addr
}

#[tokio::test]
async fn test_health_check() {
    let addr = start_test_server().await;
    let resp = reqwest::get(format!("http://{}/health", addr)).await.unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.text().await.unwrap(), "ok");
}

#[tokio::test]
async fn test_room_probe_and_listing() {
    let addr = start_test_server().await;

    // Create a room over WebSocket first
    let (mut ws, _) = tokio_tungstenite::connect_async(format!("ws://{}/ws", addr))
        .await
        .expect("Failed to connect");
    ws.send(Message::Text(
        json!({"type": "createRoom", "roomId": "A"}).to_string().into(),
    ))
    .await
    .expect("Failed to send");
    let reply = tokio::time::timeout(Duration::from_secs(2), ws.next())
        .await
        .expect("Timed out")
        .expect("Stream ended")
        .expect("Receive error");
    assert!(matches!(reply, Message::Text(_)));

    // Listing shows the room with its occupant
    let rooms: Value = reqwest::get(format!("http://{}/api/rooms", addr))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(
        rooms,
        json!([{"roomId": "A", "participants": 1, "isOwner": false}])
    );

    // Existence probe: 200 for a known room, 404 otherwise
    let resp = reqwest::get(format!("http://{}/api/rooms/A", addr)).await.unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["roomId"], "A");

    let resp = reqwest::get(format!("http://{}/api/rooms/missing", addr))
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
}
