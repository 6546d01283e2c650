pub mod actor;
pub mod handler;
pub mod protocol;

use axum::extract::ws::Message;
use tokio::sync::mpsc;

use self::protocol::ServerEvent;

/// Sender half of a WebSocket connection's outbound channel. The registry
/// holds a clone per connection to push broadcasts to that client.
pub type ConnectionSender = mpsc::UnboundedSender<Message>;

/// Serialize an outbound envelope and push it to one connection.
/// A closed channel means the client is gone; the write is skipped so a dead
/// peer never stalls delivery to the others.
pub fn send_event(tx: &ConnectionSender, event: &ServerEvent) {
    if tx.is_closed() {
        return;
    }
    if let Ok(text) = serde_json::to_string(event) {
        let _ = tx.send(Message::Text(text.into()));
    }
}
