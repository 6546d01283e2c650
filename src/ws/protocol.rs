//! Wire envelopes and per-message dispatch.
//!
//! One flat JSON envelope shape in both directions, tagged by `type`.
//! Decode failures and unknown types are per-message faults: the sender gets
//! an `error` envelope and the connection stays open.

use serde::{Deserialize, Serialize};

use crate::rooms::{ConnectionId, Mover, RoomMode, StoredMessage};
use crate::state::AppState;
use crate::ws::{send_event, ConnectionSender};

/// Inbound envelope. Unknown `type` values fail deserialization and are
/// reported back as `error{Invalid type}`.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ClientRequest {
    #[serde(rename_all = "camelCase")]
    CreateRoom {
        room_id: String,
        #[serde(default)]
        mode: RoomMode,
    },
    #[serde(rename_all = "camelCase")]
    JoinRoom { room_id: String },
    LeaveRoom,
    #[serde(rename_all = "camelCase")]
    DeleteRoom { room_id: String },
    #[serde(rename_all = "camelCase")]
    SendMessage { room_id: String, message: String },
    GetRooms,
    #[serde(rename_all = "camelCase")]
    SetClientId { client_id: String },
}

/// Outbound envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ServerEvent {
    #[serde(rename_all = "camelCase")]
    RoomCreated {
        room_id: String,
        history: Vec<StoredMessage>,
    },
    #[serde(rename_all = "camelCase")]
    RoomJoined {
        room_id: String,
        history: Vec<StoredMessage>,
    },
    LeftRoom,
    #[serde(rename_all = "camelCase")]
    RoomDeleted { room_id: String },
    #[serde(rename_all = "camelCase")]
    Message {
        room_id: String,
        message: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        sender: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        next_mover: Option<Mover>,
    },
    RoomList { rooms: Vec<RoomSummary> },
    #[serde(rename_all = "camelCase")]
    ClientIdSet { client_id: String },
    Error { message: String },
}

/// One entry in `roomList` and the REST probe response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSummary {
    pub room_id: String,
    pub participants: usize,
    pub is_owner: bool,
}

/// Handle one inbound text frame: decode, dispatch to the registry, reply.
pub fn handle_text_message(
    text: &str,
    conn: ConnectionId,
    tx: &ConnectionSender,
    state: &AppState,
) {
    let request: ClientRequest = match serde_json::from_str(text) {
        Ok(request) => request,
        Err(e) => {
            tracing::warn!(connection_id = conn, error = %e, "Undecodable envelope");
            send_error(tx, "Invalid type");
            return;
        }
    };

    let reply = match request {
        ClientRequest::CreateRoom { room_id, mode } => {
            state.rooms.create_room(conn, room_id, mode).map(Some)
        }
        ClientRequest::JoinRoom { room_id } => state.rooms.join_room(conn, room_id).map(Some),
        ClientRequest::LeaveRoom => {
            state.rooms.leave_room(conn);
            Ok(Some(ServerEvent::LeftRoom))
        }
        ClientRequest::DeleteRoom { room_id } => state.rooms.delete_room(conn, room_id).map(Some),
        ClientRequest::SendMessage { room_id, message } => {
            // The sender is a member too: it receives the broadcast copy,
            // so there is no separate delivery reply.
            state.rooms.send_message(conn, room_id, message).map(|_| None)
        }
        ClientRequest::GetRooms => Ok(Some(ServerEvent::RoomList {
            rooms: state.rooms.list_rooms(Some(conn)),
        })),
        ClientRequest::SetClientId { client_id } => {
            Ok(Some(state.rooms.set_client_id(conn, client_id)))
        }
    };

    match reply {
        Ok(Some(event)) => send_event(tx, &event),
        Ok(None) => {}
        Err(err) => send_error(tx, &err.to_string()),
    }
}

/// Send an `error` envelope to the originating connection only.
pub fn send_error(tx: &ConnectionSender, message: &str) {
    send_event(
        tx,
        &ServerEvent::Error {
            message: message.to_string(),
        },
    );
}
