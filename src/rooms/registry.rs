//! The room registry and its operation set.
//!
//! A single mutex guards the whole registry interior: room membership and
//! per-connection state are coupled by the one-room-per-connection invariant,
//! so every operation (membership add/remove, history append, existence
//! check) observes a consistent snapshot. Concurrent `joinRoom` and
//! `deleteRoom` on the same room id serialize here — join-after-delete
//! surfaces as `NotFound`, never a dangling membership.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};

use indexmap::IndexMap;

use crate::rooms::error::RegistryError;
use crate::rooms::history::{RoomExtension, RoomMode, StoredMessage};
use crate::rooms::{ConnectionId, RoomId};
use crate::ws::protocol::{RoomSummary, ServerEvent};
use crate::ws::{send_event, ConnectionSender};

/// Behavioral switches for the registry, set from config at startup.
#[derive(Debug, Clone)]
pub struct RegistryPolicy {
    /// Reject `createRoom` on an existing id instead of treating it as a join.
    pub strict_create: bool,
    /// Require the requester's client id to match the recorded owner on delete.
    pub owner_gated_delete: bool,
    /// Max history entries retained per room; oldest dropped first. 0 = unbounded.
    pub history_limit: usize,
}

impl Default for RegistryPolicy {
    fn default() -> Self {
        Self {
            strict_create: false,
            owner_gated_delete: false,
            history_limit: 500,
        }
    }
}

/// Per-connection state owned by the registry, looked up by connection id.
/// Kept here rather than on the transport handle so the membership invariant
/// and `current_room` are updated under the same lock.
struct ConnectionState {
    sender: ConnectionSender,
    client_id: Option<String>,
    current_room: Option<RoomId>,
}

struct Room {
    /// Join order, each connection at most once.
    members: Vec<ConnectionId>,
    /// Client id of the creator, when it had one declared at creation time.
    owner: Option<String>,
    extension: RoomExtension,
}

struct RegistryInner {
    /// Insertion-ordered so `listRooms` reflects creation order.
    rooms: IndexMap<RoomId, Room>,
    connections: HashMap<ConnectionId, ConnectionState>,
}

impl RegistryInner {
    /// Remove the connection from its current room, if any. Returns whether
    /// a membership existed. Tolerates the member already being gone from
    /// the room's list (disconnect races).
    fn detach(&mut self, conn: ConnectionId) -> bool {
        let Some(state) = self.connections.get_mut(&conn) else {
            return false;
        };
        let Some(room_id) = state.current_room.take() else {
            return false;
        };
        if let Some(room) = self.rooms.get_mut(&room_id) {
            room.members.retain(|m| *m != conn);
        }
        true
    }

    /// Add the connection to a room's member list and point its
    /// `current_room` at it. Callers ensure the room exists and the
    /// connection is detached first.
    fn attach(&mut self, conn: ConnectionId, room_id: &str) {
        if let Some(state) = self.connections.get_mut(&conn) {
            state.current_room = Some(room_id.to_string());
        }
        if let Some(room) = self.rooms.get_mut(room_id) {
            if !room.members.contains(&conn) {
                room.members.push(conn);
            }
        }
    }
}

/// The shared room registry. One instance per server process, accessed by
/// every connection actor through `AppState`.
pub struct RoomRegistry {
    policy: RegistryPolicy,
    next_connection_id: AtomicU64,
    inner: Mutex<RegistryInner>,
}

impl RoomRegistry {
    pub fn new(policy: RegistryPolicy) -> Self {
        Self {
            policy,
            next_connection_id: AtomicU64::new(1),
            inner: Mutex::new(RegistryInner {
                rooms: IndexMap::new(),
                connections: HashMap::new(),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, RegistryInner> {
        self.inner.lock().expect("room registry lock poisoned")
    }

    /// Register a newly accepted connection and allocate its id.
    pub fn register(&self, sender: ConnectionSender, client_id: Option<String>) -> ConnectionId {
        let conn = self.next_connection_id.fetch_add(1, Ordering::Relaxed);
        self.lock().connections.insert(
            conn,
            ConnectionState {
                sender,
                client_id,
                current_room: None,
            },
        );
        conn
    }

    /// Transport-close path: leave the current room (if any) and drop the
    /// connection state. Safe to call more than once.
    pub fn disconnect(&self, conn: ConnectionId) {
        let mut inner = self.lock();
        inner.detach(conn);
        inner.connections.remove(&conn);
    }

    /// Record the connection's self-asserted client identifier.
    pub fn set_client_id(&self, conn: ConnectionId, client_id: String) -> ServerEvent {
        if let Some(state) = self.lock().connections.get_mut(&conn) {
            state.client_id = Some(client_id.clone());
        }
        ServerEvent::ClientIdSet { client_id }
    }

    /// Create a room (first time) or, in the non-strict baseline, join the
    /// existing one. Re-creation never resets history, owner, or mode.
    pub fn create_room(
        &self,
        conn: ConnectionId,
        room_id: RoomId,
        mode: RoomMode,
    ) -> Result<ServerEvent, RegistryError> {
        let mut guard = self.lock();
        let inner = &mut *guard;

        let exists = inner.rooms.contains_key(&room_id);
        if exists && self.policy.strict_create {
            return Err(RegistryError::AlreadyExists);
        }
        if !exists {
            let owner = inner
                .connections
                .get(&conn)
                .and_then(|c| c.client_id.clone());
            inner.rooms.insert(
                room_id.clone(),
                Room {
                    members: Vec::new(),
                    owner,
                    extension: RoomExtension::new(mode),
                },
            );
        }

        inner.detach(conn);
        inner.attach(conn, &room_id);

        let history = inner
            .rooms
            .get(&room_id)
            .map(|r| r.extension.history().to_vec())
            .unwrap_or_default();
        Ok(ServerEvent::RoomCreated { room_id, history })
    }

    /// Join an existing room, silently leaving any previous one first.
    pub fn join_room(
        &self,
        conn: ConnectionId,
        room_id: RoomId,
    ) -> Result<ServerEvent, RegistryError> {
        let mut guard = self.lock();
        let inner = &mut *guard;

        if !inner.rooms.contains_key(&room_id) {
            return Err(RegistryError::NotFound);
        }

        inner.detach(conn);
        inner.attach(conn, &room_id);

        let history = inner
            .rooms
            .get(&room_id)
            .map(|r| r.extension.history().to_vec())
            .unwrap_or_default();
        Ok(ServerEvent::RoomJoined { room_id, history })
    }

    /// Leave the current room. Idempotent: returns whether a membership
    /// existed, never fails.
    pub fn leave_room(&self, conn: ConnectionId) -> bool {
        self.lock().detach(conn)
    }

    /// Delete a room, notifying its members before eviction. The requester
    /// gets the `roomDeleted` envelope as the direct reply instead of a
    /// second copy via broadcast. All former members have `current_room`
    /// cleared immediately.
    pub fn delete_room(
        &self,
        conn: ConnectionId,
        room_id: RoomId,
    ) -> Result<ServerEvent, RegistryError> {
        let mut guard = self.lock();
        let inner = &mut *guard;

        if !inner.rooms.contains_key(&room_id) {
            return Err(RegistryError::NotFound);
        }
        if self.policy.owner_gated_delete {
            let owner = inner.rooms.get(&room_id).and_then(|r| r.owner.as_deref());
            let requester = inner
                .connections
                .get(&conn)
                .and_then(|c| c.client_id.as_deref());
            // An ownerless room is only deletable when gating is off.
            let allowed = matches!((owner, requester), (Some(owner), Some(req)) if owner == req);
            if !allowed {
                return Err(RegistryError::Forbidden);
            }
        }

        let event = ServerEvent::RoomDeleted {
            room_id: room_id.clone(),
        };
        if let Some(room) = inner.rooms.shift_remove(&room_id) {
            for member in room.members {
                if let Some(peer) = inner.connections.get_mut(&member) {
                    peer.current_room = None;
                    if member != conn {
                        send_event(&peer.sender, &event);
                    }
                }
            }
        }
        Ok(event)
    }

    /// Append to the room's history and fan the message out to every current
    /// member, sender included. Closed connections are skipped. Turn rooms
    /// flip the mover and carry it in the broadcast.
    pub fn send_message(
        &self,
        conn: ConnectionId,
        room_id: RoomId,
        message: String,
    ) -> Result<(), RegistryError> {
        let mut guard = self.lock();
        let inner = &mut *guard;

        let sender = inner
            .connections
            .get(&conn)
            .and_then(|c| c.client_id.clone());
        let Some(room) = inner.rooms.get_mut(&room_id) else {
            return Err(RegistryError::NotFound);
        };

        let next_mover = room.extension.record(
            StoredMessage {
                message: message.clone(),
                sender: sender.clone(),
            },
            self.policy.history_limit,
        );

        let event = ServerEvent::Message {
            room_id,
            message,
            sender,
            next_mover,
        };
        for member in &room.members {
            if let Some(peer) = inner.connections.get(member) {
                send_event(&peer.sender, &event);
            }
        }
        Ok(())
    }

    /// Snapshot of all rooms in creation order. `is_owner` is computed
    /// against the caller's client id; `None` (e.g. the REST probe) owns
    /// nothing.
    pub fn list_rooms(&self, conn: Option<ConnectionId>) -> Vec<RoomSummary> {
        let inner = self.lock();
        let caller = conn
            .and_then(|c| inner.connections.get(&c))
            .and_then(|c| c.client_id.as_deref());
        inner
            .rooms
            .iter()
            .map(|(id, room)| RoomSummary {
                room_id: id.clone(),
                participants: room.members.len(),
                is_owner: matches!((&room.owner, caller), (Some(owner), Some(me)) if owner == me),
            })
            .collect()
    }
}
