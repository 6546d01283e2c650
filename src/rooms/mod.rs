//! Room registry: the in-memory mapping from room ids to connected members.
//!
//! Pure data-structure logic — the only I/O it performs is pushing outbound
//! envelopes into per-connection channels owned by the WebSocket actors.

pub mod error;
pub mod history;
pub mod registry;

pub use error::RegistryError;
pub use history::{Mover, RoomExtension, RoomMode, StoredMessage};
pub use registry::{RegistryPolicy, RoomRegistry};

/// Caller-supplied room identifier. Unique key, not validated for format.
pub type RoomId = String;

/// Server-assigned handle for one WebSocket connection, allocated at accept.
pub type ConnectionId = u64;
