//! Per-room auxiliary state, attached at creation time.
//!
//! Rooms serve two purposes over the same membership core: plain chat rooms
//! that log broadcast messages, and turn-based rooms that additionally track
//! whose move it is. Both keep an append-only history that is replayed to a
//! client on create/join.

use serde::{Deserialize, Serialize};

/// Room purpose, chosen by the creator. Re-creation of an existing room
/// never changes its mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomMode {
    #[default]
    Chat,
    Turns,
}

/// Current mover in a turn-based room. Flipped on every accepted message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mover {
    X,
    O,
}

impl Mover {
    pub fn flip(self) -> Self {
        match self {
            Self::X => Self::O,
            Self::O => Self::X,
        }
    }
}

/// One logged broadcast, as replayed in `roomCreated`/`roomJoined` envelopes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredMessage {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender: Option<String>,
}

/// Auxiliary state keyed by room purpose, so the registry core stays generic
/// over what a room is for.
#[derive(Debug)]
pub enum RoomExtension {
    Chat { history: Vec<StoredMessage> },
    Turns { history: Vec<StoredMessage>, next_mover: Mover },
}

impl RoomExtension {
    pub fn new(mode: RoomMode) -> Self {
        match mode {
            RoomMode::Chat => Self::Chat { history: Vec::new() },
            RoomMode::Turns => Self::Turns {
                history: Vec::new(),
                next_mover: Mover::X,
            },
        }
    }

    pub fn history(&self) -> &[StoredMessage] {
        match self {
            Self::Chat { history } | Self::Turns { history, .. } => history,
        }
    }

    /// Append a message to the history, enforcing the retention limit
    /// (0 = unbounded, oldest entries dropped first). Turn rooms flip the
    /// mover; the post-flip mover is returned for inclusion in the broadcast.
    pub fn record(&mut self, message: StoredMessage, limit: usize) -> Option<Mover> {
        let (history, flipped) = match self {
            Self::Chat { history } => (history, None),
            Self::Turns { history, next_mover } => {
                *next_mover = next_mover.flip();
                (history, Some(*next_mover))
            }
        };

        history.push(message);
        if limit > 0 && history.len() > limit {
            let excess = history.len() - limit;
            history.drain(..excess);
        }
        flipped
    }
}
