use thiserror::Error;

/// Errors produced by room registry operations.
///
/// All of these are recovered at the connection handler boundary and surfaced
/// as an `error`-typed envelope to the originating connection only; none are
/// fatal to the process or to other connections. A failed operation leaves no
/// partial side effects behind.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// The room id is unknown to a room-scoped operation.
    #[error("Room does not exist")]
    NotFound,

    /// A non-owner attempted deletion while owner gating is enabled.
    #[error("Only the room owner can delete it")]
    Forbidden,

    /// `createRoom` on an existing id while strict create is enabled.
    #[error("Room already exists")]
    AlreadyExists,
}
