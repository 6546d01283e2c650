use std::sync::Arc;

use crate::rooms::RoomRegistry;

/// Shared application state passed to all handlers via axum State extractor.
#[derive(Clone)]
pub struct AppState {
    /// The room registry: all membership and broadcast state
    pub rooms: Arc<RoomRegistry>,
}
