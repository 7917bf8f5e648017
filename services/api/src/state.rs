//! Shared Application State
//!
//! This module defines the `AppState` struct, which holds the shared
//! service clients built once at startup.

use followup_core::FollowUpService;
use std::sync::Arc;

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub followup_service: Arc<dyn FollowUpService>,
}

impl AppState {
    pub fn new(followup_service: Arc<dyn FollowUpService>) -> Self {
        Self { followup_service }
    }
}
