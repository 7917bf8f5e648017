//! Follow-up API Library Crate
//!
//! This library contains the configuration, application state, handlers and
//! routing for the follow-up decision web service. The binaries in `bin/` are
//! thin wrappers around it.

pub mod config;
pub mod handlers;
pub mod models;
pub mod router;
pub mod state;
