//! Document store for riskscope
//!
//! Two independent JSON documents back the whole application state: the
//! dashboard data (submitted forms plus prediction results) and the chat
//! history. Both are opaque blobs to the store; their schema is enforced
//! only by the consuming code.
//!
//! A document that fails to parse on load is discarded and replaced by the
//! initial state. That recovery is logged, never surfaced as an error.

pub mod repo;
pub mod schema;

pub use repo::{Database, CHAT_HISTORY_SLOT, DASHBOARD_SLOT};
