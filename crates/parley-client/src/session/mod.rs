//! Lifecycle of the single active backend session.
//!
//! `SessionManager` is a synchronous state machine; the orchestrator drives
//! it around the backend calls that actually open a session.

mod manager;
mod types;

pub use manager::{Establishing, SessionManager};
pub use types::{Session, SessionStatus};
