//! Use-case facade over the core.
//!
//! # Responsibility
//! - Turn each user intent into one board transition plus the matching
//!   session-state update and persistence write.
//! - Keep renderers decoupled from storage and timer details.

pub mod board_session;
