//! Storage collaborator: key-value persistence for board state.
//!
//! # Responsibility
//! - Define the key-value contract and its SQLite implementation.
//! - Encode/decode the board and collapse flags under their fixed keys.
//!
//! # Invariants
//! - Decoding failures never escape `BoardStore`; they are logged and
//!   replaced by defaults.
//! - Transport failures (SQLite) are returned to the caller.

pub mod board_store;
pub mod state_repo;
