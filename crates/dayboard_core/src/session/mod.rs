//! Ephemeral session state that is never persisted.
//!
//! # Responsibility
//! - Track auto-expiring feedback (duplicate highlight, empty-column notice).
//! - Track the open assignment menu and the day-number edit draft.
//!
//! # Invariants
//! - Expiry is driven by the caller through `Instant` values; nothing here
//!   spawns threads or sleeps.
//! - At most one timer is armed per slot.

pub mod day_edit;
pub mod timers;
pub mod transient;
