//! Board runtime configuration.
//!
//! # Responsibility
//! - Collect storage keys and transient-state timings in one value.
//!
//! # Invariants
//! - Storage keys stay stable across releases; changing them orphans saved
//!   boards.

use std::time::Duration;

/// Storage key of the serialized board.
pub const BOARD_STORAGE_KEY: &str = "customer-management-app-data";
/// Storage key of the serialized collapse flags.
pub const COLLAPSE_STORAGE_KEY: &str = "customer-management-collapsed-columns";
/// Advisory shown when collapsing a column with nobody in it.
pub const EMPTY_COLUMN_NOTICE: &str = "No customer here";

const HIGHLIGHT_WINDOW_MS: u64 = 1_000;
const NOTICE_WINDOW_MS: u64 = 1_000;
const PRINT_SETTLE_DELAY_MS: u64 = 500;

/// Settings shared by the session, storage and print layers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardConfig {
    /// How long a duplicate-name highlight stays visible.
    pub highlight_window: Duration,
    /// How long the empty-column notice stays visible.
    pub notice_window: Duration,
    /// Delay between a print request and dispatch to the print sink.
    pub print_settle_delay: Duration,
    pub board_key: String,
    pub collapse_key: String,
    /// Heading of printed documents.
    pub document_title: String,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            highlight_window: Duration::from_millis(HIGHLIGHT_WINDOW_MS),
            notice_window: Duration::from_millis(NOTICE_WINDOW_MS),
            print_settle_delay: Duration::from_millis(PRINT_SETTLE_DELAY_MS),
            board_key: BOARD_STORAGE_KEY.to_string(),
            collapse_key: COLLAPSE_STORAGE_KEY.to_string(),
            document_title: "Customer Management".to_string(),
        }
    }
}
