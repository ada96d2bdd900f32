//! Print collaborator.
//!
//! # Responsibility
//! - Project a board subset into a printable document.
//! - Hand rendered HTML to a best-effort platform sink.
//!
//! # Invariants
//! - Sink failures are reported to the caller for logging only; they never
//!   change board or session state.

use crate::model::column::ColumnId;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod document;

/// Which columns a print request covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrintScope {
    /// Every column in board order.
    All,
    /// The roster followed by exactly one day column.
    RosterWith(ColumnId),
}

/// Errors raised by a print sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrintError {
    /// No print facility is available on this platform.
    Unavailable,
    /// The facility refused or failed the job.
    Failed(String),
}

impl Display for PrintError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unavailable => write!(f, "no print facility available"),
            Self::Failed(message) => write!(f, "print failed: {message}"),
        }
    }
}

impl Error for PrintError {}

/// Platform print facility.
pub trait PrintSink {
    fn print(&mut self, html: &str) -> Result<(), PrintError>;
}
