//! Core logic for the day board: a master roster of people, numbered day
//! columns, and the rules that move people between them.
//! This crate is the single source of truth for board invariants.

pub mod config;
pub mod db;
pub mod engine;
pub mod logging;
pub mod model;
pub mod print;
pub mod repo;
pub mod service;
pub mod session;

pub use config::{BoardConfig, BOARD_STORAGE_KEY, COLLAPSE_STORAGE_KEY, EMPTY_COLUMN_NOTICE};
pub use engine::assignment::{
    add_person, assign_person_to_column, column_of, remove_person_from_column,
    remove_person_globally, unassigned_people, AddPersonOutcome, AssignmentRejection,
};
pub use engine::lifecycle::{
    add_column, next_day_number, remove_column, renumber_column, ColumnRejection,
};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::board::{Board, BoardValidationError};
pub use model::collapse::CollapseFlags;
pub use model::column::{Column, ColumnId, ROSTER_COLUMN_ID, ROSTER_TITLE};
pub use model::person::{is_duplicate, normalize_name, Person, PersonId};
pub use print::document::{PrintColumn, PrintDocument, PrintEntry};
pub use print::{PrintError, PrintScope, PrintSink};
pub use repo::board_store::BoardStore;
pub use repo::state_repo::{RepoError, RepoResult, SqliteStateRepository, StateRepository};
pub use service::board_session::{BoardSession, CollapseOutcome, SessionError};
pub use session::day_edit::DayEdit;
pub use session::transient::{TimerSlot, TransientSnapshot, TransientState};
