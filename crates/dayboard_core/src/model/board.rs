//! Board aggregate: the master roster followed by ordered day columns.
//!
//! # Responsibility
//! - Hold the ordered column list and expose read-only lookups.
//! - Normalize and validate boards decoded from persisted state.
//!
//! # Invariants
//! - Index 0 is the roster; indexes 1.. are day columns sorted by day number.
//! - Day numbers are positive and unique; ids match their day number.
//! - Every person in a day column exists in the roster and in no other day
//!   column.
//! - Callers outside the crate cannot mutate columns directly; transitions go
//!   through `crate::engine`.

use super::column::{day_title, Column, ColumnId, ROSTER_TITLE};
use super::person::{Person, PersonId};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Structural violations detected in a decoded board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardValidationError {
    /// No columns at all.
    Empty,
    /// Column 0 is not the master roster.
    MissingRoster { found: ColumnId },
    /// The roster id appears at a position other than 0.
    MisplacedRoster { index: usize },
    /// The roster carries a day number.
    RosterHasDayNumber(u32),
    /// A day column has no day number.
    MissingDayNumber(ColumnId),
    /// A day column has day number 0.
    InvalidDayNumber(ColumnId),
    /// A day column id does not match its day number.
    ColumnIdMismatch { id: ColumnId, day_number: u32 },
    /// Two day columns share one day number.
    DuplicateDayNumber(u32),
    /// The roster holds the same person id twice.
    DuplicatePerson(PersonId),
    /// A person has a blank name.
    EmptyName(PersonId),
    /// A day column references a person missing from the roster.
    UnknownPerson { column: ColumnId, person: PersonId },
    /// A person appears more than once across day columns.
    MultipleAssignments(PersonId),
}

impl Display for BoardValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "board has no columns"),
            Self::MissingRoster { found } => {
                write!(f, "first column must be the roster, found `{found}`")
            }
            Self::MisplacedRoster { index } => {
                write!(f, "roster column found at index {index}")
            }
            Self::RosterHasDayNumber(day) => {
                write!(f, "roster column must not carry day number {day}")
            }
            Self::MissingDayNumber(id) => write!(f, "day column `{id}` has no day number"),
            Self::InvalidDayNumber(id) => write!(f, "day column `{id}` has day number 0"),
            Self::ColumnIdMismatch { id, day_number } => write!(
                f,
                "day column `{id}` does not match day number {day_number}"
            ),
            Self::DuplicateDayNumber(day) => write!(f, "day number {day} is used twice"),
            Self::DuplicatePerson(id) => write!(f, "person `{id}` appears twice in roster"),
            Self::EmptyName(id) => write!(f, "person `{id}` has an empty name"),
            Self::UnknownPerson { column, person } => write!(
                f,
                "day column `{column}` references unknown person `{person}`"
            ),
            Self::MultipleAssignments(id) => {
                write!(f, "person `{id}` is assigned to more than one day")
            }
        }
    }
}

impl Error for BoardValidationError {}

/// Ordered board of columns.
///
/// Serialized as a bare JSON array of columns. Deserialization normalizes
/// and validates, so a decoded `Board` always satisfies the invariants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Column>", into = "Vec<Column>")]
pub struct Board {
    columns: Vec<Column>,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Creates a board holding only an empty roster.
    pub fn new() -> Self {
        Self {
            columns: vec![Column::roster()],
        }
    }

    /// Builds a board from raw columns, normalizing then validating.
    ///
    /// Normalization re-derives titles, replaces day-column person copies
    /// with their roster record, sorts people by name and sorts day columns
    /// by day number. Anything normalization cannot repair is rejected.
    pub fn from_columns(columns: Vec<Column>) -> Result<Self, BoardValidationError> {
        let mut board = Self { columns };
        board.normalize();
        board.validate()?;
        Ok(board)
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn roster(&self) -> &Column {
        &self.columns[0]
    }

    pub fn day_columns(&self) -> &[Column] {
        &self.columns[1..]
    }

    pub fn column(&self, id: &ColumnId) -> Option<&Column> {
        self.columns.iter().find(|column| &column.id == id)
    }

    /// Looks up a day column; the roster id never matches.
    pub fn day_column(&self, id: &ColumnId) -> Option<&Column> {
        self.day_columns().iter().find(|column| &column.id == id)
    }

    pub fn day_column_by_number(&self, day_number: u32) -> Option<&Column> {
        self.day_columns()
            .iter()
            .find(|column| column.day_number == Some(day_number))
    }

    /// Looks up a person in the roster.
    pub fn person(&self, id: &PersonId) -> Option<&Person> {
        self.roster().people.iter().find(|person| &person.id == id)
    }

    pub fn day_numbers(&self) -> impl Iterator<Item = u32> + '_ {
        self.day_columns()
            .iter()
            .filter_map(|column| column.day_number)
    }

    /// Checks every structural invariant.
    pub fn validate(&self) -> Result<(), BoardValidationError> {
        let roster = self.columns.first().ok_or(BoardValidationError::Empty)?;
        if !roster.is_roster() {
            return Err(BoardValidationError::MissingRoster {
                found: roster.id.clone(),
            });
        }
        if let Some(day) = roster.day_number {
            return Err(BoardValidationError::RosterHasDayNumber(day));
        }

        let mut roster_ids = HashSet::new();
        for person in &roster.people {
            if person.name.trim().is_empty() {
                return Err(BoardValidationError::EmptyName(person.id.clone()));
            }
            if !roster_ids.insert(&person.id) {
                return Err(BoardValidationError::DuplicatePerson(person.id.clone()));
            }
        }

        let mut seen_days = HashSet::new();
        let mut assigned = HashSet::new();
        for (index, column) in self.columns.iter().enumerate().skip(1) {
            if column.is_roster() {
                return Err(BoardValidationError::MisplacedRoster { index });
            }
            let day_number = column
                .day_number
                .ok_or_else(|| BoardValidationError::MissingDayNumber(column.id.clone()))?;
            if day_number == 0 {
                return Err(BoardValidationError::InvalidDayNumber(column.id.clone()));
            }
            if column.id != ColumnId::for_day(day_number) {
                return Err(BoardValidationError::ColumnIdMismatch {
                    id: column.id.clone(),
                    day_number,
                });
            }
            if !seen_days.insert(day_number) {
                return Err(BoardValidationError::DuplicateDayNumber(day_number));
            }
            for person in &column.people {
                if !roster_ids.contains(&person.id) {
                    return Err(BoardValidationError::UnknownPerson {
                        column: column.id.clone(),
                        person: person.id.clone(),
                    });
                }
                if !assigned.insert(&person.id) {
                    return Err(BoardValidationError::MultipleAssignments(person.id.clone()));
                }
            }
        }

        Ok(())
    }

    pub(crate) fn columns_mut(&mut self) -> &mut Vec<Column> {
        &mut self.columns
    }

    pub(crate) fn roster_mut(&mut self) -> &mut Column {
        &mut self.columns[0]
    }

    pub(crate) fn day_columns_mut(&mut self) -> &mut [Column] {
        &mut self.columns[1..]
    }

    /// Restores day-column order. The roster stays at index 0.
    pub(crate) fn sort_day_columns(&mut self) {
        self.columns[1..].sort_by_key(|column| column.day_number.unwrap_or(0));
    }

    fn normalize(&mut self) {
        let Some(first) = self.columns.first_mut() else {
            return;
        };
        if first.is_roster() {
            first.title = ROSTER_TITLE.to_string();
        }

        let names: HashMap<PersonId, String> = first
            .people
            .iter()
            .map(|person| (person.id.clone(), person.name.clone()))
            .collect();

        for column in &mut self.columns {
            if let (false, Some(day)) = (column.is_roster(), column.day_number) {
                column.title = day_title(day);
                for person in &mut column.people {
                    if let Some(name) = names.get(&person.id) {
                        person.name.clone_from(name);
                    }
                }
            }
            column.sort_people();
        }

        if self.columns.len() > 1 && self.columns[0].is_roster() {
            self.sort_day_columns();
        }
    }
}

impl TryFrom<Vec<Column>> for Board {
    type Error = BoardValidationError;

    fn try_from(value: Vec<Column>) -> Result<Self, Self::Error> {
        Self::from_columns(value)
    }
}

impl From<Board> for Vec<Column> {
    fn from(value: Board) -> Self {
        value.columns
    }
}
