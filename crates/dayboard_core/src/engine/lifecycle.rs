//! Day column lifecycle: create, renumber, delete.
//!
//! # Invariants
//! - Day numbers stay positive and unique; collisions are rejected.
//! - Day columns are re-sorted by day number after every create/renumber.
//! - Renumbering builds a fresh column under the derived id and carries the
//!   people list across; deleting a column never touches the roster.

use crate::model::board::Board;
use crate::model::column::{Column, ColumnId};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Rejections from column lifecycle transitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnRejection {
    /// Another day column already uses this number.
    ColumnNumberCollision(u32),
    /// Day numbers start at 1.
    InvalidDayNumber(u32),
    /// No day column with this id.
    ColumnNotFound(ColumnId),
    /// The highest day number is taken; auto-numbering has nowhere to go.
    DayNumbersExhausted,
}

impl Display for ColumnRejection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ColumnNumberCollision(day) => write!(f, "day {day} already exists"),
            Self::InvalidDayNumber(day) => write!(f, "day number must be positive, got {day}"),
            Self::ColumnNotFound(id) => write!(f, "day column not found: {id}"),
            Self::DayNumbersExhausted => {
                write!(f, "day {} exists, no higher day number is available", u32::MAX)
            }
        }
    }
}

impl Error for ColumnRejection {}

/// Next auto-assigned day number: `max(existing ∪ {0}) + 1`.
///
/// `None` once a day column already holds `u32::MAX`.
pub fn next_day_number(board: &Board) -> Option<u32> {
    board.day_numbers().max().unwrap_or(0).checked_add(1)
}

/// Appends a day column, auto-numbered when `requested` is `None`.
///
/// Returns the new board and the id of the created column.
pub fn add_column(
    board: &Board,
    requested: Option<u32>,
) -> Result<(Board, ColumnId), ColumnRejection> {
    let day_number = match requested {
        Some(day) => {
            ensure_day_available(board, day, None)?;
            day
        }
        None => {
            let day = next_day_number(board).ok_or(ColumnRejection::DayNumbersExhausted)?;
            ensure_day_available(board, day, None)?;
            day
        }
    };

    let column = Column::day(day_number);
    let id = column.id.clone();
    let mut next = board.clone();
    next.columns_mut().push(column);
    next.sort_day_columns();
    Ok((next, id))
}

/// Deletes a day column; its people become unassigned.
///
/// The roster id and unknown ids are no-ops.
pub fn remove_column(board: &Board, column_id: &ColumnId) -> Board {
    let mut next = board.clone();
    if !column_id.is_roster() {
        next.columns_mut().retain(|column| &column.id != column_id);
    }
    next
}

/// Moves a day column to a new day number.
///
/// Returns the new board and the column's new id. Renumbering to the current
/// number succeeds without change.
pub fn renumber_column(
    board: &Board,
    column_id: &ColumnId,
    new_day_number: u32,
) -> Result<(Board, ColumnId), ColumnRejection> {
    let current = board
        .day_column(column_id)
        .ok_or_else(|| ColumnRejection::ColumnNotFound(column_id.clone()))?;
    ensure_day_available(board, new_day_number, Some(column_id))?;

    let mut replacement = Column::day(new_day_number);
    replacement.people = current.people.clone();
    let new_id = replacement.id.clone();

    let mut next = board.clone();
    for column in next.day_columns_mut() {
        if &column.id == column_id {
            *column = replacement;
            break;
        }
    }
    next.sort_day_columns();
    Ok((next, new_id))
}

fn ensure_day_available(
    board: &Board,
    day_number: u32,
    except: Option<&ColumnId>,
) -> Result<(), ColumnRejection> {
    if day_number == 0 {
        return Err(ColumnRejection::InvalidDayNumber(day_number));
    }
    match board.day_column_by_number(day_number) {
        Some(existing) if Some(&existing.id) != except => {
            Err(ColumnRejection::ColumnNumberCollision(day_number))
        }
        _ => Ok(()),
    }
}
