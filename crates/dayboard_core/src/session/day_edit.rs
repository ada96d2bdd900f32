//! Edit-day-number flow for one day column.
//!
//! `Viewing -> Editing` on request; `Editing -> Viewing` on successful save
//! or cancel. A rejected save keeps the draft so the user can retry.

use crate::engine::lifecycle::{renumber_column, ColumnRejection};
use crate::model::board::Board;
use crate::model::column::ColumnId;

/// Draft state of the day-number editor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DayEdit {
    #[default]
    Viewing,
    Editing {
        column: ColumnId,
        /// `None` while the input is blank.
        draft: Option<u32>,
    },
}

/// Board produced by a successful save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenumberedDay {
    pub board: Board,
    pub old_id: ColumnId,
    pub new_id: ColumnId,
}

impl DayEdit {
    /// Starts editing `column_id`, seeding the draft with its day number.
    ///
    /// Returns `false` (state unchanged) when the id is not a day column.
    pub fn begin(&mut self, board: &Board, column_id: &ColumnId) -> bool {
        let Some(column) = board.day_column(column_id) else {
            return false;
        };
        *self = Self::Editing {
            column: column.id.clone(),
            draft: Some(column.day_number.unwrap_or(1)),
        };
        true
    }

    pub fn set_draft(&mut self, value: Option<u32>) {
        if let Self::Editing { draft, .. } = self {
            *draft = value;
        }
    }

    pub fn cancel(&mut self) {
        *self = Self::Viewing;
    }

    pub fn editing_column(&self) -> Option<&ColumnId> {
        match self {
            Self::Viewing => None,
            Self::Editing { column, .. } => Some(column),
        }
    }

    /// Applies the draft through `renumber_column`.
    ///
    /// `Ok(None)` means nothing to save (not editing, or blank draft).
    /// Collisions and invalid numbers keep the editor open; a vanished column
    /// closes it.
    pub fn save(&mut self, board: &Board) -> Result<Option<RenumberedDay>, ColumnRejection> {
        let (column, day_number) = match self {
            Self::Editing {
                column,
                draft: Some(day_number),
            } => (column.clone(), *day_number),
            _ => return Ok(None),
        };

        match renumber_column(board, &column, day_number) {
            Ok((next, new_id)) => {
                *self = Self::Viewing;
                Ok(Some(RenumberedDay {
                    board: next,
                    old_id: column,
                    new_id,
                }))
            }
            Err(err @ ColumnRejection::ColumnNotFound(_)) => {
                *self = Self::Viewing;
                Err(err)
            }
            Err(err) => Err(err),
        }
    }
}
