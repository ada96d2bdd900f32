//! Board session: one owner for persisted and ephemeral state.
//!
//! # Responsibility
//! - Apply engine transitions and persist the changed slice before returning.
//! - Keep transient state (highlight, notices, menu, edit draft, pending
//!   print) consistent with the board.
//!
//! # Invariants
//! - `board` only changes after the store accepted the new value.
//! - A board change clears the duplicate highlight.
//! - Column-keyed session state follows renumbers and is dropped on removal,
//!   in memory even when writing the follow-up collapse flags fails.
//! - A print captures the board when requested; only the hand-off to the
//!   sink is delayed.

use crate::config::BoardConfig;
use crate::engine::assignment::{
    add_person, assign_person_to_column, column_of, remove_person_from_column,
    remove_person_globally, unassigned_people, AddPersonOutcome, AssignmentRejection,
};
use crate::engine::lifecycle::{add_column, remove_column, ColumnRejection};
use crate::model::board::Board;
use crate::model::collapse::CollapseFlags;
use crate::model::column::{Column, ColumnId};
use crate::model::person::{Person, PersonId};
use crate::print::document::PrintDocument;
use crate::print::{PrintScope, PrintSink};
use crate::repo::board_store::BoardStore;
use crate::repo::state_repo::{RepoError, RepoResult, StateRepository};
use crate::session::day_edit::DayEdit;
use crate::session::transient::{TimerSlot, TransientSnapshot, TransientState};
use chrono::Local;
use log::{debug, error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

/// Errors from session operations.
#[derive(Debug)]
pub enum SessionError {
    /// Persistence failed; in-memory state was left unchanged.
    Repo(RepoError),
    /// Column create/renumber was rejected.
    Column(ColumnRejection),
    /// Assignment was rejected.
    Assignment(AssignmentRejection),
}

impl Display for SessionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "{err}"),
            Self::Column(err) => write!(f, "{err}"),
            Self::Assignment(err) => write!(f, "{err}"),
        }
    }
}

impl Error for SessionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::Column(err) => Some(err),
            Self::Assignment(err) => Some(err),
        }
    }
}

impl From<RepoError> for SessionError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<ColumnRejection> for SessionError {
    fn from(value: ColumnRejection) -> Self {
        Self::Column(value)
    }
}

impl From<AssignmentRejection> for SessionError {
    fn from(value: AssignmentRejection) -> Self {
        Self::Assignment(value)
    }
}

/// Result of a collapse toggle request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollapseOutcome {
    /// The flag flipped to `collapsed`.
    Toggled { collapsed: bool },
    /// The column is empty; `shown` is false when a notice was already up.
    EmptyNotice { shown: bool },
    /// Roster or unknown column.
    Ignored,
}

/// Single-owner session over one board.
pub struct BoardSession<R: StateRepository> {
    store: BoardStore<R>,
    config: BoardConfig,
    board: Board,
    collapse: CollapseFlags,
    transient: TransientState,
    day_edit: DayEdit,
    add_day_draft: Option<u32>,
    pending_print: Option<PrintDocument>,
}

impl<R: StateRepository> BoardSession<R> {
    /// Loads persisted state from `repo`, falling back to defaults.
    pub fn open(repo: R, config: BoardConfig) -> RepoResult<Self> {
        let store = BoardStore::new(repo, &config);
        let board = store.load_board()?;
        let mut collapse = store.load_collapse_flags()?;
        let stale = collapse.prune(|column_id| board.day_column(column_id).is_some());
        if stale > 0 {
            debug!("event=collapse_load module=service status=pruned entries={stale}");
        }
        let transient = TransientState::new(&config);
        Ok(Self {
            store,
            config,
            board,
            collapse,
            transient,
            day_edit: DayEdit::default(),
            add_day_draft: None,
            pending_print: None,
        })
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn collapse_flags(&self) -> &CollapseFlags {
        &self.collapse
    }

    pub fn transient(&self) -> &TransientState {
        &self.transient
    }

    pub fn snapshot(&self) -> TransientSnapshot {
        self.transient.snapshot()
    }

    pub fn day_edit(&self) -> &DayEdit {
        &self.day_edit
    }

    pub fn add_day_draft(&self) -> Option<u32> {
        self.add_day_draft
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    pub fn store(&self) -> &BoardStore<R> {
        &self.store
    }

    /// People offered by an assignment menu.
    pub fn menu_candidates(&self) -> Vec<&Person> {
        unassigned_people(&self.board)
    }

    /// Day column shown as a badge next to a roster entry.
    pub fn day_badge(&self, person_id: &PersonId) -> Option<&Column> {
        column_of(&self.board, person_id)
    }

    /// Adds a roster entry; duplicates highlight the existing entry.
    pub fn add_person(&mut self, raw_name: &str, now: Instant) -> RepoResult<AddPersonOutcome> {
        let (next, outcome) = add_person(&self.board, raw_name);
        match &outcome {
            AddPersonOutcome::Added(_) => {
                self.commit_board(next)?;
            }
            AddPersonOutcome::DuplicateName { existing } => {
                debug!("event=person_add module=service status=duplicate person_id={existing}");
                self.transient.highlight_duplicate(existing.clone(), now);
            }
            AddPersonOutcome::EmptyName => {}
        }
        Ok(outcome)
    }

    /// Removes a person from the roster and every day column.
    pub fn remove_person(&mut self, person_id: &PersonId) -> RepoResult<()> {
        let next = remove_person_globally(&self.board, person_id);
        self.commit_board(next)?;
        Ok(())
    }

    /// Unassigns a person from one day column.
    pub fn unassign_person(&mut self, column_id: &ColumnId, person_id: &PersonId) -> RepoResult<()> {
        let next = remove_person_from_column(&self.board, column_id, person_id);
        self.commit_board(next)?;
        Ok(())
    }

    /// Assigns a person from an open menu, then closes the menu.
    pub fn assign_person(
        &mut self,
        column_id: &ColumnId,
        person_id: &PersonId,
    ) -> Result<(), SessionError> {
        let next = assign_person_to_column(&self.board, column_id, person_id)?;
        self.commit_board(next)?;
        self.transient.close_menu();
        Ok(())
    }

    /// Creates a day column, auto-numbered when `requested` is `None`.
    pub fn add_column(&mut self, requested: Option<u32>) -> Result<ColumnId, SessionError> {
        let (next, column_id) = add_column(&self.board, requested)?;
        self.commit_board(next)?;
        Ok(column_id)
    }

    pub fn set_add_day_draft(&mut self, draft: Option<u32>) {
        self.add_day_draft = draft;
    }

    /// Submits the add-day form; the draft is cleared only on success.
    pub fn submit_add_day(&mut self) -> Result<ColumnId, SessionError> {
        let column_id = self.add_column(self.add_day_draft)?;
        self.add_day_draft = None;
        Ok(column_id)
    }

    /// Deletes a day column and every piece of state scoped to it.
    pub fn remove_column(&mut self, column_id: &ColumnId) -> RepoResult<()> {
        let next = remove_column(&self.board, column_id);
        if !self.commit_board(next)? {
            return Ok(());
        }

        self.transient.forget_column(column_id);
        if self.day_edit.editing_column() == Some(column_id) {
            self.day_edit.cancel();
        }
        let mut flags = self.collapse.clone();
        if flags.forget(column_id) {
            self.follow_collapse(flags)?;
        }
        Ok(())
    }

    /// Opens the day-number editor for a day column.
    pub fn begin_day_edit(&mut self, column_id: &ColumnId) -> bool {
        self.day_edit.begin(&self.board, column_id)
    }

    pub fn set_day_draft(&mut self, draft: Option<u32>) {
        self.day_edit.set_draft(draft);
    }

    pub fn cancel_day_edit(&mut self) {
        self.day_edit.cancel();
    }

    /// Saves the day-number draft.
    ///
    /// Returns the column's new id, or `None` when there was nothing to save.
    /// On `ColumnNumberCollision` the editor stays open with its draft.
    pub fn save_day_edit(&mut self) -> Result<Option<ColumnId>, SessionError> {
        let mut edit = self.day_edit.clone();
        let renumbered = match edit.save(&self.board) {
            Ok(Some(renumbered)) => renumbered,
            Ok(None) => return Ok(None),
            Err(err) => {
                self.day_edit = edit;
                return Err(err.into());
            }
        };

        self.commit_board(renumbered.board)?;
        self.day_edit = edit;
        self.transient
            .rekey_column(&renumbered.old_id, &renumbered.new_id);

        let mut flags = self.collapse.clone();
        flags.rekey(&renumbered.old_id, &renumbered.new_id);
        self.follow_collapse(flags)?;
        Ok(Some(renumbered.new_id))
    }

    /// Toggles collapse on a day column, or shows the empty notice.
    pub fn toggle_collapse(
        &mut self,
        column_id: &ColumnId,
        now: Instant,
    ) -> RepoResult<CollapseOutcome> {
        let Some(column) = self.board.day_column(column_id) else {
            return Ok(CollapseOutcome::Ignored);
        };
        if column.people.is_empty() {
            let shown = self.transient.show_empty_notice(column_id, now);
            return Ok(CollapseOutcome::EmptyNotice { shown });
        }

        let mut flags = self.collapse.clone();
        let collapsed = flags.toggle(column_id);
        self.commit_collapse(flags)?;
        Ok(CollapseOutcome::Toggled { collapsed })
    }

    /// Opens or closes a day column's assignment menu.
    pub fn toggle_menu(&mut self, column_id: &ColumnId) -> Option<&ColumnId> {
        if self.board.day_column(column_id).is_some() {
            self.transient.toggle_menu(column_id);
        }
        self.transient.active_menu()
    }

    /// Forwards a pointer press; `inside` is the menu area that was hit.
    pub fn pointer_down(&mut self, inside: Option<&ColumnId>) -> bool {
        self.transient.pointer_down(inside)
    }

    /// Captures the document for `scope` and schedules its hand-off after
    /// the settle delay. A newer request replaces a pending one.
    ///
    /// Returns `false` when `scope` names an unknown column; nothing is
    /// scheduled then.
    pub fn request_print(&mut self, scope: PrintScope, now: Instant) -> bool {
        let Some(document) = PrintDocument::build(
            &self.board,
            &scope,
            &self.config.document_title,
            Local::now().naive_local(),
        ) else {
            info!("event=print_dispatch module=print status=skipped reason=unknown_column");
            return false;
        };

        self.pending_print = Some(document);
        self.transient
            .arm_print(now + self.config.print_settle_delay);
        true
    }

    pub fn pending_print(&self) -> Option<&PrintDocument> {
        self.pending_print.as_ref()
    }

    pub fn print_deadline(&self) -> Option<Instant> {
        self.transient.print_deadline()
    }

    /// Fires every due timer. Due prints are rendered and sent to `sink`.
    pub fn tick<S: PrintSink>(&mut self, now: Instant, sink: &mut S) -> Vec<TimerSlot> {
        let fired = self.transient.expire(now);
        if fired.contains(&TimerSlot::Print) {
            if let Some(document) = self.pending_print.take() {
                dispatch_print(&document, sink);
            }
        }
        fired
    }

    /// Persists and installs `next` if it differs from the current board.
    fn commit_board(&mut self, next: Board) -> RepoResult<bool> {
        if next == self.board {
            return Ok(false);
        }
        self.store.save_board(&next)?;
        self.board = next;
        self.transient.clear_highlight();
        Ok(true)
    }

    fn commit_collapse(&mut self, next: CollapseFlags) -> RepoResult<()> {
        if next == self.collapse {
            return Ok(());
        }
        self.store.save_collapse_flags(&next)?;
        self.collapse = next;
        Ok(())
    }

    /// Installs flags that must track an already committed board, then
    /// persists them. A failed write is logged and returned; memory keeps
    /// the new flags so no flag points at a column id that is gone.
    fn follow_collapse(&mut self, next: CollapseFlags) -> RepoResult<()> {
        if next == self.collapse {
            return Ok(());
        }
        self.collapse = next;
        self.store.save_collapse_flags(&self.collapse).map_err(|err| {
            warn!(
                "event=collapse_save module=service status=error error_code=collapse_follow_failed error={err}"
            );
            err
        })
    }
}

fn dispatch_print<S: PrintSink>(document: &PrintDocument, sink: &mut S) {
    match sink.print(&document.render_html()) {
        Ok(()) => info!(
            "event=print_dispatch module=print status=ok columns={}",
            document.columns.len()
        ),
        Err(err) => error!(
            "event=print_dispatch module=print status=error error_code=print_failed error={err}"
        ),
    }
}
