//! Transient UI-state tracker.
//!
//! # Responsibility
//! - Hold the duplicate-name highlight and per-column empty notices with
//!   their expiry deadlines.
//! - Hold the single open assignment menu.
//!
//! # Invariants
//! - A new highlight supersedes the previous one and restarts its window.
//! - A visible empty notice is never stacked or extended for the same column.
//! - At most one assignment menu is open.

use super::timers::Timers;
use crate::config::{BoardConfig, EMPTY_COLUMN_NOTICE};
use crate::model::column::ColumnId;
use crate::model::person::PersonId;
use std::collections::BTreeSet;
use std::time::{Duration, Instant};

/// Timer slots owned by the session.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum TimerSlot {
    Highlight,
    EmptyNotice(ColumnId),
    Print,
}

/// Read-only view handed to the renderer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransientSnapshot {
    pub highlighted: Option<PersonId>,
    pub notices: Vec<ColumnId>,
    pub active_menu: Option<ColumnId>,
}

#[derive(Debug, Clone)]
pub struct TransientState {
    highlight_window: Duration,
    notice_window: Duration,
    highlighted: Option<PersonId>,
    notices: BTreeSet<ColumnId>,
    active_menu: Option<ColumnId>,
    timers: Timers<TimerSlot>,
}

impl TransientState {
    pub fn new(config: &BoardConfig) -> Self {
        Self {
            highlight_window: config.highlight_window,
            notice_window: config.notice_window,
            highlighted: None,
            notices: BTreeSet::new(),
            active_menu: None,
            timers: Timers::new(),
        }
    }

    pub fn highlighted(&self) -> Option<&PersonId> {
        self.highlighted.as_ref()
    }

    /// Highlights the roster entry that blocked an insertion.
    pub fn highlight_duplicate(&mut self, person_id: PersonId, now: Instant) {
        self.highlighted = Some(person_id);
        self.timers
            .schedule(TimerSlot::Highlight, now + self.highlight_window);
    }

    pub fn clear_highlight(&mut self) {
        self.highlighted = None;
        self.timers.cancel(&TimerSlot::Highlight);
    }

    /// Shows the empty-column notice. Returns `false` when one is already
    /// visible for this column.
    pub fn show_empty_notice(&mut self, column_id: &ColumnId, now: Instant) -> bool {
        if !self.notices.insert(column_id.clone()) {
            return false;
        }
        self.timers.schedule(
            TimerSlot::EmptyNotice(column_id.clone()),
            now + self.notice_window,
        );
        true
    }

    pub fn has_notice(&self, column_id: &ColumnId) -> bool {
        self.notices.contains(column_id)
    }

    /// Advisory text to show next to a column, while its notice is visible.
    pub fn notice_text(&self, column_id: &ColumnId) -> Option<&'static str> {
        self.has_notice(column_id).then_some(EMPTY_COLUMN_NOTICE)
    }

    pub fn active_menu(&self) -> Option<&ColumnId> {
        self.active_menu.as_ref()
    }

    /// Opens the menu of `column_id`, or closes it if it is the open one.
    ///
    /// Opening a menu implicitly closes any other.
    pub fn toggle_menu(&mut self, column_id: &ColumnId) -> Option<&ColumnId> {
        if self.active_menu.as_ref() == Some(column_id) {
            self.active_menu = None;
        } else {
            self.active_menu = Some(column_id.clone());
        }
        self.active_menu.as_ref()
    }

    /// Closes the open menu. Returns whether one was open.
    pub fn close_menu(&mut self) -> bool {
        self.active_menu.take().is_some()
    }

    /// Handles a pointer press; `inside` names the menu area that was hit.
    ///
    /// Any press outside the open menu's area closes it.
    pub fn pointer_down(&mut self, inside: Option<&ColumnId>) -> bool {
        let hit_open_menu = matches!(
            (&self.active_menu, inside),
            (Some(open), Some(target)) if open == target
        );
        if hit_open_menu {
            return false;
        }
        self.close_menu()
    }

    pub(crate) fn arm_print(&mut self, deadline: Instant) {
        self.timers.schedule(TimerSlot::Print, deadline);
    }

    pub(crate) fn print_deadline(&self) -> Option<Instant> {
        self.timers.deadline(&TimerSlot::Print)
    }

    /// Earliest pending expiry, if any.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.next_deadline()
    }

    /// Follows a renumbered column to its new id.
    pub fn rekey_column(&mut self, old_id: &ColumnId, new_id: &ColumnId) {
        if old_id == new_id {
            return;
        }
        if self.active_menu.as_ref() == Some(old_id) {
            self.active_menu = Some(new_id.clone());
        }
        if self.notices.remove(old_id) {
            self.notices.insert(new_id.clone());
            self.timers.rekey(
                &TimerSlot::EmptyNotice(old_id.clone()),
                TimerSlot::EmptyNotice(new_id.clone()),
            );
        }
    }

    /// Drops all state scoped to a removed column.
    pub fn forget_column(&mut self, column_id: &ColumnId) {
        if self.active_menu.as_ref() == Some(column_id) {
            self.active_menu = None;
        }
        if self.notices.remove(column_id) {
            self.timers
                .cancel(&TimerSlot::EmptyNotice(column_id.clone()));
        }
    }

    /// Clears every expired slot and returns the slots that fired.
    pub fn expire(&mut self, now: Instant) -> Vec<TimerSlot> {
        let fired = self.timers.due(now);
        for slot in &fired {
            match slot {
                TimerSlot::Highlight => self.highlighted = None,
                TimerSlot::EmptyNotice(column_id) => {
                    self.notices.remove(column_id);
                }
                TimerSlot::Print => {}
            }
        }
        fired
    }

    pub fn snapshot(&self) -> TransientSnapshot {
        TransientSnapshot {
            highlighted: self.highlighted.clone(),
            notices: self.notices.iter().cloned().collect(),
            active_menu: self.active_menu.clone(),
        }
    }
}
