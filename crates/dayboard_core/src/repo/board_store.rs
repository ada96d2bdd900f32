//! Board and collapse-flag persistence under fixed keys.
//!
//! # Responsibility
//! - Encode state as JSON in the established wire shape.
//! - Fall back to defaults when a stored value is missing or unreadable.
//!
//! # Invariants
//! - A loaded board always satisfies `Board::validate()`.
//! - Log lines carry sizes and error categories only, never names.

use super::state_repo::{RepoResult, StateRepository};
use crate::config::BoardConfig;
use crate::model::board::Board;
use crate::model::collapse::CollapseFlags;
use log::{info, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Storage collaborator bound to one key-value repository.
pub struct BoardStore<R: StateRepository> {
    repo: R,
    board_key: String,
    collapse_key: String,
}

impl<R: StateRepository> BoardStore<R> {
    pub fn new(repo: R, config: &BoardConfig) -> Self {
        Self {
            repo,
            board_key: config.board_key.clone(),
            collapse_key: config.collapse_key.clone(),
        }
    }

    /// Loads the saved board, or a roster-only board when absent or invalid.
    pub fn load_board(&self) -> RepoResult<Board> {
        let board = self
            .load_json::<Board>(&self.board_key, "board_load")?
            .unwrap_or_default();
        info!(
            "event=board_load module=repo status=ok columns={} people={}",
            board.columns().len(),
            board.roster().person_count()
        );
        Ok(board)
    }

    pub fn save_board(&self, board: &Board) -> RepoResult<()> {
        let bytes = self.save_json(&self.board_key, board)?;
        info!(
            "event=board_save module=repo status=ok columns={} bytes={bytes}",
            board.columns().len()
        );
        Ok(())
    }

    /// Loads saved collapse flags, or an empty mapping when absent or invalid.
    pub fn load_collapse_flags(&self) -> RepoResult<CollapseFlags> {
        let flags = self
            .load_json::<CollapseFlags>(&self.collapse_key, "collapse_load")?
            .unwrap_or_default();
        info!(
            "event=collapse_load module=repo status=ok entries={}",
            flags.len()
        );
        Ok(flags)
    }

    pub fn save_collapse_flags(&self, flags: &CollapseFlags) -> RepoResult<()> {
        let bytes = self.save_json(&self.collapse_key, flags)?;
        info!(
            "event=collapse_save module=repo status=ok entries={} bytes={bytes}",
            flags.len()
        );
        Ok(())
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    fn load_json<T: DeserializeOwned>(
        &self,
        key: &str,
        event: &'static str,
    ) -> RepoResult<Option<T>> {
        let Some(raw) = self.repo.get_value(key)? else {
            info!("event={event} module=repo status=absent");
            return Ok(None);
        };

        match serde_json::from_str::<T>(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(err) => {
                warn!(
                    "event={event} module=repo status=fallback error_code=deserialization_failed category={:?} line={} column={}",
                    err.classify(),
                    err.line(),
                    err.column()
                );
                Ok(None)
            }
        }
    }

    fn save_json<T: Serialize>(&self, key: &str, value: &T) -> RepoResult<usize> {
        let encoded = serde_json::to_string(value)?;
        self.repo.put_value(key, &encoded)?;
        Ok(encoded.len())
    }
}
