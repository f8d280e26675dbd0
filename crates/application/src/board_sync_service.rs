//! Task board synchronizer.
//!
//! Holds the board projection and reconciles it with the backend. Moves are
//! applied locally first, then written, then followed by a full reload
//! whether or not the write succeeded.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use smart_sprint_core::{AppError, AppResult};
use smart_sprint_domain::{Board, BoardColumnId};

use crate::{TaskGateway, TaskQuery, TaskUpdate, UserGateway, UserQuery};

/// Result of a board move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Source and destination are the same column; nothing was sent.
    Unchanged,
    /// The backend accepted the new status.
    Applied,
    /// The backend rejected the write and the card is back in its previous
    /// column, either from the reload or, when that also failed, by undoing
    /// the local move.
    Reverted {
        /// Backend or transport failure message.
        reason: String,
    },
}

#[derive(Debug, Default)]
struct BoardState {
    board: Board,
    last_error: Option<String>,
}

/// Application service owning the board projection.
#[derive(Clone)]
pub struct BoardSynchronizer {
    tasks: Arc<dyn TaskGateway>,
    users: Arc<dyn UserGateway>,
    project_id: Option<i64>,
    state: Arc<RwLock<BoardState>>,
}

impl BoardSynchronizer {
    /// Creates a synchronizer with an empty board.
    #[must_use]
    pub fn new(
        tasks: Arc<dyn TaskGateway>,
        users: Arc<dyn UserGateway>,
        project_id: Option<i64>,
    ) -> Self {
        Self {
            tasks,
            users,
            project_id,
            state: Arc::new(RwLock::new(BoardState::default())),
        }
    }

    /// Replaces the board with a fresh backend projection.
    ///
    /// On failure the previous board is kept and the error is recorded.
    pub async fn load(&self) -> AppResult<()> {
        match self.fetch_board().await {
            Ok(board) => {
                info!(
                    project_id = ?self.project_id,
                    tasks = board.len(),
                    users = board.users().len(),
                    "board loaded"
                );
                let mut state = self.state.write().await;
                state.board = board;
                state.last_error = None;
                Ok(())
            }
            Err(error) => {
                warn!(project_id = ?self.project_id, error = %error, "board load failed");
                self.state.write().await.last_error = Some(error.message().to_owned());
                Err(error)
            }
        }
    }

    /// Moves a task between columns and writes its new status.
    ///
    /// The local board reflects the move before the write is sent.
    pub async fn move_task(
        &self,
        task_key: &str,
        from: BoardColumnId,
        to: BoardColumnId,
    ) -> AppResult<MoveOutcome> {
        if from == to {
            debug!(task = %task_key, column = %to.as_str(), "move within the same column ignored");
            return Ok(MoveOutcome::Unchanged);
        }

        let (task_id, source) = {
            let mut state = self.state.write().await;
            let task_id = state
                .board
                .task(task_key)
                .map(|task| task.record.id)
                .ok_or_else(|| AppError::NotFound(format!("task '{task_key}' is not on the board")))?;
            let source = state.board.column_of(task_key).unwrap_or(from);
            if !state.board.move_task(task_key, from, to)? {
                return Ok(MoveOutcome::Unchanged);
            }
            (task_id, source)
        };

        let update = TaskUpdate {
            status_key: to.status_key().to_owned(),
        };
        let outcome = match self.tasks.update_task(task_id, update).await {
            Ok(_) => {
                info!(task_id, status = %to.status_key(), "task status updated");
                MoveOutcome::Applied
            }
            Err(error) => {
                warn!(task_id, status = %to.status_key(), error = %error, "task status update failed");
                MoveOutcome::Reverted {
                    reason: error.message().to_owned(),
                }
            }
        };

        if let Err(error) = self.load().await {
            warn!(task_id, error = %error, "reload after move failed");
            if matches!(outcome, MoveOutcome::Reverted { .. }) {
                self.undo_move(task_key, to, source).await;
            }
        }

        Ok(outcome)
    }

    /// Returns a copy of the current board.
    pub async fn snapshot(&self) -> Board {
        self.state.read().await.board.clone()
    }

    /// Returns the message of the last failed load, if any.
    pub async fn last_error(&self) -> Option<String> {
        self.state.read().await.last_error.clone()
    }

    /// Forgets the last load error.
    pub async fn clear_error(&self) {
        self.state.write().await.last_error = None;
    }

    async fn undo_move(&self, task_key: &str, to: BoardColumnId, source: BoardColumnId) {
        let mut state = self.state.write().await;
        // Only this card is put back so overlapping moves keep their patches.
        match state.board.move_task(task_key, to, source) {
            Ok(_) => debug!(task = %task_key, column = %source.as_str(), "local move undone"),
            Err(error) => warn!(task = %task_key, error = %error, "failed to undo local move"),
        }
    }

    async fn fetch_board(&self) -> AppResult<Board> {
        let profiles = self.users.list_users(UserQuery::default()).await?;
        let records = self
            .tasks
            .list_tasks(TaskQuery::for_project(self.project_id))
            .await?;

        let board = Board::build(&profiles, records);
        debug_assert!(board.is_partitioned());
        Ok(board)
    }
}
