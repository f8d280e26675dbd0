use async_trait::async_trait;

use smart_sprint_core::AppResult;
use smart_sprint_domain::{TaskRecord, UserProfile};

/// Page size used when listing users for the board.
pub const USER_FETCH_LIMIT: u32 = 100;

/// Page size used when listing tasks for the board.
pub const TASK_FETCH_LIMIT: u32 = 1000;

/// Filter for user listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserQuery {
    /// Only return active accounts.
    pub active_only: bool,
    /// Maximum number of users returned.
    pub limit: u32,
}

impl Default for UserQuery {
    fn default() -> Self {
        Self {
            active_only: true,
            limit: USER_FETCH_LIMIT,
        }
    }
}

/// Filter for task listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskQuery {
    /// Restrict to one project.
    pub project_id: Option<i64>,
    /// Maximum number of tasks returned.
    pub limit: u32,
}

impl TaskQuery {
    /// Builds the board query for an optional project.
    #[must_use]
    pub fn for_project(project_id: Option<i64>) -> Self {
        Self {
            project_id,
            limit: TASK_FETCH_LIMIT,
        }
    }
}

/// Partial task update sent to the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskUpdate {
    /// New workflow status key.
    pub status_key: String,
}

/// Port for backend task operations.
#[async_trait]
pub trait TaskGateway: Send + Sync {
    /// Lists tasks matching the query, in backend order.
    async fn list_tasks(&self, query: TaskQuery) -> AppResult<Vec<TaskRecord>>;

    /// Applies a partial update and returns the stored record.
    async fn update_task(&self, task_id: i64, update: TaskUpdate) -> AppResult<TaskRecord>;
}

/// Port for backend user operations.
#[async_trait]
pub trait UserGateway: Send + Sync {
    /// Lists users matching the query.
    async fn list_users(&self, query: UserQuery) -> AppResult<Vec<UserProfile>>;

    /// Verifies credentials against the backend and returns the profile.
    async fn login(&self, email: &str, password: &str) -> AppResult<UserProfile>;
}
