use chrono::{DateTime, NaiveDate, Utc};

/// Person assigned to a task, as reported by the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskAssignee {
    /// Backend user id.
    pub user_id: i64,
    /// Full name, when the backend resolved it.
    pub user_name: Option<String>,
    /// Email, when the backend resolved it.
    pub user_email: Option<String>,
}

/// Authoritative task record returned by the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRecord {
    /// Backend task id.
    pub id: i64,
    /// Task title.
    pub title: String,
    /// Optional long description.
    pub description: Option<String>,
    /// Owning project id.
    pub project_id: Option<i64>,
    /// Owning project name.
    pub project_name: Option<String>,
    /// Workflow status key such as `in-progress`.
    pub status_key: Option<String>,
    /// Priority key such as `high`.
    pub priority_key: Option<String>,
    /// Free-form task type key such as `frontend`.
    pub task_type_key: Option<String>,
    /// Ordered assignees.
    pub assignees: Vec<TaskAssignee>,
    /// Number of attached links.
    pub links_count: u32,
    /// Number of comments.
    pub comments_count: u32,
    /// Due date, if scheduled.
    pub due_date: Option<NaiveDate>,
    /// Completion in percent, `0..=100`.
    pub progress_percentage: u8,
    /// Creation timestamp.
    pub created_at: Option<DateTime<Utc>>,
    /// Last update timestamp.
    pub updated_at: Option<DateTime<Utc>>,
}

/// User profile returned by the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    /// Backend user id.
    pub id: i64,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Login email.
    pub email: String,
    /// Role storage key, if assigned.
    pub role_key: Option<String>,
    /// Company display name.
    pub company: Option<String>,
    /// Whether the account is active.
    pub is_active: bool,
    /// Account creation timestamp.
    pub created_at: Option<DateTime<Utc>>,
    /// Last successful login.
    pub last_login: Option<DateTime<Utc>>,
}

impl UserProfile {
    /// Returns "First Last", trimmed.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
            .trim()
            .to_owned()
    }
}

/// Returns up to two uppercase initials for the given name parts.
#[must_use]
pub fn initials<'a>(parts: impl IntoIterator<Item = &'a str>) -> String {
    parts
        .into_iter()
        .filter_map(|part| part.trim().chars().next())
        .flat_map(char::to_uppercase)
        .take(2)
        .collect()
}
