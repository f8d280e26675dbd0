//! Column-bucketed board projection of backend tasks.
//!
//! The board is derived state: it is rebuilt from backend records on every
//! load and patched locally only by [`Board::move_task`]. Each task key lives
//! in exactly one column.

use std::collections::BTreeMap;
use std::str::FromStr;

use smart_sprint_core::{AppError, AppResult};

use crate::{TaskRecord, UserProfile, initials};

/// The five fixed board columns, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BoardColumnId {
    /// `to-do`; also receives tasks with missing or unknown status.
    ToDo,
    /// `in-progress`.
    InProgress,
    /// `waiting-review`.
    WaitingReview,
    /// `testing`.
    Testing,
    /// `done`.
    Done,
}

impl BoardColumnId {
    /// Returns all columns in display order.
    #[must_use]
    pub fn all() -> &'static [Self; 5] {
        const ALL: [BoardColumnId; 5] = [
            BoardColumnId::ToDo,
            BoardColumnId::InProgress,
            BoardColumnId::WaitingReview,
            BoardColumnId::Testing,
            BoardColumnId::Done,
        ];

        &ALL
    }

    /// Returns the stable column key.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ToDo => "column-1",
            Self::InProgress => "column-2",
            Self::WaitingReview => "column-3",
            Self::Testing => "column-4",
            Self::Done => "column-5",
        }
    }

    /// Returns the column heading, also used as the task status label.
    #[must_use]
    pub fn title(&self) -> &'static str {
        match self {
            Self::ToDo => "To Do",
            Self::InProgress => "In Progress",
            Self::WaitingReview => "Waiting Review",
            Self::Testing => "Testing",
            Self::Done => "Done",
        }
    }

    /// Returns the backend status key owned by this column.
    #[must_use]
    pub fn status_key(&self) -> &'static str {
        match self {
            Self::ToDo => "to-do",
            Self::InProgress => "in-progress",
            Self::WaitingReview => "waiting-review",
            Self::Testing => "testing",
            Self::Done => "done",
        }
    }

    /// Returns the status badge colour.
    #[must_use]
    pub fn status_color(&self) -> &'static str {
        match self {
            Self::ToDo => "#6b7280",
            Self::InProgress => "#3b82f6",
            Self::WaitingReview => "#8b5cf6",
            Self::Testing => "#f97316",
            Self::Done => "#10b981",
        }
    }

    /// Returns the column owning a status key, if any.
    #[must_use]
    pub fn for_status_key(status_key: &str) -> Option<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|column| column.status_key() == status_key)
    }

    /// Buckets a possibly missing status key, defaulting to To Do.
    #[must_use]
    pub fn bucket(status_key: Option<&str>) -> Self {
        status_key
            .and_then(Self::for_status_key)
            .unwrap_or(Self::ToDo)
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl FromStr for BoardColumnId {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|column| column.as_str() == value || column.status_key() == value)
            .ok_or_else(|| AppError::Validation(format!("unknown board column '{value}'")))
    }
}

/// Returns the display label for a priority key, defaulting to Medium.
#[must_use]
pub fn priority_label(priority_key: Option<&str>) -> &'static str {
    match priority_key {
        Some("low") => "Low",
        Some("high") => "High",
        _ => "Medium",
    }
}

/// Person shown on task cards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardUser {
    /// Board key, `user-{id}`.
    pub key: String,
    /// Display name.
    pub name: String,
    /// Avatar initials.
    pub avatar: String,
}

impl BoardUser {
    /// Builds a board user from a backend profile.
    #[must_use]
    pub fn from_profile(profile: &UserProfile) -> Self {
        Self {
            key: user_key(profile.id),
            name: profile.full_name(),
            avatar: initials([profile.first_name.as_str(), profile.last_name.as_str()]),
        }
    }
}

/// Task card as displayed on the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardTask {
    /// Board key, `task-{id}`.
    pub key: String,
    /// Task title.
    pub title: String,
    /// Description, empty when absent.
    pub description: String,
    /// Status label (column title).
    pub status: String,
    /// Priority label.
    pub priority: String,
    /// Formatted due date or "No due date".
    pub due_date: String,
    /// Ordered assignee user keys.
    pub assignees: Vec<String>,
    /// Comment count.
    pub comments: u32,
    /// Link count.
    pub links: u32,
    /// Progress indicator, `completed/5`.
    pub progress: String,
    /// Task type key, `backend` when absent.
    pub task_type: String,
    /// Authoritative backend record this card was built from.
    pub record: TaskRecord,
}

impl BoardTask {
    /// Converts a backend record, registering unknown assignees in `users`.
    #[must_use]
    pub fn from_record(record: TaskRecord, users: &mut BTreeMap<String, BoardUser>) -> Self {
        let assignees = record
            .assignees
            .iter()
            .map(|assignee| {
                let key = user_key(assignee.user_id);
                users.entry(key.clone()).or_insert_with(|| {
                    let name = assignee
                        .user_name
                        .as_deref()
                        .map(str::trim)
                        .filter(|name| !name.is_empty());
                    BoardUser {
                        key: key.clone(),
                        name: name.unwrap_or("Unknown").to_owned(),
                        avatar: name
                            .map(|name| initials(name.split_whitespace()))
                            .unwrap_or_else(|| "U".to_owned()),
                    }
                });
                key
            })
            .collect();

        let due_date = record.due_date.map_or_else(
            || "No due date".to_owned(),
            |date| date.format("%b %-d, %Y").to_string(),
        );
        let completed = record.progress_percentage.min(100) / 20;

        Self {
            key: task_key(record.id),
            title: record.title.clone(),
            description: record.description.clone().unwrap_or_default(),
            status: BoardColumnId::bucket(record.status_key.as_deref())
                .title()
                .to_owned(),
            priority: priority_label(record.priority_key.as_deref()).to_owned(),
            due_date,
            assignees,
            comments: record.comments_count,
            links: record.links_count,
            progress: format!("{completed}/5"),
            task_type: record
                .task_type_key
                .clone()
                .unwrap_or_else(|| "backend".to_owned()),
            record,
        }
    }
}

/// One status column and its ordered task keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardColumn {
    id: BoardColumnId,
    task_keys: Vec<String>,
}

impl BoardColumn {
    fn empty(id: BoardColumnId) -> Self {
        Self {
            id,
            task_keys: Vec::new(),
        }
    }

    /// Returns the column id.
    #[must_use]
    pub fn id(&self) -> BoardColumnId {
        self.id
    }

    /// Returns the column heading.
    #[must_use]
    pub fn title(&self) -> &'static str {
        self.id.title()
    }

    /// Returns the ordered task keys.
    #[must_use]
    pub fn task_keys(&self) -> &[String] {
        self.task_keys.as_slice()
    }

    /// Returns whether the column holds the task key.
    #[must_use]
    pub fn contains(&self, task_key: &str) -> bool {
        self.task_keys.iter().any(|key| key == task_key)
    }
}

/// Tasks bucketed into the five status columns, plus the people on them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    tasks: BTreeMap<String, BoardTask>,
    columns: [BoardColumn; 5],
    users: BTreeMap<String, BoardUser>,
}

impl Default for Board {
    fn default() -> Self {
        Self {
            tasks: BTreeMap::new(),
            columns: BoardColumnId::all().map(BoardColumn::empty),
            users: BTreeMap::new(),
        }
    }
}

impl Board {
    /// Builds a board from backend users and tasks, in backend order.
    ///
    /// A repeated task id keeps its last record and its last position.
    #[must_use]
    pub fn build(profiles: &[UserProfile], records: Vec<TaskRecord>) -> Self {
        let mut board = Self {
            users: profiles
                .iter()
                .map(|profile| {
                    let user = BoardUser::from_profile(profile);
                    (user.key.clone(), user)
                })
                .collect(),
            ..Self::default()
        };

        for record in records {
            let task = BoardTask::from_record(record, &mut board.users);
            let column = BoardColumnId::bucket(task.record.status_key.as_deref());
            let key = task.key.clone();

            if let Some(previous) = board.tasks.insert(key.clone(), task) {
                let previous_column = BoardColumnId::bucket(previous.record.status_key.as_deref());
                board.columns[previous_column.index()]
                    .task_keys
                    .retain(|existing| existing != &key);
            }
            board.columns[column.index()].task_keys.push(key);
        }

        board
    }

    /// Returns a task card by key.
    #[must_use]
    pub fn task(&self, task_key: &str) -> Option<&BoardTask> {
        self.tasks.get(task_key)
    }

    /// Returns every task card keyed by task key.
    #[must_use]
    pub fn tasks(&self) -> &BTreeMap<String, BoardTask> {
        &self.tasks
    }

    /// Returns every known user keyed by user key.
    #[must_use]
    pub fn users(&self) -> &BTreeMap<String, BoardUser> {
        &self.users
    }

    /// Returns one column.
    #[must_use]
    pub fn column(&self, id: BoardColumnId) -> &BoardColumn {
        &self.columns[id.index()]
    }

    /// Returns the columns in display order.
    pub fn columns(&self) -> impl Iterator<Item = &BoardColumn> {
        self.columns.iter()
    }

    /// Returns the column currently holding a task.
    #[must_use]
    pub fn column_of(&self, task_key: &str) -> Option<BoardColumnId> {
        self.columns
            .iter()
            .find(|column| column.contains(task_key))
            .map(BoardColumn::id)
    }

    /// Returns the number of tasks on the board.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Returns whether the board has no tasks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Checks that column keys and task keys form an exact partition.
    #[must_use]
    pub fn is_partitioned(&self) -> bool {
        let mut placed = 0_usize;
        for column in &self.columns {
            for key in &column.task_keys {
                if !self.tasks.contains_key(key) {
                    return false;
                }
                placed += 1;
            }
        }

        placed == self.tasks.len()
            && self
                .tasks
                .keys()
                .all(|key| self.columns.iter().filter(|column| column.contains(key)).count() == 1)
    }

    /// Moves a task card between columns and relabels its status.
    ///
    /// Returns `Ok(false)` without touching the board when `from == to` or
    /// the task already sits in `to`. When the task sits in a column other
    /// than `from`, that column is used as the source.
    pub fn move_task(
        &mut self,
        task_key: &str,
        from: BoardColumnId,
        to: BoardColumnId,
    ) -> AppResult<bool> {
        if from == to {
            return Ok(false);
        }

        let Some(source) = self.column_of(task_key) else {
            return Err(AppError::NotFound(format!(
                "task '{task_key}' is not on the board"
            )));
        };
        if source == to {
            return Ok(false);
        }

        self.columns[source.index()]
            .task_keys
            .retain(|key| key != task_key);
        self.columns[to.index()].task_keys.push(task_key.to_owned());
        if let Some(task) = self.tasks.get_mut(task_key) {
            task.status = to.title().to_owned();
        }

        Ok(true)
    }
}

/// Returns the board key for a backend task id.
#[must_use]
pub fn task_key(task_id: i64) -> String {
    format!("task-{task_id}")
}

/// Returns the board key for a backend user id.
#[must_use]
pub fn user_key(user_id: i64) -> String {
    format!("user-{user_id}")
}

#[cfg(test)]
mod tests;
