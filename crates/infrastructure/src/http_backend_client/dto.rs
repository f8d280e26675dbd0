use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use smart_sprint_application::{PermissionDefinition, RoleDefinition, RolePermissions};
use smart_sprint_domain::{TaskAssignee, TaskRecord, UserProfile};

#[derive(Debug, Deserialize)]
pub(super) struct UserResponse {
    id: i64,
    email: String,
    #[serde(default)]
    first_name: Option<String>,
    #[serde(default)]
    last_name: Option<String>,
    #[serde(default)]
    role_key: Option<String>,
    #[serde(default)]
    role: Option<String>,
    #[serde(default)]
    company_name: Option<String>,
    #[serde(default)]
    company: Option<String>,
    #[serde(default = "default_active")]
    is_active: bool,
    #[serde(default)]
    last_login: Option<String>,
    #[serde(default)]
    created_at: Option<String>,
}

fn default_active() -> bool {
    true
}

impl UserResponse {
    pub(super) fn into_profile(self) -> UserProfile {
        UserProfile {
            id: self.id,
            first_name: self.first_name.unwrap_or_default(),
            last_name: self.last_name.unwrap_or_default(),
            email: self.email,
            role_key: self.role_key.or(self.role),
            company: self.company_name.or(self.company),
            is_active: self.is_active,
            created_at: self.created_at.as_deref().and_then(parse_backend_datetime),
            last_login: self.last_login.as_deref().and_then(parse_backend_datetime),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct TaskAssigneeResponse {
    user_id: i64,
    #[serde(default)]
    user_name: Option<String>,
    #[serde(default)]
    user_email: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct TaskResponse {
    id: i64,
    title: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    project_id: Option<i64>,
    #[serde(default)]
    project_name: Option<String>,
    #[serde(default)]
    status_key: Option<String>,
    #[serde(default)]
    priority_key: Option<String>,
    #[serde(default)]
    task_type_key: Option<String>,
    #[serde(default)]
    assignees: Option<Vec<TaskAssigneeResponse>>,
    #[serde(default)]
    links_count: Option<i64>,
    #[serde(default)]
    comments_count: Option<i64>,
    #[serde(default)]
    due_date: Option<String>,
    #[serde(default)]
    progress_percentage: Option<f64>,
    #[serde(default)]
    created_at: Option<String>,
    #[serde(default)]
    updated_at: Option<String>,
}

impl TaskResponse {
    pub(super) fn into_record(self) -> TaskRecord {
        TaskRecord {
            id: self.id,
            title: self.title,
            description: self.description,
            project_id: self.project_id,
            project_name: self.project_name,
            status_key: self.status_key,
            priority_key: self.priority_key,
            task_type_key: self.task_type_key,
            assignees: self
                .assignees
                .unwrap_or_default()
                .into_iter()
                .map(|assignee| TaskAssignee {
                    user_id: assignee.user_id,
                    user_name: assignee.user_name,
                    user_email: assignee.user_email,
                })
                .collect(),
            links_count: count(self.links_count),
            comments_count: count(self.comments_count),
            due_date: self.due_date.as_deref().and_then(parse_backend_date),
            progress_percentage: percentage(self.progress_percentage),
            created_at: self.created_at.as_deref().and_then(parse_backend_datetime),
            updated_at: self.updated_at.as_deref().and_then(parse_backend_datetime),
        }
    }
}

#[derive(Debug, Serialize)]
pub(super) struct TaskStatusUpdateRequest<'a> {
    pub(super) status_key: &'a str,
}

#[derive(Debug, Deserialize)]
pub(super) struct RoleResponse {
    id: i64,
    role_key: String,
    name: String,
}

impl RoleResponse {
    pub(super) fn into_definition(self) -> RoleDefinition {
        RoleDefinition {
            id: self.id,
            role_key: self.role_key,
            name: self.name,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct PermissionResponse {
    id: i64,
    perm_key: String,
    name: String,
    #[serde(default)]
    category: Option<String>,
}

impl PermissionResponse {
    pub(super) fn into_definition(self) -> PermissionDefinition {
        PermissionDefinition {
            id: self.id,
            perm_key: self.perm_key,
            name: self.name,
            category: self.category.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct RolePermissionsResponse {
    role_id: i64,
    role_key: String,
    role_name: String,
    #[serde(default)]
    permissions: Vec<PermissionResponse>,
}

impl RolePermissionsResponse {
    pub(super) fn into_role_permissions(self) -> RolePermissions {
        RolePermissions {
            role_id: self.role_id,
            role_key: self.role_key,
            role_name: self.role_name,
            permissions: self
                .permissions
                .into_iter()
                .map(PermissionResponse::into_definition)
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub(super) struct RolePermissionsUpdateRequest<'a> {
    pub(super) permission_ids: &'a [i64],
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    detail: Value,
}

/// Extracts the `detail` message of an error body, if there is one.
pub(super) fn error_detail(body: &str) -> Option<String> {
    let response = serde_json::from_str::<ErrorResponse>(body).ok()?;
    match response.detail {
        Value::Null => None,
        Value::String(detail) if detail.trim().is_empty() => None,
        Value::String(detail) => Some(detail),
        other => Some(other.to_string()),
    }
}

/// Parses backend timestamps, which may omit the UTC offset.
pub(super) fn parse_backend_datetime(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    DateTime::parse_from_rfc3339(value)
        .map(|parsed| parsed.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
                .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%.f"))
                .map(|parsed| parsed.and_utc())
                .ok()
        })
}

fn parse_backend_date(value: &str) -> Option<NaiveDate> {
    let date = value.trim().get(..10)?;
    NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()
}

fn count(value: Option<i64>) -> u32 {
    value.and_then(|value| u32::try_from(value).ok()).unwrap_or(0)
}

fn percentage(value: Option<f64>) -> u8 {
    match value {
        Some(value) if value.is_finite() => value.clamp(0.0, 100.0).floor() as u8,
        _ => 0,
    }
}
