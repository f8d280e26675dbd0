//! HTTP adapter for the Smart Sprint backend REST API.

mod dto;

use async_trait::async_trait;
use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use smart_sprint_application::{
    PermissionDefinition, RoleDefinition, RoleGateway, RolePermissions, TaskGateway, TaskQuery,
    TaskUpdate, UserGateway, UserQuery,
};
use smart_sprint_core::{AppError, AppResult};
use smart_sprint_domain::{TaskRecord, UserProfile};

use dto::{
    PermissionResponse, RolePermissionsResponse, RolePermissionsUpdateRequest, RoleResponse,
    TaskResponse, TaskStatusUpdateRequest, UserResponse, error_detail,
};

/// Backend client implementing the task, user and role gateways.
#[derive(Debug, Clone)]
pub struct HttpBackendClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl HttpBackendClient {
    /// Creates a client for the backend at `base_url`.
    pub fn new(http_client: reqwest::Client, base_url: &str) -> AppResult<Self> {
        let base_url = base_url.trim().trim_end_matches('/').to_owned();
        Url::parse(&base_url).map_err(|error| {
            AppError::Validation(format!("invalid backend base url '{base_url}': {error}"))
        })?;

        Ok(Self {
            http_client,
            base_url,
        })
    }

    /// Returns the normalized base url.
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    fn endpoint(&self, path: &str, query: &[(&str, String)]) -> AppResult<Url> {
        let mut url = Url::parse(&format!("{}{path}", self.base_url)).map_err(|error| {
            AppError::Internal(format!("failed to build url for '{path}': {error}"))
        })?;
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (name, value) in query {
                pairs.append_pair(name, value);
            }
        }
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> AppResult<T> {
        self.send_json::<(), T>(Method::GET, url, None).await
    }

    async fn send_json<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        method: Method,
        url: Url,
        body: Option<&B>,
    ) -> AppResult<T> {
        let path = url.path().to_owned();
        debug!(method = %method, path = %path, "calling backend");

        let mut request = self.http_client.request(method, url);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|error| {
            AppError::Unavailable(format!("failed to call backend endpoint '{path}': {error}"))
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<body unavailable>".to_owned());
            return Err(error_for_status(status, &body));
        }

        response.json::<T>().await.map_err(|error| {
            AppError::Internal(format!(
                "failed to parse backend response from '{path}': {error}"
            ))
        })
    }
}

/// Maps a non-success response to an error carrying the backend `detail`.
fn error_for_status(status: StatusCode, body: &str) -> AppError {
    let message =
        error_detail(body).unwrap_or_else(|| format!("Request failed ({})", status.as_u16()));

    match status {
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => AppError::Validation(message),
        StatusCode::UNAUTHORIZED => AppError::Unauthorized(message),
        StatusCode::FORBIDDEN => AppError::Forbidden(message),
        StatusCode::NOT_FOUND => AppError::NotFound(message),
        StatusCode::CONFLICT => AppError::Conflict(message),
        status if status.is_server_error() => AppError::Unavailable(message),
        _ => AppError::Internal(message),
    }
}

#[async_trait]
impl TaskGateway for HttpBackendClient {
    async fn list_tasks(&self, query: TaskQuery) -> AppResult<Vec<TaskRecord>> {
        let mut params = Vec::with_capacity(2);
        if let Some(project_id) = query.project_id {
            params.push(("project_id", project_id.to_string()));
        }
        params.push(("limit", query.limit.to_string()));

        let tasks: Vec<TaskResponse> = self
            .get_json(self.endpoint("/api/tasks", &params)?)
            .await?;
        Ok(tasks.into_iter().map(TaskResponse::into_record).collect())
    }

    async fn update_task(&self, task_id: i64, update: TaskUpdate) -> AppResult<TaskRecord> {
        let url = self.endpoint(&format!("/api/tasks/{task_id}"), &[])?;
        let task: TaskResponse = self
            .send_json(
                Method::PATCH,
                url,
                Some(&TaskStatusUpdateRequest {
                    status_key: update.status_key.as_str(),
                }),
            )
            .await?;
        Ok(task.into_record())
    }
}

#[async_trait]
impl UserGateway for HttpBackendClient {
    async fn list_users(&self, query: UserQuery) -> AppResult<Vec<UserProfile>> {
        let mut params = Vec::with_capacity(2);
        if query.active_only {
            params.push(("is_active", "true".to_owned()));
        }
        params.push(("limit", query.limit.to_string()));

        let users: Vec<UserResponse> = self
            .get_json(self.endpoint("/api/users", &params)?)
            .await?;
        Ok(users.into_iter().map(UserResponse::into_profile).collect())
    }

    async fn login(&self, email: &str, password: &str) -> AppResult<UserProfile> {
        let url = self.endpoint(
            "/api/users/login",
            &[("email", email.to_owned()), ("password", password.to_owned())],
        )?;
        let user: UserResponse = self.get_json(url).await?;
        Ok(user.into_profile())
    }
}

#[async_trait]
impl RoleGateway for HttpBackendClient {
    async fn list_roles(&self) -> AppResult<Vec<RoleDefinition>> {
        let roles: Vec<RoleResponse> = self.get_json(self.endpoint("/api/roles", &[])?).await?;
        Ok(roles.into_iter().map(RoleResponse::into_definition).collect())
    }

    async fn list_permissions(
        &self,
        category: Option<&str>,
    ) -> AppResult<Vec<PermissionDefinition>> {
        let params: Vec<_> = category
            .map(|category| ("category", category.to_owned()))
            .into_iter()
            .collect();
        let permissions: Vec<PermissionResponse> = self
            .get_json(self.endpoint("/api/permissions", &params)?)
            .await?;
        Ok(permissions
            .into_iter()
            .map(PermissionResponse::into_definition)
            .collect())
    }

    async fn role_permissions(&self, role_id: i64) -> AppResult<RolePermissions> {
        let url = self.endpoint(&format!("/api/roles/{role_id}/permissions"), &[])?;
        let response: RolePermissionsResponse = self.get_json(url).await?;
        Ok(response.into_role_permissions())
    }

    async fn replace_role_permissions(
        &self,
        role_id: i64,
        permission_ids: &[i64],
    ) -> AppResult<RolePermissions> {
        let url = self.endpoint(&format!("/api/roles/{role_id}/permissions"), &[])?;
        let response: RolePermissionsResponse = self
            .send_json(
                Method::PUT,
                url,
                Some(&RolePermissionsUpdateRequest { permission_ids }),
            )
            .await?;
        Ok(response.into_role_permissions())
    }
}
