//! Role permission administration ports and application service.

use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use smart_sprint_core::{AppError, AppResult};
use smart_sprint_domain::{Capability, PermissionSet};

use crate::SessionService;

/// Role as stored by the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleDefinition {
    /// Backend role id.
    pub id: i64,
    /// Role storage key.
    pub role_key: String,
    /// Role display name.
    pub name: String,
}

/// Permission as stored by the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionDefinition {
    /// Backend permission id.
    pub id: i64,
    /// Capability storage key, e.g. `canEditTasks`.
    pub perm_key: String,
    /// Permission display name.
    pub name: String,
    /// Grouping category.
    pub category: String,
}

/// Permissions currently attached to one role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RolePermissions {
    /// Backend role id.
    pub role_id: i64,
    /// Role storage key.
    pub role_key: String,
    /// Role display name.
    pub role_name: String,
    /// Attached permissions.
    pub permissions: Vec<PermissionDefinition>,
}

/// Port for backend role and permission administration.
#[async_trait]
pub trait RoleGateway: Send + Sync {
    /// Lists all roles.
    async fn list_roles(&self) -> AppResult<Vec<RoleDefinition>>;

    /// Lists permissions, optionally restricted to one category.
    async fn list_permissions(&self, category: Option<&str>)
    -> AppResult<Vec<PermissionDefinition>>;

    /// Reads the permissions attached to a role.
    async fn role_permissions(&self, role_id: i64) -> AppResult<RolePermissions>;

    /// Replaces the permissions attached to a role.
    async fn replace_role_permissions(
        &self,
        role_id: i64,
        permission_ids: &[i64],
    ) -> AppResult<RolePermissions>;
}

/// Application service for role permission administration.
///
/// Every operation requires the current identity to hold
/// `canManagePermissions`.
#[derive(Clone)]
pub struct PermissionAdminService {
    roles: Arc<dyn RoleGateway>,
    session: Arc<SessionService>,
}

impl PermissionAdminService {
    /// Creates a new permission administration service.
    #[must_use]
    pub fn new(roles: Arc<dyn RoleGateway>, session: Arc<SessionService>) -> Self {
        Self { roles, session }
    }

    /// Lists all roles.
    pub async fn list_roles(&self) -> AppResult<Vec<RoleDefinition>> {
        self.require_manage_permissions().await?;
        self.roles.list_roles().await
    }

    /// Lists permissions, optionally restricted to one category.
    pub async fn list_permissions(
        &self,
        category: Option<&str>,
    ) -> AppResult<Vec<PermissionDefinition>> {
        self.require_manage_permissions().await?;
        let category = category.map(str::trim).filter(|value| !value.is_empty());
        self.roles.list_permissions(category).await
    }

    /// Reads the permissions attached to a role.
    pub async fn role_permissions(&self, role_id: i64) -> AppResult<RolePermissions> {
        self.require_manage_permissions().await?;
        self.roles.role_permissions(role_id).await
    }

    /// Replaces a role's permissions and returns the backend's view after
    /// the write.
    pub async fn save(&self, role_id: i64, permission_ids: &[i64]) -> AppResult<RolePermissions> {
        self.require_manage_permissions().await?;

        if let Some(invalid) = permission_ids.iter().find(|id| **id <= 0) {
            return Err(AppError::Validation(format!(
                "permission id must be positive, got {invalid}"
            )));
        }

        let mut ids = permission_ids.to_vec();
        ids.sort_unstable();
        ids.dedup();

        self.roles.replace_role_permissions(role_id, &ids).await?;
        let stored = self.roles.role_permissions(role_id).await?;
        info!(
            role_id,
            role = %stored.role_key,
            permissions = stored.permissions.len(),
            "role permissions saved"
        );
        Ok(stored)
    }

    /// Converts backend permission keys into a permission set.
    ///
    /// Keys that are not known capabilities are ignored.
    #[must_use]
    pub fn effective_permission_set(role_permissions: &RolePermissions) -> PermissionSet {
        PermissionSet::from_granted(
            role_permissions
                .permissions
                .iter()
                .filter_map(|permission| Capability::from_str(&permission.perm_key).ok()),
        )
    }

    /// Groups permissions by category, preserving order within a category.
    #[must_use]
    pub fn group_by_category(
        permissions: Vec<PermissionDefinition>,
    ) -> BTreeMap<String, Vec<PermissionDefinition>> {
        let mut groups: BTreeMap<String, Vec<PermissionDefinition>> = BTreeMap::new();
        for permission in permissions {
            groups
                .entry(permission.category.clone())
                .or_default()
                .push(permission);
        }
        groups
    }

    async fn require_manage_permissions(&self) -> AppResult<()> {
        let Some(identity) = self.session.current_identity().await else {
            return Err(AppError::Unauthorized("no active session".to_owned()));
        };

        if identity.has_permission(Capability::ManagePermissions) {
            return Ok(());
        }

        warn!(
            subject = %identity.id(),
            role = %identity.role(),
            "permission administration refused"
        );
        Err(AppError::Forbidden(format!(
            "subject '{}' is missing permission '{}'",
            identity.id(),
            Capability::ManagePermissions.as_str()
        )))
    }
}
