use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{Capability, PermissionSet, Role, TaskTypeTag, UserProfile, initials, permissions_for};

/// Inputs for building an [`Identity`].
#[derive(Debug, Clone)]
pub struct IdentityInput {
    /// Stable user id, e.g. `12` or `user-1`.
    pub id: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Login email.
    pub email: String,
    /// Assigned role.
    pub role: Role,
    /// Company display name.
    pub company: String,
    /// Whether the account is active.
    pub is_active: bool,
    /// Account creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last successful login.
    pub last_login: DateTime<Utc>,
}

/// The authenticated user and their role-derived capabilities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    id: String,
    first_name: String,
    last_name: String,
    email: String,
    role: Role,
    company: String,
    permissions: PermissionSet,
    avatar: String,
    is_active: bool,
    created_at: DateTime<Utc>,
    last_login: DateTime<Utc>,
}

impl Identity {
    /// Builds an identity, deriving permissions from the role.
    #[must_use]
    pub fn new(input: IdentityInput) -> Self {
        let avatar = avatar_for(&input.first_name, &input.last_name, &input.email);

        Self {
            permissions: permissions_for(input.role),
            id: input.id,
            first_name: input.first_name,
            last_name: input.last_name,
            email: input.email,
            role: input.role,
            company: input.company,
            avatar,
            is_active: input.is_active,
            created_at: input.created_at,
            last_login: input.last_login,
        }
    }

    /// Maps a backend profile into an identity. Missing timestamps become `now`.
    #[must_use]
    pub fn from_profile(profile: &UserProfile, now: DateTime<Utc>) -> Self {
        Self::new(IdentityInput {
            id: profile.id.to_string(),
            first_name: profile.first_name.clone(),
            last_name: profile.last_name.clone(),
            email: profile.email.clone(),
            role: profile
                .role_key
                .as_deref()
                .map_or(Role::Other, Role::from_key_lenient),
            company: profile.company.clone().unwrap_or_default(),
            is_active: profile.is_active,
            created_at: profile.created_at.unwrap_or(now),
            last_login: profile.last_login.unwrap_or(now),
        })
    }

    /// Returns the user id.
    #[must_use]
    pub fn id(&self) -> &str {
        self.id.as_str()
    }

    /// Returns the given name.
    #[must_use]
    pub fn first_name(&self) -> &str {
        self.first_name.as_str()
    }

    /// Returns the family name.
    #[must_use]
    pub fn last_name(&self) -> &str {
        self.last_name.as_str()
    }

    /// Returns the login email.
    #[must_use]
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Returns the assigned role.
    #[must_use]
    pub fn role(&self) -> Role {
        self.role
    }

    /// Returns the company display name.
    #[must_use]
    pub fn company(&self) -> &str {
        self.company.as_str()
    }

    /// Returns the role-derived permission set.
    #[must_use]
    pub fn permissions(&self) -> &PermissionSet {
        &self.permissions
    }

    /// Returns the avatar glyph (initials).
    #[must_use]
    pub fn avatar(&self) -> &str {
        self.avatar.as_str()
    }

    /// Returns whether the account is active.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.is_active
    }

    /// Returns the account creation timestamp.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the last login timestamp.
    #[must_use]
    pub fn last_login(&self) -> DateTime<Utc> {
        self.last_login
    }

    /// Returns a copy with the last login moved to `at`.
    #[must_use]
    pub fn with_last_login(mut self, at: DateTime<Utc>) -> Self {
        self.last_login = at;
        self
    }

    /// Returns the stored flag for a capability.
    #[must_use]
    pub fn has_permission(&self, capability: Capability) -> bool {
        self.permissions.allows(capability)
    }

    /// Returns whether the identity may see tasks of the given type key.
    #[must_use]
    pub fn can_see_task_type(&self, task_type: &str) -> bool {
        TaskTypeTag::parse(task_type).is_visible_with(&self.permissions)
    }
}

/// Capability check that treats an absent identity as denied.
#[must_use]
pub fn has_permission(identity: Option<&Identity>, capability: Capability) -> bool {
    identity.is_some_and(|identity| identity.has_permission(capability))
}

/// Task-type visibility check that treats an absent identity as denied.
#[must_use]
pub fn can_see_task_type(identity: Option<&Identity>, task_type: &str) -> bool {
    identity.is_some_and(|identity| identity.can_see_task_type(task_type))
}

fn avatar_for(first_name: &str, last_name: &str, email: &str) -> String {
    let from_names = initials([first_name, last_name]);
    if !from_names.is_empty() {
        return from_names;
    }

    let from_email = initials([email]);
    if from_email.is_empty() {
        "?".to_owned()
    } else {
        from_email
    }
}
