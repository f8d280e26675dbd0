use crate::{Capability, PermissionSet};

/// Task type tags recognized for visibility checks.
///
/// Backend type keys are free-form strings; [`TaskTypeTag::parse`] folds
/// their synonyms into this closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskTypeTag {
    /// `frontend`, `ui`, `ux`.
    Frontend,
    /// `backend`, `api`, `database`.
    Backend,
    /// `design`.
    Design,
    /// `test`, `qa`.
    Test,
    /// `devops`, `deployment`.
    DevOps,
    /// `data`, `analytics`.
    Data,
    /// `product`.
    Product,
    /// Anything else.
    Unrecognized,
}

impl TaskTypeTag {
    /// Parses a task type key, ignoring case and surrounding whitespace.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "frontend" | "ui" | "ux" => Self::Frontend,
            "backend" | "api" | "database" => Self::Backend,
            "design" => Self::Design,
            "test" | "qa" => Self::Test,
            "devops" | "deployment" => Self::DevOps,
            "data" | "analytics" => Self::Data,
            "product" => Self::Product,
            _ => Self::Unrecognized,
        }
    }

    /// Returns the dedicated visibility capability, if the tag has one.
    #[must_use]
    pub fn visibility_capability(&self) -> Option<Capability> {
        match self {
            Self::Frontend => Some(Capability::SeeFrontendTasks),
            Self::Backend => Some(Capability::SeeBackendTasks),
            Self::Design => Some(Capability::SeeDesignTasks),
            Self::Test => Some(Capability::SeeTestTasks),
            Self::DevOps => Some(Capability::SeeDevOpsTasks),
            Self::Data => Some(Capability::SeeDataTasks),
            Self::Product => Some(Capability::SeeProductTasks),
            Self::Unrecognized => None,
        }
    }

    /// Returns whether a permission set may see tasks of this type.
    ///
    /// `canSeeAllTasks` always wins; unrecognized tags need it.
    #[must_use]
    pub fn is_visible_with(&self, permissions: &PermissionSet) -> bool {
        permissions.allows(Capability::SeeAllTasks)
            || self
                .visibility_capability()
                .is_some_and(|capability| permissions.allows(capability))
    }
}
