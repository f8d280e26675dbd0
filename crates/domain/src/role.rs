use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use smart_sprint_core::AppError;

/// Team role assigned to a user account.
///
/// The set is closed in this client. The backend may know more roles; those
/// resolve to [`Role::Other`] through [`Role::from_key_lenient`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    /// Full administrative access.
    ProjectManager,
    /// Frontend engineer.
    FrontendDeveloper,
    /// Backend engineer.
    BackendDeveloper,
    /// Engineer working across the stack.
    FullstackDeveloper,
    /// Quality assurance.
    QaTester,
    /// Infrastructure and deployment.
    DevopsEngineer,
    /// Product and interaction design.
    UiUxDesigner,
    /// Reporting and analytics.
    DataAnalyst,
    /// Product ownership.
    ProductManager,
    /// Sprint facilitation.
    ScrumMaster,
    /// Technical leadership.
    TechnicalLead,
    /// Catch-all role without any capability.
    Other,
}

impl Role {
    /// Returns all known roles.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[Role] = &[
            Role::ProjectManager,
            Role::FrontendDeveloper,
            Role::BackendDeveloper,
            Role::FullstackDeveloper,
            Role::QaTester,
            Role::DevopsEngineer,
            Role::UiUxDesigner,
            Role::DataAnalyst,
            Role::ProductManager,
            Role::ScrumMaster,
            Role::TechnicalLead,
            Role::Other,
        ];

        ALL
    }

    /// Returns the stable storage key for this role.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ProjectManager => "project-manager",
            Self::FrontendDeveloper => "frontend-developer",
            Self::BackendDeveloper => "backend-developer",
            Self::FullstackDeveloper => "fullstack-developer",
            Self::QaTester => "qa-tester",
            Self::DevopsEngineer => "devops-engineer",
            Self::UiUxDesigner => "ui-ux-designer",
            Self::DataAnalyst => "data-analyst",
            Self::ProductManager => "product-manager",
            Self::ScrumMaster => "scrum-master",
            Self::TechnicalLead => "technical-lead",
            Self::Other => "other",
        }
    }

    /// Returns the label shown to people, e.g. in access-denied messages.
    #[must_use]
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::ProjectManager => "Project Manager",
            Self::FrontendDeveloper => "Frontend Developer",
            Self::BackendDeveloper => "Backend Developer",
            Self::FullstackDeveloper => "Fullstack Developer",
            Self::QaTester => "QA Tester",
            Self::DevopsEngineer => "DevOps Engineer",
            Self::UiUxDesigner => "UI/UX Designer",
            Self::DataAnalyst => "Data Analyst",
            Self::ProductManager => "Product Manager",
            Self::ScrumMaster => "Scrum Master",
            Self::TechnicalLead => "Technical Lead",
            Self::Other => "Other",
        }
    }

    /// Resolves a storage key, failing closed to [`Role::Other`].
    #[must_use]
    pub fn from_key_lenient(value: &str) -> Self {
        Self::from_str(value.trim()).unwrap_or(Self::Other)
    }
}

impl Display for Role {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|role| role.as_str() == value)
            .ok_or_else(|| AppError::Validation(format!("unknown role '{value}'")))
    }
}
