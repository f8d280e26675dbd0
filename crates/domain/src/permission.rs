use std::str::FromStr;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use smart_sprint_core::AppError;

use crate::Role;

/// Coarse-grained capability flags checked by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Capability {
    /// Create tasks.
    CreateTasks,
    /// Assign tasks to people.
    AssignTasks,
    /// Edit task fields.
    EditTasks,
    /// Delete tasks.
    DeleteTasks,
    /// Move due dates.
    ChangeDeadlines,
    /// Change task priority.
    ChangePriority,
    /// Move tasks between status columns.
    ChangeStatus,
    /// See every task regardless of type.
    SeeAllTasks,
    /// See frontend tasks.
    SeeFrontendTasks,
    /// See backend tasks.
    SeeBackendTasks,
    /// See design tasks.
    SeeDesignTasks,
    /// See test tasks.
    SeeTestTasks,
    /// See DevOps tasks.
    SeeDevOpsTasks,
    /// See data tasks.
    SeeDataTasks,
    /// See product tasks.
    SeeProductTasks,
    /// Add people to the team.
    AddTeamMembers,
    /// Remove people from the team.
    RemoveTeamMembers,
    /// Change another user's role.
    ChangeUserRoles,
    /// List every team member.
    ViewAllTeamMembers,
    /// Open the project overview and backlog.
    ViewProjectOverview,
    /// Edit project settings.
    EditProjectSettings,
    /// Create sprints.
    CreateSprints,
    /// Manage existing sprints.
    ManageSprints,
    /// Upload documents.
    UploadDocuments,
    /// Delete documents.
    DeleteDocuments,
    /// List every document.
    ViewAllDocuments,
    /// Schedule meetings.
    CreateMeetings,
    /// Edit meetings.
    EditMeetings,
    /// Delete meetings.
    DeleteMeetings,
    /// List every meeting.
    ViewAllMeetings,
    /// Read all metrics.
    ViewAllMetrics,
    /// Generate reports.
    GenerateReports,
    /// Export data.
    ExportData,
    /// Add comments.
    AddComments,
    /// Edit comments.
    EditComments,
    /// Delete comments.
    DeleteComments,
    /// Read every comment.
    ViewAllComments,
    /// Manage role permissions.
    ManagePermissions,
    /// Open the admin panel.
    AccessAdminPanel,
    /// Inspect user activity.
    ViewUserActivity,
}

/// Number of capability flags in a [`PermissionSet`].
pub const CAPABILITY_COUNT: usize = 40;

const ALL_CAPABILITIES: [Capability; CAPABILITY_COUNT] = [
    Capability::CreateTasks,
    Capability::AssignTasks,
    Capability::EditTasks,
    Capability::DeleteTasks,
    Capability::ChangeDeadlines,
    Capability::ChangePriority,
    Capability::ChangeStatus,
    Capability::SeeAllTasks,
    Capability::SeeFrontendTasks,
    Capability::SeeBackendTasks,
    Capability::SeeDesignTasks,
    Capability::SeeTestTasks,
    Capability::SeeDevOpsTasks,
    Capability::SeeDataTasks,
    Capability::SeeProductTasks,
    Capability::AddTeamMembers,
    Capability::RemoveTeamMembers,
    Capability::ChangeUserRoles,
    Capability::ViewAllTeamMembers,
    Capability::ViewProjectOverview,
    Capability::EditProjectSettings,
    Capability::CreateSprints,
    Capability::ManageSprints,
    Capability::UploadDocuments,
    Capability::DeleteDocuments,
    Capability::ViewAllDocuments,
    Capability::CreateMeetings,
    Capability::EditMeetings,
    Capability::DeleteMeetings,
    Capability::ViewAllMeetings,
    Capability::ViewAllMetrics,
    Capability::GenerateReports,
    Capability::ExportData,
    Capability::AddComments,
    Capability::EditComments,
    Capability::DeleteComments,
    Capability::ViewAllComments,
    Capability::ManagePermissions,
    Capability::AccessAdminPanel,
    Capability::ViewUserActivity,
];

/// Conceptual grouping of capabilities, used for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CapabilityGroup {
    /// Task create/edit/delete and field changes.
    TaskManagement,
    /// Which task types are visible.
    TaskVisibility,
    /// Team membership and roles.
    TeamManagement,
    /// Project settings and sprints.
    ProjectManagement,
    /// Project documents.
    Documentation,
    /// Meetings calendar.
    Meetings,
    /// Metrics, reports and exports.
    Analytics,
    /// Task comments.
    Comments,
    /// Administrative capabilities.
    Special,
}

impl Capability {
    /// Returns all capabilities in declaration order.
    #[must_use]
    pub fn all() -> &'static [Self] {
        &ALL_CAPABILITIES
    }

    /// Returns the stable storage key for this capability.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CreateTasks => "canCreateTasks",
            Self::AssignTasks => "canAssignTasks",
            Self::EditTasks => "canEditTasks",
            Self::DeleteTasks => "canDeleteTasks",
            Self::ChangeDeadlines => "canChangeDeadlines",
            Self::ChangePriority => "canChangePriority",
            Self::ChangeStatus => "canChangeStatus",
            Self::SeeAllTasks => "canSeeAllTasks",
            Self::SeeFrontendTasks => "canSeeFETasks",
            Self::SeeBackendTasks => "canSeeBETasks",
            Self::SeeDesignTasks => "canSeeDesignTasks",
            Self::SeeTestTasks => "canSeeTestTasks",
            Self::SeeDevOpsTasks => "canSeeDevOpsTasks",
            Self::SeeDataTasks => "canSeeDataTasks",
            Self::SeeProductTasks => "canSeeProductTasks",
            Self::AddTeamMembers => "canAddTeamMembers",
            Self::RemoveTeamMembers => "canRemoveTeamMembers",
            Self::ChangeUserRoles => "canChangeUserRoles",
            Self::ViewAllTeamMembers => "canViewAllTeamMembers",
            Self::ViewProjectOverview => "canViewProjectOverview",
            Self::EditProjectSettings => "canEditProjectSettings",
            Self::CreateSprints => "canCreateSprints",
            Self::ManageSprints => "canManageSprints",
            Self::UploadDocuments => "canUploadDocuments",
            Self::DeleteDocuments => "canDeleteDocuments",
            Self::ViewAllDocuments => "canViewAllDocuments",
            Self::CreateMeetings => "canCreateMeetings",
            Self::EditMeetings => "canEditMeetings",
            Self::DeleteMeetings => "canDeleteMeetings",
            Self::ViewAllMeetings => "canViewAllMeetings",
            Self::ViewAllMetrics => "canViewAllMetrics",
            Self::GenerateReports => "canGenerateReports",
            Self::ExportData => "canExportData",
            Self::AddComments => "canAddComments",
            Self::EditComments => "canEditComments",
            Self::DeleteComments => "canDeleteComments",
            Self::ViewAllComments => "canViewAllComments",
            Self::ManagePermissions => "canManagePermissions",
            Self::AccessAdminPanel => "canAccessAdminPanel",
            Self::ViewUserActivity => "canViewUserActivity",
        }
    }

    /// Returns the group this capability belongs to.
    #[must_use]
    pub fn group(&self) -> CapabilityGroup {
        match self {
            Self::CreateTasks
            | Self::AssignTasks
            | Self::EditTasks
            | Self::DeleteTasks
            | Self::ChangeDeadlines
            | Self::ChangePriority
            | Self::ChangeStatus => CapabilityGroup::TaskManagement,
            Self::SeeAllTasks
            | Self::SeeFrontendTasks
            | Self::SeeBackendTasks
            | Self::SeeDesignTasks
            | Self::SeeTestTasks
            | Self::SeeDevOpsTasks
            | Self::SeeDataTasks
            | Self::SeeProductTasks => CapabilityGroup::TaskVisibility,
            Self::AddTeamMembers
            | Self::RemoveTeamMembers
            | Self::ChangeUserRoles
            | Self::ViewAllTeamMembers => CapabilityGroup::TeamManagement,
            Self::ViewProjectOverview
            | Self::EditProjectSettings
            | Self::CreateSprints
            | Self::ManageSprints => CapabilityGroup::ProjectManagement,
            Self::UploadDocuments | Self::DeleteDocuments | Self::ViewAllDocuments => {
                CapabilityGroup::Documentation
            }
            Self::CreateMeetings
            | Self::EditMeetings
            | Self::DeleteMeetings
            | Self::ViewAllMeetings => CapabilityGroup::Meetings,
            Self::ViewAllMetrics | Self::GenerateReports | Self::ExportData => {
                CapabilityGroup::Analytics
            }
            Self::AddComments
            | Self::EditComments
            | Self::DeleteComments
            | Self::ViewAllComments => CapabilityGroup::Comments,
            Self::ManagePermissions | Self::AccessAdminPanel | Self::ViewUserActivity => {
                CapabilityGroup::Special
            }
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl FromStr for Capability {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|capability| capability.as_str() == value)
            .ok_or_else(|| AppError::Validation(format!("unknown capability '{value}'")))
    }
}

/// Complete capability map: every capability has exactly one boolean.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PermissionSet {
    flags: [bool; CAPABILITY_COUNT],
}

impl PermissionSet {
    /// Returns a set with every capability denied.
    #[must_use]
    pub fn none() -> Self {
        Self {
            flags: [false; CAPABILITY_COUNT],
        }
    }

    /// Returns a set with every capability granted.
    #[must_use]
    pub fn all() -> Self {
        Self {
            flags: [true; CAPABILITY_COUNT],
        }
    }

    /// Builds a set granting exactly the listed capabilities.
    #[must_use]
    pub fn from_granted(granted: impl IntoIterator<Item = Capability>) -> Self {
        let mut set = Self::none();
        for capability in granted {
            set.flags[capability.index()] = true;
        }
        set
    }

    /// Returns the flag value for a capability.
    #[must_use]
    pub fn allows(&self, capability: Capability) -> bool {
        self.flags[capability.index()]
    }

    /// Iterates granted capabilities in declaration order.
    pub fn granted(&self) -> impl Iterator<Item = Capability> + '_ {
        Capability::all()
            .iter()
            .copied()
            .filter(|capability| self.allows(*capability))
    }

    /// Iterates every capability with its flag value.
    pub fn entries(&self) -> impl Iterator<Item = (Capability, bool)> + '_ {
        Capability::all()
            .iter()
            .map(|capability| (*capability, self.allows(*capability)))
    }
}

impl Serialize for PermissionSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(CAPABILITY_COUNT))?;
        for (capability, allowed) in self.entries() {
            map.serialize_entry(capability.as_str(), &allowed)?;
        }
        map.end()
    }
}

const ALL_TASK_VISIBILITY: &[Capability] = &[
    Capability::SeeAllTasks,
    Capability::SeeFrontendTasks,
    Capability::SeeBackendTasks,
    Capability::SeeDesignTasks,
    Capability::SeeTestTasks,
    Capability::SeeDevOpsTasks,
    Capability::SeeDataTasks,
    Capability::SeeProductTasks,
];

// Every role except `Other` can move cards, upload documents and comment.
const CONTRIBUTOR_BASELINE: &[Capability] = &[
    Capability::ChangeStatus,
    Capability::UploadDocuments,
    Capability::AddComments,
];

fn role_specific_grants(role: Role) -> &'static [Capability] {
    match role {
        Role::ProjectManager | Role::Other => &[],
        Role::FrontendDeveloper => &[Capability::SeeFrontendTasks, Capability::SeeDesignTasks],
        Role::BackendDeveloper => &[
            Capability::SeeBackendTasks,
            Capability::SeeDevOpsTasks,
            Capability::SeeDataTasks,
        ],
        Role::FullstackDeveloper => &[],
        Role::QaTester => &[Capability::CreateTasks],
        Role::DevopsEngineer => &[Capability::SeeDevOpsTasks],
        Role::UiUxDesigner => &[
            Capability::CreateTasks,
            Capability::SeeFrontendTasks,
            Capability::SeeDesignTasks,
            Capability::SeeProductTasks,
        ],
        Role::DataAnalyst => &[
            Capability::SeeDataTasks,
            Capability::SeeProductTasks,
            Capability::ViewAllMetrics,
            Capability::GenerateReports,
            Capability::ExportData,
        ],
        Role::ProductManager => &[Capability::CreateTasks, Capability::ViewProjectOverview],
        Role::ScrumMaster => &[
            Capability::ViewProjectOverview,
            Capability::CreateSprints,
            Capability::ManageSprints,
            Capability::CreateMeetings,
            Capability::EditMeetings,
            Capability::DeleteMeetings,
            Capability::ViewAllMeetings,
            Capability::ViewAllMetrics,
        ],
        Role::TechnicalLead => &[Capability::ViewProjectOverview],
    }
}

fn sees_all_task_types(role: Role) -> bool {
    matches!(
        role,
        Role::FullstackDeveloper
            | Role::QaTester
            | Role::ProductManager
            | Role::ScrumMaster
            | Role::TechnicalLead
    )
}

/// Returns the canonical capability set for a role.
#[must_use]
pub fn permissions_for(role: Role) -> PermissionSet {
    match role {
        Role::ProjectManager => PermissionSet::all(),
        Role::Other => PermissionSet::none(),
        _ => {
            let mut granted: Vec<Capability> = CONTRIBUTOR_BASELINE.to_vec();
            granted.extend_from_slice(role_specific_grants(role));
            if sees_all_task_types(role) {
                granted.extend_from_slice(ALL_TASK_VISIBILITY);
            }
            PermissionSet::from_granted(granted)
        }
    }
}

/// Returns the capability set for a role storage key, failing closed.
#[must_use]
pub fn permissions_for_key(role_key: &str) -> PermissionSet {
    permissions_for(Role::from_key_lenient(role_key))
}
