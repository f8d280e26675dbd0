//! Route-level authorization table.
//!
//! A gated route is reachable when the identity holds at least one of the
//! listed capabilities (logical OR). Routes without an entry are open to any
//! authenticated identity. Nothing is reachable without an identity.

use crate::{Capability, Identity, Role};

struct RouteRule {
    prefix: &'static str,
    required: &'static [Capability],
}

const ROUTE_RULES: &[RouteRule] = &[
    RouteRule {
        prefix: "/tasks",
        required: &[
            Capability::SeeAllTasks,
            Capability::SeeFrontendTasks,
            Capability::SeeBackendTasks,
            Capability::SeeDesignTasks,
            Capability::SeeTestTasks,
            Capability::SeeDevOpsTasks,
            Capability::SeeDataTasks,
            Capability::SeeProductTasks,
        ],
    },
    RouteRule {
        prefix: "/backlog",
        required: &[Capability::ViewProjectOverview],
    },
    RouteRule {
        prefix: "/permissions",
        required: &[Capability::ManagePermissions],
    },
    RouteRule {
        prefix: "/calendar",
        required: &[Capability::ViewAllMeetings, Capability::CreateMeetings],
    },
    RouteRule {
        prefix: "/docs",
        required: &[Capability::ViewAllDocuments, Capability::UploadDocuments],
    },
];

/// Returns the capabilities gating a route, or `None` for open routes.
#[must_use]
pub fn required_capabilities(route: &str) -> Option<&'static [Capability]> {
    let path = normalize_route(route);
    ROUTE_RULES
        .iter()
        .find(|rule| matches_prefix(path, rule.prefix))
        .map(|rule| rule.required)
}

/// Decides whether an identity may open a route.
#[must_use]
pub fn can_access_route(identity: Option<&Identity>, route: &str) -> bool {
    let Some(identity) = identity else {
        return false;
    };

    match required_capabilities(route) {
        None => true,
        Some(required) => required
            .iter()
            .any(|capability| identity.has_permission(*capability)),
    }
}

/// Details shown when a route is refused to an authenticated identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessDenial {
    route: String,
    required: Vec<Capability>,
    role: Role,
}

impl AccessDenial {
    /// Assembles the denial for an identity and route.
    #[must_use]
    pub fn new(identity: &Identity, route: &str) -> Self {
        Self {
            route: normalize_route(route).to_owned(),
            required: required_capabilities(route)
                .map(<[Capability]>::to_vec)
                .unwrap_or_default(),
            role: identity.role(),
        }
    }

    /// Returns the normalized route that was refused.
    #[must_use]
    pub fn route(&self) -> &str {
        self.route.as_str()
    }

    /// Returns the capabilities any one of which would grant access.
    #[must_use]
    pub fn required(&self) -> &[Capability] {
        self.required.as_slice()
    }

    /// Returns the role of the refused identity.
    #[must_use]
    pub fn role(&self) -> Role {
        self.role
    }

    /// Returns the message rendered on the access denied view.
    #[must_use]
    pub fn message(&self) -> String {
        let required = if self.required.is_empty() {
            "Specific permissions".to_owned()
        } else {
            self.required
                .iter()
                .map(Capability::as_str)
                .collect::<Vec<_>>()
                .join(", ")
        };

        format!(
            "You don't have permission to access this page. Required: {required}. Your Role: {}",
            self.role.display_name()
        )
    }
}

fn normalize_route(route: &str) -> &str {
    let path = route
        .split(['?', '#'])
        .next()
        .unwrap_or_default()
        .trim();
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() { "/" } else { trimmed }
}

fn matches_prefix(path: &str, prefix: &str) -> bool {
    path.strip_prefix(prefix)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::{AccessDenial, can_access_route, required_capabilities};
    use crate::{Capability, Identity, IdentityInput, Role};

    fn identity(role: Role) -> Identity {
        Identity::new(IdentityInput {
            id: "42".to_owned(),
            first_name: "John".to_owned(),
            last_name: "Developer".to_owned(),
            email: "dev@example.com".to_owned(),
            role,
            company: String::new(),
            is_active: true,
            created_at: Utc::now(),
            last_login: Utc::now(),
        })
    }

    #[test]
    fn absent_identity_never_passes() {
        for route in ["/tasks", "/backlog", "/permissions", "/calendar", "/docs", "/inbox"] {
            assert!(!can_access_route(None, route), "{route}");
        }
    }

    #[test]
    fn ungated_routes_are_open_to_any_identity() {
        let other = identity(Role::Other);
        assert!(can_access_route(Some(&other), "/dashboard"));
        assert!(can_access_route(Some(&other), "/"));
        assert!(!can_access_route(Some(&other), "/tasks"));
    }

    #[test]
    fn backlog_follows_project_overview_only() {
        for role in Role::all() {
            let identity = identity(*role);
            assert_eq!(
                can_access_route(Some(&identity), "/backlog"),
                identity.has_permission(Capability::ViewProjectOverview),
                "{role}"
            );
        }
    }

    #[test]
    fn gated_route_uses_logical_or() {
        let designer = identity(Role::UiUxDesigner);
        assert!(can_access_route(Some(&designer), "/docs"));
        assert!(can_access_route(Some(&designer), "/tasks"));
        assert!(!can_access_route(Some(&designer), "/calendar"));

        let scrum_master = identity(Role::ScrumMaster);
        assert!(can_access_route(Some(&scrum_master), "/calendar"));
    }

    #[test]
    fn prefixes_match_on_segment_boundaries() {
        assert!(required_capabilities("/tasks/12").is_some());
        assert!(required_capabilities("/tasks/").is_some());
        assert!(required_capabilities("/permissions?role=3").is_some());
        assert!(required_capabilities("/taskslist").is_none());
        assert!(required_capabilities("/settings").is_none());
    }

    #[test]
    fn denial_carries_required_capabilities_and_role() {
        let developer = identity(Role::FrontendDeveloper);
        assert!(!can_access_route(Some(&developer), "/permissions"));

        let denial = AccessDenial::new(&developer, "/permissions/");
        assert_eq!(denial.route(), "/permissions");
        assert_eq!(denial.required(), &[Capability::ManagePermissions]);
        assert_eq!(denial.role(), Role::FrontendDeveloper);
        assert!(denial.message().contains("canManagePermissions"));
        assert!(denial.message().contains("Frontend Developer"));
    }
}
