use std::sync::Arc;

use tracing::debug;

use smart_sprint_domain::{AccessDenial, Identity, can_access_route};

use crate::SessionService;

/// Decision for a route request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteAccess {
    /// The route may be rendered.
    Granted,
    /// No identity; the caller should redirect to login.
    Unauthenticated,
    /// Authenticated but lacking every required capability.
    Denied(AccessDenial),
}

/// Route gate backed by the current session.
#[derive(Clone)]
pub struct AuthorizationGate {
    session: Arc<SessionService>,
}

impl AuthorizationGate {
    /// Creates a gate over a session.
    #[must_use]
    pub fn new(session: Arc<SessionService>) -> Self {
        Self { session }
    }

    /// Checks a route against the current identity.
    pub async fn check_route(&self, route: &str) -> RouteAccess {
        let identity = self.session.current_identity().await;
        let access = Self::evaluate(identity.as_ref(), route);
        if let RouteAccess::Denied(denial) = &access {
            debug!(
                route = %denial.route(),
                role = %denial.role(),
                "route access denied"
            );
        }
        access
    }

    /// Checks a route against an explicit identity.
    #[must_use]
    pub fn evaluate(identity: Option<&Identity>, route: &str) -> RouteAccess {
        match identity {
            None => RouteAccess::Unauthenticated,
            Some(identity) if can_access_route(Some(identity), route) => RouteAccess::Granted,
            Some(identity) => RouteAccess::Denied(AccessDenial::new(identity, route)),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use smart_sprint_core::{AppError, AppResult, CredentialClaims};
    use smart_sprint_domain::{Capability, Identity, IdentityInput, Role, UserProfile};

    use super::{AuthorizationGate, RouteAccess};
    use crate::{CredentialStore, LocalAccountDirectory, SessionService, UserGateway, UserQuery};

    struct OfflineUsers;

    #[async_trait]
    impl UserGateway for OfflineUsers {
        async fn list_users(&self, _query: UserQuery) -> AppResult<Vec<UserProfile>> {
            Ok(Vec::new())
        }

        async fn login(&self, _email: &str, _password: &str) -> AppResult<UserProfile> {
            Err(AppError::Unavailable("offline".to_owned()))
        }
    }

    struct NullStore;

    #[async_trait]
    impl CredentialStore for NullStore {
        async fn load(&self) -> AppResult<Option<CredentialClaims>> {
            Ok(None)
        }

        async fn save(&self, _claims: &CredentialClaims) -> AppResult<()> {
            Ok(())
        }

        async fn clear(&self) -> AppResult<()> {
            Ok(())
        }
    }

    struct SingleAccount(Role);

    impl LocalAccountDirectory for SingleAccount {
        fn authenticate(&self, email: &str, _password: &str) -> AppResult<Identity> {
            Ok(Identity::new(IdentityInput {
                id: "user-5".to_owned(),
                first_name: "Lee".to_owned(),
                last_name: "Tester".to_owned(),
                email: email.to_owned(),
                role: self.0,
                company: String::new(),
                is_active: true,
                created_at: chrono::Utc::now(),
                last_login: chrono::Utc::now(),
            }))
        }

        fn find_by_subject(&self, _subject: &str) -> Option<Identity> {
            None
        }
    }

    fn gate(role: Role) -> (Arc<SessionService>, AuthorizationGate) {
        let session = Arc::new(SessionService::new(
            Arc::new(OfflineUsers),
            Arc::new(NullStore),
            Arc::new(SingleAccount(role)),
        ));
        (session.clone(), AuthorizationGate::new(session))
    }

    #[tokio::test]
    async fn unauthenticated_session_is_redirected() {
        let (_, gate) = gate(Role::ProjectManager);
        assert_eq!(gate.check_route("/dashboard").await, RouteAccess::Unauthenticated);
        assert_eq!(gate.check_route("/tasks").await, RouteAccess::Unauthenticated);
    }

    #[tokio::test]
    async fn denial_names_required_capabilities() {
        let (session, gate) = gate(Role::QaTester);
        let _ = session.login("qa@example.com", "secret").await;

        assert_eq!(gate.check_route("/tasks/9").await, RouteAccess::Granted);
        match gate.check_route("/permissions").await {
            RouteAccess::Denied(denial) => {
                assert_eq!(denial.required(), &[Capability::ManagePermissions]);
                assert_eq!(denial.role(), Role::QaTester);
            }
            other => unreachable!("unexpected access {other:?}"),
        }
    }

    #[tokio::test]
    async fn project_manager_passes_every_gate() {
        let (session, gate) = gate(Role::ProjectManager);
        let _ = session.login("pm@example.com", "secret").await;

        for route in ["/tasks", "/backlog", "/permissions", "/calendar", "/docs", "/"] {
            assert_eq!(gate.check_route(route).await, RouteAccess::Granted, "{route}");
        }
    }
}
