use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use smart_sprint_core::{AppError, AppResult, CredentialClaims};
use smart_sprint_domain::{Capability, Identity, IdentityInput, Role, UserProfile};
use tokio::sync::Mutex;

use crate::{CredentialStore, LocalAccountDirectory, UserGateway, UserQuery};

use super::{LoginOutcome, SessionService, SessionState};

struct FakeUserGateway {
    profile: Option<UserProfile>,
}

#[async_trait]
impl UserGateway for FakeUserGateway {
    async fn list_users(&self, _query: UserQuery) -> AppResult<Vec<UserProfile>> {
        Ok(Vec::new())
    }

    async fn login(&self, _email: &str, _password: &str) -> AppResult<UserProfile> {
        self.profile
            .clone()
            .ok_or_else(|| AppError::Unavailable("connection refused".to_owned()))
    }
}

#[derive(Default)]
struct FakeCredentialStore {
    stored: Mutex<Option<CredentialClaims>>,
    malformed: Mutex<bool>,
    fail_writes: bool,
    clear_calls: Mutex<u32>,
}

#[async_trait]
impl CredentialStore for FakeCredentialStore {
    async fn load(&self) -> AppResult<Option<CredentialClaims>> {
        if *self.malformed.lock().await {
            return Err(AppError::Validation("credential is not valid base64".to_owned()));
        }
        Ok(self.stored.lock().await.clone())
    }

    async fn save(&self, claims: &CredentialClaims) -> AppResult<()> {
        if self.fail_writes {
            return Err(AppError::Internal("disk full".to_owned()));
        }
        *self.stored.lock().await = Some(claims.clone());
        Ok(())
    }

    async fn clear(&self) -> AppResult<()> {
        *self.clear_calls.lock().await += 1;
        *self.malformed.lock().await = false;
        *self.stored.lock().await = None;
        Ok(())
    }
}

struct FakeAccounts;

fn demo_identity(id: &str, first_name: &str, last_name: &str, email: &str, role: Role) -> Identity {
    Identity::new(IdentityInput {
        id: id.to_owned(),
        first_name: first_name.to_owned(),
        last_name: last_name.to_owned(),
        email: email.to_owned(),
        role,
        company: "Google".to_owned(),
        is_active: true,
        created_at: Utc::now(),
        last_login: Utc::now(),
    })
}

impl LocalAccountDirectory for FakeAccounts {
    fn authenticate(&self, email: &str, password: &str) -> AppResult<Identity> {
        let identity = match email {
            "pm@example.com" => demo_identity(
                "user-1",
                "Davis",
                "Donin",
                email,
                Role::ProjectManager,
            ),
            "dev@example.com" => demo_identity(
                "user-2",
                "John",
                "Developer",
                email,
                Role::FrontendDeveloper,
            ),
            _ => return Err(AppError::Unauthorized("User not found".to_owned())),
        };

        if password == "password123" {
            Ok(identity)
        } else {
            Err(AppError::Unauthorized("Invalid password".to_owned()))
        }
    }

    fn find_by_subject(&self, subject: &str) -> Option<Identity> {
        (subject == "user-1").then(|| {
            demo_identity(
                "user-1",
                "Davis",
                "Donin",
                "pm@example.com",
                Role::ProjectManager,
            )
        })
    }
}

fn service(
    profile: Option<UserProfile>,
    store: Arc<FakeCredentialStore>,
) -> SessionService {
    SessionService::new(
        Arc::new(FakeUserGateway { profile }),
        store,
        Arc::new(FakeAccounts),
    )
}

#[tokio::test]
async fn expired_credential_is_cleared_on_restore() {
    let now = Utc::now().timestamp();
    let store = Arc::new(FakeCredentialStore::default());
    *store.stored.lock().await = Some(CredentialClaims::new(
        "user-1",
        "pm@example.com",
        "project-manager",
        "Google",
        now - 86_401,
        now - 1,
    ));
    let session = service(None, store.clone());

    assert!(session.restore().await.is_none());
    assert_eq!(session.state().await, SessionState::Unauthenticated);
    assert!(store.stored.lock().await.is_none());
    assert_eq!(*store.clear_calls.lock().await, 1);
}

#[tokio::test]
async fn valid_credential_restores_known_account() {
    let store = Arc::new(FakeCredentialStore::default());
    *store.stored.lock().await = Some(CredentialClaims::issue(
        "user-1",
        "pm@example.com",
        "project-manager",
        "Google",
        Utc::now() - Duration::hours(1),
    ));
    let session = service(None, store);

    let identity = session.restore().await.unwrap_or_else(|| unreachable!());
    assert_eq!(identity.role(), Role::ProjectManager);
    assert_eq!(identity.first_name(), "Davis");
    assert_eq!(identity.avatar(), "DD");
    assert!(session.is_project_manager().await);
    assert!(session.has_permission(Capability::ManagePermissions).await);
}

#[tokio::test]
async fn unknown_subject_takes_name_from_email() {
    let store = Arc::new(FakeCredentialStore::default());
    *store.stored.lock().await = Some(CredentialClaims::issue(
        "77",
        "maria@example.com",
        "qa-tester",
        "",
        Utc::now(),
    ));
    let session = service(None, store);

    let identity = session.restore().await.unwrap_or_else(|| unreachable!());
    assert_eq!(identity.first_name(), "maria");
    assert_eq!(identity.avatar(), "M");
    assert_eq!(identity.role(), Role::QaTester);
    assert!(session.can_see_task_type("marketing").await);
}

#[tokio::test]
async fn malformed_credential_is_cleared_on_restore() {
    let store = Arc::new(FakeCredentialStore::default());
    *store.malformed.lock().await = true;
    let session = service(None, store.clone());

    assert!(session.restore().await.is_none());
    assert_eq!(*store.clear_calls.lock().await, 1);
    assert!(!*store.malformed.lock().await);
}

#[tokio::test]
async fn local_fallback_logs_in_project_manager_when_backend_is_down() {
    let store = Arc::new(FakeCredentialStore::default());
    let session = service(None, store.clone());

    let outcome = session.login("pm@example.com", "password123").await;

    let identity = outcome.identity().cloned().unwrap_or_else(|| unreachable!());
    assert_eq!(identity.role(), Role::ProjectManager);
    assert!(identity.has_permission(Capability::ManagePermissions));
    assert!(session.has_permission(Capability::ManagePermissions).await);

    let stored = store.stored.lock().await.clone().unwrap_or_else(|| unreachable!());
    assert_eq!(stored.subject(), "user-1");
    assert_eq!(stored.role(), "project-manager");
    assert!(!stored.is_expired_at(Utc::now()));
}

#[tokio::test]
async fn wrong_password_fails_with_reason_when_backend_is_down() {
    let store = Arc::new(FakeCredentialStore::default());
    let session = service(None, store.clone());

    let outcome = session.login("dev@example.com", "wrongpassword").await;

    match outcome {
        LoginOutcome::Failed { reason } => assert_eq!(reason, "Invalid password"),
        LoginOutcome::Authenticated(_) => unreachable!(),
    }
    assert_eq!(session.state().await, SessionState::Unauthenticated);
    assert!(store.stored.lock().await.is_none());

    let unknown = session.login("nobody@example.com", "password123").await;
    assert_eq!(
        unknown,
        LoginOutcome::Failed {
            reason: "User not found".to_owned()
        }
    );
}

#[tokio::test]
async fn backend_profile_wins_and_unknown_role_fails_closed() {
    let profile = UserProfile {
        id: 12,
        first_name: "Root".to_owned(),
        last_name: "Admin".to_owned(),
        email: "root@example.com".to_owned(),
        role_key: Some("admin".to_owned()),
        company: Some("Smart Sprint".to_owned()),
        is_active: true,
        created_at: None,
        last_login: None,
    };
    let store = Arc::new(FakeCredentialStore::default());
    let session = service(Some(profile), store.clone());

    let outcome = session.login("root@example.com", "whatever").await;

    let identity = outcome.identity().cloned().unwrap_or_else(|| unreachable!());
    assert_eq!(identity.id(), "12");
    assert_eq!(identity.role(), Role::Other);
    assert!(!session.has_permission(Capability::ChangeStatus).await);
    assert_eq!(
        store
            .stored
            .lock()
            .await
            .as_ref()
            .map(|claims| claims.role().to_owned()),
        Some("other".to_owned())
    );
}

#[tokio::test]
async fn credential_write_failure_does_not_fail_login() {
    let store = Arc::new(FakeCredentialStore {
        fail_writes: true,
        ..FakeCredentialStore::default()
    });
    let session = service(None, store);

    let outcome = session.login("dev@example.com", "password123").await;

    assert!(outcome.identity().is_some());
    assert!(session.current_identity().await.is_some());
}

#[tokio::test]
async fn logout_is_idempotent() {
    let store = Arc::new(FakeCredentialStore::default());
    let session = service(None, store.clone());
    let _ = session.login("dev@example.com", "password123").await;

    session.logout().await;
    session.logout().await;

    assert!(session.current_identity().await.is_none());
    assert!(!session.can_see_task_type("frontend").await);
    assert!(store.stored.lock().await.is_none());
    assert_eq!(*store.clear_calls.lock().await, 2);
}
