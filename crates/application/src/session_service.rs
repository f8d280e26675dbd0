//! Session lifecycle: restore from storage, login, logout.
//!
//! The service is the single owner of the current identity. Components that
//! need it receive an `Arc<SessionService>` instead of reading ambient state.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use smart_sprint_core::CredentialClaims;
use smart_sprint_domain::{Capability, Identity, IdentityInput, Role};

use crate::{CredentialStore, LocalAccountDirectory, UserGateway};

/// Whether an identity is currently held.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    /// No identity.
    #[default]
    Unauthenticated,
    /// Identity established by restore or login.
    Authenticated(Identity),
}

/// Result of a login attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    /// Login succeeded and the session now holds this identity.
    Authenticated(Identity),
    /// Login failed; the session is left as it was.
    Failed {
        /// Human-readable reason, never empty.
        reason: String,
    },
}

impl LoginOutcome {
    /// Returns the identity for a successful login.
    #[must_use]
    pub fn identity(&self) -> Option<&Identity> {
        match self {
            Self::Authenticated(identity) => Some(identity),
            Self::Failed { .. } => None,
        }
    }
}

/// Application service owning the current session.
#[derive(Clone)]
pub struct SessionService {
    users: Arc<dyn UserGateway>,
    credentials: Arc<dyn CredentialStore>,
    accounts: Arc<dyn LocalAccountDirectory>,
    state: Arc<RwLock<SessionState>>,
}

impl SessionService {
    /// Creates an unauthenticated session service.
    #[must_use]
    pub fn new(
        users: Arc<dyn UserGateway>,
        credentials: Arc<dyn CredentialStore>,
        accounts: Arc<dyn LocalAccountDirectory>,
    ) -> Self {
        Self {
            users,
            credentials,
            accounts,
            state: Arc::new(RwLock::new(SessionState::Unauthenticated)),
        }
    }

    /// Rebuilds the session from the stored credential.
    ///
    /// Missing, malformed or expired credentials leave the session
    /// unauthenticated, and the latter two are removed from storage.
    pub async fn restore(&self) -> Option<Identity> {
        let claims = match self.credentials.load().await {
            Ok(Some(claims)) => claims,
            Ok(None) => {
                debug!("no stored credential");
                *self.state.write().await = SessionState::Unauthenticated;
                return None;
            }
            Err(error) => {
                warn!(error = %error, "stored credential is unreadable, clearing it");
                self.discard_session().await;
                return None;
            }
        };

        let now = Utc::now();
        if claims.is_expired_at(now) {
            info!(subject = %claims.subject(), "stored credential expired, clearing it");
            self.discard_session().await;
            return None;
        }

        let identity = self.identity_from_claims(&claims, now);
        info!(
            subject = %identity.id(),
            role = %identity.role(),
            "session restored from stored credential"
        );
        *self.state.write().await = SessionState::Authenticated(identity.clone());
        Some(identity)
    }

    /// Authenticates against the backend, falling back to local accounts.
    ///
    /// A failed attempt leaves the current session untouched.
    pub async fn login(&self, email: &str, password: &str) -> LoginOutcome {
        let email = email.trim();
        let now = Utc::now();

        let identity = match self.users.login(email, password).await {
            Ok(profile) => {
                info!(user_id = profile.id, "backend login succeeded");
                Identity::from_profile(&profile, now).with_last_login(now)
            }
            Err(remote_error) => {
                warn!(
                    error = %remote_error,
                    "backend login failed, trying local accounts"
                );
                match self.accounts.authenticate(email, password) {
                    Ok(identity) => identity.with_last_login(now),
                    Err(error) => {
                        info!(error = %error, "login rejected");
                        return LoginOutcome::Failed {
                            reason: failure_reason(error.message()),
                        };
                    }
                }
            }
        };

        let claims = CredentialClaims::issue(
            identity.id(),
            identity.email(),
            identity.role().as_str(),
            identity.company(),
            now,
        );
        if let Err(error) = self.credentials.save(&claims).await {
            warn!(error = %error, "failed to persist credential");
        }

        info!(
            subject = %identity.id(),
            role = %identity.role(),
            "session established"
        );
        *self.state.write().await = SessionState::Authenticated(identity.clone());
        LoginOutcome::Authenticated(identity)
    }

    /// Drops the session and its stored credential. Idempotent.
    pub async fn logout(&self) {
        self.discard_session().await;
        info!("session closed");
    }

    /// Returns the current state.
    pub async fn state(&self) -> SessionState {
        self.state.read().await.clone()
    }

    /// Returns the current identity, if authenticated.
    pub async fn current_identity(&self) -> Option<Identity> {
        match &*self.state.read().await {
            SessionState::Authenticated(identity) => Some(identity.clone()),
            SessionState::Unauthenticated => None,
        }
    }

    /// Returns whether the current identity holds a capability.
    pub async fn has_permission(&self, capability: Capability) -> bool {
        match &*self.state.read().await {
            SessionState::Authenticated(identity) => identity.has_permission(capability),
            SessionState::Unauthenticated => false,
        }
    }

    /// Returns whether the current identity may see a task type.
    pub async fn can_see_task_type(&self, task_type: &str) -> bool {
        match &*self.state.read().await {
            SessionState::Authenticated(identity) => identity.can_see_task_type(task_type),
            SessionState::Unauthenticated => false,
        }
    }

    /// Returns whether the current identity is a project manager.
    pub async fn is_project_manager(&self) -> bool {
        matches!(
            &*self.state.read().await,
            SessionState::Authenticated(identity) if identity.role() == Role::ProjectManager
        )
    }

    async fn discard_session(&self) {
        if let Err(error) = self.credentials.clear().await {
            warn!(error = %error, "failed to clear stored credential");
        }
        *self.state.write().await = SessionState::Unauthenticated;
    }

    fn identity_from_claims(&self, claims: &CredentialClaims, now: DateTime<Utc>) -> Identity {
        let issued_at = DateTime::from_timestamp(claims.issued_at(), 0).unwrap_or(now);
        let (first_name, last_name) = match self.accounts.find_by_subject(claims.subject()) {
            Some(account) => (account.first_name().to_owned(), account.last_name().to_owned()),
            None => (email_local_part(claims.email()).to_owned(), String::new()),
        };

        Identity::new(IdentityInput {
            id: claims.subject().to_owned(),
            first_name,
            last_name,
            email: claims.email().to_owned(),
            role: Role::from_key_lenient(claims.role()),
            company: claims.company().to_owned(),
            is_active: true,
            created_at: issued_at,
            last_login: issued_at,
        })
    }
}

fn email_local_part(email: &str) -> &str {
    email.split('@').next().unwrap_or_default()
}

fn failure_reason(message: &str) -> String {
    if message.trim().is_empty() {
        "Login failed".to_owned()
    } else {
        message.to_owned()
    }
}

#[cfg(test)]
mod tests;
