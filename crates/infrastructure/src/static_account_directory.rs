use chrono::{DateTime, TimeZone, Utc};
use sha2::{Digest, Sha256};
use smart_sprint_application::LocalAccountDirectory;
use smart_sprint_core::{AppError, AppResult};
use smart_sprint_domain::{Identity, IdentityInput, Role};

struct StaticAccount {
    id: &'static str,
    first_name: &'static str,
    last_name: &'static str,
    email: &'static str,
    password_sha256: &'static str,
    role: Role,
    company: &'static str,
}

// sha256("password123")
const DEMO_PASSWORD_SHA256: &str =
    "ef92b778bafe771e89245b89ecbc08a44a4e166c06659911881f383d4473e94f";

const DEMO_ACCOUNTS: &[StaticAccount] = &[
    StaticAccount {
        id: "user-1",
        first_name: "Davis",
        last_name: "Donin",
        email: "pm@example.com",
        password_sha256: DEMO_PASSWORD_SHA256,
        role: Role::ProjectManager,
        company: "Google",
    },
    StaticAccount {
        id: "user-2",
        first_name: "John",
        last_name: "Developer",
        email: "dev@example.com",
        password_sha256: DEMO_PASSWORD_SHA256,
        role: Role::FrontendDeveloper,
        company: "Google",
    },
];

/// Built-in demo accounts used when the backend cannot authenticate.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticAccountDirectory;

impl StaticAccountDirectory {
    /// Creates the directory of built-in accounts.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl LocalAccountDirectory for StaticAccountDirectory {
    fn authenticate(&self, email: &str, password: &str) -> AppResult<Identity> {
        let email = email.trim();
        let account = DEMO_ACCOUNTS
            .iter()
            .find(|account| account.email.eq_ignore_ascii_case(email))
            .ok_or_else(|| AppError::Unauthorized("User not found".to_owned()))?;

        if hex::encode(Sha256::digest(password.as_bytes())) != account.password_sha256 {
            return Err(AppError::Unauthorized("Invalid password".to_owned()));
        }

        Ok(account.to_identity())
    }

    fn find_by_subject(&self, subject: &str) -> Option<Identity> {
        DEMO_ACCOUNTS
            .iter()
            .find(|account| account.id == subject)
            .map(StaticAccount::to_identity)
    }
}

impl StaticAccount {
    fn to_identity(&self) -> Identity {
        let created_at = demo_epoch();
        Identity::new(IdentityInput {
            id: self.id.to_owned(),
            first_name: self.first_name.to_owned(),
            last_name: self.last_name.to_owned(),
            email: self.email.to_owned(),
            role: self.role,
            company: self.company.to_owned(),
            is_active: true,
            created_at,
            last_login: Utc::now(),
        })
    }
}

fn demo_epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
        .single()
        .unwrap_or_else(Utc::now)
}
