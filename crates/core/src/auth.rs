use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifetime of a locally synthesized credential.
pub const CREDENTIAL_LIFETIME_SECONDS: i64 = 24 * 60 * 60;

/// Identity claims carried inside the stored bearer credential.
///
/// Field names follow the persisted payload so credentials written by older
/// clients keep decoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialClaims {
    #[serde(rename = "userId")]
    subject: String,
    email: String,
    role: String,
    #[serde(default)]
    company: String,
    #[serde(rename = "iat")]
    issued_at: i64,
    #[serde(rename = "exp")]
    expires_at: i64,
}

impl CredentialClaims {
    /// Creates claims from explicit timestamps (unix seconds).
    #[must_use]
    pub fn new(
        subject: impl Into<String>,
        email: impl Into<String>,
        role: impl Into<String>,
        company: impl Into<String>,
        issued_at: i64,
        expires_at: i64,
    ) -> Self {
        Self {
            subject: subject.into(),
            email: email.into(),
            role: role.into(),
            company: company.into(),
            issued_at,
            expires_at,
        }
    }

    /// Issues claims valid for [`CREDENTIAL_LIFETIME_SECONDS`] from `now`.
    #[must_use]
    pub fn issue(
        subject: impl Into<String>,
        email: impl Into<String>,
        role: impl Into<String>,
        company: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        let issued_at = now.timestamp();
        Self::new(
            subject,
            email,
            role,
            company,
            issued_at,
            issued_at.saturating_add(CREDENTIAL_LIFETIME_SECONDS),
        )
    }

    /// Returns the subject (user id) claim.
    #[must_use]
    pub fn subject(&self) -> &str {
        self.subject.as_str()
    }

    /// Returns the email claim.
    #[must_use]
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Returns the role storage key claim.
    #[must_use]
    pub fn role(&self) -> &str {
        self.role.as_str()
    }

    /// Returns the company claim.
    #[must_use]
    pub fn company(&self) -> &str {
        self.company.as_str()
    }

    /// Returns the issued-at timestamp in unix seconds.
    #[must_use]
    pub fn issued_at(&self) -> i64 {
        self.issued_at
    }

    /// Returns the expiry timestamp in unix seconds.
    #[must_use]
    pub fn expires_at(&self) -> i64 {
        self.expires_at
    }

    /// Returns whether the credential is past its expiry at `now`.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at < now.timestamp()
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::{CREDENTIAL_LIFETIME_SECONDS, CredentialClaims};

    #[test]
    fn issued_claims_expire_after_one_day() {
        let now = Utc::now();
        let claims = CredentialClaims::issue("1", "pm@example.com", "project-manager", "", now);

        assert_eq!(
            claims.expires_at() - claims.issued_at(),
            CREDENTIAL_LIFETIME_SECONDS
        );
        assert!(!claims.is_expired_at(now));
        assert!(claims.is_expired_at(now + Duration::seconds(CREDENTIAL_LIFETIME_SECONDS + 1)));
    }

    #[test]
    fn claims_serialize_with_payload_field_names() {
        let claims = CredentialClaims::new("user-1", "a@b.io", "other", "Acme", 10, 20);
        let encoded = serde_json::to_value(&claims).unwrap_or_default();

        assert_eq!(encoded["userId"], "user-1");
        assert_eq!(encoded["iat"], 10);
        assert_eq!(encoded["exp"], 20);
    }
}
