use std::env;
use std::fmt;
use std::path::PathBuf;

use smart_sprint_core::{AppError, AppResult};
use url::Url;

const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";
const DEFAULT_CREDENTIAL_PATH: &str = ".smart-sprint/credential";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 15;

#[derive(Clone)]
pub struct LoginCredentials {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for LoginCredentials {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("LoginCredentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct SyncConfig {
    pub api_base_url: String,
    pub credential_path: PathBuf,
    pub project_id: Option<i64>,
    pub http_timeout_secs: u64,
    pub login: Option<LoginCredentials>,
}

impl SyncConfig {
    pub fn load() -> AppResult<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> AppResult<Self> {
        let non_empty = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty())
        };

        let api_base_url = non_empty("SMART_SPRINT_API_BASE_URL")
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_owned())
            .trim_end_matches('/')
            .to_owned();
        let parsed = Url::parse(&api_base_url).map_err(|error| {
            AppError::Validation(format!(
                "invalid SMART_SPRINT_API_BASE_URL value '{api_base_url}': {error}"
            ))
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(AppError::Validation(format!(
                "SMART_SPRINT_API_BASE_URL must use http or https, got '{api_base_url}'"
            )));
        }

        let credential_path = non_empty("SMART_SPRINT_CREDENTIAL_PATH")
            .map_or_else(|| PathBuf::from(DEFAULT_CREDENTIAL_PATH), PathBuf::from);

        let project_id = match non_empty("SMART_SPRINT_PROJECT_ID") {
            Some(value) => {
                let project_id = value.parse::<i64>().map_err(|error| {
                    AppError::Validation(format!(
                        "invalid SMART_SPRINT_PROJECT_ID value '{value}': {error}"
                    ))
                })?;
                if project_id <= 0 {
                    return Err(AppError::Validation(
                        "SMART_SPRINT_PROJECT_ID must be greater than zero".to_owned(),
                    ));
                }
                Some(project_id)
            }
            None => None,
        };

        let http_timeout_secs = match non_empty("SMART_SPRINT_HTTP_TIMEOUT_SECS") {
            Some(value) => value.parse::<u64>().map_err(|error| {
                AppError::Validation(format!(
                    "invalid SMART_SPRINT_HTTP_TIMEOUT_SECS value '{value}': {error}"
                ))
            })?,
            None => DEFAULT_HTTP_TIMEOUT_SECS,
        };
        if http_timeout_secs == 0 {
            return Err(AppError::Validation(
                "SMART_SPRINT_HTTP_TIMEOUT_SECS must be greater than zero".to_owned(),
            ));
        }

        let login = match (
            non_empty("SMART_SPRINT_LOGIN_EMAIL"),
            lookup("SMART_SPRINT_LOGIN_PASSWORD").filter(|value| !value.is_empty()),
        ) {
            (Some(email), Some(password)) => Some(LoginCredentials { email, password }),
            (None, None) => None,
            _ => {
                return Err(AppError::Validation(
                    "SMART_SPRINT_LOGIN_EMAIL and SMART_SPRINT_LOGIN_PASSWORD must be set together"
                        .to_owned(),
                ));
            }
        };

        Ok(Self {
            api_base_url,
            credential_path,
            project_id,
            http_timeout_secs,
            login,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::path::PathBuf;

    use smart_sprint_core::AppError;

    use super::SyncConfig;

    fn config_from(pairs: &[(&str, &str)]) -> Result<SyncConfig, AppError> {
        let values: HashMap<String, String> = pairs
            .iter()
            .map(|(name, value)| ((*name).to_owned(), (*value).to_owned()))
            .collect();
        SyncConfig::from_lookup(|name| values.get(name).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = config_from(&[]).unwrap_or_else(|_| unreachable!());

        assert_eq!(config.api_base_url, "http://localhost:8000");
        assert_eq!(config.credential_path, PathBuf::from(".smart-sprint/credential"));
        assert_eq!(config.project_id, None);
        assert_eq!(config.http_timeout_secs, 15);
        assert!(config.login.is_none());
    }

    #[test]
    fn explicit_values_are_validated() {
        let config = config_from(&[
            ("SMART_SPRINT_API_BASE_URL", "https://sprint.example.com/"),
            ("SMART_SPRINT_PROJECT_ID", "7"),
            ("SMART_SPRINT_HTTP_TIMEOUT_SECS", "30"),
            ("SMART_SPRINT_LOGIN_EMAIL", "pm@example.com"),
            ("SMART_SPRINT_LOGIN_PASSWORD", "password123"),
        ])
        .unwrap_or_else(|_| unreachable!());

        assert_eq!(config.api_base_url, "https://sprint.example.com");
        assert_eq!(config.project_id, Some(7));
        assert_eq!(config.http_timeout_secs, 30);
        assert_eq!(
            config.login.as_ref().map(|login| login.email.as_str()),
            Some("pm@example.com")
        );
        assert!(!format!("{config:?}").contains("password123"));
    }

    #[test]
    fn invalid_values_are_rejected() {
        for pairs in [
            vec![("SMART_SPRINT_API_BASE_URL", "localhost:8000/api")],
            vec![("SMART_SPRINT_API_BASE_URL", "not a url")],
            vec![("SMART_SPRINT_PROJECT_ID", "0")],
            vec![("SMART_SPRINT_PROJECT_ID", "abc")],
            vec![("SMART_SPRINT_HTTP_TIMEOUT_SECS", "0")],
            vec![("SMART_SPRINT_LOGIN_EMAIL", "pm@example.com")],
        ] {
            assert!(
                matches!(config_from(&pairs), Err(AppError::Validation(_))),
                "{pairs:?}"
            );
        }
    }
}
