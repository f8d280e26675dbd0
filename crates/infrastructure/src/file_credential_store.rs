use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use smart_sprint_application::CredentialStore;
use smart_sprint_core::{AppError, AppResult, CredentialClaims};
use tracing::debug;

use crate::{decode_credential, encode_credential};

/// Credential store persisting the encoded credential in a single file.
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    /// Creates a store for the given file path. The file need not exist.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the backing file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.path.as_path()
    }
}

#[async_trait]
impl CredentialStore for FileCredentialStore {
    async fn load(&self) -> AppResult<Option<CredentialClaims>> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(error) if error.kind() == ErrorKind::NotFound => return Ok(None),
            Err(error) => {
                return Err(AppError::Internal(format!(
                    "failed to read credential file '{}': {error}",
                    self.path.display()
                )));
            }
        };

        if contents.trim().is_empty() {
            return Ok(None);
        }

        decode_credential(&contents).map(Some)
    }

    async fn save(&self, claims: &CredentialClaims) -> AppResult<()> {
        let encoded = encode_credential(claims)?;

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await.map_err(|error| {
                AppError::Internal(format!(
                    "failed to create credential directory '{}': {error}",
                    parent.display()
                ))
            })?;
        }

        tokio::fs::write(&self.path, encoded).await.map_err(|error| {
            AppError::Internal(format!(
                "failed to write credential file '{}': {error}",
                self.path.display()
            ))
        })?;
        debug!(path = %self.path.display(), "credential stored");
        Ok(())
    }

    async fn clear(&self) -> AppResult<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {
                debug!(path = %self.path.display(), "credential removed");
                Ok(())
            }
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(()),
            Err(error) => Err(AppError::Internal(format!(
                "failed to remove credential file '{}': {error}",
                self.path.display()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use chrono::Utc;
    use smart_sprint_application::CredentialStore;
    use smart_sprint_core::{AppError, CredentialClaims};

    use super::FileCredentialStore;

    fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("smart-sprint-{}-{name}", std::process::id()))
            .join("credential")
    }

    #[tokio::test]
    async fn missing_file_loads_as_none_and_clear_is_idempotent() {
        let store = FileCredentialStore::new(scratch_path("missing"));

        assert_eq!(store.load().await, Ok(None));
        assert_eq!(store.clear().await, Ok(()));
        assert_eq!(store.clear().await, Ok(()));
    }

    #[tokio::test]
    async fn save_creates_parent_directory_and_round_trips() {
        let path = scratch_path("roundtrip");
        let store = FileCredentialStore::new(path.clone());
        let claims = CredentialClaims::issue("12", "dev@example.com", "backend-developer", "", Utc::now());

        store.save(&claims).await.unwrap_or_else(|_| unreachable!());
        assert!(path.exists());
        assert_eq!(store.load().await, Ok(Some(claims)));

        store.clear().await.unwrap_or_else(|_| unreachable!());
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn corrupted_file_is_a_validation_error() {
        let path = scratch_path("corrupted");
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.unwrap_or_else(|_| unreachable!());
        }
        tokio::fs::write(&path, "@@@").await.unwrap_or_else(|_| unreachable!());
        let store = FileCredentialStore::new(path);

        assert!(matches!(store.load().await, Err(AppError::Validation(_))));
        store.clear().await.unwrap_or_else(|_| unreachable!());
    }
}
