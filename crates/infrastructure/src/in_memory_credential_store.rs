use async_trait::async_trait;
use smart_sprint_application::CredentialStore;
use smart_sprint_core::{AppResult, CredentialClaims};
use tokio::sync::RwLock;

use crate::{decode_credential, encode_credential};

/// Process-local credential store holding the encoded credential string.
#[derive(Default)]
pub struct InMemoryCredentialStore {
    encoded: RwLock<Option<String>>,
}

impl InMemoryCredentialStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store preloaded with a raw credential string.
    #[must_use]
    pub fn with_raw(encoded: impl Into<String>) -> Self {
        Self {
            encoded: RwLock::new(Some(encoded.into())),
        }
    }

    /// Returns the raw stored string.
    pub async fn raw(&self) -> Option<String> {
        self.encoded.read().await.clone()
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn load(&self) -> AppResult<Option<CredentialClaims>> {
        self.encoded
            .read()
            .await
            .as_deref()
            .map(decode_credential)
            .transpose()
    }

    async fn save(&self, claims: &CredentialClaims) -> AppResult<()> {
        let encoded = encode_credential(claims)?;
        *self.encoded.write().await = Some(encoded);
        Ok(())
    }

    async fn clear(&self) -> AppResult<()> {
        *self.encoded.write().await = None;
        Ok(())
    }
}
