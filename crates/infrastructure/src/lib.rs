//! Infrastructure adapters for the Smart Sprint client core.

#![forbid(unsafe_code)]

mod credential_codec;
mod file_credential_store;
mod http_backend_client;
mod in_memory_credential_store;
mod static_account_directory;

pub use credential_codec::{decode_credential, encode_credential};
pub use file_credential_store::FileCredentialStore;
pub use http_backend_client::HttpBackendClient;
pub use in_memory_credential_store::InMemoryCredentialStore;
pub use static_account_directory::StaticAccountDirectory;
