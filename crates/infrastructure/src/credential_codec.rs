use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use smart_sprint_core::{AppError, AppResult, CredentialClaims};

/// Encodes claims as base64 of their JSON form.
pub fn encode_credential(claims: &CredentialClaims) -> AppResult<String> {
    let json = serde_json::to_vec(claims)
        .map_err(|error| AppError::Internal(format!("failed to serialize credential: {error}")))?;
    Ok(STANDARD.encode(json))
}

/// Decodes a stored credential string.
pub fn decode_credential(encoded: &str) -> AppResult<CredentialClaims> {
    let bytes = STANDARD
        .decode(encoded.trim())
        .map_err(|error| AppError::Validation(format!("credential is not valid base64: {error}")))?;

    serde_json::from_slice(&bytes)
        .map_err(|error| AppError::Validation(format!("credential payload is malformed: {error}")))
}
