//! API key authentication extractor.
//!
//! Extracts and verifies API keys from:
//! - `Authorization: Bearer <key>` header
//! - `X-API-Key: <key>` header
//!
//! Keys are SHA-256 hashed and looked up in the `api_keys` table; a match
//! yields the caller identity the key was issued to.

use aes_gcm::aead::{OsRng, rand_core::RngCore};
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use sha2::{Digest, Sha256};

use botgate_infra::sqlite::api_key::SqliteApiKeyStore;
use botgate_types::error::RepositoryError;
use botgate_types::identity::CallerId;

use crate::http::error::AppError;
use crate::state::AppState;

/// Prefix of every issued key, so leaked keys are easy to grep for.
pub const KEY_PREFIX: &str = "bgk_";

/// The authenticated caller. Extracting this validates the API key.
#[derive(Debug, Clone, Copy)]
pub struct Caller(pub CallerId);

impl FromRequestParts<AppState> for Caller {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let api_key = extract_api_key(parts)?;
        let key_hash = hash_api_key(&api_key);

        let caller = state
            .api_keys
            .resolve(&key_hash)
            .await
            .map_err(|e| AppError::Internal(format!("api key lookup failed: {e}")))?;

        match caller {
            Some(id) => Ok(Caller(id)),
            None => Err(AppError::Unauthorized(
                "Invalid API key. Provide a valid key via 'Authorization: Bearer <key>' or 'X-API-Key: <key>' header.".to_string(),
            )),
        }
    }
}

/// Extract the API key from request headers.
fn extract_api_key(parts: &Parts) -> Result<String, AppError> {
    // Try Authorization: Bearer <key>
    if let Some(auth) = parts.headers.get("authorization") {
        let auth_str = auth.to_str().map_err(|_| {
            AppError::Unauthorized("Invalid Authorization header encoding".to_string())
        })?;
        if let Some(key) = auth_str.strip_prefix("Bearer ") {
            return Ok(key.trim().to_string());
        }
    }

    // Try X-API-Key header
    if let Some(key) = parts.headers.get("x-api-key") {
        let key_str = key.to_str().map_err(|_| {
            AppError::Unauthorized("Invalid X-API-Key header encoding".to_string())
        })?;
        return Ok(key_str.trim().to_string());
    }

    Err(AppError::Unauthorized(
        "Missing API key. Provide via 'Authorization: Bearer <key>' or 'X-API-Key: <key>' header.".to_string(),
    ))
}

/// Compute SHA-256 hash of an API key (lowercase hex).
pub fn hash_api_key(key: &str) -> String {
    let digest = Sha256::digest(key.as_bytes());
    format!("{:x}", digest)
}

/// Generate a random plaintext key.
pub fn generate_api_key() -> String {
    let mut key_bytes = [0u8; 32];
    OsRng.fill_bytes(&mut key_bytes);
    format!(
        "{KEY_PREFIX}{}",
        key_bytes.iter().map(|b| format!("{b:02x}")).collect::<String>()
    )
}

/// Issue a new API key for `user` and store its hash.
///
/// Returns the plaintext key, which is shown to the user once and never stored.
pub async fn issue_api_key(
    store: &SqliteApiKeyStore,
    user: CallerId,
    name: &str,
) -> Result<String, RepositoryError> {
    let plaintext_key = generate_api_key();
    store.insert(user, name, &hash_api_key(&plaintext_key)).await?;
    Ok(plaintext_key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts_with(header: &str, value: &str) -> Parts {
        let (parts, _) = Request::builder()
            .header(header, value)
            .body(())
            .unwrap()
            .into_parts();
        parts
    }

    #[test]
    fn test_extract_bearer_and_header_keys() {
        let parts = parts_with("authorization", "Bearer bgk_abc ");
        assert_eq!(extract_api_key(&parts).unwrap(), "bgk_abc");

        let parts = parts_with("x-api-key", "bgk_def");
        assert_eq!(extract_api_key(&parts).unwrap(), "bgk_def");
    }

    #[test]
    fn test_missing_key_is_unauthorized() {
        let (parts, _) = Request::builder().body(()).unwrap().into_parts();
        assert!(matches!(extract_api_key(&parts), Err(AppError::Unauthorized(_))));

        let parts = parts_with("authorization", "Basic dXNlcjpwdw==");
        assert!(matches!(extract_api_key(&parts), Err(AppError::Unauthorized(_))));
    }

    #[test]
    fn test_hash_is_sha256_hex() {
        assert_eq!(
            hash_api_key("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_generated_keys_are_distinct() {
        let a = generate_api_key();
        let b = generate_api_key();
        assert!(a.starts_with(KEY_PREFIX));
        assert_eq!(a.len(), KEY_PREFIX.len() + 64);
        assert_ne!(a, b);
    }
}
