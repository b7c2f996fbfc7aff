use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use keyring::Entry;
use std::fs;
use std::path::PathBuf;

use crate::error::{DashboardError, Result};

const SERVICE_NAME: &str = "com.billlayne.customermatrix";

/// Keychain account used for the Gemini key
pub const GEMINI_PROVIDER: &str = "gemini";

/// Environment variables checked before the keychain, in order
const ENV_KEYS: &[&str] = &["GEMINI_API_KEY", "API_KEY"];

/// Credential manager: environment first, then the OS keychain, with a file
/// fallback in debug builds
pub struct CredentialManager;

impl CredentialManager {
    /// Get the fallback file path for storing credentials (dev mode only)
    #[cfg(debug_assertions)]
    fn get_fallback_path(provider: &str) -> PathBuf {
        crate::config::app_config_dir().join(format!("{}_key", provider))
    }

    /// Store an API key in the keychain (with file fallback in dev mode)
    pub fn store_api_key(provider: &str, api_key: &str) -> Result<()> {
        let api_key = api_key.trim();
        if api_key.is_empty() {
            return Err(DashboardError::MissingField("API key".to_string()));
        }

        match Entry::new(SERVICE_NAME, provider) {
            Ok(entry) => {
                if entry.set_password(api_key).is_ok() {
                    tracing::debug!(provider, "Stored API key in keychain");
                    return Ok(());
                }
            }
            Err(e) => {
                tracing::debug!(provider, error = %e, "Keychain unavailable");
            }
        }

        #[cfg(debug_assertions)]
        {
            let path = Self::get_fallback_path(provider);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }

            // Base64 is obfuscation only; this path never exists in release builds
            fs::write(&path, STANDARD.encode(api_key))?;
            tracing::warn!(provider, path = %path.display(), "DEV MODE: stored API key in file");
            Ok(())
        }

        #[cfg(not(debug_assertions))]
        Err(DashboardError::Storage(
            "Secure credential storage (Keychain) unavailable".to_string(),
        ))
    }

    /// Get an API key. Fails with `MissingCredential` before any network call.
    pub fn get_api_key(provider: &str) -> Result<String> {
        for var in ENV_KEYS {
            if let Ok(value) = std::env::var(var) {
                if !value.trim().is_empty() {
                    return Ok(value.trim().to_string());
                }
            }
        }

        if let Ok(entry) = Entry::new(SERVICE_NAME, provider) {
            if let Ok(password) = entry.get_password() {
                return Ok(password);
            }
        }

        #[cfg(debug_assertions)]
        {
            let path = Self::get_fallback_path(provider);
            if path.exists() {
                let encoded = fs::read_to_string(&path)?;
                let bytes = STANDARD
                    .decode(encoded.trim())
                    .map_err(|e| DashboardError::Storage(format!("Invalid key file: {}", e)))?;
                let decoded = String::from_utf8(bytes)
                    .map_err(|e| DashboardError::Storage(format!("Invalid UTF-8: {}", e)))?;
                return Ok(decoded);
            }
        }

        Err(DashboardError::MissingCredential)
    }

    /// Delete an API key from keychain and file storage
    pub fn delete_api_key(provider: &str) -> Result<()> {
        let mut keychain_error = None;
        if let Ok(entry) = Entry::new(SERVICE_NAME, provider) {
            match keychain_deleted(entry.delete_credential()) {
                Ok(true) => tracing::debug!(provider, "Deleted API key from keychain"),
                Ok(false) => {}
                Err(e) => {
                    tracing::warn!(provider, error = %e, "Failed to delete API key from keychain");
                    keychain_error = Some(e);
                }
            }
        }

        #[cfg(debug_assertions)]
        {
            let path = Self::get_fallback_path(provider);
            if path.exists() {
                fs::remove_file(&path)?;
            }
        }

        match keychain_error {
            Some(e) => Err(DashboardError::Storage(format!(
                "Failed to delete API key: {}",
                e
            ))),
            None => Ok(()),
        }
    }

    /// Check if an API key is configured
    pub fn has_api_key(provider: &str) -> bool {
        Self::get_api_key(provider).is_ok()
    }
}

/// Outcome of a keychain delete. A missing entry counts as nothing deleted.
fn keychain_deleted(result: keyring::Result<()>) -> std::result::Result<bool, keyring::Error> {
    match result {
        Ok(()) => Ok(true),
        Err(keyring::Error::NoEntry) => Ok(false),
        Err(e) => Err(e),
    }
}

/// Basic format check before a key is stored
pub fn validate_api_key_format(api_key: &str) -> Result<()> {
    let key = api_key.trim();
    if key.is_empty() {
        return Err(DashboardError::MissingField("API key".to_string()));
    }
    if key.chars().any(char::is_whitespace) {
        return Err(DashboardError::InvalidApiKey(
            "contains whitespace".to_string(),
        ));
    }
    if key.len() < 20 {
        return Err(DashboardError::InvalidApiKey("too short".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_api_key_format() {
        assert!(validate_api_key_format("").is_err());
        assert!(matches!(
            validate_api_key_format("short"),
            Err(DashboardError::InvalidApiKey(_))
        ));
        assert!(matches!(
            validate_api_key_format("AIzaSy with spaces in the middle"),
            Err(DashboardError::InvalidApiKey(_))
        ));
        assert!(validate_api_key_format("AIzaSyA-1234567890abcdefghijk").is_ok());
    }

    #[test]
    fn test_keychain_delete_outcomes() {
        assert!(keychain_deleted(Ok(())).unwrap());
        assert!(!keychain_deleted(Err(keyring::Error::NoEntry)).unwrap());
        assert!(keychain_deleted(Err(keyring::Error::Invalid(
            "service".into(),
            "empty".into()
        )))
        .is_err());
    }

    #[test]
    fn test_store_rejects_blank_key() {
        let err = CredentialManager::store_api_key(GEMINI_PROVIDER, "   ").unwrap_err();
        assert!(matches!(err, DashboardError::MissingField(_)));
    }
}
