//! Application configuration
//!
//! Resolved once at startup from the environment (after `.env` is loaded)
//! with platform defaults for the storage locations.

use std::path::PathBuf;

/// Default Gemini model for every panel
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Default Gemini REST endpoint
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

const APP_DIR: &str = "customer-matrix";

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Model identifier sent with each request
    pub model: String,
    /// Base URL for the generative API
    pub base_url: String,
    /// Directory holding the persisted key/value state
    pub state_dir: PathBuf,
    /// Directory where downloads are written
    pub output_dir: PathBuf,
}

impl AppConfig {
    /// Build config from environment variables with defaults
    pub fn from_env() -> Self {
        let model = std::env::var("CUSTOMER_MATRIX_MODEL")
            .ok()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let base_url = std::env::var("CUSTOMER_MATRIX_API_BASE")
            .ok()
            .filter(|u| !u.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());

        let state_dir = std::env::var_os("CUSTOMER_MATRIX_STATE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(default_state_dir);

        let output_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));

        Self {
            model,
            base_url: base_url.trim_end_matches('/').to_string(),
            state_dir,
            output_dir,
        }
    }

    /// Config rooted in a custom directory (for testing)
    pub fn with_dirs(state_dir: PathBuf, output_dir: PathBuf) -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_API_BASE.to_string(),
            state_dir,
            output_dir,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

/// Application directory under the platform config dir (~/.config/customer-matrix/)
pub fn app_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

fn default_state_dir() -> PathBuf {
    app_config_dir().join("state")
}

/// Directory for preview and print files
pub fn preview_dir() -> PathBuf {
    std::env::temp_dir().join(APP_DIR).join("preview")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_dirs_uses_defaults() {
        let cfg = AppConfig::with_dirs(PathBuf::from("/tmp/a"), PathBuf::from("/tmp/b"));
        assert_eq!(cfg.model, DEFAULT_MODEL);
        assert_eq!(cfg.base_url, DEFAULT_API_BASE);
        assert_eq!(cfg.state_dir, PathBuf::from("/tmp/a"));
    }

    #[test]
    fn test_app_config_dir_suffix() {
        assert!(app_config_dir().ends_with("customer-matrix"));
    }
}
