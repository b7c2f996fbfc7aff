//! Theme and API key settings.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{notify, DashboardState, Notice};
use crate::ai::credentials::{validate_api_key_format, CredentialManager, GEMINI_PROVIDER};
use crate::store::keys;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        })
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(format!("unknown theme '{}'", other)),
        }
    }
}

pub fn get_theme(state: &DashboardState) -> Theme {
    state.store.load_or_default(keys::THEME)
}

pub fn set_theme(state: &DashboardState, theme: Theme) -> Result<Theme, String> {
    state.store.save(keys::THEME, &theme)?;
    Ok(theme)
}

pub fn toggle_theme(state: &DashboardState) -> Result<Theme, String> {
    set_theme(state, get_theme(state).toggled())
}

/// Key status for the configured provider
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderStatus {
    pub provider: String,
    pub configured: bool,
}

pub fn set_api_key(api_key: &str) -> Notice {
    let result = validate_api_key_format(api_key)
        .and_then(|_| CredentialManager::store_api_key(GEMINI_PROVIDER, api_key));
    notify(result, |_| Notice::success("API key saved."))
}

pub fn delete_api_key() -> Notice {
    notify(CredentialManager::delete_api_key(GEMINI_PROVIDER), |_| {
        Notice::info("API key removed.")
    })
}

pub fn get_configured_providers() -> Vec<ProviderStatus> {
    vec![ProviderStatus {
        provider: GEMINI_PROVIDER.to_string(),
        configured: CredentialManager::has_api_key(GEMINI_PROVIDER),
    }]
}
