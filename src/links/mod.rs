//! Launcher hub: insurance portals, favorites, search modes and quick actions.

pub mod favorites;
pub mod portals;
pub mod search;

pub use favorites::{site_icon, Favorite, FavoriteList, FAVORITE_BUNDLE};
pub use portals::{Portal, PortalDirectory, PortalInput, PORTAL_BUNDLE};
pub use search::{
    clients_folder_url, gis_lookup, search_url, GisTarget, QuickAction, SearchMode, QUICK_ACTIONS,
};

use url::Url;

use crate::error::{DashboardError, Result};

/// Trim, default to `https://` when no `http` prefix is present, and validate
pub fn normalize_url(raw: &str) -> Result<Url> {
    let trimmed = raw.trim();
    let candidate = if trimmed.starts_with("http") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    };

    Url::parse(&candidate).map_err(|_| DashboardError::InvalidUrl(trimmed.to_string()))
}

/// Host name of a URL, or the input itself when it does not parse
pub fn host_of(url: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
        .unwrap_or_else(|| url.to_string())
}
