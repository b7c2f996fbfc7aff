//! Quick-access favorites.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{host_of, normalize_url};
use crate::error::{DashboardError, Result};
use crate::store::{self, keys, BundleKind, StateStore};

pub const FAVORITE_BUNDLE: BundleKind = BundleKind {
    label: "favorites",
    legacy_key: "favorites",
    required_fields: &["id", "name", "url"],
};

pub const FAVORITES_EXPORT_FILE: &str = "favorites-export.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Favorite {
    pub id: String,
    pub name: String,
    pub url: String,
    pub description: String,
}

/// Icon class for a favorite, picked from its host
pub fn site_icon(url: &str) -> &'static str {
    let host = host_of(url).to_lowercase();
    if host.contains("agencymatrix") {
        "fa-shield-halved"
    } else if host.contains("nationwide") {
        "fa-flag-usa"
    } else if host.contains("progressive") {
        "fa-chart-line"
    } else if host.contains("zillow") {
        "fa-house"
    } else if host.contains("claude.ai") {
        "fa-robot"
    } else {
        "fa-link"
    }
}

pub struct FavoriteList {
    store: StateStore,
    items: Vec<Favorite>,
}

impl FavoriteList {
    pub fn load(store: StateStore) -> Self {
        let items = store.load_or_default(keys::FAVORITES);
        Self { store, items }
    }

    pub fn items(&self) -> &[Favorite] {
        &self.items
    }

    pub fn find(&self, id: &str) -> Result<&Favorite> {
        self.items
            .iter()
            .find(|f| f.id == id)
            .ok_or_else(|| DashboardError::NotFound(format!("favorite {}", id)))
    }

    /// Append a favorite. The description is the URL's host.
    pub fn add(&mut self, name: &str, url: &str) -> Result<Favorite> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DashboardError::MissingField("Favorite name".to_string()));
        }
        if url.trim().is_empty() {
            return Err(DashboardError::MissingField("URL".to_string()));
        }
        let url = normalize_url(url)?;

        let favorite = Favorite {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.to_string(),
            description: url.host_str().unwrap_or(url.as_str()).to_string(),
            url: url.to_string(),
        };
        let mut next = self.items.clone();
        next.push(favorite.clone());
        self.commit(next)?;
        Ok(favorite)
    }

    pub fn remove(&mut self, id: &str) -> Result<Favorite> {
        let index = self
            .items
            .iter()
            .position(|f| f.id == id)
            .ok_or_else(|| DashboardError::NotFound(format!("favorite {}", id)))?;
        let mut next = self.items.clone();
        let removed = next.remove(index);
        self.commit(next)?;
        Ok(removed)
    }

    pub fn export(&self, now: DateTime<Utc>) -> Result<String> {
        store::export_bundle(&FAVORITE_BUNDLE, &self.items, now)
    }

    pub fn import(&mut self, raw: &str) -> Result<usize> {
        let items = store::import_bundle(&FAVORITE_BUNDLE, raw)?;
        self.commit(items)?;
        Ok(self.items.len())
    }

    /// Save `next` and adopt it. On a failed save the current list is kept.
    fn commit(&mut self, next: Vec<Favorite>) -> Result<()> {
        self.store.save(keys::FAVORITES, &next)?;
        self.items = next;
        Ok(())
    }
}
