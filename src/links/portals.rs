//! Carrier portals: built-ins plus user-added portals.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::normalize_url;
use crate::error::{DashboardError, Result};
use crate::store::{self, keys, BundleKind, StateStore};

pub const DEFAULT_PORTAL_ICON: &str = "fa-solid fa-building";

fn default_icon() -> String {
    DEFAULT_PORTAL_ICON.to_string()
}

fn default_description(name: &str) -> String {
    format!("{} portal", name)
}

pub const PORTAL_BUNDLE: BundleKind = BundleKind {
    label: "portals",
    legacy_key: "portals",
    required_fields: &["id", "name", "url"],
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Portal {
    pub id: String,
    pub name: String,
    pub url: String,
    #[serde(default = "default_icon")]
    pub icon: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub custom: bool,
}

const BUILTIN_PORTALS: &[(&str, &str, &str, &str, &str)] = &[
    ("agency-matrix", "Agency Matrix", "https://agents.agencymatrix.com/#/", "fa-solid fa-building", "Primary agent portal"),
    ("nationwide", "Nationwide", "https://agentcenter.nationwide.com/home", "fa-solid fa-flag-usa", "Agent center portal"),
    ("national-general", "National General", "https://natgenagency.com/MainMenu.aspx", "fa-solid fa-globe", "Agency portal"),
    ("progressive", "Progressive", "https://www.foragentsonly.com/home/?Welcome=400", "fa-solid fa-chart-line", "For agents only portal"),
    ("foremost", "Foremost", "https://www.foremostagent.com/ia/portal/login", "fa-solid fa-house-user", "Agent portal login"),
    ("alamance", "Alamance", "https://alamance.britecore.com/agent/misc/ko_dashboard", "fa-solid fa-shield-halved", "BriteCore dashboard"),
    ("nc-grange", "NC Grange", "https://ncgm.com/", "fa-solid fa-tractor", "NC Grange portal"),
];

pub fn builtin_portals() -> Vec<Portal> {
    BUILTIN_PORTALS
        .iter()
        .map(|(id, name, url, icon, description)| Portal {
            id: id.to_string(),
            name: name.to_string(),
            url: url.to_string(),
            icon: icon.to_string(),
            description: description.to_string(),
            custom: false,
        })
        .collect()
}

/// Form data for a new portal
#[derive(Debug, Clone, Default)]
pub struct PortalInput {
    pub name: String,
    pub url: String,
    pub icon: Option<String>,
    pub description: Option<String>,
}

pub struct PortalDirectory {
    store: StateStore,
    custom: Vec<Portal>,
}

impl PortalDirectory {
    pub fn load(store: StateStore) -> Self {
        let custom = store.load_or_default(keys::CUSTOM_PORTALS);
        Self { store, custom }
    }

    pub fn custom(&self) -> &[Portal] {
        &self.custom
    }

    /// Built-ins and custom portals, sorted by name
    pub fn all(&self) -> Vec<Portal> {
        let mut portals = builtin_portals();
        portals.extend(self.custom.iter().cloned());
        portals.sort_by_key(|p| p.name.to_lowercase());
        portals
    }

    pub fn find(&self, id: &str) -> Result<Portal> {
        self.all()
            .into_iter()
            .find(|p| p.id == id)
            .ok_or_else(|| DashboardError::NotFound(format!("portal {}", id)))
    }

    pub fn add(&mut self, input: PortalInput) -> Result<Portal> {
        let name = input.name.trim();
        if name.is_empty() || input.url.trim().is_empty() {
            return Err(DashboardError::MissingField(
                "Portal name and URL".to_string(),
            ));
        }
        let url = normalize_url(&input.url)?;

        let icon = input
            .icon
            .map(|i| i.trim().to_string())
            .filter(|i| !i.is_empty())
            .unwrap_or_else(|| DEFAULT_PORTAL_ICON.to_string());
        let description = input
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| default_description(name));

        let portal = Portal {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.to_string(),
            url: url.to_string(),
            icon,
            description,
            custom: true,
        };
        let mut next = self.custom.clone();
        next.push(portal.clone());
        self.commit(next)?;

        tracing::info!(id = %portal.id, name = %portal.name, "Added portal");
        Ok(portal)
    }

    /// Remove a custom portal. Built-ins cannot be removed.
    pub fn remove(&mut self, id: &str) -> Result<Portal> {
        let index = self
            .custom
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| DashboardError::NotFound(format!("custom portal {}", id)))?;
        let mut next = self.custom.clone();
        let removed = next.remove(index);
        self.commit(next)?;
        Ok(removed)
    }

    /// Drop every custom portal
    pub fn reset(&mut self) -> Result<usize> {
        let count = self.custom.len();
        self.commit(Vec::new())?;
        Ok(count)
    }

    pub fn export(&self, now: DateTime<Utc>) -> Result<String> {
        store::export_bundle(&PORTAL_BUNDLE, &self.custom, now)
    }

    /// Replace the custom portals with an imported bundle
    pub fn import(&mut self, raw: &str) -> Result<usize> {
        let mut portals: Vec<Portal> = store::import_bundle(&PORTAL_BUNDLE, raw)?;
        for portal in &mut portals {
            portal.custom = true;
            if portal.icon.trim().is_empty() {
                portal.icon = default_icon();
            }
            if portal.description.trim().is_empty() {
                portal.description = default_description(&portal.name);
            }
        }
        self.commit(portals)?;
        Ok(self.custom.len())
    }

    /// Save `next` and adopt it. On a failed save the current list is kept.
    fn commit(&mut self, next: Vec<Portal>) -> Result<()> {
        self.store.save(keys::CUSTOM_PORTALS, &next)?;
        self.custom = next;
        Ok(())
    }
}
