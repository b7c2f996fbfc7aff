//! Context snippets appended to document-styler prompts.
//!
//! Carrier contexts are built in. Custom snippets are user-defined and
//! persisted under `aiCustomContexts`; they are created and deleted but never
//! edited in place.

use serde::{Deserialize, Serialize};

use crate::error::{DashboardError, Result};
use crate::store::{keys, StateStore};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextSnippet {
    pub id: String,
    pub name: String,
    pub text: String,
    #[serde(skip)]
    pub builtin: bool,
}

impl ContextSnippet {
    /// Text appended to the prompt while this snippet is active
    pub fn prompt_block(&self) -> String {
        if self.builtin {
            self.text.clone()
        } else {
            format!("\n\nContext: {}\n{}", self.name, self.text)
        }
    }
}

const CARRIER_CONTEXTS: &[(&str, &str, &str)] = &[
    (
        "nationwide",
        "Nationwide",
        "\n\nCarrier Context: Nationwide Insurance\n- On Your Side® commitment\n- Vanishing deductible options\n- Brand New Belongings®\n- Accident forgiveness\n- SmartRide® discount program",
    ),
    (
        "progressive",
        "Progressive",
        "\n\nCarrier Context: Progressive Insurance\n- Name Your Price® tool\n- Snapshot® program\n- Bundle discounts\n- 24/7 claims service\n- Gap coverage available",
    ),
    (
        "alamance",
        "Alamance",
        "\n\nCarrier Context: Alamance Insurance\n- North Carolina mutual company\n- Focus on homeowners and farm insurance\n- Local claims handling\n- Competitive rates for rural properties",
    ),
    (
        "foremost",
        "Foremost",
        "\n\nCarrier Context: Foremost Insurance\n- Specializes in manufactured/mobile homes\n- Vacant property coverage\n- Seasonal homes\n- Landlord/rental property options",
    ),
];

/// The four built-in carrier contexts
pub fn carrier_contexts() -> Vec<ContextSnippet> {
    CARRIER_CONTEXTS
        .iter()
        .map(|(id, name, text)| ContextSnippet {
            id: id.to_string(),
            name: name.to_string(),
            text: text.to_string(),
            builtin: true,
        })
        .collect()
}

/// Built-in and custom snippets backed by the state store
pub struct ContextLibrary {
    store: StateStore,
    custom: Vec<ContextSnippet>,
}

impl ContextLibrary {
    pub fn load(store: StateStore) -> Self {
        let custom = store.load_or_default(keys::CUSTOM_CONTEXTS);
        Self { store, custom }
    }

    pub fn custom(&self) -> &[ContextSnippet] {
        &self.custom
    }

    /// Carrier contexts followed by custom snippets
    pub fn available(&self) -> Vec<ContextSnippet> {
        let mut all = carrier_contexts();
        all.extend(self.custom.iter().cloned());
        all
    }

    /// Create a custom snippet. Name and text are trimmed and required.
    pub fn add(&mut self, name: &str, text: &str) -> Result<ContextSnippet> {
        let name = name.trim();
        let text = text.trim();
        if name.is_empty() {
            return Err(DashboardError::MissingField("Context name".to_string()));
        }
        if text.is_empty() {
            return Err(DashboardError::MissingField("Context text".to_string()));
        }

        let snippet = ContextSnippet {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.to_string(),
            text: text.to_string(),
            builtin: false,
        };
        let mut next = self.custom.clone();
        next.push(snippet.clone());
        self.commit(next)?;

        tracing::info!(id = %snippet.id, "Added custom context");
        Ok(snippet)
    }

    /// Delete a custom snippet by id
    pub fn delete(&mut self, id: &str) -> Result<ContextSnippet> {
        let index = self
            .custom
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| DashboardError::NotFound(format!("context {}", id)))?;
        let mut next = self.custom.clone();
        let removed = next.remove(index);
        self.commit(next)?;
        Ok(removed)
    }

    /// Save `next` and adopt it. On a failed save the current list is kept.
    fn commit(&mut self, next: Vec<ContextSnippet>) -> Result<()> {
        self.store.save(keys::CUSTOM_CONTEXTS, &next)?;
        self.custom = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_blocks() {
        let carriers = carrier_contexts();
        assert_eq!(carriers.len(), 4);
        assert!(carriers[0]
            .prompt_block()
            .starts_with("\n\nCarrier Context: Nationwide Insurance"));

        let custom = ContextSnippet {
            id: "1".into(),
            name: "Flood".into(),
            text: "Zone AE".into(),
            builtin: false,
        };
        assert_eq!(custom.prompt_block(), "\n\nContext: Flood\nZone AE");
    }

    #[test]
    fn test_add_persists_and_delete_removes() {
        let dir = TempDir::new().unwrap();
        let store = StateStore::new(dir.path()).unwrap();

        let mut library = ContextLibrary::load(store.clone());
        let snippet = library.add("  Flood  ", " Zone AE ").unwrap();
        assert_eq!(snippet.name, "Flood");
        assert_eq!(snippet.text, "Zone AE");

        let reloaded = ContextLibrary::load(store.clone());
        assert_eq!(reloaded.custom().len(), 1);
        assert!(!reloaded.custom()[0].builtin);
        assert_eq!(reloaded.available().len(), 5);

        library.delete(&snippet.id).unwrap();
        assert!(ContextLibrary::load(store).custom().is_empty());
    }

    #[test]
    fn test_add_requires_name_and_text() {
        let dir = TempDir::new().unwrap();
        let mut library = ContextLibrary::load(StateStore::new(dir.path()).unwrap());
        assert!(matches!(
            library.add(" ", "text"),
            Err(DashboardError::MissingField(_))
        ));
        assert!(matches!(
            library.add("name", ""),
            Err(DashboardError::MissingField(_))
        ));
        assert!(matches!(
            library.delete("missing"),
            Err(DashboardError::NotFound(_))
        ));
    }

    #[test]
    fn test_failed_save_keeps_snippets() {
        let dir = TempDir::new().unwrap();
        let store = StateStore::new(dir.path()).unwrap();
        let mut library = ContextLibrary::load(store.clone());
        let kept = library.add("Umbrella", "Quote a $1M umbrella.").unwrap();

        crate::store::state_store::block_key(&store, keys::CUSTOM_CONTEXTS);

        assert!(library.add("Flood", "Mention flood zones.").is_err());
        assert!(library.delete(&kept.id).is_err());
        assert_eq!(library.custom(), &[kept]);
    }
}
