//! JSON export/import bundles for tasks, portals and favorites.
//!
//! Exports are always `{ "items": [...], "exportDate": "<rfc3339>" }`.
//! Imports also accept a bare array and the older wrapped forms
//! (`{ "tasks": [...] }`, `{ "favorites": [...] }`, `{ "portals": [...] }`).

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::{DashboardError, Result};

#[derive(Serialize)]
struct Bundle<'a, T> {
    items: &'a [T],
    #[serde(rename = "exportDate")]
    export_date: String,
}

/// Describes one kind of bundle
#[derive(Debug, Clone, Copy)]
pub struct BundleKind {
    /// Plural noun used in notices ("tasks")
    pub label: &'static str,
    /// Key used by older wrapped exports
    pub legacy_key: &'static str,
    /// Fields the first imported item must carry
    pub required_fields: &'static [&'static str],
}

/// Serialize `items` as an export bundle. Empty lists are rejected.
pub fn export_bundle<T: Serialize>(
    kind: &BundleKind,
    items: &[T],
    now: DateTime<Utc>,
) -> Result<String> {
    if items.is_empty() {
        return Err(DashboardError::NothingToExport(kind.label.to_string()));
    }

    let bundle = Bundle {
        items,
        export_date: now.to_rfc3339(),
    };
    Ok(serde_json::to_string_pretty(&bundle)?)
}

/// Parse an import file into a list that replaces the current one
pub fn import_bundle<T: DeserializeOwned>(kind: &BundleKind, raw: &str) -> Result<Vec<T>> {
    let data: Value = serde_json::from_str(raw)
        .map_err(|e| DashboardError::InvalidBundle(format!("not valid JSON ({})", e)))?;

    let items = match data {
        Value::Array(items) => items,
        Value::Object(mut map) => match map
            .remove("items")
            .or_else(|| map.remove(kind.legacy_key))
        {
            Some(Value::Array(items)) => items,
            _ => {
                return Err(DashboardError::InvalidBundle(format!(
                    "no {} list found",
                    kind.label
                )))
            }
        },
        _ => {
            return Err(DashboardError::InvalidBundle(
                "expected an object or array".to_string(),
            ))
        }
    };

    if let Some(first) = items.first() {
        for field in kind.required_fields {
            let present = first
                .get(*field)
                .map(|v| !v.is_null() && v.as_str().map_or(true, |s| !s.is_empty()))
                .unwrap_or(false);
            if !present {
                return Err(DashboardError::InvalidBundle(format!(
                    "{} entries must have '{}'",
                    kind.label, field
                )));
            }
        }
    }

    let parsed: Vec<T> = serde_json::from_value(Value::Array(items))
        .map_err(|e| DashboardError::InvalidBundle(e.to_string()))?;

    tracing::info!(kind = kind.label, count = parsed.len(), "Imported bundle");
    Ok(parsed)
}
