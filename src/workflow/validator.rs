//! Reply validation: parse, check required fields, deserialize.
//!
//! No partial results: a reply either satisfies the shape or the whole call
//! fails with `MalformedResponse`.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::shape::ResponseShape;
use crate::ai::gemini::utils::extract_json_object;
use crate::error::{DashboardError, Result};

/// A generated HTML document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedDocument {
    pub subject: String,
    #[serde(rename = "htmlBody")]
    pub body: String,
}

/// Parse a raw reply into a JSON object, stripping a markdown fence if present
pub fn parse_reply(raw: &str) -> Result<Map<String, Value>> {
    let value = match serde_json::from_str::<Value>(raw.trim()) {
        Ok(value) => value,
        Err(_) => {
            let extracted = extract_json_object(raw).ok_or(DashboardError::MalformedResponse)?;
            serde_json::from_str(&extracted).map_err(|_| DashboardError::MalformedResponse)?
        }
    };

    match value {
        Value::Object(map) => Ok(map),
        _ => Err(DashboardError::MalformedResponse),
    }
}

fn is_present(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.trim().is_empty(),
        Some(_) => true,
    }
}

/// Check that every enforced field is present and non-empty
pub fn check_required(object: &Map<String, Value>, shape: &ResponseShape) -> Result<()> {
    for field in &shape.enforced {
        if !is_present(object.get(*field)) {
            tracing::warn!(field, "Reply missing required field");
            return Err(DashboardError::MalformedResponse);
        }
    }
    Ok(())
}

/// Full validation of a raw reply against `shape`
pub fn validate<T: DeserializeOwned>(raw: &str, shape: &ResponseShape) -> Result<T> {
    let object = parse_reply(raw)?;
    check_required(&object, shape)?;
    serde_json::from_value(Value::Object(object)).map_err(|e| {
        tracing::warn!(error = %e, "Reply did not deserialize");
        DashboardError::MalformedResponse
    })
}
