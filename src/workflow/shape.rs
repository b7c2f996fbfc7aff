//! Response shapes: the JSON object a panel expects back from the model.

use serde_json::{json, Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    String,
    Number,
    Boolean,
}

impl FieldKind {
    fn schema_type(self) -> &'static str {
        match self {
            FieldKind::String => "STRING",
            FieldKind::Number => "NUMBER",
            FieldKind::Boolean => "BOOLEAN",
        }
    }
}

#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub description: Option<&'static str>,
}

impl FieldSpec {
    const fn string(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::String,
            description: None,
        }
    }

    const fn described(name: &'static str, description: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::String,
            description: Some(description),
        }
    }
}

/// Declared schema plus the fields the validator enforces.
///
/// `required` is sent to the service. `enforced` is what a reply must carry
/// to be accepted; it can be looser than `required` (a task with a bad due
/// date is still a task).
#[derive(Debug, Clone)]
pub struct ResponseShape {
    pub fields: Vec<FieldSpec>,
    pub required: Vec<&'static str>,
    pub enforced: Vec<&'static str>,
}

impl ResponseShape {
    /// `{ subject, htmlBody }`, both required
    pub fn document() -> Self {
        Self {
            fields: vec![
                FieldSpec::described(
                    "subject",
                    "A compelling email subject line based on the document content (e.g., 'Your Homeowners Quote is Ready' or 'Important Update on Your Auto Policy').",
                ),
                FieldSpec::described(
                    "htmlBody",
                    "The complete, self-contained HTML code for the email body, styled for Gmail and mobile.",
                ),
            ],
            required: vec!["subject", "htmlBody"],
            enforced: vec!["subject", "htmlBody"],
        }
    }

    /// Structured task extracted from free text or a PDF
    pub fn task() -> Self {
        Self {
            fields: vec![
                FieldSpec::string("text"),
                FieldSpec::string("dueDate"),
                FieldSpec::string("priority"),
                FieldSpec::string("customerName"),
                FieldSpec::string("phone"),
                FieldSpec::string("email"),
                FieldSpec {
                    name: "customerValue",
                    kind: FieldKind::Number,
                    description: None,
                },
                FieldSpec::string("taskType"),
                FieldSpec::string("followUpDate"),
                FieldSpec::string("carrier"),
                FieldSpec::string("policyNumber"),
                FieldSpec::string("description"),
                FieldSpec::string("internalNotes"),
                FieldSpec {
                    name: "isRecurring",
                    kind: FieldKind::Boolean,
                    description: None,
                },
            ],
            required: vec!["text", "dueDate", "priority"],
            enforced: vec!["text"],
        }
    }

    /// Gemini `responseSchema` object
    pub fn to_schema(&self) -> Value {
        let mut properties = Map::new();
        for field in &self.fields {
            let mut prop = json!({ "type": field.kind.schema_type() });
            if let Some(description) = field.description {
                prop["description"] = Value::String(description.to_string());
            }
            properties.insert(field.name.to_string(), prop);
        }

        json!({
            "type": "OBJECT",
            "properties": properties,
            "required": self.required,
        })
    }
}
