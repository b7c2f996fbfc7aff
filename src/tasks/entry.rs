//! Task records as persisted under `taskMatrixTasks_v3`.

use chrono::{Local, TimeZone};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    /// Lenient parse for model output: unknown values become `Medium`
    pub fn from_loose(value: &str) -> Self {
        value.parse().unwrap_or_default()
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "high" => Ok(Priority::High),
            "medium" => Ok(Priority::Medium),
            "low" => Ok(Priority::Low),
            other => Err(format!("unknown priority '{}'", other)),
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommunicationKind {
    Call,
    Email,
    Note,
}

impl FromStr for CommunicationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "call" => Ok(CommunicationKind::Call),
            "email" => Ok(CommunicationKind::Email),
            "note" => Ok(CommunicationKind::Note),
            other => Err(format!("unknown communication type '{}'", other)),
        }
    }
}

impl fmt::Display for CommunicationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CommunicationKind::Call => "call",
            CommunicationKind::Email => "email",
            CommunicationKind::Note => "note",
        })
    }
}

/// One entry in a task's communication log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Communication {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: CommunicationKind,
    pub text: String,
    /// Unix milliseconds
    pub timestamp: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub completed: bool,
    /// Unix milliseconds
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub customer_name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub customer_value: Option<f64>,
    #[serde(default)]
    pub task_type: String,
    #[serde(default)]
    pub follow_up_date: Option<String>,
    #[serde(default)]
    pub carrier: String,
    #[serde(default)]
    pub policy_number: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub internal_notes: String,
    #[serde(default)]
    pub is_recurring: bool,
    #[serde(default)]
    pub communications: Vec<Communication>,
}

impl Task {
    /// New incomplete task built from form data
    pub fn from_draft(id: String, draft: TaskDraft, created_at: i64) -> Self {
        let mut task = Self {
            id,
            text: String::new(),
            due_date: None,
            priority: Priority::Medium,
            completed: false,
            created_at,
            customer_name: String::new(),
            phone: String::new(),
            email: String::new(),
            customer_value: None,
            task_type: String::new(),
            follow_up_date: None,
            carrier: String::new(),
            policy_number: String::new(),
            description: String::new(),
            internal_notes: String::new(),
            is_recurring: false,
            communications: Vec::new(),
        };
        task.apply_draft(draft);
        task
    }

    /// Overwrite the editable fields, keeping identity, status and log
    pub fn apply_draft(&mut self, draft: TaskDraft) {
        self.text = draft.text;
        self.due_date = draft.due_date;
        self.priority = draft.priority;
        self.customer_name = draft.customer_name;
        self.phone = draft.phone;
        self.email = draft.email;
        self.customer_value = draft.customer_value;
        self.task_type = draft.task_type;
        self.follow_up_date = draft.follow_up_date;
        self.carrier = draft.carrier;
        self.policy_number = draft.policy_number;
        self.description = draft.description;
        self.internal_notes = draft.internal_notes;
        self.is_recurring = draft.is_recurring;
    }

    /// Form data for editing this task
    pub fn to_draft(&self) -> TaskDraft {
        TaskDraft {
            text: self.text.clone(),
            due_date: self.due_date.clone(),
            priority: self.priority,
            customer_name: self.customer_name.clone(),
            phone: self.phone.clone(),
            email: self.email.clone(),
            customer_value: self.customer_value,
            task_type: if self.task_type.is_empty() {
                DEFAULT_TASK_TYPE.to_string()
            } else {
                self.task_type.clone()
            },
            follow_up_date: self.follow_up_date.clone(),
            carrier: self.carrier.clone(),
            policy_number: self.policy_number.clone(),
            description: self.description.clone(),
            internal_notes: self.internal_notes.clone(),
            is_recurring: self.is_recurring,
        }
    }

    /// Full task context handed to the task assistant
    pub fn assistant_context(&self) -> String {
        fn or_na(value: &str) -> &str {
            if value.trim().is_empty() {
                "N/A"
            } else {
                value
            }
        }

        let log = if self.communications.is_empty() {
            "N/A".to_string()
        } else {
            self.communications
                .iter()
                .map(|c| format!("{} on {}: {}", c.kind, short_date(c.timestamp), c.text))
                .collect::<Vec<_>>()
                .join("\n")
        };

        format!(
            "Task Title: {}\nCustomer Name: {}\nDue Date: {}\nPriority: {}\nTask Type: {}\nCarrier: {}\nPolicy #: {}\nDescription: {}\nInternal Notes: {}\nCommunication Log: {}",
            self.text,
            or_na(&self.customer_name),
            or_na(self.due_date.as_deref().unwrap_or("")),
            self.priority,
            or_na(&self.task_type),
            or_na(&self.carrier),
            or_na(&self.policy_number),
            or_na(&self.description),
            or_na(&self.internal_notes),
            log
        )
    }
}

fn short_date(millis: i64) -> String {
    Local
        .timestamp_millis_opt(millis)
        .single()
        .map(|dt| dt.format("%-m/%-d/%Y").to_string())
        .unwrap_or_else(|| "unknown date".to_string())
}

pub const DEFAULT_TASK_TYPE: &str = "Follow-up";

/// Editable task fields. `Default` is the blank form.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskDraft {
    pub text: String,
    pub due_date: Option<String>,
    pub priority: Priority,
    pub customer_name: String,
    pub phone: String,
    pub email: String,
    pub customer_value: Option<f64>,
    pub task_type: String,
    pub follow_up_date: Option<String>,
    pub carrier: String,
    pub policy_number: String,
    pub description: String,
    pub internal_notes: String,
    pub is_recurring: bool,
}

impl Default for TaskDraft {
    fn default() -> Self {
        Self {
            text: String::new(),
            due_date: None,
            priority: Priority::Medium,
            customer_name: String::new(),
            phone: String::new(),
            email: String::new(),
            customer_value: None,
            task_type: DEFAULT_TASK_TYPE.to_string(),
            follow_up_date: None,
            carrier: String::new(),
            policy_number: String::new(),
            description: String::new(),
            internal_notes: String::new(),
            is_recurring: false,
        }
    }
}

/// Task as returned by the extraction model. Every field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedTask {
    pub text: Option<String>,
    pub due_date: Option<String>,
    pub priority: Option<String>,
    pub customer_name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub customer_value: Option<f64>,
    pub task_type: Option<String>,
    pub follow_up_date: Option<String>,
    pub carrier: Option<String>,
    pub policy_number: Option<String>,
    pub description: Option<String>,
    pub internal_notes: Option<String>,
    pub is_recurring: Option<bool>,
}

impl ExtractedTask {
    /// Merge over the blank form; missing or blank fields keep their defaults
    pub fn into_draft(self) -> TaskDraft {
        fn pick(value: Option<String>, default: String) -> String {
            match value {
                Some(v) if !v.trim().is_empty() => v.trim().to_string(),
                _ => default,
            }
        }
        fn pick_opt(value: Option<String>) -> Option<String> {
            value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
        }

        let blank = TaskDraft::default();
        TaskDraft {
            text: pick(self.text, blank.text),
            due_date: pick_opt(self.due_date),
            priority: self
                .priority
                .as_deref()
                .map(Priority::from_loose)
                .unwrap_or(blank.priority),
            customer_name: pick(self.customer_name, blank.customer_name),
            phone: pick(self.phone, blank.phone),
            email: pick(self.email, blank.email),
            customer_value: self.customer_value,
            task_type: pick(self.task_type, blank.task_type),
            follow_up_date: pick_opt(self.follow_up_date),
            carrier: pick(self.carrier, blank.carrier),
            policy_number: pick(self.policy_number, blank.policy_number),
            description: pick(self.description, blank.description),
            internal_notes: pick(self.internal_notes, blank.internal_notes),
            is_recurring: self.is_recurring.unwrap_or(blank.is_recurring),
        }
    }
}
