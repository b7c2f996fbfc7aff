//! Error taxonomy for the dashboard.
//!
//! Every failure a panel can hit maps to one variant here. The command layer
//! turns these into transient notices; nothing in this enum is fatal to the
//! process.

use thiserror::Error;

/// Severity of a user-visible notice
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Warning,
    Danger,
    Info,
}

#[derive(Debug, Error)]
pub enum DashboardError {
    // -- input validation (no network call attempted) --
    #[error("Please enter data or upload a PDF.")]
    NoInput,

    #[error("{0} is required.")]
    MissingField(String),

    #[error("Please select a PDF file. ({0})")]
    InvalidFile(String),

    #[error("Invalid URL provided: {0}")]
    InvalidUrl(String),

    #[error("API key does not look like a Gemini key: {0}")]
    InvalidApiKey(String),

    #[error("Unknown template: {0}")]
    UnknownTemplate(String),

    #[error("Unknown context: {0}")]
    UnknownContext(String),

    #[error("Could not determine county from address. Please include county name (e.g., \"Surry\").")]
    UnknownCounty,

    #[error("Invalid import file: {0}")]
    InvalidBundle(String),

    #[error("No {0} to export.")]
    NothingToExport(String),

    // -- credentials --
    #[error("API key not found.")]
    MissingCredential,

    // -- service / network --
    #[error("AI service error: {0}")]
    Service(String),

    #[error("Request failed: {0}")]
    Network(String),

    #[error("Content generation failed: Empty response from AI.")]
    EmptyResponse,

    // -- response shape --
    #[error("AI response did not match the required format.")]
    MalformedResponse,

    // -- platform degradations --
    #[error("Could not copy document automatically. Please copy manually.")]
    Clipboard,

    #[error("Could not open print window. Please check your system settings.")]
    PopupBlocked,

    #[error("Could not open {0}")]
    Launch(String),

    // -- everything else --
    #[error("A request is already in progress for this panel.")]
    Busy,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl DashboardError {
    /// Notice level used when this error is surfaced to the user
    pub fn level(&self) -> NoticeLevel {
        match self {
            Self::NoInput
            | Self::MissingField(_)
            | Self::InvalidFile(_)
            | Self::InvalidApiKey(_)
            | Self::UnknownTemplate(_)
            | Self::UnknownContext(_)
            | Self::NothingToExport(_)
            | Self::PopupBlocked
            | Self::Launch(_)
            | Self::Busy => NoticeLevel::Warning,
            Self::InvalidUrl(_)
            | Self::InvalidBundle(_)
            | Self::UnknownCounty
            | Self::MissingCredential
            | Self::Service(_)
            | Self::Network(_)
            | Self::EmptyResponse
            | Self::MalformedResponse
            | Self::Clipboard
            | Self::NotFound(_)
            | Self::Storage(_)
            | Self::Io(_)
            | Self::Json(_) => NoticeLevel::Danger,
        }
    }

    /// True for errors raised before any request reaches the AI service
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::NoInput
                | Self::MissingField(_)
                | Self::InvalidFile(_)
                | Self::InvalidUrl(_)
                | Self::InvalidApiKey(_)
                | Self::UnknownTemplate(_)
                | Self::UnknownContext(_)
                | Self::UnknownCounty
                | Self::InvalidBundle(_)
        )
    }
}

impl From<DashboardError> for String {
    fn from(err: DashboardError) -> Self {
        err.to_string()
    }
}

pub type Result<T> = std::result::Result<T, DashboardError>;
