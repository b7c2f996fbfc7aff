//! Preview, download, print, email handoff and copy for generated output.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use serde::Serialize;

use super::clipboard::{self, copy_with_fallback, ClipboardPayload, ClipboardStrategy, CopyFormat};
use super::filename::download_name;
use super::html::extract_body_inner;
use super::launcher::LaunchChain;
use crate::config::{self, AppConfig};
use crate::error::{DashboardError, Result};
use crate::workflow::GeneratedDocument;

const GMAIL_COMPOSE_URL: &str = "https://mail.google.com/mail/?view=cm&fs=1&su=";

/// Preview and print files older than this are removed when an adapter opens
const SCRATCH_MAX_AGE: Duration = Duration::from_secs(24 * 60 * 60);

const SCRATCH_KINDS: [&str; 2] = ["preview", "print"];

/// Result of an email handoff
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmailHandoff {
    pub copied_as: CopyFormat,
    pub compose_url: String,
}

pub struct ExportAdapter {
    output_dir: PathBuf,
    preview_dir: PathBuf,
    launcher: LaunchChain,
    clipboard: Vec<Box<dyn ClipboardStrategy>>,
}

impl ExportAdapter {
    /// Adapter wired to the system clipboard and default handlers
    pub fn new(config: &AppConfig) -> Self {
        Self::with_platform(
            config.output_dir.clone(),
            config::preview_dir(),
            LaunchChain::system(),
            clipboard::system_strategies(),
        )
    }

    pub fn with_platform(
        output_dir: PathBuf,
        preview_dir: PathBuf,
        launcher: LaunchChain,
        clipboard: Vec<Box<dyn ClipboardStrategy>>,
    ) -> Self {
        match prune_scratch(&preview_dir, SCRATCH_MAX_AGE) {
            Ok(0) => {}
            Ok(removed) => tracing::debug!(removed, "Pruned old preview files"),
            Err(e) => tracing::warn!(error = %e, "Failed to prune preview files"),
        }
        Self {
            output_dir,
            preview_dir,
            launcher,
            clipboard,
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Write `<sanitized subject>.html` into the output directory
    pub fn download(&self, doc: &GeneratedDocument, default_name: &str) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir)?;
        let path = self.output_dir.join(download_name(&doc.subject, default_name));
        fs::write(&path, &doc.body)?;
        tracing::info!(path = %path.display(), "Saved document");
        Ok(path)
    }

    /// Write a raw text or JSON artifact next to downloads
    pub fn save_file(&self, file_name: &str, contents: &str) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir)?;
        let path = self.output_dir.join(file_name);
        fs::write(&path, contents)?;
        tracing::info!(path = %path.display(), bytes = contents.len(), "Saved file");
        Ok(path)
    }

    /// Render in the system browser from a private preview file
    pub fn preview(&self, doc: &GeneratedDocument) -> Result<PathBuf> {
        let path = self.write_scratch("preview", &doc.body)?;
        self.launcher.open(&path.to_string_lossy())?;
        Ok(path)
    }

    /// Open the document in a new browser context for printing
    pub fn print(&self, doc: &GeneratedDocument) -> Result<PathBuf> {
        let path = self.write_scratch("print", &doc.body)?;
        self.launcher
            .open(&path.to_string_lossy())
            .map_err(|_| DashboardError::PopupBlocked)?;
        Ok(path)
    }

    /// Copy the body to the clipboard, then open a Gmail draft with the subject.
    /// Nothing is opened when every clipboard strategy fails.
    pub fn email_handoff(&self, doc: &GeneratedDocument) -> Result<EmailHandoff> {
        let payload = ClipboardPayload {
            html: Some(extract_body_inner(&doc.body).to_string()),
            text: doc.body.clone(),
        };
        let copied_as = copy_with_fallback(&self.clipboard, &payload)?;

        let compose_url = format!("{}{}", GMAIL_COMPOSE_URL, urlencoding::encode(&doc.subject));
        self.launcher.open(&compose_url)?;

        Ok(EmailHandoff {
            copied_as,
            compose_url,
        })
    }

    /// Plain-text copy of generated text
    pub fn copy_text(&self, text: &str) -> Result<()> {
        copy_with_fallback(&self.clipboard, &ClipboardPayload::plain(text)).map(|_| ())
    }

    pub fn open_url(&self, url: &str) -> Result<()> {
        self.launcher.open(url)
    }

    fn write_scratch(&self, kind: &str, body: &str) -> Result<PathBuf> {
        fs::create_dir_all(&self.preview_dir)?;
        let path = self
            .preview_dir
            .join(format!("{}-{}.html", kind, uuid::Uuid::new_v4()));
        fs::write(&path, body)?;
        Ok(path)
    }
}

fn is_scratch_file(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    name.ends_with(".html")
        && SCRATCH_KINDS
            .iter()
            .any(|kind| name.strip_prefix(kind).is_some_and(|rest| rest.starts_with('-')))
}

/// Remove preview/print files last modified more than `max_age` ago.
/// Returns how many were removed; a missing directory counts as empty.
fn prune_scratch(dir: &Path, max_age: Duration) -> Result<usize> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
        Err(e) => return Err(e.into()),
    };

    let now = SystemTime::now();
    let mut removed = 0;
    for entry in entries {
        let path = entry?.path();
        if !path.is_file() || !is_scratch_file(&path) {
            continue;
        }
        let age = fs::metadata(&path)?
            .modified()
            .ok()
            .and_then(|modified| now.duration_since(modified).ok())
            .unwrap_or_default();
        if age >= max_age {
            fs::remove_file(&path)?;
            removed += 1;
        }
    }
    Ok(removed)
}
