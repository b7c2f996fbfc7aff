//! PDF attachments sent inline with a generation request.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::path::Path;

use crate::error::{DashboardError, Result};

const PDF_MIME: &str = "application/pdf";
const PDF_MAGIC: &[u8] = b"%PDF";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub file_name: String,
    pub mime_type: String,
    /// Base64-encoded file content
    pub data: String,
}

impl Attachment {
    /// Read and validate a PDF from disk
    pub fn from_path(path: &Path) -> Result<Self> {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());

        check_mime(&file_name)?;
        let bytes = std::fs::read(path)?;
        Self::from_bytes(&file_name, &bytes)
    }

    /// Validate in-memory bytes as a PDF
    pub fn from_bytes(file_name: &str, bytes: &[u8]) -> Result<Self> {
        check_mime(file_name)?;
        if !bytes.starts_with(PDF_MAGIC) {
            return Err(DashboardError::InvalidFile(file_name.to_string()));
        }

        tracing::debug!(file_name, size = bytes.len(), "Attached PDF");
        Ok(Self {
            file_name: file_name.to_string(),
            mime_type: PDF_MIME.to_string(),
            data: STANDARD.encode(bytes),
        })
    }

    /// File name without a trailing `.pdf`
    pub fn stem(&self) -> &str {
        let name = self.file_name.as_str();
        match name.len().checked_sub(4) {
            Some(cut) if name.is_char_boundary(cut) && name[cut..].eq_ignore_ascii_case(".pdf") => {
                &name[..cut]
            }
            _ => name,
        }
    }
}

fn check_mime(file_name: &str) -> Result<()> {
    let guessed = mime_guess::from_path(file_name).first_or_octet_stream();
    if guessed.essence_str() != PDF_MIME {
        return Err(DashboardError::InvalidFile(file_name.to_string()));
    }
    Ok(())
}
