//! Rendering and export of generated documents.

pub mod adapter;
pub mod clipboard;
pub mod filename;
pub mod html;
pub mod launcher;

pub use adapter::{EmailHandoff, ExportAdapter};
pub use clipboard::{ClipboardPayload, ClipboardStrategy, CopyFormat};
pub use filename::{download_name, sanitize_subject};
pub use html::{extract_body_inner, inject_sources};
pub use launcher::{LaunchChain, Launcher};
