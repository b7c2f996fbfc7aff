//! Prompt builder for the document styler.
//!
//! Form state is kept as raw parts (free text, template key, active context
//! ids) and the request text is derived from them on demand, so toggling a
//! template or context never edits what the user typed.

use super::{Attachment, PromptSpec};
use crate::ai::prompts::{self, PromptTemplate};
use crate::contexts::ContextSnippet;
use crate::error::{DashboardError, Result};

#[derive(Debug, Clone, Default)]
pub struct PromptBuilder {
    free_text: String,
    template: Option<&'static PromptTemplate>,
    /// Active context ids in activation order
    active_contexts: Vec<String>,
    attachment: Option<Attachment>,
}

impl PromptBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn free_text(&self) -> &str {
        &self.free_text
    }

    pub fn set_free_text(&mut self, text: impl Into<String>) {
        self.free_text = text.into();
    }

    pub fn template(&self) -> Option<&'static PromptTemplate> {
        self.template
    }

    /// Select a template, or deselect it if it is already active.
    /// Returns whether a template is active afterwards.
    pub fn toggle_template(&mut self, key: &str) -> Result<bool> {
        let template = prompts::find_template(key)
            .ok_or_else(|| DashboardError::UnknownTemplate(key.to_string()))?;

        if self.template.map(|t| t.key) == Some(template.key) {
            self.template = None;
            Ok(false)
        } else {
            self.template = Some(template);
            Ok(true)
        }
    }

    pub fn clear_template(&mut self) {
        self.template = None;
    }

    pub fn active_contexts(&self) -> &[String] {
        &self.active_contexts
    }

    /// Flip a context on or off. Returns whether it is active afterwards.
    pub fn toggle_context(&mut self, id: &str, available: &[ContextSnippet]) -> Result<bool> {
        if !available.iter().any(|c| c.id == id) {
            return Err(DashboardError::UnknownContext(id.to_string()));
        }

        if let Some(pos) = self.active_contexts.iter().position(|a| a == id) {
            self.active_contexts.remove(pos);
            Ok(false)
        } else {
            self.active_contexts.push(id.to_string());
            Ok(true)
        }
    }

    /// Drop a context that no longer exists
    pub fn forget_context(&mut self, id: &str) {
        self.active_contexts.retain(|a| a != id);
    }

    pub fn attach(&mut self, attachment: Attachment) {
        self.attachment = Some(attachment);
    }

    pub fn clear_attachment(&mut self) {
        self.attachment = None;
    }

    pub fn attachment(&self) -> Option<&Attachment> {
        self.attachment.as_ref()
    }

    /// The user's request: free text, then active context blocks, wrapped in
    /// the selected template's scaffold
    pub fn compose_request(&self, available: &[ContextSnippet]) -> String {
        let mut request = self.free_text.clone();
        for id in &self.active_contexts {
            if let Some(snippet) = available.iter().find(|c| &c.id == id) {
                request.push_str(&snippet.prompt_block());
            }
        }

        match self.template {
            Some(template) => prompts::wrap_in_template(template, &request),
            None => request,
        }
    }

    /// Validate input and produce the spec for the document styler
    pub fn build(&self, available: &[ContextSnippet]) -> Result<PromptSpec> {
        if self.free_text.trim().is_empty() && self.attachment.is_none() {
            return Err(DashboardError::NoInput);
        }

        let request = self.compose_request(available);
        let instruction = prompts::build_document_prompt(&request, self.attachment.is_some());

        Ok(PromptSpec::document(instruction)
            .with_attachments(self.attachment.iter().cloned().collect()))
    }
}
