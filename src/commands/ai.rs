//! AI panel commands and document delivery.

use std::path::{Path, PathBuf};

use chrono::Local;
use serde::Serialize;

use super::{notify, DashboardState, Notice};
use crate::ai::prompts::{PromptTemplate, PROMPT_TEMPLATES};
use crate::contexts::{ContextLibrary, ContextSnippet};
use crate::error::{DashboardError, Result};
use crate::export::CopyFormat;
use crate::tasks::{Task, TaskMatrix};
use crate::workflow::panels::{
    AssistAction, DocumentOutput, DocumentStyler, InsuranceType, NeedsAnalysis, PdfComparison,
    PropertyReport, QuoteProposal, TaskAssistant, TaskExtraction,
};
use crate::workflow::Attachment;

/// Inputs for the document styler
#[derive(Debug, Clone, Default)]
pub struct StyleRequest {
    pub text: String,
    pub template: Option<String>,
    pub contexts: Vec<String>,
    pub pdf: Option<PathBuf>,
}

/// What to do with a generated document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Delivery {
    Download,
    Preview,
    Print,
    Email,
}

fn attach(path: Option<&Path>) -> Result<Option<Attachment>> {
    path.map(Attachment::from_path).transpose()
}

pub fn list_templates() -> &'static [PromptTemplate] {
    PROMPT_TEMPLATES
}

pub fn list_contexts(state: &DashboardState) -> Vec<ContextSnippet> {
    ContextLibrary::load(state.store.clone()).available()
}

pub fn add_context(state: &DashboardState, name: &str, text: &str) -> Notice {
    let mut library = ContextLibrary::load(state.store.clone());
    notify(library.add(name, text), |_| Notice::success("Custom context saved!"))
}

pub fn delete_context(state: &DashboardState, id: &str) -> Notice {
    let mut library = ContextLibrary::load(state.store.clone());
    notify(library.delete(id), |_| Notice::success("Context removed."))
}

pub async fn style_document(
    state: &DashboardState,
    request: StyleRequest,
) -> std::result::Result<DocumentOutput, String> {
    let library = ContextLibrary::load(state.store.clone());
    let mut styler = DocumentStyler::new(state.panels.styler.clone(), library);

    let builder = styler.builder_mut();
    builder.set_free_text(request.text);
    if let Some(key) = request.template.as_deref() {
        builder.toggle_template(key)?;
    }
    if let Some(attachment) = attach(request.pdf.as_deref())? {
        builder.attach(attachment);
    }
    for id in &request.contexts {
        styler.toggle_context(id)?;
    }

    Ok(styler.generate().await?)
}

pub async fn parse_pdfs(
    state: &DashboardState,
    primary: Option<&Path>,
    secondary: Option<&Path>,
    instructions: &str,
) -> std::result::Result<DocumentOutput, String> {
    let primary = attach(primary)?;
    let secondary = attach(secondary)?;
    let panel = PdfComparison::new(state.panels.pdf.clone());
    Ok(panel.generate(primary, secondary, instructions).await?)
}

pub async fn generate_quote_proposal(
    state: &DashboardState,
    notes: &str,
) -> std::result::Result<DocumentOutput, String> {
    let panel = QuoteProposal::new(state.panels.quote.clone());
    Ok(panel.generate(notes).await?)
}

fn parse_types(types: &[String]) -> Result<Vec<InsuranceType>> {
    types.iter().map(|t| t.parse()).collect()
}

pub async fn generate_needs_analysis(
    state: &DashboardState,
    types: &[String],
    notes: &str,
) -> std::result::Result<DocumentOutput, String> {
    let types = parse_types(types)?;
    let panel = NeedsAnalysis::new(state.panels.needs.clone());
    Ok(panel.generate(&types, notes).await?)
}

pub async fn stream_questionnaire(
    state: &DashboardState,
    types: &[String],
    notes: &str,
    on_chunk: &mut (dyn for<'c> FnMut(&'c str) + Send),
) -> std::result::Result<String, String> {
    let types = parse_types(types)?;
    let panel = NeedsAnalysis::new(state.panels.needs.clone());
    Ok(panel.stream_questionnaire(&types, notes, on_chunk).await?)
}

pub async fn generate_property_report(
    state: &DashboardState,
    address: &str,
) -> std::result::Result<DocumentOutput, String> {
    let panel = PropertyReport::new(state.panels.property.clone());
    Ok(panel.generate(address).await?)
}

pub async fn extract_task(
    state: &DashboardState,
    text: &str,
    pdf: Option<&Path>,
) -> std::result::Result<Task, String> {
    let attachment = attach(pdf)?;
    let mut matrix = TaskMatrix::load(state.store.clone());
    let panel = TaskExtraction::new(state.panels.extraction.clone());
    Ok(panel
        .extract_into(&mut matrix, text, attachment, Local::now().date_naive())
        .await?)
}

pub async fn run_task_assistant(
    state: &DashboardState,
    task_id: &str,
    action: &AssistAction,
) -> std::result::Result<String, String> {
    let matrix = TaskMatrix::load(state.store.clone());
    let task = matrix.get(task_id)?.clone();
    let panel = TaskAssistant::new(state.panels.assistant.clone());
    Ok(panel.run(&task, action).await?)
}

pub fn add_assistant_notes(
    state: &DashboardState,
    task_id: &str,
    action: &AssistAction,
    content: &str,
) -> Notice {
    let mut matrix = TaskMatrix::load(state.store.clone());
    let panel = TaskAssistant::new(state.panels.assistant.clone());
    notify(
        panel.add_to_notes(&mut matrix, task_id, action, content),
        |_| Notice::success("AI content added to notes."),
    )
}

/// Plain-text copy of assistant output or a questionnaire
pub fn copy_text(state: &DashboardState, text: &str) -> Notice {
    if text.trim().is_empty() {
        return Notice::warning("Nothing to copy.");
    }
    notify(state.export.copy_text(text), |_| {
        Notice::success("Content copied to clipboard!")
    })
}

/// Hand a generated document to the export adapter
pub fn deliver(state: &DashboardState, output: &DocumentOutput, delivery: Delivery) -> Notice {
    let doc = &output.document;
    match delivery {
        Delivery::Download => notify(state.export.download(doc, &output.default_name), |path| {
            Notice::success(format!("Saved {}", path.display()))
        }),
        Delivery::Preview => notify(state.export.preview(doc), |_| {
            Notice::info("Preview opened in your browser.")
        }),
        Delivery::Print => notify(state.export.print(doc), |_| {
            Notice::info("Document opened for printing.")
        }),
        Delivery::Email => notify(state.export.email_handoff(doc), |handoff| {
            match handoff.copied_as {
                CopyFormat::RichHtml => {
                    Notice::success("Styled document copied! Paste it into the Gmail window.")
                }
                CopyFormat::PlainText => Notice::info(
                    "Copied document as HTML code. Paste it into the Gmail window.",
                ),
            }
        }),
    }
}

/// Success notice for a finished panel run
pub fn generated_notice(output: &DocumentOutput) -> Notice {
    match output.default_name.as_str() {
        "quote_proposal" => Notice::success("Quote proposal generated successfully!"),
        "property_report" => Notice::success("Property report generated successfully!"),
        "document" => Notice::success("Document styled successfully!"),
        _ => Notice::success("Document processed successfully!"),
    }
}

/// Reject a missing task before any request is built
pub fn require_task(state: &DashboardState, task_id: &str) -> Result<Task> {
    TaskMatrix::load(state.store.clone())
        .get(task_id)
        .cloned()
        .map_err(|_| DashboardError::NotFound(format!("task {}", task_id)))
}
