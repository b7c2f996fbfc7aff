//! Dashboard panels, each a thin configuration of the generation workflow.
//!
//! A panel validates its own inputs, claims its in-flight guard, then hands a
//! [`PromptSpec`] to the shared workflow. Validation failures never reach the
//! backend and never claim the guard.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use chrono::{Local, NaiveDate};
use serde::Serialize;

use super::{
    run_generation_workflow, run_streaming_workflow, run_text_workflow, Attachment,
    GeneratedDocument, GenerativeBackend, InFlight, PromptBuilder, PromptSpec, ResponseShape,
    WebSource,
};
use crate::ai::prompts;
use crate::contexts::{ContextLibrary, ContextSnippet};
use crate::error::{DashboardError, Result};
use crate::export::inject_sources;
use crate::tasks::{ExtractedTask, Task, TaskMatrix};

pub const DOCUMENT_DEFAULT_NAME: &str = "document";
pub const COMPARISON_DEFAULT_NAME: &str = "document_comparison";
pub const QUOTE_DEFAULT_NAME: &str = "quote_proposal";
pub const NEEDS_ANALYSIS_DEFAULT_NAME: &str = "needs_analysis";
pub const PROPERTY_REPORT_DEFAULT_NAME: &str = "property_report";

/// A generated document plus what the export layer needs to save it
#[derive(Debug, Clone, Serialize)]
pub struct DocumentOutput {
    pub document: GeneratedDocument,
    pub sources: Vec<WebSource>,
    /// File stem used when the subject sanitizes to nothing
    pub default_name: String,
}

/// Shared backend handle plus a per-panel in-flight guard
#[derive(Clone)]
pub struct PanelRunner {
    backend: Arc<dyn GenerativeBackend>,
    in_flight: InFlight,
}

impl PanelRunner {
    pub fn new(backend: Arc<dyn GenerativeBackend>) -> Self {
        Self {
            backend,
            in_flight: InFlight::new(),
        }
    }

    /// A runner on the same backend with its own guard
    pub fn sibling(&self) -> Self {
        Self::new(self.backend.clone())
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.is_busy()
    }

    async fn document(&self, spec: PromptSpec, default_name: &str) -> Result<DocumentOutput> {
        let _ticket = self.in_flight.try_begin()?;
        let generated =
            run_generation_workflow::<GeneratedDocument, _>(self.backend.as_ref(), &spec).await?;
        Ok(DocumentOutput {
            document: generated.value,
            sources: generated.sources,
            default_name: default_name.to_string(),
        })
    }

    async fn structured<T: serde::de::DeserializeOwned>(&self, spec: PromptSpec) -> Result<T> {
        let _ticket = self.in_flight.try_begin()?;
        let generated = run_generation_workflow::<T, _>(self.backend.as_ref(), &spec).await?;
        Ok(generated.value)
    }

    async fn text(&self, spec: PromptSpec) -> Result<String> {
        let _ticket = self.in_flight.try_begin()?;
        run_text_workflow(self.backend.as_ref(), &spec).await
    }

    async fn stream(
        &self,
        spec: PromptSpec,
        on_chunk: &mut (dyn for<'c> FnMut(&'c str) + Send),
    ) -> Result<String> {
        let _ticket = self.in_flight.try_begin()?;
        run_streaming_workflow(self.backend.as_ref(), &spec, on_chunk).await
    }
}

// -- document styler --

/// Free text or PDF, optional template and contexts, to a branded email
pub struct DocumentStyler {
    runner: PanelRunner,
    builder: PromptBuilder,
    contexts: ContextLibrary,
}

impl DocumentStyler {
    pub fn new(runner: PanelRunner, contexts: ContextLibrary) -> Self {
        Self {
            runner,
            builder: PromptBuilder::new(),
            contexts,
        }
    }

    pub fn builder(&self) -> &PromptBuilder {
        &self.builder
    }

    pub fn builder_mut(&mut self) -> &mut PromptBuilder {
        &mut self.builder
    }

    pub fn contexts(&self) -> &ContextLibrary {
        &self.contexts
    }

    pub fn available_contexts(&self) -> Vec<ContextSnippet> {
        self.contexts.available()
    }

    pub fn toggle_context(&mut self, id: &str) -> Result<bool> {
        let available = self.contexts.available();
        self.builder.toggle_context(id, &available)
    }

    pub fn add_context(&mut self, name: &str, text: &str) -> Result<ContextSnippet> {
        self.contexts.add(name, text)
    }

    /// Delete a custom context and deactivate it
    pub fn delete_context(&mut self, id: &str) -> Result<ContextSnippet> {
        let removed = self.contexts.delete(id)?;
        self.builder.forget_context(id);
        Ok(removed)
    }

    /// The request text as it would be sent
    pub fn preview_request(&self) -> String {
        self.builder.compose_request(&self.contexts.available())
    }

    pub async fn generate(&self) -> Result<DocumentOutput> {
        let spec = self.builder.build(&self.contexts.available())?;
        self.runner.document(spec, DOCUMENT_DEFAULT_NAME).await
    }

    /// Reset form state. Custom contexts are kept.
    pub fn clear(&mut self) {
        self.builder = PromptBuilder::new();
    }
}

// -- PDF parser / comparison --

pub struct PdfComparison {
    runner: PanelRunner,
}

impl PdfComparison {
    pub fn new(runner: PanelRunner) -> Self {
        Self { runner }
    }

    /// Restyle `primary`, or compare it with `secondary` when given
    pub async fn generate(
        &self,
        primary: Option<Attachment>,
        secondary: Option<Attachment>,
        instructions: &str,
    ) -> Result<DocumentOutput> {
        let primary = primary.ok_or_else(|| DashboardError::MissingField("PDF #1".to_string()))?;
        let comparison = secondary.is_some();

        let default_name = if comparison {
            COMPARISON_DEFAULT_NAME.to_string()
        } else {
            Some(primary.stem())
                .filter(|s| !s.is_empty())
                .unwrap_or(DOCUMENT_DEFAULT_NAME)
                .to_string()
        };

        let mut attachments = vec![primary];
        attachments.extend(secondary);

        let spec = PromptSpec::document(prompts::build_pdf_prompt(comparison, instructions))
            .with_attachments(attachments);
        self.runner.document(spec, &default_name).await
    }
}

// -- quote assistant --

pub struct QuoteProposal {
    runner: PanelRunner,
}

impl QuoteProposal {
    pub fn new(runner: PanelRunner) -> Self {
        Self { runner }
    }

    pub async fn generate(&self, notes: &str) -> Result<DocumentOutput> {
        if notes.trim().is_empty() {
            return Err(DashboardError::MissingField(
                "The client's quoting information".to_string(),
            ));
        }
        let spec = PromptSpec::document(prompts::build_quote_proposal_prompt(notes.trim()));
        self.runner.document(spec, QUOTE_DEFAULT_NAME).await
    }
}

// -- needs analysis --

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InsuranceType {
    Auto,
    Home,
    Life,
    Commercial,
}

impl InsuranceType {
    pub const ALL: [InsuranceType; 4] = [
        InsuranceType::Auto,
        InsuranceType::Home,
        InsuranceType::Life,
        InsuranceType::Commercial,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            InsuranceType::Auto => "auto",
            InsuranceType::Home => "home",
            InsuranceType::Life => "life",
            InsuranceType::Commercial => "commercial",
        }
    }
}

impl fmt::Display for InsuranceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for InsuranceType {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|t| t.id() == wanted)
            .ok_or_else(|| DashboardError::NotFound(format!("insurance type {}", s.trim())))
    }
}

pub struct NeedsAnalysis {
    runner: PanelRunner,
}

impl NeedsAnalysis {
    pub fn new(runner: PanelRunner) -> Self {
        Self { runner }
    }

    /// Selected types in selection order, without repeats
    fn type_ids(types: &[InsuranceType]) -> Result<Vec<&'static str>> {
        let mut ids: Vec<&'static str> = Vec::new();
        for t in types {
            if !ids.contains(&t.id()) {
                ids.push(t.id());
            }
        }
        if ids.is_empty() {
            return Err(DashboardError::MissingField(
                "At least one insurance type".to_string(),
            ));
        }
        Ok(ids)
    }

    /// Questionnaire as a branded HTML email
    pub async fn generate(&self, types: &[InsuranceType], notes: &str) -> Result<DocumentOutput> {
        let ids = Self::type_ids(types)?;
        let spec = PromptSpec::document(prompts::build_needs_analysis_prompt(&ids, notes));
        self.runner.document(spec, NEEDS_ANALYSIS_DEFAULT_NAME).await
    }

    /// Questionnaire as plain text, streamed chunk by chunk
    pub async fn stream_questionnaire(
        &self,
        types: &[InsuranceType],
        notes: &str,
        on_chunk: &mut (dyn for<'c> FnMut(&'c str) + Send),
    ) -> Result<String> {
        let ids = Self::type_ids(types)?;
        let spec = PromptSpec::plain_text(prompts::build_questionnaire_prompt(&ids, notes));
        self.runner.stream(spec, on_chunk).await
    }
}

// -- property report --

pub struct PropertyReport {
    runner: PanelRunner,
}

impl PropertyReport {
    pub fn new(runner: PanelRunner) -> Self {
        Self { runner }
    }

    /// Web-grounded property research. Cited sources are appended to the body.
    pub async fn generate(&self, address: &str) -> Result<DocumentOutput> {
        let address = address.trim();
        if address.is_empty() {
            return Err(DashboardError::MissingField("An address".to_string()));
        }

        let spec =
            PromptSpec::document(prompts::build_property_report_prompt(address)).with_web_search();
        let mut output = self.runner.document(spec, PROPERTY_REPORT_DEFAULT_NAME).await?;

        if !output.sources.is_empty() {
            tracing::debug!(sources = output.sources.len(), "Injecting report sources");
            output.document.body = inject_sources(&output.document.body, &output.sources);
        }
        Ok(output)
    }
}

// -- task extraction --

pub struct TaskExtraction {
    runner: PanelRunner,
}

impl TaskExtraction {
    pub fn new(runner: PanelRunner) -> Self {
        Self { runner }
    }

    /// Extract one task from text and/or a PDF and prepend it to `matrix`
    pub async fn extract_into(
        &self,
        matrix: &mut TaskMatrix,
        text: &str,
        attachment: Option<Attachment>,
        today: NaiveDate,
    ) -> Result<Task> {
        if text.trim().is_empty() && attachment.is_none() {
            return Err(DashboardError::NoInput);
        }

        let instruction = prompts::build_task_extraction_prompt(
            text,
            attachment.is_some(),
            &today.format("%Y-%m-%d").to_string(),
        );
        let spec = PromptSpec::document(instruction)
            .with_shape(ResponseShape::task())
            .with_attachments(attachment.into_iter().collect());

        let extracted: ExtractedTask = self.runner.structured(spec).await?;
        matrix.merge_extracted(extracted)
    }
}

// -- task assistant --

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssistAction {
    Email,
    Summary,
    Custom(String),
}

impl AssistAction {
    pub fn label(&self) -> &'static str {
        match self {
            AssistAction::Email => "email",
            AssistAction::Summary => "summary",
            AssistAction::Custom(_) => "custom",
        }
    }

    pub fn custom_prompt(&self) -> Option<&str> {
        match self {
            AssistAction::Custom(prompt) => Some(prompt.as_str()),
            _ => None,
        }
    }

    fn instruction(&self, task: &Task) -> Result<String> {
        match self {
            AssistAction::Email => Ok(format!(
                "Based on the task context, draft a professional and courteous follow-up email to the customer ({}). The email should address the core subject of the task.",
                task.customer_name
            )),
            AssistAction::Summary => Ok("Based on the task context, provide a concise summary of the situation and suggest the next logical action step for the agent. Format it as an internal note.".to_string()),
            AssistAction::Custom(prompt) if prompt.trim().is_empty() => {
                Err(DashboardError::MissingField("A custom prompt".to_string()))
            }
            AssistAction::Custom(prompt) => Ok(prompt.trim().to_string()),
        }
    }

    /// Parse `email`, `summary`, or `custom` plus its prompt text
    pub fn parse(kind: &str, custom_prompt: Option<&str>) -> Result<Self> {
        match kind.trim().to_lowercase().as_str() {
            "email" => Ok(AssistAction::Email),
            "summary" => Ok(AssistAction::Summary),
            "custom" => Ok(AssistAction::Custom(
                custom_prompt.unwrap_or_default().to_string(),
            )),
            other => Err(DashboardError::NotFound(format!("assistant action {}", other))),
        }
    }
}

pub struct TaskAssistant {
    runner: PanelRunner,
}

impl TaskAssistant {
    pub fn new(runner: PanelRunner) -> Self {
        Self { runner }
    }

    pub async fn run(&self, task: &Task, action: &AssistAction) -> Result<String> {
        let instruction = action.instruction(task)?;
        let prompt = prompts::build_task_assistant_prompt(&task.assistant_context(), &instruction);

        let mut spec = PromptSpec::plain_text(prompt);
        spec.system_instruction = None;
        self.runner.text(spec).await
    }

    /// Save assistant output on the task as a note and in its internal notes
    pub fn add_to_notes(
        &self,
        matrix: &mut TaskMatrix,
        task_id: &str,
        action: &AssistAction,
        content: &str,
    ) -> Result<Task> {
        matrix.add_assistant_notes(
            task_id,
            action.label(),
            action.custom_prompt(),
            content,
            Local::now(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::super::fake::{FakeBackend, FakeReply};
    use super::*;
    use crate::store::StateStore;
    use crate::tasks::{Priority, TaskDraft};
    use serde_json::json;
    use tempfile::TempDir;
    use tokio::sync::Notify;

    fn runner(backend: &Arc<FakeBackend>) -> PanelRunner {
        PanelRunner::new(backend.clone())
    }

    fn pdf(name: &str) -> Attachment {
        Attachment::from_bytes(name, b"%PDF-1.7 body").unwrap()
    }

    fn store() -> (TempDir, StateStore) {
        let dir = TempDir::new().unwrap();
        let store = StateStore::new(dir.path()).unwrap();
        (dir, store)
    }

    #[tokio::test]
    async fn test_styler_empty_input_never_dispatches() {
        let backend = Arc::new(FakeBackend::document("S", "<p>b</p>"));
        let (_dir, store) = store();
        let styler = DocumentStyler::new(runner(&backend), ContextLibrary::load(store));

        let err = styler.generate().await.unwrap_err();
        assert!(matches!(err, DashboardError::NoInput));
        assert_eq!(backend.calls(), 0);
        assert!(!styler.runner.is_busy());
    }

    #[tokio::test]
    async fn test_styler_sends_contexts_and_pdf() {
        let backend = Arc::new(FakeBackend::document("Renewal", "<p>b</p>"));
        let (_dir, store) = store();
        let mut styler = DocumentStyler::new(runner(&backend), ContextLibrary::load(store));

        let snippet = styler.add_context("Household", "Two drivers, one teen").unwrap();
        styler.builder_mut().set_free_text("Renewal reminder for the Smiths");
        styler.toggle_context(&snippet.id).unwrap();
        styler.builder_mut().attach(pdf("renewal.pdf"));

        let output = styler.generate().await.unwrap();
        assert_eq!(output.document.subject, "Renewal");
        assert_eq!(output.default_name, DOCUMENT_DEFAULT_NAME);

        let spec = backend.last_spec().unwrap();
        assert!(spec.instruction.contains("Renewal reminder for the Smiths"));
        assert!(spec.instruction.contains("Context: Household\nTwo drivers, one teen"));
        assert_eq!(spec.attachments.len(), 1);
        assert!(spec.response_shape.is_some());
    }

    #[tokio::test]
    async fn test_deleting_context_deactivates_it() {
        let backend = Arc::new(FakeBackend::document("S", "<p>b</p>"));
        let (_dir, store) = store();
        let mut styler = DocumentStyler::new(runner(&backend), ContextLibrary::load(store));

        let snippet = styler.add_context("Pets", "Has a dog").unwrap();
        styler.builder_mut().set_free_text("hello");
        styler.toggle_context(&snippet.id).unwrap();
        assert!(styler.preview_request().contains("Has a dog"));

        styler.delete_context(&snippet.id).unwrap();
        assert!(styler.builder().active_contexts().is_empty());
        assert_eq!(styler.preview_request(), "hello");
    }

    #[tokio::test]
    async fn test_busy_panel_rejects_second_request() {
        let gate = Arc::new(Notify::new());
        let backend = Arc::new(FakeBackend::document("S", "<p>b</p>").gated(gate.clone()));
        let panel = QuoteProposal::new(runner(&backend));

        let first = panel.generate("John Doe, 2 cars");
        let second = async {
            tokio::task::yield_now().await;
            let result = panel.generate("John Doe, 2 cars").await;
            gate.notify_one();
            result
        };
        let (first, second) = tokio::join!(first, second);

        assert!(first.is_ok());
        assert!(matches!(second, Err(DashboardError::Busy)));
        assert_eq!(backend.calls(), 1);
        assert!(!panel.runner.is_busy());
    }

    #[tokio::test]
    async fn test_distinct_panels_run_independently() {
        let backend = Arc::new(FakeBackend::document("S", "<p>b</p>"));
        let quote = QuoteProposal::new(runner(&backend));
        let needs = NeedsAnalysis::new(quote.runner.sibling());

        let (a, b) = tokio::join!(
            quote.generate("notes"),
            needs.generate(&[InsuranceType::Life], "")
        );
        assert!(a.is_ok() && b.is_ok());
        assert_eq!(backend.calls(), 2);
    }

    #[tokio::test]
    async fn test_quote_requires_notes() {
        let backend = Arc::new(FakeBackend::document("S", "<p>b</p>"));
        let panel = QuoteProposal::new(runner(&backend));
        assert!(matches!(
            panel.generate("  ").await,
            Err(DashboardError::MissingField(_))
        ));
        assert_eq!(backend.calls(), 0);

        let output = panel.generate("Jane, 2019 Civic").await.unwrap();
        assert_eq!(output.default_name, QUOTE_DEFAULT_NAME);
    }

    #[tokio::test]
    async fn test_needs_analysis_scenario() {
        let backend = Arc::new(FakeBackend::document(
            "Your Insurance Questionnaire",
            "<html><body><h1>Questions</h1></body></html>",
        ));
        let panel = NeedsAnalysis::new(runner(&backend));

        let output = panel
            .generate(
                &[InsuranceType::Auto, InsuranceType::Home],
                "new homeowner, two cars",
            )
            .await
            .unwrap();

        assert_eq!(backend.calls(), 1);
        let spec = backend.last_spec().unwrap();
        assert!(spec.instruction.contains("auto, home"));
        assert!(spec.instruction.contains("new homeowner, two cars"));
        assert_eq!(output.document.subject, "Your Insurance Questionnaire");
        assert_eq!(
            output.document.body,
            "<html><body><h1>Questions</h1></body></html>"
        );
        assert_eq!(output.default_name, NEEDS_ANALYSIS_DEFAULT_NAME);
    }

    #[tokio::test]
    async fn test_needs_analysis_requires_a_type() {
        let backend = Arc::new(FakeBackend::document("S", "<p>b</p>"));
        let panel = NeedsAnalysis::new(runner(&backend));
        assert!(panel.generate(&[], "notes").await.is_err());

        let mut sink = |_: &str| {};
        assert!(panel.stream_questionnaire(&[], "", &mut sink).await.is_err());
        assert_eq!(backend.calls(), 0);
    }

    #[tokio::test]
    async fn test_questionnaire_streams_plain_text() {
        let backend = Arc::new(FakeBackend::new(FakeReply::text(
            "Hello! To help us find coverage...",
        )));
        let panel = NeedsAnalysis::new(runner(&backend));

        let mut streamed = String::new();
        let text = panel
            .stream_questionnaire(
                &[InsuranceType::Commercial, InsuranceType::Commercial],
                "",
                &mut |chunk: &str| streamed.push_str(chunk),
            )
            .await
            .unwrap();

        assert_eq!(text, streamed);
        let spec = backend.last_spec().unwrap();
        assert!(spec.response_shape.is_none());
        assert!(spec.system_instruction.is_some());
        assert!(spec.instruction.contains("types of insurance: commercial."));
        assert!(spec.instruction.contains("No initial notes provided."));
    }

    #[tokio::test]
    async fn test_pdf_comparison_default_names() {
        let backend = Arc::new(FakeBackend::document("Compare", "<p>b</p>"));
        let panel = PdfComparison::new(runner(&backend));

        assert!(matches!(
            panel.generate(None, Some(pdf("b.pdf")), "").await,
            Err(DashboardError::MissingField(_))
        ));
        assert_eq!(backend.calls(), 0);

        let single = panel.generate(Some(pdf("renewal.pdf")), None, "").await.unwrap();
        assert_eq!(single.default_name, "renewal");
        assert_eq!(backend.last_spec().unwrap().attachments.len(), 1);

        let both = panel
            .generate(Some(pdf("a.pdf")), Some(pdf("b.pdf")), "combine them")
            .await
            .unwrap();
        assert_eq!(both.default_name, COMPARISON_DEFAULT_NAME);
        let spec = backend.last_spec().unwrap();
        assert_eq!(spec.attachments.len(), 2);
        assert!(spec.instruction.contains("combine them"));
    }

    #[tokio::test]
    async fn test_property_report_injects_sources() {
        let raw = json!({
            "subject": "Property Report: 1 Elm St",
            "htmlBody": "<html><body><p>Built 1990</p></body></html>"
        })
        .to_string();
        let fenced = format!("Here you go:\n```json\n{}\n```", raw);
        let sources = vec![WebSource {
            uri: "https://records.example.gov/1".to_string(),
            title: Some("County Records".to_string()),
        }];
        let backend = Arc::new(FakeBackend::new(FakeReply::Text(fenced, sources)));
        let panel = PropertyReport::new(runner(&backend));

        let output = panel.generate(" 1 Elm St, Elkin, Surry ").await.unwrap();
        assert!(backend.last_spec().unwrap().web_search);
        assert!(output.document.body.contains("County Records"));
        assert!(output.document.body.ends_with("</body></html>"));
        assert_eq!(output.sources.len(), 1);

        assert!(panel.generate("").await.is_err());
        assert_eq!(backend.calls(), 1);
    }

    #[tokio::test]
    async fn test_task_extraction_merges_into_matrix() {
        let raw = json!({
            "text": "Call Jane about renewal",
            "dueDate": "2024-13-45",
            "priority": "HIGH",
            "customerName": "Jane Roe",
            "customerValue": 1250.5,
            "isRecurring": false
        })
        .to_string();
        let backend = Arc::new(FakeBackend::new(FakeReply::text(&raw)));
        let panel = TaskExtraction::new(runner(&backend));
        let (_dir, store) = store();
        let mut matrix = TaskMatrix::load(store);
        let today = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();

        let task = panel
            .extract_into(&mut matrix, "renewal call jane", None, today)
            .await
            .unwrap();

        assert_eq!(task.text, "Call Jane about renewal");
        assert_eq!(task.priority, Priority::High);
        assert_eq!(task.due_date.as_deref(), Some("2024-13-45"));
        assert!(!task.completed);
        assert_eq!(matrix.tasks()[0].id, task.id);
        assert!(backend
            .last_spec()
            .unwrap()
            .instruction
            .contains("Today's date is: 2024-05-01."));
    }

    #[tokio::test]
    async fn test_task_extraction_rejects_missing_title() {
        let backend = Arc::new(FakeBackend::new(FakeReply::text(
            r#"{"text":"  ","dueDate":"2024-05-02","priority":"low"}"#,
        )));
        let panel = TaskExtraction::new(runner(&backend));
        let (_dir, store) = store();
        let mut matrix = TaskMatrix::load(store);
        let today = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();

        let err = panel
            .extract_into(&mut matrix, "x", None, today)
            .await
            .unwrap_err();
        assert!(matches!(err, DashboardError::MalformedResponse));
        assert!(matrix.tasks().is_empty());

        let err = panel
            .extract_into(&mut matrix, " ", None, today)
            .await
            .unwrap_err();
        assert!(matches!(err, DashboardError::NoInput));
        assert_eq!(backend.calls(), 1);
    }

    #[tokio::test]
    async fn test_task_assistant_actions_and_notes() {
        let backend = Arc::new(FakeBackend::new(FakeReply::text("Hi Jane, following up.")));
        let panel = TaskAssistant::new(runner(&backend));
        let (_dir, store) = store();
        let mut matrix = TaskMatrix::load(store);
        let task = matrix
            .add(TaskDraft {
                text: "Renewal".to_string(),
                customer_name: "Jane Roe".to_string(),
                ..TaskDraft::default()
            })
            .unwrap();

        let reply = panel.run(&task, &AssistAction::Email).await.unwrap();
        assert_eq!(reply, "Hi Jane, following up.");
        let spec = backend.last_spec().unwrap();
        assert!(spec.instruction.contains("follow-up email to the customer (Jane Roe)"));
        assert!(spec.system_instruction.is_none());

        let custom = AssistAction::Custom("   ".to_string());
        assert!(matches!(
            panel.run(&task, &custom).await,
            Err(DashboardError::MissingField(_))
        ));
        assert_eq!(backend.calls(), 1);

        let action = AssistAction::parse("custom", Some("List documents needed")).unwrap();
        let updated = panel
            .add_to_notes(&mut matrix, &task.id, &action, &reply)
            .unwrap();
        let note = &updated.communications[0].text;
        assert!(note.starts_with("--- AI Assistant Generated ---\nAction: custom\nPrompt: List documents needed\nResponse:\n"));
        assert!(updated.internal_notes.starts_with("--- AI Assistant ("));
        assert!(updated.internal_notes.ends_with("Hi Jane, following up."));
    }

    #[test]
    fn test_insurance_type_parse() {
        assert_eq!("Auto".parse::<InsuranceType>().unwrap(), InsuranceType::Auto);
        assert!("boat".parse::<InsuranceType>().is_err());
        assert_eq!(AssistAction::parse("SUMMARY", None).unwrap(), AssistAction::Summary);
        assert!(AssistAction::parse("fax", None).is_err());
    }
}
