//! Prompt-assembly / AI-response workflow.
//!
//! Every panel goes through the same steps: build a [`PromptSpec`], hand it
//! to a [`GenerativeBackend`], validate the reply against a
//! [`ResponseShape`], and return a typed value. Panels differ only in how
//! they build the spec.

pub mod attachment;
pub mod builder;
pub mod inflight;
pub mod panels;
pub mod shape;
pub mod validator;

#[cfg(test)]
pub(crate) mod fake;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

pub use crate::ai::gemini::types::WebSource;
pub use attachment::Attachment;
pub use builder::PromptBuilder;
pub use inflight::{InFlight, InFlightTicket};
pub use shape::{FieldKind, FieldSpec, ResponseShape};
pub use validator::GeneratedDocument;

use crate::ai::prompts::SYSTEM_INSTRUCTION;
use crate::error::{DashboardError, Result};

/// Everything the backend needs for one call
#[derive(Debug, Clone)]
pub struct PromptSpec {
    pub instruction: String,
    pub system_instruction: Option<String>,
    pub attachments: Vec<Attachment>,
    /// Structured reply shape. `None` for plain-text calls.
    pub response_shape: Option<ResponseShape>,
    /// Enables web-grounded generation (fenced-JSON mode for structured calls)
    pub web_search: bool,
}

impl PromptSpec {
    /// Structured `{subject, htmlBody}` call
    pub fn document(instruction: String) -> Self {
        Self {
            instruction,
            system_instruction: None,
            attachments: Vec::new(),
            response_shape: Some(ResponseShape::document()),
            web_search: false,
        }
    }

    /// Plain-text call carrying the agency persona
    pub fn plain_text(instruction: String) -> Self {
        Self {
            instruction,
            system_instruction: Some(SYSTEM_INSTRUCTION.to_string()),
            attachments: Vec::new(),
            response_shape: None,
            web_search: false,
        }
    }

    pub fn with_shape(mut self, shape: ResponseShape) -> Self {
        self.response_shape = Some(shape);
        self
    }

    pub fn with_attachments(mut self, attachments: Vec<Attachment>) -> Self {
        self.attachments = attachments;
        self
    }

    pub fn with_web_search(mut self) -> Self {
        self.web_search = true;
        self
    }
}

/// Raw reply from the backend
#[derive(Debug, Clone, Default)]
pub struct GenerationReply {
    pub text: String,
    pub sources: Vec<WebSource>,
}

/// A generative content service
#[async_trait]
pub trait GenerativeBackend: Send + Sync {
    /// One request, one reply. No retries.
    async fn generate(&self, spec: &PromptSpec) -> Result<GenerationReply>;

    /// Stream text chunks to `on_chunk`, returning the full text
    async fn generate_stream(
        &self,
        spec: &PromptSpec,
        on_chunk: &mut (dyn for<'c> FnMut(&'c str) + Send),
    ) -> Result<String>;
}

/// Validated value plus any web sources the reply cited
#[derive(Debug, Clone)]
pub struct Generated<T> {
    pub value: T,
    pub sources: Vec<WebSource>,
}

/// Dispatch `spec` and validate the reply against its response shape
pub async fn run_generation_workflow<T, B>(backend: &B, spec: &PromptSpec) -> Result<Generated<T>>
where
    T: DeserializeOwned,
    B: GenerativeBackend + ?Sized,
{
    let shape = spec
        .response_shape
        .clone()
        .unwrap_or_else(ResponseShape::document);

    tracing::info!(
        attachments = spec.attachments.len(),
        web_search = spec.web_search,
        "Dispatching generation request"
    );

    let reply = backend.generate(spec).await?;
    if reply.text.trim().is_empty() {
        return Err(DashboardError::EmptyResponse);
    }

    let value = validator::validate(&reply.text, &shape)?;
    Ok(Generated {
        value,
        sources: reply.sources,
    })
}

/// Dispatch a plain-text request
pub async fn run_text_workflow<B>(backend: &B, spec: &PromptSpec) -> Result<String>
where
    B: GenerativeBackend + ?Sized,
{
    let reply = backend.generate(spec).await?;
    let text = reply.text.trim();
    if text.is_empty() {
        return Err(DashboardError::EmptyResponse);
    }
    Ok(text.to_string())
}

/// Dispatch a plain-text request, streaming chunks as they arrive
pub async fn run_streaming_workflow<B>(
    backend: &B,
    spec: &PromptSpec,
    on_chunk: &mut (dyn for<'c> FnMut(&'c str) + Send),
) -> Result<String>
where
    B: GenerativeBackend + ?Sized,
{
    let text = backend.generate_stream(spec, on_chunk).await?;
    if text.trim().is_empty() {
        return Err(DashboardError::EmptyResponse);
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::fake::{FakeBackend, FakeReply};
    use super::*;

    #[tokio::test]
    async fn test_document_workflow_validates_reply() {
        let backend = FakeBackend::document("Your Quote", "<p>Hi</p>");
        let spec = PromptSpec::document("make a quote".into());

        let result: Generated<GeneratedDocument> =
            run_generation_workflow(&backend, &spec).await.unwrap();
        assert_eq!(result.value.subject, "Your Quote");
        assert_eq!(backend.calls(), 1);
    }

    #[tokio::test]
    async fn test_missing_body_rejected_before_render() {
        let backend = FakeBackend::new(FakeReply::text(r#"{"subject":"Only subject"}"#));
        let spec = PromptSpec::document("x".into());

        let err = run_generation_workflow::<GeneratedDocument, _>(&backend, &spec)
            .await
            .unwrap_err();
        assert!(matches!(err, DashboardError::MalformedResponse));
    }

    #[tokio::test]
    async fn test_empty_reply_is_error() {
        let backend = FakeBackend::new(FakeReply::text("   "));
        let spec = PromptSpec::document("x".into());

        let err = run_generation_workflow::<GeneratedDocument, _>(&backend, &spec)
            .await
            .unwrap_err();
        assert!(matches!(err, DashboardError::EmptyResponse));

        let err = run_text_workflow(&backend, &PromptSpec::plain_text("x".into()))
            .await
            .unwrap_err();
        assert!(matches!(err, DashboardError::EmptyResponse));
    }

    #[tokio::test]
    async fn test_service_error_propagates() {
        let backend = FakeBackend::new(FakeReply::Fail("quota exceeded".into()));
        let err = run_text_workflow(&backend, &PromptSpec::plain_text("x".into()))
            .await
            .unwrap_err();
        assert!(matches!(err, DashboardError::Service(_)));
        assert_eq!(backend.calls(), 1);
    }

    #[tokio::test]
    async fn test_streaming_collects_chunks() {
        let backend = FakeBackend::new(FakeReply::text("Hello there"));
        let mut seen = Vec::new();
        let text = run_streaming_workflow(
            &backend,
            &PromptSpec::plain_text("x".into()),
            &mut |chunk: &str| seen.push(chunk.to_string()),
        )
        .await
        .unwrap();

        assert_eq!(text, "Hello there");
        assert!(seen.len() > 1);
        assert_eq!(seen.concat(), "Hello there");
    }

    #[tokio::test]
    async fn test_streaming_accepts_boxed_sink() {
        let backend = FakeBackend::new(FakeReply::text("Boxed reply"));
        let total = std::sync::Arc::new(std::sync::atomic::AtomicUsize::new(0));
        let counter = total.clone();
        let mut sink: Box<dyn for<'c> FnMut(&'c str) + Send> = Box::new(move |chunk| {
            counter.fetch_add(chunk.len(), std::sync::atomic::Ordering::SeqCst);
        });

        let text = run_streaming_workflow(&backend, &PromptSpec::plain_text("x".into()), &mut *sink)
            .await
            .unwrap();

        assert_eq!(text, "Boxed reply");
        assert_eq!(total.load(std::sync::atomic::Ordering::SeqCst), "Boxed reply".len());
    }
}
