//! In-memory backend for workflow tests.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

use super::{GenerationReply, GenerativeBackend, PromptSpec, WebSource};
use crate::error::{DashboardError, Result};

#[derive(Debug, Clone)]
pub enum FakeReply {
    Text(String, Vec<WebSource>),
    Fail(String),
}

impl FakeReply {
    pub fn text(text: &str) -> Self {
        FakeReply::Text(text.to_string(), Vec::new())
    }
}

/// Counts calls, records every spec, and answers with a fixed reply
pub struct FakeBackend {
    reply: FakeReply,
    calls: AtomicUsize,
    specs: Mutex<Vec<PromptSpec>>,
    gate: Option<Arc<Notify>>,
}

impl FakeBackend {
    pub fn new(reply: FakeReply) -> Self {
        Self {
            reply,
            calls: AtomicUsize::new(0),
            specs: Mutex::new(Vec::new()),
            gate: None,
        }
    }

    pub fn document(subject: &str, body: &str) -> Self {
        let raw = serde_json::json!({ "subject": subject, "htmlBody": body }).to_string();
        Self::new(FakeReply::text(&raw))
    }

    /// Hold every call until `gate` is notified
    pub fn gated(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_spec(&self) -> Option<PromptSpec> {
        self.specs.lock().ok().and_then(|s| s.last().cloned())
    }

    async fn answer(&self, spec: &PromptSpec) -> Result<GenerationReply> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut specs) = self.specs.lock() {
            specs.push(spec.clone());
        }
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }

        match &self.reply {
            FakeReply::Text(text, sources) => Ok(GenerationReply {
                text: text.clone(),
                sources: sources.clone(),
            }),
            FakeReply::Fail(message) => Err(DashboardError::Service(message.clone())),
        }
    }
}

#[async_trait]
impl GenerativeBackend for FakeBackend {
    async fn generate(&self, spec: &PromptSpec) -> Result<GenerationReply> {
        self.answer(spec).await
    }

    async fn generate_stream(
        &self,
        spec: &PromptSpec,
        on_chunk: &mut (dyn for<'c> FnMut(&'c str) + Send),
    ) -> Result<String> {
        let reply = self.answer(spec).await?;
        for word in reply.text.split_inclusive(' ') {
            on_chunk(word);
        }
        Ok(reply.text)
    }
}
