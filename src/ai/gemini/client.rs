//! Gemini REST backend: one-shot and SSE-streamed generation.

use std::sync::Arc;

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::{RequestBuilder, Response};

use super::types::{
    ApiError, Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig,
    GoogleSearch, InlineData, Part, Tool,
};
use crate::ai::credentials::{CredentialManager, GEMINI_PROVIDER};
use crate::ai::http_client::gemini_client;
use crate::config::AppConfig;
use crate::error::{DashboardError, Result};
use crate::workflow::{GenerationReply, GenerativeBackend, PromptSpec};

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Maximum buffered SSE bytes awaiting a newline
const MAX_SSE_BUFFER_SIZE: usize = 1_000_000;

/// Maximum accumulated streamed text
const MAX_STREAM_TEXT_SIZE: usize = 2_000_000;

/// Resolves the API key for each request
pub type KeyLookup = Arc<dyn Fn() -> Result<String> + Send + Sync>;

/// Streaming text callback
type ChunkSink<'a> = &'a mut (dyn for<'c> FnMut(&'c str) + Send);

pub struct GeminiClient {
    base_url: String,
    model: String,
    key_lookup: KeyLookup,
}

impl GeminiClient {
    /// Client that reads the key from the credential store on every call
    pub fn new(config: &AppConfig) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            key_lookup: Arc::new(|| CredentialManager::get_api_key(GEMINI_PROVIDER)),
        }
    }

    pub fn with_api_key(self, api_key: impl Into<String>) -> Self {
        let key = api_key.into().trim().to_string();
        self.with_key_lookup(move || {
            if key.is_empty() {
                Err(DashboardError::MissingCredential)
            } else {
                Ok(key.clone())
            }
        })
    }

    pub fn with_key_lookup<F>(mut self, lookup: F) -> Self
    where
        F: Fn() -> Result<String> + Send + Sync + 'static,
    {
        self.key_lookup = Arc::new(lookup);
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn api_key(&self) -> Result<String> {
        (self.key_lookup)()
    }

    fn endpoint(&self, streaming: bool) -> String {
        if streaming {
            format!(
                "{}/models/{}:streamGenerateContent?alt=sse",
                self.base_url, self.model
            )
        } else {
            format!("{}/models/{}:generateContent", self.base_url, self.model)
        }
    }

    fn post(&self, streaming: bool, api_key: &str, body: &GenerateContentRequest) -> RequestBuilder {
        gemini_client()
            .post(self.endpoint(streaming))
            .header(API_KEY_HEADER, api_key)
            .header("Content-Type", "application/json")
            .json(body)
    }

    async fn send(&self, spec: &PromptSpec, streaming: bool) -> Result<Response> {
        // Resolve the key first so a missing credential never reaches the network
        let api_key = self.api_key()?;
        let body = build_request(spec);

        tracing::info!(
            model = %self.model,
            attachments = spec.attachments.len(),
            structured = spec.response_shape.is_some(),
            web_search = spec.web_search,
            streaming,
            "Sending Gemini request"
        );

        let response = self
            .post(streaming, &api_key, &body)
            .send()
            .await
            .map_err(|e| DashboardError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            tracing::warn!(status = %status, "Gemini request failed");
            return Err(service_error(status.as_u16(), &error_text));
        }

        Ok(response)
    }
}

#[async_trait]
impl GenerativeBackend for GeminiClient {
    async fn generate(&self, spec: &PromptSpec) -> Result<GenerationReply> {
        let response = self.send(spec, false).await?;

        let body: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| DashboardError::Network(format!("Failed to read response: {}", e)))?;

        if let Some(reason) = body
            .prompt_feedback
            .as_ref()
            .and_then(|f| f.block_reason.as_deref())
        {
            return Err(DashboardError::Service(format!("Request blocked: {}", reason)));
        }

        let reply = GenerationReply {
            text: body.text(),
            sources: body.web_sources(),
        };
        tracing::debug!(
            chars = reply.text.len(),
            sources = reply.sources.len(),
            "Gemini reply received"
        );
        Ok(reply)
    }

    async fn generate_stream(
        &self,
        spec: &PromptSpec,
        on_chunk: &mut (dyn for<'c> FnMut(&'c str) + Send),
    ) -> Result<String> {
        let response = self.send(spec, true).await?;

        let mut stream = response.bytes_stream();
        let mut buffer: Vec<u8> = Vec::new();
        let mut full_text = String::new();

        while let Some(chunk_result) = stream.next().await {
            let chunk = chunk_result.map_err(|e| DashboardError::Network(format!("Stream error: {}", e)))?;
            push_sse_bytes(&mut buffer, &chunk, &mut full_text, on_chunk)?;
        }

        // Trailing event without a final newline
        let rest = decode_sse_line(&buffer)?;
        consume_sse_line(rest.trim(), &mut full_text, on_chunk)?;

        Ok(full_text)
    }
}

/// Append raw stream bytes and consume every complete line.
///
/// Lines are decoded only once their newline arrives, so a multi-byte
/// character split across network chunks stays intact.
fn push_sse_bytes(
    buffer: &mut Vec<u8>,
    chunk: &[u8],
    full_text: &mut String,
    on_chunk: ChunkSink<'_>,
) -> Result<()> {
    if buffer.len() + chunk.len() > MAX_SSE_BUFFER_SIZE {
        return Err(DashboardError::Service(
            "SSE buffer exceeded maximum size".to_string(),
        ));
    }
    buffer.extend_from_slice(chunk);

    while let Some(newline_pos) = buffer.iter().position(|b| *b == b'\n') {
        let line: Vec<u8> = buffer.drain(..=newline_pos).collect();
        let line = decode_sse_line(&line)?;
        consume_sse_line(line.trim(), full_text, on_chunk)?;
    }
    Ok(())
}

fn decode_sse_line(bytes: &[u8]) -> Result<&str> {
    std::str::from_utf8(bytes)
        .map_err(|e| DashboardError::Service(format!("Invalid UTF-8 in SSE stream: {}", e)))
}

fn consume_sse_line(line: &str, full_text: &mut String, on_chunk: ChunkSink<'_>) -> Result<()> {
    let Some(data) = line.strip_prefix("data: ") else {
        return Ok(());
    };

    match serde_json::from_str::<GenerateContentResponse>(data) {
        Ok(event) => {
            let text = event.text();
            if text.is_empty() {
                return Ok(());
            }
            if full_text.len() + text.len() > MAX_STREAM_TEXT_SIZE {
                return Err(DashboardError::Service(
                    "Streamed response exceeded maximum size".to_string(),
                ));
            }
            full_text.push_str(&text);
            on_chunk(&text);
        }
        Err(e) => {
            tracing::debug!(error = %e, "Skipping unparseable SSE event");
        }
    }
    Ok(())
}

/// Map a non-success response body to a service error
fn service_error(status: u16, body: &str) -> DashboardError {
    match serde_json::from_str::<ApiError>(body) {
        Ok(api_error) => DashboardError::Service(api_error.error.message),
        Err(_) if body.trim().is_empty() => DashboardError::Service(format!("HTTP {}", status)),
        Err(_) => DashboardError::Service(format!("HTTP {}: {}", status, body.trim())),
    }
}

/// Translate a prompt spec into the REST request body.
///
/// Web-grounded calls cannot use a response schema, so they fall back to
/// fenced-JSON mode and the validator extracts the object from the text.
pub fn build_request(spec: &PromptSpec) -> GenerateContentRequest {
    let mut parts = vec![Part::Text {
        text: spec.instruction.clone(),
    }];
    parts.extend(spec.attachments.iter().map(|a| Part::InlineData {
        inline_data: InlineData {
            mime_type: a.mime_type.clone(),
            data: a.data.clone(),
        },
    }));

    let generation_config = match (&spec.response_shape, spec.web_search) {
        (Some(shape), false) => Some(GenerationConfig {
            response_mime_type: Some("application/json".to_string()),
            response_schema: Some(shape.to_schema()),
        }),
        _ => None,
    };

    let tools = if spec.web_search {
        vec![Tool {
            google_search: GoogleSearch::default(),
        }]
    } else {
        Vec::new()
    };

    GenerateContentRequest {
        contents: vec![Content::user(parts)],
        system_instruction: spec.system_instruction.as_deref().map(Content::system),
        generation_config,
        tools,
    }
}
