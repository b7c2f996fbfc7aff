//! Shared utilities for the Gemini module
//!
//! Web-grounded calls cannot use the structured-output mode, so the model is
//! asked for raw JSON and may still wrap it in a markdown fence.

/// Extract a JSON object from a response that might contain markdown or other text
///
/// Handles:
/// - ```json code blocks
/// - Plain ``` code blocks
/// - Raw JSON objects surrounded by prose
pub fn extract_json_object(text: &str) -> Option<String> {
    let trimmed = text.trim();

    if let Some(start) = trimmed.find("```json") {
        let json_start = start + 7;
        if let Some(end) = trimmed[json_start..].rfind("```") {
            return Some(trimmed[json_start..json_start + end].trim().to_string());
        }
    }

    if let Some(start) = trimmed.find("```") {
        let block_start = start + 3;
        let content_start = trimmed[block_start..]
            .find('\n')
            .map(|i| block_start + i + 1)
            .unwrap_or(block_start);
        if let Some(end) = trimmed[content_start..].rfind("```") {
            return Some(trimmed[content_start..content_start + end].trim().to_string());
        }
    }

    let start = trimmed.find('{')?;
    let end = trimmed.rfind('}')?;
    (end > start).then(|| trimmed[start..=end].to_string())
}
