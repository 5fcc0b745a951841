//! Text extraction from provider response bodies
//!
//! Each provider nests the generated text differently and signals safety blocks
//! differently. A filter signal wins over any partial text.

use serde_json::Value;

use crate::domain::{GatewayError, GenerationResult, ProviderKind};

/// Gemini finish reasons that mean the output was blocked
const GEMINI_BLOCKED_FINISH_REASONS: [&str; 6] = [
    "SAFETY",
    "RECITATION",
    "BLOCKLIST",
    "PROHIBITED_CONTENT",
    "SPII",
    "IMAGE_SAFETY",
];

/// Pull the generated prompt out of a decoded response body
pub fn extract(provider: ProviderKind, body: &Value) -> GenerationResult {
    let extracted = match provider {
        ProviderKind::OpenAi => extract_openai(body),
        ProviderKind::Claude => extract_claude(body),
        ProviderKind::Gemini => extract_gemini(body),
    }?;

    let text = extracted.trim();
    if text.is_empty() {
        return Err(GatewayError::malformed(format!(
            "{} returned an empty generation result",
            provider.display_name()
        )));
    }

    Ok(text.to_string())
}

fn extract_openai(body: &Value) -> Result<String, GatewayError> {
    let choice = body
        .get("choices")
        .and_then(|choices| choices.get(0))
        .ok_or_else(|| missing_field(ProviderKind::OpenAi, "choices[0]"))?;

    if choice.get("finish_reason").and_then(Value::as_str) == Some("content_filter") {
        return Err(GatewayError::content_filtered(
            "OpenAI stopped the generation because of its content filter",
        ));
    }

    let message = choice
        .get("message")
        .ok_or_else(|| missing_field(ProviderKind::OpenAi, "choices[0].message"))?;

    if let Some(refusal) = message.get("refusal").and_then(Value::as_str) {
        if !refusal.trim().is_empty() {
            return Err(GatewayError::content_filtered(format!(
                "OpenAI refused the request: {}",
                refusal.trim()
            )));
        }
    }

    match message.get("content") {
        Some(Value::String(text)) => Ok(text.clone()),
        // Some compatible servers return content as typed parts
        Some(Value::Array(parts)) => Ok(parts
            .iter()
            .filter(|part| {
                part.get("type")
                    .and_then(Value::as_str)
                    .is_none_or(|kind| kind == "text")
            })
            .filter_map(|part| part.get("text").and_then(Value::as_str))
            .collect::<Vec<_>>()
            .join("")),
        _ => Err(missing_field(ProviderKind::OpenAi, "choices[0].message.content")),
    }
}

fn extract_claude(body: &Value) -> Result<String, GatewayError> {
    if body.get("stop_reason").and_then(Value::as_str) == Some("refusal") {
        return Err(GatewayError::content_filtered(
            "Claude declined to generate this prompt",
        ));
    }

    let blocks = body
        .get("content")
        .and_then(Value::as_array)
        .ok_or_else(|| missing_field(ProviderKind::Claude, "content"))?;

    Ok(blocks
        .iter()
        .filter(|block| block.get("type").and_then(Value::as_str) == Some("text"))
        .filter_map(|block| block.get("text").and_then(Value::as_str))
        .collect::<Vec<_>>()
        .join(""))
}

fn extract_gemini(body: &Value) -> Result<String, GatewayError> {
    if let Some(reason) = body
        .get("promptFeedback")
        .and_then(|feedback| feedback.get("blockReason"))
        .and_then(Value::as_str)
    {
        return Err(GatewayError::content_filtered(format!(
            "Gemini blocked the prompt ({})",
            reason
        )));
    }

    let candidate = body
        .get("candidates")
        .and_then(|candidates| candidates.get(0))
        .ok_or_else(|| missing_field(ProviderKind::Gemini, "candidates[0]"))?;

    if let Some(reason) = candidate.get("finishReason").and_then(Value::as_str) {
        if GEMINI_BLOCKED_FINISH_REASONS.contains(&reason) {
            return Err(GatewayError::content_filtered(format!(
                "Gemini stopped the generation ({})",
                reason
            )));
        }
    }

    let parts = candidate
        .get("content")
        .and_then(|content| content.get("parts"))
        .and_then(Value::as_array)
        .ok_or_else(|| missing_field(ProviderKind::Gemini, "candidates[0].content.parts"))?;

    Ok(parts
        .iter()
        .filter(|part| part.get("thought").and_then(Value::as_bool) != Some(true))
        .filter_map(|part| part.get("text").and_then(Value::as_str))
        .collect::<Vec<_>>()
        .join(""))
}

fn missing_field(provider: ProviderKind, field: &str) -> GatewayError {
    GatewayError::malformed(format!(
        "{} response is missing {}",
        provider.display_name(),
        field
    ))
}
