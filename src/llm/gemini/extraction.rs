// src/llm/gemini/extraction.rs
// Response extraction helpers for Gemini API responses

use crate::llm::gemini::types::{GeminiContent, GeminiPart, GeminiResponse};
use crate::llm::provider::GeneratedImage;

/// Content of the first candidate, if any
pub fn first_content(response: &GeminiResponse) -> Option<&GeminiContent> {
    response
        .candidates
        .as_ref()
        .and_then(|c| c.first())
        .and_then(|c| c.content.as_ref())
}

/// Extract text content (non-thought parts only)
pub fn extract_text(content: &GeminiContent) -> Option<String> {
    let text_parts: Vec<&str> = content
        .parts
        .iter()
        .filter_map(|part| match part {
            GeminiPart::Text { text, thought } if !thought => Some(text.as_str()),
            _ => None,
        })
        .collect();

    if text_parts.is_empty() {
        None
    } else {
        Some(text_parts.join(""))
    }
}

/// First inline image part
pub fn extract_image(content: &GeminiContent) -> Option<GeneratedImage> {
    content.parts.iter().find_map(|part| match part {
        GeminiPart::InlineData { inline_data }
            if inline_data.mime_type.starts_with("image/") && !inline_data.data.is_empty() =>
        {
            Some(GeneratedImage {
                mime_type: inline_data.mime_type.clone(),
                data: inline_data.data.clone(),
            })
        }
        _ => None,
    })
}
