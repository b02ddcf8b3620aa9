// src/llm/gemini/conversion.rs
// Conversion from conversation messages and audio clips into Gemini contents

use crate::conversation::Message;
use crate::llm::gemini::types::{GeminiContent, GeminiInlineData, GeminiPart};
use crate::llm::provider::AudioInput;

/// Convert a conversation message to a Gemini content entry.
///
/// Roles map one-to-one: the conversation already uses Gemini's "user"/"model".
pub fn convert_message(msg: &Message) -> GeminiContent {
    GeminiContent {
        role: msg.role().as_str().to_string(),
        parts: vec![GeminiPart::text(msg.content())],
    }
}

/// Prior turns followed by the active prompt as the final user turn
pub fn chat_contents(history: &[Message], prompt: &str) -> Vec<GeminiContent> {
    let mut contents: Vec<GeminiContent> = history.iter().map(convert_message).collect();
    contents.push(user_text(prompt));
    contents
}

pub fn user_text(text: &str) -> GeminiContent {
    GeminiContent {
        role: "user".into(),
        parts: vec![GeminiPart::text(text)],
    }
}

/// Single user turn carrying the audio inline, followed by the instruction
pub fn audio_contents(audio: &AudioInput, instruction: &str) -> Vec<GeminiContent> {
    vec![GeminiContent {
        role: "user".into(),
        parts: vec![
            GeminiPart::InlineData {
                inline_data: GeminiInlineData {
                    mime_type: audio.mime_type.clone(),
                    data: audio.data.clone(),
                },
            },
            GeminiPart::text(instruction),
        ],
    }]
}
