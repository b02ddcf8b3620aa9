// src/llm/mod.rs
// Generative-AI provider clients

mod gemini;
mod http_client;
mod provider;

pub use gemini::GeminiClient;
pub use http_client::LlmHttpClient;
pub use provider::{AiProvider, AudioInput, GeneratedImage};
