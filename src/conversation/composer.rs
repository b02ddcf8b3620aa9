// src/conversation/composer.rs
// Builds the rolling prompt history sent to the AI provider

use super::types::{Message, Role};

/// Reserved prefix routing a message to image generation
pub const IMAGINE_PREFIX: &str = "/imagine ";

/// Stand-in for image references when replaying history as text
pub const IMAGE_PLACEHOLDER: &str = "[image]";

/// Fixed system instruction, sent as the first user turn
pub const SYSTEM_INSTRUCTION: &str = "You are a friendly, knowledgeable assistant in a chat app. \
Answer clearly and concisely. Format responses in Markdown: use headings and lists where they help, \
put code in fenced code blocks with a language tag, and keep paragraphs short. \
If a request is ambiguous, ask a brief clarifying question. \
Users can type /imagine followed by a description to create an image.";

/// Fixed acknowledgement, sent as the first model turn
pub const SYSTEM_ACKNOWLEDGEMENT: &str =
    "Understood. I'll follow these guidelines and format my answers in Markdown.";

/// What a piece of user input asks for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command<'a> {
    /// Ordinary chat text
    Chat(&'a str),
    /// `/imagine <prompt>`; carries the trimmed prompt
    Imagine(&'a str),
}

/// Route input by its reserved prefix. `/imagine` without a description stays chat.
pub fn parse_command(input: &str) -> Command<'_> {
    if let Some(rest) = input.strip_prefix(IMAGINE_PREFIX) {
        let prompt = rest.trim();
        if !prompt.is_empty() {
            return Command::Imagine(prompt);
        }
    }
    Command::Chat(input)
}

/// Composed request for the chat capability
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedPrompt {
    /// System turns followed by prior conversation turns
    pub history: Vec<Message>,
    /// The new user message, sent separately
    pub prompt: String,
}

/// Assemble system instruction, acknowledgement and prior turns.
///
/// A trailing user message identical to `prompt` is dropped so a message that
/// was already appended to the conversation is not sent twice.
pub fn compose(prior: &[Message], prompt: &str) -> ComposedPrompt {
    let prior = match prior.split_last() {
        Some((last, rest)) if last.role() == Role::User && last.content() == prompt => rest,
        _ => prior,
    };

    let mut history = Vec::with_capacity(prior.len() + 2);
    history.push(Message::user(SYSTEM_INSTRUCTION));
    history.push(Message::model(SYSTEM_ACKNOWLEDGEMENT));
    history.extend(prior.iter().map(|m| {
        if m.is_image() {
            Message::new(m.role(), IMAGE_PLACEHOLDER)
        } else {
            m.clone()
        }
    }));

    ComposedPrompt {
        history,
        prompt: prompt.to_string(),
    }
}
