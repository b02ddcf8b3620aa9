// src/cli/chat.rs
// Interactive terminal chat over a persisted conversation store

use super::clients::get_gateway;
use anyhow::{Context, Result, bail};
use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use chatgate::config::EnvConfig;
use chatgate::conversation::{ConversationStore, JsonFileStorage, Role};
use chatgate::http::create_shared_client;
use chatgate::llm::AudioInput;
use chatgate::session::{ChatSession, SendOutcome, SessionRateGate};
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

const HELP: &str = "\
Commands:
  /new                 start a new conversation
  /list                list conversations
  /switch <id>         activate a conversation
  /delete <id>         delete a conversation
  /history             show the active conversation
  /transcribe <file>   transcribe an audio file (or data URI) into a draft
  /signin, /signout    toggle the signed-in state
  /help                show this help
  /quit                exit
  /imagine <prompt>    generate an image
Press enter on an empty line to send a pending draft.";

pub async fn run_chat(config: EnvConfig, signed_in: bool) -> Result<()> {
    let Some(gateway) = get_gateway(&config, create_shared_client()) else {
        bail!("GEMINI_API_KEY is not set; the chat session needs an AI provider");
    };

    std::fs::create_dir_all(&config.data_dir)
        .with_context(|| format!("creating {}", config.data_dir.display()))?;
    let storage = Arc::new(JsonFileStorage::new(&config.data_dir));
    let store = ConversationStore::load(storage);
    info!(
        conversations = store.len(),
        dir = %config.data_dir.display(),
        "Conversation store loaded"
    );

    let mut session = ChatSession::open(store, gateway, SessionRateGate::new(config.guest_limit));
    if signed_in {
        session.sign_in();
    }

    println!("chatgate chat. Type /help for commands.");
    print_active(&session);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut draft: Option<String> = None;

    loop {
        prompt();
        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();

        if line.is_empty() {
            if let Some(text) = draft.take() {
                send(&mut session, &text).await;
            }
            continue;
        }

        let (command, arg) = match line.split_once(char::is_whitespace) {
            Some((c, a)) => (c, a.trim()),
            None => (line, ""),
        };

        match command {
            "/quit" | "/exit" => break,
            "/help" => println!("{HELP}"),
            "/new" => {
                let id = session.new_conversation().to_string();
                println!("Active conversation: {id}");
            }
            "/list" => {
                for conv in session.conversations() {
                    let marker = if conv.id == session.active_id() { "*" } else { " " };
                    println!(
                        "{} {}  {} ({} messages)",
                        marker,
                        conv.id,
                        conv.title,
                        conv.messages.len()
                    );
                }
            }
            "/switch" => {
                if session.select(arg) {
                    print_active(&session);
                } else {
                    println!("No conversation with id '{arg}'");
                }
            }
            "/delete" => {
                session.delete_conversation(arg);
                print_active(&session);
            }
            "/history" => print_history(&session),
            "/signin" => {
                session.sign_in();
                println!("Signed in.");
            }
            "/signout" => {
                session.sign_out();
                println!(
                    "Signed out. {} guest messages remaining.",
                    session.remaining_guest_sends()
                );
            }
            "/transcribe" => match load_audio(arg) {
                Ok(audio) => match session.transcribe(&audio).await {
                    Ok(text) => {
                        println!("Draft: {text}");
                        println!("(press enter to send, or type a new message)");
                        draft = Some(text);
                    }
                    Err(e) => println!("Transcription failed: {}", e.to_user_string()),
                },
                Err(e) => println!("Could not read audio: {e:#}"),
            },
            _ => {
                draft = None;
                send(&mut session, line).await;
            }
        }
    }

    Ok(())
}

async fn send(session: &mut ChatSession, text: &str) {
    match session.send(text).await {
        SendOutcome::Ignored => {}
        SendOutcome::AuthRequired => {
            println!("You've reached the guest message limit. Sign in to keep chatting (/signin).")
        }
        SendOutcome::Reply(text) => println!("\n{text}\n"),
        SendOutcome::Image(image) => println!("\n[image] {}\n", summarize_image(&image)),
        SendOutcome::Failed(message) => println!("\n{message}\n"),
    }
}

fn prompt() {
    print!("> ");
    let _ = std::io::stdout().flush();
}

fn print_active(session: &ChatSession) {
    if let Some(conv) = session.active() {
        println!("Active conversation: {} ({})", conv.title, conv.id);
    }
}

fn print_history(session: &ChatSession) {
    let Some(conv) = session.active() else {
        return;
    };
    for message in &conv.messages {
        let who = match message.role() {
            Role::User => "you",
            Role::Model => "model",
        };
        if message.is_image() {
            println!("{who}: [image] {}", summarize_image(message.content()));
        } else {
            println!("{who}: {}", message.content());
        }
    }
}

/// Data URIs are far too long for a terminal
fn summarize_image(image: &str) -> String {
    match image.strip_prefix("data:") {
        Some(rest) => {
            let mime = rest.split(';').next().unwrap_or_default();
            format!("{} ({} bytes encoded)", mime, image.len())
        }
        None => image.to_string(),
    }
}

fn load_audio(arg: &str) -> Result<AudioInput> {
    if arg.is_empty() {
        bail!("usage: /transcribe <file>");
    }
    if arg.starts_with("data:") {
        return AudioInput::parse(arg, None);
    }

    let path = Path::new(arg);
    let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    AudioInput::parse(&BASE64.encode(bytes), Some(audio_mime(path)))
}

fn audio_mime(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("wav") => "audio/wav",
        Some("mp3") => "audio/mpeg",
        Some("ogg") | Some("oga") => "audio/ogg",
        Some("m4a") | Some("mp4") => "audio/mp4",
        Some("flac") => "audio/flac",
        _ => AudioInput::DEFAULT_MIME,
    }
}
