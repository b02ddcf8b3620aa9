// src/cli/mod.rs
// CLI module for chatgate commands

use clap::{Parser, Subcommand};

pub mod chat;
pub mod clients;
pub mod serve;

pub use chat::run_chat;
pub use serve::run_server;

#[derive(Parser)]
#[command(name = "chatgate")]
#[command(about = "Conversation-managing chat proxy in front of the Gemini API")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP gateway (default)
    Serve {
        /// Address to bind
        #[arg(long, default_value = "0.0.0.0", env = "CHATGATE_HOST")]
        host: String,

        /// Port to listen on
        #[arg(short, long, default_value = "3000", env = "CHATGATE_PORT")]
        port: u16,
    },

    /// Interactive chat session in the terminal
    Chat {
        /// Start signed in (no guest limit)
        #[arg(long)]
        signed_in: bool,
    },
}
