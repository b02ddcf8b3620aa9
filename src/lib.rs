// src/lib.rs
// chatgate - AI gateway and client-side chat session management

#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

pub mod config;
pub mod contact;
pub mod conversation;
pub mod error;
pub mod gateway;
pub mod http;
pub mod llm;
pub mod session;
pub mod web;
pub use error::{ChatGateError, Result};
