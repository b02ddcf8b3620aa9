// src/session/mod.rs
// Client-side session state: chat flow and guest rate gate

pub mod chat;
pub mod rate_gate;

pub use chat::{ChatSession, SendOutcome};
pub use rate_gate::{GateDecision, SessionRateGate};
