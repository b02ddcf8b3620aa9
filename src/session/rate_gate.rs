// src/session/rate_gate.rs
// Guest usage throttle, scoped to one client session

use crate::config::env::DEFAULT_GUEST_LIMIT;

/// Outcome of checking a send attempt against the gate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    Allow,
    RequireAuth,
}

/// Counts AI-triggering sends by an unauthenticated visitor.
///
/// Lives only as long as the session; never persisted.
#[derive(Debug, Clone)]
pub struct SessionRateGate {
    threshold: u32,
    count: u32,
}

impl Default for SessionRateGate {
    fn default() -> Self {
        Self::new(DEFAULT_GUEST_LIMIT)
    }
}

impl SessionRateGate {
    pub fn new(threshold: u32) -> Self {
        Self { threshold, count: 0 }
    }

    /// Check one send attempt and count it when it goes through.
    ///
    /// Authenticated users are neither checked nor counted. Intercepted
    /// attempts do not advance the counter.
    pub fn check(&mut self, authenticated: bool) -> GateDecision {
        if authenticated {
            return GateDecision::Allow;
        }
        if self.count >= self.threshold {
            return GateDecision::RequireAuth;
        }
        self.count += 1;
        GateDecision::Allow
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    /// Guest sends left before sign-in is required
    pub fn remaining(&self) -> u32 {
        self.threshold.saturating_sub(self.count)
    }
}
