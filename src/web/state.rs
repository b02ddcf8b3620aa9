// src/web/state.rs
// Web server state

use std::sync::Arc;

use crate::config::ContactConfig;
use crate::contact::Mailer;
use crate::gateway::AiGateway;
use crate::web::error::{ApiError, ApiResult};

/// Shared application state. Immutable after startup.
#[derive(Clone)]
pub struct AppState {
    /// AI gateway (None when no provider key is configured)
    pub gateway: Option<AiGateway>,

    /// Email sender for the contact form
    pub mailer: Option<Arc<dyn Mailer>>,

    /// Contact form routing
    pub contact: ContactConfig,
}

impl AppState {
    pub fn new(
        gateway: Option<AiGateway>,
        mailer: Option<Arc<dyn Mailer>>,
        contact: ContactConfig,
    ) -> Self {
        Self {
            gateway,
            mailer,
            contact,
        }
    }

    /// The gateway, or a 503 when none is configured
    pub fn gateway(&self) -> ApiResult<&AiGateway> {
        self.gateway.as_ref().ok_or_else(|| {
            ApiError::service_unavailable("AI provider not configured. Set GEMINI_API_KEY.")
        })
    }
}
