// src/cli/serve.rs
// HTTP gateway startup

use super::clients::{get_gateway, get_mailer};
use anyhow::Result;
use chatgate::config::EnvConfig;
use chatgate::http::create_shared_client;
use chatgate::web::{self, state::AppState};
use tracing::{info, warn};

pub async fn run_server(config: EnvConfig, host: String, port: u16) -> Result<()> {
    let http_client = create_shared_client();

    let gateway = get_gateway(&config, http_client.clone());
    if gateway.is_none() {
        warn!("AI endpoints will answer 503 until GEMINI_API_KEY is set");
    }
    let mailer = get_mailer(&config, http_client);

    let state = AppState::new(gateway, mailer, config.contact);
    let app = web::create_router(state);

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("chatgate listening on http://{}", addr);
    println!("chatgate listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
