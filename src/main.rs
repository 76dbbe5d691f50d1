mod app;
mod config;
mod domain;
mod error;
mod logging;
mod pricing;
mod routes;
mod services;
mod store;

use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;

use pricing::PriceCatalog;
use services::{AiClient, EmailClient, SheetsClient};
use store::{LeadStore, MemStore};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let settings = config::Settings::from_env()?;

    // Initialize logging
    logging::init_logging(&settings.env);

    tracing::info!(
        env = ?settings.env,
        server_addr = %settings.server_addr,
        "Starting printworks backend"
    );

    // Load the price catalog once, before serving traffic
    let catalog = match &settings.catalog_url {
        Some(url) => PriceCatalog::fetch(url, Duration::from_secs(10)).await?,
        None => PriceCatalog::default(),
    };
    let rules = settings.business_rules();

    // AI client (lead classification + chat relay)
    let ai = AiClient::new(
        &settings.ai_base_url,
        settings.ai_api_key.clone(),
        &settings.ai_model,
        settings.ai_timeout_seconds,
    )?;

    // Optionally check AI service reachability (non-blocking)
    if ai.is_configured() {
        tokio::spawn({
            let ai = ai.clone();
            async move {
                match ai.health_check().await {
                    Ok(()) => tracing::info!("AI service is reachable"),
                    Err(e) => tracing::warn!(error = %e, "AI service health check failed - submissions will fall back to default classification"),
                }
            }
        });
    } else {
        tracing::warn!("No AI API key configured - classification and chat will use fallbacks");
    }

    // Notification clients
    let sheets = SheetsClient::new(
        settings.sheets_api_key.clone(),
        settings.sheets_spreadsheet_id.clone(),
        settings.notification_timeout_seconds,
    )?;
    let email = EmailClient::new(
        settings.email_gateway_url.clone(),
        &settings.email_from,
        &settings.sales_inbox,
        settings.notification_timeout_seconds,
    )?;

    // In-memory lead store; swap behind the trait for a durable backend
    let store: Arc<dyn LeadStore> = Arc::new(MemStore::new());

    // Create application state
    let state = app::AppState::new(settings.clone(), catalog, rules, store, ai, sheets, email);

    // Build application
    let app = app::create_app(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&settings.server_addr).await?;
    tracing::info!("Listening on {}", settings.server_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
