pub mod chat;
pub mod health;
pub mod leads;
pub mod quotes;

use axum::{
    routing::{get, patch, post},
    Router,
};
use std::sync::Arc;

use crate::app::AppState;

/// Build the API router with all routes
pub fn api_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health::health_check))
        // Pricing
        .route("/materials", get(quotes::list_materials))
        .route("/quote-preview", post(quotes::quote_preview))
        // Leads
        .route("/leads", post(leads::create_lead))
        .route("/leads", get(leads::list_leads))
        .route("/leads/:lead_id", get(leads::get_lead))
        .route("/leads/:lead_id", patch(leads::annotate_lead))
        // Chat widget relay
        .route("/chat", post(chat::chat))
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Arc;

    use crate::app::AppState;
    use crate::config::{Environment, Settings};
    use crate::pricing::{BusinessRules, PriceCatalog};
    use crate::services::{AiClient, EmailClient, SheetsClient};
    use crate::store::MemStore;

    /// State wired to an unroutable AI endpoint so upstream calls fail
    /// fast without touching the network; sheets and email are left
    /// unconfigured and skip themselves.
    pub fn state() -> Arc<AppState> {
        let settings = Settings {
            env: Environment::Dev,
            server_addr: "127.0.0.1:0".to_string(),
            cors_allow_origins: Vec::new(),
            ai_base_url: "http://127.0.0.1:9".to_string(),
            ai_api_key: Some("test-key".to_string()),
            ai_model: "test-model".to_string(),
            ai_timeout_seconds: 1,
            sheets_api_key: None,
            sheets_spreadsheet_id: None,
            email_gateway_url: None,
            email_from: "noreply@test.example".to_string(),
            sales_inbox: "sales@test.example".to_string(),
            catalog_url: None,
            installation_surcharge: 500.0,
            rush_percent: 30.0,
            minimum_order: 800.0,
            notification_timeout_seconds: 1,
        };

        let ai = AiClient::new(
            &settings.ai_base_url,
            settings.ai_api_key.clone(),
            &settings.ai_model,
            settings.ai_timeout_seconds,
        )
        .unwrap();
        let sheets = SheetsClient::new(None, None, 1).unwrap();
        let email = EmailClient::new(None, &settings.email_from, &settings.sales_inbox, 1).unwrap();

        AppState::new(
            settings,
            PriceCatalog::default(),
            BusinessRules::default(),
            Arc::new(MemStore::new()),
            ai,
            sheets,
            email,
        )
    }
}
