use anyhow::Result;
use std::env;

use crate::pricing::BusinessRules;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Dev,
    Staging,
    Prod,
}

impl Environment {
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "prod" | "production" => Self::Prod,
            "staging" => Self::Staging,
            _ => Self::Dev,
        }
    }

    pub fn is_dev(&self) -> bool {
        matches!(self, Self::Dev)
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub env: Environment,
    pub server_addr: String,

    // CORS
    pub cors_allow_origins: Vec<String>,

    // AI service (classification + chat relay)
    pub ai_base_url: String,
    pub ai_api_key: Option<String>,
    pub ai_model: String,
    pub ai_timeout_seconds: u64,

    // Spreadsheet export
    pub sheets_api_key: Option<String>,
    pub sheets_spreadsheet_id: Option<String>,

    // Email notification
    pub email_gateway_url: Option<String>,
    pub email_from: String,
    pub sales_inbox: String,

    // Pricing
    pub catalog_url: Option<String>,
    pub installation_surcharge: f64,
    pub rush_percent: f64,
    pub minimum_order: f64,

    // Fire-and-forget side effects
    pub notification_timeout_seconds: u64,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        let env = Environment::from_str(&env::var("ENV").unwrap_or_else(|_| "dev".to_string()));
        let server_addr = env::var("SERVER_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

        // CORS
        let cors_allow_origins = env::var("CORS_ALLOW_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3000".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        // AI service
        let ai_base_url =
            env::var("AI_BASE_URL").unwrap_or_else(|_| "https://api.openai.com".to_string());
        let ai_api_key = env::var("OPENAI_API_KEY").ok().filter(|s| !s.is_empty());
        let ai_model = env::var("AI_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string());
        // Short deadline: the submission flow must reach its fallback
        // promptly when the classifier stalls
        let ai_timeout_seconds = parse_or("AI_TIMEOUT_SECONDS", 8);

        // Spreadsheet export
        let sheets_api_key = env::var("SHEETS_API_KEY").ok().filter(|s| !s.is_empty());
        let sheets_spreadsheet_id = env::var("SHEETS_SPREADSHEET_ID")
            .ok()
            .filter(|s| !s.is_empty());

        // Email notification
        let email_gateway_url = env::var("EMAIL_GATEWAY_URL").ok().filter(|s| !s.is_empty());
        let email_from =
            env::var("EMAIL_FROM").unwrap_or_else(|_| "noreply@printworks.example".to_string());
        let sales_inbox =
            env::var("SALES_INBOX").unwrap_or_else(|_| "sales@printworks.example".to_string());

        // Pricing: built-in catalog unless a remote one is configured;
        // rule constants are overridable per deployment
        let catalog_url = env::var("CATALOG_URL").ok().filter(|s| !s.is_empty());
        let installation_surcharge = parse_or("INSTALLATION_SURCHARGE", 500.0);
        let rush_percent = parse_or("RUSH_PERCENT", 30.0);
        let minimum_order = parse_or("MINIMUM_ORDER", 800.0);

        let notification_timeout_seconds = parse_or("NOTIFICATION_TIMEOUT_SECONDS", 10);

        Ok(Settings {
            env,
            server_addr,
            cors_allow_origins,
            ai_base_url,
            ai_api_key,
            ai_model,
            ai_timeout_seconds,
            sheets_api_key,
            sheets_spreadsheet_id,
            email_gateway_url,
            email_from,
            sales_inbox,
            catalog_url,
            installation_surcharge,
            rush_percent,
            minimum_order,
            notification_timeout_seconds,
        })
    }

    pub fn business_rules(&self) -> BusinessRules {
        BusinessRules {
            installation_surcharge: self.installation_surcharge,
            rush_percent: self.rush_percent,
            minimum_order: self.minimum_order,
        }
    }
}

fn parse_or<T: std::str::FromStr>(var: &str, default: T) -> T {
    env::var(var)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}
