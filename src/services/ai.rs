//! Client for the OpenAI-compatible chat-completions service.
//!
//! Used for two things: classifying a submitted lead's interest level and
//! relaying chat-widget messages. Both are optional enrichments; every
//! caller is expected to degrade gracefully when this client fails.

use anyhow::{Context, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::domain::leads::{LeadClassification, LeadForm};
use crate::pricing::{BusinessRules, PriceCatalog};

/// Fixed apology returned whenever the chat relay cannot produce a real
/// reply. Chat must always answer with something.
pub const FALLBACK_REPLY: &str =
    "Sorry, I couldn't process your message right now. Could you try again, or fill out the quote form above?";

#[derive(Clone)]
pub struct AiClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<serde_json::Value>,
}

#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Deserialize)]
struct CompletionMessage {
    content: Option<String>,
}

impl AiClient {
    pub fn new(
        base_url: &str,
        api_key: Option<String>,
        model: &str,
        timeout_seconds: u64,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()
            .context("Failed to create HTTP client")?;

        tracing::info!(base_url = base_url, model = model, "AI client initialized");

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            model: model.to_string(),
        })
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    async fn complete(
        &self,
        system: &str,
        user: &str,
        temperature: f32,
        max_tokens: Option<u32>,
        json_mode: bool,
    ) -> Result<String> {
        let api_key = self.api_key.as_deref().context("No AI API key configured")?;
        let url = format!("{}/v1/chat/completions", self.base_url);

        let request = CompletionRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            temperature,
            max_tokens,
            response_format: json_mode.then(|| serde_json::json!({ "type": "json_object" })),
        };

        debug!(url = %url, "AI completion request");

        let response: CompletionResponse = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .context("AI service unreachable")?
            .error_for_status()
            .context("AI service returned an error")?
            .json()
            .await
            .context("Invalid AI service response")?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .context("AI response contained no content")
    }

    /// Classify a submitted lead. Callers fall back to
    /// [`LeadClassification::fallback`] on any error here.
    pub async fn classify_lead(
        &self,
        form: &LeadForm,
        quote_total: f64,
    ) -> Result<LeadClassification> {
        let prompt = format!(
            r#"Analyze this lead for a large-format printing company and classify its interest level. Respond with JSON in this exact format:
{{
  "interestLevel": "high|medium|low",
  "reasoning": "detailed explanation",
  "recommendations": ["recommendation 1", "recommendation 2"]
}}

Lead data:
- Name: {name}
- Contact: {contact}
- Material: {material}
- Quote total: ${total}
- 24h rush: {rush}
- Installation: {installation}
- Comments: {comments}

Classification criteria:
- HIGH: quote above $2000, rush, installation, specific comments, corporate email
- MEDIUM: quote between $800 and $2000, some add-on services, complete information
- LOW: minimum-order quote, no add-ons, basic information

Provide specific recommendations for sales follow-up."#,
            name = form.name,
            contact = form.contact,
            material = form.material,
            total = quote_total,
            rush = if form.rush { "yes" } else { "no" },
            installation = if form.installation { "yes" } else { "no" },
            comments = form.comments.as_deref().unwrap_or("none"),
        );

        let content = self
            .complete(
                "You are an expert lead qualifier for a large-format printing company. Respond only with valid JSON.",
                &prompt,
                0.3,
                None,
                true,
            )
            .await?;

        serde_json::from_str(&content).context("Classifier returned malformed JSON")
    }

    /// Relay one chat-widget message and return the assistant's reply.
    /// Stateless per message; any multi-turn context lives upstream.
    pub async fn chat_reply(
        &self,
        message: &str,
        catalog: &PriceCatalog,
        rules: &BusinessRules,
    ) -> Result<String> {
        let materials = catalog
            .entries()
            .iter()
            .map(|e| format!("{} (${}/m²)", e.display_name, e.unit_price))
            .collect::<Vec<_>>()
            .join(", ");

        let prompt = format!(
            r#"You are the virtual assistant of a large-format printing shop.

Company information:
- Materials: {materials}
- Services: professional installation (+${install}), 24h rush (+{rush}%)
- Minimum order: ${minimum}

Reply in a friendly, professional tone. If the customer asks for a quote, request:
1. Material type
2. Dimensions (width x height)
3. Number of pieces
4. Whether installation is needed
5. Whether it is urgent

Customer message: "{message}"

Keep the reply under 200 characters, be helpful, and point to the web quote form when appropriate."#,
            materials = materials,
            install = rules.installation_surcharge,
            rush = rules.rush_percent,
            minimum = rules.minimum_order,
            message = message,
        );

        let reply = self
            .complete(
                "You are a friendly, professional sales assistant for a printing company.",
                &prompt,
                0.7,
                Some(150),
                false,
            )
            .await?;

        Ok(reply)
    }

    /// Cheap reachability probe, used once at startup.
    pub async fn health_check(&self) -> Result<()> {
        let api_key = self.api_key.as_deref().context("No AI API key configured")?;
        let url = format!("{}/v1/models", self.base_url);

        self.client
            .get(&url)
            .bearer_auth(api_key)
            .timeout(Duration::from_secs(5))
            .send()
            .await
            .context("AI service health check failed")?
            .error_for_status()
            .context("AI service unhealthy")?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> LeadForm {
        LeadForm {
            name: "Ana".to_string(),
            contact: "ana@example.com".to_string(),
            material: "lona".to_string(),
            width: 1.0,
            height: 1.0,
            piece_count: 1,
            installation: false,
            rush: false,
            comments: None,
        }
    }

    #[tokio::test]
    async fn unconfigured_client_fails_fast_without_network() {
        let client = AiClient::new("http://127.0.0.1:1", None, "test-model", 1).unwrap();

        assert!(!client.is_configured());
        assert!(client.classify_lead(&form(), 800.0).await.is_err());
        assert!(client
            .chat_reply("hi", &PriceCatalog::default(), &BusinessRules::default())
            .await
            .is_err());
    }

    #[test]
    fn classifier_verdict_parses_with_defaults() {
        let verdict: LeadClassification =
            serde_json::from_str(r#"{"interestLevel":"high","reasoning":"big order"}"#).unwrap();

        assert_eq!(
            verdict.interest_level,
            crate::domain::leads::InterestLevel::High
        );
        assert_eq!(verdict.reasoning, "big order");
        assert!(verdict.recommendations.is_empty());
    }
}
