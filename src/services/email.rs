//! Sales-inbox notification for new leads.
//!
//! Sends an HTML summary through an HTTP email gateway that accepts
//! `{to, from, subject, html}`. Best-effort, fire-and-forget, same policy
//! as the spreadsheet export.

use anyhow::{Context, Result};
use reqwest::Client;
use std::time::Duration;

use crate::domain::leads::{InterestLevel, Lead};

#[derive(Clone)]
pub struct EmailClient {
    client: Client,
    gateway_url: Option<String>,
    from: String,
    sales_inbox: String,
}

impl EmailClient {
    pub fn new(
        gateway_url: Option<String>,
        from: &str,
        sales_inbox: &str,
        timeout_seconds: u64,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            gateway_url,
            from: from.to_string(),
            sales_inbox: sales_inbox.to_string(),
        })
    }

    pub fn is_configured(&self) -> bool {
        self.gateway_url.is_some()
    }

    pub async fn send_lead_notification(&self, lead: &Lead) -> Result<()> {
        let Some(gateway_url) = &self.gateway_url else {
            tracing::debug!(lead_id = %lead.id, "Email gateway not configured, skipping");
            return Ok(());
        };

        let payload = serde_json::json!({
            "to": self.sales_inbox,
            "from": self.from,
            "subject": format!("New lead - {} - ${:.0}", lead.material, lead.quote_total),
            "html": render_lead_email(lead),
        });

        self.client
            .post(gateway_url)
            .json(&payload)
            .send()
            .await
            .context("Email gateway request failed")?
            .error_for_status()
            .context("Email gateway returned an error")?;

        tracing::info!(lead_id = %lead.id, "Lead notification email sent");
        Ok(())
    }
}

fn interest_label(level: InterestLevel) -> &'static str {
    match level {
        InterestLevel::High => "HIGH",
        InterestLevel::Medium => "MEDIUM",
        InterestLevel::Low => "LOW",
    }
}

fn render_lead_email(lead: &Lead) -> String {
    let area = lead.width * lead.height * lead.piece_count as f64;
    let comments = lead
        .comments
        .as_deref()
        .map(|c| format!("<h2>Customer comments</h2><blockquote>{}</blockquote>", c))
        .unwrap_or_default();
    let reasoning = lead
        .classification_reasoning
        .as_deref()
        .map(|r| format!("<p><strong>Analysis:</strong> {}</p>", r))
        .unwrap_or_default();

    format!(
        r#"<html>
<body>
  <h1>New lead</h1>
  <p>Quote: ${total:.0} | Interest: <strong>{interest}</strong></p>

  <h2>Customer</h2>
  <table>
    <tr><th>Name</th><td>{name}</td></tr>
    <tr><th>Contact</th><td>{contact}</td></tr>
    <tr><th>Date</th><td>{created_at}</td></tr>
  </table>

  <h2>Project</h2>
  <table>
    <tr><th>Material</th><td>{material}</td></tr>
    <tr><th>Dimensions</th><td>{width}m × {height}m</td></tr>
    <tr><th>Total area</th><td>{area:.2} m²</td></tr>
    <tr><th>Pieces</th><td>{pieces}</td></tr>
    <tr><th>Installation</th><td>{installation}</td></tr>
    <tr><th>24h rush</th><td>{rush}</td></tr>
  </table>

  {comments}

  <h2>AI analysis</h2>
  <p><strong>Interest level:</strong> {interest}</p>
  {reasoning}

  <h3>Final quote: ${total:.0}</h3>
  <p>Estimated delivery: {delivery}</p>
</body>
</html>"#,
        total = lead.quote_total,
        interest = interest_label(lead.interest_level),
        name = lead.name,
        contact = lead.contact,
        created_at = lead.created_at.to_rfc3339(),
        material = lead.material,
        width = lead.width,
        height = lead.height,
        area = area,
        pieces = lead.piece_count,
        installation = if lead.installation { "yes" } else { "no" },
        rush = if lead.rush { "yes" } else { "no" },
        comments = comments,
        reasoning = reasoning,
        delivery = if lead.rush { "24 hours" } else { "3-5 business days" },
    )
}
