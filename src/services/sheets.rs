//! Spreadsheet export of persisted leads.
//!
//! Appends one row per lead to a Google Sheets document. Best-effort and
//! fire-and-forget: callers spawn this after the response is determined
//! and only log failures.

use anyhow::{Context, Result};
use reqwest::Client;
use std::time::Duration;

use crate::domain::leads::Lead;

#[derive(Clone)]
pub struct SheetsClient {
    client: Client,
    api_key: Option<String>,
    spreadsheet_id: Option<String>,
}

impl SheetsClient {
    pub fn new(
        api_key: Option<String>,
        spreadsheet_id: Option<String>,
        timeout_seconds: u64,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            api_key,
            spreadsheet_id,
        })
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some() && self.spreadsheet_id.is_some()
    }

    pub async fn append_lead(&self, lead: &Lead) -> Result<()> {
        let (Some(api_key), Some(spreadsheet_id)) = (&self.api_key, &self.spreadsheet_id) else {
            tracing::debug!(lead_id = %lead.id, "Sheets export not configured, skipping");
            return Ok(());
        };

        let row = serde_json::json!([
            lead.name,
            lead.contact,
            lead.material,
            format!("{}x{}", lead.width, lead.height),
            lead.piece_count,
            if lead.installation { "yes" } else { "no" },
            if lead.rush { "yes" } else { "no" },
            format!("${:.0}", lead.quote_total),
            serde_json::to_value(lead.interest_level)?,
            lead.comments.as_deref().unwrap_or(""),
            lead.created_at.to_rfc3339(),
            lead.classification_reasoning.as_deref().unwrap_or(""),
        ]);

        let url = format!(
            "https://sheets.googleapis.com/v4/spreadsheets/{}/values/Leads:append?valueInputOption=RAW&key={}",
            spreadsheet_id, api_key
        );

        self.client
            .post(&url)
            .json(&serde_json::json!({ "values": [row] }))
            .send()
            .await
            .context("Sheets append request failed")?
            .error_for_status()
            .context("Sheets API returned an error")?;

        tracing::info!(lead_id = %lead.id, "Lead appended to spreadsheet");
        Ok(())
    }
}
