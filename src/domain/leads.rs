//! Lead entity and DTOs.
//!
//! A lead is a persisted record of a submitted job specification plus
//! contact details, enriched with an LLM interest classification.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::quotes::JobSpecification;
use crate::error::FieldError;
use crate::pricing::PriceCatalog;

/// How promising the sales team should consider a lead.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterestLevel {
    High,
    #[default]
    Medium,
    Low,
}

/// Lead entity
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    pub id: Uuid,
    pub name: String,
    pub contact: String,
    pub material: String,
    pub width: f64,
    pub height: f64,
    pub piece_count: u32,
    pub installation: bool,
    pub rush: bool,
    pub comments: Option<String>,
    pub quote_total: f64,
    pub interest_level: InterestLevel,
    /// Classifier reasoning, kept for internal review only; never returned
    /// on the submission response.
    pub classification_reasoning: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Fields for a lead about to be persisted; the store assigns the
/// identifier and the creation timestamp.
#[derive(Debug, Clone)]
pub struct NewLead {
    pub name: String,
    pub contact: String,
    pub material: String,
    pub width: f64,
    pub height: f64,
    pub piece_count: u32,
    pub installation: bool,
    pub rush: bool,
    pub comments: Option<String>,
    pub quote_total: f64,
    pub interest_level: InterestLevel,
    pub classification_reasoning: Option<String>,
}

/// Request DTO for lead submission.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadForm {
    pub name: String,
    pub contact: String,
    pub material: String,
    pub width: f64,
    pub height: f64,
    #[serde(default = "default_piece_count")]
    pub piece_count: u32,
    #[serde(default)]
    pub installation: bool,
    #[serde(default)]
    pub rush: bool,
    #[serde(default)]
    pub comments: Option<String>,
}

fn default_piece_count() -> u32 {
    1
}

impl LeadForm {
    /// Itemized per-field validation. The quotation engine re-checks
    /// dimensions defensively, but this is the authoritative gate.
    pub fn validate(&self, catalog: &PriceCatalog) -> Vec<FieldError> {
        let mut errors = Vec::new();

        if self.name.trim().chars().count() < 2 {
            errors.push(FieldError::new(
                "name",
                "Name must be at least 2 characters",
            ));
        }
        if self.contact.trim().chars().count() < 5 {
            errors.push(FieldError::new(
                "contact",
                "Enter a valid email or phone number",
            ));
        }
        if catalog.get(&self.material).is_none() {
            errors.push(FieldError::new("material", "Select a valid material"));
        }
        if self.width < 0.1 {
            errors.push(FieldError::new(
                "width",
                "Width must be at least 0.1 meters",
            ));
        }
        if self.height < 0.1 {
            errors.push(FieldError::new(
                "height",
                "Height must be at least 0.1 meters",
            ));
        }
        if self.piece_count < 1 {
            errors.push(FieldError::new("pieceCount", "At least 1 piece required"));
        }

        errors
    }

    pub fn job_spec(&self) -> JobSpecification {
        JobSpecification {
            material: self.material.clone(),
            width: self.width,
            height: self.height,
            piece_count: self.piece_count,
            installation: self.installation,
            rush: self.rush,
        }
    }
}

/// Request DTO for a later annotation, e.g. a corrected classification.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadAnnotation {
    #[serde(default)]
    pub interest_level: Option<InterestLevel>,
    #[serde(default)]
    pub classification_reasoning: Option<String>,
}

/// Verdict from the external classifier.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadClassification {
    #[serde(default)]
    pub interest_level: InterestLevel,
    #[serde(default = "fallback_reasoning")]
    pub reasoning: String,
    #[serde(default)]
    pub recommendations: Vec<String>,
}

fn fallback_reasoning() -> String {
    "Automatic classification".to_string()
}

impl LeadClassification {
    /// Substitute when the classifier is unreachable or malformed; lead
    /// capture is never blocked by the enrichment step.
    pub fn fallback() -> Self {
        Self {
            interest_level: InterestLevel::Medium,
            reasoning: fallback_reasoning(),
            recommendations: Vec::new(),
        }
    }
}

/// Response DTO for a successful submission.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadSubmissionResponse {
    pub id: Uuid,
    pub total: f64,
    pub interest_level: InterestLevel,
    pub recommendations: Vec<String>,
}
