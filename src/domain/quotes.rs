//! Job specification and quote types.

use serde::{Deserialize, Serialize};

/// A fully-specified print job, ready for quoting.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobSpecification {
    pub material: String,
    /// Meters.
    pub width: f64,
    /// Meters.
    pub height: f64,
    #[serde(default = "default_piece_count")]
    pub piece_count: u32,
    #[serde(default)]
    pub installation: bool,
    #[serde(default)]
    pub rush: bool,
}

fn default_piece_count() -> u32 {
    1
}

/// Request DTO for an ephemeral quote preview. Everything is optional on
/// the wire; the handler decides when enough is present to calculate.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotePreviewRequest {
    pub material: Option<String>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub piece_count: Option<u32>,
    #[serde(default)]
    pub installation: bool,
    #[serde(default)]
    pub rush: bool,
}

/// Computed pricing result. All fields are derived, never settable.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    /// Display name of the material, not its identifier.
    pub material: String,
    /// Square meters, full precision.
    pub area: f64,
    /// Pre-surcharge amount, full precision.
    pub subtotal: f64,
    /// Final amount: surcharges applied, floored, rounded to a whole unit.
    pub total: f64,
    pub installation_applied: bool,
    pub rush_applied: bool,
}
