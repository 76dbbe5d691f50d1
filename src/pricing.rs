//! Price catalog, business rules, and the quotation engine.
//!
//! The engine is a pure function: `(JobSpecification, PriceCatalog,
//! BusinessRules) -> Quote`. Surcharge order is part of the business
//! contract and is pinned by tests — installation is a flat addition to
//! the base amount, the rush percentage then inflates the whole total
//! (installation included), and the minimum-order floor applies last.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::domain::quotes::{JobSpecification, Quote};

/// One material the shop prints on, priced per square meter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    pub id: String,
    pub display_name: String,
    pub unit_price: f64,
}

/// Material identifier -> unit price mapping.
///
/// Vec-backed so the UI sees a stable insertion order; five-entry linear
/// lookup is not worth a map.
#[derive(Debug, Clone)]
pub struct PriceCatalog {
    entries: Vec<CatalogEntry>,
}

impl PriceCatalog {
    pub fn new(entries: Vec<CatalogEntry>) -> Self {
        Self { entries }
    }

    pub fn get(&self, id: &str) -> Option<&CatalogEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// Fetch the catalog from a remote configuration endpoint. Done once at
    /// startup, before serving traffic; the result is immutable afterwards.
    pub async fn fetch(url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client for catalog fetch")?;

        let entries: Vec<CatalogEntry> = client
            .get(url)
            .send()
            .await
            .context("Catalog fetch failed")?
            .error_for_status()
            .context("Catalog endpoint returned an error")?
            .json()
            .await
            .context("Catalog response was not valid JSON")?;

        anyhow::ensure!(!entries.is_empty(), "Remote catalog is empty");
        for entry in &entries {
            anyhow::ensure!(
                entry.unit_price > 0.0,
                "Material '{}' has a non-positive unit price",
                entry.id
            );
        }

        tracing::info!(materials = entries.len(), url = %url, "Remote price catalog loaded");
        Ok(Self::new(entries))
    }
}

impl Default for PriceCatalog {
    /// Built-in catalog used when no remote configuration is given.
    fn default() -> Self {
        let entry = |id: &str, name: &str, price: f64| CatalogEntry {
            id: id.to_string(),
            display_name: name.to_string(),
            unit_price: price,
        };
        Self::new(vec![
            entry("lona", "Lona", 120.0),
            entry("vinil", "Vinil", 180.0),
            entry("microperforado", "Microperforado", 220.0),
            entry("pvc", "PVC", 280.0),
            entry("acrilico", "Acrílico", 350.0),
        ])
    }
}

/// Process-wide pricing constants, loaded once at startup and immutable
/// thereafter.
#[derive(Debug, Clone, Copy)]
pub struct BusinessRules {
    /// Flat surcharge for professional installation.
    pub installation_surcharge: f64,
    /// Percentage added for 24-hour rush delivery (30 means +30%).
    pub rush_percent: f64,
    /// Lowest total the shop will quote, regardless of job size.
    pub minimum_order: f64,
}

impl Default for BusinessRules {
    fn default() -> Self {
        Self {
            installation_surcharge: 500.0,
            rush_percent: 30.0,
            minimum_order: 800.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuoteError {
    #[error("Unknown material: {0}")]
    InvalidMaterial(String),

    #[error("Width, height and piece count must be positive")]
    InvalidDimensions,
}

/// Compute a quote for a fully-specified job.
///
/// Pure and referentially transparent: identical inputs produce
/// bit-identical output. `area` and `subtotal` keep full precision; only
/// `total` is rounded to the nearest whole currency unit.
pub fn compute_quote(
    spec: &JobSpecification,
    catalog: &PriceCatalog,
    rules: &BusinessRules,
) -> Result<Quote, QuoteError> {
    if spec.width <= 0.0 || spec.height <= 0.0 || spec.piece_count < 1 {
        return Err(QuoteError::InvalidDimensions);
    }

    let entry = catalog
        .get(&spec.material)
        .ok_or_else(|| QuoteError::InvalidMaterial(spec.material.clone()))?;

    let area = spec.width * spec.height * spec.piece_count as f64;
    let subtotal = area * entry.unit_price;

    let mut total = subtotal;
    if spec.installation {
        total += rules.installation_surcharge;
    }
    // Rush inflates the installation surcharge too; the order is part of
    // the contract.
    if spec.rush {
        total *= 1.0 + rules.rush_percent / 100.0;
    }
    // Floor against the post-surcharge total, never the subtotal.
    total = total.max(rules.minimum_order);

    Ok(Quote {
        material: entry.display_name.clone(),
        area,
        subtotal,
        total: total.round(),
        installation_applied: spec.installation,
        rush_applied: spec.rush,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job(material: &str, width: f64, height: f64, pieces: u32) -> JobSpecification {
        JobSpecification {
            material: material.to_string(),
            width,
            height,
            piece_count: pieces,
            installation: false,
            rush: false,
        }
    }

    fn catalog() -> PriceCatalog {
        PriceCatalog::default()
    }

    fn rules() -> BusinessRules {
        BusinessRules::default()
    }

    #[test]
    fn small_job_is_floored_to_minimum_order() {
        // 120/m², 2.0 x 1.5, one piece, no add-ons
        let quote = compute_quote(&job("lona", 2.0, 1.5, 1), &catalog(), &rules()).unwrap();

        assert_eq!(quote.material, "Lona");
        assert_eq!(quote.area, 3.0);
        assert_eq!(quote.subtotal, 360.0);
        assert_eq!(quote.total, 800.0);
        assert!(!quote.installation_applied);
        assert!(!quote.rush_applied);
    }

    #[test]
    fn installation_then_rush_then_floor() {
        // 350/m², 2x2, 3 pieces: 4200 subtotal, +500 install, *1.30 rush
        let mut spec = job("acrilico", 2.0, 2.0, 3);
        spec.installation = true;
        spec.rush = true;

        let quote = compute_quote(&spec, &catalog(), &rules()).unwrap();

        assert_eq!(quote.subtotal, 4200.0);
        assert_eq!(quote.total, 6110.0);
        assert!(quote.installation_applied);
        assert!(quote.rush_applied);
    }

    #[test]
    fn surcharge_order_is_observable() {
        // Reversing the order (rush before installation) would leave the
        // installation surcharge uninflated and give a smaller total.
        let mut spec = job("acrilico", 2.0, 2.0, 3);
        spec.installation = true;
        spec.rush = true;

        let quote = compute_quote(&spec, &catalog(), &rules()).unwrap();
        let reversed = (4200.0f64 * 1.30 + 500.0).round();

        assert_eq!(quote.total, 6110.0);
        assert_ne!(quote.total, reversed);
    }

    #[test]
    fn floor_applies_after_both_surcharges() {
        // Tiny job with both add-ons: (1.2 + 500) * 1.30 = 651.56,
        // still under the 800 floor, so the floored total wins.
        let mut spec = job("lona", 0.1, 0.1, 1);
        spec.installation = true;
        spec.rush = true;

        let quote = compute_quote(&spec, &catalog(), &rules()).unwrap();

        assert!(quote.subtotal < 2.0);
        assert_eq!(quote.total, 800.0);
    }

    #[test]
    fn total_never_below_minimum_order() {
        let r = rules();
        for entry in catalog().entries() {
            for pieces in [1u32, 2, 7] {
                let quote =
                    compute_quote(&job(&entry.id, 0.5, 0.5, pieces), &catalog(), &r).unwrap();
                assert!(quote.total >= r.minimum_order);
            }
        }
    }

    #[test]
    fn area_is_exact_floating_point_product() {
        let quote = compute_quote(&job("vinil", 1.3, 0.7, 3), &catalog(), &rules()).unwrap();
        assert_eq!(quote.area, 1.3 * 0.7 * 3.0);
        assert_eq!(quote.subtotal, 1.3 * 0.7 * 3.0 * 180.0);
    }

    #[test]
    fn identical_inputs_give_identical_quotes() {
        let mut spec = job("pvc", 1.37, 2.41, 5);
        spec.rush = true;

        let a = compute_quote(&spec, &catalog(), &rules()).unwrap();
        let b = compute_quote(&spec, &catalog(), &rules()).unwrap();

        assert_eq!(a, b);
        assert_eq!(a.total.to_bits(), b.total.to_bits());
        assert_eq!(a.subtotal.to_bits(), b.subtotal.to_bits());
    }

    #[test]
    fn unknown_material_is_rejected() {
        let err = compute_quote(&job("cardboard", 1.0, 1.0, 1), &catalog(), &rules()).unwrap_err();
        assert_eq!(err, QuoteError::InvalidMaterial("cardboard".to_string()));
    }

    #[test]
    fn non_positive_dimensions_are_rejected() {
        let cases = [
            job("lona", 0.0, 1.0, 1),
            job("lona", 1.0, -2.0, 1),
            job("lona", 1.0, 1.0, 0),
        ];
        for spec in cases {
            assert_eq!(
                compute_quote(&spec, &catalog(), &rules()).unwrap_err(),
                QuoteError::InvalidDimensions
            );
        }
    }

    #[test]
    fn minimum_dimension_is_accepted_by_the_engine() {
        let quote = compute_quote(&job("lona", 0.1, 0.1, 1), &catalog(), &rules()).unwrap();
        assert_eq!(quote.area, 0.1 * 0.1);
    }

    #[test]
    fn default_catalog_preserves_insertion_order() {
        let catalog = catalog();
        let ids: Vec<&str> = catalog.entries().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["lona", "vinil", "microperforado", "pvc", "acrilico"]);
    }
}
