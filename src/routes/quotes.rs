//! Quote preview and catalog routes
//!
//! Ephemeral pricing for UI feedback: nothing here persists, classifies,
//! or notifies.

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::app::AppState;
use crate::domain::quotes::{JobSpecification, Quote, QuotePreviewRequest};
use crate::error::{ApiError, ApiResult};
use crate::pricing::{compute_quote, CatalogEntry};

/// GET /materials
///
/// The price catalog in stable display order.
pub async fn list_materials(State(state): State<Arc<AppState>>) -> Json<Vec<CatalogEntry>> {
    Json(state.catalog.entries().to_vec())
}

/// POST /quote-preview
///
/// Compute a quote from a partial job specification. Piece count defaults
/// to 1; material, width and height must be present and positive.
pub async fn quote_preview(
    State(state): State<Arc<AppState>>,
    Json(req): Json<QuotePreviewRequest>,
) -> ApiResult<Json<Quote>> {
    let material = req.material.as_deref().filter(|m| !m.trim().is_empty());
    let (Some(material), Some(width), Some(height)) = (material, req.width, req.height) else {
        return Err(ApiError::bad_request(
            "Material, width and height are required for a quote preview",
        ));
    };
    if width <= 0.0 || height <= 0.0 {
        return Err(ApiError::bad_request(
            "Width and height must be positive for a quote preview",
        ));
    }

    let spec = JobSpecification {
        material: material.to_string(),
        width,
        height,
        piece_count: req.piece_count.unwrap_or(1),
        installation: req.installation,
        rush: req.rush,
    };

    let quote = compute_quote(&spec, &state.catalog, &state.rules)?;

    tracing::debug!(
        material = %spec.material,
        total = quote.total,
        "Quote preview computed"
    );

    Ok(Json(quote))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::testing;

    fn preview(material: Option<&str>, width: Option<f64>, height: Option<f64>) -> QuotePreviewRequest {
        QuotePreviewRequest {
            material: material.map(str::to_string),
            width,
            height,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn piece_count_defaults_to_one() {
        let state = testing::state();
        let Json(quote) = quote_preview(
            State(state),
            Json(preview(Some("lona"), Some(2.0), Some(1.5))),
        )
        .await
        .unwrap();

        assert_eq!(quote.area, 3.0);
        assert_eq!(quote.subtotal, 360.0);
        assert_eq!(quote.total, 800.0);
    }

    #[tokio::test]
    async fn missing_fields_are_rejected_before_calculation() {
        let state = testing::state();
        let cases = [
            preview(None, Some(1.0), Some(1.0)),
            preview(Some("lona"), None, Some(1.0)),
            preview(Some("lona"), Some(1.0), None),
            preview(Some("  "), Some(1.0), Some(1.0)),
            preview(Some("lona"), Some(0.0), Some(1.0)),
            preview(Some("lona"), Some(1.0), Some(-1.0)),
        ];

        for req in cases {
            let result = quote_preview(State(state.clone()), Json(req)).await;
            assert!(matches!(result, Err(ApiError::BadRequest(_))));
        }
    }

    #[tokio::test]
    async fn unknown_material_is_a_bad_request() {
        let state = testing::state();
        let result = quote_preview(
            State(state),
            Json(preview(Some("cardboard"), Some(1.0), Some(1.0))),
        )
        .await;

        assert!(matches!(result, Err(ApiError::BadRequest(_))));
    }

    #[tokio::test]
    async fn materials_are_listed_in_catalog_order() {
        let Json(entries) = list_materials(State(testing::state())).await;
        let ids: Vec<&str> = entries.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["lona", "vinil", "microperforado", "pvc", "acrilico"]);
    }
}
