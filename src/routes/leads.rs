//! Lead routes
//!
//! Submission, listing, and later annotation of sales leads.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::app::AppState;
use crate::domain::leads::{
    Lead, LeadAnnotation, LeadClassification, LeadForm, LeadSubmissionResponse, NewLead,
};
use crate::error::{ApiError, ApiResult};
use crate::pricing::compute_quote;

/// POST /leads
///
/// Validate, quote, classify, persist, notify. The classifier is an
/// optional enrichment: its failure substitutes a default classification
/// and never blocks lead capture. Notifications run detached after the
/// lead is persisted.
pub async fn create_lead(
    State(state): State<Arc<AppState>>,
    Json(form): Json<LeadForm>,
) -> ApiResult<(StatusCode, Json<LeadSubmissionResponse>)> {
    let errors = form.validate(&state.catalog);
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }

    let quote = compute_quote(&form.job_spec(), &state.catalog, &state.rules)?;

    let classification = match state.ai.classify_lead(&form, quote.total).await {
        Ok(classification) => classification,
        Err(e) => {
            tracing::warn!(error = %e, "Lead classification failed, using fallback");
            LeadClassification::fallback()
        }
    };

    let lead = state.store.create(NewLead {
        name: form.name,
        contact: form.contact,
        material: form.material,
        width: form.width,
        height: form.height,
        piece_count: form.piece_count,
        installation: form.installation,
        rush: form.rush,
        comments: form.comments,
        quote_total: quote.total,
        interest_level: classification.interest_level,
        classification_reasoning: Some(classification.reasoning),
    })?;

    tracing::info!(
        lead_id = %lead.id,
        total = lead.quote_total,
        interest_level = ?lead.interest_level,
        "Lead created"
    );

    spawn_notifications(&state, lead.clone());

    Ok((
        StatusCode::CREATED,
        Json(LeadSubmissionResponse {
            id: lead.id,
            total: lead.quote_total,
            interest_level: lead.interest_level,
            recommendations: classification.recommendations,
        }),
    ))
}

/// Fire the spreadsheet and email side effects as independent detached
/// tasks. Best-effort, at-most-once: failures are logged and never roll
/// back the persisted lead.
fn spawn_notifications(state: &Arc<AppState>, lead: Lead) {
    let sheets = state.sheets.clone();
    let sheets_lead = lead.clone();
    tokio::spawn(async move {
        if let Err(e) = sheets.append_lead(&sheets_lead).await {
            tracing::warn!(lead_id = %sheets_lead.id, error = %e, "Spreadsheet append failed");
        }
    });

    let email = state.email.clone();
    tokio::spawn(async move {
        if let Err(e) = email.send_lead_notification(&lead).await {
            tracing::warn!(lead_id = %lead.id, error = %e, "Email notification failed");
        }
    });
}

/// GET /leads
///
/// All persisted leads, newest first.
pub async fn list_leads(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<Lead>>> {
    let leads = state.store.list()?;
    Ok(Json(leads))
}

/// GET /leads/:lead_id
pub async fn get_lead(
    State(state): State<Arc<AppState>>,
    Path(lead_id): Path<Uuid>,
) -> ApiResult<Json<Lead>> {
    state
        .store
        .get(lead_id)?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Lead not found"))
}

/// PATCH /leads/:lead_id
///
/// Annotate a lead after the fact, e.g. a manually corrected
/// classification. The form itself never re-submits.
pub async fn annotate_lead(
    State(state): State<Arc<AppState>>,
    Path(lead_id): Path<Uuid>,
    Json(annotation): Json<LeadAnnotation>,
) -> ApiResult<Json<Lead>> {
    let updated = state
        .store
        .annotate(lead_id, annotation)?
        .ok_or_else(|| ApiError::not_found("Lead not found"))?;

    tracing::info!(lead_id = %lead_id, "Lead annotated");
    Ok(Json(updated))
}
