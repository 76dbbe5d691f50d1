use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;

use crate::app::AppState;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
    pub dependency_status: DependencyStatus,
}

#[derive(Serialize)]
pub struct DependencyStatus {
    pub storage: &'static str,
    pub classifier: &'static str,
    pub spreadsheet: &'static str,
    pub email: &'static str,
}

fn configured(is: bool) -> &'static str {
    if is {
        "configured"
    } else {
        "missing"
    }
}

/// Health check endpoint - public, never fails.
///
/// Reports configuration state only; no network probes on the request
/// path.
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        timestamp: Utc::now(),
        dependency_status: DependencyStatus {
            storage: "active",
            classifier: configured(state.ai.is_configured()),
            spreadsheet: configured(state.sheets.is_configured()),
            email: configured(state.email.is_configured()),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::testing;

    #[tokio::test]
    async fn health_always_reports_ok() {
        let Json(payload) = health_check(State(testing::state())).await;

        assert_eq!(payload.status, "ok");
        assert_eq!(payload.dependency_status.storage, "active");
        assert_eq!(payload.dependency_status.classifier, "configured");
        assert_eq!(payload.dependency_status.spreadsheet, "missing");
        assert_eq!(payload.dependency_status.email, "missing");
    }
}
