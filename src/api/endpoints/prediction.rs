//! Risk prediction endpoint.
//!
//! `POST /api/prediction` (alias `POST /api/evaluacion`) — score a
//! submission, persist it with its result, return the result.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;

use crate::api::error::{ApiError, StorageOp};
use crate::api::types::ApiContext;
use crate::models::{NewEvaluation, PatientMetrics, RiskAssessment};
use crate::scoring;

/// Score and store one submission.
///
/// A body that does not decode into `PatientMetrics` is rejected with 400
/// and nothing is stored. The result is only returned once it is persisted.
pub async fn predict(
    State(ctx): State<ApiContext>,
    payload: Result<Json<PatientMetrics>, JsonRejection>,
) -> Result<Json<RiskAssessment>, ApiError> {
    let Json(metrics) = payload.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;

    let assessment = scoring::score(&metrics);
    let evaluation = NewEvaluation {
        metrics,
        assessment,
    };

    let id = ctx
        .store
        .insert(&evaluation)
        .await
        .map_err(ApiError::storage(StorageOp::Save))?;

    tracing::info!(
        id,
        level = %evaluation.assessment.level,
        risk_score = evaluation.assessment.risk_score,
        factors = ?scoring::triggered_rules(&evaluation.metrics),
        "Evaluation stored"
    );

    Ok(Json(evaluation.assessment))
}
