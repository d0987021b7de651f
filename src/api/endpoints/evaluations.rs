//! Evaluation history endpoints.
//!
//! `GET /api/evaluaciones` — every stored evaluation, newest first.
//! `DELETE /api/evaluaciones` — purge the whole history.

use axum::extract::State;
use axum::Json;

use crate::api::error::{ApiError, StorageOp};
use crate::api::types::{ApiContext, MessageBody};
use crate::models::EvaluationRecord;

pub const PURGE_CONFIRMATION: &str = "Datos eliminados correctamente";

/// `GET /api/evaluaciones` — unpaginated history.
pub async fn list(
    State(ctx): State<ApiContext>,
) -> Result<Json<Vec<EvaluationRecord>>, ApiError> {
    let records = ctx
        .store
        .list_all()
        .await
        .map_err(ApiError::storage(StorageOp::List))?;
    tracing::debug!(count = records.len(), "Listed evaluations");
    Ok(Json(records))
}

/// `DELETE /api/evaluaciones` — remove every evaluation.
pub async fn purge(State(ctx): State<ApiContext>) -> Result<Json<MessageBody>, ApiError> {
    let removed = ctx
        .store
        .delete_all()
        .await
        .map_err(ApiError::storage(StorageOp::Purge))?;
    tracing::info!(removed, "Evaluation history purged");
    Ok(Json(MessageBody::new(PURGE_CONFIRMATION)))
}
