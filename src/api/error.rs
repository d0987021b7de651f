//! API error types with `{ "mensaje": ... }` JSON responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::api::types::MessageBody;
use crate::db::StorageError;

/// Which storage operation failed; selects the client-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageOp {
    Save,
    List,
    Purge,
}

impl StorageOp {
    pub fn message(self) -> &'static str {
        match self {
            StorageOp::Save => "Error al guardar los datos",
            StorageOp::List => "Error al obtener datos",
            StorageOp::Purge => "Error al borrar los datos",
        }
    }
}

/// API-level errors with HTTP status mapping.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Invalid request: {0}")]
    BadRequest(String),
    #[error("Storage failure ({op:?}): {source}")]
    Storage {
        op: StorageOp,
        #[source]
        source: StorageError,
    },
}

impl ApiError {
    pub fn storage(op: StorageOp) -> impl FnOnce(StorageError) -> ApiError {
        move |source| ApiError::Storage { op, source }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, mensaje) = match &self {
            ApiError::BadRequest(detail) => {
                tracing::warn!(detail, "Rejected request body");
                (StatusCode::BAD_REQUEST, format!("Datos inválidos: {detail}"))
            }
            ApiError::Storage { op, source } => {
                // Detail stays in the log; the client gets the fixed message.
                tracing::error!(op = ?op, error = %source, "Storage operation failed");
                (StatusCode::INTERNAL_SERVER_ERROR, op.message().to_string())
            }
        };

        (status, Json(MessageBody { mensaje })).into_response()
    }
}
