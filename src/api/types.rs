//! Shared types for the API layer.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::db::EvaluationStore;

/// Shared context for all API routes.
///
/// Holds the storage adapter chosen at startup for the whole process
/// lifetime. Cloning is cheap.
#[derive(Clone)]
pub struct ApiContext {
    pub store: Arc<dyn EvaluationStore>,
}

impl ApiContext {
    pub fn new(store: Arc<dyn EvaluationStore>) -> Self {
        Self { store }
    }
}

/// `{ "mensaje": ... }` body used for confirmations and errors alike.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageBody {
    pub mensaje: String,
}

impl MessageBody {
    pub fn new(mensaje: impl Into<String>) -> Self {
        Self {
            mensaje: mensaje.into(),
        }
    }
}
