pub mod postgres;
pub mod sqlite;

pub use postgres::PostgresStore;
pub use sqlite::SqliteStore;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::StorageBackend;
use crate::models::{EvaluationRecord, NewEvaluation};

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("PostgreSQL error: {0}")]
    Postgres(#[from] tokio_postgres::Error),

    #[error("Connection pool error: {0}")]
    Pool(#[from] deadpool_postgres::PoolError),

    #[error("Connection pool could not be created: {0}")]
    PoolCreate(#[from] deadpool_postgres::CreatePoolError),

    #[error("Storage configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid enum value for {field}: {value}")]
    InvalidEnum { field: String, value: String },

    #[error("Storage lock poisoned")]
    LockPoisoned,

    #[error("Blocking storage task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Persistence contract shared by every backend.
///
/// Records are append-only: there is no per-record update or delete,
/// only a bulk purge.
#[async_trait]
pub trait EvaluationStore: Send + Sync {
    /// Short backend name for logs and the health endpoint.
    fn backend(&self) -> &'static str;

    /// Create the evaluations table if missing. Safe to call on every start.
    async fn init_schema(&self) -> Result<(), StorageError>;

    /// Append one scored evaluation; returns the store-assigned id.
    async fn insert(&self, evaluation: &NewEvaluation) -> Result<i64, StorageError>;

    /// Every record, newest first.
    async fn list_all(&self) -> Result<Vec<EvaluationRecord>, StorageError>;

    /// Remove every record; returns how many were removed.
    async fn delete_all(&self) -> Result<u64, StorageError>;
}

/// Open the configured backend and make sure its schema exists.
pub async fn open_store(
    backend: &StorageBackend,
) -> Result<Arc<dyn EvaluationStore>, StorageError> {
    let store: Arc<dyn EvaluationStore> = match backend {
        StorageBackend::Sqlite { path } => {
            tracing::info!(path = %path.display(), "Opening SQLite evaluation store");
            Arc::new(SqliteStore::open(path)?)
        }
        StorageBackend::Postgres(cfg) => {
            tracing::info!(host = %cfg.host, port = cfg.port, dbname = %cfg.dbname, tls = ?cfg.tls, "Opening PostgreSQL evaluation store");
            Arc::new(PostgresStore::new(cfg)?)
        }
    };

    store.init_schema().await?;
    tracing::info!(backend = store.backend(), "Evaluation store ready");
    Ok(store)
}

/// Store doubles for handler tests.
#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    /// Every operation fails as if the database were unreachable.
    pub struct FailingStore;

    fn unavailable() -> StorageError {
        StorageError::Config("database unreachable".into())
    }

    #[async_trait]
    impl EvaluationStore for FailingStore {
        fn backend(&self) -> &'static str {
            "failing"
        }

        async fn init_schema(&self) -> Result<(), StorageError> {
            Err(unavailable())
        }

        async fn insert(&self, _evaluation: &NewEvaluation) -> Result<i64, StorageError> {
            Err(unavailable())
        }

        async fn list_all(&self) -> Result<Vec<EvaluationRecord>, StorageError> {
            Err(unavailable())
        }

        async fn delete_all(&self) -> Result<u64, StorageError> {
            Err(unavailable())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn open_store_creates_sqlite_file_and_schema() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("nested").join("evals.db");
        let store = open_store(&StorageBackend::Sqlite { path: path.clone() })
            .await
            .unwrap();

        assert!(path.exists());
        assert_eq!(store.backend(), "sqlite");
        assert!(store.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn open_store_twice_on_same_file_keeps_data() {
        let tmp = tempfile::tempdir().unwrap();
        let backend = StorageBackend::Sqlite {
            path: tmp.path().join("evals.db"),
        };

        let first = open_store(&backend).await.unwrap();
        let evaluation = sqlite::tests::sample_evaluation(65);
        first.insert(&evaluation).await.unwrap();
        drop(first);

        let second = open_store(&backend).await.unwrap();
        let records = second.list_all().await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].metrics.age, 65);
    }
}
