//! Embedded file backend.
//!
//! A single connection behind a mutex; every call hops onto the blocking
//! pool so request handlers never block the runtime on disk I/O.

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection};

use super::{EvaluationStore, StorageError};
use crate::models::{EvaluationRecord, NewEvaluation, PatientMetrics};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS evaluaciones (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    age             INTEGER NOT NULL,
    bmi             REAL    NOT NULL,
    glucose         INTEGER NOT NULL,
    bp              INTEGER NOT NULL,
    hdl             INTEGER NOT NULL,
    ldl             INTEGER NOT NULL,
    smoking         INTEGER NOT NULL,
    activity_level  TEXT    NOT NULL,
    family_history  INTEGER NOT NULL,
    risk_score      REAL    NOT NULL CHECK (risk_score >= 0 AND risk_score <= 1),
    level           TEXT    NOT NULL,
    created_at      TEXT    NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_evaluaciones_created_at ON evaluaciones(created_at);
";

#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open (or create) the database file, creating parent directories.
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        configure_pragmas(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open an in-memory database (for testing)
    pub fn open_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        configure_pragmas(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    async fn with_conn<T, F>(&self, f: F) -> Result<T, StorageError>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> Result<T, StorageError> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let guard = conn.lock().map_err(|_| StorageError::LockPoisoned)?;
            f(&guard)
        })
        .await?
    }
}

#[async_trait]
impl EvaluationStore for SqliteStore {
    fn backend(&self) -> &'static str {
        "sqlite"
    }

    async fn init_schema(&self) -> Result<(), StorageError> {
        self.with_conn(init_schema).await
    }

    async fn insert(&self, evaluation: &NewEvaluation) -> Result<i64, StorageError> {
        let evaluation = evaluation.clone();
        self.with_conn(move |conn| insert_evaluation(conn, &evaluation, Utc::now()))
            .await
    }

    async fn list_all(&self) -> Result<Vec<EvaluationRecord>, StorageError> {
        self.with_conn(list_evaluations).await
    }

    async fn delete_all(&self) -> Result<u64, StorageError> {
        self.with_conn(delete_evaluations).await
    }
}

fn configure_pragmas(conn: &Connection) -> Result<(), StorageError> {
    conn.execute_batch("PRAGMA journal_mode=DELETE;")?;
    Ok(())
}

/// Create the evaluations table and its index if they do not exist.
pub fn init_schema(conn: &Connection) -> Result<(), StorageError> {
    conn.execute_batch(SCHEMA)?;
    Ok(())
}

/// Insert one evaluation stamped with `created_at`.
pub fn insert_evaluation(
    conn: &Connection,
    evaluation: &NewEvaluation,
    created_at: DateTime<Utc>,
) -> Result<i64, StorageError> {
    let m = &evaluation.metrics;
    let a = &evaluation.assessment;
    conn.execute(
        "INSERT INTO evaluaciones (
            age, bmi, glucose, bp, hdl, ldl, smoking,
            activity_level, family_history, risk_score, level, created_at
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
        params![
            m.age,
            m.bmi,
            m.glucose,
            m.bp,
            m.hdl,
            m.ldl,
            m.smoking,
            m.activity_level.as_str(),
            m.family_history,
            a.risk_score,
            a.level.as_str(),
            created_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// All evaluations, newest first. Ties on timestamp fall back to id.
pub fn list_evaluations(conn: &Connection) -> Result<Vec<EvaluationRecord>, StorageError> {
    let mut stmt = conn.prepare(
        "SELECT id, age, bmi, glucose, bp, hdl, ldl, smoking,
                activity_level, family_history, risk_score, level, created_at
         FROM evaluaciones
         ORDER BY created_at DESC, id DESC",
    )?;
    let rows = stmt.query_map([], row_to_evaluation)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(StorageError::from)
}

/// Delete every evaluation.
pub fn delete_evaluations(conn: &Connection) -> Result<u64, StorageError> {
    let affected = conn.execute("DELETE FROM evaluaciones", [])?;
    Ok(affected as u64)
}

fn conversion_error<E>(column: usize, err: E) -> rusqlite::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    rusqlite::Error::FromSqlConversionFailure(column, rusqlite::types::Type::Text, Box::new(err))
}

fn row_to_evaluation(row: &rusqlite::Row) -> Result<EvaluationRecord, rusqlite::Error> {
    let activity_str: String = row.get(8)?;
    let level_str: String = row.get(11)?;
    let created_str: String = row.get(12)?;

    Ok(EvaluationRecord {
        id: row.get(0)?,
        metrics: PatientMetrics {
            age: row.get(1)?,
            bmi: row.get(2)?,
            glucose: row.get(3)?,
            bp: row.get(4)?,
            hdl: row.get(5)?,
            ldl: row.get(6)?,
            smoking: row.get(7)?,
            activity_level: activity_str.parse().map_err(|e| conversion_error(8, e))?,
            family_history: row.get(9)?,
        },
        risk_score: row.get(10)?,
        level: level_str.parse().map_err(|e| conversion_error(11, e))?,
        created_at: DateTime::parse_from_rfc3339(&created_str)
            .map_err(|e| conversion_error(12, e))?
            .with_timezone(&Utc),
    })
}
