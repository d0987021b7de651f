use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use crate::db::postgres::{PostgresConfig, TlsMode};

/// Application-level constants
pub const APP_NAME: &str = "CardioRisk";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_PG_PORT: u16 = 5432;

/// Log filter used when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    "cardiorisk=info,cardiorisk_lib=info,tower_http=info"
}

/// Per-user data directory for the embedded database.
/// Falls back to the working directory when the platform has none.
pub fn app_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("cardiorisk")
}

/// Default location of the embedded SQLite file.
pub fn default_sqlite_path() -> PathBuf {
    app_data_dir().join("evaluaciones.db")
}

/// Which persistence adapter the process runs against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    Sqlite { path: PathBuf },
    Postgres(PostgresConfig),
}

impl StorageBackend {
    pub fn name(&self) -> &'static str {
        match self {
            StorageBackend::Sqlite { .. } => "sqlite",
            StorageBackend::Postgres(_) => "postgres",
        }
    }
}

/// Process configuration, read once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub storage: StorageBackend,
}

impl AppConfig {
    /// Build the configuration from process environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    ///
    /// Every option is optional. Values that fail to parse are logged and
    /// replaced by their default.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = parse_or(get("PORT"), "PORT", DEFAULT_PORT);
        let ip = parse_or(
            get("BIND_ADDR"),
            "BIND_ADDR",
            IpAddr::V4(Ipv4Addr::UNSPECIFIED),
        );

        let database_url = get("DATABASE_URL");
        let wants_postgres = match get("STORAGE_BACKEND").as_deref() {
            Some(v) if v.eq_ignore_ascii_case("postgres") => true,
            Some(v) if v.eq_ignore_ascii_case("sqlite") => false,
            Some(other) => {
                tracing::warn!(value = other, "Unknown STORAGE_BACKEND, picking from environment");
                database_url.is_some() || get("PGHOST").is_some()
            }
            None => database_url.is_some() || get("PGHOST").is_some(),
        };

        let storage = if wants_postgres {
            StorageBackend::Postgres(postgres_from_lookup(&get, database_url.as_deref()))
        } else {
            let path = get("SQLITE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(default_sqlite_path);
            StorageBackend::Sqlite { path }
        };

        Self {
            bind_addr: SocketAddr::new(ip, port),
            storage,
        }
    }
}

/// Resolve PostgreSQL settings. `DATABASE_URL` wins over the `PG*`
/// variables, including its `sslmode`; `PGSSL`/`PGSSL_SKIP_VERIFY` only
/// decide TLS when the URL is absent or names no `sslmode`.
fn postgres_from_lookup<F>(get: &F, database_url: Option<&str>) -> PostgresConfig
where
    F: Fn(&str) -> Option<String>,
{
    let from_url = database_url.and_then(|url| {
        let parsed = PostgresConfig::parse_url(url);
        if parsed.is_none() {
            tracing::warn!("DATABASE_URL could not be parsed, using PG* variables");
        }
        parsed
    });

    let (mut cfg, url_sets_tls) = from_url.unwrap_or_else(|| {
        let cfg = PostgresConfig {
            host: get("PGHOST").unwrap_or_else(|| "localhost".to_string()),
            port: parse_or(get("PGPORT"), "PGPORT", DEFAULT_PG_PORT),
            user: get("PGUSER").unwrap_or_else(|| "postgres".to_string()),
            password: get("PGPASSWORD"),
            dbname: get("PGDATABASE").unwrap_or_else(|| "postgres".to_string()),
            tls: TlsMode::Disable,
        };
        (cfg, false)
    });

    if !url_sets_tls {
        let ssl = parse_bool_or(get("PGSSL"), "PGSSL", false);
        let skip_verify = parse_bool_or(get("PGSSL_SKIP_VERIFY"), "PGSSL_SKIP_VERIFY", false);
        cfg.tls = match (ssl || skip_verify, skip_verify) {
            (false, _) => TlsMode::Disable,
            (true, true) => TlsMode::SkipVerify,
            (true, false) => TlsMode::Verify { root_cert: None },
        };
    }

    if let TlsMode::Verify { root_cert } = &mut cfg.tls {
        if root_cert.is_none() {
            *root_cert = get("PGSSLROOTCERT").map(PathBuf::from);
        }
    }
    cfg
}

fn parse_or<T: std::str::FromStr>(value: Option<String>, key: &str, default: T) -> T {
    match value {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %raw, "Invalid value, using default");
            default
        }),
        None => default,
    }
}

fn parse_bool_or(value: Option<String>, key: &str, default: bool) -> bool {
    match value.as_deref().map(|v| v.trim().to_ascii_lowercase()) {
        Some(v) if matches!(v.as_str(), "1" | "true" | "yes" | "on") => true,
        Some(v) if matches!(v.as_str(), "0" | "false" | "no" | "off") => false,
        Some(v) => {
            tracing::warn!(key, value = %v, "Invalid boolean, using default");
            default
        }
        None => default,
    }
}
