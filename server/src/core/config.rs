use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::utils::file::expand_path;

use super::cli::CliConfig;
use super::constants::{
    APP_DOT_FOLDER, CONFIG_FILE_NAME, DEFAULT_HOST, DEFAULT_PORT,
    POSTGRES_DEFAULT_ACQUIRE_TIMEOUT_SECS, POSTGRES_DEFAULT_MAX_CONNECTIONS,
    POSTGRES_DEFAULT_MIN_CONNECTIONS, POSTGRES_DEFAULT_STATEMENT_TIMEOUT_SECS,
    SQLITE_DEFAULT_PATH,
};

// =============================================================================
// Database Backend Enum (SQLite or PostgreSQL)
// =============================================================================

/// Database holding the `resources` and `views` tables
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseBackend {
    #[default]
    Sqlite,
    Postgres,
}

impl fmt::Display for DatabaseBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatabaseBackend::Sqlite => write!(f, "sqlite"),
            DatabaseBackend::Postgres => write!(f, "postgres"),
        }
    }
}

// =============================================================================
// File Config Structs (JSON deserialization)
// =============================================================================

/// Server configuration section
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ServerFileConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
}

/// SQLite configuration section
#[derive(Debug, Default, Clone, Deserialize)]
pub struct SqliteFileConfig {
    pub path: Option<String>,
}

/// PostgreSQL configuration section (from JSON config file)
#[derive(Debug, Default, Clone, Deserialize)]
pub struct PostgresFileConfig {
    /// PostgreSQL connection URL (or use INVENTORY_POSTGRES_URL env var)
    pub url: Option<String>,
    /// Maximum number of connections in the pool (default: 20)
    pub max_connections: Option<u32>,
    /// Minimum number of connections to keep warm (default: 2)
    pub min_connections: Option<u32>,
    /// Connection acquire timeout in seconds (default: 30)
    pub acquire_timeout_secs: Option<u64>,
    /// Statement timeout in seconds, 0 to disable (default: 60)
    pub statement_timeout_secs: Option<u64>,
}

/// Database configuration section (from JSON config file)
#[derive(Debug, Default, Clone, Deserialize)]
pub struct DatabaseFileConfig {
    pub backend: Option<DatabaseBackend>,
    pub sqlite: Option<SqliteFileConfig>,
    pub postgres: Option<PostgresFileConfig>,
}

/// Export configuration section
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ExportFileConfig {
    pub temp_dir: Option<String>,
}

/// File-based configuration (JSON)
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    pub server: Option<ServerFileConfig>,
    pub database: Option<DatabaseFileConfig>,
    pub export: Option<ExportFileConfig>,
    #[serde(flatten)]
    pub extra: serde_json::Value,
}

impl FileConfig {
    /// Load configuration from a JSON file
    fn load_from_file(path: &Path) -> Result<Self> {
        tracing::debug!(path = %path.display(), "Loading config file");
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        tracing::trace!(config = ?config, "Parsed config file");
        Ok(config)
    }

    /// Warn about unknown fields in the config
    fn warn_unknown_fields(&self) {
        if let serde_json::Value::Object(map) = &self.extra
            && !map.is_empty()
        {
            let keys_str: String = map
                .keys()
                .map(|k| k.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            tracing::warn!(
                fields = %keys_str,
                "Unknown fields in config file (possible typos)"
            );
        }
    }

    /// Merge another FileConfig into this one (other takes precedence)
    fn merge(&mut self, other: FileConfig) {
        if let Some(server) = other.server {
            let current = self.server.get_or_insert_with(ServerFileConfig::default);
            if server.host.is_some() {
                tracing::trace!(host = ?server.host, "Merging server.host");
                current.host = server.host;
            }
            if server.port.is_some() {
                tracing::trace!(port = ?server.port, "Merging server.port");
                current.port = server.port;
            }
        }

        if let Some(database) = other.database {
            let current = self
                .database
                .get_or_insert_with(DatabaseFileConfig::default);
            if database.backend.is_some() {
                tracing::trace!(backend = ?database.backend, "Merging database.backend");
                current.backend = database.backend;
            }
            if let Some(sqlite) = database.sqlite
                && sqlite.path.is_some()
            {
                tracing::trace!(path = ?sqlite.path, "Merging database.sqlite.path");
                current
                    .sqlite
                    .get_or_insert_with(SqliteFileConfig::default)
                    .path = sqlite.path;
            }
            if let Some(postgres) = database.postgres {
                let current_pg = current
                    .postgres
                    .get_or_insert_with(PostgresFileConfig::default);
                if postgres.url.is_some() {
                    tracing::trace!(url = "***", "Merging database.postgres.url");
                    current_pg.url = postgres.url;
                }
                if postgres.max_connections.is_some() {
                    tracing::trace!(max_connections = ?postgres.max_connections, "Merging database.postgres.max_connections");
                    current_pg.max_connections = postgres.max_connections;
                }
                if postgres.min_connections.is_some() {
                    tracing::trace!(min_connections = ?postgres.min_connections, "Merging database.postgres.min_connections");
                    current_pg.min_connections = postgres.min_connections;
                }
                if postgres.acquire_timeout_secs.is_some() {
                    tracing::trace!(acquire_timeout_secs = ?postgres.acquire_timeout_secs, "Merging database.postgres.acquire_timeout_secs");
                    current_pg.acquire_timeout_secs = postgres.acquire_timeout_secs;
                }
                if postgres.statement_timeout_secs.is_some() {
                    tracing::trace!(statement_timeout_secs = ?postgres.statement_timeout_secs, "Merging database.postgres.statement_timeout_secs");
                    current_pg.statement_timeout_secs = postgres.statement_timeout_secs;
                }
            }
        }

        if let Some(export) = other.export
            && export.temp_dir.is_some()
        {
            tracing::trace!(temp_dir = ?export.temp_dir, "Merging export.temp_dir");
            self.export
                .get_or_insert_with(ExportFileConfig::default)
                .temp_dir = export.temp_dir;
        }
    }
}

// =============================================================================
// Runtime Config Structs (final merged configuration)
// =============================================================================

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// PostgreSQL configuration (final/runtime)
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    /// PostgreSQL connection URL
    pub url: String,
    /// Maximum number of connections in the pool
    pub max_connections: u32,
    /// Minimum number of connections to keep warm
    pub min_connections: u32,
    /// Connection acquire timeout in seconds
    pub acquire_timeout_secs: u64,
    /// Statement timeout in seconds (0 = disabled)
    pub statement_timeout_secs: u64,
}

/// Database configuration (final/runtime)
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub backend: DatabaseBackend,
    /// SQLite database file (only used if backend = sqlite)
    pub sqlite_path: PathBuf,
    /// PostgreSQL-specific configuration (only used if backend = postgres)
    pub postgres: Option<PostgresConfig>,
}

/// Export configuration (final/runtime)
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Directory where each export creates its own uniquely named temp file
    pub temp_dir: PathBuf,
}

/// Final merged application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub export: ExportConfig,
}

impl AppConfig {
    /// Load configuration from all sources
    ///
    /// Priority (lowest to highest):
    /// 1. Defaults
    /// 2. Profile directory config (~/.inventory/inventory.json)
    /// 3. Local directory config OR CLI-specified config path
    /// 4. CLI arguments (which include env var fallbacks via clap)
    pub fn load(cli: &CliConfig) -> Result<Self> {
        tracing::debug!("Loading application configuration");
        tracing::trace!(cli = ?cli, "CLI config");

        let mut file_config = FileConfig::default();
        let mut found_configs: Vec<String> = Vec::new();

        if let Some(profile_path) = get_profile_config_path()
            && profile_path.exists()
        {
            let profile_config = FileConfig::load_from_file(&profile_path)?;
            profile_config.warn_unknown_fields();
            file_config.merge(profile_config);
            found_configs.push(profile_path.display().to_string());
        }

        let overlay_path = if let Some(ref path) = cli.config {
            let expanded = expand_path(&path.to_string_lossy());
            if !expanded.exists() {
                anyhow::bail!("Config file not found: {}", expanded.display());
            }
            Some(expanded)
        } else {
            let local = PathBuf::from(CONFIG_FILE_NAME);
            if local.exists() { Some(local) } else { None }
        };

        if let Some(path) = overlay_path {
            let overlay_config = FileConfig::load_from_file(&path)?;
            overlay_config.warn_unknown_fields();
            file_config.merge(overlay_config);
            found_configs.push(path.display().to_string());
        }

        tracing::debug!(configs = ?found_configs, "Config files loaded");

        Self::from_layers(cli, file_config)
    }

    /// Layer defaults -> file config -> CLI/env overrides
    fn from_layers(cli: &CliConfig, file_config: FileConfig) -> Result<Self> {
        let file_server = file_config.server.unwrap_or_default();
        let file_database = file_config.database.unwrap_or_default();
        let file_export = file_config.export.unwrap_or_default();

        let host = cli
            .host
            .clone()
            .or(file_server.host)
            .unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = cli.port.or(file_server.port).unwrap_or(DEFAULT_PORT);

        let backend = cli
            .database_backend
            .or(file_database.backend)
            .unwrap_or_default();

        let sqlite_path = cli
            .sqlite_path
            .as_ref()
            .map(|p| p.to_string_lossy().into_owned())
            .or(file_database.sqlite.and_then(|s| s.path))
            .map(|p| expand_path(&p))
            .unwrap_or_else(|| expand_path(SQLITE_DEFAULT_PATH));

        let postgres = if backend == DatabaseBackend::Postgres {
            let file_pg = file_database.postgres.unwrap_or_default();
            Some(PostgresConfig {
                url: cli.postgres_url.clone().or(file_pg.url).unwrap_or_default(),
                max_connections: file_pg
                    .max_connections
                    .unwrap_or(POSTGRES_DEFAULT_MAX_CONNECTIONS),
                min_connections: file_pg
                    .min_connections
                    .unwrap_or(POSTGRES_DEFAULT_MIN_CONNECTIONS),
                acquire_timeout_secs: file_pg
                    .acquire_timeout_secs
                    .unwrap_or(POSTGRES_DEFAULT_ACQUIRE_TIMEOUT_SECS),
                statement_timeout_secs: file_pg
                    .statement_timeout_secs
                    .unwrap_or(POSTGRES_DEFAULT_STATEMENT_TIMEOUT_SECS),
            })
        } else {
            None
        };

        let temp_dir = cli
            .export_temp_dir
            .as_ref()
            .map(|p| p.to_string_lossy().into_owned())
            .or(file_export.temp_dir)
            .map(|p| expand_path(&p))
            .unwrap_or_else(std::env::temp_dir);

        let config = Self {
            server: ServerConfig { host, port },
            database: DatabaseConfig {
                backend,
                sqlite_path,
                postgres,
            },
            export: ExportConfig { temp_dir },
        };

        config.validate()?;

        tracing::debug!(
            host = %config.server.host,
            port = config.server.port,
            backend = %config.database.backend,
            export_temp_dir = %config.export.temp_dir.display(),
            "Configuration loaded"
        );

        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.server.host.trim().is_empty() {
            anyhow::bail!("Configuration error: server.host cannot be empty");
        }

        if self.server.port == 0 {
            anyhow::bail!("Configuration error: server.port cannot be 0");
        }

        if self.database.backend == DatabaseBackend::Postgres {
            match self.database.postgres {
                Some(ref pg) if pg.url.is_empty() => anyhow::bail!(
                    "Configuration error: database.postgres.url is required when database.backend is 'postgres'. \
                     Set via INVENTORY_POSTGRES_URL env var or database.postgres.url in config file."
                ),
                Some(ref pg) if pg.min_connections > pg.max_connections => anyhow::bail!(
                    "Configuration error: database.postgres.min_connections ({}) exceeds max_connections ({})",
                    pg.min_connections,
                    pg.max_connections
                ),
                Some(_) => {}
                None => anyhow::bail!(
                    "Configuration error: PostgreSQL configuration missing when database.backend is 'postgres'"
                ),
            }
        }

        Ok(())
    }
}

/// Get the profile config path (~/.inventory/inventory.json)
fn get_profile_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(APP_DOT_FOLDER).join(CONFIG_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_backend_serde() {
        let backend: DatabaseBackend = serde_json::from_str(r#""postgres""#).unwrap();
        assert_eq!(backend, DatabaseBackend::Postgres);
        let backend: DatabaseBackend = serde_json::from_str(r#""sqlite""#).unwrap();
        assert_eq!(backend, DatabaseBackend::Sqlite);
    }

    #[test]
    fn test_database_backend_display() {
        assert_eq!(DatabaseBackend::Sqlite.to_string(), "sqlite");
        assert_eq!(DatabaseBackend::Postgres.to_string(), "postgres");
    }

    #[test]
    fn test_file_config_parse_full() {
        let json = r#"{
            "server": { "host": "0.0.0.0", "port": 8080 },
            "database": {
                "backend": "postgres",
                "postgres": { "url": "postgres://db/inventory", "max_connections": 5 }
            },
            "export": { "temp_dir": "/var/tmp" }
        }"#;
        let config: FileConfig = serde_json::from_str(json).unwrap();

        let server = config.server.as_ref().unwrap();
        assert_eq!(server.host.as_deref(), Some("0.0.0.0"));
        assert_eq!(server.port, Some(8080));

        let database = config.database.as_ref().unwrap();
        assert_eq!(database.backend, Some(DatabaseBackend::Postgres));
        let pg = database.postgres.as_ref().unwrap();
        assert_eq!(pg.url.as_deref(), Some("postgres://db/inventory"));
        assert_eq!(pg.max_connections, Some(5));

        assert_eq!(
            config.export.as_ref().unwrap().temp_dir.as_deref(),
            Some("/var/tmp")
        );
    }

    #[test]
    fn test_file_config_parse_extra_fields() {
        let json = r#"{ "server": { "port": 9000 }, "unknown_section": true }"#;
        let config: FileConfig = serde_json::from_str(json).unwrap();
        let extra = config.extra.as_object().unwrap();
        assert!(extra.contains_key("unknown_section"));
    }

    #[test]
    fn test_file_config_merge() {
        let mut base: FileConfig = serde_json::from_str(
            r#"{
                "server": { "host": "base.host", "port": 1000 },
                "database": { "backend": "sqlite", "sqlite": { "path": "/data/base.db" } }
            }"#,
        )
        .unwrap();
        let overlay: FileConfig = serde_json::from_str(
            r#"{
                "server": { "port": 2000 },
                "database": { "backend": "postgres", "postgres": { "url": "postgres://overlay" } },
                "export": { "temp_dir": "/overlay/tmp" }
            }"#,
        )
        .unwrap();

        base.merge(overlay);

        let server = base.server.as_ref().unwrap();
        assert_eq!(server.host.as_deref(), Some("base.host"));
        assert_eq!(server.port, Some(2000));

        let database = base.database.as_ref().unwrap();
        assert_eq!(database.backend, Some(DatabaseBackend::Postgres));
        assert_eq!(
            database.sqlite.as_ref().unwrap().path.as_deref(),
            Some("/data/base.db")
        );
        assert_eq!(
            database.postgres.as_ref().unwrap().url.as_deref(),
            Some("postgres://overlay")
        );
        assert_eq!(
            base.export.as_ref().unwrap().temp_dir.as_deref(),
            Some("/overlay/tmp")
        );
    }

    #[test]
    fn test_app_config_defaults() {
        let config = AppConfig::from_layers(&CliConfig::default(), FileConfig::default()).unwrap();

        assert_eq!(config.server.host, DEFAULT_HOST);
        assert_eq!(config.server.port, DEFAULT_PORT);
        assert_eq!(config.database.backend, DatabaseBackend::Sqlite);
        assert!(config.database.sqlite_path.ends_with(SQLITE_DEFAULT_PATH));
        assert!(config.database.postgres.is_none());
        assert_eq!(config.export.temp_dir, std::env::temp_dir());
    }

    #[test]
    fn test_app_config_cli_override() {
        let file_config: FileConfig =
            serde_json::from_str(r#"{ "server": { "host": "file.host", "port": 1000 } }"#)
                .unwrap();
        let cli = CliConfig {
            port: Some(3000),
            export_temp_dir: Some(PathBuf::from("/srv/exports")),
            ..Default::default()
        };
        let config = AppConfig::from_layers(&cli, file_config).unwrap();

        assert_eq!(config.server.host, "file.host");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.export.temp_dir, PathBuf::from("/srv/exports"));
    }

    #[test]
    fn test_app_config_postgres_defaults() {
        let cli = CliConfig {
            database_backend: Some(DatabaseBackend::Postgres),
            postgres_url: Some("postgres://localhost/inventory".to_string()),
            ..Default::default()
        };
        let config = AppConfig::from_layers(&cli, FileConfig::default()).unwrap();

        let pg = config.database.postgres.unwrap();
        assert_eq!(pg.url, "postgres://localhost/inventory");
        assert_eq!(pg.max_connections, POSTGRES_DEFAULT_MAX_CONNECTIONS);
        assert_eq!(pg.min_connections, POSTGRES_DEFAULT_MIN_CONNECTIONS);
        assert_eq!(
            pg.statement_timeout_secs,
            POSTGRES_DEFAULT_STATEMENT_TIMEOUT_SECS
        );
    }

    #[test]
    fn test_app_config_validation_postgres_url_required() {
        let cli = CliConfig {
            database_backend: Some(DatabaseBackend::Postgres),
            ..Default::default()
        };
        let result = AppConfig::from_layers(&cli, FileConfig::default());
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("database.postgres.url is required")
        );
    }

    #[test]
    fn test_app_config_validation_server_port_zero() {
        let cli = CliConfig {
            port: Some(0),
            ..Default::default()
        };
        let result = AppConfig::from_layers(&cli, FileConfig::default());
        assert!(result.unwrap_err().to_string().contains("cannot be 0"));
    }

    #[test]
    fn test_app_config_validation_empty_host() {
        let cli = CliConfig {
            host: Some("  ".to_string()),
            ..Default::default()
        };
        let result = AppConfig::from_layers(&cli, FileConfig::default());
        assert!(result.unwrap_err().to_string().contains("cannot be empty"));
    }

    #[test]
    fn test_app_config_missing_config_file() {
        let cli = CliConfig {
            config: Some(PathBuf::from("/nonexistent/inventory.json")),
            ..Default::default()
        };
        let result = AppConfig::load(&cli);
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Config file not found")
        );
    }
}
