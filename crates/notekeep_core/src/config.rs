//! Runtime configuration for embedding the core.
//!
//! # Responsibility
//! - Load store and logging settings from the environment.
//! - Bootstrap logging and the migrated connection from those settings.
//!
//! # Invariants
//! - Variables use the `NOTEKEEP` prefix with `__` between nested keys, e.g.
//!   `NOTEKEEP__DATABASE__PATH`, `NOTEKEEP__LOGGING__LEVEL`,
//!   `NOTEKEEP__LOGGING__DIR`.
//! - Without a database path the store is a private in-memory database.
//! - Without a log directory file logging stays disabled.

use crate::db::{open_db, open_db_in_memory, DbError};
use crate::logging::{default_log_level, init_logging, normalize_level, LoggingError};
use rusqlite::Connection;
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

const ENV_PREFIX: &str = "NOTEKEEP";
const ENV_SEPARATOR: &str = "__";

/// Root configuration of the core.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CoreConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Relational store settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite file; `None` selects an in-memory database.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// Rolling file log settings.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_level")]
    pub level: String,
    /// Absolute directory; `None` disables file logging.
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            dir: None,
        }
    }
}

fn default_level() -> String {
    default_log_level().to_string()
}

/// Configuration loading, validation, or bootstrap failure.
#[derive(Debug)]
pub enum ConfigError {
    Load(config::ConfigError),
    EmptyDatabasePath,
    Logging(LoggingError),
    Db(DbError),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Load(err) => write!(f, "configuration loading failed: {err}"),
            Self::EmptyDatabasePath => write!(f, "database path must not be empty"),
            Self::Logging(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Load(err) => Some(err),
            Self::EmptyDatabasePath => None,
            Self::Logging(err) => Some(err),
            Self::Db(err) => Some(err),
        }
    }
}

impl From<config::ConfigError> for ConfigError {
    fn from(value: config::ConfigError) -> Self {
        Self::Load(value)
    }
}

impl From<LoggingError> for ConfigError {
    fn from(value: LoggingError) -> Self {
        Self::Logging(value)
    }
}

impl From<DbError> for ConfigError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl CoreConfig {
    /// Loads configuration from an optional `.env` file and the environment.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix(ENV_PREFIX)
                    .separator(ENV_SEPARATOR),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Checks semantic constraints the deserializer cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        normalize_level(&self.logging.level)?;
        if let Some(dir) = &self.logging.dir {
            if !dir.is_absolute() {
                return Err(LoggingError::RelativeDirectory(dir.clone()).into());
            }
        }
        if let Some(path) = &self.database.path {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::EmptyDatabasePath);
            }
        }
        Ok(())
    }
}

/// Validates `config`, starts file logging when configured, and opens the
/// migrated store.
pub fn bootstrap(config: &CoreConfig) -> Result<Connection, ConfigError> {
    config.validate()?;
    if let Some(dir) = &config.logging.dir {
        init_logging(&config.logging.level, dir)?;
    }

    let conn = match &config.database.path {
        Some(path) => open_db(path)?,
        None => open_db_in_memory()?,
    };
    Ok(conn)
}

#[cfg(test)]
mod tests {
    use super::{bootstrap, ConfigError, CoreConfig};
    use crate::logging::LoggingError;
    use std::env;
    use std::path::PathBuf;
    use std::sync::Mutex;

    // Environment variables are process-global.
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const VARS: [&str; 3] = [
        "NOTEKEEP__DATABASE__PATH",
        "NOTEKEEP__LOGGING__LEVEL",
        "NOTEKEEP__LOGGING__DIR",
    ];

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn load_uses_defaults_without_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();

        let config = CoreConfig::load().unwrap();
        assert!(config.database.path.is_none());
        assert!(config.logging.dir.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn load_reads_nested_environment_keys() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("NOTEKEEP__DATABASE__PATH", "/var/lib/notekeep/data.sqlite3");
        env::set_var("NOTEKEEP__LOGGING__LEVEL", "warn");
        let result = CoreConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(
            config.database.path,
            Some(PathBuf::from("/var/lib/notekeep/data.sqlite3"))
        );
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn validate_rejects_bad_level_and_relative_log_dir() {
        let mut config = CoreConfig::default();
        config.logging.level = "chatty".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Logging(LoggingError::UnsupportedLevel(_)))
        ));

        config.logging.level = "info".to_string();
        config.logging.dir = Some(PathBuf::from("relative/logs"));
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Logging(LoggingError::RelativeDirectory(_)))
        ));
    }

    #[test]
    fn bootstrap_opens_file_database() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = CoreConfig::default();
        config.database.path = Some(dir.path().join("notekeep.sqlite3"));

        let conn = bootstrap(&config).unwrap();
        let version: u32 = conn
            .query_row("PRAGMA user_version;", [], |row| row.get(0))
            .unwrap();
        assert_eq!(version, crate::db::migrations::latest_version());
    }
}
