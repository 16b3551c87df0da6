// Database Configuration
// Handles MySQL and SQLite certificate store configuration

use crate::error::NotifierError;
use std::path::PathBuf;

/// Default MySQL port
pub const DEFAULT_MYSQL_PORT: u16 = 3306;

/// Database type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatabaseType {
    Mysql,
    Sqlite,
}

impl std::str::FromStr for DatabaseType {
    type Err = NotifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mysql" | "mariadb" => Ok(DatabaseType::Mysql),
            "sqlite" => Ok(DatabaseType::Sqlite),
            other => Err(NotifierError::config(format!(
                "Unknown database type '{}' (expected mysql or sqlite)",
                other
            ))),
        }
    }
}

/// Database configuration
///
/// Connection fields stay optional here; a missing value is reported by
/// `DatabasePool::new` when the run tries to connect.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub db_type: DatabaseType,

    // MySQL settings
    pub host: Option<String>,
    pub port: Option<u16>,
    pub database: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,

    // SQLite settings
    pub path: Option<PathBuf>,
}

impl DatabaseConfig {
    /// Create SQLite configuration
    pub fn sqlite(path: PathBuf) -> Self {
        Self {
            db_type: DatabaseType::Sqlite,
            host: None,
            port: None,
            database: None,
            username: None,
            password: None,
            path: Some(path),
        }
    }

    /// Read `DB_*` variables through `lookup`
    pub fn from_lookup<F>(lookup: F) -> crate::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let db_type = match lookup("DB_TYPE") {
            Some(value) => value.parse()?,
            None => DatabaseType::Mysql,
        };

        match db_type {
            DatabaseType::Mysql => {
                let host = lookup("DB_HOST").unwrap_or_else(|| "localhost".to_string());
                let port = match lookup("DB_PORT") {
                    Some(raw) => raw.trim().parse::<u16>().map_err(|e| {
                        NotifierError::config(format!("DB_PORT '{}' is not a valid port: {}", raw, e))
                    })?,
                    None => DEFAULT_MYSQL_PORT,
                };
                Ok(Self {
                    db_type: DatabaseType::Mysql,
                    host: Some(host),
                    port: Some(port),
                    database: lookup("DB_NAME"),
                    username: lookup("DB_USER"),
                    password: lookup("DB_PASSWORD"),
                    path: None,
                })
            }
            DatabaseType::Sqlite => Ok(Self {
                db_type: DatabaseType::Sqlite,
                host: None,
                port: None,
                database: None,
                username: None,
                password: None,
                path: lookup("DB_PATH").map(PathBuf::from),
            }),
        }
    }

    /// Human readable target for log lines (never includes the password)
    pub fn display_target(&self) -> String {
        match self.db_type {
            DatabaseType::Mysql => format!(
                "mysql://{}@{}:{}/{}",
                self.username.as_deref().unwrap_or(""),
                self.host.as_deref().unwrap_or("localhost"),
                self.port.unwrap_or(DEFAULT_MYSQL_PORT),
                self.database.as_deref().unwrap_or("")
            ),
            DatabaseType::Sqlite => format!(
                "sqlite:{}",
                self.path
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default()
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_mysql_defaults() {
        let config =
            DatabaseConfig::from_lookup(lookup_from(&[("DB_USER", "ca"), ("DB_NAME", "gridca")]))
                .unwrap();

        assert_eq!(config.db_type, DatabaseType::Mysql);
        assert_eq!(config.host.as_deref(), Some("localhost"));
        assert_eq!(config.port, Some(3306));
        assert_eq!(config.password, None);
    }

    #[test]
    fn test_mysql_port_override() {
        let config = DatabaseConfig::from_lookup(lookup_from(&[
            ("DB_HOST", "db.internal"),
            ("DB_PORT", "3307"),
            ("DB_USER", "ca"),
            ("DB_PASSWORD", "secret"),
            ("DB_NAME", "gridca"),
        ]))
        .unwrap();

        assert_eq!(config.port, Some(3307));
        assert_eq!(config.password.as_deref(), Some("secret"));
        assert_eq!(config.display_target(), "mysql://ca@db.internal:3307/gridca");
        assert!(!config.display_target().contains("secret"));
    }

    #[test]
    fn test_invalid_port_rejected() {
        let result = DatabaseConfig::from_lookup(lookup_from(&[
            ("DB_PORT", "not-a-port"),
            ("DB_USER", "ca"),
            ("DB_NAME", "gridca"),
        ]));

        assert!(matches!(result, Err(NotifierError::ConfigError { .. })));
    }

    #[test]
    fn test_missing_credentials_left_for_connect() {
        let config = DatabaseConfig::from_lookup(lookup_from(&[("DB_NAME", "gridca")])).unwrap();

        assert_eq!(config.username, None);
        assert_eq!(config.database.as_deref(), Some("gridca"));
        assert_eq!(config.display_target(), "mysql://@localhost:3306/gridca");
    }

    #[test]
    fn test_sqlite_from_lookup() {
        let config = DatabaseConfig::from_lookup(lookup_from(&[
            ("DB_TYPE", "sqlite"),
            ("DB_PATH", "/tmp/certs.db"),
        ]))
        .unwrap();

        assert_eq!(config.db_type, DatabaseType::Sqlite);
        assert_eq!(config.display_target(), "sqlite:/tmp/certs.db");
    }

    #[test]
    fn test_sqlite_without_path_left_for_connect() {
        let config = DatabaseConfig::from_lookup(lookup_from(&[("DB_TYPE", "sqlite")])).unwrap();
        assert_eq!(config.path, None);
    }
}
