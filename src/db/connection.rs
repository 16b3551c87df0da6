// Database Connection
// Opens the single MySQL or SQLite connection used for a check run

use crate::db::config::{DEFAULT_MYSQL_PORT, DatabaseConfig, DatabaseType};
use crate::error::NotifierError;
use sqlx::mysql::{MySqlConnectOptions, MySqlPoolOptions};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{MySql, Pool, Sqlite};
use std::time::Duration;

/// Database pool enum supporting both MySQL and SQLite
///
/// The pool is capped at one connection: a run holds a single shared
/// connection from start to finish.
#[derive(Clone)]
pub enum DatabasePool {
    Mysql(Pool<MySql>),
    Sqlite(Pool<Sqlite>),
}

impl DatabasePool {
    /// Create a new database pool from configuration
    pub async fn new(config: &DatabaseConfig) -> crate::Result<Self> {
        let pool = match config.db_type {
            DatabaseType::Mysql => {
                let host = config
                    .host
                    .as_deref()
                    .ok_or_else(|| NotifierError::DatabaseError("Missing MySQL host".to_string()))?;
                let username = config
                    .username
                    .as_deref()
                    .ok_or_else(|| NotifierError::DatabaseError("Missing username".to_string()))?;
                let database = config.database.as_deref().ok_or_else(|| {
                    NotifierError::DatabaseError("Missing database name".to_string())
                })?;

                let mut options = MySqlConnectOptions::new()
                    .host(host)
                    .port(config.port.unwrap_or(DEFAULT_MYSQL_PORT))
                    .username(username)
                    .database(database)
                    .charset("utf8mb4");

                if let Some(password) = config.password.as_deref() {
                    options = options.password(password);
                }

                let pool = MySqlPoolOptions::new()
                    .max_connections(1)
                    .acquire_timeout(Duration::from_secs(30))
                    .connect_with(options)
                    .await
                    .map_err(|e| {
                        NotifierError::DatabaseError(format!("MySQL connection failed: {}", e))
                    })?;

                DatabasePool::Mysql(pool)
            }
            DatabaseType::Sqlite => {
                let path = config
                    .path
                    .as_ref()
                    .ok_or_else(|| NotifierError::DatabaseError("Missing SQLite path".to_string()))?;

                // The certificate store is owned elsewhere; never create it
                let options = SqliteConnectOptions::new()
                    .filename(path)
                    .create_if_missing(false)
                    .read_only(true);

                let pool = SqlitePoolOptions::new()
                    .max_connections(1)
                    .acquire_timeout(Duration::from_secs(30))
                    .connect_with(options)
                    .await
                    .map_err(|e| {
                        NotifierError::DatabaseError(format!("SQLite connection failed: {}", e))
                    })?;

                DatabasePool::Sqlite(pool)
            }
        };

        Ok(pool)
    }

    /// Get database type
    pub fn db_type(&self) -> DatabaseType {
        match self {
            DatabasePool::Mysql(_) => DatabaseType::Mysql,
            DatabasePool::Sqlite(_) => DatabaseType::Sqlite,
        }
    }

    /// Close the connection pool
    pub async fn close(&self) {
        match self {
            DatabasePool::Mysql(pool) => pool.close().await,
            DatabasePool::Sqlite(pool) => pool.close().await,
        }
    }

    /// Whether `close` has already run
    pub fn is_closed(&self) -> bool {
        match self {
            DatabasePool::Mysql(pool) => pool.is_closed(),
            DatabasePool::Sqlite(pool) => pool.is_closed(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[tokio::test]
    async fn test_sqlite_missing_file_is_database_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = DatabaseConfig::sqlite(dir.path().join("absent.db"));

        let result = DatabasePool::new(&config).await;
        assert!(matches!(result, Err(NotifierError::DatabaseError(_))));
    }

    #[tokio::test]
    async fn test_sqlite_pool_close() {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        let pool = DatabasePool::Sqlite(pool);

        assert_eq!(pool.db_type(), DatabaseType::Sqlite);
        assert!(!pool.is_closed());
        pool.close().await;
        assert!(pool.is_closed());
    }

    #[tokio::test]
    async fn test_mysql_requires_database_name() {
        let mut config = DatabaseConfig::sqlite(PathBuf::from("unused"));
        config.db_type = DatabaseType::Mysql;
        config.host = Some("localhost".to_string());
        config.username = Some("ca".to_string());

        let result = DatabasePool::new(&config).await;
        assert!(matches!(result, Err(NotifierError::DatabaseError(_))));
    }
}
