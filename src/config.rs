// Notifier configuration
//
// Connection and mail settings come from the process environment (a `.env`
// file is loaded by `main` first). An optional TOML file named by
// `CERTNOTIFY_CONFIG` can adjust thresholds, dedup and the notice template.

use crate::Result;
use crate::db::DatabaseConfig;
use crate::error::NotifierError;
use crate::notify::template::NoticeTemplate;
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Days-before-expiry at which warnings fire, in processing order
pub const DEFAULT_THRESHOLDS: [u32; 4] = [14, 7, 3, 1];

/// Environment variable naming the optional TOML file
pub const CONFIG_FILE_ENV: &str = "CERTNOTIFY_CONFIG";

/// Full runtime configuration
#[derive(Debug, Clone)]
pub struct NotifierConfig {
    pub database: DatabaseConfig,
    pub smtp: SmtpConfig,
    pub log: LogConfig,
    pub history_file: PathBuf,
    pub thresholds: Vec<u32>,
    pub dedup_same_day: bool,
    pub template: NoticeTemplate,
}

/// Outbound mail relay settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub from_address: String,
    pub from_name: String,
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 25,
            from_address: "kisti-grid-ca@kisti.re.kr".to_string(),
            from_name: "KISTI Grid CA".to_string(),
        }
    }
}

/// Process log settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    pub directory: PathBuf,
    pub file_name: String,
    /// `tracing_subscriber::EnvFilter` directive used when `RUST_LOG` is unset
    pub default_filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("logs"),
            file_name: "app.log".to_string(),
            default_filter: "info".to_string(),
        }
    }
}

impl LogConfig {
    /// Log settings alone, so logging can start before the rest of the config is read
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut log = Self::default();
        if let Some(dir) = lookup("LOG_DIR") {
            log.directory = PathBuf::from(dir);
        }
        log
    }

    pub fn file_path(&self) -> PathBuf {
        self.directory.join(&self.file_name)
    }
}

/// Optional settings read from the TOML file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub thresholds: Option<Vec<u32>>,
    #[serde(default)]
    pub dedup_same_day: Option<bool>,
    #[serde(default)]
    pub template: Option<NoticeTemplate>,
}

impl FileConfig {
    /// Load configuration from TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents =
            fs::read_to_string(path.as_ref()).map_err(|e| NotifierError::FileSystemError {
                path: path.as_ref().display().to_string(),
                source: e,
            })?;

        Ok(toml::from_str(&contents)?)
    }
}

impl NotifierConfig {
    /// Build from the real process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database = DatabaseConfig::from_lookup(&lookup)?;

        let defaults = SmtpConfig::default();
        let smtp = SmtpConfig {
            host: lookup("SMTP_HOST").unwrap_or(defaults.host),
            port: match lookup("SMTP_PORT") {
                Some(raw) => raw.trim().parse::<u16>().map_err(|e| {
                    NotifierError::config(format!("SMTP_PORT '{}' is not a valid port: {}", raw, e))
                })?,
                None => defaults.port,
            },
            from_address: lookup("MAIL_FROM").unwrap_or(defaults.from_address),
            from_name: lookup("MAIL_FROM_NAME").unwrap_or(defaults.from_name),
        };

        let log = LogConfig::from_lookup(&lookup);

        let history_file = lookup("HISTORY_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|| log.directory.join("sent_history.csv"));

        let file = match lookup(CONFIG_FILE_ENV) {
            Some(path) => FileConfig::from_file(path)?,
            None => FileConfig::default(),
        };

        let thresholds = file
            .thresholds
            .unwrap_or_else(|| DEFAULT_THRESHOLDS.to_vec());
        validate_thresholds(&thresholds)?;

        Ok(Self {
            database,
            smtp,
            log,
            history_file,
            thresholds,
            dedup_same_day: file.dedup_same_day.unwrap_or(false),
            template: file.template.unwrap_or_default(),
        })
    }
}

/// Reject empty lists, zero days and repeated values
pub fn validate_thresholds(thresholds: &[u32]) -> Result<()> {
    if thresholds.is_empty() {
        return Err(NotifierError::config("thresholds must not be empty"));
    }

    let mut seen = HashSet::new();
    for &days in thresholds {
        if days == 0 {
            return Err(NotifierError::config("thresholds must be at least 1 day"));
        }
        if !seen.insert(days) {
            return Err(NotifierError::config(format!(
                "threshold {} is listed more than once",
                days
            )));
        }
    }

    Ok(())
}
