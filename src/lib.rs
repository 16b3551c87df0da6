// certnotify - Certificate expiry notification job
// Licensed under GPL-3.0

//! certnotify scans a CA's certificate database for certificates that expire
//! a fixed number of days from today and emails each owner a warning. It is
//! meant to be run once a day by an external scheduler.

pub mod commands;
pub mod config;
pub mod db;
pub mod driver;
pub mod error;
pub mod logging;
pub mod notify;

// Re-export commonly used types
pub use crate::config::NotifierConfig;
pub use crate::driver::{ExpiryNotifier, RunSummary};
pub use crate::error::NotifierError;

/// Result type for certnotify operations
pub type Result<T> = std::result::Result<T, NotifierError>;
