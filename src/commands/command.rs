// Command trait - Defines the interface for command implementations

use crate::Result;
use async_trait::async_trait;

/// Command trait - one operational mode of the binary
///
/// A command owns its configuration, runs to completion and reports
/// configuration-level problems through `Err`. Per-item failures inside a
/// run belong in the log, not in the return value.
#[async_trait]
pub trait Command: Send + Sync {
    /// Execute the command asynchronously
    async fn execute(&self) -> Result<()>;
}
