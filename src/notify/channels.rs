// Mailer Trait
// Delivery seam between the driver and the mail transport

use crate::notify::template::ExpiryNotice;
use async_trait::async_trait;

/// Result of a single delivery attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    Sent,
    Failed { reason: String },
}

/// Mail transport - implement this for custom delivery backends
///
/// Implementations contain their own failures: an unreachable relay or a
/// malformed address comes back as `DispatchOutcome::Failed`, never as a
/// panic or error, so one bad recipient cannot stop the batch.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Deliver `notice` to `recipient`
    async fn send(&self, recipient: &str, notice: &ExpiryNotice) -> DispatchOutcome;

    /// Get the mailer name for logging
    fn mailer_name(&self) -> &str;
}

/// Send through `mailer` and log the outcome
pub async fn dispatch(
    mailer: &dyn Mailer,
    recipient: &str,
    notice: &ExpiryNotice,
    days_left: u32,
) -> DispatchOutcome {
    tracing::debug!("Sending notice to {} via {}", recipient, mailer.mailer_name());
    let outcome = mailer.send(recipient, notice).await;

    match &outcome {
        DispatchOutcome::Sent => {
            tracing::info!("[Email Sent] To: {} (Days Left: {})", recipient, days_left);
        }
        DispatchOutcome::Failed { reason } => {
            tracing::error!("[Email Failed] To: {}, Error: {}", recipient, reason);
        }
    }

    outcome
}
