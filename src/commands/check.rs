// CheckCommand - one certificate expiry check-and-notify pass

use super::Command;
use crate::Result;
use crate::config::NotifierConfig;
use crate::db::open_certificate_store;
use crate::driver::{ExpiryNotifier, RunSummary};
use crate::notify::{HistoryRecorder, SmtpMailer};
use async_trait::async_trait;
use chrono::{Local, NaiveDate};
use std::sync::Arc;

/// CheckCommand wires configuration into the driver
///
/// This command is responsible for:
/// - Opening the certificate store connection
/// - Building the SMTP mailer and the history recorder
/// - Running the driver for the current local date
pub struct CheckCommand {
    config: NotifierConfig,
}

impl CheckCommand {
    /// Create a new CheckCommand with the given configuration
    pub fn new(config: NotifierConfig) -> Self {
        Self { config }
    }

    /// Run one pass as if the local date were `today`
    pub async fn run_for(&self, today: NaiveDate) -> RunSummary {
        let source = match open_certificate_store(&self.config.database).await {
            Ok(source) => source,
            Err(e) => {
                tracing::error!("[DB Error] {}", e);
                tracing::info!("--- Check Completed ---");
                return RunSummary {
                    aborted: true,
                    ..RunSummary::default()
                };
            }
        };

        let history = HistoryRecorder::new(self.config.history_file.clone());
        tracing::debug!("Sent history: {}", history.path().display());

        let notifier = ExpiryNotifier::new(
            Arc::new(source),
            Arc::new(SmtpMailer::new(self.config.smtp.clone())),
            history,
        )
        .with_thresholds(self.config.thresholds.clone())
        .with_template(self.config.template.clone())
        .with_dedup_same_day(self.config.dedup_same_day);

        notifier.run(today).await
    }
}

#[async_trait]
impl Command for CheckCommand {
    async fn execute(&self) -> Result<()> {
        // Failures are reported through the log; the exit status stays the same
        self.run_for(Local::now().date_naive()).await;
        Ok(())
    }
}
