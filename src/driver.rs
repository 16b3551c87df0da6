// Check Driver - one pass over every threshold
//
// For each threshold: look up certificates expiring on today + threshold,
// render a notice per certificate, send it, and record successful sends.
// A database error ends the pass; a mail or history error only affects the
// certificate being processed.

use crate::config::DEFAULT_THRESHOLDS;
use crate::db::models::ExpiringCertificate;
use crate::db::{CertificateSource, target_date};
use crate::notify::{
    DispatchOutcome, HistoryEntry, HistoryRecorder, Mailer, NoticeTemplate, SentKey, dispatch,
};
use chrono::{Local, NaiveDate, NaiveDateTime};
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

/// Counters for a finished pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub thresholds_checked: usize,
    pub certificates_found: usize,
    pub sent: usize,
    pub failed: usize,
    /// Records without a usable owner email or outside the target date
    pub skipped: usize,
    /// Records already notified today (only with same-day dedup)
    pub duplicates: usize,
    pub history_errors: usize,
    /// A database error stopped the pass early
    pub aborted: bool,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "thresholds={} found={} sent={} failed={} skipped={} duplicates={} history_errors={}{}",
            self.thresholds_checked,
            self.certificates_found,
            self.sent,
            self.failed,
            self.skipped,
            self.duplicates,
            self.history_errors,
            if self.aborted { " (aborted)" } else { "" }
        )
    }
}

/// Runs the query → render → send → record pipeline
pub struct ExpiryNotifier {
    source: Arc<dyn CertificateSource>,
    mailer: Arc<dyn Mailer>,
    history: HistoryRecorder,
    template: NoticeTemplate,
    thresholds: Vec<u32>,
    dedup_same_day: bool,
    clock: fn() -> NaiveDateTime,
}

impl ExpiryNotifier {
    pub fn new(
        source: Arc<dyn CertificateSource>,
        mailer: Arc<dyn Mailer>,
        history: HistoryRecorder,
    ) -> Self {
        Self {
            source,
            mailer,
            history,
            template: NoticeTemplate::default(),
            thresholds: DEFAULT_THRESHOLDS.to_vec(),
            dedup_same_day: false,
            clock: local_now,
        }
    }

    pub fn with_thresholds(mut self, thresholds: Vec<u32>) -> Self {
        self.thresholds = thresholds;
        self
    }

    pub fn with_template(mut self, template: NoticeTemplate) -> Self {
        self.template = template;
        self
    }

    pub fn with_dedup_same_day(mut self, enabled: bool) -> Self {
        self.dedup_same_day = enabled;
        self
    }

    /// Override the source of history timestamps
    pub fn with_clock(mut self, clock: fn() -> NaiveDateTime) -> Self {
        self.clock = clock;
        self
    }

    /// Run one full check for `today`; the source is closed on every path
    pub async fn run(&self, today: NaiveDate) -> RunSummary {
        let mut summary = RunSummary::default();

        tracing::info!("--- Starting Check ---");

        let already_sent = self.load_sent_today(today);

        if let Err(e) = self
            .check_thresholds(today, &already_sent, &mut summary)
            .await
        {
            tracing::error!("[DB Error] {}", e);
            summary.aborted = true;
        }

        self.source.close().await;

        tracing::info!("Summary: {}", summary);
        tracing::info!("--- Check Completed ---");

        summary
    }

    /// Sends already recorded today; empty when dedup is off
    fn load_sent_today(&self, today: NaiveDate) -> HashSet<SentKey> {
        if !self.dedup_same_day {
            return HashSet::new();
        }

        match self.history.sent_on(today) {
            Ok(sent) => sent,
            Err(e) => {
                tracing::warn!("Could not read sent history, sending anyway: {}", e);
                HashSet::new()
            }
        }
    }

    async fn check_thresholds(
        &self,
        today: NaiveDate,
        already_sent: &HashSet<SentKey>,
        summary: &mut RunSummary,
    ) -> crate::Result<()> {
        for &days in &self.thresholds {
            let target = target_date(today, days);
            let certificates = self.source.find_expiring_on(target).await?;
            summary.thresholds_checked += 1;

            if certificates.is_empty() {
                tracing::debug!("Target Date: {} ({} days left), Found: 0", target, days);
                continue;
            }

            tracing::info!(
                "Target Date: {} ({} days left), Found: {}",
                target,
                days,
                certificates.len()
            );
            summary.certificates_found += certificates.len();

            for cert in &certificates {
                self.notify_owner(cert, days, today, target, already_sent, summary)
                    .await;
            }
        }

        Ok(())
    }

    async fn notify_owner(
        &self,
        cert: &ExpiringCertificate,
        days: u32,
        today: NaiveDate,
        target: NaiveDate,
        already_sent: &HashSet<SentKey>,
        summary: &mut RunSummary,
    ) {
        if cert.expiration_date() != target {
            tracing::warn!(
                "Skipping certificate {}: expires {} but target date is {}",
                cert.cert_id,
                cert.expiration_date(),
                target
            );
            summary.skipped += 1;
            return;
        }

        let Some(recipient) = cert.recipient() else {
            tracing::warn!(
                "Skipping certificate {} ({}): no owner email",
                cert.cert_id,
                cert.subject
            );
            summary.skipped += 1;
            return;
        };

        if self.dedup_same_day {
            let key = SentKey {
                date: today,
                recipient: recipient.to_string(),
                cert_subject: cert.subject.clone(),
                days_left: days,
            };

            if already_sent.contains(&key) {
                tracing::info!(
                    "[Already Sent] To: {} (Days Left: {}), skipping",
                    recipient,
                    days
                );
                summary.duplicates += 1;
                return;
            }
        }

        let notice = self.template.render(cert, days);

        match dispatch(self.mailer.as_ref(), recipient, &notice, days).await {
            DispatchOutcome::Sent => {
                summary.sent += 1;

                let entry = HistoryEntry::success((self.clock)(), recipient, &cert.subject, days);
                if let Err(e) = self.history.record(&entry) {
                    tracing::error!("[History Failed] To: {}, Error: {}", recipient, e);
                    summary.history_errors += 1;
                }
            }
            DispatchOutcome::Failed { .. } => {
                summary.failed += 1;
            }
        }
    }
}

fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}
