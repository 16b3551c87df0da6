// Database Traits
// Defines the certificate lookup interface used by the driver

use crate::db::models::ExpiringCertificate;
use async_trait::async_trait;
use chrono::NaiveDate;

/// Source of certificates expiring on a given day
#[async_trait]
pub trait CertificateSource: Send + Sync {
    /// Certificates whose expiration date (time-of-day ignored) equals
    /// `target_date` and whose owner email is present and non-empty
    async fn find_expiring_on(
        &self,
        target_date: NaiveDate,
    ) -> crate::Result<Vec<ExpiringCertificate>>;

    /// Release the underlying connection
    async fn close(&self) {}
}
