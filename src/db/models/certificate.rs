// Certificate Record Model
// A certificate from the external CA database joined with its owner's email

use chrono::{NaiveDate, NaiveDateTime};
use sqlx::FromRow;

/// Certificate nearing expiry, as read from the `cert` / `csr` join
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct ExpiringCertificate {
    #[sqlx(rename = "certid")]
    pub cert_id: i64,
    /// Subject distinguished name, displayed verbatim
    pub subject: String,
    /// "Valid until" timestamp in the CA's local time
    #[sqlx(rename = "vuntil")]
    pub expiration: NaiveDateTime,
    /// Owner email from the certificate request
    pub email: Option<String>,
}

impl ExpiringCertificate {
    /// Create new certificate record
    pub fn new(
        cert_id: i64,
        subject: impl Into<String>,
        expiration: NaiveDateTime,
        email: Option<String>,
    ) -> Self {
        Self {
            cert_id,
            subject: subject.into(),
            expiration,
            email,
        }
    }

    /// Owner address, if present and not blank
    pub fn recipient(&self) -> Option<&str> {
        self.email
            .as_deref()
            .map(str::trim)
            .filter(|email| !email.is_empty())
    }

    /// Expiration date with time-of-day dropped
    pub fn expiration_date(&self) -> NaiveDate {
        self.expiration.date()
    }
}
