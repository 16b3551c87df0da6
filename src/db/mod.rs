// Database Module
// Read-only access to the CA's certificate database

pub mod config;
pub mod connection;
pub mod models;
pub mod repositories;
pub mod traits;

// Re-exports
pub use config::{DatabaseConfig, DatabaseType};
pub use connection::DatabasePool;
pub use models::*;
pub use repositories::CertificateRepositoryImpl;
pub use traits::*;

use chrono::{Days, NaiveDate};

/// Day on which a certificate must expire to be `threshold_days` away from `today`
pub fn target_date(today: NaiveDate, threshold_days: u32) -> NaiveDate {
    today + Days::new(u64::from(threshold_days))
}

/// Open the certificate store described by `config`
pub async fn open_certificate_store(
    config: &DatabaseConfig,
) -> crate::Result<CertificateRepositoryImpl> {
    let pool = DatabasePool::new(config).await?;
    tracing::debug!("Connected to certificate store {}", config.display_target());
    Ok(CertificateRepositoryImpl::new(pool))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_target_date_adds_threshold() {
        assert_eq!(target_date(date(2024, 1, 1), 7), date(2024, 1, 8));
        assert_eq!(target_date(date(2024, 1, 1), 14), date(2024, 1, 15));
        assert_eq!(target_date(date(2024, 1, 1), 0), date(2024, 1, 1));
    }

    #[test]
    fn test_target_date_crosses_month_and_leap_day() {
        assert_eq!(target_date(date(2024, 2, 27), 3), date(2024, 3, 1));
        assert_eq!(target_date(date(2023, 12, 31), 1), date(2024, 1, 1));
        assert_eq!(target_date(date(2024, 2, 28), 1), date(2024, 2, 29));
    }
}
