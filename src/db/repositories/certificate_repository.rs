// Certificate Repository Implementation
// Looks up certificates expiring on a target date in the CA database

use crate::db::connection::DatabasePool;
use crate::db::models::ExpiringCertificate;
use crate::db::traits::CertificateSource;
use crate::error::NotifierError;
use async_trait::async_trait;
use chrono::NaiveDate;

/// Both backends accept `?` placeholders and a `DATE()` function, so one
/// statement serves MySQL and SQLite. The date is always bound.
/// `certid` is widened so unsigned or narrow id columns decode as i64.
const EXPIRING_ON_QUERY: &str = r#"
    SELECT CAST(c.certid AS SIGNED) AS certid, c.subject, c.vuntil, r.email
    FROM cert c INNER JOIN csr r ON c.csrid = r.csrid
    WHERE DATE(c.vuntil) = ? AND r.email IS NOT NULL AND r.email != ''
    ORDER BY c.certid
"#;

pub struct CertificateRepositoryImpl {
    pool: DatabasePool,
}

impl CertificateRepositoryImpl {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DatabasePool {
        &self.pool
    }
}

#[async_trait]
impl CertificateSource for CertificateRepositoryImpl {
    async fn find_expiring_on(
        &self,
        target_date: NaiveDate,
    ) -> crate::Result<Vec<ExpiringCertificate>> {
        let rows = match &self.pool {
            DatabasePool::Mysql(pool) => {
                sqlx::query_as::<_, ExpiringCertificate>(EXPIRING_ON_QUERY)
                    .bind(target_date)
                    .fetch_all(pool)
                    .await
            }
            DatabasePool::Sqlite(pool) => {
                sqlx::query_as::<_, ExpiringCertificate>(EXPIRING_ON_QUERY)
                    .bind(target_date)
                    .fetch_all(pool)
                    .await
            }
        }
        .map_err(|e| {
            NotifierError::DatabaseError(format!(
                "Failed to fetch certificates expiring on {}: {}",
                target_date, e
            ))
        })?;

        Ok(rows)
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}
