use crate::errors::{AppError, ResultExt};
use crate::models::ReportRecord;
use sqlx::PgPool;

/// Durable per-address report counter backed by Postgres.
#[derive(Clone)]
pub struct ReportLedger {
    pool: PgPool,
}

impl ReportLedger {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates the `reported_addresses` table if it does not exist yet.
    pub async fn ensure_schema(&self) -> Result<(), AppError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS reported_addresses (
                address     TEXT PRIMARY KEY,
                sent_count  BIGINT NOT NULL DEFAULT 1 CHECK (sent_count >= 1),
                created_at  TIMESTAMPTZ NOT NULL DEFAULT now(),
                updated_at  TIMESTAMPTZ NOT NULL DEFAULT now()
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .context("Failed to create reported_addresses table")?;

        Ok(())
    }

    /// Records one report of `address` and returns the new count.
    ///
    /// A single upsert statement: concurrent first reports of the same address
    /// serialize on the primary key, so none is lost and no duplicate row is
    /// created.
    pub async fn report(&self, address: &str) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO reported_addresses (address, sent_count)
            VALUES ($1, 1)
            ON CONFLICT (address) DO UPDATE
            SET sent_count = reported_addresses.sent_count + 1,
                updated_at = now()
            RETURNING sent_count
            "#,
        )
        .bind(address)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to record report for {}: {:?}", address, e);
            e
        })
        .with_context(|| format!("Failed to record report for {}", address))?;

        tracing::info!("Recorded report for {} (count={})", address, count);
        Ok(count)
    }

    /// Number of recorded reports for `address`, 0 if it was never reported.
    pub async fn get_count(&self, address: &str) -> Result<i64, AppError> {
        Ok(self
            .find_record(address)
            .await?
            .map(|record| record.sent_count)
            .unwrap_or(0))
    }

    pub async fn find_record(&self, address: &str) -> Result<Option<ReportRecord>, AppError> {
        let record = sqlx::query_as::<_, ReportRecord>(
            "SELECT address, sent_count, created_at, updated_at FROM reported_addresses WHERE address = $1",
        )
        .bind(address)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Database error in find_record for '{}': {:?}", address, e);
            AppError::DatabaseError(e)
        })?;

        Ok(record)
    }
}
