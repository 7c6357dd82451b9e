use super::{DispatchLogError, IDispatchLogRepo};
use dms_scheduler_domain::{DispatchRecord, UrgencyTier, ID};
use sqlx::{types::Uuid, FromRow, PgPool};
use std::convert::TryFrom;

const UNIQUE_VIOLATION: &str = "23505";

pub struct PostgresDispatchLogRepo {
    pool: PgPool,
}

impl PostgresDispatchLogRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct DispatchRecordRaw {
    switch_uid: Uuid,
    deadline: i64,
    tier: String,
    dispatched_at: i64,
}

impl TryFrom<DispatchRecordRaw> for DispatchRecord {
    type Error = anyhow::Error;

    fn try_from(raw: DispatchRecordRaw) -> Result<Self, Self::Error> {
        Ok(DispatchRecord {
            switch_id: raw.switch_uid.into(),
            deadline: raw.deadline,
            tier: raw.tier.parse()?,
            dispatched_at: raw.dispatched_at,
        })
    }
}

fn persistence_error(e: sqlx::Error) -> DispatchLogError {
    DispatchLogError::Persistence(anyhow::Error::new(e))
}

#[async_trait::async_trait]
impl IDispatchLogRepo for PostgresDispatchLogRepo {
    async fn has_dispatched(
        &self,
        switch_id: &ID,
        deadline: i64,
        tier: UrgencyTier,
    ) -> Result<bool, DispatchLogError> {
        let row: Option<(i64,)> = sqlx::query_as(
            r#"
            SELECT 1::bigint FROM switch_dispatch_log AS d
            WHERE d.switch_uid = $1 AND d.deadline = $2 AND d.tier = $3
            "#,
        )
        .bind(switch_id.inner_ref())
        .bind(deadline)
        .bind(tier.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(persistence_error)?;

        Ok(row.is_some())
    }

    async fn record(&self, record: &DispatchRecord) -> Result<(), DispatchLogError> {
        // The primary key decides the winner between concurrent runs
        let res = sqlx::query(
            r#"
            INSERT INTO switch_dispatch_log
            (switch_uid, deadline, tier, dispatched_at)
            VALUES($1, $2, $3, $4)
            ON CONFLICT (switch_uid, deadline, tier) DO NOTHING
            "#,
        )
        .bind(record.switch_id.inner_ref())
        .bind(record.deadline)
        .bind(record.tier.as_str())
        .bind(record.dispatched_at)
        .execute(&self.pool)
        .await;

        match res {
            Ok(done) if done.rows_affected() == 1 => Ok(()),
            Ok(_) => Err(DispatchLogError::AlreadyRecorded),
            Err(sqlx::Error::Database(e)) if e.code().as_deref() == Some(UNIQUE_VIOLATION) => {
                Err(DispatchLogError::AlreadyRecorded)
            }
            Err(e) => Err(persistence_error(e)),
        }
    }

    async fn find_by_switch(&self, switch_id: &ID) -> Result<Vec<DispatchRecord>, DispatchLogError> {
        let rows: Vec<DispatchRecordRaw> = sqlx::query_as(
            r#"
            SELECT * FROM switch_dispatch_log AS d
            WHERE d.switch_uid = $1
            ORDER BY d.dispatched_at, d.deadline, d.tier
            "#,
        )
        .bind(switch_id.inner_ref())
        .fetch_all(&self.pool)
        .await
        .map_err(persistence_error)?;

        rows.into_iter()
            .map(|raw| DispatchRecord::try_from(raw).map_err(DispatchLogError::Persistence))
            .collect()
    }
}
