use super::ISwitchRepo;
use dms_scheduler_domain::{Switch, ID};
use sqlx::{types::Uuid, FromRow, PgPool};
use std::convert::TryFrom;

pub struct PostgresSwitchRepo {
    pool: PgPool,
}

impl PostgresSwitchRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct SwitchRaw {
    switch_uid: Uuid,
    user_uid: Uuid,
    title: String,
    deadline: i64,
    interval_length: i64,
    status: String,
}

impl TryFrom<SwitchRaw> for Switch {
    type Error = anyhow::Error;

    fn try_from(raw: SwitchRaw) -> Result<Self, Self::Error> {
        Ok(Switch {
            id: raw.switch_uid.into(),
            user_id: raw.user_uid.into(),
            title: raw.title,
            deadline: raw.deadline,
            interval_length: raw.interval_length,
            status: raw.status.parse()?,
        })
    }
}

#[async_trait::async_trait]
impl ISwitchRepo for PostgresSwitchRepo {
    async fn insert(&self, switch: &Switch) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO switches
            (switch_uid, user_uid, title, deadline, interval_length, status)
            VALUES($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(switch.id.inner_ref())
        .bind(switch.user_id.inner_ref())
        .bind(&switch.title)
        .bind(switch.deadline)
        .bind(switch.interval_length)
        .bind(switch.status.as_str())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn save(&self, switch: &Switch) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE switches
            SET title = $2,
                deadline = $3,
                interval_length = $4,
                status = $5
            WHERE switch_uid = $1
            "#,
        )
        .bind(switch.id.inner_ref())
        .bind(&switch.title)
        .bind(switch.deadline)
        .bind(switch.interval_length)
        .bind(switch.status.as_str())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find(&self, switch_id: &ID) -> anyhow::Result<Option<Switch>> {
        let raw: Option<SwitchRaw> = sqlx::query_as(
            r#"
            SELECT * FROM switches AS s
            WHERE s.switch_uid = $1
            "#,
        )
        .bind(switch_id.inner_ref())
        .fetch_optional(&self.pool)
        .await?;

        raw.map(Switch::try_from).transpose()
    }

    async fn find_pending(
        &self,
        now: i64,
        after: Option<&ID>,
        limit: i64,
    ) -> anyhow::Result<Vec<Switch>> {
        let rows: Vec<SwitchRaw> = sqlx::query_as(
            r#"
            SELECT * FROM switches AS s
            WHERE s.status = 'active' AND
            s.deadline > $1 AND
            ($2::uuid IS NULL OR s.switch_uid > $2)
            ORDER BY s.switch_uid
            LIMIT $3
            "#,
        )
        .bind(now)
        .bind(after.map(|id| *id.inner_ref()))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Switch::try_from).collect()
    }
}
