mod dispatch_log;
mod shared;
mod switch;

pub use dispatch_log::{DispatchLogError, IDispatchLogRepo};
use dispatch_log::{InMemoryDispatchLogRepo, PostgresDispatchLogRepo};
pub use switch::ISwitchRepo;
use switch::{InMemorySwitchRepo, PostgresSwitchRepo};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub struct Repos {
    pub switches: Arc<dyn ISwitchRepo>,
    pub dispatch_log: Arc<dyn IDispatchLogRepo>,
}

impl Repos {
    pub async fn create_postgres(connection_string: &str) -> anyhow::Result<Self> {
        info!("DB CHECKING CONNECTION ...");
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(connection_string)
            .await?;
        info!("DB CHECKING CONNECTION ... [done]");

        Ok(Self {
            switches: Arc::new(PostgresSwitchRepo::new(pool.clone())),
            dispatch_log: Arc::new(PostgresDispatchLogRepo::new(pool)),
        })
    }

    /// Repositories that live in process memory. For tests and local
    /// development only, the dispatch log has to be durable and shared
    /// between replicas in production.
    pub fn create_inmemory() -> Self {
        Self {
            switches: Arc::new(InMemorySwitchRepo::new()),
            dispatch_log: Arc::new(InMemoryDispatchLogRepo::new()),
        }
    }
}
