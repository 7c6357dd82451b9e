mod config;
mod repos;
mod services;
mod system;

pub use config::{Config, ReminderWebhookSettings};
pub use repos::{DispatchLogError, IDispatchLogRepo, ISwitchRepo, Repos};
pub use services::*;
use sqlx::postgres::PgPoolOptions;
use std::{sync::Arc, time::Duration};
pub use system::{ISys, RealSys, StaticTimeSys};
use tracing::info;

#[derive(Clone)]
pub struct DmsContext {
    pub repos: Repos,
    pub config: Config,
    pub sys: Arc<dyn ISys>,
    pub notifier: Arc<dyn INotifier>,
}

struct ContextParams {
    pub postgres_connection_string: String,
}

impl DmsContext {
    async fn create(params: ContextParams) -> anyhow::Result<Self> {
        let repos = Repos::create_postgres(&params.postgres_connection_string).await?;
        let config = Config::new();
        let notifier = create_notifier(&config)?;
        Ok(Self {
            repos,
            config,
            sys: Arc::new(RealSys {}),
            notifier,
        })
    }

    /// Context backed by inmemory repos that only logs reminders. Tests swap
    /// out `sys` and `notifier` as needed.
    pub fn create_inmemory() -> Self {
        Self {
            repos: Repos::create_inmemory(),
            config: Config::new(),
            sys: Arc::new(RealSys {}),
            notifier: Arc::new(LogNotifier {}),
        }
    }
}

fn create_notifier(config: &Config) -> anyhow::Result<Arc<dyn INotifier>> {
    match &config.reminder_webhook {
        Some(settings) => {
            info!("Reminders will be delivered to webhook: {}", settings.url);
            let timeout = Duration::from_millis(config.notifier_timeout_millis);
            Ok(Arc::new(WebhookNotifier::new(settings.clone(), timeout)?))
        }
        None => {
            info!("No REMINDER_WEBHOOK_URL configured, reminders will only be logged");
            Ok(Arc::new(LogNotifier {}))
        }
    }
}

/// Will setup the infrastructure context given the environment
pub async fn setup_context() -> anyhow::Result<DmsContext> {
    DmsContext::create(ContextParams {
        postgres_connection_string: get_psql_connection_string()?,
    })
    .await
}

fn get_psql_connection_string() -> anyhow::Result<String> {
    const PSQL_CONNECTION_STRING: &str = "DATABASE_URL";

    std::env::var(PSQL_CONNECTION_STRING)
        .map_err(|_| anyhow::anyhow!("{} env var to be present.", PSQL_CONNECTION_STRING))
}

pub async fn run_migration() -> anyhow::Result<()> {
    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect(&get_psql_connection_string()?)
        .await?;

    sqlx::migrate!().run(&pool).await?;
    Ok(())
}
