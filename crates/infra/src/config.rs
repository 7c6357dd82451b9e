use dms_scheduler_utils::create_random_secret;
use std::{fmt::Display, str::FromStr};
use tracing::{info, warn};

const CRON_SECRET_LEN: usize = 32;

#[derive(Debug, Clone)]
pub struct Config {
    /// Port for the application to run on
    pub port: usize,
    /// Shared secret that an external scheduler has to present to trigger
    /// a reminders run over HTTP
    pub cron_secret: String,
    /// Whether this process should run the reminders job itself. Disable it
    /// when an external scheduler calls the trigger route instead.
    pub reminder_job_enabled: bool,
    /// Seconds between two reminder runs of the in-process job scheduler
    pub poll_interval_secs: u64,
    /// Number of `Switch`es loaded from storage per page during a run
    pub switches_page_size: i64,
    /// Upper bound on `Switch`es being evaluated concurrently within a run
    pub max_concurrent_evaluations: usize,
    /// A notification attempt taking longer than this is counted as failed
    /// and retried on the next run
    pub notifier_timeout_millis: u64,
    /// Timeout for each dispatch log read or write
    pub storage_timeout_millis: u64,
    /// Where reminders are delivered. When missing, reminders are only logged.
    pub reminder_webhook: Option<ReminderWebhookSettings>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReminderWebhookSettings {
    pub url: String,
    pub key: String,
}

impl ReminderWebhookSettings {
    /// Only absolute http(s) urls are accepted
    pub fn new(url: String, key: String) -> Option<Self> {
        match url::Url::parse(&url) {
            Ok(parsed_url) if ["https", "http"].contains(&parsed_url.scheme()) => {
                Some(Self { url, key })
            }
            _ => None,
        }
    }
}

fn parse_env_or<T>(name: &str, default: T) -> T
where
    T: FromStr + Display,
{
    match std::env::var(name) {
        Ok(value) => match value.parse::<T>() {
            Ok(parsed) => parsed,
            Err(_) => {
                warn!(
                    "The given {}: {} is not valid, falling back to the default: {}.",
                    name, value, default
                );
                default
            }
        },
        Err(_) => default,
    }
}

impl Config {
    pub fn new() -> Self {
        let cron_secret = match std::env::var("CRON_SECRET") {
            Ok(secret) if !secret.is_empty() => secret,
            _ => {
                info!("Did not find CRON_SECRET environment variable. Going to create one.");
                let secret = create_random_secret(CRON_SECRET_LEN);
                info!("Secret for triggering reminder runs was generated and set to: {}", secret);
                secret
            }
        };

        let reminder_webhook = match std::env::var("REMINDER_WEBHOOK_URL") {
            Ok(url) => {
                let key = std::env::var("REMINDER_WEBHOOK_KEY").unwrap_or_default();
                let settings = ReminderWebhookSettings::new(url.clone(), key);
                if settings.is_none() {
                    warn!(
                        "The given REMINDER_WEBHOOK_URL: {} is not a valid http(s) url, reminders will only be logged.",
                        url
                    );
                }
                settings
            }
            Err(_) => None,
        };

        let poll_interval_secs = match parse_env_or("REMINDER_POLL_INTERVAL_SECS", 300u64) {
            0 => {
                warn!("REMINDER_POLL_INTERVAL_SECS must be positive, falling back to 300.");
                300
            }
            secs => secs,
        };

        Self {
            port: parse_env_or("PORT", 5000),
            cron_secret,
            reminder_job_enabled: parse_env_or("REMINDER_JOB_ENABLED", true),
            poll_interval_secs,
            switches_page_size: parse_env_or("SWITCHES_PAGE_SIZE", 500i64).max(1),
            max_concurrent_evaluations: parse_env_or("MAX_CONCURRENT_EVALUATIONS", 16usize).max(1),
            notifier_timeout_millis: parse_env_or("NOTIFIER_TIMEOUT_MILLIS", 10_000),
            storage_timeout_millis: parse_env_or("STORAGE_TIMEOUT_MILLIS", 5_000),
            reminder_webhook,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
