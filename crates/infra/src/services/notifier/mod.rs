mod logger;
mod webhook;

use dms_scheduler_domain::{Switch, UrgencyTier};
pub use logger::LogNotifier;
use thiserror::Error;
pub use webhook::{ReminderWebhookPayload, WebhookNotifier, WEBHOOK_KEY_HEADER};

#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("Unable to reach the reminder webhook: {0}")]
    Network(String),
    #[error("The reminder webhook responded with status code {0}")]
    UnexpectedStatus(u16),
}

/// Delivers a reminder to the owner of a `Switch`, e.g. by e-mail or SMS.
///
/// `Ok` means the reminder was handed off for delivery. A failed attempt is
/// not recorded, so the same tier is attempted again on the next run.
#[async_trait::async_trait]
pub trait INotifier: Send + Sync {
    async fn notify(&self, switch: &Switch, tier: UrgencyTier) -> Result<(), NotifyError>;
}
