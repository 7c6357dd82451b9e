use super::{INotifier, NotifyError};
use crate::config::ReminderWebhookSettings;
use dms_scheduler_domain::{Switch, UrgencyTier, ID};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::error;

pub const WEBHOOK_KEY_HEADER: &str = "dms-webhook-key";

/// Body of the request sent to the reminder webhook
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderWebhookPayload {
    pub switch_id: ID,
    pub user_id: ID,
    pub title: String,
    pub tier: UrgencyTier,
    /// Timestamp in millis the owner has to check in before
    pub deadline: i64,
    pub interval_length: i64,
}

impl ReminderWebhookPayload {
    pub fn new(switch: &Switch, tier: UrgencyTier) -> Self {
        Self {
            switch_id: switch.id,
            user_id: switch.user_id,
            title: switch.title.clone(),
            tier,
            deadline: switch.deadline,
            interval_length: switch.interval_length,
        }
    }
}

/// Posts reminders to a webhook that takes care of the actual e-mail / SMS delivery
pub struct WebhookNotifier {
    client: Client,
    settings: ReminderWebhookSettings,
}

impl WebhookNotifier {
    pub fn new(settings: ReminderWebhookSettings, timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, settings })
    }
}

#[async_trait::async_trait]
impl INotifier for WebhookNotifier {
    async fn notify(&self, switch: &Switch, tier: UrgencyTier) -> Result<(), NotifyError> {
        let res = self
            .client
            .post(&self.settings.url)
            .header(WEBHOOK_KEY_HEADER, &self.settings.key)
            .json(&ReminderWebhookPayload::new(switch, tier))
            .send()
            .await
            .map_err(|e| {
                error!(
                    "[Network Error] Reminder webhook error for switch: {}. Error message: {:?}",
                    switch.id, e
                );
                NotifyError::Network(e.to_string())
            })?;

        let status = res.status();
        if status.is_success() {
            Ok(())
        } else {
            error!(
                "[Unexpected Response] Reminder webhook responded with {} for switch: {}",
                status, switch.id
            );
            Err(NotifyError::UnexpectedStatus(status.as_u16()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dms_scheduler_domain::DAY_MILLIS;

    fn switch_factory() -> Switch {
        Switch::new(ID::new(), "Vault".into(), 30 * DAY_MILLIS, 0).unwrap()
    }

    #[test]
    fn payload_uses_tier_identifier() {
        let switch = switch_factory();
        let payload = ReminderWebhookPayload::new(&switch, UrgencyTier::TwentyFourHours);
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["tier"], "24_hours");
        assert_eq!(json["switchId"], switch.id.as_string());
        assert_eq!(json["deadline"], 30 * DAY_MILLIS);
    }

    #[tokio::test]
    async fn unreachable_webhook_is_an_error() {
        let settings = ReminderWebhookSettings::new("http://127.0.0.1:9/reminders".into(), "key".into())
            .expect("Valid url");
        let notifier = WebhookNotifier::new(settings, Duration::from_secs(2)).unwrap();
        let res = notifier
            .notify(&switch_factory(), UrgencyTier::OneHour)
            .await;
        assert!(matches!(res, Err(NotifyError::Network(_))));
    }
}
