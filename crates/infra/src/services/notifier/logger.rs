use super::{INotifier, NotifyError};
use dms_scheduler_domain::{Switch, UrgencyTier};
use tracing::info;

/// Logs reminders instead of delivering them. Used when no reminder webhook
/// is configured.
pub struct LogNotifier {}

#[async_trait::async_trait]
impl INotifier for LogNotifier {
    async fn notify(&self, switch: &Switch, tier: UrgencyTier) -> Result<(), NotifyError> {
        info!(
            switch_id = %switch.id,
            user_id = %switch.user_id,
            deadline = switch.deadline,
            %tier,
            "Check-in reminder is due"
        );
        Ok(())
    }
}
