use crate::dtos::ReminderRunSummaryDTO;
use dms_scheduler_domain::ReminderRunSummary;
use serde::{Deserialize, Serialize};

pub mod process_reminders {
    use super::*;

    /// Header the external scheduler has to set to the configured cron secret
    pub const CRON_SECRET_HEADER: &str = "dms-cron-secret";

    #[derive(Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub summary: ReminderRunSummaryDTO,
    }

    impl APIResponse {
        pub fn new(summary: ReminderRunSummary) -> Self {
            Self {
                summary: ReminderRunSummaryDTO::new(summary),
            }
        }
    }
}
