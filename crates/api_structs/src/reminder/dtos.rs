use dms_scheduler_domain::ReminderRunSummary;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReminderRunSummaryDTO {
    pub evaluated_at: i64,
    pub evaluated: usize,
    pub not_due: usize,
    pub already_dispatched: usize,
    pub dispatched: usize,
    pub race_lost: usize,
    pub notification_failed: usize,
    pub storage_unavailable: usize,
    pub invalid_switches: usize,
}

impl ReminderRunSummaryDTO {
    pub fn new(summary: ReminderRunSummary) -> Self {
        Self {
            evaluated_at: summary.evaluated_at,
            evaluated: summary.evaluated,
            not_due: summary.not_due,
            already_dispatched: summary.already_dispatched,
            dispatched: summary.dispatched,
            race_lost: summary.race_lost,
            notification_failed: summary.notification_failed,
            storage_unavailable: summary.storage_unavailable,
            invalid_switches: summary.invalid_switches,
        }
    }
}
