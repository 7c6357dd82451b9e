use crate::urgency::UrgencyTier;

/// What a reminders run did for a single `Switch`
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReminderOutcome {
    /// No reminder threshold has been reached
    NotDue,
    /// The due tier was already sent for the current deadline
    AlreadyDispatched(UrgencyTier),
    /// The reminder was sent and recorded by this run
    Dispatched(UrgencyTier),
    /// The reminder was sent but a concurrent run recorded it first
    RaceLost(UrgencyTier),
    /// The notifier failed, nothing was recorded and the next run retries
    NotificationFailed(UrgencyTier),
    /// The dispatch log could not be reached, nothing was sent or the send
    /// could not be recorded
    StorageUnavailable,
    /// The `Switch` is misconfigured, e.g. a non positive interval
    InvalidSwitch,
}

/// Tally of `ReminderOutcome`s for one reminders run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReminderRunSummary {
    /// The timestamp in millis every `Switch` was evaluated against
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

impl ReminderRunSummary {
    pub fn new(evaluated_at: i64) -> Self {
        Self {
            evaluated_at,
            ..Default::default()
        }
    }

    pub fn add(&mut self, outcome: ReminderOutcome) {
        self.evaluated += 1;
        let counter = match outcome {
            ReminderOutcome::NotDue => &mut self.not_due,
            ReminderOutcome::AlreadyDispatched(_) => &mut self.already_dispatched,
            ReminderOutcome::Dispatched(_) => &mut self.dispatched,
            ReminderOutcome::RaceLost(_) => &mut self.race_lost,
            ReminderOutcome::NotificationFailed(_) => &mut self.notification_failed,
            ReminderOutcome::StorageUnavailable => &mut self.storage_unavailable,
            ReminderOutcome::InvalidSwitch => &mut self.invalid_switches,
        };
        *counter += 1;
    }

    /// Outcomes that need operator attention when they keep showing up
    pub fn failures(&self) -> usize {
        self.notification_failed + self.storage_unavailable + self.invalid_switches
    }
}
