mod dispatch;
mod reminder_run;
mod shared;
mod switch;
mod urgency;

pub use dispatch::DispatchRecord;
pub use reminder_run::{ReminderOutcome, ReminderRunSummary};
pub use shared::entity::{Entity, InvalidIDError, ID};
pub use switch::{InvalidIntervalError, InvalidSwitchStatus, Switch, SwitchStatus};
pub use urgency::{
    classify, ClassifyError, InvalidUrgencyTier, UrgencyTier, DAY_MILLIS, HOUR_MILLIS,
};
