use crate::shared::entity::{Entity, ID};
use crate::urgency::{classify, ClassifyError, UrgencyTier};
use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};
use thiserror::Error;

/// A `Switch` guards a secret that is disclosed to its recipients unless the
/// owning `User` checks in before `deadline`. The secret itself and its
/// recipients are owned by the surrounding application; this service only
/// needs to know when the next check-in is due.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Switch {
    pub id: ID,
    /// The `User` who has to check in and who receives the reminders
    pub user_id: ID,
    pub title: String,
    /// Timestamp in millis of the next required check-in
    pub deadline: i64,
    /// Duration in millis between two check-ins, e.g. 30 days
    pub interval_length: i64,
    pub status: SwitchStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SwitchStatus {
    /// Waiting for the next check-in, reminders are sent for these only
    Active,
    Paused,
    /// The deadline passed and disclosure has been handed off
    Triggered,
}

impl SwitchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Paused => "paused",
            Self::Triggered => "triggered",
        }
    }
}

impl Display for SwitchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug)]
#[error("Unknown switch status: {0}")]
pub struct InvalidSwitchStatus(pub String);

impl FromStr for SwitchStatus {
    type Err = InvalidSwitchStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "paused" => Ok(Self::Paused),
            "triggered" => Ok(Self::Triggered),
            _ => Err(InvalidSwitchStatus(s.to_string())),
        }
    }
}

#[derive(Error, Debug, PartialEq)]
#[error("Check-in interval must be positive, got {0} millis")]
pub struct InvalidIntervalError(pub i64);

impl Switch {
    /// Creates an active `Switch` whose first check-in is due one interval from `now`
    pub fn new(
        user_id: ID,
        title: String,
        interval_length: i64,
        now: i64,
    ) -> Result<Self, InvalidIntervalError> {
        if interval_length <= 0 {
            return Err(InvalidIntervalError(interval_length));
        }
        Ok(Self {
            id: Default::default(),
            user_id,
            title,
            deadline: now.saturating_add(interval_length),
            interval_length,
            status: SwitchStatus::Active,
        })
    }

    pub fn is_active(&self) -> bool {
        self.status == SwitchStatus::Active
    }

    /// Pushes the deadline one full interval ahead of `now`
    pub fn check_in(&mut self, now: i64) {
        self.deadline = now.saturating_add(self.interval_length);
    }

    /// Changing the interval counts as a check-in, so the deadline is
    /// recomputed from `now` with the new interval. Any reminders already
    /// dispatched against the old deadline no longer apply.
    pub fn update_interval(
        &mut self,
        interval_length: i64,
        now: i64,
    ) -> Result<(), InvalidIntervalError> {
        if interval_length <= 0 {
            return Err(InvalidIntervalError(interval_length));
        }
        self.interval_length = interval_length;
        self.check_in(now);
        Ok(())
    }

    /// The reminder tier due at `now`, if any
    pub fn due_tier(&self, now: i64) -> Result<Option<UrgencyTier>, ClassifyError> {
        classify(now, self.deadline, self.interval_length)
    }
}

impl Entity for Switch {
    fn id(&self) -> &ID {
        &self.id
    }
}
