use crate::shared::entity::ID;
use crate::switch::Switch;
use crate::urgency::UrgencyTier;
use serde::{Deserialize, Serialize};

/// A `DispatchRecord` states that the reminder for `tier` was sent for the
/// `Switch`'s `deadline`.
///
/// `(switch_id, deadline, tier)` is unique and records are never updated.
/// Keying on the deadline means a check-in, which moves the deadline,
/// re-arms every tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchRecord {
    pub switch_id: ID,
    pub deadline: i64,
    pub tier: UrgencyTier,
    /// Timestamp in millis of when the reminder was confirmed sent
    pub dispatched_at: i64,
}

impl DispatchRecord {
    pub fn new(switch: &Switch, tier: UrgencyTier, dispatched_at: i64) -> Self {
        Self {
            switch_id: switch.id,
            deadline: switch.deadline,
            tier,
            dispatched_at,
        }
    }

    pub fn matches(&self, switch_id: &ID, deadline: i64, tier: UrgencyTier) -> bool {
        self.switch_id == *switch_id && self.deadline == deadline && self.tier == tier
    }

    pub fn same_key(&self, other: &DispatchRecord) -> bool {
        self.matches(&other.switch_id, other.deadline, other.tier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::urgency::DAY_MILLIS;

    #[test]
    fn key_includes_the_deadline() {
        let mut switch = Switch::new(ID::new(), "Vault".into(), 30 * DAY_MILLIS, 0).unwrap();
        let record = DispatchRecord::new(&switch, UrgencyTier::SevenDays, 10);
        assert!(record.matches(&switch.id, switch.deadline, UrgencyTier::SevenDays));
        assert!(!record.matches(&switch.id, switch.deadline, UrgencyTier::ThreeDays));

        switch.check_in(DAY_MILLIS);
        assert!(!record.matches(&switch.id, switch.deadline, UrgencyTier::SevenDays));
        let rearmed = DispatchRecord::new(&switch, UrgencyTier::SevenDays, 20);
        assert!(!record.same_key(&rearmed));
    }
}
