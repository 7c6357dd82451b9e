use super::{DispatchLogError, IDispatchLogRepo};
use crate::repos::shared::inmemory_repo::*;
use dms_scheduler_domain::{DispatchRecord, UrgencyTier, ID};

/// Only meant for tests and local development, the log does not survive
/// restarts and is not shared between processes
pub struct InMemoryDispatchLogRepo {
    records: std::sync::Mutex<Vec<DispatchRecord>>,
}

impl InMemoryDispatchLogRepo {
    pub fn new() -> Self {
        Self {
            records: std::sync::Mutex::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl IDispatchLogRepo for InMemoryDispatchLogRepo {
    async fn has_dispatched(
        &self,
        switch_id: &ID,
        deadline: i64,
        tier: UrgencyTier,
    ) -> Result<bool, DispatchLogError> {
        Ok(exists(&self.records, |r| r.matches(switch_id, deadline, tier)))
    }

    async fn record(&self, record: &DispatchRecord) -> Result<(), DispatchLogError> {
        if insert_unique(record, &self.records, |r| r.same_key(record)) {
            Ok(())
        } else {
            Err(DispatchLogError::AlreadyRecorded)
        }
    }

    async fn find_by_switch(&self, switch_id: &ID) -> Result<Vec<DispatchRecord>, DispatchLogError> {
        Ok(find_by(&self.records, |r| r.switch_id == *switch_id))
    }
}
