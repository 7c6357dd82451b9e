mod inmemory;
mod postgres;

use dms_scheduler_domain::{DispatchRecord, UrgencyTier, ID};
pub use inmemory::InMemoryDispatchLogRepo;
pub use postgres::PostgresDispatchLogRepo;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DispatchLogError {
    /// Another run already recorded this `(switch, deadline, tier)`
    #[error("The reminder was already recorded as dispatched")]
    AlreadyRecorded,
    #[error("Dispatch log storage error: {0}")]
    Persistence(#[from] anyhow::Error),
}

/// Append only log of the reminders that have been sent.
///
/// This is what makes reminder runs idempotent: a tier is only notified when
/// it has no record for the `Switch`'s current deadline, and `record`
/// succeeds at most once per `(switch_id, deadline, tier)` no matter how many
/// runs race for it.
#[async_trait::async_trait]
pub trait IDispatchLogRepo: Send + Sync {
    async fn has_dispatched(
        &self,
        switch_id: &ID,
        deadline: i64,
        tier: UrgencyTier,
    ) -> Result<bool, DispatchLogError>;
    /// Fails with `AlreadyRecorded` for every call after the first one for
    /// the same key, including concurrent calls from other processes.
    async fn record(&self, record: &DispatchRecord) -> Result<(), DispatchLogError>;
    async fn find_by_switch(&self, switch_id: &ID) -> Result<Vec<DispatchRecord>, DispatchLogError>;
}
