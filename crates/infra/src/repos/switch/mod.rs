mod inmemory;
mod postgres;

use dms_scheduler_domain::{Switch, ID};
pub use inmemory::InMemorySwitchRepo;
pub use postgres::PostgresSwitchRepo;

/// `Switch`es are owned by the surrounding application. The reminder engine
/// only reads them, `insert` and `save` exist for that application and for tests.
#[async_trait::async_trait]
pub trait ISwitchRepo: Send + Sync {
    async fn insert(&self, switch: &Switch) -> anyhow::Result<()>;
    async fn save(&self, switch: &Switch) -> anyhow::Result<()>;
    async fn find(&self, switch_id: &ID) -> anyhow::Result<Option<Switch>>;
    /// Active `Switch`es whose deadline is after `now`, ordered by id and
    /// starting right after the `after` id. Used to page through every
    /// pending `Switch` during a reminders run.
    async fn find_pending(
        &self,
        now: i64,
        after: Option<&ID>,
        limit: i64,
    ) -> anyhow::Result<Vec<Switch>>;
}
