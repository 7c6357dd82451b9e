use super::ISwitchRepo;
use crate::repos::shared::inmemory_repo::*;
use dms_scheduler_domain::{Switch, ID};

pub struct InMemorySwitchRepo {
    switches: std::sync::Mutex<Vec<Switch>>,
}

impl InMemorySwitchRepo {
    pub fn new() -> Self {
        Self {
            switches: std::sync::Mutex::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl ISwitchRepo for InMemorySwitchRepo {
    async fn insert(&self, switch: &Switch) -> anyhow::Result<()> {
        insert(switch, &self.switches);
        Ok(())
    }

    async fn save(&self, switch: &Switch) -> anyhow::Result<()> {
        save(switch, &self.switches);
        Ok(())
    }

    async fn find(&self, switch_id: &ID) -> anyhow::Result<Option<Switch>> {
        Ok(find(switch_id, &self.switches))
    }

    async fn find_pending(
        &self,
        now: i64,
        after: Option<&ID>,
        limit: i64,
    ) -> anyhow::Result<Vec<Switch>> {
        let mut switches = find_by(&self.switches, |switch| {
            switch.is_active()
                && switch.deadline > now
                && after.map(|after| switch.id > *after).unwrap_or(true)
        });
        switches.sort_by_key(|switch| switch.id);
        switches.truncate(limit.max(0) as usize);
        Ok(switches)
    }
}
