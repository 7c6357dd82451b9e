use crate::{reminder::ProcessSwitchRemindersUseCase, shared::usecase::execute};
use dms_scheduler_infra::DmsContext;
use std::time::Duration;
use tokio::time::{interval, sleep_until, Instant, MissedTickBehavior};

/// Seconds until the next multiple of `interval_secs` since the epoch, so
/// that replicas started at different times still poll at the same instants
pub fn get_start_delay(now_ts: i64, interval_secs: u64) -> u64 {
    let interval_secs = interval_secs.max(1);
    let now_secs = (now_ts / 1000).max(0) as u64;
    interval_secs - now_secs % interval_secs
}

pub fn start_send_reminders_job(ctx: DmsContext) {
    actix_web::rt::spawn(async move {
        let interval_secs = ctx.config.poll_interval_secs;
        let now = ctx.sys.get_timestamp_millis();
        let secs_to_next_run = get_start_delay(now, interval_secs);
        let start = Instant::now() + Duration::from_secs(secs_to_next_run);

        sleep_until(start).await;
        let mut poll_interval = interval(Duration::from_secs(interval_secs));
        poll_interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            poll_interval.tick().await;
            // A slow run must not delay the next one, overlapping runs are
            // deduplicated by the dispatch log
            actix_web::rt::spawn(send_reminders(ctx.clone()));
        }
    });
}

async fn send_reminders(ctx: DmsContext) {
    // Failures are logged by `execute`, the next tick simply tries again
    let _ = execute(ProcessSwitchRemindersUseCase {}, &ctx).await;
}
