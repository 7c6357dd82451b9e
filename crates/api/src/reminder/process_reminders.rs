use crate::{
    error::DmsError,
    shared::{
        guard::Guard,
        usecase::{execute, UseCase},
    },
};
use actix_web::{web, HttpRequest, HttpResponse};
use dms_scheduler_api_structs::process_reminders::*;
use dms_scheduler_domain::{DispatchRecord, ReminderOutcome, ReminderRunSummary, Switch, ID};
use dms_scheduler_infra::{DispatchLogError, DmsContext};
use futures::{stream, StreamExt};
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, error, info, warn};

fn handle_error(e: UseCaseError) -> DmsError {
    match e {
        UseCaseError::StorageError => DmsError::InternalError,
    }
}

/// Lets an external scheduler trigger a reminders run instead of, or in
/// addition to, the in-process job
pub async fn process_reminders_controller(
    http_req: HttpRequest,
    ctx: web::Data<DmsContext>,
) -> Result<HttpResponse, DmsError> {
    Guard::against_invalid_cron_secret(&http_req, &ctx)?;

    execute(ProcessSwitchRemindersUseCase {}, &ctx)
        .await
        .map(|summary| HttpResponse::Ok().json(APIResponse::new(summary)))
        .map_err(handle_error)
}

/// Sends the reminder that is due for every pending `Switch`, at most once per
/// tier and deadline.
///
/// Runs may overlap, both with themselves and with other replicas. The
/// dispatch log is what keeps them from sending the same reminder twice.
#[derive(Debug)]
pub struct ProcessSwitchRemindersUseCase {}

#[derive(Debug)]
pub enum UseCaseError {
    StorageError,
}

#[async_trait::async_trait(?Send)]
impl UseCase for ProcessSwitchRemindersUseCase {
    type Response = ReminderRunSummary;

    type Errors = UseCaseError;

    const NAME: &'static str = "ProcessSwitchReminders";

    async fn execute(&mut self, ctx: &DmsContext) -> Result<Self::Response, Self::Errors> {
        // Every switch in this run is classified against the same instant
        let now = ctx.sys.get_timestamp_millis();
        let page_size = ctx.config.switches_page_size;
        let mut summary = ReminderRunSummary::new(now);
        let mut after: Option<ID> = None;

        loop {
            let switches = ctx
                .repos
                .switches
                .find_pending(now, after.as_ref(), page_size)
                .await
                .map_err(|e| {
                    error!("Unable to load pending switches: {:?}", e);
                    UseCaseError::StorageError
                })?;

            let outcomes = stream::iter(switches.iter())
                .map(|switch| evaluate_switch(switch, now, ctx))
                .buffer_unordered(ctx.config.max_concurrent_evaluations)
                .collect::<Vec<_>>()
                .await;
            for outcome in outcomes {
                summary.add(outcome);
            }

            if (switches.len() as i64) < page_size {
                break;
            }
            after = switches.last().map(|switch| switch.id);
        }

        if summary.failures() > 0 {
            warn!(
                "Reminders run finished with {} failures: {:?}",
                summary.failures(),
                summary
            );
        } else {
            info!("Reminders run finished: {:?}", summary);
        }

        Ok(summary)
    }
}

async fn evaluate_switch(switch: &Switch, now: i64, ctx: &DmsContext) -> ReminderOutcome {
    let tier = match switch.due_tier(now) {
        Ok(Some(tier)) => tier,
        Ok(None) => return ReminderOutcome::NotDue,
        Err(e) => {
            error!("Skipping misconfigured switch {}: {}", switch.id, e);
            return ReminderOutcome::InvalidSwitch;
        }
    };

    let storage_timeout = Duration::from_millis(ctx.config.storage_timeout_millis);
    let dispatched = timeout(
        storage_timeout,
        ctx.repos
            .dispatch_log
            .has_dispatched(&switch.id, switch.deadline, tier),
    )
    .await;
    match dispatched {
        Ok(Ok(true)) => return ReminderOutcome::AlreadyDispatched(tier),
        Ok(Ok(false)) => (),
        Ok(Err(e)) => {
            error!(
                "Unable to read the dispatch log for switch {}: {:?}",
                switch.id, e
            );
            return ReminderOutcome::StorageUnavailable;
        }
        Err(_) => {
            error!("Reading the dispatch log for switch {} timed out", switch.id);
            return ReminderOutcome::StorageUnavailable;
        }
    }

    let notifier_timeout = Duration::from_millis(ctx.config.notifier_timeout_millis);
    match timeout(notifier_timeout, ctx.notifier.notify(switch, tier)).await {
        Ok(Ok(())) => (),
        Ok(Err(e)) => {
            warn!(
                "Unable to send the {} reminder for switch {}, retrying next run: {}",
                tier, switch.id, e
            );
            return ReminderOutcome::NotificationFailed(tier);
        }
        Err(_) => {
            warn!(
                "Sending the {} reminder for switch {} timed out, retrying next run",
                tier, switch.id
            );
            return ReminderOutcome::NotificationFailed(tier);
        }
    }

    let record = DispatchRecord::new(switch, tier, ctx.sys.get_timestamp_millis());
    match timeout(storage_timeout, ctx.repos.dispatch_log.record(&record)).await {
        Ok(Ok(())) => {
            info!("Sent the {} reminder for switch {}", tier, switch.id);
            ReminderOutcome::Dispatched(tier)
        }
        Ok(Err(DispatchLogError::AlreadyRecorded)) => {
            debug!(
                "The {} reminder for switch {} was recorded by a concurrent run",
                tier, switch.id
            );
            ReminderOutcome::RaceLost(tier)
        }
        Ok(Err(DispatchLogError::Persistence(e))) => {
            error!(
                "Sent the {} reminder for switch {} but could not record it, it may be sent again: {:?}",
                tier, switch.id, e
            );
            ReminderOutcome::StorageUnavailable
        }
        Err(_) => {
            error!(
                "Sent the {} reminder for switch {} but recording it timed out, it may be sent again",
                tier, switch.id
            );
            ReminderOutcome::StorageUnavailable
        }
    }
}
