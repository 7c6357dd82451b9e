use dms_scheduler_api::Application;
use dms_scheduler_infra::{DmsContext, INotifier};
use std::sync::Arc;

pub const CRON_SECRET: &str = "test-cron-secret";

pub struct TestApp {
    pub address: String,
    /// Shares repos with the running application, used to seed `Switch`es
    pub ctx: DmsContext,
}

// Launch the application as a background task
pub async fn spawn_app(notifier: Option<Arc<dyn INotifier>>) -> TestApp {
    let mut ctx = DmsContext::create_inmemory();
    ctx.config.port = 0; // Random port
    ctx.config.cron_secret = CRON_SECRET.into();
    ctx.config.reminder_job_enabled = false;
    if let Some(notifier) = notifier {
        ctx.notifier = notifier;
    }

    let application = Application::new(ctx.clone())
        .await
        .expect("Failed to build application.");

    let address = format!("http://localhost:{}/api/v1", application.port());
    let _ = actix_web::rt::spawn(async move {
        application
            .start()
            .await
            .expect("Expected application to start");
    });

    TestApp { address, ctx }
}
