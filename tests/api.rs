mod helpers;

use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer};
use dms_scheduler_api_structs::{dtos::ReminderRunSummaryDTO, get_service_health, process_reminders};
use dms_scheduler_domain::{Switch, DAY_MILLIS, HOUR_MILLIS, ID};
use dms_scheduler_infra::{
    ReminderWebhookPayload, ReminderWebhookSettings, WebhookNotifier, WEBHOOK_KEY_HEADER,
};
use helpers::setup::{spawn_app, TestApp, CRON_SECRET};
use std::{
    net::TcpListener,
    sync::{Arc, Mutex},
    time::Duration,
};

type Received = Arc<Mutex<Vec<(String, ReminderWebhookPayload)>>>;

async fn receive_reminder(
    req: HttpRequest,
    body: web::Json<ReminderWebhookPayload>,
    received: web::Data<Received>,
) -> HttpResponse {
    let key = req
        .headers()
        .get(WEBHOOK_KEY_HEADER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string();
    received.lock().unwrap().push((key, body.into_inner()));
    HttpResponse::Ok().finish()
}

/// Stands in for the service that delivers reminders by e-mail
fn spawn_reminder_receiver() -> (String, Received) {
    let received: Received = Arc::new(Mutex::new(Vec::new()));
    let listener = TcpListener::bind("127.0.0.1:0").expect("To bind the receiver");
    let port = listener.local_addr().unwrap().port();

    let data = received.clone();
    let server = HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(data.clone()))
            .route("/reminders", web::post().to(receive_reminder))
    })
    .listen(listener)
    .expect("To listen")
    .workers(1)
    .run();
    actix_web::rt::spawn(server);

    (format!("http://127.0.0.1:{}/reminders", port), received)
}

async fn trigger_reminders(app: &TestApp, secret: Option<&str>) -> reqwest::Response {
    let mut req = reqwest::Client::new().post(format!("{}/cron/reminders", app.address));
    if let Some(secret) = secret {
        req = req.header(process_reminders::CRON_SECRET_HEADER, secret);
    }
    req.send().await.expect("To reach the application")
}

async fn insert_due_switch(app: &TestApp, remaining: i64) -> Switch {
    let now = app.ctx.sys.get_timestamp_millis();
    let mut switch = Switch::new(ID::new(), "Vault".into(), 30 * DAY_MILLIS, now).unwrap();
    switch.deadline = now + remaining;
    app.ctx.repos.switches.insert(&switch).await.unwrap();
    switch
}

#[actix_web::test]
async fn test_status_ok() {
    let app = spawn_app(None).await;
    let res = reqwest::get(format!("{}/", app.address))
        .await
        .expect("To reach the application");
    assert!(res.status().is_success());

    let body = res
        .json::<get_service_health::APIResponse>()
        .await
        .expect("A status response");
    assert!(!body.reminder_job_enabled);
}

#[actix_web::test]
async fn test_trigger_requires_cron_secret() {
    let app = spawn_app(None).await;
    insert_due_switch(&app, HOUR_MILLIS).await;

    let res = trigger_reminders(&app, None).await;
    assert_eq!(res.status().as_u16(), 401);

    let res = trigger_reminders(&app, Some("wrong-secret")).await;
    assert_eq!(res.status().as_u16(), 401);

    // Nothing was evaluated by the rejected requests
    let res = trigger_reminders(&app, Some(CRON_SECRET)).await;
    assert!(res.status().is_success());
    let body = res
        .json::<process_reminders::APIResponse>()
        .await
        .expect("A run summary");
    assert_eq!(body.summary.dispatched, 1);
}

#[actix_web::test]
async fn test_trigger_returns_run_summary() {
    let app = spawn_app(None).await;
    insert_due_switch(&app, 2 * DAY_MILLIS).await;
    insert_due_switch(&app, 20 * DAY_MILLIS).await;

    let res = trigger_reminders(&app, Some(CRON_SECRET)).await;
    assert!(res.status().is_success());
    let summary: ReminderRunSummaryDTO = res
        .json::<process_reminders::APIResponse>()
        .await
        .expect("A run summary")
        .summary;
    assert_eq!(summary.evaluated, 2);
    assert_eq!(summary.dispatched, 1);
    assert_eq!(summary.not_due, 1);

    let res = trigger_reminders(&app, Some(CRON_SECRET)).await;
    let summary = res
        .json::<process_reminders::APIResponse>()
        .await
        .expect("A run summary")
        .summary;
    assert_eq!(summary.dispatched, 0);
    assert_eq!(summary.already_dispatched, 1);
}

#[actix_web::test]
async fn test_reminders_are_posted_to_webhook_once() {
    let (url, received) = spawn_reminder_receiver();
    let settings = ReminderWebhookSettings::new(url, "webhook-key".into()).expect("Valid url");
    let notifier = WebhookNotifier::new(settings, Duration::from_secs(5)).unwrap();
    let app = spawn_app(Some(Arc::new(notifier))).await;
    let switch = insert_due_switch(&app, 30 * 60 * 1000).await;

    for _ in 0..3 {
        let res = trigger_reminders(&app, Some(CRON_SECRET)).await;
        assert!(res.status().is_success());
    }

    let received = received.lock().unwrap().clone();
    assert_eq!(received.len(), 1);
    let (key, payload) = &received[0];
    assert_eq!(key, "webhook-key");
    assert_eq!(payload.switch_id, switch.id);
    assert_eq!(payload.user_id, switch.user_id);
    assert_eq!(payload.deadline, switch.deadline);
    assert_eq!(payload.tier.as_str(), "1_hour");
}
