mod process_reminders;

use actix_web::web;
pub use process_reminders::ProcessSwitchRemindersUseCase;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route(
        "/cron/reminders",
        web::post().to(process_reminders::process_reminders_controller),
    );
}
