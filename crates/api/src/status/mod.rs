use actix_web::{web, HttpResponse};
use dms_scheduler_api_structs::get_service_health::*;
use dms_scheduler_infra::DmsContext;

async fn status(ctx: web::Data<DmsContext>) -> HttpResponse {
    HttpResponse::Ok().json(APIResponse {
        message: "Yo! We are up!\r\n".into(),
        reminder_job_enabled: ctx.config.reminder_job_enabled,
    })
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(status));
}
