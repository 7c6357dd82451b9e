use crate::error::DmsError;
use actix_web::HttpRequest;
use dms_scheduler_api_structs::process_reminders::CRON_SECRET_HEADER;
use dms_scheduler_infra::DmsContext;
use dms_scheduler_utils::secrets_match;

pub struct Guard {}

impl Guard {
    /// Only the external scheduler, which knows the cron secret, may trigger runs
    pub fn against_invalid_cron_secret(
        http_req: &HttpRequest,
        ctx: &DmsContext,
    ) -> Result<(), DmsError> {
        let given = http_req
            .headers()
            .get(CRON_SECRET_HEADER)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| {
                DmsError::Unauthorized(format!("Missing the `{}` header", CRON_SECRET_HEADER))
            })?;

        if secrets_match(&ctx.config.cron_secret, given) {
            Ok(())
        } else {
            Err(DmsError::Unauthorized(format!(
                "Invalid value for the `{}` header",
                CRON_SECRET_HEADER
            )))
        }
    }
}
