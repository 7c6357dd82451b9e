mod telemetry;

use dms_scheduler_api::Application;
use dms_scheduler_infra::{run_migration, setup_context};
use telemetry::{get_subscriber, init_subscriber};
use tracing::error;

fn startup_error(e: anyhow::Error) -> std::io::Error {
    error!("Unable to start the reminder engine: {:?}", e);
    std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let subscriber = get_subscriber("dms_scheduler_server".into(), "info".into());
    init_subscriber(subscriber)?;

    run_migration().await.map_err(startup_error)?;
    let context = setup_context().await.map_err(startup_error)?;

    let app = Application::new(context).await?;
    app.start().await
}
