use std::io;
use tracing::{subscriber::set_global_default, Subscriber};
use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
use tracing_log::LogTracer;
use tracing_subscriber::{layer::SubscriberExt, EnvFilter, Registry};

/// Bunyan formatted json logs on stdout. `RUST_LOG` overrides `env_filter`.
pub fn get_subscriber(name: String, env_filter: String) -> impl Subscriber + Send + Sync {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(env_filter));
    let formatting_layer = BunyanFormattingLayer::new(name, io::stdout);

    Registry::default()
        .with(env_filter)
        .with(JsonStorageLayer)
        .with(formatting_layer)
}

/// Should only be called once, it also routes `log` records from dependencies
/// into the subscriber
pub fn init_subscriber(subscriber: impl Subscriber + Send + Sync) -> io::Result<()> {
    LogTracer::init().map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
    set_global_default(subscriber).map_err(|e| io::Error::new(io::ErrorKind::Other, e))
}
