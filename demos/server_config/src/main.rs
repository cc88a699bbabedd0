//! Demo entry point: load the server configuration and print it as JSON.

use std::io::{self, Write};

use server_config::error::{DemoError, Result};
use tagflag::{TagflagError, is_display_request};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry, reload};

type FilterHandle = reload::Handle<EnvFilter, Registry>;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let filter = init_tracing();
    run(filter.as_ref()).map_err(color_eyre::eyre::Report::from)
}

/// Install a subscriber writing to stderr; `RUST_LOG` wins over the
/// configured `log_level` once the configuration is known.
fn init_tracing() -> Option<FilterHandle> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
            .init();
        return None;
    }
    let (filter, handle) = reload::Layer::new(EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
    Some(handle)
}

fn run(filter: Option<&FilterHandle>) -> Result<()> {
    let config = match server_config::load() {
        Ok(config) => config,
        Err(DemoError::Configuration(TagflagError::CliParsing(err)))
            if is_display_request(&err) =>
        {
            err.exit()
        }
        Err(err) => return Err(err),
    };
    if let Some(handle) = filter
        && let Err(err) = handle.reload(EnvFilter::new(&config.logging.log_level))
    {
        tracing::warn!(error = %err, "could not apply configured log level");
    }
    tracing::info!(
        port = config.server.port,
        db_host = %config.db.host,
        "configuration loaded"
    );

    let json = serde_json::to_string_pretty(&config).map_err(io::Error::other)?;
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{json}")?;
    Ok(())
}
