use std::io::{self, IsTerminal};

use anyhow::{Context, Result, bail};
use shared::config::{LogFormat, LoggingConfig};
use tracing::{Subscriber, level_filters::LevelFilter};
use tracing_subscriber::{
    EnvFilter,
    fmt::{self, MakeWriter},
};

/// Installs the global subscriber. Logs go to stderr so command output on
/// stdout stays clean.
///
/// # Errors
/// Fails if the configured level is not a valid filter or a global
/// subscriber has already been installed.
pub fn initialize_tracing(logging: &LoggingConfig) -> Result<()> {
    let ansi = io::stderr().is_terminal();
    let subscriber = build_subscriber(logging, io::stderr, ansi)?;
    tracing::subscriber::set_global_default(subscriber)
        .context("failed to install the log subscriber")
}

fn build_subscriber<W>(
    logging: &LoggingConfig,
    writer: W,
    ansi: bool,
) -> Result<Box<dyn Subscriber + Send + Sync>>
where
    W: for<'writer> MakeWriter<'writer> + Send + Sync + 'static,
{
    let builder = fmt::fmt()
        .with_env_filter(build_env_filter(logging)?)
        .with_target(false)
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_writer(writer);

    Ok(if matches!(logging.format, LogFormat::Json) {
        Box::new(builder.json().with_ansi(false).finish())
    } else {
        Box::new(builder.with_ansi(ansi).finish())
    })
}

/// `RUST_LOG` wins when it parses. Otherwise the configured level is read as
/// filter directives (`info`, `warn,client=debug`), and a bare level that
/// names no real level is rejected instead of being ignored.
fn build_env_filter(logging: &LoggingConfig) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }

    let directives = logging.level.trim();
    for directive in directives.split(',').map(str::trim) {
        let is_bare_level = !directive.is_empty() && !directive.contains(['=', '[', ':']);
        if is_bare_level && directive.parse::<LevelFilter>().is_err() {
            bail!(
                "invalid log level '{directive}'; expected trace, debug, info, warn, error or off"
            );
        }
    }

    EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .parse(directives)
        .with_context(|| format!("invalid log filter '{directives}'"))
}
