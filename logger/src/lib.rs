pub mod error;

pub use error::{LoggerError, LoggerResult};

use config_loader::{LogFormat, LoggingConfig};
use time::macros::format_description;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter, Layer, Registry,
    fmt::{self, MakeWriter, time::UtcTime},
    layer::{Layered, SubscriberExt},
    util::SubscriberInitExt,
};

type BoxedLayer = Box<dyn Layer<Layered<EnvFilter, Registry>> + Send + Sync>;

/// Keeps the non-blocking writers flushing; drop it only on shutdown.
#[must_use = "dropping the guard stops log output"]
pub struct LoggerGuard {
    _guards: Vec<WorkerGuard>,
}

/// Parse an `EnvFilter` directive such as `info,mqtt_agent_config=debug`.
pub fn parse_filter(directive: &str) -> LoggerResult<EnvFilter> {
    EnvFilter::try_new(directive).map_err(|source| LoggerError::InvalidFilter {
        directive: directive.to_string(),
        source,
    })
}

/// Install the global subscriber. `RUST_LOG` wins over `config.level` when set.
pub fn init(config: &LoggingConfig) -> LoggerResult<LoggerGuard> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => parse_filter(&config.level)?,
    };

    let mut guards = Vec::new();
    let mut layers: Vec<BoxedLayer> = Vec::new();

    layers.push(console_layer(config.format, &mut guards));

    if let Some(file) = &config.file {
        layers.push(file_layer(file, config.format, &mut guards)?);
    }

    tracing_subscriber::registry()
        .with(filter)
        .with(layers)
        .try_init()
        .map_err(|source| LoggerError::AlreadyInitialized { source })?;

    Ok(LoggerGuard { _guards: guards })
}

fn fmt_layer<W>(format: LogFormat, writer: W, ansi: bool) -> BoxedLayer
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let timer = UtcTime::new(format_description!(
        "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:6]Z"
    ));
    let layer = fmt::layer()
        .with_timer(timer)
        .with_writer(writer)
        .with_ansi(ansi)
        .with_target(true);

    match format {
        LogFormat::Compact => layer.compact().boxed(),
        LogFormat::Json => layer.json().boxed(),
        _ => layer.pretty().boxed(),
    }
}

#[cfg(feature = "stdout")]
fn console_layer(format: LogFormat, guards: &mut Vec<WorkerGuard>) -> BoxedLayer {
    let (writer, guard) = tracing_appender::non_blocking(std::io::stdout());
    guards.push(guard);
    fmt_layer(format, writer, true)
}

#[cfg(not(feature = "stdout"))]
fn console_layer(format: LogFormat, _guards: &mut Vec<WorkerGuard>) -> BoxedLayer {
    fmt_layer(format, std::io::stderr, true)
}

#[cfg(feature = "file")]
fn file_layer(
    file: &config_loader::FileLogConfig,
    format: LogFormat,
    guards: &mut Vec<WorkerGuard>,
) -> LoggerResult<BoxedLayer> {
    use tracing_appender::rolling::{RollingFileAppender, Rotation};

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(&file.prefix)
        .filename_suffix("log")
        .build(&file.directory)
        .map_err(|source| LoggerError::FileAppender { source })?;

    let (writer, guard) = tracing_appender::non_blocking(appender);
    guards.push(guard);
    Ok(fmt_layer(format, writer, false))
}

#[cfg(not(feature = "file"))]
fn file_layer(
    _file: &config_loader::FileLogConfig,
    _format: LogFormat,
    _guards: &mut Vec<WorkerGuard>,
) -> LoggerResult<BoxedLayer> {
    Err(LoggerError::FileOutputDisabled)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_filter_accepts_directives() {
        assert!(parse_filter("info").is_ok());
        assert!(parse_filter("warn,mqtt_agent_config=trace").is_ok());
    }

    #[test]
    fn test_parse_filter_rejects_bad_level() {
        let err = parse_filter("mqtt_agent_config=loud").unwrap_err();
        assert!(matches!(err, LoggerError::InvalidFilter { .. }));
        assert!(err.to_string().contains("mqtt_agent_config=loud"));
    }

    // The global subscriber can only be set once per process, so both calls
    // live in a single test.
    #[test]
    fn test_init_once() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = LoggingConfig::default().with_format(LogFormat::Json);
        if cfg!(feature = "file") {
            config = config.with_file(config_loader::FileLogConfig::new(dir.path(), "agent"));
        }

        let _guard = init(&config).unwrap();
        tracing::info!(brokers = 2, "logger ready");

        let err = init(&LoggingConfig::default()).err().unwrap();
        assert!(matches!(err, LoggerError::AlreadyInitialized { .. }));
    }
}
