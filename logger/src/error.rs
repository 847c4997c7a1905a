use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LoggerError {
    /// The level string is not a valid `EnvFilter` directive.
    #[error("invalid log filter '{directive}': {source}")]
    InvalidFilter {
        directive: String,
        #[source]
        source: tracing_subscriber::filter::ParseError,
    },

    /// A global subscriber has already been installed.
    #[error("logger already initialized: {source}")]
    AlreadyInitialized {
        #[source]
        source: tracing_subscriber::util::TryInitError,
    },

    /// The rolling file appender could not be created.
    #[error("cannot open log file: {source}")]
    FileAppender {
        #[source]
        source: tracing_appender::rolling::InitError,
    },

    /// File output was configured but the crate was built without the `file` feature.
    #[error("file logging requested but the `file` feature is disabled")]
    FileOutputDisabled,
}

pub type LoggerResult<T> = Result<T, LoggerError>;
