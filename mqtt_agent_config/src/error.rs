use std::borrow::Cow;

use thiserror::Error;

/// Errors raised while resolving the agent configuration.
///
/// Variants that concern a single value carry the Kconfig symbol it came from, so the
/// message points at the line of the `.config` file to fix.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AgentConfigError {
    /// A symbol the selected derivation needs was not defined.
    #[error("missing required symbol {symbol}")]
    MissingSymbol { symbol: &'static str },

    /// A count, size or duration that must be positive was zero.
    #[error("{symbol} must be greater than zero")]
    Zero { symbol: &'static str },

    /// A value lies outside the range the agent or scheduler accepts.
    #[error("{symbol} = {value} is out of range: {reason}")]
    OutOfRange {
        symbol: &'static str,
        value: u64,
        reason: Cow<'static, str>,
    },

    /// A millisecond value does not fit the 32-bit tick counter.
    #[error("{symbol} = {millis} ms overflows the tick counter at {tick_rate_hz} Hz")]
    TickOverflow {
        symbol: &'static str,
        millis: u64,
        tick_rate_hz: u32,
    },

    /// Keep-alive pings would be sent less often than the broker requires.
    #[error(
        "keep-alive actual interval ({actual_ms} ms) exceeds the keep-alive interval ({interval_secs} s)"
    )]
    KeepAliveOrder { actual_ms: u64, interval_secs: u64 },

    /// A string value still carries a `<PLACEHOLDER>` marker.
    #[error("{symbol} still holds the placeholder '{value}'")]
    UnresolvedPlaceholder { symbol: &'static str, value: String },

    /// The vendor/board pair is not in the catalog.
    #[error("unknown board '{vendor}/{board}'")]
    UnknownBoard { vendor: String, board: String },

    /// The persisted board choice could not be read back.
    #[error("invalid board choice record: {message}")]
    InvalidBoardRecord { message: Cow<'static, str> },

    /// The configuration sources could not be loaded or deserialized.
    #[error("configuration error: {source}")]
    Load {
        #[from]
        source: config_loader::ConfigError,
    },

    /// I/O error while reading or writing configuration artifacts.
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl AgentConfigError {
    pub fn missing(symbol: &'static str) -> Self {
        Self::MissingSymbol { symbol }
    }

    pub fn zero(symbol: &'static str) -> Self {
        Self::Zero { symbol }
    }

    pub fn out_of_range(
        symbol: &'static str,
        value: impl Into<u64>,
        reason: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self::OutOfRange {
            symbol,
            value: value.into(),
            reason: reason.into(),
        }
    }

    pub fn invalid_board_record(message: impl Into<Cow<'static, str>>) -> Self {
        Self::InvalidBoardRecord {
            message: message.into(),
        }
    }
}

pub type AgentConfigResult<T> = Result<T, AgentConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_names_symbol() {
        let err = AgentConfigError::missing("CONFIG_MQTT_MAX_BROKERS");
        assert_eq!(
            err.to_string(),
            "missing required symbol CONFIG_MQTT_MAX_BROKERS"
        );

        let err = AgentConfigError::out_of_range("CONFIG_MQTT_TASK_PRIORITY", 9_u32, "above max");
        assert!(err.to_string().contains("CONFIG_MQTT_TASK_PRIORITY = 9"));
        assert!(err.to_string().contains("above max"));
    }

    #[test]
    fn test_tick_overflow_display() {
        let err = AgentConfigError::TickOverflow {
            symbol: "CONFIG_MQTT_TASK_MAX_BLOCK_TICKS",
            millis: u64::MAX,
            tick_rate_hz: 1000,
        };
        assert!(err.to_string().contains("1000 Hz"));
    }

    #[test]
    fn test_error_source_chain() {
        use std::error::Error;

        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = AgentConfigError::from(io_err);
        assert!(matches!(err, AgentConfigError::Io { .. }));
        assert!(err.source().is_some());
    }
}
