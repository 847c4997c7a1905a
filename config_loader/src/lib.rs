pub mod de;
pub mod loader;
pub mod logging;
pub use loader::{
    KconfigFile, SYMBOL_PREFIX, load_config, load_layered, load_symbol_map,
    symbol_environment,
};
pub use logging::{FileLogConfig, LogFormat, LoggingConfig};

// re-export for convenience
pub use config::{
    Config, ConfigBuilder, ConfigError, Environment, File, FileFormat, Map, Value, ValueKind,
};
