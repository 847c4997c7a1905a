use config::{
    Config, ConfigError, Environment, File, FileStoredFormat, Format, Map, Source, Value,
    ValueKind,
};
use serde::de::DeserializeOwned;
use std::{
    collections::HashMap,
    io::{Error, ErrorKind},
    path::{Path, PathBuf},
};
use tracing::debug;

/// Prefix every Kconfig symbol carries in `.config` files and in the environment.
pub const SYMBOL_PREFIX: &str = "CONFIG";

const NOT_SET_SUFFIX: &str = " is not set";
const FUNC_SUFFIX: &str = "_func";

fn canonical(path: &Path) -> Result<PathBuf, ConfigError> {
    std::fs::canonicalize(path).map_err(|e| ConfigError::Foreign(Box::new(e)))
}

/// Load a single Kconfig `.config` file into `T`.
pub fn load_config<T>(path: &str) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    let config_path = canonical(Path::new(path))?;

    let settings = Config::builder()
        .add_source(File::new(
            &config_path.to_string_lossy(),
            KconfigFile::default(),
        ))
        .build()?;

    settings
        .try_deserialize::<T>()
        .map_err(|e| ConfigError::Foreign(Box::new(e)))
}

fn layered<P: AsRef<Path>>(
    paths: &[P],
    format: &KconfigFile,
    env: Option<Environment>,
) -> Result<Config, ConfigError> {
    let mut builder = Config::builder();

    for path in paths {
        let path = canonical(path.as_ref())?;
        debug!(path = %path.display(), "adding configuration fragment");
        builder = builder.add_source(File::new(&path.to_string_lossy(), format.clone()));
    }

    if let Some(env) = env {
        builder = builder.add_source(env);
    }

    builder.build()
}

/// Load several `.config` fragments, later fragments overriding earlier ones,
/// then apply `env` on top of them.
pub fn load_layered<T, P>(
    paths: &[P],
    format: &KconfigFile,
    env: Option<Environment>,
) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    layered(paths, format, env)?.try_deserialize::<T>()
}

/// Merge fragments like [`load_layered`] but keep every symbol, typed as parsed.
pub fn load_symbol_map<P: AsRef<Path>>(
    paths: &[P],
    format: &KconfigFile,
    env: Option<Environment>,
) -> Result<Map<String, Value>, ConfigError> {
    layered(paths, format, env)?.collect()
}

/// `CONFIG_*` environment variables, keyed like the symbols of a `.config` file.
pub fn symbol_environment() -> Environment {
    Environment::with_prefix(SYMBOL_PREFIX)
        .prefix_separator("_")
        .try_parsing(true)
}

/// Kconfig `.config` file format.
///
/// Keys lose their `CONFIG_` prefix and are lowercased, so `CONFIG_MQTT_MAX_BROKERS=2`
/// is read as `mqtt_max_brokers = 2`. Bool symbols map `y`/`n` and
/// `# CONFIG_FOO is not set` to booleans, integers may be decimal or hex, and
/// quoted strings are unescaped. Symbols ending in `_FUNC` hold C expressions and
/// are passed through with their quotes removed.
#[derive(Debug, Clone, Default)]
pub struct KconfigFile {
    substitutions: HashMap<String, String>,
}

impl KconfigFile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace `<placeholder>` inside string values with `value`.
    pub fn with_substitution(
        mut self,
        placeholder: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.substitutions.insert(placeholder.into(), value.into());
        self
    }

    pub fn with_substitutions<I, K, V>(mut self, substitutions: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.substitutions.extend(
            substitutions
                .into_iter()
                .map(|(k, v)| (k.into(), v.into())),
        );
        self
    }

    fn substitute(&self, value: String) -> String {
        self.substitutions
            .iter()
            .fold(value, |acc, (placeholder, replacement)| {
                acc.replace(&format!("<{placeholder}>"), replacement)
            })
    }

    fn parse_value(&self, key: &str, raw: &str) -> Result<ValueKind, String> {
        if key.ends_with(FUNC_SUFFIX) {
            return Ok(ValueKind::String(raw.replace('"', "")));
        }

        if let Some(rest) = raw.strip_prefix('"') {
            let inner = rest
                .strip_suffix('"')
                .ok_or_else(|| format!("unterminated string '{raw}'"))?;
            return Ok(ValueKind::String(self.substitute(unescape(inner)?)));
        }

        match raw {
            "y" => return Ok(ValueKind::Boolean(true)),
            "n" => return Ok(ValueKind::Boolean(false)),
            "m" => return Ok(ValueKind::String(raw.to_string())),
            _ => {}
        }

        let parsed = match raw
            .strip_prefix("0x")
            .or_else(|| raw.strip_prefix("0X"))
        {
            Some(hex) => i64::from_str_radix(hex, 16),
            None => raw.parse::<i64>(),
        };

        parsed
            .map(ValueKind::I64)
            .map_err(|_| format!("invalid value '{raw}'"))
    }
}

fn unescape(inner: &str) -> Result<String, String> {
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();

    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some(escaped) => out.push(escaped),
                None => return Err(format!("dangling escape in \"{inner}\"")),
            }
        } else {
            out.push(c);
        }
    }

    Ok(out)
}

fn symbol_key(symbol: &str) -> Option<String> {
    symbol
        .strip_prefix(SYMBOL_PREFIX)
        .and_then(|s| s.strip_prefix('_'))
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase)
}

impl Format for KconfigFile {
    fn parse(
        &self,
        uri: Option<&String>,
        text: &str,
    ) -> Result<Map<String, Value>, Box<dyn std::error::Error + Send + Sync>> {
        let mut result = Map::new();

        for (lineno, line) in text.lines().enumerate() {
            let line = line.trim();

            if line.is_empty() {
                continue;
            }

            // `# CONFIG_FOO is not set` is how Kconfig spells a disabled bool
            if let Some(comment) = line.strip_prefix('#') {
                if let Some(key) = comment
                    .trim()
                    .strip_suffix(NOT_SET_SUFFIX)
                    .and_then(symbol_key)
                {
                    result.insert(key, Value::new(uri, ValueKind::Boolean(false)));
                }
                continue;
            }

            let invalid = |reason: String| {
                Box::new(Error::new(
                    ErrorKind::InvalidData,
                    format!("Invalid line {}: '{}' ({})", lineno + 1, line, reason),
                ))
            };

            let (symbol, raw) = line
                .split_once('=')
                .map(|(k, v)| (k.trim(), v.trim()))
                .ok_or_else(|| invalid("expected SYMBOL=value".to_string()))?;

            let key = symbol_key(symbol)
                .ok_or_else(|| invalid(format!("expected {SYMBOL_PREFIX}_ prefix")))?;

            let kind = self.parse_value(&key, raw).map_err(invalid)?;
            result.insert(key, Value::new(uri, kind));
        }

        Ok(result)
    }
}

impl FileStoredFormat for KconfigFile {
    fn file_extensions(&self) -> &'static [&'static str] {
        &["config"]
    }
}
