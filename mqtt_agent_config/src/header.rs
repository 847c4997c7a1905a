//! C headers for the firmware build.
//!
//! [`AgentHeader`] renders a resolved [`AgentConfig`]. It keeps the macro names the agent
//! expects but every value is already resolved, so the C side no longer needs `#if`
//! branching. [`KconfigHeader`] renders the merged symbols themselves as `CONFIG_*`
//! defines, with `_FUNC` symbols written as bare C expressions.

use std::{collections::BTreeMap, fmt};

use config_loader::{Map, SYMBOL_PREFIX, Value, ValueKind};

use crate::{
    agent::AgentConfig,
    constants::{FUNC_SYMBOL_SUFFIX, HEADER_GUARD},
    task::StackDepthStrategy,
};

const NAME_WIDTH: usize = 46;

fn define(f: &mut fmt::Formatter<'_>, name: &str, value: impl fmt::Display) -> fmt::Result {
    writeln!(f, "#define {name:<NAME_WIDTH$}{value}")
}

/// A string literal with C escapes.
struct CString<'a>(&'a str);

impl fmt::Display for CString<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("\"")?;
        for c in self.0.chars() {
            match c {
                '"' => f.write_str("\\\"")?,
                '\\' => f.write_str("\\\\")?,
                '\n' => f.write_str("\\n")?,
                _ => write!(f, "{c}")?,
            }
        }
        f.write_str("\"")
    }
}

/// `iot_mqtt_agent_config.h` for a resolved configuration.
pub struct AgentHeader<'a>(pub &'a AgentConfig);

impl fmt::Display for AgentHeader<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let config = self.0;

        writeln!(f, "/*")?;
        writeln!(f, " * MQTT agent config options.")?;
        writeln!(f, " * Generated by agent-configure, do not edit.")?;
        writeln!(
            f,
            " * Tick values assume configTICK_RATE_HZ = {}.",
            config.tick_rate_hz()
        )?;
        writeln!(f, " */")?;
        writeln!(f)?;
        writeln!(f, "#ifndef {HEADER_GUARD}")?;
        writeln!(f, "#define {HEADER_GUARD}")?;
        writeln!(f)?;

        define(
            f,
            "mqttconfigENABLE_METRICS",
            u8::from(config.metrics_enabled()),
        )?;
        if let Some(metrics) = config.metrics() {
            define(f, "mqttconfigMETRIC_SDK", CString(&metrics.sdk_metric()))?;
            define(
                f,
                "mqttconfigMETRIC_VERSION",
                CString(&metrics.version_metric()),
            )?;
            define(
                f,
                "mqttconfigMETRIC_PLATFORM",
                CString(&metrics.platform_metric()),
            )?;
        }
        writeln!(f)?;

        define(
            f,
            "mqttconfigKEEP_ALIVE_INTERVAL_SECONDS",
            format_args!("( {} )", config.keep_alive_interval_secs()),
        )?;
        define(
            f,
            "mqttconfigKEEP_ALIVE_ACTUAL_INTERVAL_TICKS",
            format_args!("( {}U )", config.keep_alive_actual_interval().get()),
        )?;
        define(
            f,
            "mqttconfigKEEP_ALIVE_TIMEOUT_TICKS",
            format_args!("( {}U )", config.keep_alive_timeout().get()),
        )?;
        define(
            f,
            "mqttconfigMQTT_TASK_MAX_BLOCK_TICKS",
            format_args!("( {}U )", config.task_max_block().get()),
        )?;
        writeln!(f)?;

        match config.stack_depth_strategy() {
            StackDepthStrategy::RelativeToMinimal { multiplier } => writeln!(
                f,
                "/* stack depth: configMINIMAL_STACK_SIZE * {multiplier} */"
            )?,
            StackDepthStrategy::Absolute { .. } => writeln!(f, "/* stack depth: absolute */")?,
        }
        define(
            f,
            "mqttconfigMQTT_TASK_STACK_DEPTH",
            format_args!("( {} )", config.task_stack_depth()),
        )?;
        define(
            f,
            "mqttconfigMQTT_TASK_PRIORITY",
            format_args!("( {} )", config.task_priority()),
        )?;
        writeln!(f)?;

        define(
            f,
            "mqttconfigMAX_BROKERS",
            format_args!("( {} )", config.max_brokers()),
        )?;
        define(
            f,
            "mqttconfigMAX_PARALLEL_OPS",
            format_args!("( {} )", config.max_parallel_ops()),
        )?;
        define(
            f,
            "mqttconfigTCP_SEND_TIMEOUT_MS",
            format_args!("( {} )", config.tcp_send_timeout().as_millis()),
        )?;
        define(
            f,
            "mqttconfigRX_BUFFER_SIZE",
            format_args!("( {} )", config.rx_buffer_size()),
        )?;
        writeln!(f)?;
        writeln!(f, "#endif /* {HEADER_GUARD} */")
    }
}

/// Render the agent header text for `config`.
pub fn render_header(config: &AgentConfig) -> String {
    AgentHeader(config).to_string()
}

/// `kconfig.h` with one `CONFIG_*` define per merged symbol, sorted by name.
///
/// Enabled bools become `1` and disabled ones are left out, like an undefined macro.
pub struct KconfigHeader<'a> {
    symbols: BTreeMap<String, &'a Value>,
}

impl<'a> KconfigHeader<'a> {
    pub fn new(symbols: &'a Map<String, Value>) -> Self {
        let symbols = symbols
            .iter()
            .map(|(key, value)| (format!("{SYMBOL_PREFIX}_{}", key.to_uppercase()), value))
            .collect();
        Self { symbols }
    }
}

impl fmt::Display for KconfigHeader<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "/* Generated by agent-configure, do not edit. */")?;

        for (name, value) in &self.symbols {
            match &value.kind {
                ValueKind::Boolean(true) => writeln!(f, "#define {name} 1")?,
                ValueKind::String(expr) if name.ends_with(FUNC_SYMBOL_SUFFIX) => {
                    writeln!(f, "#define {name} {expr}")?
                }
                ValueKind::String(text) => writeln!(f, "#define {name} {}", CString(text))?,
                ValueKind::I64(n) => writeln!(f, "#define {name} {n}")?,
                ValueKind::I128(n) => writeln!(f, "#define {name} {n}")?,
                ValueKind::U64(n) => writeln!(f, "#define {name} {n}")?,
                ValueKind::U128(n) => writeln!(f, "#define {name} {n}")?,
                ValueKind::Float(x) => writeln!(f, "#define {name} {x}")?,
                // disabled bools, and shapes a .config line cannot produce
                ValueKind::Boolean(false)
                | ValueKind::Nil
                | ValueKind::Table(_)
                | ValueKind::Array(_) => {}
            }
        }
        Ok(())
    }
}

/// Render `kconfig.h` for the merged `symbols`.
pub fn render_kconfig_header(symbols: &Map<String, Value>) -> String {
    KconfigHeader::new(symbols).to_string()
}
