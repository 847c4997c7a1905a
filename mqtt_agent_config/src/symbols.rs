use std::path::Path;

use config_loader::{KconfigFile, de::flag, load_layered, symbol_environment};
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::{
    agent::{AgentConfig, AgentConfigBuilder},
    constants::symbol,
    error::{AgentConfigError, AgentConfigResult},
    identity::BrokerIdentity,
    scheduler::SchedulerProfile,
    task::{PriorityStrategy, StackDepthStrategy},
};

/// Raw Kconfig symbols, keyed without the `CONFIG_` prefix.
///
/// Bool symbols that are absent read as disabled, like an undefined macro. Everything
/// else is optional here and reported by name when the chosen derivation needs it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AgentSymbols {
    #[serde(default, deserialize_with = "flag")]
    pub mqtt_enable_metrics: bool,
    pub mqtt_metric_sdk: Option<String>,
    pub mqtt_metric_platform: Option<String>,

    pub mqtt_keep_alive_interval_seconds: Option<u64>,
    /// milliseconds, despite the symbol name
    pub mqtt_keep_alive_actual_interval_ticks: Option<u64>,
    /// milliseconds, despite the symbol name
    pub mqtt_keep_alive_timeout_ticks: Option<u64>,
    /// milliseconds, despite the symbol name
    pub mqtt_task_max_block_ticks: Option<u64>,

    #[serde(default, deserialize_with = "flag")]
    pub mqtt_task_stack_depth_depends_on_stack_size: bool,
    pub mqtt_task_stack_depth_multiplier: Option<u32>,
    pub mqtt_task_stack_depth: Option<u32>,

    #[serde(default, deserialize_with = "flag")]
    pub mqtt_task_priority_depends_on_max_priority: bool,
    pub mqtt_task_priority_difference: Option<u32>,
    pub mqtt_task_priority: Option<u32>,

    pub mqtt_max_brokers: Option<u32>,
    pub mqtt_max_parallel_ops: Option<u32>,
    pub mqtt_tcp_send_timeout_ms: Option<u64>,
    pub mqtt_rx_buffer_size: Option<usize>,

    pub iot_endpoint: Option<String>,
    pub thing_name: Option<String>,

    pub rtos_tick_rate_hz: Option<u32>,
    pub rtos_minimal_stack_size: Option<u32>,
    pub rtos_max_priorities: Option<u32>,
    pub rtos_idle_priority: Option<u32>,
    pub rtos_kernel_version: Option<String>,
}

impl AgentSymbols {
    /// Read the given `.config` fragments in order, then `CONFIG_*` environment
    /// variables when `with_env` is set.
    pub fn load<P: AsRef<Path>>(
        fragments: &[P],
        format: &KconfigFile,
        with_env: bool,
    ) -> AgentConfigResult<Self> {
        let env = with_env.then(symbol_environment);
        Ok(load_layered(fragments, format, env)?)
    }

    /// Scheduler profile from the `CONFIG_RTOS_*` symbols.
    pub fn scheduler_profile(&self) -> AgentConfigResult<SchedulerProfile> {
        let mut profile = SchedulerProfile::new(
            need(self.rtos_tick_rate_hz, symbol::RTOS_TICK_RATE_HZ)?,
            need(self.rtos_minimal_stack_size, symbol::RTOS_MINIMAL_STACK_SIZE)?,
            need(self.rtos_max_priorities, symbol::RTOS_MAX_PRIORITIES)?,
        )?;

        if let Some(version) = &self.rtos_kernel_version {
            profile = profile.with_kernel_version(version);
        }

        match self.rtos_idle_priority {
            Some(idle) => profile.with_idle_priority(idle),
            None => Ok(profile),
        }
    }

    pub fn stack_depth_strategy(&self) -> AgentConfigResult<StackDepthStrategy> {
        if self.mqtt_task_stack_depth_depends_on_stack_size {
            if self.mqtt_task_stack_depth.is_some() {
                warn!(
                    "{} ignored because {} is set",
                    symbol::TASK_STACK_DEPTH,
                    symbol::TASK_STACK_DEPTH_DEPENDS_ON_STACK_SIZE
                );
            }
            Ok(StackDepthStrategy::RelativeToMinimal {
                multiplier: need(
                    self.mqtt_task_stack_depth_multiplier,
                    symbol::TASK_STACK_DEPTH_MULTIPLIER,
                )?,
            })
        } else {
            Ok(StackDepthStrategy::Absolute {
                words: need(self.mqtt_task_stack_depth, symbol::TASK_STACK_DEPTH)?,
            })
        }
    }

    pub fn priority_strategy(&self) -> AgentConfigResult<PriorityStrategy> {
        if self.mqtt_task_priority_depends_on_max_priority {
            if self.mqtt_task_priority.is_some() {
                warn!(
                    "{} ignored because {} is set",
                    symbol::TASK_PRIORITY,
                    symbol::TASK_PRIORITY_DEPENDS_ON_MAX_PRIORITY
                );
            }
            Ok(PriorityStrategy::RelativeToMax {
                difference: need(
                    self.mqtt_task_priority_difference,
                    symbol::TASK_PRIORITY_DIFFERENCE,
                )?,
            })
        } else {
            Ok(PriorityStrategy::Absolute {
                above_idle: need(self.mqtt_task_priority, symbol::TASK_PRIORITY)?,
            })
        }
    }

    pub fn broker_identity(&self) -> AgentConfigResult<Option<BrokerIdentity>> {
        match (&self.iot_endpoint, &self.thing_name) {
            (None, None) => Ok(None),
            (Some(endpoint), Some(thing)) => BrokerIdentity::new(endpoint, thing).map(Some),
            (None, Some(_)) => Err(AgentConfigError::missing(symbol::IOT_ENDPOINT)),
            (Some(_), None) => Err(AgentConfigError::missing(symbol::THING_NAME)),
        }
    }

    /// Translate the symbols into a builder; nothing is validated yet.
    pub fn to_builder(&self) -> AgentConfigResult<AgentConfigBuilder> {
        if !self.mqtt_enable_metrics
            && (self.mqtt_metric_sdk.is_some() || self.mqtt_metric_platform.is_some())
        {
            debug!(
                "{} is not set, {} and {} are unused",
                symbol::ENABLE_METRICS,
                symbol::METRIC_SDK,
                symbol::METRIC_PLATFORM
            );
        }

        let mut builder = AgentConfig::builder()
            .metrics_enabled(self.mqtt_enable_metrics)
            .stack_depth(self.stack_depth_strategy()?)
            .priority(self.priority_strategy()?);

        if let Some(sdk) = &self.mqtt_metric_sdk {
            builder = builder.metric_sdk(sdk);
        }
        if let Some(platform) = &self.mqtt_metric_platform {
            builder = builder.metric_platform(platform);
        }
        if let Some(secs) = self.mqtt_keep_alive_interval_seconds {
            builder = builder.keep_alive_interval_secs(secs);
        }
        if let Some(millis) = self.mqtt_keep_alive_actual_interval_ticks {
            builder = builder.keep_alive_actual_interval_ms(millis);
        }
        if let Some(millis) = self.mqtt_keep_alive_timeout_ticks {
            builder = builder.keep_alive_timeout_ms(millis);
        }
        if let Some(millis) = self.mqtt_task_max_block_ticks {
            builder = builder.task_max_block_ms(millis);
        }
        if let Some(brokers) = self.mqtt_max_brokers {
            builder = builder.max_brokers(brokers);
        }
        if let Some(ops) = self.mqtt_max_parallel_ops {
            builder = builder.max_parallel_ops(ops);
        }
        if let Some(millis) = self.mqtt_tcp_send_timeout_ms {
            builder = builder.tcp_send_timeout_ms(millis);
        }
        if let Some(bytes) = self.mqtt_rx_buffer_size {
            builder = builder.rx_buffer_size(bytes);
        }

        if let Some(broker) = self.broker_identity()? {
            builder = builder.broker(broker);
        }

        Ok(builder)
    }

    /// Resolve against the scheduler profile carried by the symbols themselves.
    pub fn resolve(&self) -> AgentConfigResult<AgentConfig> {
        AgentConfig::from_symbols(self, &self.scheduler_profile()?)
    }
}

impl AgentConfig {
    /// Resolve `symbols` against an externally supplied scheduler profile.
    pub fn from_symbols(
        symbols: &AgentSymbols,
        profile: &SchedulerProfile,
    ) -> AgentConfigResult<AgentConfig> {
        let config = symbols.to_builder()?.build(profile)?;
        info!(
            stack_depth = config.task_stack_depth(),
            priority = config.task_priority(),
            metrics = config.metrics_enabled(),
            "MQTT agent configuration resolved"
        );
        Ok(config)
    }
}

fn need<T>(value: Option<T>, symbol: &'static str) -> AgentConfigResult<T> {
    value.ok_or(AgentConfigError::missing(symbol))
}
