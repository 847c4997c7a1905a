use std::{num::NonZeroU32, time::Duration};

use serde::Serialize;
use tracing::debug;

use crate::{
    constants::{MILLIS_PER_SEC, symbol},
    error::{AgentConfigError, AgentConfigResult},
    identity::BrokerIdentity,
    metrics::MetricsIdentity,
    scheduler::SchedulerProfile,
    task::{PriorityStrategy, StackDepthStrategy},
    ticks::Ticks,
};

/// Settings handed to the MQTT agent at initialization.
///
/// Every value is resolved once by [`AgentConfigBuilder::build`]; the accessors
/// only read fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgentConfig {
    metrics: Option<MetricsIdentity>,
    keep_alive_interval_secs: u16,
    keep_alive_actual_interval: Ticks,
    keep_alive_timeout: Ticks,
    task_max_block: Ticks,
    stack_depth_strategy: StackDepthStrategy,
    task_stack_depth: u32,
    priority_strategy: PriorityStrategy,
    task_priority: u32,
    max_brokers: u32,
    max_parallel_ops: u32,
    tcp_send_timeout: Duration,
    rx_buffer_size: usize,
    tick_rate_hz: NonZeroU32,
    broker: Option<BrokerIdentity>,
}

impl AgentConfig {
    pub fn builder() -> AgentConfigBuilder {
        AgentConfigBuilder::default()
    }

    #[inline]
    pub fn metrics_enabled(&self) -> bool {
        self.metrics.is_some()
    }

    #[inline]
    pub fn metrics(&self) -> Option<&MetricsIdentity> {
        self.metrics.as_ref()
    }

    /// The identification payload, or `None` when metrics are disabled.
    pub fn metrics_payload(&self) -> Option<String> {
        self.metrics.as_ref().map(MetricsIdentity::payload)
    }

    /// Username for the MQTT CONNECT packet, with the metrics payload appended when
    /// metrics are enabled.
    pub fn connect_username(&self, username: Option<&str>) -> Option<String> {
        match (&self.metrics, username) {
            (Some(metrics), Some(name)) => Some(format!("{name}{}", metrics.payload())),
            (Some(metrics), None) => Some(metrics.payload()),
            (None, name) => name.map(str::to_owned),
        }
    }

    /// Maximum gap between two control packets, as sent in CONNECT.
    #[inline]
    pub fn keep_alive_interval_secs(&self) -> u16 {
        self.keep_alive_interval_secs
    }

    /// Inactivity after which a PINGREQ is sent.
    #[inline]
    pub fn keep_alive_actual_interval(&self) -> Ticks {
        self.keep_alive_actual_interval
    }

    /// How long to wait for PINGRESP.
    #[inline]
    pub fn keep_alive_timeout(&self) -> Ticks {
        self.keep_alive_timeout
    }

    #[inline]
    pub fn task_max_block(&self) -> Ticks {
        self.task_max_block
    }

    /// Stack depth in words.
    #[inline]
    pub fn task_stack_depth(&self) -> u32 {
        self.task_stack_depth
    }

    #[inline]
    pub fn stack_depth_strategy(&self) -> StackDepthStrategy {
        self.stack_depth_strategy
    }

    #[inline]
    pub fn task_priority(&self) -> u32 {
        self.task_priority
    }

    #[inline]
    pub fn priority_strategy(&self) -> PriorityStrategy {
        self.priority_strategy
    }

    #[inline]
    pub fn max_brokers(&self) -> u32 {
        self.max_brokers
    }

    #[inline]
    pub fn max_parallel_ops(&self) -> u32 {
        self.max_parallel_ops
    }

    #[inline]
    pub fn tcp_send_timeout(&self) -> Duration {
        self.tcp_send_timeout
    }

    #[inline]
    pub fn rx_buffer_size(&self) -> usize {
        self.rx_buffer_size
    }

    /// Tick rate the tick values were converted with.
    #[inline]
    pub fn tick_rate_hz(&self) -> NonZeroU32 {
        self.tick_rate_hz
    }

    #[inline]
    pub fn broker(&self) -> Option<&BrokerIdentity> {
        self.broker.as_ref()
    }
}

/// Collects raw values in their source units and validates them in [`build`].
///
/// [`build`]: AgentConfigBuilder::build
#[derive(Debug, Clone, Default)]
pub struct AgentConfigBuilder {
    metrics_enabled: bool,
    metric_sdk: Option<String>,
    metric_platform: Option<String>,
    keep_alive_interval_secs: Option<u64>,
    keep_alive_actual_interval_ms: Option<u64>,
    keep_alive_timeout_ms: Option<u64>,
    task_max_block_ms: Option<u64>,
    stack_depth: Option<StackDepthStrategy>,
    priority: Option<PriorityStrategy>,
    max_brokers: Option<u32>,
    max_parallel_ops: Option<u32>,
    tcp_send_timeout_ms: Option<u64>,
    rx_buffer_size: Option<usize>,
    broker: Option<BrokerIdentity>,
}

impl AgentConfigBuilder {
    pub fn metrics_enabled(mut self, enabled: bool) -> Self {
        self.metrics_enabled = enabled;
        self
    }

    /// SDK name; defaults to [`crate::constants::DEFAULT_METRIC_SDK`].
    pub fn metric_sdk(mut self, sdk: impl Into<String>) -> Self {
        self.metric_sdk = Some(sdk.into());
        self
    }

    pub fn metric_platform(mut self, platform: impl Into<String>) -> Self {
        self.metric_platform = Some(platform.into());
        self
    }

    pub fn keep_alive_interval_secs(mut self, secs: u64) -> Self {
        self.keep_alive_interval_secs = Some(secs);
        self
    }

    pub fn keep_alive_actual_interval_ms(mut self, millis: u64) -> Self {
        self.keep_alive_actual_interval_ms = Some(millis);
        self
    }

    pub fn keep_alive_timeout_ms(mut self, millis: u64) -> Self {
        self.keep_alive_timeout_ms = Some(millis);
        self
    }

    pub fn task_max_block_ms(mut self, millis: u64) -> Self {
        self.task_max_block_ms = Some(millis);
        self
    }

    pub fn stack_depth(mut self, strategy: StackDepthStrategy) -> Self {
        self.stack_depth = Some(strategy);
        self
    }

    pub fn priority(mut self, strategy: PriorityStrategy) -> Self {
        self.priority = Some(strategy);
        self
    }

    pub fn max_brokers(mut self, brokers: u32) -> Self {
        self.max_brokers = Some(brokers);
        self
    }

    pub fn max_parallel_ops(mut self, ops: u32) -> Self {
        self.max_parallel_ops = Some(ops);
        self
    }

    pub fn tcp_send_timeout_ms(mut self, millis: u64) -> Self {
        self.tcp_send_timeout_ms = Some(millis);
        self
    }

    pub fn rx_buffer_size(mut self, bytes: usize) -> Self {
        self.rx_buffer_size = Some(bytes);
        self
    }

    pub fn broker(mut self, broker: BrokerIdentity) -> Self {
        self.broker = Some(broker);
        self
    }

    pub fn build(self, profile: &SchedulerProfile) -> AgentConfigResult<AgentConfig> {
        let rate = profile.tick_rate_hz();

        let metrics = if self.metrics_enabled {
            let platform = non_empty(self.metric_platform, symbol::METRIC_PLATFORM)?;
            let version = profile
                .kernel_version()
                .ok_or(AgentConfigError::missing(symbol::RTOS_KERNEL_VERSION))?;
            Some(match self.metric_sdk {
                Some(sdk) => {
                    let sdk = non_empty(Some(sdk), symbol::METRIC_SDK)?;
                    MetricsIdentity::new(sdk, version, platform)
                }
                None => MetricsIdentity::with_default_sdk(version, platform),
            })
        } else {
            None
        };

        let interval_secs = required(
            self.keep_alive_interval_secs,
            symbol::KEEP_ALIVE_INTERVAL_SECONDS,
        )?;
        if interval_secs == 0 {
            return Err(AgentConfigError::zero(symbol::KEEP_ALIVE_INTERVAL_SECONDS));
        }
        let keep_alive_interval_secs = u16::try_from(interval_secs).map_err(|_| {
            AgentConfigError::out_of_range(
                symbol::KEEP_ALIVE_INTERVAL_SECONDS,
                interval_secs,
                "MQTT keep-alive is a 16-bit field",
            )
        })?;

        let actual_ms = required(
            self.keep_alive_actual_interval_ms,
            symbol::KEEP_ALIVE_ACTUAL_INTERVAL,
        )?;
        if actual_ms > interval_secs * MILLIS_PER_SEC {
            return Err(AgentConfigError::KeepAliveOrder {
                actual_ms,
                interval_secs,
            });
        }

        let keep_alive_actual_interval =
            nonzero_ticks(symbol::KEEP_ALIVE_ACTUAL_INTERVAL, actual_ms, rate)?;
        let keep_alive_timeout = nonzero_ticks(
            symbol::KEEP_ALIVE_TIMEOUT,
            required(self.keep_alive_timeout_ms, symbol::KEEP_ALIVE_TIMEOUT)?,
            rate,
        )?;
        let task_max_block = nonzero_ticks(
            symbol::TASK_MAX_BLOCK,
            required(self.task_max_block_ms, symbol::TASK_MAX_BLOCK)?,
            rate,
        )?;

        let stack_depth_strategy = required(self.stack_depth, symbol::TASK_STACK_DEPTH)?;
        let task_stack_depth = stack_depth_strategy.resolve(profile)?;

        let priority_strategy = required(self.priority, symbol::TASK_PRIORITY)?;
        let task_priority = priority_strategy.resolve(profile)?;

        let max_brokers = positive(self.max_brokers, symbol::MAX_BROKERS)?;
        let max_parallel_ops = positive(self.max_parallel_ops, symbol::MAX_PARALLEL_OPS)?;
        let rx_buffer_size = positive(self.rx_buffer_size, symbol::RX_BUFFER_SIZE)?;

        // zero is a valid non-blocking send
        let tcp_send_timeout = Duration::from_millis(required(
            self.tcp_send_timeout_ms,
            symbol::TCP_SEND_TIMEOUT_MS,
        )?);

        debug!(
            keep_alive_interval_secs,
            %keep_alive_actual_interval,
            %keep_alive_timeout,
            %task_max_block,
            task_stack_depth,
            task_priority,
            max_brokers,
            max_parallel_ops,
            rx_buffer_size,
            metrics = metrics.is_some(),
            "resolved MQTT agent configuration"
        );

        Ok(AgentConfig {
            metrics,
            keep_alive_interval_secs,
            keep_alive_actual_interval,
            keep_alive_timeout,
            task_max_block,
            stack_depth_strategy,
            task_stack_depth,
            priority_strategy,
            task_priority,
            max_brokers,
            max_parallel_ops,
            tcp_send_timeout,
            rx_buffer_size,
            tick_rate_hz: rate,
            broker: self.broker,
        })
    }
}

fn required<T>(value: Option<T>, symbol: &'static str) -> AgentConfigResult<T> {
    value.ok_or(AgentConfigError::missing(symbol))
}

fn non_empty(value: Option<String>, symbol: &'static str) -> AgentConfigResult<String> {
    match value {
        Some(text) if !text.trim().is_empty() => Ok(text),
        _ => Err(AgentConfigError::missing(symbol)),
    }
}

fn positive<T>(value: Option<T>, symbol: &'static str) -> AgentConfigResult<T>
where
    T: Default + PartialEq,
{
    let value = required(value, symbol)?;
    if value == T::default() {
        return Err(AgentConfigError::zero(symbol));
    }
    Ok(value)
}

fn nonzero_ticks(
    symbol: &'static str,
    millis: u64,
    rate: NonZeroU32,
) -> AgentConfigResult<Ticks> {
    let ticks = Ticks::convert(symbol, millis, rate)?;
    if ticks.is_zero() {
        return Err(AgentConfigError::out_of_range(
            symbol,
            millis,
            format!("rounds down to zero ticks at {rate} Hz"),
        ));
    }
    Ok(ticks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn profile() -> SchedulerProfile {
        SchedulerProfile::new(1000, 90, 7)
            .unwrap()
            .with_kernel_version("V10.2.1")
    }

    fn complete() -> AgentConfigBuilder {
        AgentConfig::builder()
            .keep_alive_interval_secs(1200)
            .keep_alive_actual_interval_ms(1_150_000)
            .keep_alive_timeout_ms(1000)
            .task_max_block_ms(100)
            .stack_depth(StackDepthStrategy::RelativeToMinimal { multiplier: 4 })
            .priority(PriorityStrategy::RelativeToMax { difference: 3 })
            .max_brokers(1)
            .max_parallel_ops(5)
            .tcp_send_timeout_ms(10_000)
            .rx_buffer_size(1024)
    }

    #[test]
    fn test_build_resolves_all_values() {
        let config = complete().build(&profile()).unwrap();

        assert!(!config.metrics_enabled());
        assert_eq!(config.keep_alive_interval_secs(), 1200);
        assert_eq!(config.keep_alive_actual_interval(), Ticks(1_150_000));
        assert_eq!(config.keep_alive_timeout(), Ticks(1000));
        assert_eq!(config.task_max_block(), Ticks(100));
        assert_eq!(config.task_stack_depth(), 360);
        assert_eq!(config.task_priority(), 4);
        assert_eq!(config.max_brokers(), 1);
        assert_eq!(config.max_parallel_ops(), 5);
        assert_eq!(config.tcp_send_timeout(), Duration::from_secs(10));
        assert_eq!(config.rx_buffer_size(), 1024);
        assert_eq!(config.tick_rate_hz().get(), 1000);
        assert!(config.broker().is_none());
    }

    #[test]
    fn test_build_converts_with_profile_tick_rate() {
        let slow = SchedulerProfile::new(100, 90, 7)
            .unwrap()
            .with_kernel_version("V10.2.1");
        let config = complete().build(&slow).unwrap();

        assert_eq!(config.keep_alive_actual_interval(), Ticks(115_000));
        assert_eq!(config.keep_alive_timeout(), Ticks(100));
        assert_eq!(config.task_max_block(), Ticks(10));
        assert_eq!(
            config.task_max_block().to_duration(config.tick_rate_hz()),
            Duration::from_millis(100)
        );
    }

    #[test]
    fn test_build_absolute_strategies() {
        let config = complete()
            .stack_depth(StackDepthStrategy::Absolute { words: 2048 })
            .priority(PriorityStrategy::Absolute { above_idle: 5 })
            .build(&profile())
            .unwrap();

        assert_eq!(config.task_stack_depth(), 2048);
        assert_eq!(config.task_priority(), 5);
        assert!(!config.stack_depth_strategy().is_relative());
        assert!(!config.priority_strategy().is_relative());
    }

    #[test]
    fn test_metrics_disabled_attaches_nothing() {
        let config = complete()
            .metric_platform("NumakerPFMM487")
            .build(&profile())
            .unwrap();

        assert_eq!(config.metrics_payload(), None);
        assert_eq!(config.connect_username(None), None);
        assert_eq!(
            config.connect_username(Some("device")).as_deref(),
            Some("device")
        );
    }

    #[test]
    fn test_metrics_enabled_appends_payload() {
        let config = complete()
            .metrics_enabled(true)
            .metric_platform("NumakerPFMM487")
            .build(&profile())
            .unwrap();

        let expected = "?SDK=AmazonFreeRTOS&Version=V10.2.1&Platform=NumakerPFMM487";
        assert_eq!(config.metrics_payload().as_deref(), Some(expected));
        assert_eq!(config.connect_username(None).as_deref(), Some(expected));
        assert_eq!(
            config.connect_username(Some("device")).as_deref(),
            Some(format!("device{expected}").as_str())
        );
    }

    #[test]
    fn test_metrics_custom_sdk() {
        let config = complete()
            .metrics_enabled(true)
            .metric_sdk("CustomSdk")
            .metric_platform("Board")
            .build(&profile())
            .unwrap();
        assert_eq!(config.metrics().unwrap().sdk(), "CustomSdk");
    }

    #[test]
    fn test_metrics_enabled_requires_platform() {
        let err = complete().metrics_enabled(true).build(&profile()).unwrap_err();
        assert!(matches!(
            err,
            AgentConfigError::MissingSymbol {
                symbol: symbol::METRIC_PLATFORM
            }
        ));
    }

    #[test]
    fn test_kernel_version_only_needed_for_metrics() {
        let bare = SchedulerProfile::new(1000, 90, 7).unwrap();
        assert!(complete().build(&bare).is_ok());

        let err = complete()
            .metrics_enabled(true)
            .metric_platform("NumakerPFMM487")
            .build(&bare)
            .unwrap_err();
        assert!(matches!(
            err,
            AgentConfigError::MissingSymbol {
                symbol: symbol::RTOS_KERNEL_VERSION
            }
        ));
    }

    #[test]
    fn test_blank_metric_strings_rejected() {
        let err = complete()
            .metrics_enabled(true)
            .metric_sdk("  ")
            .metric_platform("Board")
            .build(&profile())
            .unwrap_err();
        assert!(matches!(
            err,
            AgentConfigError::MissingSymbol {
                symbol: symbol::METRIC_SDK
            }
        ));
    }

    #[test]
    fn test_missing_value_names_symbol() {
        let err = AgentConfig::builder().build(&profile()).unwrap_err();
        assert!(matches!(
            err,
            AgentConfigError::MissingSymbol {
                symbol: symbol::KEEP_ALIVE_INTERVAL_SECONDS
            }
        ));
    }

    #[rstest]
    #[case(complete().keep_alive_interval_secs(0))]
    #[case(complete().max_brokers(0))]
    #[case(complete().max_parallel_ops(0))]
    #[case(complete().rx_buffer_size(0))]
    fn test_zero_counts_rejected(#[case] builder: AgentConfigBuilder) {
        assert!(matches!(
            builder.build(&profile()),
            Err(AgentConfigError::Zero { .. })
        ));
    }

    #[test]
    fn test_keep_alive_interval_is_16_bit() {
        let err = complete()
            .keep_alive_interval_secs(70_000)
            .build(&profile())
            .unwrap_err();
        assert!(matches!(err, AgentConfigError::OutOfRange { .. }));
    }

    #[test]
    fn test_actual_interval_must_not_exceed_interval() {
        let err = complete()
            .keep_alive_interval_secs(60)
            .keep_alive_actual_interval_ms(60_001)
            .build(&profile())
            .unwrap_err();
        assert!(matches!(
            err,
            AgentConfigError::KeepAliveOrder {
                actual_ms: 60_001,
                interval_secs: 60
            }
        ));

        assert!(
            complete()
                .keep_alive_interval_secs(60)
                .keep_alive_actual_interval_ms(60_000)
                .build(&profile())
                .is_ok()
        );
    }

    #[test]
    fn test_tick_values_that_round_to_zero() {
        let slow = SchedulerProfile::new(10, 90, 7).unwrap();
        let err = complete().task_max_block_ms(50).build(&slow).unwrap_err();
        assert!(matches!(
            err,
            AgentConfigError::OutOfRange {
                symbol: symbol::TASK_MAX_BLOCK,
                ..
            }
        ));
    }

    #[test]
    fn test_tick_overflow() {
        let err = complete()
            .keep_alive_timeout_ms(u64::MAX)
            .build(&profile())
            .unwrap_err();
        assert!(matches!(
            err,
            AgentConfigError::TickOverflow {
                symbol: symbol::KEEP_ALIVE_TIMEOUT,
                ..
            }
        ));
    }

    #[test]
    fn test_zero_send_timeout_allowed() {
        let config = complete().tcp_send_timeout_ms(0).build(&profile()).unwrap();
        assert_eq!(config.tcp_send_timeout(), Duration::ZERO);
    }

    #[test]
    fn test_broker_identity_carried() {
        let broker = BrokerIdentity::new("host.example.com", "thing").unwrap();
        let config = complete().broker(broker.clone()).build(&profile()).unwrap();
        assert_eq!(config.broker(), Some(&broker));
    }
}
