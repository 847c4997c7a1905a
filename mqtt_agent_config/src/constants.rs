/// SDK name reported in the metrics username
pub const DEFAULT_METRIC_SDK: &str = "AmazonFreeRTOS";

/// Prefix of the SDK metric
pub const METRIC_SDK_PREFIX: &str = "SDK=";

/// Prefix of the version metric
pub const METRIC_VERSION_PREFIX: &str = "Version=";

/// Prefix of the platform metric
pub const METRIC_PLATFORM_PREFIX: &str = "Platform=";

/// Starts the metrics query appended to the connect username
pub const METRICS_QUERY_START: &str = "?";

/// Separates the individual metrics
pub const METRICS_SEPARATOR: &str = "&";

/// Milliseconds per second, used by the tick conversion
pub const MILLIS_PER_SEC: u64 = 1000;

/// Board fragment holding the board properties
pub const BOARD_FRAGMENT: &str = "Kconfig";

/// Board fragment holding the MQTT agent symbols
pub const AGENT_FRAGMENT: &str = "mqtt_agent_Kconfig";

/// Generated header consumed by the firmware build
pub const HEADER_FILE_NAME: &str = "iot_mqtt_agent_config.h";

/// Header with every merged symbol, relative to the source root
pub const KCONFIG_HEADER_PATH: &str = "build/kconfig/kconfig.h";

/// Symbols with this suffix hold C expressions and are written unquoted
pub const FUNC_SYMBOL_SUFFIX: &str = "_FUNC";

/// Include guard of the generated header
pub const HEADER_GUARD: &str = "_AWS_MQTT_AGENT_CONFIG_H_";

/// File recording the last board choice
pub const BOARD_CHOICE_FILE: &str = "boardChoice.csv";

/// Kconfig symbol names read by [`crate::AgentSymbols`].
pub mod symbol {
    pub const ENABLE_METRICS: &str = "CONFIG_MQTT_ENABLE_METRICS";
    pub const METRIC_SDK: &str = "CONFIG_MQTT_METRIC_SDK";
    pub const METRIC_PLATFORM: &str = "CONFIG_MQTT_METRIC_PLATFORM";
    pub const KEEP_ALIVE_INTERVAL_SECONDS: &str = "CONFIG_MQTT_KEEP_ALIVE_INTERVAL_SECONDS";
    pub const KEEP_ALIVE_ACTUAL_INTERVAL: &str = "CONFIG_MQTT_KEEP_ALIVE_ACTUAL_INTERVAL_TICKS";
    pub const KEEP_ALIVE_TIMEOUT: &str = "CONFIG_MQTT_KEEP_ALIVE_TIMEOUT_TICKS";
    pub const TASK_MAX_BLOCK: &str = "CONFIG_MQTT_TASK_MAX_BLOCK_TICKS";
    pub const TASK_STACK_DEPTH_DEPENDS_ON_STACK_SIZE: &str =
        "CONFIG_MQTT_TASK_STACK_DEPTH_DEPENDS_ON_STACK_SIZE";
    pub const TASK_STACK_DEPTH_MULTIPLIER: &str = "CONFIG_MQTT_TASK_STACK_DEPTH_MULTIPLIER";
    pub const TASK_STACK_DEPTH: &str = "CONFIG_MQTT_TASK_STACK_DEPTH";
    pub const TASK_PRIORITY_DEPENDS_ON_MAX_PRIORITY: &str =
        "CONFIG_MQTT_TASK_PRIORITY_DEPENDS_ON_MAX_PRIORITY";
    pub const TASK_PRIORITY_DIFFERENCE: &str = "CONFIG_MQTT_TASK_PRIORITY_DIFFERENCE";
    pub const TASK_PRIORITY: &str = "CONFIG_MQTT_TASK_PRIORITY";
    pub const MAX_BROKERS: &str = "CONFIG_MQTT_MAX_BROKERS";
    pub const MAX_PARALLEL_OPS: &str = "CONFIG_MQTT_MAX_PARALLEL_OPS";
    pub const TCP_SEND_TIMEOUT_MS: &str = "CONFIG_MQTT_TCP_SEND_TIMEOUT_MS";
    pub const RX_BUFFER_SIZE: &str = "CONFIG_MQTT_RX_BUFFER_SIZE";
    pub const IOT_ENDPOINT: &str = "CONFIG_IOT_ENDPOINT";
    pub const THING_NAME: &str = "CONFIG_THING_NAME";
    pub const RTOS_TICK_RATE_HZ: &str = "CONFIG_RTOS_TICK_RATE_HZ";
    pub const RTOS_MINIMAL_STACK_SIZE: &str = "CONFIG_RTOS_MINIMAL_STACK_SIZE";
    pub const RTOS_MAX_PRIORITIES: &str = "CONFIG_RTOS_MAX_PRIORITIES";
    pub const RTOS_IDLE_PRIORITY: &str = "CONFIG_RTOS_IDLE_PRIORITY";
    pub const RTOS_KERNEL_VERSION: &str = "CONFIG_RTOS_KERNEL_VERSION";
}
