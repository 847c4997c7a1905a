//! Build-time configuration of an RTOS-hosted MQTT agent task.
//!
//! Kconfig symbols are read into [`AgentSymbols`], combined with the port's
//! [`SchedulerProfile`] and resolved once into an immutable [`AgentConfig`]: keep-alive
//! timing in scheduler ticks, task stack depth and priority, broker and operation
//! limits, buffer sizes and the optional metrics identification.

pub mod agent;
pub mod board;
pub mod constants;
pub mod error;
pub mod header;
pub mod identity;
pub mod metrics;
pub mod scheduler;
pub mod symbols;
pub mod task;
pub mod ticks;

pub use agent::{AgentConfig, AgentConfigBuilder};
pub use board::BoardSelection;
pub use error::{AgentConfigError, AgentConfigResult};
pub use header::{AgentHeader, KconfigHeader, render_header, render_kconfig_header};
pub use identity::BrokerIdentity;
pub use metrics::MetricsIdentity;
pub use scheduler::SchedulerProfile;
pub use symbols::AgentSymbols;
pub use task::{PriorityStrategy, StackDepthStrategy};
pub use ticks::Ticks;
