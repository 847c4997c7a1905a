use std::num::NonZeroU32;

use serde::Serialize;

use crate::{
    constants::symbol,
    error::{AgentConfigError, AgentConfigResult},
};

/// The RTOS port constants the agent settings are derived from.
///
/// These mirror `configTICK_RATE_HZ`, `configMINIMAL_STACK_SIZE`,
/// `configMAX_PRIORITIES`, `tskIDLE_PRIORITY` and `tskKERNEL_VERSION_NUMBER`.
/// The kernel version only feeds the metrics strings, so it may be left out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchedulerProfile {
    tick_rate_hz: NonZeroU32,
    minimal_stack_size: u32,
    max_priorities: u32,
    idle_priority: u32,
    kernel_version: Option<String>,
}

impl SchedulerProfile {
    /// Create a profile with the idle task at priority 0.
    pub fn new(
        tick_rate_hz: u32,
        minimal_stack_size: u32,
        max_priorities: u32,
    ) -> AgentConfigResult<Self> {
        let tick_rate_hz = NonZeroU32::new(tick_rate_hz)
            .ok_or(AgentConfigError::zero(symbol::RTOS_TICK_RATE_HZ))?;

        if minimal_stack_size == 0 {
            return Err(AgentConfigError::zero(symbol::RTOS_MINIMAL_STACK_SIZE));
        }

        if max_priorities == 0 {
            return Err(AgentConfigError::zero(symbol::RTOS_MAX_PRIORITIES));
        }

        Ok(Self {
            tick_rate_hz,
            minimal_stack_size,
            max_priorities,
            idle_priority: 0,
            kernel_version: None,
        })
    }

    pub fn with_kernel_version(mut self, kernel_version: impl Into<String>) -> Self {
        self.kernel_version = Some(kernel_version.into());
        self
    }

    pub fn with_idle_priority(mut self, idle_priority: u32) -> AgentConfigResult<Self> {
        if idle_priority >= self.max_priorities {
            return Err(AgentConfigError::out_of_range(
                symbol::RTOS_IDLE_PRIORITY,
                idle_priority,
                format!("must be below {} priorities", self.max_priorities),
            ));
        }
        self.idle_priority = idle_priority;
        Ok(self)
    }

    #[inline]
    pub fn tick_rate_hz(&self) -> NonZeroU32 {
        self.tick_rate_hz
    }

    /// Minimal task stack, in words.
    #[inline]
    pub fn minimal_stack_size(&self) -> u32 {
        self.minimal_stack_size
    }

    #[inline]
    pub fn max_priorities(&self) -> u32 {
        self.max_priorities
    }

    #[inline]
    pub fn idle_priority(&self) -> u32 {
        self.idle_priority
    }

    #[inline]
    pub fn kernel_version(&self) -> Option<&str> {
        self.kernel_version.as_deref()
    }
}
