//! Stack depth and priority of the agent task.
//!
//! Each value is either derived from the scheduler profile or configured outright.
//! The Kconfig `*_DEPENDS_ON_*` switch picks the variant.

use serde::Serialize;

use crate::{
    constants::symbol,
    error::{AgentConfigError, AgentConfigResult},
    scheduler::SchedulerProfile,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum StackDepthStrategy {
    /// `configMINIMAL_STACK_SIZE * multiplier`
    RelativeToMinimal { multiplier: u32 },
    /// A fixed number of words.
    Absolute { words: u32 },
}

impl StackDepthStrategy {
    /// Stack depth in words.
    pub fn resolve(&self, profile: &SchedulerProfile) -> AgentConfigResult<u32> {
        match *self {
            Self::RelativeToMinimal { multiplier } => {
                if multiplier == 0 {
                    return Err(AgentConfigError::zero(symbol::TASK_STACK_DEPTH_MULTIPLIER));
                }
                profile
                    .minimal_stack_size()
                    .checked_mul(multiplier)
                    .ok_or_else(|| {
                        AgentConfigError::out_of_range(
                            symbol::TASK_STACK_DEPTH_MULTIPLIER,
                            multiplier,
                            format!(
                                "{} words x {} overflows the stack depth",
                                profile.minimal_stack_size(),
                                multiplier
                            ),
                        )
                    })
            }
            Self::Absolute { words } => {
                if words == 0 {
                    return Err(AgentConfigError::zero(symbol::TASK_STACK_DEPTH));
                }
                Ok(words)
            }
        }
    }

    pub fn is_relative(&self) -> bool {
        matches!(self, Self::RelativeToMinimal { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum PriorityStrategy {
    /// `configMAX_PRIORITIES - difference`
    RelativeToMax { difference: u32 },
    /// `tskIDLE_PRIORITY + above_idle`
    Absolute { above_idle: u32 },
}

impl PriorityStrategy {
    /// Task priority; always within `idle..max_priorities`.
    pub fn resolve(&self, profile: &SchedulerProfile) -> AgentConfigResult<u32> {
        let max = profile.max_priorities();
        let idle = profile.idle_priority();

        match *self {
            Self::RelativeToMax { difference } => {
                if difference == 0 {
                    return Err(AgentConfigError::zero(symbol::TASK_PRIORITY_DIFFERENCE));
                }
                match max.checked_sub(difference) {
                    Some(priority) if priority >= idle => Ok(priority),
                    _ => Err(AgentConfigError::out_of_range(
                        symbol::TASK_PRIORITY_DIFFERENCE,
                        difference,
                        format!("{max} priorities minus {difference} falls below idle priority {idle}"),
                    )),
                }
            }
            Self::Absolute { above_idle } => match idle.checked_add(above_idle) {
                Some(priority) if priority < max => Ok(priority),
                _ => Err(AgentConfigError::out_of_range(
                    symbol::TASK_PRIORITY,
                    above_idle,
                    format!("idle priority {idle} plus {above_idle} reaches {max} priorities"),
                )),
            },
        }
    }

    pub fn is_relative(&self) -> bool {
        matches!(self, Self::RelativeToMax { .. })
    }
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

    #[rstest]
    #[case(StackDepthStrategy::RelativeToMinimal { multiplier: 4 }, 360)]
    #[case(StackDepthStrategy::RelativeToMinimal { multiplier: 1 }, 90)]
    #[case(StackDepthStrategy::Absolute { words: 2048 }, 2048)]
    fn test_stack_depth(#[case] strategy: StackDepthStrategy, #[case] expected: u32) {
        assert_eq!(strategy.resolve(&profile()).unwrap(), expected);
    }

    #[test]
    fn test_stack_depth_absolute_ignores_minimal_size() {
        let small = SchedulerProfile::new(1000, 1, 7).unwrap();
        let strategy = StackDepthStrategy::Absolute { words: 512 };
        assert_eq!(strategy.resolve(&small).unwrap(), strategy.resolve(&profile()).unwrap());
    }

    #[test]
    fn test_stack_depth_rejects_zero_and_overflow() {
        assert!(matches!(
            StackDepthStrategy::RelativeToMinimal { multiplier: 0 }.resolve(&profile()),
            Err(AgentConfigError::Zero { .. })
        ));
        assert!(matches!(
            StackDepthStrategy::Absolute { words: 0 }.resolve(&profile()),
            Err(AgentConfigError::Zero { .. })
        ));
        assert!(matches!(
            StackDepthStrategy::RelativeToMinimal { multiplier: u32::MAX }.resolve(&profile()),
            Err(AgentConfigError::OutOfRange { .. })
        ));
    }

    #[rstest]
    #[case(PriorityStrategy::RelativeToMax { difference: 3 }, 4)]
    #[case(PriorityStrategy::RelativeToMax { difference: 1 }, 6)]
    #[case(PriorityStrategy::RelativeToMax { difference: 7 }, 0)]
    #[case(PriorityStrategy::Absolute { above_idle: 0 }, 0)]
    #[case(PriorityStrategy::Absolute { above_idle: 5 }, 5)]
    #[case(PriorityStrategy::Absolute { above_idle: 6 }, 6)]
    fn test_priority(#[case] strategy: PriorityStrategy, #[case] expected: u32) {
        assert_eq!(strategy.resolve(&profile()).unwrap(), expected);
    }

    #[rstest]
    #[case(PriorityStrategy::RelativeToMax { difference: 0 })]
    #[case(PriorityStrategy::RelativeToMax { difference: 8 })]
    #[case(PriorityStrategy::Absolute { above_idle: 7 })]
    #[case(PriorityStrategy::Absolute { above_idle: u32::MAX })]
    fn test_priority_out_of_range(#[case] strategy: PriorityStrategy) {
        assert!(strategy.resolve(&profile()).is_err());
    }

    #[test]
    fn test_priority_respects_idle_priority() {
        let profile = profile().with_idle_priority(2).unwrap();
        assert_eq!(
            PriorityStrategy::Absolute { above_idle: 3 }.resolve(&profile).unwrap(),
            5
        );
        // 7 - 6 = 1 sits below the idle priority
        assert!(
            PriorityStrategy::RelativeToMax { difference: 6 }
                .resolve(&profile)
                .is_err()
        );
    }

    #[test]
    fn test_is_relative() {
        assert!(StackDepthStrategy::RelativeToMinimal { multiplier: 2 }.is_relative());
        assert!(!PriorityStrategy::Absolute { above_idle: 1 }.is_relative());
    }
}
