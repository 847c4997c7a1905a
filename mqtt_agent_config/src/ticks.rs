use std::{fmt, num::NonZeroU32, time::Duration};

use serde::Serialize;

use crate::{
    constants::MILLIS_PER_SEC,
    error::{AgentConfigError, AgentConfigResult},
};

const NANOS_PER_SEC: u128 = 1_000_000_000;

/// A duration counted in scheduler ticks (a 32-bit `TickType_t`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Ticks(pub u32);

impl Ticks {
    /// Milliseconds to ticks: `ms * tick_rate_hz / 1000`, truncated.
    ///
    /// The product is taken in 128 bits, so only a result wider than the tick
    /// counter fails.
    #[inline]
    pub const fn from_millis(millis: u64, tick_rate_hz: NonZeroU32) -> Option<Ticks> {
        let ticks = millis as u128 * tick_rate_hz.get() as u128 / MILLIS_PER_SEC as u128;
        if ticks > u32::MAX as u128 {
            None
        } else {
            Some(Ticks(ticks as u32))
        }
    }

    /// Whole milliseconds of `duration`, converted like [`Ticks::from_millis`].
    #[inline]
    pub fn from_duration(duration: Duration, tick_rate_hz: NonZeroU32) -> Option<Ticks> {
        let millis = u64::try_from(duration.as_millis()).ok()?;
        Self::from_millis(millis, tick_rate_hz)
    }

    #[inline]
    pub fn to_duration(self, tick_rate_hz: NonZeroU32) -> Duration {
        let nanos = self.0 as u128 * NANOS_PER_SEC / tick_rate_hz.get() as u128;
        // u32::MAX ticks at 1 Hz is still far below u64::MAX nanoseconds
        Duration::from_nanos(nanos as u64)
    }

    #[inline]
    pub const fn get(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub(crate) fn convert(
        symbol: &'static str,
        millis: u64,
        tick_rate_hz: NonZeroU32,
    ) -> AgentConfigResult<Ticks> {
        Self::from_millis(millis, tick_rate_hz).ok_or(AgentConfigError::TickOverflow {
            symbol,
            millis,
            tick_rate_hz: tick_rate_hz.get(),
        })
    }
}

impl From<Ticks> for u32 {
    fn from(ticks: Ticks) -> Self {
        ticks.0
    }
}

impl fmt::Display for Ticks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ticks", self.0)
    }
}
