/*!
 * Spin-Wait Backoff
 *
 * Per-acquisition backoff state used between failed lock attempts.
 *
 * # Design: Pause Hints Only
 *
 * A spinning thread never gives up its time slice here: no `yield_now()`,
 * no sleep. The only thing that changes between strategies is how many
 * hardware pause hints are issued per attempt. Giving the CPU back is the
 * job of the blocking fallback, not of the backoff.
 */

use super::config::BackoffStrategy;
use crate::core::limits::MAX_BACKOFF_SHIFT;
use std::hint;

/// Backoff state for a single acquisition
///
/// Create one per `enter` call; it is cheap (two words) and lives on the
/// stack of the spinning thread.
#[derive(Debug, Clone)]
pub struct SpinWait {
    strategy: BackoffStrategy,
    count: u32,
}

impl SpinWait {
    #[inline]
    pub const fn new(strategy: BackoffStrategy) -> Self {
        Self { strategy, count: 0 }
    }

    /// Back off once after a failed attempt
    #[inline]
    pub fn spin_once(&mut self) {
        match self.strategy {
            BackoffStrategy::Tight => {}
            BackoffStrategy::Pause => hint::spin_loop(),
            BackoffStrategy::Exponential => {
                let shift = self.count.min(MAX_BACKOFF_SHIFT);
                for _ in 0..(1u32 << shift) {
                    hint::spin_loop();
                }
            }
        }
        self.count = self.count.saturating_add(1);
    }

    /// Number of `spin_once` calls since creation or the last reset
    #[inline]
    pub fn count(&self) -> u32 {
        self.count
    }

    #[inline]
    pub fn reset(&mut self) {
        self.count = 0;
    }

    pub fn strategy(&self) -> BackoffStrategy {
        self.strategy
    }
}

impl Default for SpinWait {
    fn default() -> Self {
        Self::new(BackoffStrategy::Exponential)
    }
}
