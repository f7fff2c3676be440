/*!
 * Synchronization Configuration
 *
 * Runtime configuration for signal backend and spin strategy selection
 */

use crate::core::limits::{DEFAULT_SPIN_BOUND, LONG_WAIT_SPIN_BOUND, LOW_LATENCY_SPIN_BOUND};
use std::str::FromStr;

/// Backend for the auto-reset wait object
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalStrategy {
    /// Parking-lot futex emulation (direct futex syscalls on Linux)
    Futex,
    /// Mutex + condvar (cross-platform, reliable)
    Condvar,
    /// Auto-select based on platform
    Auto,
}

impl SignalStrategy {
    /// Resolve `Auto` to a concrete backend for the current platform
    pub fn select(self) -> SignalStrategy {
        match self {
            SignalStrategy::Auto => {
                // Prefer futex on Linux, condvar elsewhere
                #[cfg(target_os = "linux")]
                {
                    SignalStrategy::Futex
                }
                #[cfg(not(target_os = "linux"))]
                {
                    SignalStrategy::Condvar
                }
            }
            other => other,
        }
    }
}

impl FromStr for SignalStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "futex" => Ok(SignalStrategy::Futex),
            "condvar" => Ok(SignalStrategy::Condvar),
            "auto" => Ok(SignalStrategy::Auto),
            other => Err(format!("unknown signal strategy '{}'", other)),
        }
    }
}

/// What a spinning thread does between two acquisition attempts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackoffStrategy {
    /// Retry immediately, no hint at all
    Tight,
    /// One hardware pause hint per attempt
    Pause,
    /// Doubling bursts of pause hints, capped
    Exponential,
}

/// Lock configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockConfig {
    /// Acquisition attempts before blocking (reentrant lock only)
    pub spin_bound: u32,
    /// Backoff between spin attempts
    pub backoff: BackoffStrategy,
    /// Wait object backend
    pub signal: SignalStrategy,
}

impl Default for LockConfig {
    fn default() -> Self {
        Self {
            spin_bound: DEFAULT_SPIN_BOUND,
            backoff: BackoffStrategy::Exponential,
            signal: SignalStrategy::Auto,
        }
    }
}

impl LockConfig {
    /// Configuration for very short critical sections: spin hard, block late
    pub const fn low_latency() -> Self {
        Self {
            spin_bound: LOW_LATENCY_SPIN_BOUND,
            backoff: BackoffStrategy::Pause,
            signal: SignalStrategy::Auto,
        }
    }

    /// Configuration for long critical sections: give up spinning quickly
    pub const fn long_wait() -> Self {
        Self {
            spin_bound: LONG_WAIT_SPIN_BOUND,
            backoff: BackoffStrategy::Exponential,
            signal: SignalStrategy::Auto,
        }
    }

    /// Override the spin bound
    pub const fn with_spin_bound(mut self, spin_bound: u32) -> Self {
        self.spin_bound = spin_bound;
        self
    }

    /// Override the signal backend
    pub const fn with_signal(mut self, signal: SignalStrategy) -> Self {
        self.signal = signal;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auto_resolves() {
        let selected = SignalStrategy::Auto.select();
        assert_ne!(selected, SignalStrategy::Auto);
        assert_eq!(SignalStrategy::Condvar.select(), SignalStrategy::Condvar);
    }

    #[test]
    fn test_parse_strategy() {
        assert_eq!("futex".parse::<SignalStrategy>(), Ok(SignalStrategy::Futex));
        assert_eq!(" Condvar ".parse::<SignalStrategy>(), Ok(SignalStrategy::Condvar));
        assert!("semaphore".parse::<SignalStrategy>().is_err());
    }

    #[test]
    fn test_presets() {
        assert_eq!(LockConfig::default().spin_bound, DEFAULT_SPIN_BOUND);
        assert!(LockConfig::long_wait().spin_bound < LockConfig::low_latency().spin_bound);
        assert_eq!(LockConfig::default().with_spin_bound(10).spin_bound, 10);
    }
}
