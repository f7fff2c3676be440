/*!
 * Lock Limits and Constants
 *
 * Centralized location for spin budgets, backoff caps and harness defaults.
 *
 * ## Conventions
 * - Performance-critical constants are marked with [PERF]
 * - Values that mirror the classic hybrid-lock design are marked with [COMPAT]
 */

// =============================================================================
// SPINNING
// =============================================================================

/// Default spin budget before the reentrant lock falls back to blocking
/// [COMPAT] Same bound as the textbook "timed hybrid" lock
/// [PERF] Roughly a few microseconds of spinning on current hardware
pub const DEFAULT_SPIN_BOUND: u32 = 4000;

/// Spin budget used by the low-latency preset
pub const LOW_LATENCY_SPIN_BOUND: u32 = 20_000;

/// Spin budget used by the long-wait preset
/// Blocks almost immediately when the lock is busy
pub const LONG_WAIT_SPIN_BOUND: u32 = 10;

/// Cap on the exponent used by exponential backoff (2^6 = 64 pause hints)
/// [PERF] Past this point a single spin_once costs more than a short park
pub const MAX_BACKOFF_SHIFT: u32 = 6;

// =============================================================================
// HARNESS
// =============================================================================

/// Default iteration count for the timing harness
pub const DEFAULT_BENCH_ITERATIONS: u64 = 5_000_000;

/// Default number of contending threads for the timing harness
pub const DEFAULT_BENCH_THREADS: usize = 1;

/// Upper bound on harness threads
/// Prevents accidental fork-bomb style runs from a typo in the environment
pub const MAX_BENCH_THREADS: usize = 1024;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spin_bounds_ordering() {
        assert!(LONG_WAIT_SPIN_BOUND < DEFAULT_SPIN_BOUND);
        assert!(DEFAULT_SPIN_BOUND < LOW_LATENCY_SPIN_BOUND);
    }

    #[test]
    fn test_backoff_cap_fits() {
        // 1 << MAX_BACKOFF_SHIFT must not overflow a u32
        assert!(MAX_BACKOFF_SHIFT < 32);
        assert!(DEFAULT_BENCH_THREADS <= MAX_BENCH_THREADS);
    }
}
