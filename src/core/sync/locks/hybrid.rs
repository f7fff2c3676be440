/*!
 * Counting Hybrid Lock
 *
 * Blocks only under contention. The uncontended path is one atomic
 * increment on enter and one atomic decrement on exit; the wait object is
 * touched only when a second thread shows up.
 *
 * # Protocol
 *
 * `waiters` counts threads between the start of `enter` and the end of the
 * matching `exit`:
 * - enter: `fetch_add`; a result of 1 means the lock was free
 * - exit: `fetch_sub`; a non-zero remainder means someone is blocked (or
 *   about to block), so hand the section over with exactly one `set`
 *
 * The event is binary, but at most one `set` is ever pending: only the
 * thread inside the section calls `exit`, and it got there either through
 * the fast path or by consuming the previous `set`.
 *
 * The top bit of `waiters` marks the lock as released, so the fast path
 * detects use after release without an extra load.
 */

use crate::core::errors::{LockError, LockResult};
use crate::core::sync::config::SignalStrategy;
use crate::core::sync::event::AutoResetEvent;
use crate::core::sync::traits::CriticalSection;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::trace;

/// Set in `waiters` once the wait object has been released
pub(crate) const RELEASED_BIT: usize = 1 << (usize::BITS - 1);

/// Lock that never spins and blocks only when contended
///
/// Not reentrant.
#[repr(C, align(64))]
#[derive(Debug)]
pub struct CountingHybridLock {
    waiters: AtomicUsize,
    signal: AutoResetEvent,
}

impl CountingHybridLock {
    pub fn new() -> Self {
        Self::with_signal(SignalStrategy::Auto)
    }

    /// Create with a specific wait object backend
    pub fn with_signal(strategy: SignalStrategy) -> Self {
        Self {
            waiters: AtomicUsize::new(0),
            signal: AutoResetEvent::new(false, strategy),
        }
    }

    /// Threads currently between `enter` and the end of `exit`
    #[inline]
    pub fn waiters(&self) -> usize {
        self.waiters.load(Ordering::SeqCst) & !RELEASED_BIT
    }

    /// Release the underlying wait object
    ///
    /// Call only once every contending thread is done with the lock.
    /// Returns `true` for the call that performed the release.
    pub fn release(&self) -> bool {
        self.waiters.fetch_or(RELEASED_BIT, Ordering::SeqCst);
        self.signal.release()
    }

    pub fn is_released(&self) -> bool {
        self.signal.is_released()
    }
}

impl Default for CountingHybridLock {
    fn default() -> Self {
        Self::new()
    }
}

impl CriticalSection for CountingHybridLock {
    #[inline]
    fn enter(&self) -> LockResult<()> {
        let prev = self.waiters.fetch_add(1, Ordering::SeqCst);
        if prev == 0 {
            return Ok(());
        }
        if prev & RELEASED_BIT != 0 {
            self.waiters.fetch_sub(1, Ordering::SeqCst);
            return Err(LockError::UseAfterRelease);
        }
        trace!(claimants = prev + 1, "hybrid lock contended, blocking");
        self.signal.wait()
    }

    #[inline]
    fn try_enter(&self) -> LockResult<bool> {
        match self
            .waiters
            .compare_exchange(0, 1, Ordering::SeqCst, Ordering::SeqCst)
        {
            Ok(_) => Ok(true),
            Err(current) if current & RELEASED_BIT != 0 => Err(LockError::UseAfterRelease),
            Err(_) => Ok(false),
        }
    }

    #[inline]
    fn exit(&self) -> LockResult<()> {
        let prev = self.waiters.fetch_sub(1, Ordering::SeqCst);
        if prev == 1 {
            return Ok(());
        }
        if prev & RELEASED_BIT != 0 {
            self.waiters.fetch_add(1, Ordering::SeqCst);
            return Err(LockError::UseAfterRelease);
        }
        self.signal.set()
    }

    fn name(&self) -> &'static str {
        "counting_hybrid"
    }
}
