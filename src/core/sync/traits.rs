/*!
 * Synchronization Traits
 *
 * Core abstractions shared by every lock in this crate:
 * - `Signal`: binary auto-reset wait object
 * - `CriticalSection`: the enter/exit contract plus an RAII guard
 */

use crate::core::errors::LockResult;
use std::fmt;
use tracing::error;

/// Binary auto-reset wait object
///
/// Implementations must be:
/// - **Thread-safe**: Safe to call from multiple threads
/// - **Binary**: `set` on a signaled object leaves it signaled (no counting)
/// - **Auto-reset**: each `set` lets at most one `wait` through
///
/// Once released, every operation fails with `UseAfterRelease` and any
/// thread blocked in `wait` is woken with that error.
pub trait Signal: Send + Sync {
    /// Block until signaled, then atomically consume the signal
    fn wait(&self) -> LockResult<()>;

    /// Consume the signal if it is currently set, without blocking
    ///
    /// Returns `true` if the signal was consumed
    fn try_wait(&self) -> LockResult<bool>;

    /// Make the object signaled, waking at most one waiter
    fn set(&self) -> LockResult<()>;

    /// Release the object
    ///
    /// Returns `true` only for the call that actually performed the release
    fn release(&self) -> bool;

    fn is_released(&self) -> bool;

    /// Backend name for debugging
    fn name(&self) -> &'static str;
}

/// Mutual-exclusion contract shared by all locks
///
/// `enter` does not return until the calling thread owns the section;
/// `exit` gives it back. Calls must be paired; only the reentrant lock
/// validates the pairing.
pub trait CriticalSection: Send + Sync {
    /// Acquire exclusive access, blocking or spinning as needed
    fn enter(&self) -> LockResult<()>;

    /// Acquire exclusive access only if it is immediately available
    ///
    /// Returns `true` if the section was entered
    fn try_enter(&self) -> LockResult<bool>;

    /// Release exclusive access
    fn exit(&self) -> LockResult<()>;

    /// Lock name for logging and benchmark reports
    fn name(&self) -> &'static str;

    /// Enter and return a guard that exits on drop
    fn lock(&self) -> LockResult<SectionGuard<'_, Self>>
    where
        Self: Sized,
    {
        self.enter()?;
        Ok(SectionGuard {
            lock: self,
            active: true,
        })
    }
}

/// RAII guard for a critical section
///
/// Dropping the guard calls `exit`. Errors during drop are logged, not
/// propagated; call [`SectionGuard::unlock`] to observe them.
#[must_use = "if unused the critical section is exited immediately"]
pub struct SectionGuard<'a, L: CriticalSection> {
    lock: &'a L,
    active: bool,
}

impl<'a, L: CriticalSection> SectionGuard<'a, L> {
    /// Exit explicitly and report the result
    pub fn unlock(mut self) -> LockResult<()> {
        self.active = false;
        self.lock.exit()
    }
}

impl<'a, L: CriticalSection> Drop for SectionGuard<'a, L> {
    fn drop(&mut self) {
        if !self.active {
            return;
        }
        if let Err(e) = self.lock.exit() {
            error!(lock = self.lock.name(), error = %e, "failed to exit critical section on drop");
        }
    }
}

impl<'a, L: CriticalSection> fmt::Debug for SectionGuard<'a, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SectionGuard")
            .field("lock", &self.lock.name())
            .field("active", &self.active)
            .finish()
    }
}
