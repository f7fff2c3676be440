/*!
 * Event Lock
 * Pure blocking mutual exclusion on an auto-reset event
 */

use crate::core::errors::LockResult;
use crate::core::sync::config::SignalStrategy;
use crate::core::sync::event::AutoResetEvent;
use crate::core::sync::traits::CriticalSection;

/// Lock that blocks on every acquisition
///
/// The event starts signaled ("available"). `enter` waits on it and consumes
/// the signal, `exit` sets it again. Every acquisition goes through the wait
/// object, contended or not.
///
/// Not reentrant.
#[repr(C, align(64))]
#[derive(Debug)]
pub struct EventLock {
    available: AutoResetEvent,
}

impl EventLock {
    pub fn new() -> Self {
        Self::with_signal(SignalStrategy::Auto)
    }

    /// Create with a specific wait object backend
    pub fn with_signal(strategy: SignalStrategy) -> Self {
        Self {
            available: AutoResetEvent::new(true, strategy),
        }
    }

    /// Release the underlying wait object
    ///
    /// Call only once every contending thread is done with the lock.
    /// Returns `true` for the call that performed the release.
    pub fn release(&self) -> bool {
        self.available.release()
    }

    pub fn is_released(&self) -> bool {
        self.available.is_released()
    }
}

impl Default for EventLock {
    fn default() -> Self {
        Self::new()
    }
}

impl CriticalSection for EventLock {
    #[inline]
    fn enter(&self) -> LockResult<()> {
        self.available.wait()
    }

    #[inline]
    fn try_enter(&self) -> LockResult<bool> {
        self.available.try_wait()
    }

    #[inline]
    fn exit(&self) -> LockResult<()> {
        self.available.set()
    }

    fn name(&self) -> &'static str {
        "event"
    }
}
