/*!
 * Spin Counter Lock
 * Pure busy-wait mutual exclusion on a single atomic word
 */

use crate::core::errors::LockResult;
use crate::core::sync::traits::CriticalSection;
use std::sync::atomic::{AtomicU32, Ordering};

/// Busy-wait lock built on an atomic exchange
///
/// `enter` swaps 1 into the flag until it observes a prior 0. There is no
/// pause hint and no yield: a contended `enter` burns its whole time slice.
///
/// Not reentrant. A thread calling `enter` while it already holds the lock
/// spins forever.
#[repr(C, align(64))]
#[derive(Debug, Default)]
pub struct SpinCounterLock {
    in_use: AtomicU32,
}

impl SpinCounterLock {
    pub const fn new() -> Self {
        Self {
            in_use: AtomicU32::new(0),
        }
    }

    /// Whether some thread is currently inside the section
    #[inline]
    pub fn is_locked(&self) -> bool {
        self.in_use.load(Ordering::SeqCst) == 1
    }
}

impl CriticalSection for SpinCounterLock {
    #[inline]
    fn enter(&self) -> LockResult<()> {
        while self.in_use.swap(1, Ordering::SeqCst) != 0 {}
        Ok(())
    }

    #[inline]
    fn try_enter(&self) -> LockResult<bool> {
        Ok(self.in_use.swap(1, Ordering::SeqCst) == 0)
    }

    #[inline]
    fn exit(&self) -> LockResult<()> {
        self.in_use.store(0, Ordering::SeqCst);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "spin_counter"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enter_exit() {
        let lock = SpinCounterLock::new();
        assert!(!lock.is_locked());

        lock.enter().unwrap();
        assert!(lock.is_locked());
        assert_eq!(lock.try_enter(), Ok(false));

        lock.exit().unwrap();
        assert!(!lock.is_locked());
        assert_eq!(lock.try_enter(), Ok(true));
        lock.exit().unwrap();
    }

    #[test]
    fn test_guard_exits_on_drop() {
        let lock = SpinCounterLock::new();
        {
            let _guard = lock.lock().unwrap();
            assert!(lock.is_locked());
        }
        assert!(!lock.is_locked());
    }
}
