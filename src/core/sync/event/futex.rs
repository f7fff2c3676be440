/*!
 * Futex-Based Auto-Reset Event
 *
 * Uses parking_lot_core for futex-like operations on all platforms.
 * On Linux, this maps directly to futex syscalls for minimal overhead.
 *
 * # Design
 *
 * The whole event is one state word. Waiters park on the address of that
 * word and re-validate it under the parking-lot bucket lock, so a `set`
 * racing with a thread about to park is never lost:
 * - Consume: CAS `SIGNALED -> UNSIGNALED`
 * - Set: CAS `UNSIGNALED -> SIGNALED`, then unpark one
 * - Release: swap to `RELEASED`, then unpark all
 */

use crate::core::errors::{LockError, LockResult};
use crate::core::sync::traits::Signal;
use parking_lot_core::{park, unpark_all, unpark_one, DEFAULT_PARK_TOKEN, DEFAULT_UNPARK_TOKEN};
use std::sync::atomic::{AtomicU8, Ordering};

const UNSIGNALED: u8 = 0;
const SIGNALED: u8 = 1;
const RELEASED: u8 = 2;

/// Auto-reset event backed by parking-lot thread parking
#[derive(Debug)]
pub struct FutexEvent {
    state: AtomicU8,
}

impl FutexEvent {
    pub const fn new(initially_signaled: bool) -> Self {
        Self {
            state: AtomicU8::new(if initially_signaled {
                SIGNALED
            } else {
                UNSIGNALED
            }),
        }
    }

    /// Stable parking address (same in wait and wake paths)
    #[inline]
    fn key(&self) -> usize {
        &self.state as *const AtomicU8 as usize
    }
}

impl Signal for FutexEvent {
    fn wait(&self) -> LockResult<()> {
        loop {
            match self
                .state
                .compare_exchange(SIGNALED, UNSIGNALED, Ordering::SeqCst, Ordering::SeqCst)
            {
                Ok(_) => return Ok(()),
                Err(RELEASED) => return Err(LockError::UseAfterRelease),
                Err(_) => {}
            }

            // SAFETY: the key is the address of our own state word, which
            // outlives this call. The callbacks neither panic nor call back
            // into parking_lot.
            unsafe {
                park(
                    self.key(),
                    || self.state.load(Ordering::SeqCst) == UNSIGNALED,
                    || {},
                    |_, _| {},
                    DEFAULT_PARK_TOKEN,
                    None,
                );
            }
            // Woken, invalid or spurious: re-check the state either way
        }
    }

    fn try_wait(&self) -> LockResult<bool> {
        match self
            .state
            .compare_exchange(SIGNALED, UNSIGNALED, Ordering::SeqCst, Ordering::SeqCst)
        {
            Ok(_) => Ok(true),
            Err(RELEASED) => Err(LockError::UseAfterRelease),
            Err(_) => Ok(false),
        }
    }

    fn set(&self) -> LockResult<()> {
        match self
            .state
            .compare_exchange(UNSIGNALED, SIGNALED, Ordering::SeqCst, Ordering::SeqCst)
        {
            Ok(_) => {
                // SAFETY: same key as the park above; the callback is trivial.
                unsafe {
                    unpark_one(self.key(), |_| DEFAULT_UNPARK_TOKEN);
                }
                Ok(())
            }
            // Already signaled: binary event, nothing to add
            Err(SIGNALED) => Ok(()),
            Err(_) => Err(LockError::UseAfterRelease),
        }
    }

    fn release(&self) -> bool {
        if self.state.swap(RELEASED, Ordering::SeqCst) == RELEASED {
            return false;
        }
        // SAFETY: same key as the park above.
        unsafe {
            unpark_all(self.key(), DEFAULT_UNPARK_TOKEN);
        }
        true
    }

    fn is_released(&self) -> bool {
        self.state.load(Ordering::SeqCst) == RELEASED
    }

    fn name(&self) -> &'static str {
        "futex"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_futex_set_wakes_waiter() {
        let event = Arc::new(FutexEvent::new(false));
        let event_clone = event.clone();

        let handle = thread::spawn(move || event_clone.wait());

        // Give thread time to park
        thread::sleep(Duration::from_millis(50));
        event.set().unwrap();

        assert!(handle.join().unwrap().is_ok());
        // Auto-reset: the waiter consumed the signal
        assert_eq!(event.try_wait(), Ok(false));
    }

    #[test]
    fn test_futex_binary() {
        let event = FutexEvent::new(false);
        event.set().unwrap();
        event.set().unwrap();
        assert_eq!(event.try_wait(), Ok(true));
        assert_eq!(event.try_wait(), Ok(false));
    }

    #[test]
    fn test_futex_release_wakes_waiter() {
        let event = Arc::new(FutexEvent::new(false));
        let event_clone = event.clone();

        let handle = thread::spawn(move || event_clone.wait());
        thread::sleep(Duration::from_millis(50));

        assert!(event.release());
        assert!(!event.release());
        assert_eq!(handle.join().unwrap(), Err(LockError::UseAfterRelease));
        assert_eq!(event.set(), Err(LockError::UseAfterRelease));
    }
}
