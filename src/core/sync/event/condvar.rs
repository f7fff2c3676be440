/*!
 * Condvar-Based Auto-Reset Event
 *
 * Cross-platform fallback using parking_lot::Condvar for reliability.
 * The event state lives under the mutex; the condvar only carries wakeups.
 */

use crate::core::errors::{LockError, LockResult};
use crate::core::sync::traits::Signal;
use parking_lot::{Condvar, Mutex};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EventState {
    Unsignaled,
    Signaled,
    Released,
}

/// Auto-reset event backed by a mutex-protected flag and a condvar
#[derive(Debug)]
pub struct CondvarEvent {
    state: Mutex<EventState>,
    condvar: Condvar,
}

impl CondvarEvent {
    pub const fn new(initially_signaled: bool) -> Self {
        Self {
            state: Mutex::new(if initially_signaled {
                EventState::Signaled
            } else {
                EventState::Unsignaled
            }),
            condvar: Condvar::new(),
        }
    }
}

impl Signal for CondvarEvent {
    fn wait(&self) -> LockResult<()> {
        let mut guard = self.state.lock();
        loop {
            match *guard {
                EventState::Signaled => {
                    *guard = EventState::Unsignaled;
                    return Ok(());
                }
                EventState::Released => return Err(LockError::UseAfterRelease),
                EventState::Unsignaled => self.condvar.wait(&mut guard),
            }
        }
    }

    fn try_wait(&self) -> LockResult<bool> {
        let mut guard = self.state.lock();
        match *guard {
            EventState::Signaled => {
                *guard = EventState::Unsignaled;
                Ok(true)
            }
            EventState::Released => Err(LockError::UseAfterRelease),
            EventState::Unsignaled => Ok(false),
        }
    }

    fn set(&self) -> LockResult<()> {
        let mut guard = self.state.lock();
        match *guard {
            EventState::Released => Err(LockError::UseAfterRelease),
            EventState::Signaled => Ok(()),
            EventState::Unsignaled => {
                *guard = EventState::Signaled;
                drop(guard);
                self.condvar.notify_one();
                Ok(())
            }
        }
    }

    fn release(&self) -> bool {
        let mut guard = self.state.lock();
        if *guard == EventState::Released {
            return false;
        }
        *guard = EventState::Released;
        drop(guard);
        self.condvar.notify_all();
        true
    }

    fn is_released(&self) -> bool {
        *self.state.lock() == EventState::Released
    }

    fn name(&self) -> &'static str {
        "condvar"
    }
}
