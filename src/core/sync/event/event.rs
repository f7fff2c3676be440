/*!
 * Auto-Reset Event
 *
 * Binary wait object shared by all blocking locks. Selects a backend from
 * `SignalStrategy` at construction time.
 *
 * # Design: Enum Dispatch
 *
 * Backends are held in an enum rather than `Box<dyn Signal>`, so the lock
 * hot paths stay monomorphic and inline through the dispatch.
 */

use super::condvar::CondvarEvent;
use super::futex::FutexEvent;
use crate::core::errors::LockResult;
use crate::core::sync::config::SignalStrategy;
use crate::core::sync::traits::Signal;
use tracing::{debug, warn};

/// Event backend (enum dispatch)
#[derive(Debug)]
enum EventImpl {
    Futex(FutexEvent),
    Condvar(CondvarEvent),
}

impl EventImpl {
    #[inline(always)]
    fn as_signal(&self) -> &dyn Signal {
        match self {
            Self::Futex(e) => e,
            Self::Condvar(e) => e,
        }
    }
}

/// Auto-reset event with explicit, idempotent release
///
/// The event is released exactly once: either through [`release`] or on
/// drop, whichever happens first. Every use after that fails with
/// `UseAfterRelease`.
///
/// # Examples
///
/// ```
/// use waitlock::core::sync::{AutoResetEvent, SignalStrategy};
///
/// let event = AutoResetEvent::new(false, SignalStrategy::Auto);
/// event.set().unwrap();
/// event.wait().unwrap();
/// assert!(!event.try_wait().unwrap());
/// ```
///
/// [`release`]: AutoResetEvent::release
#[derive(Debug)]
pub struct AutoResetEvent {
    inner: EventImpl,
}

impl AutoResetEvent {
    /// Create an event with the given initial state and backend
    pub fn new(initially_signaled: bool, strategy: SignalStrategy) -> Self {
        let inner = match strategy.select() {
            SignalStrategy::Condvar => EventImpl::Condvar(CondvarEvent::new(initially_signaled)),
            _ => EventImpl::Futex(FutexEvent::new(initially_signaled)),
        };
        Self { inner }
    }

    #[inline]
    pub fn wait(&self) -> LockResult<()> {
        match &self.inner {
            EventImpl::Futex(e) => e.wait(),
            EventImpl::Condvar(e) => e.wait(),
        }
        .inspect_err(|_| warn!(backend = self.name(), "wait on released event"))
    }

    #[inline]
    pub fn try_wait(&self) -> LockResult<bool> {
        match &self.inner {
            EventImpl::Futex(e) => e.try_wait(),
            EventImpl::Condvar(e) => e.try_wait(),
        }
    }

    #[inline]
    pub fn set(&self) -> LockResult<()> {
        match &self.inner {
            EventImpl::Futex(e) => e.set(),
            EventImpl::Condvar(e) => e.set(),
        }
        .inspect_err(|_| warn!(backend = self.name(), "set on released event"))
    }

    /// Release the event, waking any blocked waiter with `UseAfterRelease`
    ///
    /// Returns `true` only for the call that performed the release.
    pub fn release(&self) -> bool {
        let released = self.inner.as_signal().release();
        if released {
            debug!(backend = self.name(), "event released");
        }
        released
    }

    pub fn is_released(&self) -> bool {
        self.inner.as_signal().is_released()
    }

    pub fn name(&self) -> &'static str {
        self.inner.as_signal().name()
    }
}

impl Signal for AutoResetEvent {
    fn wait(&self) -> LockResult<()> {
        AutoResetEvent::wait(self)
    }

    fn try_wait(&self) -> LockResult<bool> {
        AutoResetEvent::try_wait(self)
    }

    fn set(&self) -> LockResult<()> {
        AutoResetEvent::set(self)
    }

    fn release(&self) -> bool {
        AutoResetEvent::release(self)
    }

    fn is_released(&self) -> bool {
        AutoResetEvent::is_released(self)
    }

    fn name(&self) -> &'static str {
        AutoResetEvent::name(self)
    }
}

impl Drop for AutoResetEvent {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::errors::LockError;

    #[test]
    fn test_backend_selection() {
        let event = AutoResetEvent::new(false, SignalStrategy::Condvar);
        assert_eq!(event.name(), "condvar");

        let event = AutoResetEvent::new(false, SignalStrategy::Futex);
        assert_eq!(event.name(), "futex");
    }

    #[test]
    fn test_release_is_idempotent() {
        for strategy in [SignalStrategy::Futex, SignalStrategy::Condvar] {
            let event = AutoResetEvent::new(true, strategy);
            assert!(event.release());
            assert!(!event.release());
            assert!(event.is_released());
            assert_eq!(event.set(), Err(LockError::UseAfterRelease));
        }
    }
}
