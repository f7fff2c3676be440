/*!
 * Reentrant Spin-Then-Block Lock
 *
 * Bounded spinning followed by the counting-hybrid blocking protocol, with
 * single-owner reentrancy.
 *
 * # State Machine
 *
 * - `Unowned` -> `Owned(t, 1)`: CAS `waiters` 0 -> 1 within the spin budget,
 *   or, once the budget is spent, `fetch_add` plus a wait on the event
 * - `Owned(t, k)` -> `Owned(t, k + 1)`: `enter` by `t`, no atomics on `waiters`
 * - `Owned(t, k)` -> `Owned(t, k - 1)`: `exit` by `t` with k > 1
 * - `Owned(t, 1)` -> `Unowned`: `exit` by `t`; clear the owner, then
 *   `fetch_sub` and hand over with one `set` if anyone is queued
 *
 * `exit` by any other thread is an `OwnershipViolation` and changes nothing.
 *
 * `owner` and `recursion` are only written by the thread holding the lock.
 * They are atomics so that a non-owner can read them without a data race;
 * a non-owner can never observe its own token there.
 */

use super::hybrid::RELEASED_BIT;
use crate::core::errors::{LockError, LockResult};
use crate::core::id::ThreadToken;
use crate::core::sync::config::{BackoffStrategy, LockConfig};
use crate::core::sync::event::AutoResetEvent;
use crate::core::sync::spinwait::SpinWait;
use crate::core::sync::traits::CriticalSection;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use tracing::trace;

/// Reentrant lock that spins for a bounded number of attempts, then blocks
///
/// # Examples
///
/// ```
/// use waitlock::core::sync::{CriticalSection, ReentrantSpinThenBlockLock};
///
/// let lock = ReentrantSpinThenBlockLock::new();
/// lock.enter().unwrap();
/// lock.enter().unwrap(); // nested, same thread
/// assert_eq!(lock.recursion_depth(), 2);
/// lock.exit().unwrap();
/// lock.exit().unwrap();
/// assert!(lock.owner().is_none());
/// ```
#[repr(C, align(64))]
#[derive(Debug)]
pub struct ReentrantSpinThenBlockLock {
    waiters: AtomicUsize,
    owner: AtomicU64,
    recursion: AtomicUsize,
    spin_bound: u32,
    backoff: BackoffStrategy,
    signal: AutoResetEvent,
}

impl ReentrantSpinThenBlockLock {
    pub fn new() -> Self {
        Self::with_config(LockConfig::default())
    }

    pub fn with_config(config: LockConfig) -> Self {
        Self {
            waiters: AtomicUsize::new(0),
            owner: AtomicU64::new(ThreadToken::NONE.as_raw()),
            recursion: AtomicUsize::new(0),
            spin_bound: config.spin_bound,
            backoff: config.backoff,
            signal: AutoResetEvent::new(false, config.signal),
        }
    }

    /// Default configuration with a custom spin budget
    pub fn with_spin_bound(spin_bound: u32) -> Self {
        Self::with_config(LockConfig::default().with_spin_bound(spin_bound))
    }

    /// Current owner, `ThreadToken::NONE` when unowned
    #[inline]
    pub fn owner(&self) -> ThreadToken {
        ThreadToken::from_raw(self.owner.load(Ordering::SeqCst))
    }

    /// Nesting depth of the current owner (0 when unowned)
    #[inline]
    pub fn recursion_depth(&self) -> usize {
        self.recursion.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn is_owned_by_current_thread(&self) -> bool {
        self.owner() == ThreadToken::current()
    }

    pub fn spin_bound(&self) -> u32 {
        self.spin_bound
    }

    /// Threads holding or queued for the lock
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

    #[inline]
    fn claim(&self, me: ThreadToken) {
        self.owner.store(me.as_raw(), Ordering::SeqCst);
        self.recursion.store(1, Ordering::Relaxed);
    }

    /// Bump the nesting depth if the caller already owns the lock
    #[inline]
    fn reenter(&self, me: ThreadToken) -> bool {
        if self.owner.load(Ordering::SeqCst) != me.as_raw() {
            return false;
        }
        self.recursion.fetch_add(1, Ordering::Relaxed);
        true
    }

    /// One CAS attempt on `waiters` (0 -> 1)
    #[inline]
    fn try_claim(&self, me: ThreadToken) -> LockResult<bool> {
        match self
            .waiters
            .compare_exchange(0, 1, Ordering::SeqCst, Ordering::SeqCst)
        {
            Ok(_) => {
                self.claim(me);
                Ok(true)
            }
            Err(current) if current & RELEASED_BIT != 0 => Err(LockError::UseAfterRelease),
            Err(_) => Ok(false),
        }
    }
}

impl Default for ReentrantSpinThenBlockLock {
    fn default() -> Self {
        Self::new()
    }
}

impl CriticalSection for ReentrantSpinThenBlockLock {
    fn enter(&self) -> LockResult<()> {
        let me = ThreadToken::current();
        if self.reenter(me) {
            return Ok(());
        }

        let mut spin = SpinWait::new(self.backoff);
        for _ in 0..self.spin_bound {
            if self.try_claim(me)? {
                return Ok(());
            }
            spin.spin_once();
        }

        // Spin budget spent: queue up like the counting hybrid lock
        let prev = self.waiters.fetch_add(1, Ordering::SeqCst);
        if prev & RELEASED_BIT != 0 {
            self.waiters.fetch_sub(1, Ordering::SeqCst);
            return Err(LockError::UseAfterRelease);
        }
        if prev > 0 {
            trace!(
                spins = spin.count(),
                claimants = prev + 1,
                "spin budget exhausted, blocking"
            );
            self.signal.wait()?;
        }

        self.claim(me);
        Ok(())
    }

    fn try_enter(&self) -> LockResult<bool> {
        let me = ThreadToken::current();
        if self.reenter(me) {
            return Ok(true);
        }
        self.try_claim(me)
    }

    fn exit(&self) -> LockResult<()> {
        let me = ThreadToken::current();
        let owner = self.owner.load(Ordering::SeqCst);
        if owner != me.as_raw() {
            return Err(LockError::OwnershipViolation {
                owner: ThreadToken::from_raw(owner),
                caller: me,
            });
        }

        if self.recursion.fetch_sub(1, Ordering::Relaxed) > 1 {
            return Ok(());
        }

        self.owner.store(ThreadToken::NONE.as_raw(), Ordering::SeqCst);

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
        "reentrant_spin_then_block"
    }
}
