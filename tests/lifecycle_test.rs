/*!
 * Lock Lifecycle Tests
 * Hybrid handoff bursts, release idempotency and use after release
 */

use pretty_assertions::assert_eq;
use serial_test::serial;
use std::sync::Barrier;
use std::thread;
use std::time::Duration;
use waitlock::{
    AutoResetEvent, CountingHybridLock, CriticalSection, EventLock, LockError,
    ReentrantSpinThenBlockLock, SignalStrategy,
};

#[test]
#[serial]
fn test_hybrid_burst_handoff() {
    for strategy in [SignalStrategy::Futex, SignalStrategy::Condvar] {
        for k in [2, 10, 100] {
            let lock = CountingHybridLock::with_signal(strategy);
            let start = Barrier::new(k);

            thread::scope(|s| {
                for _ in 0..k {
                    s.spawn(|| {
                        start.wait();
                        lock.enter().unwrap();
                        thread::sleep(Duration::from_micros(50));
                        lock.exit().unwrap();
                    });
                }
            });

            assert_eq!(lock.waiters(), 0, "{:?} burst of {}", strategy, k);
        }
    }
}

#[test]
fn test_release_after_use_is_idempotent() {
    let event = EventLock::new();
    let hybrid = CountingHybridLock::new();
    let reentrant = ReentrantSpinThenBlockLock::new();

    thread::scope(|s| {
        for _ in 0..4 {
            s.spawn(|| {
                for _ in 0..100 {
                    event.enter().unwrap();
                    event.exit().unwrap();
                    hybrid.enter().unwrap();
                    hybrid.exit().unwrap();
                    reentrant.enter().unwrap();
                    reentrant.exit().unwrap();
                }
            });
        }
    });

    assert!(event.release());
    assert!(!event.release());
    assert!(hybrid.release());
    assert!(!hybrid.release());
    assert!(reentrant.release());
    assert!(!reentrant.release());

    assert!(event.is_released());
    assert!(hybrid.is_released());
    assert!(reentrant.is_released());
    assert_eq!(hybrid.waiters(), 0);
    assert_eq!(reentrant.waiters(), 0);
}

#[test]
fn test_use_after_release_is_detected() {
    let event = EventLock::new();
    let hybrid = CountingHybridLock::new();
    let reentrant = ReentrantSpinThenBlockLock::with_spin_bound(10);

    event.release();
    hybrid.release();
    reentrant.release();

    assert_eq!(event.enter(), Err(LockError::UseAfterRelease));
    assert_eq!(hybrid.enter(), Err(LockError::UseAfterRelease));
    assert_eq!(reentrant.enter(), Err(LockError::UseAfterRelease));
    assert_eq!(event.try_enter(), Err(LockError::UseAfterRelease));
    assert!(event.lock().is_err());
}

#[test]
#[serial]
fn test_release_wakes_blocked_waiter() {
    for strategy in [SignalStrategy::Futex, SignalStrategy::Condvar] {
        let lock = EventLock::with_signal(strategy);
        lock.enter().unwrap();

        thread::scope(|s| {
            let waiter = s.spawn(|| lock.enter());
            thread::sleep(Duration::from_millis(50));
            assert!(lock.release());
            assert_eq!(waiter.join().unwrap(), Err(LockError::UseAfterRelease));
        });
    }
}

#[test]
fn test_drop_releases_event() {
    let event = AutoResetEvent::new(true, SignalStrategy::Auto);
    event.wait().unwrap();
    drop(event);

    // Locks dropped without an explicit release must not panic either
    let hybrid = CountingHybridLock::new();
    hybrid.enter().unwrap();
    hybrid.exit().unwrap();
    drop(hybrid);
}
