/*!
 * Waitlock Bench - Main Entry Point
 *
 * Timing harness that increments a shared counter inside each lock's
 * critical section and reports the elapsed time per lock:
 * - Bare increment and empty-call baselines
 * - parking_lot::Mutex as the stock reference
 * - The four waitlock primitives
 */

use anyhow::{anyhow, ensure, Context, Result};
use std::cell::UnsafeCell;
use std::hint::black_box;
use std::thread;
use std::time::Duration;
use tracing::{info, warn};

use waitlock::core::limits::{DEFAULT_BENCH_ITERATIONS, DEFAULT_BENCH_THREADS, MAX_BENCH_THREADS};
use waitlock::monitoring::RoundSpan;
use waitlock::{
    init_tracing, CountingHybridLock, CriticalSection, EventLock, LockConfig, LockResult,
    ReentrantSpinThenBlockLock, SignalStrategy, SpinCounterLock,
};

/// Counter shared between threads with no synchronization of its own
///
/// Every access happens inside a critical section of the lock under test,
/// which is exactly what the harness is measuring.
struct SharedCounter(UnsafeCell<u64>);

// SAFETY: all mutation goes through `increment`, which callers only invoke
// while holding the lock under test.
unsafe impl Sync for SharedCounter {}

impl SharedCounter {
    fn new() -> Self {
        Self(UnsafeCell::new(0))
    }

    /// # Safety
    ///
    /// The caller must have exclusive access (be inside a critical section).
    #[inline]
    unsafe fn increment(&self) {
        *self.0.get() += 1;
    }

    fn take(&mut self) -> u64 {
        std::mem::take(self.0.get_mut())
    }
}

/// Harness configuration, read from the environment
#[derive(Debug, Clone)]
struct BenchConfig {
    iterations: u64,
    threads: usize,
    lock: LockConfig,
}

impl BenchConfig {
    fn from_env() -> Result<Self> {
        let iterations = env_or("WAITLOCK_ITERATIONS", DEFAULT_BENCH_ITERATIONS)?;
        let threads: usize = env_or("WAITLOCK_THREADS", DEFAULT_BENCH_THREADS)?;
        ensure!(
            (1..=MAX_BENCH_THREADS).contains(&threads),
            "WAITLOCK_THREADS must be between 1 and {}",
            MAX_BENCH_THREADS
        );

        let mut lock = LockConfig::default();
        if let Ok(raw) = std::env::var("WAITLOCK_SPIN_BOUND") {
            lock.spin_bound = raw
                .parse()
                .with_context(|| format!("invalid WAITLOCK_SPIN_BOUND '{}'", raw))?;
        }
        if let Ok(raw) = std::env::var("WAITLOCK_SIGNAL") {
            lock.signal = raw.parse::<SignalStrategy>().map_err(|e| anyhow!(e))?;
        }

        Ok(Self {
            iterations,
            threads,
            lock,
        })
    }

    fn expected_total(&self) -> u64 {
        self.iterations * self.threads as u64
    }
}

fn env_or<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("invalid {} '{}'", key, raw)),
        Err(_) => Ok(default),
    }
}

#[inline(never)]
fn check() {}

/// Run one timed round: every thread performs `iterations` enter/inc/exit
fn run_round<L: CriticalSection>(
    lock: &L,
    config: &BenchConfig,
    counter: &mut SharedCounter,
) -> Result<Duration> {
    let round = RoundSpan::new(lock.name(), config.threads, config.iterations);
    let shared = &*counter;

    thread::scope(|s| -> Result<()> {
        let workers: Vec<_> = (0..config.threads)
            .map(|_| {
                s.spawn(move || -> LockResult<()> {
                    for _ in 0..config.iterations {
                        lock.enter()?;
                        // SAFETY: inside the critical section
                        unsafe { shared.increment() };
                        lock.exit()?;
                    }
                    Ok(())
                })
            })
            .collect();

        for worker in workers {
            worker
                .join()
                .map_err(|_| anyhow!("{} worker panicked", lock.name()))??;
        }
        Ok(())
    })?;

    let elapsed = round.finish();
    let total = counter.take();
    ensure!(
        total == config.expected_total(),
        "{} lost updates: expected {}, got {}",
        lock.name(),
        config.expected_total(),
        total
    );
    Ok(elapsed)
}

fn main() -> Result<()> {
    init_tracing();

    let config = BenchConfig::from_env()?;
    info!(
        iterations = config.iterations,
        threads = config.threads,
        spin_bound = config.lock.spin_bound,
        signal = ?config.lock.signal.select(),
        "Waitlock bench starting"
    );

    // Single-threaded baselines
    let mut x = 0u64;
    let round = RoundSpan::new("bare increment", 1, config.iterations);
    for _ in 0..config.iterations {
        x = black_box(x) + 1;
    }
    round.finish();

    let round = RoundSpan::new("Nothing", 1, config.iterations);
    for _ in 0..config.iterations {
        check();
        x = black_box(x) + 1;
        check();
    }
    round.finish();
    black_box(x);

    // Stock reference lock
    let stock = parking_lot::Mutex::new(0u64);
    let round = RoundSpan::new("stock parking_lot::Mutex", config.threads, config.iterations);
    thread::scope(|s| {
        for _ in 0..config.threads {
            s.spawn(|| {
                for _ in 0..config.iterations {
                    *stock.lock() += 1;
                }
            });
        }
    });
    round.finish();
    ensure!(*stock.lock() == config.expected_total(), "stock mutex lost updates");

    let mut counter = SharedCounter::new();

    let spin = SpinCounterLock::new();
    run_round(&spin, &config, &mut counter)?;

    let event = EventLock::with_signal(config.lock.signal);
    run_round(&event, &config, &mut counter)?;
    event.release();

    let hybrid = CountingHybridLock::with_signal(config.lock.signal);
    run_round(&hybrid, &config, &mut counter)?;
    hybrid.release();

    let reentrant = ReentrantSpinThenBlockLock::with_config(config.lock);
    run_round(&reentrant, &config, &mut counter)?;
    if !reentrant.release() {
        warn!("reentrant lock was already released");
    }

    info!("Waitlock bench finished");
    Ok(())
}
