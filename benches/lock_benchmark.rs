/*!
 * Lock Benchmarks
 *
 * Compare uncontended and contended cost of the four locks, plus the
 * futex and condvar event backends.
 */

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;
use waitlock::{
    CountingHybridLock, CriticalSection, EventLock, LockConfig, ReentrantSpinThenBlockLock,
    SignalStrategy, SpinCounterLock,
};

fn bench_uncontended<L: CriticalSection>(c: &mut Criterion, lock: &L) {
    c.bench_function(&format!("uncontended/{}", lock.name()), |b| {
        b.iter(|| {
            lock.enter().unwrap();
            black_box(());
            lock.exit().unwrap();
        });
    });
}

fn bench_uncontended_all(c: &mut Criterion) {
    bench_uncontended(c, &SpinCounterLock::new());
    bench_uncontended(c, &EventLock::new());
    bench_uncontended(c, &CountingHybridLock::new());
    bench_uncontended(c, &ReentrantSpinThenBlockLock::new());
}

fn bench_event_backends(c: &mut Criterion) {
    let mut group = c.benchmark_group("event_lock_backend");

    for strategy in [SignalStrategy::Futex, SignalStrategy::Condvar] {
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{:?}", strategy)),
            &strategy,
            |b, &strategy| {
                let lock = EventLock::with_signal(strategy);
                b.iter(|| {
                    lock.enter().unwrap();
                    lock.exit().unwrap();
                });
            },
        );
    }

    group.finish();
}

/// Each of `threads` workers performs 1000 paired enter/exit calls
fn contended_round<L: CriticalSection>(lock: &L, threads: usize, counter: &AtomicU64) {
    thread::scope(|s| {
        for _ in 0..threads {
            s.spawn(|| {
                for _ in 0..1000 {
                    lock.enter().unwrap();
                    counter.fetch_add(1, Ordering::Relaxed);
                    lock.exit().unwrap();
                }
            });
        }
    });
}

fn bench_contended(c: &mut Criterion) {
    let mut group = c.benchmark_group("contended");
    group.sample_size(20);

    for threads in [2, 4, 8] {
        let counter = AtomicU64::new(0);

        let spin = SpinCounterLock::new();
        group.bench_with_input(BenchmarkId::new("spin_counter", threads), &threads, |b, &n| {
            b.iter(|| contended_round(&spin, n, &counter));
        });

        let hybrid = CountingHybridLock::new();
        group.bench_with_input(BenchmarkId::new("counting_hybrid", threads), &threads, |b, &n| {
            b.iter(|| contended_round(&hybrid, n, &counter));
        });

        for spin_bound in [10, 4000] {
            let lock =
                ReentrantSpinThenBlockLock::with_config(LockConfig::default().with_spin_bound(spin_bound));
            group.bench_with_input(
                BenchmarkId::new(format!("reentrant_spin_{}", spin_bound), threads),
                &threads,
                |b, &n| {
                    b.iter(|| contended_round(&lock, n, &counter));
                },
            );
        }
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_uncontended_all,
    bench_event_backends,
    bench_contended
);
criterion_main!(benches);
