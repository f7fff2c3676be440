/*!
 * Synchronization Primitives
 *
 * Mutual-exclusion locks built from atomics and auto-reset wait objects,
 * each trading spinning against blocking differently:
 * - `SpinCounterLock`: atomic exchange, never blocks
 * - `EventLock`: every acquisition goes through the wait object
 * - `CountingHybridLock`: atomic counter fast path, blocks on contention
 * - `ReentrantSpinThenBlockLock`: bounded spin, then blocks; reentrant
 *
 * # Architecture
 *
 * All locks implement `CriticalSection` (`enter`/`exit`/`try_enter`, plus an
 * RAII guard). Blocking locks share one `AutoResetEvent` abstraction with
 * futex and condvar backends, selected through `LockConfig`.
 *
 * # Performance
 *
 * - Enum dispatch for the event backend (no vtable on hot paths)
 * - Uncontended hybrid paths are a single atomic RMW each way
 * - Lock structs are cache-line aligned to prevent false sharing
 */

mod config;
mod event;
mod locks;
mod spinwait;
mod traits;

pub use config::{BackoffStrategy, LockConfig, SignalStrategy};
pub use event::AutoResetEvent;
pub use locks::{CountingHybridLock, EventLock, ReentrantSpinThenBlockLock, SpinCounterLock};
pub use spinwait::SpinWait;
pub use traits::{CriticalSection, SectionGuard, Signal};

// Re-export specific backends for advanced users
pub use event::{CondvarEvent, FutexEvent};
