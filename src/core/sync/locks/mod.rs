/*!
 * Mutual-Exclusion Locks
 *
 * Four points on the spin-versus-block curve:
 * - Spin counter (pure busy-wait)
 * - Event (pure blocking)
 * - Counting hybrid (blocks only when contended)
 * - Reentrant spin-then-block (bounded spin, blocking fallback, reentrancy)
 */

mod event_lock;
mod hybrid;
mod reentrant;
mod spin_counter;

// Re-export public API
pub use event_lock::EventLock;
pub use hybrid::CountingHybridLock;
pub use reentrant::ReentrantSpinThenBlockLock;
pub use spin_counter::SpinCounterLock;
