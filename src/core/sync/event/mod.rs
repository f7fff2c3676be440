/*!
 * Auto-Reset Events
 *
 * Binary wait/signal objects with two backends:
 * - Futex-based (parking_lot_core, fastest on Linux)
 * - Condvar-based (cross-platform, reliable)
 */

mod condvar;
mod event;
mod futex;

// Re-export public API
pub use event::AutoResetEvent;

// Re-export specific backends for advanced users
pub use condvar::CondvarEvent;
pub use futex::FutexEvent;
