/*!
 * Waitlock Library
 * Mutual-exclusion primitives along the spin-versus-block tradeoff curve
 */

pub mod core;
pub mod monitoring;

// Re-exports
pub use crate::core::errors::{LockError, LockResult};
pub use crate::core::id::ThreadToken;
pub use crate::core::sync::{
    AutoResetEvent, BackoffStrategy, CountingHybridLock, CriticalSection, EventLock, LockConfig,
    ReentrantSpinThenBlockLock, SectionGuard, SignalStrategy, SpinCounterLock,
};
pub use monitoring::init_tracing;
