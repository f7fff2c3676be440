/*!
 * Core Module
 * Lock primitives, thread identity and error handling
 */

pub mod errors;
pub mod id;
pub mod limits;
pub mod sync;

// Re-export for convenience
pub use errors::*;
pub use id::ThreadToken;
