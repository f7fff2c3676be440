/*!
 * Error Types
 * Centralized lock error handling with thiserror and miette support
 */

use crate::core::id::ThreadToken;
use miette::Diagnostic;
use thiserror::Error;

/// Result type for lock operations
pub type LockResult<T> = Result<T, LockError>;

/// Lock-related errors
///
/// Every variant is a programmer error (mismatched pairing or use of a
/// disposed primitive). None of them is transient, so nothing in this crate
/// retries on them.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Diagnostic)]
pub enum LockError {
    #[error("Thread {caller} released a lock owned by {owner}")]
    #[diagnostic(
        code(lock::ownership_violation),
        help("Each exit must be called by the thread that performed the matching enter.")
    )]
    OwnershipViolation {
        /// Recorded owner at the time of the call (`ThreadToken::NONE` when unowned)
        owner: ThreadToken,
        /// Thread that attempted the release
        caller: ThreadToken,
    },

    #[error("Wait object used after release")]
    #[diagnostic(
        code(lock::use_after_release),
        help("Release a lock only after every contending thread has stopped using it.")
    )]
    UseAfterRelease,
}

impl LockError {
    /// Check if this is an ownership violation
    #[inline]
    pub fn is_ownership_violation(&self) -> bool {
        matches!(self, LockError::OwnershipViolation { .. })
    }
}
