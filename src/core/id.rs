/*!
 * Thread Identity
 * Opaque, comparable per-thread tokens used for lock ownership tracking
 */

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Next token to hand out (0 is reserved for "no thread")
static NEXT_TOKEN: AtomicU64 = AtomicU64::new(1);

thread_local! {
    static CURRENT: ThreadToken = ThreadToken(NEXT_TOKEN.fetch_add(1, Ordering::Relaxed));
}

/// Identity of an OS thread
///
/// Tokens are assigned lazily the first time a thread asks for one and are
/// never reused within a process. The raw value 0 is reserved for
/// [`ThreadToken::NONE`], so a token fits in a single atomic word where 0
/// means "unowned".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ThreadToken(u64);

impl ThreadToken {
    /// Sentinel for "no thread"
    pub const NONE: ThreadToken = ThreadToken(0);

    /// Token of the calling thread
    #[inline]
    pub fn current() -> Self {
        CURRENT.with(|token| *token)
    }

    /// Rebuild a token from its raw representation
    #[inline]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw representation, suitable for storing in an atomic
    #[inline]
    pub const fn as_raw(self) -> u64 {
        self.0
    }

    #[inline]
    pub const fn is_none(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for ThreadToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_none() {
            write!(f, "nobody")
        } else {
            write!(f, "thread#{}", self.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_current_is_stable() {
        let a = ThreadToken::current();
        let b = ThreadToken::current();
        assert_eq!(a, b);
        assert!(!a.is_none());
    }

    #[test]
    fn test_distinct_threads() {
        let here = ThreadToken::current();
        let there = thread::spawn(ThreadToken::current).join().unwrap();
        assert_ne!(here, there);
        assert!(!there.is_none());
    }

    #[test]
    fn test_raw_roundtrip() {
        let token = ThreadToken::current();
        assert_eq!(ThreadToken::from_raw(token.as_raw()), token);
        assert_eq!(ThreadToken::NONE.to_string(), "nobody");
    }
}
