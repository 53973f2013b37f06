//! Error types for bytepool.

use std::time::Duration;

use thiserror::Error;

/// Convenient Result type alias.
///
/// Instead of writing `Result<T, Error>` everywhere, we can write `Result<T>`.
/// This is a common Rust pattern (see `std::io::Result`).
pub type Result<T> = std::result::Result<T, Error>;

/// All recoverable errors the pool reports.
///
/// Misuse of the pool (releasing a buffer twice, releasing a buffer that
/// came from somewhere else) is not an error value: it breaks the usage
/// contract and is only caught by debug assertions.
#[derive(Debug, Error)]
pub enum Error {
    /// A blocking acquire gave up before a buffer became available.
    ///
    /// The pool is left exactly as it was before the call.
    #[error("timed out after {waited:?} waiting for a pooled buffer")]
    Timeout {
        /// How long the caller was willing to wait.
        waited: Duration,
    },

    /// Construction parameters were rejected.
    #[error("invalid pool configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    /// True if this error came from an expired acquire deadline.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Timeout { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::Timeout {
            waited: Duration::from_millis(250),
        };
        assert_eq!(
            format!("{}", err),
            "timed out after 250ms waiting for a pooled buffer"
        );

        let err = Error::InvalidConfig("initial_buffer_size must be > 0".into());
        assert_eq!(
            format!("{}", err),
            "invalid pool configuration: initial_buffer_size must be > 0"
        );
    }

    #[test]
    fn test_is_timeout() {
        assert!(Error::Timeout {
            waited: Duration::ZERO
        }
        .is_timeout());
        assert!(!Error::InvalidConfig(String::new()).is_timeout());
    }

    #[test]
    fn test_result_type_alias() {
        fn might_fail() -> Result<u32> {
            Ok(42)
        }

        assert_eq!(might_fail().unwrap(), 42);
    }
}
