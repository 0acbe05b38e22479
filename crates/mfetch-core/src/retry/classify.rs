//! Map fetch errors onto retry policy error kinds.

use crate::error::Error;
use crate::retry::policy::ErrorKind;

/// Network failures are transient unless the URI itself is the problem
/// (unknown scheme, malformed data URI). Everything else is permanent.
pub fn classify(e: &Error) -> ErrorKind {
    if e.is_retryable() {
        ErrorKind::Transient
    } else {
        ErrorKind::Permanent
    }
}
