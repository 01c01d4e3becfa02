//! Stable exit codes for inftrim CLI commands.

use crate::core::rewrite::RewriteError;
use crate::core::scanner::ScanError;

/// Command succeeded.
pub const OK: i32 = 0;
/// Command failed due to invalid arguments/config/input or other errors.
pub const INVALID: i32 = 1;
/// Input buffer uses a format the scanner refuses (mixed line endings,
/// invalid UTF-8, unterminated last line).
pub const UNSUPPORTED_FORMAT: i32 = 2;

/// Map a command error to its exit code.
pub fn for_error(err: &anyhow::Error) -> i32 {
    let unsupported = err.chain().any(|cause| {
        cause.is::<ScanError>()
            || matches!(
                cause.downcast_ref::<RewriteError>(),
                Some(RewriteError::Format(_))
            )
    });
    if unsupported {
        UNSUPPORTED_FORMAT
    } else {
        INVALID
    }
}
