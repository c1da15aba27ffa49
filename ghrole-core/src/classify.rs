//! Classification of the two remote failures that are not failures.
//!
//! The remote API has no dedicated status for "stack not found" or "nothing
//! to update": both arrive as a `ValidationError` and can only be told apart
//! by their message. These checks match the live API wording exactly and must
//! not be loosened. Callers go through these functions only, so a structured
//! error code can replace the substring match here without touching them.

use crate::error::RemoteError;

/// Error category the remote API uses for both recoverable conditions.
pub const VALIDATION_ERROR: &str = "ValidationError";

/// Message fragment of a read against a missing stack.
pub const STACK_MISSING_FRAGMENT: &str = "does not exist";

/// Message fragment of an update that would change nothing.
pub const NO_UPDATES_FRAGMENT: &str = "No updates are to be performed";

/// The named stack does not exist.
pub fn is_stack_missing(err: &RemoteError) -> bool {
    err.category == VALIDATION_ERROR && err.message.contains(STACK_MISSING_FRAGMENT)
}

/// The submitted template and parameters match what is deployed.
pub fn is_no_op_update(err: &RemoteError) -> bool {
    err.category == VALIDATION_ERROR && err.message.contains(NO_UPDATES_FRAGMENT)
}
