//! Stable exit codes for tasklist CLI commands.

/// Command succeeded.
pub const OK: i32 = 0;
/// Command failed due to invalid config/form/answers, an unknown task, or other errors.
pub const INVALID: i32 = 1;
/// The review step is closed, or the requested task cannot be started yet.
pub const CANNOT_START: i32 = 2;
