//! Standard exit codes (BSD sysexits.h compatible)
//!
//! ruletree exits with `USAGE` for argument errors, `NOINPUT` for unknown
//! records, `DATAERR` for validation and tree-integrity failures, `IOERR` for
//! record store failures, `CONFIG` for bad settings and `SOFTWARE` otherwise.

/// Successful termination
pub const OK: i32 = 0;

/// Command line usage error
pub const USAGE: i32 = 64;

/// Data format error
pub const DATAERR: i32 = 65;

/// Cannot open input
pub const NOINPUT: i32 = 66;

/// Internal software error
pub const SOFTWARE: i32 = 70;

/// Input/output error
pub const IOERR: i32 = 74;

/// Configuration error
pub const CONFIG: i32 = 78;
