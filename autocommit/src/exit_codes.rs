//! Stable exit codes for the autocommit binary.

/// Run succeeded, including the clean-working-tree no-op.
pub const OK: i32 = 0;
/// Run failed: fatal git error, missing branch under `throw`, push failure,
/// or aggregated deferred errors.
pub const FAILED: i32 = 1;
/// Invalid inputs; no git command was attempted.
pub const CONFIG: i32 = 2;
