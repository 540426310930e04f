//! Telemetry metric name constants.
//!
//! Centralised metric names for reev operations. Consumers install their
//! own `metrics` recorder (e.g. prometheus, statsd); without a recorder
//! installed, all metric calls are no-ops.
//!
//! # Metric naming conventions
//!
//! All metrics are prefixed with `reev_`. Counters end in `_total`,
//! histograms use meaningful units (e.g. `_seconds`).
//!
//! # Common labels
//!
//! - `operation` - handler invoked: "create", "read", "update", "delete", "read_all"
//! - `status` - outcome: "ok", "unimplemented", "not_found" or "unknown"

/// Total requests handled.
///
/// Labels: `operation`, `status`.
pub const REQUESTS_TOTAL: &str = "reev_requests_total";

/// Request duration in seconds, from version check to mapped result.
///
/// Labels: `operation`.
pub const REQUEST_DURATION_SECONDS: &str = "reev_request_duration_seconds";
