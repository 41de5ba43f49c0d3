//! audit-core
//!
//! Core library for classifying free-text hardware inventory descriptions
//! (processor, memory, storage strings harvested from spreadsheets) into
//! structured records, and for evaluating those records against a
//! configurable minimum-specification policy.
//!
//! The goal is to keep all substantive logic here so it is fully testable and
//! reusable from multiple frontends (CLI, web service, report writers). The
//! core performs no I/O: callers hand in rows and a rule set, and get back
//! classified records and aggregate statistics.

pub mod classify;
pub mod dataset;
pub mod model;
pub mod rules;
pub mod stats;

/// Returns the library version as encoded at compile time.
///
/// Useful for tests and for frontends to report consistent version info.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
