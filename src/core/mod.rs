//! Core business logic - framework-agnostic operations over the meal report
//! domain. Each submodule owns one concern and exposes plain async functions
//! taking a connection and validated primitive inputs.

/// District, school, and authority enrollment
pub mod enroll;
/// Pairing of actual and estimate reports, discrepancy computation
pub mod reconcile;
/// Report and report item lifecycle
pub mod report;
/// District menu schedule resolution
pub mod schedule;
/// Read-side authority view projection
pub mod view;
