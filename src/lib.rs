//! Duplicate-record resolution engine for CRM person merges.
//!
//! The [`workflows::merge`] module holds the decision logic: address comparison,
//! applicant-side detection, merge eligibility, per-field resolution, and the
//! conflict-density advisory. Everything else in the crate is plumbing for the
//! command-line harness.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
