//! ATS Pipeline Service
//!
//! Backend for an Applicant Tracking System dashboard:
//! - Canonical interview pipeline state machine
//! - Panelist eligibility and availability coupling
//! - Bulk candidate import (CSV)
//! - Per-candidate event timeline and outbound notifications

pub mod api;
pub mod pipeline;

pub use api::*;
pub use pipeline::*;
