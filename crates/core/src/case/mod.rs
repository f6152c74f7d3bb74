//! Case (processo) lifecycle and decision outcomes.
//!
//! A case is a taxpayer's fiscal dispute tracked by the conciliation board.
//! This module defines the case type and status enums, the forward-only
//! status transition rule, and decision outcomes gating agreement creation.

pub mod types;

pub use types::{CaseStatus, CaseType, DecisionOutcome, UnsupportedCaseType};
