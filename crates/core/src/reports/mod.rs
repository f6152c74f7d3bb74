//! Dashboard aggregation over agreements, installments, and decisions.
//!
//! The engine is pure: repositories fan out the reads, assemble snapshot
//! structs, and delegate here. Grouping happens in memory because value
//! resolution branches on the case type, which the query layer cannot
//! express declaratively.

pub mod error;
pub mod service;
pub mod types;

#[cfg(test)]
mod tests;

pub use error::ReportError;
pub use service::DashboardService;
pub use types::*;
