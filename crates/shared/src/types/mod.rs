//! Common types used across the application.

pub mod money;
pub mod pagination;

pub use pagination::{PageMeta, PageRequest, PageResponse};
