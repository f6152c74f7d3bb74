//! Core business logic for Concilia.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `case` - Case (processo) lifecycle, types, and decision outcomes
//! - `agreement` - Agreement (acordo) value resolution and installment schedules
//! - `reports` - Dashboard aggregation over agreements, installments, and decisions

pub mod agreement;
pub mod case;
pub mod reports;
