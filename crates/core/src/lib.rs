//! Core business logic for Finaizen.
//!
//! This crate contains pure business logic with ZERO storage or runtime dependencies.
//! All domain types, schedule rules, and calculations live here.
//!
//! # Modules
//!
//! - `recurrence` - Next-occurrence computation for recurring entries
//! - `transaction` - Scheduled income/expense entries and their history records
//! - `sweep` - Repository seams and the catch-up sweep over due entries

pub mod recurrence;
pub mod sweep;
pub mod transaction;
