//! Payroll engine for a small hospitality business.
//!
//! This crate computes per-employee pay from shift counts, a shared bar
//! revenue pool, corkage fees, penalties and bar debts, and keeps a history
//! of saved payroll runs with per-employee and per-period summaries.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod format;
pub mod models;
pub mod storage;
pub mod workspace;
