#![forbid(unsafe_code)]

//! Core domain model and business logic for the SafeDose system.
//!
//! This crate provides:
//! - Domain types (units, forms, safety limits, verdicts, history entries)
//! - Reference tables (unit conversions, per-medication safety limits)
//! - Dosage engine (conversion, quantity calculation, safety check)
//! - Persisted calculation history

pub mod types;
pub mod error;
pub mod catalog;
pub mod config;
pub mod logging;
pub mod history;
pub mod engine;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use catalog::{build_default_limits, get_default_limits, safety_limit_for};
pub use config::Config;
pub use history::HistoryStore;
pub use engine::{calculate_dosage, check_safety, convert_to_mg, DosageError};
