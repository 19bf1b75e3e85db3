//! Built-in safety limit table.
//!
//! Only a fixed, hard-coded set of medications has limits; medications
//! absent from the table are unconstrained and always judged within safe
//! limits. Lookups are case-insensitive on the medication name.

use crate::types::SafetyLimit;
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Cached default limit table - built once and reused across all operations
static DEFAULT_LIMITS: Lazy<HashMap<String, SafetyLimit>> = Lazy::new(build_default_limits_internal);

/// Get a reference to the cached default limit table
pub fn get_default_limits() -> &'static HashMap<String, SafetyLimit> {
    &DEFAULT_LIMITS
}

/// Builds the default safety limit table
///
/// **Note**: For production use, prefer `get_default_limits()` which returns
/// a cached reference. This function is retained for testing.
pub fn build_default_limits() -> HashMap<String, SafetyLimit> {
    build_default_limits_internal()
}

fn build_default_limits_internal() -> HashMap<String, SafetyLimit> {
    let mut limits = HashMap::new();

    limits.insert(
        "dipirona".into(),
        SafetyLimit {
            max_dose_mg: 4000.0,
            min_dose_mg: Some(500.0),
            unit: "mg".into(),
        },
    );

    limits.insert(
        "paracetamol".into(),
        SafetyLimit {
            max_dose_mg: 4000.0,
            min_dose_mg: Some(500.0),
            unit: "mg".into(),
        },
    );

    limits.insert(
        "morfina".into(),
        SafetyLimit {
            max_dose_mg: 30.0,
            min_dose_mg: None,
            unit: "mg".into(),
        },
    );

    limits
}

/// Look up the safety limit for a medication, case-insensitively
pub fn safety_limit_for(medication: &str) -> Option<&'static SafetyLimit> {
    get_default_limits().get(medication.to_lowercase().as_str())
}
