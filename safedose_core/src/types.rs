//! Core domain types for the SafeDose system.
//!
//! This module defines the fundamental types used throughout the system:
//! - Dose units and their milligram multipliers
//! - Pharmaceutical form families
//! - Safety limits and verdicts
//! - Calculation output and history entries

use serde::{Deserialize, Serialize};

// ============================================================================
// Unit Types
// ============================================================================

/// A recognized dose unit symbol
///
/// Every unit carries a scalar multiplier expressing it in milligrams.
/// Unrecognized symbols are deliberately NOT an error: the conversion
/// contract treats them as already-milligram-equivalent (multiplier 1).
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DoseUnit {
    Grams,
    Milligrams,
    Micrograms,
    Milliliters,
    InternationalUnits,
}

impl DoseUnit {
    /// Parse a unit symbol, case-insensitively
    ///
    /// Returns `None` for unrecognized symbols; callers that need the
    /// pass-through contract should use [`crate::engine::convert_to_mg`].
    pub fn parse(symbol: &str) -> Option<Self> {
        match symbol.to_lowercase().as_str() {
            "g" => Some(DoseUnit::Grams),
            "mg" => Some(DoseUnit::Milligrams),
            "mcg" => Some(DoseUnit::Micrograms),
            "ml" => Some(DoseUnit::Milliliters),
            "ui" => Some(DoseUnit::InternationalUnits),
            _ => None,
        }
    }

    /// Multiplier converting one of this unit into milligrams
    pub fn mg_multiplier(&self) -> f64 {
        match self {
            DoseUnit::Grams => 1000.0,
            DoseUnit::Milligrams => 1.0,
            DoseUnit::Micrograms => 0.001,
            DoseUnit::Milliliters => 1.0,
            DoseUnit::InternationalUnits => 1.0,
        }
    }
}

// ============================================================================
// Pharmaceutical Form Types
// ============================================================================

/// Presentation family of a pharmaceutical form
///
/// Discrete forms are counted (tablets, capsules); liquid forms are
/// measured in milliliters. Forms outside both families are rejected by
/// the engine.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FormFamily {
    Discrete,
    Liquid,
}

impl FormFamily {
    /// Classify a pharmaceutical form string, case-insensitively
    ///
    /// Accepts both the English names and the Portuguese names the legacy
    /// data uses. Returns `None` for anything outside the two families.
    pub fn classify(form: &str) -> Option<Self> {
        match form.to_lowercase().as_str() {
            "tablet" | "capsule" | "comprimido" | "capsula" | "cápsula" => {
                Some(FormFamily::Discrete)
            }
            "liquid" | "injection" | "solution" | "líquido" | "injeção" | "solução" => {
                Some(FormFamily::Liquid)
            }
            _ => None,
        }
    }
}

// ============================================================================
// Safety Types
// ============================================================================

/// Per-medication safety bounds, in milligrams
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SafetyLimit {
    pub max_dose_mg: f64,
    pub min_dose_mg: Option<f64>,
    /// Display unit cited in warning messages
    pub unit: String,
}

/// Severity of a safety verdict
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Warning,
    Success,
}

/// Outcome of a safety check for one calculation
#[derive(Clone, Debug, PartialEq)]
pub struct SafetyVerdict {
    pub message: String,
    pub severity: Severity,
}

// ============================================================================
// Calculation Output
// ============================================================================

/// Successful output of the dosage engine
///
/// `quantity` keeps full floating precision; the two-decimal rounding in
/// `message` is presentation-only. `prescribed_mg` is carried so the caller
/// can run the safety check without re-deriving the conversion.
#[derive(Clone, Debug, PartialEq)]
pub struct Calculation {
    pub message: String,
    pub quantity: f64,
    pub prescribed_mg: f64,
}

// ============================================================================
// History Types
// ============================================================================

/// A persisted calculation record
///
/// Field names on the wire match the legacy JSON document so existing
/// history files load unchanged. Entries are never mutated in place.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct HistoryEntry {
    pub id: i64,
    #[serde(rename = "medicamento")]
    pub medication: String,
    #[serde(rename = "prescricaoValor")]
    pub prescribed_value: f64,
    #[serde(rename = "prescricaoUnidade")]
    pub prescribed_unit: String,
    #[serde(rename = "disponivelValor")]
    pub available_value: f64,
    #[serde(rename = "disponivelUnidade")]
    pub available_unit: String,
    #[serde(rename = "forma")]
    pub form: String,
    #[serde(rename = "resultado")]
    pub result: String,
    #[serde(rename = "alerta")]
    pub alert: String,
}

/// Fields for a new history entry; the store assigns the id
#[derive(Clone, Debug)]
pub struct NewEntry {
    pub medication: String,
    pub prescribed_value: f64,
    pub prescribed_unit: String,
    pub available_value: f64,
    pub available_unit: String,
    pub form: String,
    pub result: String,
    pub alert: String,
}
