//! Dosage engine: unit conversion, quantity calculation, safety check.
//!
//! Pure computation, no side effects. Failures are ordinary return values
//! (a closed enum the caller can match exhaustively), never panics.

use crate::catalog::safety_limit_for;
use crate::types::{Calculation, DoseUnit, FormFamily, SafetyVerdict, Severity};

/// A calculation failure, reported as a value rather than a fault
///
/// `Unexpected` is the escape hatch for conditions outside the declared
/// failure kinds (e.g. a non-finite quantity from degenerate inputs), so
/// the rendering layer never needs an unhandled-fault path.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DosageError {
    #[error("Error: available concentration must be greater than zero.")]
    InvalidConcentration,

    #[error("Error: pharmaceutical form \"{0}\" is not recognized.")]
    UnrecognizedForm(String),

    #[error("Error in calculation: {0}")]
    Unexpected(String),
}

/// Convert a dose value to milligrams
///
/// The unit symbol is looked up case-insensitively. Unrecognized symbols
/// multiply by 1 (treated as already-milligram-equivalent) - a defined
/// fallback, not an error. There is no failure path.
pub fn convert_to_mg(value: f64, unit: &str) -> f64 {
    let multiplier = DoseUnit::parse(unit)
        .map(|u| u.mg_multiplier())
        .unwrap_or(1.0);
    value * multiplier
}

/// Compute the quantity to administer for a prescription
///
/// Converts the prescribed dose to milligrams, divides by the available
/// concentration, and renders a message per the pharmaceutical form family:
/// discrete forms report a count of that form, liquid forms report
/// milliliters, both rounded to 2 decimals for display only. The returned
/// quantity and prescribed-mg keep full precision; the latter feeds
/// [`check_safety`].
pub fn calculate_dosage(
    prescribed_value: f64,
    prescribed_unit: &str,
    available_value: f64,
    form: &str,
    medication: &str,
) -> Result<Calculation, DosageError> {
    let prescribed_mg = convert_to_mg(prescribed_value, prescribed_unit);

    if available_value <= 0.0 {
        return Err(DosageError::InvalidConcentration);
    }

    let quantity = prescribed_mg / available_value;

    if !quantity.is_finite() {
        return Err(DosageError::Unexpected(format!(
            "quantity is not a finite number ({} mg / {})",
            prescribed_mg, available_value
        )));
    }

    let message = match FormFamily::classify(form) {
        Some(FormFamily::Discrete) => {
            format!("Administer {:.2} {}(s) of {}", quantity, form, medication)
        }
        Some(FormFamily::Liquid) => {
            format!("Administer {:.2} ml of {}", quantity, medication)
        }
        None => return Err(DosageError::UnrecognizedForm(form.to_string())),
    };

    tracing::debug!(
        "Calculated {} -> {} mg / {} = {}",
        medication,
        prescribed_mg,
        available_value,
        quantity
    );

    Ok(Calculation {
        message,
        quantity,
        prescribed_mg,
    })
}

/// Check a prescribed dose (in mg) against the medication's safety limits
///
/// Medications absent from the limit table are unconstrained. The maximum
/// check runs first and short-circuits the minimum check; the ordering is a
/// contract. At-max is not over-max (strict comparison). Below-minimum
/// shares the warning severity with over-maximum.
pub fn check_safety(prescribed_mg: f64, medication: &str) -> SafetyVerdict {
    if let Some(limit) = safety_limit_for(medication) {
        if prescribed_mg > limit.max_dose_mg {
            tracing::info!(
                "Dose {} mg of {} exceeds maximum {} {}",
                prescribed_mg,
                medication,
                limit.max_dose_mg,
                limit.unit
            );
            return SafetyVerdict {
                message: format!(
                    "ALERT: the prescribed dose exceeds the safe limit of {} {}.",
                    limit.max_dose_mg, limit.unit
                ),
                severity: Severity::Warning,
            };
        }

        if let Some(min) = limit.min_dose_mg {
            if prescribed_mg < min {
                tracing::info!(
                    "Dose {} mg of {} is below minimum {} {}",
                    prescribed_mg,
                    medication,
                    min,
                    limit.unit
                );
                return SafetyVerdict {
                    message: format!(
                        "WARNING: the prescribed dose is below the minimum limit of {} {}.",
                        min, limit.unit
                    ),
                    severity: Severity::Warning,
                };
            }
        }
    }

    SafetyVerdict {
        message: "Dose is within safe limits.".into(),
        severity: Severity::Success,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversion_multipliers() {
        assert_eq!(convert_to_mg(1.0, "g"), 1000.0);
        assert_eq!(convert_to_mg(1.0, "mg"), 1.0);
        assert_eq!(convert_to_mg(1.0, "mcg"), 0.001);
        assert_eq!(convert_to_mg(1.0, "ml"), 1.0);
        assert_eq!(convert_to_mg(1.0, "ui"), 1.0);
    }

    #[test]
    fn test_conversion_case_insensitive() {
        assert_eq!(convert_to_mg(2.0, "G"), 2000.0);
        assert_eq!(convert_to_mg(2.0, "Mcg"), 0.002);
    }

    #[test]
    fn test_unknown_unit_passes_through() {
        assert_eq!(convert_to_mg(7.5, "drops"), 7.5);
        assert_eq!(convert_to_mg(7.5, ""), 7.5);
    }

    #[test]
    fn test_zero_concentration_rejected() {
        let result = calculate_dosage(500.0, "mg", 0.0, "comprimido", "dipirona");
        assert_eq!(result, Err(DosageError::InvalidConcentration));
    }

    #[test]
    fn test_negative_concentration_rejected() {
        let result = calculate_dosage(500.0, "mg", -10.0, "tablet", "dipirona");
        assert_eq!(result, Err(DosageError::InvalidConcentration));
    }

    #[test]
    fn test_unrecognized_form_rejected() {
        let result = calculate_dosage(500.0, "mg", 250.0, "patch", "dipirona");
        assert_eq!(result, Err(DosageError::UnrecognizedForm("patch".into())));
    }

    #[test]
    fn test_discrete_form_quantity_exact() {
        let calc = calculate_dosage(500.0, "mg", 250.0, "comprimido", "dipirona").unwrap();
        assert_eq!(calc.quantity, 2.0);
        assert_eq!(calc.prescribed_mg, 500.0);
        assert_eq!(calc.message, "Administer 2.00 comprimido(s) of dipirona");
    }

    #[test]
    fn test_discrete_quantity_keeps_full_precision() {
        // 1 g / 300 mg/tablet - message rounds, quantity doesn't
        let calc = calculate_dosage(1.0, "g", 300.0, "tablet", "paracetamol").unwrap();
        assert_eq!(calc.quantity, 1000.0 / 300.0);
        assert!(calc.message.contains("3.33 tablet(s)"));
    }

    #[test]
    fn test_liquid_form_reports_ml() {
        let calc = calculate_dosage(500.0, "mg", 50.0, "solução", "dipirona").unwrap();
        assert_eq!(calc.message, "Administer 10.00 ml of dipirona");
    }

    #[test]
    fn test_gram_prescription_converted_before_division() {
        let calc = calculate_dosage(1.0, "g", 500.0, "capsula", "paracetamol").unwrap();
        assert_eq!(calc.prescribed_mg, 1000.0);
        assert_eq!(calc.quantity, 2.0);
    }

    #[test]
    fn test_safety_at_max_is_safe() {
        let verdict = check_safety(4000.0, "dipirona");
        assert_eq!(verdict.severity, Severity::Success);
    }

    #[test]
    fn test_safety_over_max_warns_with_threshold() {
        let verdict = check_safety(4001.0, "dipirona");
        assert_eq!(verdict.severity, Severity::Warning);
        assert!(verdict.message.contains("4000 mg"));
    }

    #[test]
    fn test_safety_below_min_warns_with_threshold() {
        let verdict = check_safety(499.0, "paracetamol");
        assert_eq!(verdict.severity, Severity::Warning);
        assert!(verdict.message.contains("500 mg"));
    }

    #[test]
    fn test_safety_unknown_medication_unconstrained() {
        let verdict = check_safety(1000.0, "unknown-drug");
        assert_eq!(verdict.severity, Severity::Success);
        assert_eq!(verdict.message, "Dose is within safe limits.");
    }

    #[test]
    fn test_safety_lookup_case_insensitive() {
        let verdict = check_safety(31.0, "Morfina");
        assert_eq!(verdict.severity, Severity::Warning);
        assert!(verdict.message.contains("30 mg"));
    }

    #[test]
    fn test_safety_no_min_check_without_min() {
        // morfina has no minimum - a tiny dose is still within limits
        let verdict = check_safety(0.5, "morfina");
        assert_eq!(verdict.severity, Severity::Success);
    }
}
