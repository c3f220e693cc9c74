//! Vehicle depreciation curve by make and month of age
//!
//! Factors are retained-value fractions: month 0 is 1.0 (purchase),
//! later months give the share of original value the vehicle keeps.
//! Makes without their own curve fall back to the default column.

use std::collections::HashMap;

/// Number of months covered by the built-in curves (0..=120)
pub const CURVE_MONTHS: usize = 121;

/// Monthly retained-value curve keyed by vehicle make
#[derive(Debug, Clone)]
pub struct DepreciationCurve {
    /// Default retained-value factors indexed by month of age
    default_curve: Vec<f64>,
    /// Per-make overrides
    by_make: HashMap<String, Vec<f64>>,
}

impl DepreciationCurve {
    /// Built-in curves calibrated to auction retained-value data
    pub fn default_pricing() -> Self {
        let mut by_make = HashMap::new();
        // Strong-retention makes
        by_make.insert("Toyota".to_string(), generate_curve(0.88, 0.92));
        by_make.insert("Honda".to_string(), generate_curve(0.87, 0.915));
        by_make.insert("Subaru".to_string(), generate_curve(0.86, 0.91));
        // Fast-depreciating luxury makes
        by_make.insert("BMW".to_string(), generate_curve(0.80, 0.87));
        by_make.insert("Mercedes-Benz".to_string(), generate_curve(0.80, 0.875));
        by_make.insert("Audi".to_string(), generate_curve(0.81, 0.875));

        Self {
            default_curve: generate_curve(0.84, 0.90),
            by_make,
        }
    }

    /// Build from loaded CSV columns (make -> monthly factors)
    pub fn from_loaded(default_curve: Vec<f64>, by_make: HashMap<String, Vec<f64>>) -> Self {
        Self {
            default_curve,
            by_make,
        }
    }

    /// Retained-value factor for a make at a month of age
    ///
    /// Months past the end of the curve are treated as fully depreciated,
    /// matching the rating sheet's missing-row behaviour.
    pub fn factor(&self, make: &str, month: u32) -> f64 {
        let curve = self.by_make.get(make).unwrap_or(&self.default_curve);
        curve.get(month as usize).copied().unwrap_or(0.0)
    }

    /// Number of months the default curve covers
    pub fn months(&self) -> usize {
        self.default_curve.len()
    }
}

/// Generate a monthly retained-value curve from a first-month retention
/// (drive-off depreciation) and an annual retention ratio thereafter.
pub fn generate_curve(initial_retention: f64, annual_retention: f64) -> Vec<f64> {
    let mut curve = Vec::with_capacity(CURVE_MONTHS);
    curve.push(1.0);
    for month in 1..CURVE_MONTHS {
        let years_elapsed = (month - 1) as f64 / 12.0;
        curve.push(initial_retention * annual_retention.powf(years_elapsed));
    }
    curve
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_zero_is_full_value() {
        let curve = DepreciationCurve::default_pricing();
        assert_eq!(curve.factor("Toyota", 0), 1.0);
        assert_eq!(curve.factor("Chevrolet", 0), 1.0);
    }

    #[test]
    fn test_curve_monotone_decreasing() {
        let curve = DepreciationCurve::default_pricing();
        for month in 1..CURVE_MONTHS as u32 {
            assert!(
                curve.factor("Chevrolet", month) <= curve.factor("Chevrolet", month - 1),
                "curve rose at month {month}"
            );
        }
    }

    #[test]
    fn test_make_overrides() {
        let curve = DepreciationCurve::default_pricing();
        // Toyota retains more than the default at 36 months; BMW less
        let default_36 = curve.factor("Chevrolet", 36);
        assert!(curve.factor("Toyota", 36) > default_36);
        assert!(curve.factor("BMW", 36) < default_36);
    }

    #[test]
    fn test_past_curve_end_fully_depreciated() {
        let curve = DepreciationCurve::default_pricing();
        assert_eq!(curve.factor("Toyota", 500), 0.0);
    }

    #[test]
    fn test_drive_off_drop() {
        let curve = DepreciationCurve::default_pricing();
        // Immediate drive-off depreciation between month 0 and month 1
        assert!(curve.factor("Chevrolet", 1) < 0.9);
        assert!(curve.factor("Chevrolet", 1) > 0.7);
    }
}
