//! Typed pricing inputs
//!
//! The surrounding service accepts loosely-shaped request bodies; by the
//! time a request reaches the engine it has been narrowed into these
//! records. Purchase method is a sum type so debt fields cannot be absent
//! on a financed deal or present on a cash one.

use crate::error::ValidationError;
use crate::rates::ProductCode;
use serde::{Deserialize, Serialize};

/// Standard quoting ladder used when no term is requested
pub const STANDARD_TERM_LADDER: [u32; 6] = [36, 48, 60, 72, 84, 96];

/// Odometer ceiling for classifying a vehicle as new
pub const NEW_VEHICLE_ODOMETER_LIMIT: u32 = 25_000;

/// GVWR underwriting ceiling
pub const GVWR_LIMIT: f64 = 5_000.0;

/// Powertrain classification from the VIN decode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Powertrain {
    Combustion,
    Hybrid,
    Electric,
}

impl Powertrain {
    /// Premium loading for the powertrain
    pub fn factor(&self) -> f64 {
        match self {
            Powertrain::Electric => 1.2,
            _ => 1.0,
        }
    }
}

/// Coverage classification of the vehicle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VehicleState {
    New,
    Used,
}

/// VIN-derived vehicle record, supplied by the caller
///
/// The VIN lookup itself is an external collaborator; the engine never
/// fetches vehicle data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VehicleRecord {
    pub make: String,
    pub model: String,
    pub trim: String,
    pub body_style: String,
    pub model_year: i32,
    /// Combined MSRP used as the vehicle value
    pub combined_msrp: f64,
    pub powertrain: Powertrain,
    pub gvwr: Option<f64>,
    pub horsepower: Option<f64>,
}

impl VehicleRecord {
    /// Classify the vehicle as new or used for the given calendar year
    pub fn state(&self, odometer: u32, calendar_year: i32) -> Result<VehicleState, ValidationError> {
        if self.model_year <= 0 {
            return Err(ValidationError::InvalidModelYear {
                model_year: self.model_year,
            });
        }
        if odometer <= NEW_VEHICLE_ODOMETER_LIMIT && self.model_year > calendar_year - 2 {
            return Ok(VehicleState::New);
        }
        if self.model_year > calendar_year - 11 {
            return Ok(VehicleState::Used);
        }
        Err(ValidationError::VehicleNotCovered {
            reason: "vehicle age outside new/used coverage windows",
        })
    }

    /// Model-year premium loading for the classified state
    pub fn model_year_factor(
        &self,
        state: VehicleState,
        calendar_year: i32,
    ) -> Result<f64, ValidationError> {
        let age = calendar_year - self.model_year;
        match state {
            VehicleState::New => match age {
                i32::MIN..=0 => Ok(1.0),
                1 => Ok(1.2),
                _ => Err(ValidationError::VehicleNotCovered {
                    reason: "new vehicle more than one model year old",
                }),
            },
            VehicleState::Used => {
                if age <= 5 {
                    Ok(1.0)
                } else {
                    Ok(1.0 + (age - 5) as f64 * 0.1)
                }
            }
        }
    }
}

/// Financing details for a financed or leased purchase
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebtProfile {
    /// Total amount financed, including any rolled-in balances
    pub total_debt: f64,
    /// Annual interest rate as a fraction (0.06 = 6%)
    pub annual_rate: f64,
    /// Financing term in months
    pub term_months: u32,
    /// Caller-supplied monthly payment, cross-checked against the annuity
    pub monthly_payment: f64,
    /// Residual value (leases; 0 for most loans)
    pub residual_value: f64,
    /// Negative equity rolled into this loan from a prior vehicle
    pub rolled_in_negative_equity: f64,
}

/// Purchase method with its financing details
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Purchase {
    Cash,
    Financed(DebtProfile),
    Leased(DebtProfile),
}

impl Purchase {
    /// Financing profile, if the purchase carries one
    pub fn debt_profile(&self) -> Option<&DebtProfile> {
        match self {
            Purchase::Cash => None,
            Purchase::Financed(profile) | Purchase::Leased(profile) => Some(profile),
        }
    }

    pub fn is_cash(&self) -> bool {
        matches!(self, Purchase::Cash)
    }
}

/// Full input to the premium calculator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingInput {
    pub postal_code: String,
    pub vehicle: VehicleRecord,
    pub odometer: u32,
    pub purchase: Purchase,
    pub purchase_price: f64,
    /// Annual appreciation rate for appreciating-asset coverage (RCA)
    pub value_appreciation_rate: Option<f64>,
    /// Products to quote
    pub products: Vec<ProductCode>,
    /// Requested term; None quotes the standard ladder
    pub term: Option<u32>,
    pub calendar_year: i32,
    /// Whether the selling dealership is a licensed insurance seller
    pub dealership_licensed: bool,
}

impl PricingInput {
    /// Terms this input quotes: the requested term or the standard ladder
    pub fn terms(&self) -> Vec<u32> {
        match self.term {
            Some(term) => vec![term],
            None => STANDARD_TERM_LADDER.to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vehicle(model_year: i32) -> VehicleRecord {
        VehicleRecord {
            make: "Toyota".to_string(),
            model: "Camry".to_string(),
            trim: "XLE".to_string(),
            body_style: "Sedan".to_string(),
            model_year,
            combined_msrp: 30_000.0,
            powertrain: Powertrain::Combustion,
            gvwr: Some(3_500.0),
            horsepower: Some(200.0),
        }
    }

    #[test]
    fn test_current_year_low_odometer_is_new() {
        let v = vehicle(2025);
        assert_eq!(v.state(1_000, 2025).unwrap(), VehicleState::New);
        assert_eq!(v.model_year_factor(VehicleState::New, 2025).unwrap(), 1.0);
    }

    #[test]
    fn test_one_year_old_high_odometer_is_used() {
        let v = vehicle(2024);
        assert_eq!(v.state(40_000, 2025).unwrap(), VehicleState::Used);
        assert_eq!(v.model_year_factor(VehicleState::Used, 2025).unwrap(), 1.0);
    }

    #[test]
    fn test_one_year_old_new_vehicle_loading() {
        let v = vehicle(2024);
        // Low odometer keeps it in the new window at a 1.2 loading
        assert_eq!(v.state(10_000, 2025).unwrap(), VehicleState::New);
        assert_eq!(v.model_year_factor(VehicleState::New, 2025).unwrap(), 1.2);
    }

    #[test]
    fn test_old_vehicle_not_covered() {
        let v = vehicle(2014);
        assert!(matches!(
            v.state(90_000, 2025),
            Err(ValidationError::VehicleNotCovered { .. })
        ));
    }

    #[test]
    fn test_used_vehicle_age_loading() {
        let v = vehicle(2017);
        // Age 8: 1 + (8-5)*0.1
        let factor = v.model_year_factor(VehicleState::Used, 2025).unwrap();
        assert!((factor - 1.3).abs() < 1e-12);
    }

    #[test]
    fn test_non_positive_model_year_rejected() {
        let v = vehicle(0);
        assert!(matches!(
            v.state(1_000, 2025),
            Err(ValidationError::InvalidModelYear { model_year: 0 })
        ));
    }

    #[test]
    fn test_term_ladder() {
        let input = PricingInput {
            postal_code: "T3H 3R3".to_string(),
            vehicle: vehicle(2025),
            odometer: 1_000,
            purchase: Purchase::Cash,
            purchase_price: 30_000.0,
            value_appreciation_rate: None,
            products: vec![ProductCode::Rcc],
            term: None,
            calendar_year: 2025,
            dealership_licensed: true,
        };
        assert_eq!(input.terms(), STANDARD_TERM_LADDER.to_vec());

        let single = PricingInput {
            term: Some(48),
            ..input
        };
        assert_eq!(single.terms(), vec![48]);
    }
}
