//! Pricing validation errors
//!
//! Every variant is a genuine business-rule rejection: surfaced to the
//! caller, never retried, never recovered internally.

use crate::rates::ProductCode;
use thiserror::Error;

/// Errors raised while validating pricing inputs
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// Vehicle gross weight exceeds the underwriting limit
    #[error("vehicle GVWR {gvwr} exceeds policy limit")]
    GvwrExceedsLimit { gvwr: f64 },

    /// Model year is non-positive or otherwise unusable
    #[error("invalid model year: {model_year}")]
    InvalidModelYear { model_year: i32 },

    /// Vehicle falls outside the coverable new/used windows
    #[error("vehicle not covered: {reason}")]
    VehicleNotCovered { reason: &'static str },

    /// Supplied monthly payment disagrees with the amortized payment
    #[error("loan payment validation failed: supplied {supplied:.2}, estimated {estimated:.2}")]
    LoanPaymentMismatch { supplied: f64, estimated: f64 },

    /// Postal code first letter has no province mapping
    #[error("no province mapping for postal prefix '{prefix}'")]
    UnknownPostalPrefix { prefix: char },

    /// A debt-based product was requested on a cash purchase
    #[error("product {product} requires financing details")]
    MissingDebtProfile { product: ProductCode },

    /// Confirmation-time price disagrees with the quoted price
    #[error("price mismatch for {product} term {term}: quoted {quoted:.2}, confirmed {confirmed:.2}")]
    PriceMismatch {
        product: ProductCode,
        term: u32,
        quoted: f64,
        confirmed: f64,
    },
}
