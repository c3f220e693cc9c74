//! Premium Engine - Risk-based pricing and refund proration for vehicle protection products
//!
//! This library provides:
//! - Per-product premium breakdowns across a standard term ladder
//! - Amortization, depreciation, and gap exposure modeling
//! - Provincial tax stacking (IPT gross-up, RST, GST referral splits)
//! - Cancellation and transfer refund proration
//! - Batch quoting over pre-loaded rate tables

pub mod error;
pub mod rates;
pub mod quote;
pub mod pricing;
pub mod refund;
pub mod session;

// Re-export commonly used types
pub use error::ValidationError;
pub use pricing::{PricingEngine, PricingResult, ProductPriceBreakdown};
pub use quote::{DebtProfile, PricingInput, Purchase, VehicleRecord};
pub use rates::{ProductCode, RateTables};
pub use refund::{compute_refund, RefundBreakdown, RefundInput};
pub use session::QuoteSession;
