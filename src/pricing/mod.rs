//! Premium calculator: exposure walks, factor loadings, tax stacking

mod breakdown;
mod engine;
mod exposure;
mod loan;

pub use breakdown::{PricingResult, ProductPriceBreakdown};
pub use engine::PricingEngine;
pub use loan::{annuity_payment, balance_forward, remaining_balance};
