//! Base average monthly exposure ("base average loss") per product
//!
//! Each product defines its own expected-severity walk over the policy
//! term. The walks reproduce the rating sheet exactly, including which
//! balance formula each product uses and the month ranges of the loops.

use super::loan::{annuity_payment, balance_forward, remaining_balance};
use crate::error::ValidationError;
use crate::quote::DebtProfile;
use crate::rates::{DepreciationCurve, ProductCode};

/// Everything the exposure walks read from the pricing input
pub struct ExposureInputs<'a> {
    /// Vehicle value (combined MSRP from the VIN decode)
    pub vehicle_value: f64,
    pub make: &'a str,
    pub debt: Option<&'a DebtProfile>,
    /// Annual appreciation rate for appreciating-asset coverage
    pub appreciation_rate: f64,
    pub curve: &'a DepreciationCurve,
}

impl<'a> ExposureInputs<'a> {
    fn debt(&self, product: ProductCode) -> Result<&'a DebtProfile, ValidationError> {
        self.debt
            .ok_or(ValidationError::MissingDebtProfile { product })
    }
}

/// Average monthly exposure for a product over a term
pub fn base_average_loss(
    product: ProductCode,
    term: u32,
    inputs: &ExposureInputs<'_>,
) -> Result<f64, ValidationError> {
    debug_assert!(term > 0, "policy term must be positive");
    match product {
        ProductCode::Rcp => payoff_loss(term, inputs.debt(product)?),
        ProductCode::Rce => interest_refund_loss(term, inputs.debt(product)?),
        ProductCode::Rcd => down_payment_loss(term, inputs.debt(product)?),
        ProductCode::Rcc => Ok(depreciation_loss(term, inputs, 0.0)),
        ProductCode::Rca => Ok(depreciation_loss(term, inputs, inputs.appreciation_rate)),
        ProductCode::Gtu => gap_loss(term, inputs),
        ProductCode::Rne => negative_equity_loss(term, inputs.debt(product)?),
    }
}

/// RCP: cumulative sum of monthly balance reductions, averaged over the
/// term. The inner running total makes early principal paydown count in
/// every later month.
fn payoff_loss(term: u32, debt: &DebtProfile) -> Result<f64, ValidationError> {
    let mut total_reduction = 0.0;
    let mut cumulative = 0.0;
    for n in 1..=term {
        let monthly = remaining_balance(debt, n - 1) - remaining_balance(debt, n);
        total_reduction += monthly;
        cumulative += total_reduction;
    }
    Ok(cumulative / term as f64)
}

/// RCE: straight-line approximation over the payment stream
fn interest_refund_loss(term: u32, debt: &DebtProfile) -> Result<f64, ValidationError> {
    Ok((term + 1) as f64 * debt.monthly_payment / 2.0)
}

/// RCD: straight-line over the per-month share of total debt
fn down_payment_loss(term: u32, debt: &DebtProfile) -> Result<f64, ValidationError> {
    Ok((term + 1) as f64 * (debt.total_debt / debt.term_months as f64) / 2.0)
}

/// RCC/RCA: value lost to depreciation each month, averaged over the
/// term. RCA first inflates the value by the appreciation rate.
fn depreciation_loss(term: u32, inputs: &ExposureInputs<'_>, appreciation_rate: f64) -> f64 {
    let mut total = 0.0;
    for n in 0..=term {
        let value = inputs.vehicle_value * (1.0 + appreciation_rate).powf(n as f64 / 12.0);
        total += value * (1.0 - inputs.curve.factor(inputs.make, n));
    }
    total / term as f64
}

/// GTU: shortfall of depreciated value under the outstanding loan
/// balance, floored at zero each month
fn gap_loss(term: u32, inputs: &ExposureInputs<'_>) -> Result<f64, ValidationError> {
    let debt = inputs.debt(ProductCode::Gtu)?;
    let r = debt.annual_rate / 12.0;
    let mut total = 0.0;
    for n in 0..=term {
        let balance = balance_forward(debt.total_debt, r, debt.monthly_payment, n);
        let depreciated = inputs.vehicle_value * inputs.curve.factor(inputs.make, n);
        total += (balance - depreciated).max(0.0);
    }
    Ok(total / term as f64)
}

/// RNE: the rolled-in negative equity amortized as its own sub-loan over
/// the debt term; exposure is its outstanding balance, floored at zero
fn negative_equity_loss(term: u32, debt: &DebtProfile) -> Result<f64, ValidationError> {
    let r = debt.annual_rate / 12.0;
    let sub_payment = if debt.annual_rate == 0.0 {
        debt.rolled_in_negative_equity / debt.term_months as f64
    } else {
        annuity_payment(debt.annual_rate, debt.term_months, debt.rolled_in_negative_equity, 0.0)
    };
    let mut total = 0.0;
    for n in 0..=term {
        let balance = balance_forward(debt.rolled_in_negative_equity, r, sub_payment, n);
        total += balance.max(0.0);
    }
    Ok(total / term as f64)
}
