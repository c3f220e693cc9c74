//! Amortization math shared by the loan-payment check and the exposure walks
//!
//! All three helpers carry an explicit zero-rate straight-line branch; the
//! closed-form annuity expressions divide by the monthly rate.

use crate::quote::DebtProfile;

/// Theoretical amortized monthly payment for a loan or lease
///
/// Standard annuity formula with the residual discounted back over the
/// term. Zero-rate loans fall back to straight-line.
pub fn annuity_payment(annual_rate: f64, term_months: u32, principal: f64, residual: f64) -> f64 {
    let monthly_rate = annual_rate / 12.0;
    let term = term_months as f64;
    if monthly_rate == 0.0 {
        return (principal - residual) / term;
    }
    let discount = (1.0 + monthly_rate).powf(-term);
    (monthly_rate * (principal - residual * discount)) / (1.0 - discount)
}

/// Outstanding balance after `months_paid`, as the present value of the
/// remaining payments plus the discounted residual
pub fn remaining_balance(profile: &DebtProfile, months_paid: u32) -> f64 {
    let remaining = profile.term_months as i64 - months_paid as i64;
    if remaining <= 0 {
        return 0.0;
    }
    let remaining = remaining as f64;
    let r = profile.annual_rate / 12.0;
    if r == 0.0 {
        let fraction = remaining / profile.term_months as f64;
        return profile.total_debt * fraction + profile.residual_value * fraction;
    }
    let discount = (1.0 + r).powf(-remaining);
    profile.monthly_payment * (1.0 - discount) / r + profile.residual_value * discount
}

/// Outstanding balance after `months` payments, rolled forward from the
/// principal: balance grows at the monthly rate and each payment is
/// compounded forward with it
pub fn balance_forward(principal: f64, monthly_rate: f64, payment: f64, months: u32) -> f64 {
    let n = months as f64;
    if monthly_rate == 0.0 {
        return principal - payment * n;
    }
    let growth = (1.0 + monthly_rate).powf(n);
    principal * growth - payment * (growth - 1.0) / monthly_rate
}
