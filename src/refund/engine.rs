//! Refund calculator
//!
//! Prorates each fee component of a cancelled or transferred policy. The
//! first 30 days are a full-refund window; after that a triangular
//! proration factor applies, which favours late-term cancellations over
//! linear proration (earnings are front-loaded). Gap and negative-equity
//! coverage never refund past the window.

use crate::pricing::ProductPriceBreakdown;
use crate::rates::ProductCode;
use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Days after the effective date during which every component refunds in
/// full with no fee
pub const FULL_REFUND_WINDOW_DAYS: i64 = 30;

/// Flat fee for a cancellation, unless overridden
pub const DEFAULT_CANCELLATION_FEE: f64 = 100.0;

/// Flat fee for a transfer, unless overridden
pub const DEFAULT_TRANSFER_FEE: f64 = 50.0;

/// Whether the policy is being cancelled outright or transferred to a
/// replacement policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RefundOperation {
    Cancellation,
    Transfer,
}

/// Original pricing of one product on the policy being unwound
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyProductPricing {
    pub product: ProductCode,
    pub underwriting_premium: f64,
    pub mga_payment: f64,
    pub seller_commission: f64,
    pub ipt: f64,
    pub referral_payment: f64,
    pub admin_fee: f64,
    pub retail_tax: f64,
    /// Retail price after tax as originally charged
    pub retail_price: f64,
}

impl PolicyProductPricing {
    /// Capture the refundable components of a freshly priced breakdown
    pub fn from_breakdown(product: ProductCode, breakdown: &ProductPriceBreakdown) -> Self {
        Self {
            product,
            underwriting_premium: breakdown.underwriting_premium,
            mga_payment: breakdown.mga_payment,
            seller_commission: breakdown.seller_commission,
            ipt: breakdown.ipt,
            referral_payment: breakdown.referral_payment,
            admin_fee: breakdown.admin_fee,
            retail_tax: breakdown.retail_tax,
            retail_price: breakdown.retail_price_after_tax,
        }
    }
}

/// Input to the refund calculator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefundInput {
    pub policy_id: String,
    pub effective_date: NaiveDate,
    /// Policy term in months; must be positive
    pub term_months: u32,
    /// Carried for the cancellation record; the proration itself is
    /// province-independent
    pub province_code: String,
    pub operation: RefundOperation,
    pub cancellation_date: NaiveDate,
    /// When set, the referral payment is retained and not refunded
    pub minimum_retained: bool,
    pub products: Vec<PolicyProductPricing>,
    pub cancellation_fee: Option<f64>,
    pub transfer_fee: Option<f64>,
}

/// Per-product refund result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefundBreakdown {
    pub full_refund: bool,
    pub remaining_months: i64,
    pub refund_factor: f64,
    pub underwriting_refund: f64,
    pub mga_refund: f64,
    pub seller_refund: f64,
    pub ipt_refund: f64,
    pub referral_refund: f64,
    pub admin_refund: f64,
    pub retail_tax_refund: f64,
    /// Flat cancellation/transfer fee charged against the refund
    pub fee: f64,
    /// Sum of refunded components minus the fee; can be negative when
    /// the fee exceeds a small prorated refund
    pub net_refund: f64,
    pub note: Option<String>,
}

/// Triangular proration of remaining coverage value
///
/// `remaining*(remaining+1) / (term*(term+1))`: 0 with no months left,
/// exactly 1 with the whole term left.
pub fn triangular_refund_factor(remaining_months: i64, term_months: u32) -> f64 {
    let term = term_months as f64;
    (remaining_months * (remaining_months + 1)) as f64 / (term * (term + 1.0))
}

fn round2(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// Compute the refund for every product on the policy
///
/// Pure and deterministic; trusts its inputs. Callers must ensure
/// `term_months > 0` and that the cancellation date does not fall after
/// expiry (past expiry the triangular factor would turn positive again).
pub fn compute_refund(input: &RefundInput) -> BTreeMap<ProductCode, RefundBreakdown> {
    debug_assert!(input.term_months > 0, "policy term must be positive");

    let expiry = input.effective_date + Months::new(input.term_months);
    let days_since_effective = (input.cancellation_date - input.effective_date).num_days();
    let full_refund = days_since_effective <= FULL_REFUND_WINDOW_DAYS;

    // 30-day month approximation with truncation, not calendar months
    let remaining_days = (expiry - input.cancellation_date).num_days();
    debug_assert!(remaining_days >= 0, "cancellation date past policy expiry");
    let remaining_months = remaining_days / 30;
    let refund_factor = triangular_refund_factor(remaining_months, input.term_months);

    let mut results = BTreeMap::new();

    for pricing in &input.products {
        let breakdown = if full_refund {
            full_refund_breakdown(pricing, remaining_months, refund_factor)
        } else if pricing.product.no_refund_past_binding() {
            no_refund_breakdown(pricing.product, remaining_months)
        } else {
            prorated_breakdown(input, pricing, remaining_months, refund_factor)
        };
        results.insert(pricing.product, breakdown);
    }

    results
}

/// Inside the window every component comes back in full, fee waived
fn full_refund_breakdown(
    pricing: &PolicyProductPricing,
    remaining_months: i64,
    refund_factor: f64,
) -> RefundBreakdown {
    let total = pricing.underwriting_premium
        + pricing.mga_payment
        + pricing.seller_commission
        + pricing.ipt
        + pricing.referral_payment
        + pricing.admin_fee
        + pricing.retail_tax;

    RefundBreakdown {
        full_refund: true,
        remaining_months,
        refund_factor,
        underwriting_refund: round2(pricing.underwriting_premium),
        mga_refund: round2(pricing.mga_payment),
        seller_refund: round2(pricing.seller_commission),
        ipt_refund: round2(pricing.ipt),
        referral_refund: round2(pricing.referral_payment),
        admin_refund: round2(pricing.admin_fee),
        retail_tax_refund: round2(pricing.retail_tax),
        fee: 0.0,
        net_refund: round2(total),
        note: None,
    }
}

fn no_refund_breakdown(product: ProductCode, remaining_months: i64) -> RefundBreakdown {
    RefundBreakdown {
        full_refund: false,
        remaining_months,
        refund_factor: 0.0,
        underwriting_refund: 0.0,
        mga_refund: 0.0,
        seller_refund: 0.0,
        ipt_refund: 0.0,
        referral_refund: 0.0,
        admin_refund: 0.0,
        retail_tax_refund: 0.0,
        fee: 0.0,
        net_refund: 0.0,
        note: Some(format!(
            "{product} does not refund past the {FULL_REFUND_WINDOW_DAYS}-day window"
        )),
    }
}

fn prorated_breakdown(
    input: &RefundInput,
    pricing: &PolicyProductPricing,
    remaining_months: i64,
    refund_factor: f64,
) -> RefundBreakdown {
    let underwriting_refund = pricing.underwriting_premium * refund_factor;
    let mga_refund = pricing.mga_payment * refund_factor;
    let seller_refund = pricing.seller_commission * refund_factor;
    let ipt_refund = pricing.ipt * refund_factor;
    let referral_refund = if input.minimum_retained {
        0.0
    } else {
        pricing.referral_payment * refund_factor
    };

    // Retail tax refunds at the policy's original tax-to-price ratio, not
    // the proration factor. Pending business confirmation that this is a
    // provincial tax rule rather than a rating-sheet artifact.
    let retail_tax_refund_rate = if pricing.retail_price > 0.0 {
        pricing.retail_tax / pricing.retail_price
    } else {
        0.0
    };
    let retail_tax_refund = pricing.retail_tax * retail_tax_refund_rate;

    let fee = match input.operation {
        RefundOperation::Cancellation => {
            input.cancellation_fee.unwrap_or(DEFAULT_CANCELLATION_FEE)
        }
        RefundOperation::Transfer => input.transfer_fee.unwrap_or(DEFAULT_TRANSFER_FEE),
    };

    let total = underwriting_refund
        + mga_refund
        + seller_refund
        + ipt_refund
        + referral_refund
        + retail_tax_refund
        - fee;

    RefundBreakdown {
        full_refund: false,
        remaining_months,
        refund_factor,
        underwriting_refund: round2(underwriting_refund),
        mga_refund: round2(mga_refund),
        seller_refund: round2(seller_refund),
        ipt_refund: round2(ipt_refund),
        referral_refund: round2(referral_refund),
        // Admin fee is never refunded outside the window
        admin_refund: 0.0,
        retail_tax_refund: round2(retail_tax_refund),
        fee,
        net_refund: round2(total),
        note: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn pricing(product: ProductCode) -> PolicyProductPricing {
        PolicyProductPricing {
            product,
            underwriting_premium: 425.0,
            mga_payment: 425.0,
            seller_commission: 500.0,
            ipt: 56.25,
            referral_payment: 0.0,
            admin_fee: 0.0,
            retail_tax: 112.50,
            retail_price: 1518.75,
        }
    }

    fn input(cancellation_date: NaiveDate, products: Vec<PolicyProductPricing>) -> RefundInput {
        RefundInput {
            policy_id: "P-1001".to_string(),
            effective_date: date(2024, 1, 1),
            term_months: 36,
            province_code: "ON".to_string(),
            operation: RefundOperation::Cancellation,
            cancellation_date,
            minimum_retained: false,
            products,
            cancellation_fee: None,
            transfer_fee: None,
        }
    }

    #[test]
    fn test_triangular_factor_boundaries() {
        assert_eq!(triangular_refund_factor(0, 36), 0.0);
        assert!((triangular_refund_factor(36, 36) - 1.0).abs() < 1e-12);

        let mut last = -1.0;
        for remaining in 0..=36 {
            let factor = triangular_refund_factor(remaining, 36);
            assert!(factor > last);
            last = factor;
        }
    }

    #[test]
    fn test_full_refund_window() {
        let p = pricing(ProductCode::Rcp);
        let refunds = compute_refund(&input(date(2024, 1, 15), vec![p.clone()]));
        let r = &refunds[&ProductCode::Rcp];

        assert!(r.full_refund);
        assert_eq!(r.underwriting_refund, p.underwriting_premium);
        assert_eq!(r.mga_refund, p.mga_payment);
        assert_eq!(r.seller_refund, p.seller_commission);
        assert_eq!(r.ipt_refund, p.ipt);
        assert_eq!(r.retail_tax_refund, p.retail_tax);
        assert_eq!(r.fee, 0.0);
    }

    #[test]
    fn test_gap_products_full_refund_inside_window() {
        let refunds = compute_refund(&input(
            date(2024, 1, 20),
            vec![pricing(ProductCode::Gtu), pricing(ProductCode::Rne)],
        ));

        assert!(refunds[&ProductCode::Gtu].full_refund);
        assert!(refunds[&ProductCode::Gtu].net_refund > 0.0);
        assert!(refunds[&ProductCode::Rne].full_refund);
    }

    #[test]
    fn test_gap_products_no_refund_outside_window() {
        let refunds = compute_refund(&input(
            date(2025, 6, 1),
            vec![pricing(ProductCode::Gtu), pricing(ProductCode::Rne)],
        ));

        for product in [ProductCode::Gtu, ProductCode::Rne] {
            let r = &refunds[&product];
            assert!(!r.full_refund);
            assert_eq!(r.net_refund, 0.0);
            assert_eq!(r.underwriting_refund, 0.0);
            assert_eq!(r.retail_tax_refund, 0.0);
            assert!(r.note.is_some());
        }
    }

    #[test]
    fn test_prorated_refund_just_past_window() {
        // Cancelled 31 days in: 1065 of 1096 days remain, 35 whole
        // 30-day months
        let refunds = compute_refund(&input(date(2024, 2, 1), vec![pricing(ProductCode::Rcp)]));
        let r = &refunds[&ProductCode::Rcp];

        assert!(!r.full_refund);
        assert_eq!(r.remaining_months, 35);
        let expected = 35.0 * 36.0 / (36.0 * 37.0);
        assert!((r.refund_factor - expected).abs() < 1e-12);
        assert!(r.refund_factor < 1.0);
        assert_eq!(r.fee, DEFAULT_CANCELLATION_FEE);
    }

    #[test]
    fn test_prorated_components_scale_by_factor() {
        let p = pricing(ProductCode::Rcp);
        let refunds = compute_refund(&input(date(2025, 1, 1), vec![p.clone()]));
        let r = &refunds[&ProductCode::Rcp];

        let f = r.refund_factor;
        assert!((r.underwriting_refund - round2(p.underwriting_premium * f)).abs() < 1e-9);
        assert!((r.mga_refund - round2(p.mga_payment * f)).abs() < 1e-9);
        assert!((r.ipt_refund - round2(p.ipt * f)).abs() < 1e-9);
        // Admin fee is never refunded here
        assert_eq!(r.admin_refund, 0.0);
    }

    #[test]
    fn test_retail_tax_refunds_at_original_ratio() {
        // 112.50 tax on a 1518.75 policy: the refund uses the original
        // tax-to-price ratio, independent of the proration factor
        let p = pricing(ProductCode::Rcp);
        let refunds = compute_refund(&input(date(2025, 1, 1), vec![p.clone()]));
        let r = &refunds[&ProductCode::Rcp];

        let expected = round2(p.retail_tax * (p.retail_tax / p.retail_price));
        assert_eq!(r.retail_tax_refund, expected);
    }

    #[test]
    fn test_minimum_retained_suppresses_referral() {
        let mut p = pricing(ProductCode::Rcp);
        p.seller_commission = 0.0;
        p.referral_payment = 750.0;

        let mut i = input(date(2025, 1, 1), vec![p]);
        i.minimum_retained = true;

        let refunds = compute_refund(&i);
        assert_eq!(refunds[&ProductCode::Rcp].referral_refund, 0.0);
    }

    #[test]
    fn test_transfer_fee_default() {
        let mut i = input(date(2025, 1, 1), vec![pricing(ProductCode::Rcp)]);
        i.operation = RefundOperation::Transfer;

        let refunds = compute_refund(&i);
        assert_eq!(refunds[&ProductCode::Rcp].fee, DEFAULT_TRANSFER_FEE);
    }

    #[test]
    fn test_fee_override() {
        let mut i = input(date(2025, 1, 1), vec![pricing(ProductCode::Rcp)]);
        i.cancellation_fee = Some(250.0);

        let refunds = compute_refund(&i);
        assert_eq!(refunds[&ProductCode::Rcp].fee, 250.0);
    }

    #[test]
    #[should_panic(expected = "cancellation date past policy expiry")]
    fn test_cancellation_past_expiry_is_a_contract_violation() {
        // Expiry is 2027-01-01; unwinding after that is a caller bug
        compute_refund(&input(date(2027, 6, 1), vec![pricing(ProductCode::Rcp)]));
    }

    #[test]
    fn test_net_refund_can_go_negative() {
        // Near expiry the prorated refund is tiny and the flat fee wins
        let refunds = compute_refund(&input(date(2026, 12, 1), vec![pricing(ProductCode::Rcp)]));
        let r = &refunds[&ProductCode::Rcp];

        assert!(!r.full_refund);
        assert!(r.net_refund < 0.0);
    }
}
