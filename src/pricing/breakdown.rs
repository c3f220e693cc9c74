//! Price breakdown output structures
//!
//! A breakdown is produced per product per term, computed fresh on every
//! call. Monetary fields are rounded to 2 decimals at the same points the
//! rating sheet rounds them; `insurance_premium` is the one unrounded
//! intermediate, carried for downstream formulas.

use crate::error::ValidationError;
use crate::rates::ProductCode;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Round to 2 decimals, half away from zero
pub(crate) fn round2(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// Full price breakdown for one product at one term
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductPriceBreakdown {
    /// Risk-based base premium after factor loadings
    pub underwriting_premium: f64,
    /// Managing-general-agent margin
    pub mga_payment: f64,
    /// Tax-grossed-up commission for licensed channels (0 otherwise)
    pub seller_commission: f64,
    /// Insurance premium tax, gross-up formula
    pub ipt: f64,
    /// underwriting + MGA + commission + IPT; intermediate, not rounded
    pub insurance_premium: f64,
    /// Referral payment for unlicensed channels (0 otherwise)
    pub referral_payment: f64,
    /// Dealership share of the referral, for bookkeeping
    pub dealership_referral_fee: f64,
    /// GST embedded in the dealership share
    pub dealership_referral_gst: f64,
    /// Dealer-group share of the referral, for bookkeeping. Computed as
    /// the referral less the dealership minimum, so it goes negative when
    /// the banded referral floor sits below the dealership share; not
    /// clamped, pending product-owner confirmation
    pub dealer_group_referral_fee: f64,
    /// GST embedded in the dealer-group share
    pub dealer_group_referral_gst: f64,
    pub admin_fee: f64,
    pub retail_before_tax: f64,
    /// Provincial retail sales tax on the retail price
    pub retail_tax: f64,
    pub retail_price_after_tax: f64,
}

impl ProductPriceBreakdown {
    /// Apply a transfer credit as an explicit post-pricing step
    ///
    /// The credit reduces the pre-tax retail price and RST is recomputed
    /// on the reduced base. This is the single place transfer credit is
    /// applied; whether it should instead land post-tax at the order
    /// layer is awaiting product-owner confirmation.
    pub fn apply_transfer_credit(&self, credit: f64, rst_rate: f64) -> Self {
        let retail_before_tax = self.retail_before_tax - credit;
        let retail_tax = retail_before_tax * rst_rate;
        Self {
            retail_before_tax,
            retail_tax,
            retail_price_after_tax: round2(retail_before_tax + retail_tax),
            ..self.clone()
        }
    }
}

/// Pricing output: product -> term -> breakdown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingResult {
    pub products: BTreeMap<ProductCode, BTreeMap<u32, ProductPriceBreakdown>>,
}

impl PricingResult {
    pub(crate) fn new() -> Self {
        Self {
            products: BTreeMap::new(),
        }
    }

    pub(crate) fn insert(&mut self, product: ProductCode, term: u32, breakdown: ProductPriceBreakdown) {
        self.products
            .entry(product)
            .or_default()
            .insert(term, breakdown);
    }

    /// Breakdown for a product at a term, if quoted
    pub fn breakdown(&self, product: ProductCode, term: u32) -> Option<&ProductPriceBreakdown> {
        self.products.get(&product).and_then(|terms| terms.get(&term))
    }

    /// Policy total at a term: retail price summed across products minus
    /// any transfer credit
    pub fn policy_total(&self, term: u32, transfer_credit: f64) -> f64 {
        let sum: f64 = self
            .products
            .values()
            .filter_map(|terms| terms.get(&term))
            .map(|b| b.retail_price_after_tax)
            .sum();
        sum - transfer_credit
    }

    /// Compare a confirmation-time pricing against this quote
    ///
    /// Retail prices must match exactly; any drift means the request was
    /// tampered with or priced against stale rates, and the operation is
    /// rejected rather than retried.
    pub fn verify_confirmation(&self, confirmed: &PricingResult) -> Result<(), ValidationError> {
        for (&product, terms) in &confirmed.products {
            for (&term, breakdown) in terms {
                let quoted = self
                    .breakdown(product, term)
                    .map(|b| b.retail_price_after_tax)
                    .unwrap_or(f64::NAN);
                if quoted != breakdown.retail_price_after_tax {
                    return Err(ValidationError::PriceMismatch {
                        product,
                        term,
                        quoted,
                        confirmed: breakdown.retail_price_after_tax,
                    });
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn breakdown(retail: f64) -> ProductPriceBreakdown {
        ProductPriceBreakdown {
            underwriting_premium: 425.0,
            mga_payment: 425.0,
            seller_commission: 0.0,
            ipt: 35.42,
            insurance_premium: 885.42,
            referral_payment: 750.0,
            dealership_referral_fee: 700.0,
            dealership_referral_gst: 33.33,
            dealer_group_referral_fee: 50.0,
            dealer_group_referral_gst: 2.38,
            admin_fee: 0.0,
            retail_before_tax: 1635.42,
            retail_tax: 0.0,
            retail_price_after_tax: retail,
        }
    }

    #[test]
    fn test_round2() {
        // 1.125 carries an exact binary half cent; rounds away from zero
        assert_eq!(round2(1.125), 1.13);
        assert_eq!(round2(-0.125), -0.13);
        // 1.005 sits just below the half cent in binary, so it rounds
        // down, same as the rating sheet's toFixed(2)
        assert_eq!(round2(1.005), 1.0);
        assert_eq!(round2(861.204), 861.20);
    }

    #[test]
    fn test_transfer_credit_recomputes_tax() {
        let b = ProductPriceBreakdown {
            retail_before_tax: 1000.0,
            retail_tax: 80.0,
            retail_price_after_tax: 1080.0,
            ..breakdown(1080.0)
        };
        let credited = b.apply_transfer_credit(200.0, 0.08);
        assert_eq!(credited.retail_before_tax, 800.0);
        assert!((credited.retail_tax - 64.0).abs() < 1e-9);
        assert_eq!(credited.retail_price_after_tax, 864.0);
        // Premium components untouched
        assert_eq!(credited.underwriting_premium, b.underwriting_premium);
    }

    #[test]
    fn test_verify_confirmation_accepts_identical() {
        let mut quote = PricingResult::new();
        quote.insert(ProductCode::Rcp, 36, breakdown(1635.42));

        let confirmed = quote.clone();
        assert!(quote.verify_confirmation(&confirmed).is_ok());
    }

    #[test]
    fn test_verify_confirmation_rejects_drift() {
        let mut quote = PricingResult::new();
        quote.insert(ProductCode::Rcp, 36, breakdown(1635.42));

        let mut confirmed = PricingResult::new();
        confirmed.insert(ProductCode::Rcp, 36, breakdown(1600.00));

        assert!(matches!(
            quote.verify_confirmation(&confirmed),
            Err(ValidationError::PriceMismatch { term: 36, .. })
        ));
    }

    #[test]
    fn test_policy_total_sums_products_minus_credit() {
        let mut result = PricingResult::new();
        result.insert(ProductCode::Rcp, 36, breakdown(1000.0));
        result.insert(ProductCode::Gtu, 36, breakdown(500.0));

        assert_eq!(result.policy_total(36, 0.0), 1500.0);
        assert_eq!(result.policy_total(36, 250.0), 1250.0);
        // Terms that were never quoted contribute nothing
        assert_eq!(result.policy_total(48, 0.0), 0.0);
    }
}
