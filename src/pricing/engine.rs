//! Premium calculator
//!
//! Pure and deterministic: validates the input, derives the risk factor
//! loadings once, then assembles a price breakdown per requested product
//! and term. Rounding happens at fixed points because later formulas
//! consume already-rounded components (IPT is computed on the rounded
//! seller commission, for example).

use super::breakdown::{round2, PricingResult, ProductPriceBreakdown};
use super::exposure::{base_average_loss, ExposureInputs};
use super::loan::annuity_payment;
use crate::error::ValidationError;
use crate::quote::{PricingInput, GVWR_LIMIT};
use crate::rates::{ProductCode, RateTables};
use log::{debug, warn};

/// Fixed administrative loading added to every average-loss figure
const AVG_LOSS_EXPENSE_RATE: f64 = 0.004;
const AVG_LOSS_FIXED_LOAD: f64 = 250.0;

/// Relative tolerance for the caller-supplied monthly payment
const LOAN_PAYMENT_TOLERANCE: f64 = 0.10;

/// Multiplicative risk factors applied as additive loadings on the base
/// underwriting premium
#[derive(Debug, Clone)]
struct RiskFactors {
    negative_equity: f64,
    interest: f64,
    model_year: f64,
    zone: f64,
    provincial: f64,
    category: f64,
    powertrain: f64,
    horsepower: f64,
}

impl RiskFactors {
    /// Sum of `(factor - 1) * base` over all factors
    fn loadings(&self, base_premium: f64) -> f64 {
        [
            self.negative_equity,
            self.interest,
            self.model_year,
            self.zone,
            self.provincial,
            self.category,
            self.powertrain,
            self.horsepower,
        ]
        .iter()
        .map(|factor| (factor - 1.0) * base_premium)
        .sum()
    }
}

/// Main premium calculator
#[derive(Debug, Clone)]
pub struct PricingEngine {
    rates: RateTables,
}

impl PricingEngine {
    /// Create an engine over a set of rate tables
    pub fn new(rates: RateTables) -> Self {
        Self { rates }
    }

    /// Rate tables in use
    pub fn rates(&self) -> &RateTables {
        &self.rates
    }

    /// Price every requested product at every requested term
    pub fn compute_pricing(&self, input: &PricingInput) -> Result<PricingResult, ValidationError> {
        let province = self.rates.provinces.resolve_postal(&input.postal_code)?;
        let ipt_rate = province.ipt_pct / 100.0;
        let rst_rate = province.rst_pct / 100.0;

        let vehicle = &input.vehicle;
        if let Some(gvwr) = vehicle.gvwr {
            if gvwr > GVWR_LIMIT {
                return Err(ValidationError::GvwrExceedsLimit { gvwr });
            }
        }

        let vehicle_value = vehicle.combined_msrp;

        // Price-vs-valuation cross-check is disabled until an external
        // valuation provider is wired in; surface what it would have done.
        if vehicle_value > 0.0
            && (input.purchase_price - vehicle_value).abs() / vehicle_value > 0.1
        {
            warn!(
                "purchase price {:.2} deviates more than 10% from vehicle value {:.2}; \
                 valuation check disabled pending provider",
                input.purchase_price, vehicle_value
            );
        }

        let state = vehicle.state(input.odometer, input.calendar_year)?;
        let model_year_factor = vehicle.model_year_factor(state, input.calendar_year)?;

        let debt = input.purchase.debt_profile();
        let total_debt = debt.map(|d| d.total_debt).unwrap_or(0.0);
        let annual_rate = debt.map(|d| d.annual_rate).unwrap_or(0.0);

        if let Some(profile) = debt {
            let estimated = annuity_payment(
                profile.annual_rate,
                profile.term_months,
                profile.total_debt,
                profile.residual_value,
            );
            if (profile.monthly_payment - estimated).abs() / estimated > LOAN_PAYMENT_TOLERANCE {
                return Err(ValidationError::LoanPaymentMismatch {
                    supplied: profile.monthly_payment,
                    estimated,
                });
            }
        }

        let factors = RiskFactors {
            negative_equity: 1.0
                + ((total_debt / input.purchase_price).max(1.0) - 1.0).powf(1.4),
            interest: 1.0 + annual_rate.powi(2) * 20.0,
            model_year: model_year_factor,
            zone: self.rates.geographic_zone_factor(&input.postal_code),
            provincial: province.factor,
            category: self
                .rates
                .vehicle_category_factor(&vehicle.make, &vehicle.model),
            powertrain: vehicle.powertrain.factor(),
            horsepower: match vehicle.horsepower {
                Some(hp) if hp > 5_000.0 => 1.1,
                _ => 1.0,
            },
        };

        let exposure = ExposureInputs {
            vehicle_value,
            make: &vehicle.make,
            debt,
            appreciation_rate: input.value_appreciation_rate.unwrap_or(0.0),
            curve: &self.rates.depreciation,
        };

        let mut result = PricingResult::new();
        for &product in &input.products {
            for term in input.terms() {
                let base_loss = base_average_loss(product, term, &exposure)?;
                let breakdown = self.price_term(
                    product,
                    term,
                    base_loss,
                    &factors,
                    ipt_rate,
                    rst_rate,
                    input.dealership_licensed,
                );
                debug!(
                    "{product} term {term}: base loss {base_loss:.2}, retail {:.2}",
                    breakdown.retail_price_after_tax
                );
                result.insert(product, term, breakdown);
            }
        }

        Ok(result)
    }

    /// Assemble the breakdown for one product at one term
    #[allow(clippy::too_many_arguments)]
    fn price_term(
        &self,
        product: ProductCode,
        term: u32,
        base_loss: f64,
        factors: &RiskFactors,
        ipt_rate: f64,
        rst_rate: f64,
        licensed: bool,
    ) -> ProductPriceBreakdown {
        let rates = self.rates.products.get(product);

        let avg_loss = base_loss + AVG_LOSS_EXPENSE_RATE * base_loss + AVG_LOSS_FIXED_LOAD;
        let frequency = term as f64 / 12.0 * rates.annual_frequency;
        let burn_cost = avg_loss * frequency;

        let min_underwriting = self.rates.products.min_underwriting(product, term);
        let base_premium = (burn_cost / (1.0 - rates.underwriter_margin)).max(min_underwriting);

        let underwriting_premium = round2(base_premium + factors.loadings(base_premium));
        let mga_payment = round2(underwriting_premium + self.mga_adjustment());

        let seller_commission = if licensed {
            let rate = rates.commission_rate;
            let base = (underwriting_premium + mga_payment) * rate
                / (1.0 - ipt_rate)
                / (1.0 - rate / (1.0 - ipt_rate));
            round2(base + self.commission_adjustment())
        } else {
            0.0
        };

        let ipt = round2(
            (underwriting_premium + seller_commission + mga_payment) * ipt_rate / (1.0 - ipt_rate),
        );
        let insurance_premium = underwriting_premium + mga_payment + seller_commission + ipt;

        let mut referral_payment = 0.0;
        let mut dealership_referral_fee = 0.0;
        let mut dealership_referral_gst = 0.0;
        let mut dealer_group_referral_fee = 0.0;
        let mut dealer_group_referral_gst = 0.0;
        if !licensed {
            let rate = rates.referral_rate;
            let min_referral = self.rates.products.min_referral(product, term);
            let base_referral =
                (insurance_premium / (1.0 - rate) - insurance_premium).max(min_referral);

            // Split between dealership and dealer group, each with the
            // GST embedded in its share backed out for bookkeeping. The
            // split does not move the top-line referral figure.
            let gst = self.rates.products.gst_rate();
            let dealership = self.rates.products.min_dealership_referral(term);
            let dealer_group = base_referral - dealership;
            dealership_referral_fee = round2(dealership);
            dealership_referral_gst = round2(dealership - dealership / (1.0 + gst));
            dealer_group_referral_fee = round2(dealer_group);
            dealer_group_referral_gst = round2(dealer_group - dealer_group / (1.0 + gst));

            referral_payment = round2(base_referral + self.referral_adjustment());
        }

        let admin_fee = self.admin_fee();
        let retail_before_tax = insurance_premium + referral_payment + admin_fee;
        let retail_tax = retail_before_tax * rst_rate;
        let retail_price_after_tax = round2(retail_before_tax + retail_tax);

        ProductPriceBreakdown {
            underwriting_premium,
            mga_payment,
            seller_commission,
            ipt,
            insurance_premium,
            referral_payment,
            dealership_referral_fee,
            dealership_referral_gst,
            dealer_group_referral_fee,
            dealer_group_referral_gst,
            admin_fee,
            retail_before_tax,
            retail_tax,
            retail_price_after_tax,
        }
    }

    /// MGA payment adjustment hook, currently zero
    fn mga_adjustment(&self) -> f64 {
        0.0
    }

    /// Seller commission adjustment hook, currently zero
    fn commission_adjustment(&self) -> f64 {
        0.0
    }

    /// Referral payment adjustment hook, currently zero
    fn referral_adjustment(&self) -> f64 {
        0.0
    }

    /// Administration fee hook, currently zero
    fn admin_fee(&self) -> f64 {
        0.0
    }
}
