//! Per-product underwriting rates and term-banded minimum tables
//!
//! Seven protection products share one rate shape: an annual claim
//! frequency, an underwriter margin, a seller-commission rate, a referral
//! rate, and term-banded minimum underwriting / referral amounts.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Protection product codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ProductCode {
    /// Pay-off protection (amortized loan-balance exposure)
    Rcp,
    /// Interest refund (straight-line payment exposure)
    Rce,
    /// Down-payment protection
    Rcd,
    /// Cash-purchase depreciation protection
    Rcc,
    /// Appreciating-asset protection
    Rca,
    /// Gap coverage (loan balance vs depreciated value)
    Gtu,
    /// Rolled-in negative equity coverage
    Rne,
}

impl ProductCode {
    /// All products, in rate-table order
    pub const ALL: [ProductCode; 7] = [
        ProductCode::Rcp,
        ProductCode::Rce,
        ProductCode::Rcd,
        ProductCode::Rcc,
        ProductCode::Rca,
        ProductCode::Gtu,
        ProductCode::Rne,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProductCode::Rcp => "RCP",
            ProductCode::Rce => "RCE",
            ProductCode::Rcd => "RCD",
            ProductCode::Rcc => "RCC",
            ProductCode::Rca => "RCA",
            ProductCode::Gtu => "GTU",
            ProductCode::Rne => "RNE",
        }
    }

    /// Whether pricing this product needs a financing profile
    pub fn requires_debt_profile(&self) -> bool {
        !matches!(self, ProductCode::Rcc | ProductCode::Rca)
    }

    /// GTU/RNE never refund outside the full-refund window
    pub fn no_refund_past_binding(&self) -> bool {
        matches!(self, ProductCode::Gtu | ProductCode::Rne)
    }
}

impl fmt::Display for ProductCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProductCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "RCP" => Ok(ProductCode::Rcp),
            "RCE" => Ok(ProductCode::Rce),
            "RCD" => Ok(ProductCode::Rcd),
            "RCC" => Ok(ProductCode::Rcc),
            "RCA" => Ok(ProductCode::Rca),
            "GTU" => Ok(ProductCode::Gtu),
            "RNE" => Ok(ProductCode::Rne),
            other => Err(format!("unknown product code: {other}")),
        }
    }
}

/// Term bands for minimum-premium tables: <=35, 36-47, 48-59, >=60 months
pub const TERM_BAND_COUNT: usize = 4;

/// Index into a 4-band minimum table for a term in months
pub fn term_band(term: u32) -> usize {
    match term {
        0..=35 => 0,
        36..=47 => 1,
        48..=59 => 2,
        _ => 3,
    }
}

/// Underwriting rates for a single product
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductRates {
    /// Annual claim frequency
    pub annual_frequency: f64,
    /// Underwriter margin retained out of gross premium
    pub underwriter_margin: f64,
    /// Seller commission rate for licensed channels
    pub commission_rate: f64,
    /// Referral payment rate for unlicensed channels
    pub referral_rate: f64,
    /// Minimum underwriting premium by term band
    pub min_underwriting: [f64; TERM_BAND_COUNT],
    /// Minimum referral payment by term band
    pub min_referral: [f64; TERM_BAND_COUNT],
}

/// Rate table covering all products
#[derive(Debug, Clone)]
pub struct ProductRateTable {
    rates: Vec<(ProductCode, ProductRates)>,
    /// Minimum dealership share of the referral payment, by term band
    min_dealership_referral: [f64; TERM_BAND_COUNT],
    /// GST rate embedded in referral fees
    gst_rate: f64,
}

impl ProductRateTable {
    /// Production rate table
    pub fn default_pricing() -> Self {
        let standard_min_uw = [50.0, 50.0, 75.0, 100.0];
        let standard_min_ref = [50.0, 50.0, 75.0, 100.0];
        let payoff_min_uw = [200.0, 200.0, 300.0, 425.0];
        let payoff_min_ref = [350.0, 450.0, 650.0, 750.0];

        let entry = |freq: f64, min_uw: [f64; 4], min_ref: [f64; 4]| ProductRates {
            annual_frequency: freq,
            underwriter_margin: 0.25,
            commission_rate: 0.35,
            referral_rate: 0.35,
            min_underwriting: min_uw,
            min_referral: min_ref,
        };

        Self {
            rates: vec![
                (ProductCode::Rcp, entry(0.005, payoff_min_uw, payoff_min_ref)),
                (ProductCode::Rce, entry(0.005, standard_min_uw, standard_min_ref)),
                (ProductCode::Rcd, entry(0.005, standard_min_uw, standard_min_ref)),
                (ProductCode::Rcc, entry(0.005, payoff_min_uw, payoff_min_ref)),
                (ProductCode::Rca, entry(0.005, standard_min_uw, standard_min_ref)),
                (ProductCode::Gtu, entry(0.006, standard_min_uw, standard_min_ref)),
                (ProductCode::Rne, entry(0.006, [50.0, 50.0, 50.0, 50.0], standard_min_ref)),
            ],
            min_dealership_referral: [300.0, 400.0, 600.0, 700.0],
            gst_rate: 0.05,
        }
    }

    /// Build from loaded CSV rates
    pub fn from_loaded(loaded: &[(ProductCode, ProductRates)]) -> Self {
        let mut table = Self::default_pricing();
        table.rates = loaded.to_vec();
        table
    }

    /// Rates for a product
    pub fn get(&self, product: ProductCode) -> &ProductRates {
        self.rates
            .iter()
            .find(|(code, _)| *code == product)
            .map(|(_, r)| r)
            // Table construction covers every code
            .unwrap_or(&self.rates[0].1)
    }

    /// Minimum underwriting premium for a product and term
    pub fn min_underwriting(&self, product: ProductCode, term: u32) -> f64 {
        self.get(product).min_underwriting[term_band(term)]
    }

    /// Minimum referral payment for a product and term
    pub fn min_referral(&self, product: ProductCode, term: u32) -> f64 {
        self.get(product).min_referral[term_band(term)]
    }

    /// Minimum dealership portion of the referral payment for a term
    pub fn min_dealership_referral(&self, term: u32) -> f64 {
        self.min_dealership_referral[term_band(term)]
    }

    /// GST rate embedded in referral fees
    pub fn gst_rate(&self) -> f64 {
        self.gst_rate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_term_bands() {
        assert_eq!(term_band(0), 0);
        assert_eq!(term_band(35), 0);
        assert_eq!(term_band(36), 1);
        assert_eq!(term_band(47), 1);
        assert_eq!(term_band(48), 2);
        assert_eq!(term_band(59), 2);
        assert_eq!(term_band(60), 3);
        assert_eq!(term_band(96), 3);
    }

    #[test]
    fn test_min_underwriting_lookup() {
        let table = ProductRateTable::default_pricing();

        assert_eq!(table.min_underwriting(ProductCode::Rcp, 36), 200.0);
        assert_eq!(table.min_underwriting(ProductCode::Rcp, 48), 300.0);
        assert_eq!(table.min_underwriting(ProductCode::Rcp, 72), 425.0);
        assert_eq!(table.min_underwriting(ProductCode::Gtu, 72), 100.0);
        // RNE minimum is flat across bands
        assert_eq!(table.min_underwriting(ProductCode::Rne, 36), 50.0);
        assert_eq!(table.min_underwriting(ProductCode::Rne, 96), 50.0);
    }

    #[test]
    fn test_min_referral_lookup() {
        let table = ProductRateTable::default_pricing();

        assert_eq!(table.min_referral(ProductCode::Rcp, 40), 450.0);
        assert_eq!(table.min_referral(ProductCode::Rcc, 60), 750.0);
        assert_eq!(table.min_referral(ProductCode::Rce, 50), 75.0);
        assert_eq!(table.min_dealership_referral(40), 400.0);
        assert_eq!(table.min_dealership_referral(96), 700.0);
    }

    #[test]
    fn test_product_code_roundtrip() {
        for code in ProductCode::ALL {
            assert_eq!(code.as_str().parse::<ProductCode>().unwrap(), code);
        }
        assert!("XYZ".parse::<ProductCode>().is_err());
    }

    #[test]
    fn test_debt_profile_requirement() {
        assert!(ProductCode::Rcp.requires_debt_profile());
        assert!(ProductCode::Gtu.requires_debt_profile());
        assert!(!ProductCode::Rcc.requires_debt_profile());
        assert!(!ProductCode::Rca.requires_debt_profile());
    }
}
