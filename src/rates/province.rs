//! Provincial tax rates and postal-prefix resolution
//!
//! IPT and RST rates are stored as percentages, the way the regulator
//! publishes them; callers divide by 100 at the point of use.

use crate::error::ValidationError;
use serde::{Deserialize, Serialize};

/// Tax and loading profile for one province or territory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Province {
    pub name: String,
    pub code: String,
    /// Provincial premium loading factor (1.0 = neutral)
    pub factor: f64,
    /// Insurance Premium Tax, percent
    pub ipt_pct: f64,
    /// Retail Sales Tax, percent
    pub rst_pct: f64,
}

/// Province table with postal-prefix lookup
#[derive(Debug, Clone)]
pub struct ProvinceTable {
    provinces: Vec<Province>,
    /// (postal first letter, province code)
    prefixes: Vec<(char, &'static str)>,
}

impl ProvinceTable {
    /// Production tax rates for all provinces and territories
    pub fn default_pricing() -> Self {
        let p = |name: &str, code: &str, factor: f64, ipt: f64, rst: f64| Province {
            name: name.to_string(),
            code: code.to_string(),
            factor,
            ipt_pct: ipt,
            rst_pct: rst,
        };

        Self {
            provinces: vec![
                p("Alberta", "AB", 1.0, 4.0, 0.0),
                p("British Columbia", "BC", 1.0, 4.4, 0.0),
                p("Manitoba", "MB", 1.0, 3.0, 8.0),
                p("New Brunswick", "NB", 1.0, 4.0, 0.0),
                p("Newfoundland and Labrador", "NL", 1.0, 5.0, 15.0),
                p("Northwest Territories", "NT", 1.0, 3.0, 0.0),
                p("Nova Scotia", "NS", 1.0, 4.0, 0.0),
                p("Nunavut", "NU", 1.0, 2.0, 0.0),
                p("Ontario", "ON", 1.0, 3.5, 8.0),
                p("Prince Edward Island", "PE", 1.0, 3.5, 0.0),
                p("Quebec", "QC", 1.3, 3.48, 9.0),
                p("Saskatchewan", "SK", 1.0, 4.0, 6.0),
                p("Yukon", "YT", 1.0, 2.0, 0.0),
            ],
            prefixes: Self::default_prefixes(),
        }
    }

    /// Build from loaded CSV provinces
    pub fn from_loaded(provinces: &[Province]) -> Self {
        Self {
            provinces: provinces.to_vec(),
            prefixes: Self::default_prefixes(),
        }
    }

    /// Postal first letter -> province code (Canada Post forward sortation)
    fn default_prefixes() -> Vec<(char, &'static str)> {
        vec![
            ('A', "NL"),
            ('B', "NS"),
            ('C', "PE"),
            ('E', "NB"),
            ('G', "QC"),
            ('H', "QC"),
            ('J', "QC"),
            ('K', "ON"),
            ('L', "ON"),
            ('M', "ON"),
            ('N', "ON"),
            ('P', "ON"),
            ('R', "MB"),
            ('S', "SK"),
            ('T', "AB"),
            ('V', "BC"),
            ('X', "NT"),
            ('Y', "YT"),
        ]
    }

    /// Look up a province by two-letter code
    pub fn by_code(&self, code: &str) -> Option<&Province> {
        self.provinces.iter().find(|p| p.code == code)
    }

    /// Resolve a postal code to its province via the first letter
    pub fn resolve_postal(&self, postal_code: &str) -> Result<&Province, ValidationError> {
        let prefix = postal_code
            .chars()
            .next()
            .map(|c| c.to_ascii_uppercase())
            .ok_or(ValidationError::UnknownPostalPrefix { prefix: ' ' })?;

        let code = self
            .prefixes
            .iter()
            .find(|(letter, _)| *letter == prefix)
            .map(|(_, code)| *code)
            .ok_or(ValidationError::UnknownPostalPrefix { prefix })?;

        self.by_code(code)
            .ok_or(ValidationError::UnknownPostalPrefix { prefix })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_postal_prefix() {
        let table = ProvinceTable::default_pricing();

        assert_eq!(table.resolve_postal("T3H 3R3").unwrap().code, "AB");
        assert_eq!(table.resolve_postal("M5V 2T6").unwrap().code, "ON");
        assert_eq!(table.resolve_postal("h2x 1y4").unwrap().code, "QC");
    }

    #[test]
    fn test_unmapped_prefix_rejected() {
        let table = ProvinceTable::default_pricing();

        // D, F, I, O, Q, U, W, Z are not assigned forward sortation letters
        assert!(matches!(
            table.resolve_postal("Z1A 0A1"),
            Err(ValidationError::UnknownPostalPrefix { prefix: 'Z' })
        ));
        assert!(table.resolve_postal("").is_err());
    }

    #[test]
    fn test_tax_rates() {
        let table = ProvinceTable::default_pricing();

        let ab = table.by_code("AB").unwrap();
        assert_eq!(ab.ipt_pct, 4.0);
        assert_eq!(ab.rst_pct, 0.0);

        let qc = table.by_code("QC").unwrap();
        assert_eq!(qc.factor, 1.3);
        assert_eq!(qc.rst_pct, 9.0);

        let nl = table.by_code("NL").unwrap();
        assert_eq!(nl.rst_pct, 15.0);
    }
}
