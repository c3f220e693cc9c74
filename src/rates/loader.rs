//! CSV-based rate-table loader
//!
//! Loads the pricing rate tables from CSV files in data/rates/

use super::depreciation::CURVE_MONTHS;
use super::product::{ProductCode, ProductRates};
use super::province::Province;
use std::collections::HashMap;
use std::error::Error;
use std::fs::File;
use std::path::Path;

/// Default path to the rates directory
pub const DEFAULT_RATES_PATH: &str = "data/rates";

/// Load provincial tax rates from CSV
/// Columns: code,province,factor,ipt_pct,rst_pct
pub fn load_provinces(path: &Path) -> Result<Vec<Province>, Box<dyn Error>> {
    let file = File::open(path.join("province_tax.csv"))?;
    let mut reader = csv::Reader::from_reader(file);

    let mut provinces = Vec::new();

    for result in reader.records() {
        let record = result?;
        provinces.push(Province {
            code: record[0].to_string(),
            name: record[1].to_string(),
            factor: record[2].parse()?,
            ipt_pct: record[3].parse()?,
            rst_pct: record[4].parse()?,
        });
    }

    Ok(provinces)
}

/// Load per-product rates from CSV
/// Columns: product,annual_frequency,underwriter_margin,commission_rate,
/// referral_rate, then four min-underwriting and four min-referral bands
pub fn load_product_rates(path: &Path) -> Result<Vec<(ProductCode, ProductRates)>, Box<dyn Error>> {
    let file = File::open(path.join("product_rates.csv"))?;
    let mut reader = csv::Reader::from_reader(file);

    let mut rates = Vec::new();

    for result in reader.records() {
        let record = result?;
        let code: ProductCode = record[0].parse()?;
        rates.push((
            code,
            ProductRates {
                annual_frequency: record[1].parse()?,
                underwriter_margin: record[2].parse()?,
                commission_rate: record[3].parse()?,
                referral_rate: record[4].parse()?,
                min_underwriting: [
                    record[5].parse()?,
                    record[6].parse()?,
                    record[7].parse()?,
                    record[8].parse()?,
                ],
                min_referral: [
                    record[9].parse()?,
                    record[10].parse()?,
                    record[11].parse()?,
                    record[12].parse()?,
                ],
            },
        ));
    }

    Ok(rates)
}

/// Load depreciation curves from CSV
/// Columns: month,default,<one column per make>
/// Returns (default_curve, make -> curve)
pub fn load_depreciation(
    path: &Path,
) -> Result<(Vec<f64>, HashMap<String, Vec<f64>>), Box<dyn Error>> {
    let file = File::open(path.join("depreciation_factors.csv"))?;
    let mut reader = csv::Reader::from_reader(file);

    let headers = reader.headers()?.clone();
    let makes: Vec<String> = headers.iter().skip(2).map(|h| h.to_string()).collect();

    let mut default_curve = vec![0.0; CURVE_MONTHS];
    let mut by_make: HashMap<String, Vec<f64>> = makes
        .iter()
        .map(|m| (m.clone(), vec![0.0; CURVE_MONTHS]))
        .collect();

    for result in reader.records() {
        let record = result?;
        let month: usize = record[0].parse()?;
        if month >= CURVE_MONTHS {
            continue;
        }
        default_curve[month] = record[1].parse()?;
        for (i, make) in makes.iter().enumerate() {
            if let Some(curve) = by_make.get_mut(make) {
                curve[month] = record[i + 2].parse()?;
            }
        }
    }

    Ok((default_curve, by_make))
}

/// All rate tables loaded from a directory
pub struct LoadedRates {
    pub provinces: Vec<Province>,
    pub product_rates: Vec<(ProductCode, ProductRates)>,
    pub depreciation_default: Vec<f64>,
    pub depreciation_by_make: HashMap<String, Vec<f64>>,
}

impl LoadedRates {
    /// Load all rate tables from the default path
    pub fn load_default() -> Result<Self, Box<dyn Error>> {
        Self::load_from(Path::new(DEFAULT_RATES_PATH))
    }

    /// Load all rate tables from a specific path
    pub fn load_from(path: &Path) -> Result<Self, Box<dyn Error>> {
        let (depreciation_default, depreciation_by_make) = load_depreciation(path)?;
        Ok(Self {
            provinces: load_provinces(path)?,
            product_rates: load_product_rates(path)?,
            depreciation_default,
            depreciation_by_make,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_default_rates() {
        let result = LoadedRates::load_default();
        assert!(result.is_ok(), "Failed to load rates: {:?}", result.err());

        let rates = result.unwrap();

        // 10 provinces + 3 territories
        assert_eq!(rates.provinces.len(), 13);
        assert!(rates.provinces.iter().any(|p| p.code == "QC"));

        // One row per product
        assert_eq!(rates.product_rates.len(), 7);

        // Full curve coverage, month 0 at full value
        assert_eq!(rates.depreciation_default.len(), CURVE_MONTHS);
        assert_eq!(rates.depreciation_default[0], 1.0);
        assert!(!rates.depreciation_by_make.is_empty());
    }
}
