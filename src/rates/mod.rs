//! Immutable pricing rate tables
//!
//! Everything the calculators look up at runtime lives here: per-product
//! underwriting rates, provincial taxes, the depreciation curve, and the
//! zone/category placeholder tables. Tables are built once at startup and
//! passed by reference into the engines; nothing here is mutated.

mod depreciation;
mod product;
mod province;
pub mod loader;

pub use depreciation::{generate_curve, DepreciationCurve, CURVE_MONTHS};
pub use loader::LoadedRates;
pub use product::{term_band, ProductCode, ProductRateTable, ProductRates, TERM_BAND_COUNT};
pub use province::{Province, ProvinceTable};

use std::path::Path;

/// Container for all pricing rate tables
#[derive(Debug, Clone)]
pub struct RateTables {
    pub products: ProductRateTable,
    pub provinces: ProvinceTable,
    pub depreciation: DepreciationCurve,
    /// Geographic zone loadings keyed by zone id
    zone_factors: Vec<(u32, f64)>,
    /// Vehicle category loadings keyed by category id
    category_factors: Vec<(u32, f64)>,
}

impl RateTables {
    /// Create rate tables with the production in-memory values
    pub fn default_pricing() -> Self {
        Self {
            products: ProductRateTable::default_pricing(),
            provinces: ProvinceTable::default_pricing(),
            depreciation: DepreciationCurve::default_pricing(),
            zone_factors: vec![(1, 1.0), (2, 0.8), (3, 0.9), (4, 1.1), (5, 1.2)],
            category_factors: vec![
                (1, 1.0),
                (2, 1.1),
                (3, 1.2),
                (4, 1.3),
                (5, 1.4),
                (6, 1.5),
                (999, 0.0),
            ],
        }
    }

    /// Load rate tables from CSV files in the default location (data/rates/)
    pub fn from_csv() -> Result<Self, Box<dyn std::error::Error>> {
        Self::from_csv_path(Path::new(loader::DEFAULT_RATES_PATH))
    }

    /// Load rate tables from CSV files in a specific directory
    pub fn from_csv_path(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let loaded = LoadedRates::load_from(path)?;

        let mut tables = Self::default_pricing();
        tables.products = ProductRateTable::from_loaded(&loaded.product_rates);
        tables.provinces = ProvinceTable::from_loaded(&loaded.provinces);
        tables.depreciation =
            DepreciationCurve::from_loaded(loaded.depreciation_default, loaded.depreciation_by_make);
        Ok(tables)
    }

    /// Geographic zone loading for a postal code
    ///
    /// Pending richer postal data every postal code maps to zone 1; the
    /// zone table itself is real so the hook stays a table lookup.
    pub fn geographic_zone_factor(&self, _postal_code: &str) -> f64 {
        self.zone_lookup(1)
    }

    /// Vehicle category loading for a make/model
    ///
    /// Pending an external vehicle classification feed every vehicle maps
    /// to category 1.
    pub fn vehicle_category_factor(&self, _make: &str, _model: &str) -> f64 {
        self.category_lookup(1)
    }

    fn zone_lookup(&self, zone: u32) -> f64 {
        self.zone_factors
            .iter()
            .find(|(id, _)| *id == zone)
            .map(|(_, rate)| *rate)
            .unwrap_or(1.0)
    }

    fn category_lookup(&self, category: u32) -> f64 {
        self.category_factors
            .iter()
            .find(|(id, _)| *id == category)
            .map(|(_, rate)| *rate)
            .unwrap_or(1.0)
    }
}
