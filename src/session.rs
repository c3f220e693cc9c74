//! Quote session for efficient batch pricing
//!
//! Pre-loads rate tables once, then allows pricing many deals without
//! re-reading CSV files.

use crate::error::ValidationError;
use crate::pricing::{PricingEngine, PricingResult};
use crate::quote::PricingInput;
use crate::rates::RateTables;
use rayon::prelude::*;

/// Pre-loaded quote session for efficient batch pricing
///
/// # Example
/// ```ignore
/// let session = QuoteSession::from_csv()?;
///
/// // Price many deals against the same rate tables
/// for deal in deals {
///     let result = session.price(&deal)?;
/// }
/// ```
#[derive(Debug, Clone)]
pub struct QuoteSession {
    engine: PricingEngine,
}

impl QuoteSession {
    /// Create session with default in-memory rate tables
    pub fn new() -> Self {
        Self {
            engine: PricingEngine::new(RateTables::default_pricing()),
        }
    }

    /// Create session by loading rate tables from CSV files
    pub fn from_csv() -> Result<Self, Box<dyn std::error::Error>> {
        Ok(Self {
            engine: PricingEngine::new(RateTables::from_csv()?),
        })
    }

    /// Create session from a specific rates directory
    pub fn from_csv_path(path: &std::path::Path) -> Result<Self, Box<dyn std::error::Error>> {
        Ok(Self {
            engine: PricingEngine::new(RateTables::from_csv_path(path)?),
        })
    }

    /// Create session with pre-built rate tables
    pub fn with_tables(tables: RateTables) -> Self {
        Self {
            engine: PricingEngine::new(tables),
        }
    }

    /// Price a single deal
    pub fn price(&self, input: &PricingInput) -> Result<PricingResult, ValidationError> {
        self.engine.compute_pricing(input)
    }

    /// Price many deals in parallel; one result per input, in order
    pub fn price_batch(&self, inputs: &[PricingInput]) -> Vec<Result<PricingResult, ValidationError>> {
        inputs
            .par_iter()
            .map(|input| self.engine.compute_pricing(input))
            .collect()
    }

    /// Get reference to the loaded rate tables for inspection
    pub fn rates(&self) -> &RateTables {
        self.engine.rates()
    }
}

impl Default for QuoteSession {
    fn default() -> Self {
        Self::new()
    }
}
