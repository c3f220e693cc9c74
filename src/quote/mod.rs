//! Typed inputs to the premium calculator

mod input;

pub use input::{
    DebtProfile, Powertrain, PricingInput, Purchase, VehicleRecord, VehicleState, GVWR_LIMIT,
    NEW_VEHICLE_ODOMETER_LIMIT, STANDARD_TERM_LADDER,
};
