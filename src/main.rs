//! Premium Engine CLI
//!
//! Prices a sample financed deal across the standard term ladder and
//! prints the full breakdown per product and term

use premium_engine::quote::Powertrain;
use premium_engine::{
    DebtProfile, PricingEngine, PricingInput, ProductCode, Purchase, RateTables, VehicleRecord,
};

fn main() {
    env_logger::init();

    println!("Premium Engine v0.1.0");
    println!("=====================\n");

    // Sample deal: $60k Chevrolet in Alberta, $65k financed at 6% over 95 months
    let input = PricingInput {
        postal_code: "T3H 3R3".to_string(),
        vehicle: VehicleRecord {
            make: "Chevrolet".to_string(),
            model: "Camaro".to_string(),
            trim: "ZL1".to_string(),
            body_style: "Coupe".to_string(),
            model_year: 2024,
            combined_msrp: 60_000.0,
            powertrain: Powertrain::Combustion,
            gvwr: Some(5_000.0),
            horsepower: Some(650.0),
        },
        odometer: 1_000,
        purchase: Purchase::Financed(DebtProfile {
            total_debt: 65_000.0,
            annual_rate: 0.06,
            term_months: 95,
            monthly_payment: 861.20,
            residual_value: 0.0,
            rolled_in_negative_equity: 5_000.0,
        }),
        purchase_price: 60_000.0,
        value_appreciation_rate: None,
        products: vec![
            ProductCode::Rcp,
            ProductCode::Rce,
            ProductCode::Rcc,
            ProductCode::Gtu,
            ProductCode::Rne,
        ],
        term: None,
        calendar_year: 2024,
        dealership_licensed: true,
    };

    println!("Deal: {} {} {} {}", input.vehicle.model_year, input.vehicle.make,
        input.vehicle.model, input.vehicle.trim);
    println!("  Postal: {}", input.postal_code);
    println!("  Vehicle value: ${:.2}", input.vehicle.combined_msrp);
    if let Some(debt) = input.purchase.debt_profile() {
        println!("  Financed: ${:.2} at {:.2}% over {} months (${:.2}/mo)",
            debt.total_debt, debt.annual_rate * 100.0, debt.term_months, debt.monthly_payment);
    }
    println!();

    let engine = PricingEngine::new(RateTables::default_pricing());
    let result = match engine.compute_pricing(&input) {
        Ok(result) => result,
        Err(err) => {
            eprintln!("Pricing failed: {err}");
            std::process::exit(1);
        }
    };

    println!("{:>5} {:>5} {:>12} {:>12} {:>12} {:>10} {:>10} {:>12}",
        "Prod", "Term", "Underwriting", "MGA", "Commission", "IPT", "RST", "Retail");
    println!("{}", "-".repeat(85));

    for (product, terms) in &result.products {
        for (term, b) in terms {
            println!("{:>5} {:>5} {:>12.2} {:>12.2} {:>12.2} {:>10.2} {:>10.2} {:>12.2}",
                product.as_str(),
                term,
                b.underwriting_premium,
                b.mga_payment,
                b.seller_commission,
                b.ipt,
                b.retail_tax,
                b.retail_price_after_tax,
            );
        }
    }

    println!("\nPolicy totals by term:");
    for term in input.terms() {
        println!("  {:>3} months: ${:.2}", term, result.policy_total(term, 0.0));
    }

    let json = serde_json::to_string_pretty(&result).expect("serialize pricing result");
    let json_path = "pricing_output.json";
    std::fs::write(json_path, json).expect("Unable to write JSON file");
    println!("\nFull breakdown written to: {}", json_path);
}
