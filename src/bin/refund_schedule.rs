//! Month-by-month refund schedule for a priced policy
//!
//! Prices a sample deal at one term, then prints the refund each product
//! would pay if the policy were cancelled in each month of its term

use anyhow::{Context, Result};
use chrono::{Months, NaiveDate};
use clap::Parser;
use premium_engine::quote::Powertrain;
use premium_engine::refund::{compute_refund, PolicyProductPricing, RefundInput, RefundOperation};
use premium_engine::{
    DebtProfile, PricingInput, ProductCode, Purchase, QuoteSession, VehicleRecord,
};

#[derive(Parser, Debug)]
#[command(about = "Print a month-by-month cancellation refund schedule")]
struct Args {
    /// Policy term in months
    #[arg(long, default_value_t = 36)]
    term: u32,

    /// Policy effective date (YYYY-MM-DD)
    #[arg(long, default_value = "2024-01-01")]
    effective: NaiveDate,

    /// Treat the unwind as a transfer instead of a cancellation
    #[arg(long)]
    transfer: bool,

    /// Load rate tables from this directory instead of the built-in values
    #[arg(long)]
    rates_dir: Option<std::path::PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let session = match &args.rates_dir {
        Some(dir) => QuoteSession::from_csv_path(dir)
            .map_err(|e| anyhow::anyhow!(e.to_string()))
            .with_context(|| format!("loading rate tables from {}", dir.display()))?,
        None => QuoteSession::new(),
    };

    let input = PricingInput {
        postal_code: "M5V 2T6".to_string(),
        vehicle: VehicleRecord {
            make: "Toyota".to_string(),
            model: "RAV4".to_string(),
            trim: "XLE".to_string(),
            body_style: "SUV".to_string(),
            model_year: 2024,
            combined_msrp: 42_000.0,
            powertrain: Powertrain::Hybrid,
            gvwr: Some(2_100.0),
            horsepower: Some(219.0),
        },
        odometer: 50,
        purchase: Purchase::Financed(DebtProfile {
            total_debt: 46_000.0,
            annual_rate: 0.055,
            term_months: 84,
            monthly_payment: 661.0,
            residual_value: 0.0,
            rolled_in_negative_equity: 0.0,
        }),
        purchase_price: 43_500.0,
        value_appreciation_rate: None,
        products: vec![ProductCode::Rcp, ProductCode::Gtu],
        term: Some(args.term),
        calendar_year: 2024,
        dealership_licensed: true,
    };

    let result = session
        .price(&input)
        .context("pricing the sample policy")?;

    let products: Vec<PolicyProductPricing> = input
        .products
        .iter()
        .map(|&product| {
            let breakdown = result
                .breakdown(product, args.term)
                .context("quoted product missing from pricing result")?;
            Ok(PolicyProductPricing::from_breakdown(product, breakdown))
        })
        .collect::<Result<_>>()?;

    let operation = if args.transfer {
        RefundOperation::Transfer
    } else {
        RefundOperation::Cancellation
    };

    println!("Refund schedule: {} month term effective {}", args.term, args.effective);
    println!("{:>6} {:>12} {:>7}  {}", "Month", "CancelDate", "Factor", "Net refund per product");
    println!("{}", "-".repeat(70));

    for month in 1..=args.term {
        let cancellation_date = args.effective + Months::new(month);
        let refund_input = RefundInput {
            policy_id: "DEMO-0001".to_string(),
            effective_date: args.effective,
            term_months: args.term,
            province_code: "ON".to_string(),
            operation,
            cancellation_date,
            minimum_retained: false,
            products: products.clone(),
            cancellation_fee: None,
            transfer_fee: None,
        };

        let refunds = compute_refund(&refund_input);
        let factor = refunds
            .values()
            .map(|r| r.refund_factor)
            .fold(0.0_f64, f64::max);
        let nets: Vec<String> = refunds
            .iter()
            .map(|(product, r)| format!("{}={:.2}", product.as_str(), r.net_refund))
            .collect();

        println!("{:>6} {:>12} {:>7.4}  {}", month, cancellation_date, factor, nets.join("  "));
    }

    Ok(())
}
