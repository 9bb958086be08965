//! Offline bonding-curve calculations (no state file involved)

use anyhow::{Context, Result};
use bonding_curve::{CurveParams, Quote};
use colored::Colorize;

use crate::display;

pub fn show_price(curve: &CurveParams, supply: f64) -> Result<()> {
    display::header("Spot Price");
    print_curve(curve);
    display::field("Supply", supply);

    let quote = curve.quote_buy(supply, 0.0).context("Invalid supply")?;
    display::field("Price", display::price(quote.new_price));
    Ok(())
}

pub fn quote_buy(curve: &CurveParams, supply: f64, amount: f64) -> Result<()> {
    display::header("Buy Quote");
    print_curve(curve);
    let quote = curve.quote_buy(supply, amount).context("Cannot quote buy")?;
    print_quote(supply, &quote, "Cost");
    Ok(())
}

pub fn quote_sell(curve: &CurveParams, supply: f64, amount: f64) -> Result<()> {
    display::header("Sell Quote");
    print_curve(curve);
    let quote = curve.quote_sell(supply, amount).context("Cannot quote sell")?;
    print_quote(supply, &quote, "Proceeds");
    Ok(())
}

pub fn quote_budget(curve: &CurveParams, supply: f64, budget: f64) -> Result<()> {
    display::header("Budget Quote");
    print_curve(curve);

    let tokens = curve
        .tokens_for_budget(supply, budget)
        .context("Cannot quote budget")?;
    display::field("Supply", supply);
    display::field("Budget", display::zth(budget));
    display::field("Tokens", format!("{:.6}", tokens).bright_yellow());
    display::field("New Price", display::price(curve.price(supply + tokens)));
    Ok(())
}

pub fn show_curve(curve: &CurveParams, max_supply: f64, points: usize) -> Result<()> {
    if !max_supply.is_finite() || max_supply <= 0.0 {
        anyhow::bail!("max supply must be positive, got {}", max_supply);
    }

    display::header("Bonding Curve");
    print_curve(curve);
    println!();
    println!("{:>14}  {:>18}", "SUPPLY".bright_cyan(), "PRICE".bright_cyan());
    for (supply, price) in curve.sample(max_supply, points) {
        println!("{:>14.2}  {:>18}", supply, display::price(price));
    }
    Ok(())
}

fn print_curve(curve: &CurveParams) {
    display::field("Starting Price", display::price(curve.starting_price));
    display::field("Growth Rate", curve.growth_rate);
}

fn print_quote(supply: f64, quote: &Quote, value_label: &str) {
    display::field("Supply", format!("{} -> {}", supply, quote.new_supply));
    display::field("Quantity", quote.quantity);
    display::field(value_label, display::zth(quote.value).bright_yellow());
    display::field("Average Price", display::price(quote.avg_price));
    display::field("New Price", display::price(quote.new_price));
}
