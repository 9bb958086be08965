//! Buying, selling and portfolio display

use anyhow::{Context, Result};
use colored::Colorize;
use memecoin_ledger::{MemecoinId, PortfolioEntry, TradeReceipt, TransactionKind, UserId};

use crate::display;
use crate::store::StateStore;

pub async fn buy(store: &StateStore, user: u64, coin: u64, amount: f64, dry_run: bool) -> Result<()> {
    display::header("Buy Memecoin");

    if dry_run {
        let ledger = store.load().await?;
        let m = ledger.memecoin(MemecoinId(coin))?;
        let quote = m.curve.quote_buy(m.supply, amount).context("Cannot quote buy")?;
        display::field("Cost", display::zth(quote.value).bright_yellow());
        display::field("New Price", display::price(quote.new_price));
        println!("\n{}", "Dry run: nothing was bought".dimmed());
        return Ok(());
    }

    let receipt = store
        .update(|ledger| ledger.buy(UserId(user), MemecoinId(coin), amount))
        .await?;

    print_receipt(&receipt);
    println!(
        "\n{}",
        format!(
            "Successfully bought {} tokens for {:.4} ZTH",
            receipt.quantity, receipt.value
        )
        .bright_green()
    );
    Ok(())
}

pub async fn sell(store: &StateStore, user: u64, coin: u64, amount: f64, dry_run: bool) -> Result<()> {
    display::header("Sell Memecoin");

    if dry_run {
        let ledger = store.load().await?;
        let m = ledger.memecoin(MemecoinId(coin))?;
        let quote = m.curve.quote_sell(m.supply, amount).context("Cannot quote sell")?;
        display::field("Proceeds", display::zth(quote.value).bright_yellow());
        display::field("New Price", display::price(quote.new_price));
        println!("\n{}", "Dry run: nothing was sold".dimmed());
        return Ok(());
    }

    let receipt = store
        .update(|ledger| ledger.sell(UserId(user), MemecoinId(coin), amount))
        .await?;

    print_receipt(&receipt);
    println!(
        "\n{}",
        format!(
            "Successfully sold {} tokens for {:.4} ZTH",
            receipt.quantity, receipt.value
        )
        .bright_green()
    );
    Ok(())
}

pub async fn portfolio(store: &StateStore, user: u64) -> Result<()> {
    let ledger = store.load().await?;
    let portfolio = ledger.portfolio(UserId(user))?;

    display::header("My Portfolio");
    display::field("Balance", display::zth(portfolio.zth_balance));
    display::field("Holdings Value", display::zth(portfolio.holdings_value()));

    println!("\n{}", format!("Created ({})", portfolio.created.len()).bold());
    print_entries(&portfolio.created);
    println!("\n{}", format!("Purchased ({})", portfolio.purchased.len()).bold());
    print_entries(&portfolio.purchased);
    Ok(())
}

fn print_receipt(receipt: &TradeReceipt) {
    display::field("Transaction", receipt.transaction);
    display::field("Quantity", receipt.quantity);
    let label = match receipt.kind {
        TransactionKind::Sell => "Proceeds",
        _ => "Cost",
    };
    display::field(label, display::zth(receipt.value));
    display::field("Holdings", receipt.holdings_after);
    display::field("Supply", receipt.new_supply);
    display::field("New Price", display::price(receipt.new_price));
    display::field("Balance", display::zth(receipt.balance_after));
}

fn print_entries(entries: &[PortfolioEntry]) {
    if entries.is_empty() {
        println!("  {}", "none".dimmed());
        return;
    }
    for e in entries {
        println!(
            "  {:>4}  {:<6} {:<16} {:>12.4} @ {:<18} = {}",
            e.memecoin,
            e.symbol,
            e.name,
            e.holdings,
            display::price(e.price),
            display::zth(e.value).bright_yellow()
        );
    }
}
