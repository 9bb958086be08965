//! Memecoin creation, listing and inspection

use anyhow::Result;
use colored::Colorize;
use memecoin_ledger::{Memecoin, MemecoinId, NewMemecoin, TransactionKind, UserId};

use crate::display;
use crate::store::StateStore;

pub async fn create(store: &StateStore, creator: u64, req: NewMemecoin) -> Result<()> {
    display::header("Create Memecoin");

    let coin = store
        .update(|ledger| {
            let id = ledger.create_memecoin(UserId(creator), req)?;
            ledger.memecoin(id).cloned()
        })
        .await?;

    display::field("Memecoin ID", coin.id.to_string().bright_yellow());
    print_summary(&coin);
    Ok(())
}

pub async fn list(store: &StateStore, search: Option<String>) -> Result<()> {
    let ledger = store.load().await?;
    let coins = ledger.search(search.as_deref().unwrap_or(""));

    display::header("Memecoins");
    if let Some(term) = &search {
        display::field("Search", term);
    }
    if coins.is_empty() {
        println!("{}", "No memecoins found.".dimmed());
        return Ok(());
    }

    println!(
        "{:>4}  {:<6} {:<16} {:>12} {:>18} {:>16}",
        "ID".bright_cyan(),
        "SYMBOL".bright_cyan(),
        "NAME".bright_cyan(),
        "SUPPLY".bright_cyan(),
        "PRICE".bright_cyan(),
        "RESERVE".bright_cyan()
    );
    for coin in coins {
        println!(
            "{:>4}  {:<6} {:<16} {:>12.4} {:>18} {:>16}",
            coin.id,
            coin.symbol,
            coin.name,
            coin.supply,
            display::price(coin.price()),
            display::zth(coin.reserve)
        );
    }
    Ok(())
}

pub async fn show(store: &StateStore, id: u64) -> Result<()> {
    let ledger = store.load().await?;
    let coin = ledger.memecoin(MemecoinId(id))?;

    display::header(&format!("{} ({})", coin.name, coin.symbol));
    print_summary(coin);
    display::field("Market Cap", display::zth(coin.market_cap()));
    if let Some(owner) = &coin.owner {
        display::field("Owner", owner);
    }
    if let Some(url) = &coin.logo_url {
        display::field("Logo", url);
    }
    if let Some(description) = &coin.description {
        println!("\n{}", description.dimmed());
    }
    Ok(())
}

pub async fn history(store: &StateStore, id: u64) -> Result<()> {
    let ledger = store.load().await?;
    let coin_id = MemecoinId(id);
    let transactions = ledger.history(coin_id)?;
    let prices = ledger.price_history(coin_id)?;

    display::header("Transaction History");
    println!(
        "{:>5}  {:<20} {:<7} {:>6} {:>12} {:>16} {:>18}",
        "TX".bright_cyan(),
        "TIME".bright_cyan(),
        "TYPE".bright_cyan(),
        "USER".bright_cyan(),
        "QUANTITY".bright_cyan(),
        "AMOUNT".bright_cyan(),
        "PRICE AFTER".bright_cyan()
    );
    for (tx, point) in transactions.iter().zip(&prices) {
        let kind = match tx.kind {
            TransactionKind::Create => tx.kind.to_string().dimmed(),
            TransactionKind::Buy => tx.kind.to_string().bright_green(),
            TransactionKind::Sell => tx.kind.to_string().bright_red(),
        };
        println!(
            "{:>5}  {:<20} {:<7} {:>6} {:>12.4} {:>16} {:>18}",
            tx.id,
            display::timestamp(&tx.created_at),
            kind,
            tx.user,
            tx.quantity,
            display::zth(tx.amount),
            display::price(point.price)
        );
    }
    Ok(())
}

pub async fn delete(store: &StateStore, id: u64, requester: u64) -> Result<()> {
    display::header("Delete Memecoin");

    let removed = store
        .update(|ledger| ledger.delete_memecoin(UserId(requester), MemecoinId(id)))
        .await?;

    println!("{} {} ({})", "Deleted".bright_red(), removed.name, removed.symbol);
    Ok(())
}

fn print_summary(coin: &Memecoin) {
    display::field("Supply", format!("{:.4}", coin.supply));
    display::field("Price", display::price(coin.price()));
    display::field("Reserve", display::zth(coin.reserve));
    display::field("Starting Price", display::price(coin.curve.starting_price));
    display::field("Growth Rate", coin.curve.growth_rate);
}
