//! Demo data: a test user, a handful of memecoins and some opening trades

use anyhow::Result;
use colored::Colorize;
use memecoin_ledger::{Ledger, LedgerError, MemecoinId, NewMemecoin, UserId};

use crate::store::StateStore;

pub const SEED_EMAIL: &str = "test@example.com";

struct SeedCoin {
    name: &'static str,
    symbol: &'static str,
    description: &'static str,
    logo_seed: &'static str,
    opening_buy: f64,
}

const COINS: &[SeedCoin] = &[
    SeedCoin {
        name: "Memecoin One",
        symbol: "MEME",
        description: "The first memecoin in our collection",
        logo_seed: "memecoin1",
        opening_buy: 40.0,
    },
    SeedCoin {
        name: "Doge Coin",
        symbol: "DOGE",
        description: "Much wow, very coin",
        logo_seed: "dogecoin",
        opening_buy: 60.0,
    },
    SeedCoin {
        name: "Moon Rocket",
        symbol: "MOON",
        description: "To the moon!",
        logo_seed: "mooncoin",
        opening_buy: 25.0,
    },
    SeedCoin {
        name: "Pepe Coin",
        symbol: "PEPE",
        description: "Rare Pepe collection",
        logo_seed: "pepecoin",
        opening_buy: 15.0,
    },
    SeedCoin {
        name: "Cat Token",
        symbol: "MEOW",
        description: "For cat lovers everywhere",
        logo_seed: "catcoin",
        opening_buy: 30.0,
    },
    SeedCoin {
        name: "Diamond Hands",
        symbol: "DMND",
        description: "HODL forever",
        logo_seed: "diamondcoin",
        opening_buy: 10.0,
    },
];

pub async fn run(store: &StateStore) -> Result<()> {
    println!("{}", "=== Seeding Demo Data ===".bright_yellow().bold());

    let mut ledger = store.load().await?;
    if ledger.find_user_by_email(SEED_EMAIL).is_some() {
        anyhow::bail!("State already contains {}; refusing to seed twice", SEED_EMAIL);
    }

    let (user, coins) = populate(&mut ledger)?;
    store.save(&ledger).await?;

    println!("{} Created test user {} ({})", "✓".bright_green(), SEED_EMAIL, user);
    for (coin, id) in COINS.iter().zip(&coins) {
        println!(
            "{} {} ({}) id {} with {} tokens bought",
            "✓".bright_green(),
            coin.name,
            coin.symbol,
            id,
            coin.opening_buy
        );
    }
    Ok(())
}

/// Register the test user, create every seed coin and make the opening buys
pub fn populate(ledger: &mut Ledger) -> Result<(UserId, Vec<MemecoinId>), LedgerError> {
    let user = ledger.register_user(Some("Test User"), SEED_EMAIL)?;

    let mut ids = Vec::with_capacity(COINS.len());
    for coin in COINS {
        let id = ledger.create_memecoin(
            user,
            NewMemecoin {
                name: coin.name.into(),
                symbol: coin.symbol.into(),
                description: Some(coin.description.into()),
                logo_url: Some(format!("https://picsum.photos/seed/{}/200/200", coin.logo_seed)),
                starting_price: None,
                growth_rate: None,
            },
        )?;
        ledger.buy(user, id, coin.opening_buy)?;
        ids.push(id);
    }
    Ok((user, ids))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_populate_fits_starting_balance() {
        let mut ledger = Ledger::default();
        let (user, coins) = populate(&mut ledger).unwrap();

        assert_eq!(coins.len(), COINS.len());
        let balance = ledger.user(user).unwrap().zth_balance;
        assert!(balance > 0.0 && balance < 100.0);
        assert_eq!(ledger.portfolio(user).unwrap().created.len(), COINS.len());
    }

    #[test]
    fn test_populate_twice_fails() {
        let mut ledger = Ledger::default();
        populate(&mut ledger).unwrap();
        assert_eq!(populate(&mut ledger), Err(LedgerError::DuplicateEmail));
    }
}
