//! User registration, profiles and the leaderboard

use anyhow::Result;
use colored::Colorize;
use memecoin_ledger::{ProfileUpdate, UserId};

use crate::display;
use crate::store::StateStore;

pub async fn register(store: &StateStore, email: String, name: Option<String>) -> Result<()> {
    display::header("Register User");

    let (id, balance) = store
        .update(|ledger| {
            let id = ledger.register_user(name.as_deref(), &email)?;
            Ok((id, ledger.user(id)?.zth_balance))
        })
        .await?;

    display::field("User ID", id.to_string().bright_yellow());
    display::field("Email", &email);
    display::field("Balance", display::zth(balance));
    Ok(())
}

pub async fn show(store: &StateStore, id: u64) -> Result<()> {
    let ledger = store.load().await?;
    let user = ledger.user(UserId(id))?;

    display::header("User");
    display::field("ID", user.id);
    display::field("Name", user.name.as_deref().unwrap_or("Anonymous"));
    display::field("Email", &user.email);
    display::field("Balance", display::zth(user.zth_balance));
    display::field("Joined", display::timestamp(&user.created_at));
    Ok(())
}

pub async fn update(store: &StateStore, id: u64, name: Option<String>, email: Option<String>) -> Result<()> {
    if name.is_none() && email.is_none() {
        anyhow::bail!("Nothing to update: pass --name and/or --email");
    }
    display::header("Update Profile");

    let user = store
        .update(|ledger| ledger.update_profile(UserId(id), ProfileUpdate { name, email }).cloned())
        .await?;

    display::field("Name", user.name.as_deref().unwrap_or("Anonymous"));
    display::field("Email", &user.email);
    println!("\n{}", "Profile updated successfully".bright_green());
    Ok(())
}

pub async fn leaderboard(store: &StateStore) -> Result<()> {
    let ledger = store.load().await?;
    let board = ledger.leaderboard();

    display::header("Leaderboard");
    if board.is_empty() {
        println!("{}", "No users found.".dimmed());
        return Ok(());
    }

    println!(
        "{:<6} {:<24} {:>16} {:>8} {:>8}",
        "RANK".bright_cyan(),
        "USER".bright_cyan(),
        "BALANCE".bright_cyan(),
        "COINS".bright_cyan(),
        "TXS".bright_cyan()
    );
    for entry in board {
        let rank = match entry.rank {
            1 => "1".yellow().bold(),
            2 => "2".white().bold(),
            3 => "3".red().bold(),
            n => n.to_string().normal(),
        };
        println!(
            "{:<6} {:<24} {:>16} {:>8} {:>8}",
            rank,
            entry.name.as_deref().unwrap_or("Anonymous"),
            display::zth(entry.zth_balance),
            entry.memecoins_created,
            entry.transactions
        );
    }
    Ok(())
}
