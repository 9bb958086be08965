//! Read models derived from the ledger: portfolio, leaderboard, search
//! and price history.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::Result;
use crate::ledger::{Ledger, QUANTITY_EPSILON};
use crate::types::*;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortfolioEntry {
    pub memecoin: MemecoinId,
    pub name: String,
    pub symbol: String,
    pub price: f64,
    pub holdings: f64,
    /// holdings · price
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Portfolio {
    pub user: UserId,
    pub zth_balance: f64,
    /// Coins the user created, newest first
    pub created: Vec<PortfolioEntry>,
    /// Coins the user bought but did not create, most recently traded first
    pub purchased: Vec<PortfolioEntry>,
}

impl Portfolio {
    /// Mark value of every position
    pub fn holdings_value(&self) -> f64 {
        self.created
            .iter()
            .chain(&self.purchased)
            .map(|e| e.value)
            .sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaderboardEntry {
    pub rank: usize,
    pub user: UserId,
    pub name: Option<String>,
    pub zth_balance: f64,
    pub memecoins_created: usize,
    pub transactions: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PricePoint {
    pub at: DateTime<Utc>,
    pub supply: f64,
    pub price: f64,
}

impl Ledger {
    pub fn portfolio(&self, user: UserId) -> Result<Portfolio> {
        let owner = self.user(user)?;

        let mut created: Vec<&Memecoin> = self
            .memecoins()
            .filter(|m| m.creator == Some(user))
            .collect();
        created.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        let bought: BTreeSet<MemecoinId> = self
            .transactions()
            .iter()
            .filter(|t| t.user == user && t.kind == TransactionKind::Buy)
            .map(|t| t.memecoin)
            .collect();
        let mut purchased: Vec<&Memecoin> = bought
            .into_iter()
            .filter_map(|id| self.memecoin(id).ok())
            .filter(|m| m.creator != Some(user))
            .collect();
        purchased.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then(b.id.cmp(&a.id)));

        let entry = |m: &Memecoin| {
            let holdings = self.holdings(user, m.id);
            let price = m.price();
            PortfolioEntry {
                memecoin: m.id,
                name: m.name.clone(),
                symbol: m.symbol.clone(),
                price,
                holdings,
                value: holdings * price,
            }
        };

        Ok(Portfolio {
            user,
            zth_balance: owner.zth_balance,
            created: created.into_iter().map(entry).collect(),
            purchased: purchased.into_iter().map(entry).collect(),
        })
    }

    /// Users ranked by ZTH balance, richest first
    pub fn leaderboard(&self) -> Vec<LeaderboardEntry> {
        let mut users: Vec<&User> = self.users().collect();
        users.sort_by(|a, b| b.zth_balance.total_cmp(&a.zth_balance).then(a.id.cmp(&b.id)));

        users
            .into_iter()
            .enumerate()
            .map(|(i, u)| LeaderboardEntry {
                rank: i + 1,
                user: u.id,
                name: u.name.clone(),
                zth_balance: u.zth_balance,
                memecoins_created: self.memecoins().filter(|m| m.creator == Some(u.id)).count(),
                transactions: self.transactions().iter().filter(|t| t.user == u.id).count(),
            })
            .collect()
    }

    /// Case-insensitive match on name, symbol or description; newest first
    pub fn search(&self, term: &str) -> Vec<&Memecoin> {
        let needle = term.trim().to_lowercase();
        let contains = |s: &str| s.to_lowercase().contains(&needle);

        let mut hits: Vec<&Memecoin> = self
            .memecoins()
            .filter(|m| {
                needle.is_empty()
                    || contains(&m.name)
                    || contains(&m.symbol)
                    || m.description.as_deref().is_some_and(contains)
            })
            .collect();
        hits.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        hits
    }

    /// The memecoin's log entries, oldest first
    pub fn history(&self, memecoin: MemecoinId) -> Result<Vec<&Transaction>> {
        self.memecoin(memecoin)?;
        Ok(self
            .transactions()
            .iter()
            .filter(|t| t.memecoin == memecoin)
            .collect())
    }

    /// Spot price after creation and after each trade, replayed from the log
    pub fn price_history(&self, memecoin: MemecoinId) -> Result<Vec<PricePoint>> {
        let coin = self.memecoin(memecoin)?;

        let mut supply = 0.0f64;
        let mut points = Vec::new();
        for t in self.history(memecoin)? {
            match t.kind {
                TransactionKind::Create => {}
                TransactionKind::Buy => supply += t.quantity,
                TransactionKind::Sell => supply -= t.quantity,
            }
            if supply.abs() < QUANTITY_EPSILON {
                supply = 0.0;
            }
            points.push(PricePoint {
                at: t.created_at,
                supply,
                price: coin.curve.price(supply),
            });
        }
        Ok(points)
    }
}
