//! Memecoin Ledger - users, memecoins and bonding-curve trades
//!
//! Wraps the [`bonding_curve`] engine with the state it prices: user ZTH
//! balances, per-coin supply and reserve, and an append-only transaction log
//! from which holdings are derived.

#![forbid(unsafe_code)]

pub mod error;
pub mod ledger;
pub mod types;
pub mod validation;
pub mod views;

pub use error::{LedgerError, Result};
pub use ledger::{Ledger, QUANTITY_EPSILON, RESERVE_TOLERANCE};
pub use types::*;
pub use views::{LeaderboardEntry, Portfolio, PortfolioEntry, PricePoint};

pub use bonding_curve::{CurveError, CurveParams};
