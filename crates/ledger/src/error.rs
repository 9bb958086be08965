//! Ledger error type

use bonding_curve::CurveError;

use crate::types::{MemecoinId, UserId};

pub type Result<T> = core::result::Result<T, LedgerError>;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LedgerError {
    #[error("user {0} not found")]
    UserNotFound(UserId),

    #[error("memecoin {0} not found")]
    MemecoinNotFound(MemecoinId),

    #[error("invalid {field}: {reason}")]
    Validation {
        field: &'static str,
        reason: &'static str,
    },

    #[error("email is already in use")]
    DuplicateEmail,

    #[error("symbol {0} is already taken")]
    DuplicateSymbol(String),

    #[error("insufficient ZTH balance: need {needed:.4}, have {available:.4}")]
    InsufficientBalance { needed: f64, available: f64 },

    /// Sell larger than circulating supply
    #[error("not enough tokens in circulation: {supply} < {amount}")]
    InsufficientSupply { supply: f64, amount: f64 },

    #[error("you only own {held} tokens of this memecoin")]
    InsufficientHoldings { held: f64, amount: f64 },

    /// Sell proceeds exceed the memecoin's reserve
    #[error("insufficient reserve in the liquidity pool: {reserve:.4} < {proceeds:.4}")]
    InsufficientReserve { reserve: f64, proceeds: f64 },

    #[error("only the creator can delete this memecoin")]
    NotCreator,

    #[error("memecoin still has {0} tokens in circulation")]
    CoinInCirculation(f64),

    #[error(transparent)]
    Curve(#[from] CurveError),
}

impl LedgerError {
    pub(crate) fn validation(field: &'static str, reason: &'static str) -> Self {
        LedgerError::Validation { field, reason }
    }
}
