//! Ledger records: users, memecoins and the trade log

use core::fmt;

use bonding_curve::CurveParams;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Identifiers
// ============================================================================

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_type!(
    /// User identifier
    UserId
);
id_type!(
    /// Memecoin identifier
    MemecoinId
);
id_type!(
    /// Transaction log sequence number
    TransactionId
);

// ============================================================================
// Records
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: Option<String>,
    pub email: String,
    /// Spendable ZTH
    pub zth_balance: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Name for display, falling back to the email address
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.email)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Memecoin {
    pub id: MemecoinId,
    pub name: String,
    pub symbol: String,
    pub description: Option<String>,
    pub logo_url: Option<String>,
    /// Tokens in circulation
    pub supply: f64,
    /// ZTH backing the circulating supply
    pub reserve: f64,
    /// Fixed at creation
    pub curve: CurveParams,
    pub creator: Option<UserId>,
    /// Creator's display name at creation time
    pub owner: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Memecoin {
    /// Current spot price, always derived from supply
    pub fn price(&self) -> f64 {
        self.curve.price(self.supply)
    }

    /// Market capitalisation at the current spot price
    pub fn market_cap(&self) -> f64 {
        self.supply * self.price()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionKind {
    Create,
    Buy,
    Sell,
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TransactionKind::Create => "CREATE",
            TransactionKind::Buy => "BUY",
            TransactionKind::Sell => "SELL",
        };
        f.write_str(s)
    }
}

/// Immutable trade log entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub kind: TransactionKind,
    /// ZTH moved: creation fee, buy cost or sell proceeds
    pub amount: f64,
    /// Tokens moved (0 for Create)
    pub quantity: f64,
    pub user: UserId,
    pub memecoin: MemecoinId,
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// Inputs and outputs
// ============================================================================

/// Ledger-wide economic parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LedgerParams {
    /// ZTH credited to every new user
    pub starting_balance: f64,
    /// ZTH charged to create a memecoin
    pub creation_fee: f64,
    /// Curve used when a new memecoin leaves its parameters unset
    pub default_curve: CurveParams,
}

impl Default for LedgerParams {
    fn default() -> Self {
        Self {
            starting_balance: 100.0,
            creation_fee: 1.0,
            default_curve: CurveParams::default(),
        }
    }
}

/// Request to create a memecoin
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewMemecoin {
    pub name: String,
    pub symbol: String,
    pub description: Option<String>,
    pub logo_url: Option<String>,
    pub starting_price: Option<f64>,
    pub growth_rate: Option<f64>,
}

/// Profile fields to change; `None` leaves a field as is
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
}

/// Outcome of a buy or sell
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TradeReceipt {
    pub transaction: TransactionId,
    pub kind: TransactionKind,
    pub quantity: f64,
    /// Cost (buy) or proceeds (sell)
    pub value: f64,
    pub holdings_after: f64,
    pub new_supply: f64,
    pub new_price: f64,
    pub balance_after: f64,
}
