//! Bonding Curve - Pure exponential pricing math
//!
//! Spot price is a deterministic function of circulating supply:
//!
//! ```text
//! price(s) = p0 · e^(g·s)
//! ```
//!
//! Buy cost and sell proceeds are the definite integrals of that price over
//! the traded supply interval, so buying then selling the same quantity is
//! exactly reversible (no spread).
//!
//! Everything here is stateless and performs no I/O. The free functions in
//! [`math`] take plain numbers and never panic; [`CurveParams`] adds
//! validation and checked quotes on top of them.

#![forbid(unsafe_code)]

pub mod math;
pub mod params;

pub use math::{buy_cost, price, sell_proceeds};
pub use params::{CurveParams, Quote};

/// Default price at zero supply (ZTH per token)
pub const STARTING_PRICE: f64 = 0.1;

/// Default exponential growth coefficient
pub const GROWTH_RATE: f64 = 0.005;

/// Below this growth rate the curve is treated as flat (`price = p0`)
pub const LINEAR_LIMIT: f64 = 1e-12;

/// Error types for curve operations
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum CurveError {
    /// Parameter or input outside the curve's domain
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
    /// Sell quantity exceeds circulating supply
    #[error("cannot sell {amount} tokens, only {supply} in circulation")]
    InsufficientSupply { supply: f64, amount: f64 },
    /// Result is not representable as a finite f64
    #[error("arithmetic overflow")]
    Overflow,
}
