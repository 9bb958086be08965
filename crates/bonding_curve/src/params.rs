//! Validated curve parameters and checked quotes

use serde::{Deserialize, Serialize};

use crate::math;
use crate::{CurveError, GROWTH_RATE, LINEAR_LIMIT, STARTING_PRICE};

/// Curve parameters fixed at token creation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurveParams {
    /// Price at zero supply
    pub starting_price: f64,
    /// Exponential growth coefficient
    pub growth_rate: f64,
}

/// Quote for a buy or sell
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quote {
    /// Tokens traded
    pub quantity: f64,

    /// Cost (buy) or proceeds (sell)
    pub value: f64,

    /// value / quantity, 0 for an empty trade
    pub avg_price: f64,

    /// Circulating supply after the trade
    pub new_supply: f64,

    /// Spot price at the new supply
    pub new_price: f64,
}

impl Default for CurveParams {
    fn default() -> Self {
        Self {
            starting_price: STARTING_PRICE,
            growth_rate: GROWTH_RATE,
        }
    }
}

impl CurveParams {
    pub fn new(starting_price: f64, growth_rate: f64) -> Result<Self, CurveError> {
        if !starting_price.is_finite() || starting_price <= 0.0 {
            return Err(CurveError::InvalidArgument("starting price must be positive"));
        }
        if !growth_rate.is_finite() || growth_rate <= 0.0 {
            return Err(CurveError::InvalidArgument("growth rate must be positive"));
        }
        Ok(Self {
            starting_price,
            growth_rate,
        })
    }

    #[inline]
    pub fn price(&self, supply: f64) -> f64 {
        math::price(supply, self.starting_price, self.growth_rate)
    }

    #[inline]
    pub fn buy_cost(&self, supply: f64, amount: f64) -> f64 {
        math::buy_cost(supply, amount, self.starting_price, self.growth_rate)
    }

    #[inline]
    pub fn sell_proceeds(&self, supply: f64, amount: f64) -> f64 {
        math::sell_proceeds(supply, amount, self.starting_price, self.growth_rate)
    }

    /// Checked quote for buying `amount` tokens at `supply`
    pub fn quote_buy(&self, supply: f64, amount: f64) -> Result<Quote, CurveError> {
        check_supply(supply)?;
        check_amount(amount)?;

        let value = self.buy_cost(supply, amount);
        self.finish(amount, value, supply + amount)
    }

    /// Checked quote for selling `amount` tokens back from `supply`
    pub fn quote_sell(&self, supply: f64, amount: f64) -> Result<Quote, CurveError> {
        check_supply(supply)?;
        check_amount(amount)?;
        if amount > supply {
            return Err(CurveError::InsufficientSupply { supply, amount });
        }

        let value = self.sell_proceeds(supply, amount);
        self.finish(amount, value, supply - amount)
    }

    /// Tokens purchasable for `budget` starting at `supply`
    ///
    /// # Formula
    /// a = ln(1 + budget·g / price(supply)) / g
    ///
    /// Inverse of [`CurveParams::buy_cost`].
    pub fn tokens_for_budget(&self, supply: f64, budget: f64) -> Result<f64, CurveError> {
        check_supply(supply)?;
        if !budget.is_finite() || budget < 0.0 {
            return Err(CurveError::InvalidArgument("budget must be non-negative"));
        }

        let g = self.growth_rate;
        let tokens = if g.abs() < LINEAR_LIMIT {
            budget / self.starting_price
        } else {
            let spot = self.price(supply);
            if !spot.is_finite() {
                return Err(CurveError::Overflow);
            }
            (budget * g / spot).ln_1p() / g
        };

        if !tokens.is_finite() {
            return Err(CurveError::Overflow);
        }
        Ok(tokens)
    }

    /// Points `(supply, price)` along the curve up to `max_supply`
    ///
    /// Spacing is quadratic in the sample index so the flat region near zero
    /// supply gets as many points as the steep tail.
    pub fn sample(&self, max_supply: f64, points: usize) -> Vec<(f64, f64)> {
        match points {
            0 => Vec::new(),
            1 => vec![(0.0, self.price(0.0))],
            n => (0..n)
                .map(|i| {
                    let t = i as f64 / (n - 1) as f64;
                    let supply = t * t * max_supply;
                    (supply, self.price(supply))
                })
                .collect(),
        }
    }

    fn finish(&self, quantity: f64, value: f64, new_supply: f64) -> Result<Quote, CurveError> {
        let new_price = self.price(new_supply);
        if !value.is_finite() || !new_price.is_finite() {
            return Err(CurveError::Overflow);
        }

        let avg_price = if quantity > 0.0 { value / quantity } else { 0.0 };

        Ok(Quote {
            quantity,
            value,
            avg_price,
            new_supply,
            new_price,
        })
    }
}

fn check_supply(supply: f64) -> Result<(), CurveError> {
    if !supply.is_finite() || supply < 0.0 {
        return Err(CurveError::InvalidArgument("supply must be non-negative"));
    }
    Ok(())
}

fn check_amount(amount: f64) -> Result<(), CurveError> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(CurveError::InvalidArgument("amount must be non-negative"));
    }
    Ok(())
}
