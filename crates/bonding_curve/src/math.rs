//! Exponential bonding curve math (closed-form integrals)
//!
//! These functions are unchecked: callers must pass `supply >= 0`,
//! `amount >= 0`, `starting_price > 0` and `growth_rate >= 0`. Out-of-domain
//! inputs produce a number (possibly negative or infinite), never a panic.

use crate::LINEAR_LIMIT;

/// Spot price at a supply level
///
/// # Formula
/// price = p0 · e^(g·supply)
///
/// Positive and strictly increasing in `supply` for `p0 > 0`, `g > 0`.
#[inline]
pub fn price(supply: f64, starting_price: f64, growth_rate: f64) -> f64 {
    starting_price * (growth_rate * supply).exp()
}

/// Cost of buying `amount` tokens starting at `supply`
///
/// # Formula
/// ∫[s, s+a] p0·e^(g·x) dx = (p0/g) · (e^(g(s+a)) - e^(g·s))
pub fn buy_cost(supply: f64, amount: f64, starting_price: f64, growth_rate: f64) -> f64 {
    integral(supply, amount, starting_price, growth_rate)
}

/// Proceeds of selling `amount` tokens back from `supply`
///
/// # Formula
/// ∫[s-a, s] p0·e^(g·x) dx = (p0/g) · (e^(g·s) - e^(g(s-a)))
///
/// Does not check `amount <= supply`; selling past zero integrates over
/// negative supply.
pub fn sell_proceeds(supply: f64, amount: f64, starting_price: f64, growth_rate: f64) -> f64 {
    integral(supply - amount, amount, starting_price, growth_rate)
}

/// Area under the price curve on `[lower, lower + width]`
///
/// Evaluated as `(p0/g) · e^(g·lower) · expm1(g·width)` so that small
/// `g·width` keeps full precision. Growth rates below [`LINEAR_LIMIT`]
/// use the flat-curve limit `p0 · width`.
#[inline]
fn integral(lower: f64, width: f64, starting_price: f64, growth_rate: f64) -> f64 {
    if growth_rate.abs() < LINEAR_LIMIT {
        return starting_price * width;
    }
    (starting_price / growth_rate) * (growth_rate * lower).exp() * (growth_rate * width).exp_m1()
}

#[cfg(test)]
mod tests {
    use super::*;

    const P0: f64 = 0.1;
    const G: f64 = 0.005;

    fn approx(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() <= tol
    }

    #[test]
    fn test_price_at_zero_supply_is_starting_price() {
        assert_eq!(price(0.0, P0, G), 0.1);
    }

    #[test]
    fn test_price_at_hundred() {
        // 0.1 * e^0.5
        let p = price(100.0, P0, G);
        assert!(approx(p, 0.164_872_127, 1e-9), "price = {}", p);
    }

    #[test]
    fn test_buy_cost_from_zero() {
        // (0.1 / 0.005) * (e^0.5 - 1) = 20 * 0.6487212707
        let cost = buy_cost(0.0, 100.0, P0, G);
        assert!(approx(cost, 12.974_425_414, 1e-8), "cost = {}", cost);
    }

    #[test]
    fn test_sell_back_to_zero_matches_buy() {
        let proceeds = sell_proceeds(100.0, 100.0, P0, G);
        assert!(approx(proceeds, 12.974_425_414, 1e-8));
        assert_eq!(proceeds, buy_cost(0.0, 100.0, P0, G));
    }

    #[test]
    fn test_zero_amount_is_free() {
        assert_eq!(buy_cost(250.0, 0.0, P0, G), 0.0);
        assert_eq!(sell_proceeds(250.0, 0.0, P0, G), 0.0);
    }

    #[test]
    fn test_zero_growth_is_linear() {
        assert_eq!(price(1_000.0, P0, 0.0), P0);
        assert!(approx(buy_cost(1_000.0, 50.0, P0, 0.0), 5.0, 1e-12));
        assert!(approx(sell_proceeds(1_000.0, 50.0, P0, 0.0), 5.0, 1e-12));
    }

    #[test]
    fn test_tiny_growth_converges_to_linear() {
        // Just above LINEAR_LIMIT the closed form must still agree with p0·a
        let cost = buy_cost(10.0, 100.0, P0, 1e-11);
        assert!(approx(cost, 10.0, 1e-6), "cost = {}", cost);
    }

    #[test]
    fn test_overflow_is_infinite_not_panic() {
        let cost = buy_cost(1e6, 1.0, P0, 1.0);
        assert!(cost.is_infinite());
    }
}
