//! Input rules for users, memecoins and trades

use bonding_curve::CurveParams;

use crate::error::{LedgerError, Result};
use crate::types::NewMemecoin;

pub const NAME_LEN: (usize, usize) = (2, 50);
pub const COIN_NAME_LEN: (usize, usize) = (4, 16);
pub const SYMBOL_LEN: (usize, usize) = (2, 4);
pub const DESCRIPTION_MAX: usize = 1000;
pub const LOGO_URL_MAX: usize = 200;
pub const STARTING_PRICE_RANGE: (f64, f64) = (0.01, 10.0);
pub const GROWTH_RATE_RANGE: (f64, f64) = (0.0001, 0.01);

fn within(len: usize, (min, max): (usize, usize)) -> bool {
    (min..=max).contains(&len)
}

pub fn user_name(name: &str) -> Result<String> {
    let name = name.trim();
    if !within(name.chars().count(), NAME_LEN) {
        return Err(LedgerError::validation("name", "must be 2 to 50 characters"));
    }
    Ok(name.to_string())
}

/// Loose shape check: `local@domain.tld`, no whitespace
pub fn email(email: &str) -> Result<String> {
    let email = email.trim();
    let invalid = || LedgerError::validation("email", "must look like name@example.com");

    if email.chars().any(char::is_whitespace) {
        return Err(invalid());
    }
    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.contains('@') {
        return Err(invalid());
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) if !host.is_empty() && !tld.is_empty() => Ok(email.to_string()),
        _ => Err(invalid()),
    }
}

/// Validated creation request with defaults applied
pub struct ValidCoin {
    pub name: String,
    pub symbol: String,
    pub description: Option<String>,
    pub logo_url: Option<String>,
    pub curve: CurveParams,
}

pub fn new_memecoin(req: &NewMemecoin, default_curve: CurveParams) -> Result<ValidCoin> {
    let name = req.name.trim();
    if !within(name.chars().count(), COIN_NAME_LEN) {
        return Err(LedgerError::validation("name", "must be 4 to 16 characters"));
    }

    let symbol = req.symbol.trim();
    if !within(symbol.len(), SYMBOL_LEN) || !symbol.bytes().all(|b| b.is_ascii_uppercase()) {
        return Err(LedgerError::validation("symbol", "must be 2 to 4 uppercase letters"));
    }

    let description = non_empty(req.description.as_deref());
    if description.as_ref().is_some_and(|d| d.chars().count() > DESCRIPTION_MAX) {
        return Err(LedgerError::validation("description", "must be at most 1000 characters"));
    }

    let logo_url = non_empty(req.logo_url.as_deref());
    if let Some(url) = &logo_url {
        if url.len() > LOGO_URL_MAX {
            return Err(LedgerError::validation("logo_url", "must be at most 200 characters"));
        }
        let rest = url
            .strip_prefix("https://")
            .or_else(|| url.strip_prefix("http://"))
            .unwrap_or("");
        if rest.is_empty() || rest.chars().any(char::is_whitespace) {
            return Err(LedgerError::validation("logo_url", "must be an http(s) URL"));
        }
    }

    let starting_price = req.starting_price.unwrap_or(default_curve.starting_price);
    if !in_range(starting_price, STARTING_PRICE_RANGE) {
        return Err(LedgerError::validation("starting_price", "must be between 0.01 and 10"));
    }
    let growth_rate = req.growth_rate.unwrap_or(default_curve.growth_rate);
    if !in_range(growth_rate, GROWTH_RATE_RANGE) {
        return Err(LedgerError::validation("growth_rate", "must be between 0.0001 and 0.01"));
    }

    Ok(ValidCoin {
        name: name.to_string(),
        symbol: symbol.to_string(),
        description,
        logo_url,
        curve: CurveParams::new(starting_price, growth_rate)?,
    })
}

pub fn trade_amount(amount: f64) -> Result<f64> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(LedgerError::validation("amount", "must be positive"));
    }
    Ok(amount)
}

fn in_range(v: f64, (min, max): (f64, f64)) -> bool {
    v.is_finite() && v >= min && v <= max
}

fn non_empty(s: Option<&str>) -> Option<String> {
    s.map(str::trim).filter(|s| !s.is_empty()).map(str::to_string)
}
