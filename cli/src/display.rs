//! Output formatting helpers

use chrono::{DateTime, Local, Utc};
use colored::Colorize;

pub fn header(title: &str) {
    println!("{}", format!("=== {} ===", title).bright_green().bold());
}

pub fn field(label: &str, value: impl std::fmt::Display) {
    println!("{} {}", format!("{}:", label).bright_cyan(), value);
}

/// Format a ZTH amount with four decimals
pub fn zth(amount: f64) -> String {
    format!("{:.4} ZTH", amount)
}

/// Format a token price, keeping precision for very cheap tokens
pub fn price(p: f64) -> String {
    if p != 0.0 && p.abs() < 0.0001 {
        format!("{:.4e} ZTH", p)
    } else {
        format!("{:.6} ZTH", p)
    }
}

pub fn timestamp(at: &DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zth_four_decimals() {
        assert_eq!(zth(12.974425414), "12.9744 ZTH");
        assert_eq!(zth(0.0), "0.0000 ZTH");
    }

    #[test]
    fn test_price_switches_to_scientific() {
        assert_eq!(price(0.1), "0.100000 ZTH");
        assert!(price(0.00001234).contains('e'));
    }
}
