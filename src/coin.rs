//! Coin formatting: 100 copper = 1 silver, 100 silver = 1 gold.

use crate::model::Cost;

/// Format a coin amount as `12g 34s 56c`, omitting leading zero tiers.
/// Anything non-finite (or too large to decompose) formats as the
/// literal `infinite`; formatting must never fail mid-report.
pub fn format_coin(value: f64) -> String {
    if !value.is_finite() || value.abs() >= i64::MAX as f64 {
        return "infinite".to_string();
    }
    let total = value as i64;
    let sign = if total < 0 { "-" } else { "" };
    let total = total.abs();

    let copper = total % 100;
    let silver = (total % 10_000) / 100;
    let gold = total / 10_000;

    if gold > 0 {
        format!("{sign}{gold}g {silver}s {copper}c")
    } else if silver > 0 {
        format!("{sign}{silver}s {copper}c")
    } else {
        format!("{sign}{copper}c")
    }
}

pub fn format_cost(cost: Cost) -> String {
    match cost {
        Cost::Coin(v) => format_coin(v),
        Cost::Unavailable => "infinite".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn three_tier_decomposition() {
        assert_eq!(format_coin(123_456.0), "12g 34s 56c");
        assert_eq!(format_coin(10_000.0), "1g 0s 0c");
        assert_eq!(format_coin(3_456.0), "34s 56c");
        assert_eq!(format_coin(56.0), "56c");
        assert_eq!(format_coin(0.0), "0c");
    }

    #[test]
    fn fractional_coin_truncates() {
        assert_eq!(format_coin(199.9), "1s 99c");
    }

    #[test]
    fn negative_amounts() {
        assert_eq!(format_coin(-123_456.0), "-12g 34s 56c");
        assert_eq!(format_coin(-5.0), "-5c");
    }

    #[test]
    fn non_finite_is_infinite() {
        assert_eq!(format_coin(f64::INFINITY), "infinite");
        assert_eq!(format_coin(f64::NEG_INFINITY), "infinite");
        assert_eq!(format_coin(f64::NAN), "infinite");
        assert_eq!(format_cost(Cost::Unavailable), "infinite");
    }
}
