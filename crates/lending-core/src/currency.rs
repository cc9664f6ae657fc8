//! Monetary display strings the way the dashboards render them: symbol
//! prefix, comma-grouped digits, fixed minor units.

use rust_decimal::RoundingStrategy;

use crate::types::{Currency, Money};

impl Currency {
    /// Display symbol used by the dashboards.
    pub fn symbol(&self) -> &str {
        match self {
            Currency::PHP => "₱",
            Currency::USD => "$",
            Currency::EUR => "€",
            Currency::GBP => "£",
            Currency::JPY => "¥",
            Currency::Other(code) => code,
        }
    }

    /// Minor-unit digits rendered after the decimal point.
    pub fn decimal_places(&self) -> u32 {
        match self {
            Currency::JPY => 0,
            _ => 2,
        }
    }

    /// Map an ISO code to a known currency, keeping unknown codes verbatim.
    pub fn from_code(code: &str) -> Currency {
        match code {
            "PHP" => Currency::PHP,
            "USD" => Currency::USD,
            "EUR" => Currency::EUR,
            "GBP" => Currency::GBP,
            "JPY" => Currency::JPY,
            other => Currency::Other(other.to_string()),
        }
    }
}

/// Render an amount for display: `1234.5` in PHP becomes `"₱1,234.50"`.
/// Negative amounts carry a leading minus sign.
pub fn format_currency(amount: Money, currency: &Currency) -> String {
    let places = currency.decimal_places();
    let rounded =
        amount.round_dp_with_strategy(places, RoundingStrategy::MidpointAwayFromZero);

    let sign = if rounded.is_sign_negative() { "-" } else { "" };
    let fixed = format!("{:.*}", places as usize, rounded.abs());

    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (fixed.as_str(), None),
    };

    let grouped = group_thousands(int_part);
    match frac_part {
        Some(f) => format!("{sign}{}{grouped}.{f}", currency.symbol()),
        None => format!("{sign}{}{grouped}", currency.symbol()),
    }
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_peso_pads_minor_units() {
        assert_eq!(format_currency(dec!(1234.5), &Currency::PHP), "₱1,234.50");
    }

    #[test]
    fn test_grouping_large_amounts() {
        assert_eq!(
            format_currency(dec!(5000000), &Currency::PHP),
            "₱5,000,000.00"
        );
    }

    #[test]
    fn test_negative_amount() {
        assert_eq!(format_currency(dec!(-600), &Currency::PHP), "-₱600.00");
    }

    #[test]
    fn test_sub_unit_amount() {
        assert_eq!(format_currency(dec!(0.5), &Currency::USD), "$0.50");
    }

    #[test]
    fn test_rounds_half_away_from_zero() {
        assert_eq!(format_currency(dec!(2.005), &Currency::PHP), "₱2.01");
    }

    #[test]
    fn test_yen_has_no_minor_units() {
        assert_eq!(format_currency(dec!(1500.4), &Currency::JPY), "¥1,500");
    }

    #[test]
    fn test_unknown_code_prefixes_verbatim() {
        let chf = Currency::from_code("CHF");
        assert_eq!(format_currency(dec!(99.9), &chf), "CHF99.90");
    }

    #[test]
    fn test_default_currency_is_peso() {
        assert_eq!(Currency::default(), Currency::PHP);
    }
}
