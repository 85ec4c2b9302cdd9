//! Lenient numeric coercion for values pulled out of fiscal XML.
//!
//! Values in the wild arrive as `"1234.56"`, `"1.234,56"`, `"R$ 50,00"`,
//! `"18%"` or placeholder tokens such as `"ISENTO"`. Everything is coerced to
//! a [`Decimal`] with 4 fractional digits; anything unparseable becomes zero.

use rust_decimal::Decimal;
use std::str::FromStr;

/// Fractional digits kept after normalization.
pub const SCALE: u32 = 4;

/// Upper-cased tokens that mean "no value".
const EMPTY_TOKENS: [&str; 9] = ["", "NT", "N/A", "ISENTO", "NULL", "ZERO", "-", " ", "NAN"];

/// Normalize a textual quantity into a [`Decimal`] rounded to [`SCALE`] places.
///
/// Never fails: absent input, placeholder tokens and parse errors all yield
/// [`Decimal::ZERO`].
///
/// ```
/// use nfe_audit::core::normalize_number;
/// use rust_decimal::Decimal;
///
/// assert_eq!(normalize_number(Some("1.234,56")), Decimal::new(123456, 2));
/// assert_eq!(normalize_number(Some("ISENTO")), Decimal::ZERO);
/// assert_eq!(normalize_number(None), Decimal::ZERO);
/// ```
pub fn normalize_number(value: Option<&str>) -> Decimal {
    let Some(raw) = value else {
        return Decimal::ZERO;
    };

    let upper = raw.trim().to_uppercase();
    if EMPTY_TOKENS.contains(&upper.as_str()) {
        return Decimal::ZERO;
    }

    let stripped = upper.replace("R$", "").replace([' ', '%'], "");
    let mut txt = stripped.trim().to_string();

    // "1.234,56" → period groups thousands; "1234,56" → comma is decimal
    if txt.contains(',') && txt.contains('.') {
        txt = txt.replace('.', "").replace(',', ".");
    } else if txt.contains(',') {
        txt = txt.replace(',', ".");
    }

    parse_decimal(&txt)
        .map(|d| d.round_dp(SCALE))
        .unwrap_or(Decimal::ZERO)
}

/// Shorthand for text already resolved to `&str` (empty means absent).
pub fn normalize_text(value: &str) -> Decimal {
    normalize_number(Some(value))
}

fn parse_decimal(txt: &str) -> Option<Decimal> {
    Decimal::from_str(txt)
        .ok()
        .or_else(|| Decimal::from_scientific(&txt.to_ascii_lowercase()).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn sentinel_tokens_are_zero() {
        for token in ["", "NT", "n/a", " isento ", "Null", "zero", "-", " ", "\t"] {
            assert_eq!(normalize_number(Some(token)), Decimal::ZERO, "token {token:?}");
        }
    }

    #[test]
    fn absent_is_zero() {
        assert_eq!(normalize_number(None), Decimal::ZERO);
    }

    #[test]
    fn brazilian_thousands_and_decimal() {
        assert_eq!(normalize_number(Some("1.234,56")), dec!(1234.56));
        assert_eq!(normalize_number(Some("1234,56")), dec!(1234.56));
        assert_eq!(normalize_number(Some("12.345.678,9")), dec!(12345678.9));
    }

    #[test]
    fn currency_and_percent() {
        assert_eq!(normalize_number(Some("10%")), dec!(10));
        assert_eq!(normalize_number(Some("R$ 50,00")), dec!(50));
        assert_eq!(normalize_number(Some("r$ 1.000,00")), dec!(1000));
    }

    #[test]
    fn plain_decimal_passes_through() {
        assert_eq!(normalize_number(Some("1500.00")), dec!(1500));
        assert_eq!(normalize_number(Some("-3.5")), dec!(-3.5));
        assert_eq!(normalize_number(Some("0.1234")), dec!(0.1234));
    }

    #[test]
    fn rounds_to_four_places() {
        assert_eq!(normalize_number(Some("2.123456")), dec!(2.1235));
        assert_eq!(normalize_number(Some("0,00004")), Decimal::ZERO);
    }

    #[test]
    fn scientific_notation() {
        assert_eq!(normalize_number(Some("1e3")), dec!(1000));
        assert_eq!(normalize_number(Some("2.5E-2")), dec!(0.025));
    }

    #[test]
    fn garbage_is_zero() {
        assert_eq!(normalize_number(Some("abc")), Decimal::ZERO);
        assert_eq!(normalize_number(Some("12,34,56.7.8")), Decimal::ZERO);
        assert_eq!(normalize_number(Some("R$")), Decimal::ZERO);
    }
}
