//! Money normalization with decimal precision.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! All monetary values are `rust_decimal::Decimal`; this module is the single
//! place where provider-native or legacy-encoded amounts are normalized
//! before they reach computation or serialization boundaries.

use rust_decimal::Decimal;

/// Normalizes an optional stored amount, treating absent values as zero.
///
/// Applied uniformly to every nullable monetary column before the value
/// reaches the resolver or the reporting engine.
#[must_use]
pub fn from_optional(raw: Option<Decimal>) -> Decimal {
    raw.unwrap_or(Decimal::ZERO)
}

/// Parses a legacy string-encoded amount.
///
/// Legacy import data stores amounts with a comma decimal separator
/// ("1234,56"); the comma is replaced with a period before parsing.
/// Empty or non-numeric strings normalize to zero.
#[must_use]
pub fn parse_legacy(raw: &str) -> Decimal {
    let normalized = raw.trim().replacen(',', ".", 1);
    normalized.parse().unwrap_or(Decimal::ZERO)
}

/// Rounds an amount to centavo precision (2 decimal places).
#[must_use]
pub fn round_centavos(amount: Decimal) -> Decimal {
    amount.round_dp(2)
}

/// Truncates an amount down to centavo precision (2 decimal places).
///
/// Used when splitting a total into equal parts: flooring each part keeps
/// the remainder non-negative for whoever absorbs it.
#[must_use]
pub fn floor_centavos(amount: Decimal) -> Decimal {
    amount.trunc_with_scale(2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_from_optional_none_is_zero() {
        assert_eq!(from_optional(None), Decimal::ZERO);
    }

    #[test]
    fn test_from_optional_passes_value_through() {
        assert_eq!(from_optional(Some(dec!(1234.56))), dec!(1234.56));
    }

    #[test]
    fn test_parse_legacy_comma_separator() {
        assert_eq!(parse_legacy("1234,56"), dec!(1234.56));
        assert_eq!(parse_legacy("  0,50 "), dec!(0.50));
    }

    #[test]
    fn test_parse_legacy_period_separator() {
        assert_eq!(parse_legacy("1234.56"), dec!(1234.56));
    }

    #[test]
    fn test_parse_legacy_garbage_is_zero() {
        assert_eq!(parse_legacy(""), Decimal::ZERO);
        assert_eq!(parse_legacy("abc"), Decimal::ZERO);
        assert_eq!(parse_legacy("12,34,56"), Decimal::ZERO);
    }

    #[test]
    fn test_normalization_is_idempotent() {
        let once = parse_legacy("987,65");
        let twice = parse_legacy(&once.to_string());
        assert_eq!(once, twice);

        let value = from_optional(Some(dec!(10.00)));
        assert_eq!(from_optional(Some(value)), value);
    }

    #[test]
    fn test_round_centavos() {
        assert_eq!(round_centavos(dec!(2666.666666)), dec!(2666.67));
        assert_eq!(round_centavos(dec!(2666.66)), dec!(2666.66));
    }

    #[test]
    fn test_floor_centavos_never_rounds_up() {
        assert_eq!(floor_centavos(dec!(2666.666666)), dec!(2666.66));
        assert_eq!(floor_centavos(dec!(0.006)), dec!(0.00));
        assert_eq!(floor_centavos(dec!(0.019)), dec!(0.01));
        assert_eq!(floor_centavos(dec!(100.00)), dec!(100.00));
    }
}
