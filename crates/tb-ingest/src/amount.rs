//! Monetary cell parsing.

use std::str::FromStr;

use rust_decimal::Decimal;

/// Outcome of parsing one amount cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParsedAmount {
    /// Empty cell, treated as zero without comment.
    Blank,
    Value(Decimal),
    /// Not a number; the caller coerces to zero and records it.
    Invalid,
}

impl ParsedAmount {
    pub fn value_or_zero(self) -> Decimal {
        match self {
            Self::Value(value) => value,
            Self::Blank | Self::Invalid => Decimal::ZERO,
        }
    }
}

/// Parse a ledger amount.
///
/// Accepts currency symbols, thousands separators and accounting negatives,
/// so `"$1,234.50"`, `"(1,234.50)"` and `"-1234.5"` all parse.
pub fn parse_amount(raw: &str) -> ParsedAmount {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return ParsedAmount::Blank;
    }
    let (negative, body) = match trimmed
        .strip_prefix('(')
        .and_then(|rest| rest.strip_suffix(')'))
    {
        Some(inner) => (true, inner),
        None => (false, trimmed),
    };
    let cleaned: String = body
        .chars()
        .filter(|c| !matches!(c, '$' | ',') && !c.is_whitespace())
        .collect();
    if cleaned.is_empty() {
        return ParsedAmount::Invalid;
    }
    let parsed = Decimal::from_str(&cleaned).or_else(|_| Decimal::from_scientific(&cleaned));
    match parsed {
        Ok(value) if negative => ParsedAmount::Value(-value),
        Ok(value) => ParsedAmount::Value(value),
        Err(_) => ParsedAmount::Invalid,
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn plain_and_formatted_amounts() {
        assert_eq!(parse_amount("150"), ParsedAmount::Value(dec!(150)));
        assert_eq!(parse_amount(" -42.10 "), ParsedAmount::Value(dec!(-42.10)));
        assert_eq!(parse_amount("$1,234.56"), ParsedAmount::Value(dec!(1234.56)));
        assert_eq!(parse_amount("(1,234.56)"), ParsedAmount::Value(dec!(-1234.56)));
        assert_eq!(parse_amount("($75)"), ParsedAmount::Value(dec!(-75)));
        assert_eq!(parse_amount("1.5e3"), ParsedAmount::Value(dec!(1500)));
    }

    #[test]
    fn blank_and_invalid() {
        assert_eq!(parse_amount(""), ParsedAmount::Blank);
        assert_eq!(parse_amount("   "), ParsedAmount::Blank);
        assert_eq!(parse_amount("n/a"), ParsedAmount::Invalid);
        assert_eq!(parse_amount("$"), ParsedAmount::Invalid);
        assert_eq!(parse_amount("()"), ParsedAmount::Invalid);
        assert_eq!(parse_amount("n/a").value_or_zero(), Decimal::ZERO);
    }

    proptest! {
        #[test]
        fn cents_round_trip_through_text(cents in -10_000_000_000i64..10_000_000_000i64) {
            let value = Decimal::new(cents, 2);
            prop_assert_eq!(parse_amount(&value.to_string()), ParsedAmount::Value(value));
            let accounting = format!("({})", value.abs());
            prop_assert_eq!(parse_amount(&accounting), ParsedAmount::Value(-value.abs()));
        }
    }
}
