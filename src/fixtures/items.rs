//! Item Fixtures

use std::str::FromStr;

use rust_decimal::{Decimal, prelude::ToPrimitive};
use rusty_money::iso::{self, Currency};
use serde::Deserialize;

use crate::fixtures::FixtureError;

/// Wrapper for a catalogue in YAML
#[derive(Debug, Deserialize)]
pub struct ItemsFixture {
    /// Catalogue display name
    pub name: String,

    /// Items, in catalogue order
    pub items: Vec<ItemFixture>,
}

/// Item fixture from YAML
#[derive(Debug, Deserialize)]
pub struct ItemFixture {
    /// Key used by offer and basket fixtures to refer to this item
    pub key: String,

    /// Item display name
    pub name: String,

    /// Unit price (e.g., "0.99 GBP")
    pub price: String,
}

/// Parse a price string (e.g., "2.50 GBP") into minor units and a currency.
///
/// # Errors
///
/// Returns an error if the string isn't an amount followed by a known currency code, or the
/// amount is negative or has more decimal places than the currency allows.
pub fn parse_price(price: &str) -> Result<(i64, &'static Currency), FixtureError> {
    let invalid = || FixtureError::InvalidPrice(price.to_string());

    let mut parts = price.split_whitespace();

    let (Some(amount), Some(code), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(invalid());
    };

    let currency = iso::find(code).ok_or_else(|| FixtureError::UnknownCurrency(code.to_string()))?;
    let amount = Decimal::from_str(amount).map_err(|_err| invalid())?;

    if amount.is_sign_negative() {
        return Err(invalid());
    }

    let scale = 10_i64
        .checked_pow(currency.exponent)
        .map(Decimal::from)
        .ok_or_else(invalid)?;

    let minor = amount.checked_mul(scale).ok_or_else(invalid)?;

    if !minor.fract().is_zero() {
        return Err(invalid());
    }

    let minor = minor.to_i64().ok_or_else(invalid)?;

    Ok((minor, currency))
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::{GBP, JPY};
    use testresult::TestResult;

    use super::*;

    #[test]
    fn parse_price_reads_amount_and_currency() -> TestResult {
        assert_eq!(parse_price("0.99 GBP")?, (99, GBP));
        assert_eq!(parse_price("3.5 GBP")?, (350, GBP));
        assert_eq!(parse_price("  12 GBP ")?, (1_200, GBP));
        assert_eq!(parse_price("150 JPY")?, (150, JPY));

        Ok(())
    }

    #[test]
    fn parse_price_rejects_malformed_strings() {
        for price in ["", "0.99", "GBP", "0.99 GBP extra", "abc GBP", "-1.00 GBP", "0.999 GBP"] {
            assert!(
                matches!(parse_price(price), Err(FixtureError::InvalidPrice(_))),
                "expected {price:?} to be rejected"
            );
        }
    }

    #[test]
    fn parse_price_rejects_unknown_currency() {
        assert!(matches!(
            parse_price("1.00 XYZ"),
            Err(FixtureError::UnknownCurrency(code)) if code == "XYZ"
        ));
    }

    #[test]
    fn items_fixture_parses_yaml() -> TestResult {
        let yaml = r"
name: Groceries
items:
  - key: beans
    name: Baked Beans
    price: 0.99 GBP
  - key: biscuits
    name: Biscuits
    price: 1.20 GBP
";
        let fixture: ItemsFixture = serde_norway::from_str(yaml)?;

        let keys: Vec<&str> = fixture.items.iter().map(|item| item.key.as_str()).collect();

        assert_eq!(fixture.name, "Groceries");
        assert_eq!(keys, vec!["beans", "biscuits"]);

        Ok(())
    }
}
