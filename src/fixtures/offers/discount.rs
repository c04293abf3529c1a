//! Discount Fixtures

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::{discounts::Discount, fixtures::FixtureError};

/// Discount configuration from YAML fixtures
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DiscountFixtureConfig {
    /// Percentage off each matching line
    Percentage {
        /// Percentage points (e.g., "25" or "25%")
        rate: String,
    },

    /// Buy N get M free on each matching line
    BuyNGetMFree {
        /// Group size
        buy: u32,

        /// Free units per full group
        free: u32,
    },

    /// Cheapest item free in every full group of matching items
    CheapestFromSet {
        /// Group size
        group_size: u32,
    },

    /// Any other discount type; the offer is kept but never discounts
    #[serde(other)]
    Unrecognised,
}

impl TryFrom<DiscountFixtureConfig> for Option<Discount> {
    type Error = FixtureError;

    fn try_from(config: DiscountFixtureConfig) -> Result<Self, Self::Error> {
        let discount = match config {
            DiscountFixtureConfig::Percentage { rate } => Discount::Percentage {
                rate: parse_rate(&rate)?,
            },
            DiscountFixtureConfig::BuyNGetMFree { buy, free } => {
                Discount::BuyNGetMFree { buy, free }
            }
            DiscountFixtureConfig::CheapestFromSet { group_size } => {
                Discount::CheapestFromSet { group_size }
            }
            DiscountFixtureConfig::Unrecognised => return Ok(None),
        };

        Ok(Some(discount))
    }
}

/// Parse a percentage rate in points, with or without a trailing `%`.
///
/// # Errors
///
/// Returns [`FixtureError::InvalidPercentage`] if the rate isn't a decimal number.
pub fn parse_rate(rate: &str) -> Result<Decimal, FixtureError> {
    let trimmed = rate.trim();
    let points = trimmed.strip_suffix('%').unwrap_or(trimmed).trim_end();

    Decimal::from_str(points).map_err(|_err| FixtureError::InvalidPercentage(rate.to_string()))
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn parse_rate_accepts_optional_percent_sign() -> TestResult {
        assert_eq!(parse_rate("25")?, Decimal::from(25));
        assert_eq!(parse_rate("25%")?, Decimal::from(25));
        assert_eq!(parse_rate(" 12.5 % ")?, Decimal::new(125, 1));

        Ok(())
    }

    #[test]
    fn parse_rate_rejects_non_numbers() {
        assert!(matches!(
            parse_rate("a quarter"),
            Err(FixtureError::InvalidPercentage(rate)) if rate == "a quarter"
        ));
    }

    #[test]
    fn discount_fixture_parses_each_known_type() -> TestResult {
        let percentage: DiscountFixtureConfig =
            serde_norway::from_str("type: percentage\nrate: \"25\"\n")?;
        let quantity: DiscountFixtureConfig =
            serde_norway::from_str("type: buy_n_get_m_free\nbuy: 2\nfree: 1\n")?;
        let set: DiscountFixtureConfig =
            serde_norway::from_str("type: cheapest_from_set\ngroup_size: 3\n")?;

        assert_eq!(
            Option::<Discount>::try_from(percentage)?,
            Some(Discount::Percentage {
                rate: Decimal::from(25)
            })
        );
        assert_eq!(
            Option::<Discount>::try_from(quantity)?,
            Some(Discount::BuyNGetMFree { buy: 2, free: 1 })
        );
        assert_eq!(
            Option::<Discount>::try_from(set)?,
            Some(Discount::CheapestFromSet { group_size: 3 })
        );

        Ok(())
    }

    #[test]
    fn discount_fixture_accepts_unknown_type_as_no_discount() -> TestResult {
        let yaml = r"
type: bundle_price
price: 5.00 GBP
";
        let config: DiscountFixtureConfig = serde_norway::from_str(yaml)?;

        assert!(matches!(config, DiscountFixtureConfig::Unrecognised));
        assert_eq!(Option::<Discount>::try_from(config)?, None);

        Ok(())
    }

    #[test]
    fn discount_fixture_rejects_missing_parameters() {
        let result: Result<DiscountFixtureConfig, _> =
            serde_norway::from_str("type: buy_n_get_m_free\nbuy: 2\n");

        assert!(result.is_err());
    }
}
