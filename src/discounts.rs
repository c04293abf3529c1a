//! Discounts
//!
//! The discount shapes an offer can carry, and the shared arithmetic used to
//! turn them into money amounts.

use decimal_percentage::Percentage;
use rust_decimal::{
    Decimal, RoundingStrategy,
    prelude::{FromPrimitive, ToPrimitive},
};
use rusty_money::MoneyError;
use thiserror::Error;

/// Errors specific to discount calculations.
#[derive(Debug, Error, PartialEq)]
pub enum DiscountError {
    /// Percentage calculation could not be safely converted.
    #[error("percentage conversion overflowed or was not finite")]
    PercentConversion,

    /// Minor unit arithmetic overflowed.
    #[error("discount amount overflowed minor units")]
    Overflow,

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Discount configuration carried by an offer.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Discount {
    /// Take a percentage off every matching basket line (e.g., "25% off")
    Percentage {
        /// Percentage points, between 0 and 100 inclusive
        rate: Decimal,
    },

    /// For every full group of `buy` units of a line, `free` of them cost nothing (e.g., "3 for 2")
    BuyNGetMFree {
        /// Group size
        buy: u32,

        /// Free units per full group
        free: u32,
    },

    /// Pool every matching item, and for every full group of `group_size` the cheapest is free
    CheapestFromSet {
        /// Group size
        group_size: u32,
    },
}

impl Discount {
    /// Return the kind of this discount.
    pub fn kind(&self) -> DiscountKind {
        match self {
            Discount::Percentage { .. } => DiscountKind::Percentage,
            Discount::BuyNGetMFree { .. } => DiscountKind::BuyNGetMFree,
            Discount::CheapestFromSet { .. } => DiscountKind::CheapestFromSet,
        }
    }
}

/// The discount kinds known to the engine.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum DiscountKind {
    /// Percentage off each line
    Percentage,

    /// Buy N get M free, per line
    BuyNGetMFree,

    /// Cheapest item free from a pooled set
    CheapestFromSet,
}

impl DiscountKind {
    /// Machine-readable name, as used in fixtures.
    pub fn name(self) -> &'static str {
        match self {
            DiscountKind::Percentage => "percentage",
            DiscountKind::BuyNGetMFree => "buy_n_get_m_free",
            DiscountKind::CheapestFromSet => "cheapest_from_set",
        }
    }

    /// Human-readable description.
    pub fn description(self) -> &'static str {
        match self {
            DiscountKind::Percentage => "Percentage discount",
            DiscountKind::BuyNGetMFree => "Buy N items and get M free",
            DiscountKind::CheapestFromSet => {
                "Buy N items of a set of products and get the cheapest for free"
            }
        }
    }
}

/// Calculate the discount amount in minor units based on a percentage and a minor unit amount.
///
/// # Errors
///
/// Returns an error if:
/// - The percentage calculation overflows or cannot be safely represented (`DiscountError::PercentConversion`).
pub fn percent_of_minor(percent: &Percentage, minor: i64) -> Result<i64, DiscountError> {
    let minor = Decimal::from_i64(minor).ok_or(DiscountError::PercentConversion)?;

    ((*percent) * Decimal::ONE) // decimal_percentage doesn't expose the underlying Decimal
        .checked_mul(minor)
        .ok_or(DiscountError::PercentConversion)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or(DiscountError::PercentConversion)
}

/// Convert percentage points (e.g., `25`) into a fractional [`Percentage`] (e.g., `0.25`).
pub fn percentage_from_points(points: Decimal) -> Percentage {
    Percentage::from(points / Decimal::ONE_HUNDRED)
}
