//! Offer Applications

use decimal_percentage::Percentage;
use rust_decimal::{Decimal, prelude::FromPrimitive};
use rusty_money::{Money, MoneyError, iso::Currency};
use smallvec::SmallVec;

use crate::{discounts::DiscountKind, items::ItemKey, offers::OfferKey};

/// Result of applying one offer to the basket lines it matched
#[derive(Debug, Clone, PartialEq)]
pub struct OfferApplication<'a> {
    /// Key of the offer that was applied
    pub offer: OfferKey,

    /// Kind of discount the offer carries
    pub kind: DiscountKind,

    /// Items the offer was applied to, in basket order
    pub items: SmallVec<[ItemKey; 4]>,

    /// Number of units the offer was applied to
    pub quantity: u32,

    /// Full price of those units
    pub original_price: Money<'a, Currency>,

    /// Discount earned
    pub discount: Money<'a, Currency>,
}

impl<'a> OfferApplication<'a> {
    /// Price of the units after the discount.
    ///
    /// # Errors
    ///
    /// Returns an error if the original price and discount are in different currencies.
    pub fn final_price(&self) -> Result<Money<'a, Currency>, MoneyError> {
        self.original_price.sub(self.discount)
    }

    /// Calculates the discount as a percentage of the original price
    pub fn savings_percent(&self) -> Percentage {
        let original_minor = self.original_price.to_minor_units();

        if original_minor == 0 {
            return Percentage::from(0.0);
        }

        let discount_dec = Decimal::from_i64(self.discount.to_minor_units()).unwrap_or(Decimal::ZERO);
        let original_dec = Decimal::from_i64(original_minor).unwrap_or(Decimal::ONE);

        Percentage::from(discount_dec / original_dec)
    }
}
