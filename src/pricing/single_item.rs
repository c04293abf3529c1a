//! Single Item Discounts
//!
//! Per-line discount arithmetic for percentage and buy-N-get-M-free offers.

use rusty_money::{Money, iso::Currency};

use crate::{
    discounts::{DiscountError, percent_of_minor, percentage_from_points},
    pricing::units::{LineDiscount, SingleItemUnit},
};

/// Calculate the discount a single-item unit contributes.
///
/// - Percentage: `price × quantity × rate / 100`, rounded once to minor units.
/// - Buy N get M free: `price × floor(quantity / buy) × free`; a partial group contributes nothing.
///
/// # Errors
///
/// Returns an error if the minor unit arithmetic overflows.
pub fn calculate_discount<'a>(
    unit: &SingleItemUnit<'a>,
) -> Result<Money<'a, Currency>, DiscountError> {
    let price = unit.price.to_minor_units();
    let quantity = i64::from(unit.quantity);

    let discount_minor = match unit.discount {
        LineDiscount::Percentage { rate } => {
            let line_total = price
                .checked_mul(quantity)
                .ok_or(DiscountError::Overflow)?;

            percent_of_minor(&percentage_from_points(rate), line_total)?
        }
        LineDiscount::BuyNGetMFree { buy, free } => {
            let groups = unit.quantity.checked_div(buy).unwrap_or(0);

            price
                .checked_mul(i64::from(groups))
                .and_then(|amount| amount.checked_mul(i64::from(free)))
                .ok_or(DiscountError::Overflow)?
        }
    };

    Ok(Money::from_minor(discount_minor, unit.price.currency()))
}
