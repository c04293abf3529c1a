//! Multi Item Discounts
//!
//! Cheapest-from-set arithmetic. Every item instance in the pool is ordered by price, most
//! expensive first, and chunked into groups of the offer's group size. The last (cheapest)
//! instance of every full group is free; a trailing partial group earns nothing.
//!
//! Instances are never expanded one by one: pooled lines are sorted as runs of equal price, and
//! the free positions falling inside each run are counted directly.

use std::cmp::Reverse;

use rusty_money::{Money, iso::Currency};
use smallvec::SmallVec;

use crate::{
    discounts::DiscountError,
    pricing::units::{MultiItemUnit, PooledItem},
};

/// Calculate the discount a multi-item unit contributes.
///
/// Instances with equal prices keep their pool order.
///
/// # Errors
///
/// Returns an error if a pooled price is in a different currency, or the discount overflows
/// minor units.
pub fn calculate_discount<'a>(
    unit: &MultiItemUnit<'a>,
    currency: &'a Currency,
) -> Result<Money<'a, Currency>, DiscountError> {
    let zero = Money::from_minor(0, currency);
    let group_size = u64::from(unit.group_size);

    if group_size == 0 {
        return Ok(zero);
    }

    let mut runs: SmallVec<[&PooledItem<'a>; 4]> = unit.pool.iter().collect();

    runs.sort_by_key(|pooled| Reverse(pooled.price.to_minor_units()));

    let instances = runs
        .iter()
        .try_fold(0u64, |acc, pooled| acc.checked_add(u64::from(pooled.quantity)))
        .ok_or(DiscountError::Overflow)?;

    // Positions past the last full group are never free
    let grouped = instances - instances % group_size;

    let mut start = 0u64;
    let mut discount = zero;

    for pooled in runs {
        if start >= grouped {
            break;
        }

        let end = start + u64::from(pooled.quantity);

        // Free positions are those `p` with `(p + 1) % group_size == 0`
        let free = end.min(grouped) / group_size - start / group_size;

        if free > 0 {
            let amount = i64::try_from(free)
                .ok()
                .and_then(|free| pooled.price.to_minor_units().checked_mul(free))
                .ok_or(DiscountError::Overflow)?;

            discount = discount.add(Money::from_minor(amount, pooled.price.currency()))?;
        }

        start = end;
    }

    Ok(discount)
}
