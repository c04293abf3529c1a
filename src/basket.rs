//! Basket

use smallvec::SmallVec;
use thiserror::Error;

use crate::items::ItemKey;

/// Errors related to basket mutation.
#[derive(Debug, Error, PartialEq)]
pub enum BasketError {
    /// An item was not found in the basket.
    #[error("Item {0:?} not found in basket")]
    ItemNotFound(ItemKey),

    /// Adding to a line would overflow its quantity.
    #[error("Quantity of item {0:?} overflowed")]
    QuantityOverflow(ItemKey),
}

/// A single (item, quantity) line in a basket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BasketLine {
    /// Item on this line
    pub item: ItemKey,

    /// Number of units, always positive
    pub quantity: u32,
}

/// Basket
///
/// Lines are kept in the order their item was first added. Zero quantities are never stored.
#[derive(Debug, Clone, Default)]
pub struct Basket {
    lines: SmallVec<[BasketLine; 10]>,
}

impl Basket {
    /// Create an empty basket.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a basket from (item, quantity) pairs; repeated items are merged.
    ///
    /// # Errors
    ///
    /// Returns a `BasketError` if a merged quantity overflows.
    pub fn with_lines(lines: impl IntoIterator<Item = (ItemKey, u32)>) -> Result<Self, BasketError> {
        let mut basket = Self::new();

        lines
            .into_iter()
            .try_for_each(|(item, quantity)| basket.add(item, quantity))?;

        Ok(basket)
    }

    /// Add `quantity` units of an item. Adding zero units is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`BasketError::QuantityOverflow`] if the line quantity would overflow.
    pub fn add(&mut self, item: ItemKey, quantity: u32) -> Result<(), BasketError> {
        if quantity == 0 {
            return Ok(());
        }

        if let Some(line) = self.lines.iter_mut().find(|line| line.item == item) {
            line.quantity = line
                .quantity
                .checked_add(quantity)
                .ok_or(BasketError::QuantityOverflow(item))?;
        } else {
            self.lines.push(BasketLine { item, quantity });
        }

        Ok(())
    }

    /// Remove up to `quantity` units of an item, dropping the line once it reaches zero.
    ///
    /// # Errors
    ///
    /// Returns [`BasketError::ItemNotFound`] if the item is not in the basket.
    pub fn remove(&mut self, item: ItemKey, quantity: u32) -> Result<(), BasketError> {
        let idx = self
            .lines
            .iter()
            .position(|line| line.item == item)
            .ok_or(BasketError::ItemNotFound(item))?;

        let remaining = self
            .lines
            .get(idx)
            .map_or(0, |line| line.quantity.saturating_sub(quantity));

        if remaining == 0 {
            self.lines.remove(idx);
        } else if let Some(line) = self.lines.get_mut(idx) {
            line.quantity = remaining;
        }

        Ok(())
    }

    /// Quantity of an item in the basket, zero if absent.
    pub fn quantity(&self, item: ItemKey) -> u32 {
        self.lines
            .iter()
            .find(|line| line.item == item)
            .map_or(0, |line| line.quantity)
    }

    /// Iterate over the basket lines.
    pub fn iter(&self) -> impl Iterator<Item = &BasketLine> {
        self.lines.iter()
    }

    /// Get the number of lines in the basket.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Check if the basket is empty.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use slotmap::SlotMap;
    use testresult::TestResult;

    use super::*;

    fn item_keys<const N: usize>() -> [ItemKey; N] {
        let mut keys = SlotMap::<ItemKey, ()>::with_key();

        std::array::from_fn(|_| keys.insert(()))
    }

    #[test]
    fn add_merges_quantities_for_same_item() -> TestResult {
        let [beans] = item_keys();
        let mut basket = Basket::new();

        basket.add(beans, 2)?;
        basket.add(beans, 3)?;

        assert_eq!(basket.len(), 1);
        assert_eq!(basket.quantity(beans), 5);

        Ok(())
    }

    #[test]
    fn add_zero_quantity_is_not_stored() -> TestResult {
        let [beans] = item_keys();
        let mut basket = Basket::new();

        basket.add(beans, 0)?;

        assert!(basket.is_empty());

        Ok(())
    }

    #[test]
    fn add_rejects_quantity_overflow() -> TestResult {
        let [beans] = item_keys();
        let mut basket = Basket::new();

        basket.add(beans, u32::MAX)?;

        assert_eq!(
            basket.add(beans, 1),
            Err(BasketError::QuantityOverflow(beans))
        );
        assert_eq!(basket.quantity(beans), u32::MAX);

        Ok(())
    }

    #[test]
    fn lines_keep_first_insertion_order() -> TestResult {
        let [beans, biscuits, sardines] = item_keys();

        let basket = Basket::with_lines([(sardines, 1), (beans, 2), (biscuits, 1), (sardines, 1)])?;

        let items: Vec<ItemKey> = basket.iter().map(|line| line.item).collect();

        assert_eq!(items, vec![sardines, beans, biscuits]);
        assert_eq!(basket.quantity(sardines), 2);

        Ok(())
    }

    #[test]
    fn remove_decrements_and_drops_empty_lines() -> TestResult {
        let [beans, biscuits] = item_keys();
        let mut basket = Basket::with_lines([(beans, 4), (biscuits, 1)])?;

        basket.remove(beans, 1)?;
        assert_eq!(basket.quantity(beans), 3);

        basket.remove(beans, 10)?;
        assert_eq!(basket.quantity(beans), 0);
        assert_eq!(basket.len(), 1);

        Ok(())
    }

    #[test]
    fn remove_missing_item_returns_error() {
        let [beans] = item_keys();
        let mut basket = Basket::new();

        assert_eq!(
            basket.remove(beans, 1),
            Err(BasketError::ItemNotFound(beans))
        );
    }
}
