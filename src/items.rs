//! Items

use rusty_money::{Money, iso::Currency};
use slotmap::new_key_type;

new_key_type! {
    /// Item Key
    pub struct ItemKey;
}

/// A purchasable item with a display name and unit price.
#[derive(Clone, Debug, PartialEq)]
pub struct Item<'a> {
    name: String,
    price: Money<'a, Currency>,
}

impl<'a> Item<'a> {
    /// Creates a new item with the given name and unit price.
    pub fn new(name: impl Into<String>, price: Money<'a, Currency>) -> Self {
        Self {
            name: name.into(),
            price,
        }
    }

    /// Returns the display name of the item
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the unit price of the item
    pub fn price(&self) -> &Money<'a, Currency> {
        &self.price
    }
}
