//! Catalogue
//!
//! The authoritative item → price lookup used while pricing a basket.

use rusty_money::iso::Currency;
use slotmap::SlotMap;
use thiserror::Error;

use crate::items::{Item, ItemKey};

/// Errors related to catalogue construction or lookups.
#[derive(Debug, Error, PartialEq)]
pub enum CatalogueError {
    /// A basket line references an item absent from the catalogue.
    #[error("Item {0:?} not found in catalogue")]
    ItemNotFound(ItemKey),

    /// An item's currency differs from the catalogue currency.
    #[error("Item {name} has currency {item_currency}, but catalogue has currency {catalogue_currency}")]
    CurrencyMismatch {
        /// Display name of the rejected item
        name: String,

        /// ISO code of the item's currency
        item_currency: &'static str,

        /// ISO code of the catalogue's currency
        catalogue_currency: &'static str,
    },
}

/// Item lookup collaborator for the pricing engine.
pub trait Catalogue<'a> {
    /// Find an item by key.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogueError::ItemNotFound`] if no item has the given key.
    fn find(&self, key: ItemKey) -> Result<&Item<'a>, CatalogueError>;

    /// Currency every item in the catalogue is priced in.
    fn currency(&self) -> &'a Currency;
}

/// In-memory catalogue of items priced in a single currency.
#[derive(Debug, Clone)]
pub struct ItemCatalogue<'a> {
    name: String,
    currency: &'a Currency,
    items: SlotMap<ItemKey, Item<'a>>,
}

impl<'a> ItemCatalogue<'a> {
    /// Create an empty catalogue.
    pub fn new(name: impl Into<String>, currency: &'a Currency) -> Self {
        Self {
            name: name.into(),
            currency,
            items: SlotMap::with_key(),
        }
    }

    /// Display name of the catalogue.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Add an item, returning its newly generated key.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogueError::CurrencyMismatch`] if the item is priced in another currency.
    pub fn insert(&mut self, item: Item<'a>) -> Result<ItemKey, CatalogueError> {
        let item_currency = item.price().currency();

        if item_currency != self.currency {
            return Err(CatalogueError::CurrencyMismatch {
                name: item.name().to_string(),
                item_currency: item_currency.iso_alpha_code,
                catalogue_currency: self.currency.iso_alpha_code,
            });
        }

        Ok(self.items.insert(item))
    }

    /// Remove an item from the catalogue.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogueError::ItemNotFound`] if the key is unknown.
    pub fn remove(&mut self, key: ItemKey) -> Result<Item<'a>, CatalogueError> {
        self.items
            .remove(key)
            .ok_or(CatalogueError::ItemNotFound(key))
    }

    /// Iterate over the items and their keys.
    pub fn iter(&self) -> impl Iterator<Item = (ItemKey, &Item<'a>)> {
        self.items.iter()
    }

    /// Number of items in the catalogue.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the catalogue is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<'a> Catalogue<'a> for ItemCatalogue<'a> {
    fn find(&self, key: ItemKey) -> Result<&Item<'a>, CatalogueError> {
        self.items.get(key).ok_or(CatalogueError::ItemNotFound(key))
    }

    fn currency(&self) -> &'a Currency {
        self.currency
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::{
        Money,
        iso::{GBP, USD},
    };
    use testresult::TestResult;

    use super::*;

    #[test]
    fn insert_and_find_item() -> TestResult {
        let mut catalogue = ItemCatalogue::new("Groceries", GBP);

        let beans = catalogue.insert(Item::new("Baked Beans", Money::from_minor(99, GBP)))?;
        let item = catalogue.find(beans)?;

        assert_eq!(catalogue.name(), "Groceries");
        assert_eq!(item.name(), "Baked Beans");
        assert_eq!(item.price().to_minor_units(), 99);
        assert_eq!(catalogue.currency(), GBP);

        Ok(())
    }

    #[test]
    fn insert_generates_distinct_keys() -> TestResult {
        let mut catalogue = ItemCatalogue::new("Groceries", GBP);

        let a = catalogue.insert(Item::new("Biscuits", Money::from_minor(120, GBP)))?;
        let b = catalogue.insert(Item::new("Biscuits", Money::from_minor(120, GBP)))?;

        assert_ne!(a, b);
        assert_eq!(catalogue.len(), 2);

        Ok(())
    }

    #[test]
    fn insert_rejects_currency_mismatch() {
        let mut catalogue = ItemCatalogue::new("Groceries", GBP);

        let result = catalogue.insert(Item::new("Sardines", Money::from_minor(189, USD)));

        assert_eq!(
            result,
            Err(CatalogueError::CurrencyMismatch {
                name: "Sardines".to_string(),
                item_currency: "USD",
                catalogue_currency: "GBP",
            })
        );
        assert!(catalogue.is_empty());
    }

    #[test]
    fn find_missing_item_returns_error() {
        let catalogue = ItemCatalogue::new("Groceries", GBP);
        let key = ItemKey::default();

        assert_eq!(
            catalogue.find(key).err(),
            Some(CatalogueError::ItemNotFound(key))
        );
    }

    #[test]
    fn remove_makes_item_unfindable() -> TestResult {
        let mut catalogue = ItemCatalogue::new("Groceries", GBP);
        let beans = catalogue.insert(Item::new("Baked Beans", Money::from_minor(99, GBP)))?;

        let removed = catalogue.remove(beans)?;

        assert_eq!(removed.name(), "Baked Beans");
        assert!(matches!(
            catalogue.find(beans),
            Err(CatalogueError::ItemNotFound(_))
        ));
        assert!(matches!(
            catalogue.remove(beans),
            Err(CatalogueError::ItemNotFound(_))
        ));

        Ok(())
    }

    #[test]
    fn iter_yields_all_items() -> TestResult {
        let mut catalogue = ItemCatalogue::new("Groceries", GBP);

        catalogue.insert(Item::new("Baked Beans", Money::from_minor(99, GBP)))?;
        catalogue.insert(Item::new("Biscuits", Money::from_minor(120, GBP)))?;

        let names: Vec<&str> = catalogue.iter().map(|(_, item)| item.name()).collect();

        assert_eq!(names, vec!["Baked Beans", "Biscuits"]);

        Ok(())
    }
}
