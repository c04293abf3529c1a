//! Fixtures
//!
//! Load catalogues, offers and baskets from YAML fixture sets, addressed by human-readable keys.

use std::{fs, path::PathBuf};

use rustc_hash::FxHashMap;
use rusty_money::{Money, iso::Currency};
use thiserror::Error;

use crate::{
    basket::{Basket, BasketError},
    catalogue::{Catalogue, CatalogueError, ItemCatalogue},
    fixtures::{baskets::BasketFixture, items::ItemsFixture, offers::OffersFixture},
    items::{Item, ItemKey},
    offers::{OfferError, OfferKey, OfferSet},
    pricing::PricingEngine,
};

pub mod baskets;
pub mod items;
pub mod offers;

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Invalid percentage format
    #[error("Invalid percentage format: {0}")]
    InvalidPercentage(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Currency mismatch between items
    #[error("Currency mismatch: expected {0}, found {1}")]
    CurrencyMismatch(String, String),

    /// No items loaded yet
    #[error("No items loaded yet; currency unknown")]
    NoCurrency,

    /// Item not found
    #[error("Item not found: {0}")]
    ItemNotFound(String),

    /// Offer not found
    #[error("Offer not found: {0}")]
    OfferNotFound(String),

    /// Catalogue rejected an item
    #[error(transparent)]
    Catalogue(#[from] CatalogueError),

    /// Invalid offer configuration
    #[error("Invalid offer: {0}")]
    Offer(#[from] OfferError),

    /// Basket creation error
    #[error("Failed to create basket: {0}")]
    Basket(#[from] BasketError),
}

/// Fixture
#[derive(Debug)]
pub struct Fixture {
    /// Base path for fixture files
    base_path: PathBuf,

    /// Catalogue, created when the first items are loaded
    catalogue: Option<ItemCatalogue<'static>>,

    /// Loaded offers
    offers: OfferSet,

    /// Loaded basket
    basket: Basket,

    /// String key -> `SlotMap` key mappings for lookups
    item_keys: FxHashMap<String, ItemKey>,
    offer_keys: FxHashMap<String, OfferKey>,
}

impl Fixture {
    /// Create a new empty fixture with default base path
    pub fn new() -> Self {
        Self::with_base_path("./fixtures")
    }

    /// Create a new empty fixture with custom base path
    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            catalogue: None,
            offers: OfferSet::new(),
            basket: Basket::new(),
            item_keys: FxHashMap::default(),
            offer_keys: FxHashMap::default(),
        }
    }

    fn read<T: serde::de::DeserializeOwned>(
        &self,
        category: &str,
        name: &str,
    ) -> Result<T, FixtureError> {
        let file_path = self.base_path.join(category).join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;

        Ok(serde_norway::from_str(&contents)?)
    }

    /// Load items from a YAML fixture file into the catalogue
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, a price is invalid, or the items
    /// are priced in a different currency than those already loaded.
    pub fn load_items(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let fixture: ItemsFixture = self.read("items", name)?;

        for item_fixture in fixture.items {
            let (minor_units, currency) = items::parse_price(&item_fixture.price)?;

            let catalogue = self.catalogue_for(&fixture.name, currency)?;
            let item = Item::new(item_fixture.name, Money::from_minor(minor_units, currency));
            let item_key = catalogue.insert(item)?;

            self.item_keys.insert(item_fixture.key, item_key);
        }

        Ok(self)
    }

    fn catalogue_for(
        &mut self,
        name: &str,
        currency: &'static Currency,
    ) -> Result<&mut ItemCatalogue<'static>, FixtureError> {
        let catalogue = self
            .catalogue
            .get_or_insert_with(|| ItemCatalogue::new(name, currency));

        if catalogue.currency() != currency {
            return Err(FixtureError::CurrencyMismatch(
                catalogue.currency().iso_alpha_code.to_string(),
                currency.iso_alpha_code.to_string(),
            ));
        }

        Ok(catalogue)
    }

    /// Load offers from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, an offer references an item that
    /// hasn't been loaded, or an offer configuration is invalid.
    pub fn load_offers(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let fixture: OffersFixture = self.read("offers", name)?;

        for offer_fixture in fixture.offers {
            let key = offer_fixture.key.clone();
            let offer = offer_fixture.try_into_offer(|item| self.item_key(item))?;

            let offer_key = self.offers.insert(offer);

            self.offer_keys.insert(key, offer_key);
        }

        Ok(self)
    }

    /// Load basket lines from a YAML fixture file, adding to any lines already loaded
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, a line references an item that
    /// hasn't been loaded, or a quantity overflows.
    pub fn load_basket(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let fixture: BasketFixture = self.read("baskets", name)?;

        for line in fixture.lines {
            let item_key = self.item_key(&line.item)?;

            self.basket.add(item_key, line.quantity)?;
        }

        Ok(self)
    }

    /// Load a complete fixture set (items, offers, and basket with the same name)
    ///
    /// # Errors
    ///
    /// Returns an error if any of the fixture files cannot be loaded.
    pub fn from_set(name: &str) -> Result<Self, FixtureError> {
        let mut fixture = Self::new();

        fixture
            .load_items(name)?
            .load_offers(name)?
            .load_basket(name)?;

        Ok(fixture)
    }

    /// Get an item key by its string key
    ///
    /// # Errors
    ///
    /// Returns an error if the item is not found.
    pub fn item_key(&self, key: &str) -> Result<ItemKey, FixtureError> {
        self.item_keys
            .get(key)
            .copied()
            .ok_or_else(|| FixtureError::ItemNotFound(key.to_string()))
    }

    /// Get an offer key by its string key
    ///
    /// # Errors
    ///
    /// Returns an error if the offer is not found.
    pub fn offer_key(&self, key: &str) -> Result<OfferKey, FixtureError> {
        self.offer_keys
            .get(key)
            .copied()
            .ok_or_else(|| FixtureError::OfferNotFound(key.to_string()))
    }

    /// Get the catalogue
    ///
    /// # Errors
    ///
    /// Returns an error if no items have been loaded yet.
    pub fn catalogue(&self) -> Result<&ItemCatalogue<'static>, FixtureError> {
        self.catalogue.as_ref().ok_or(FixtureError::NoCurrency)
    }

    /// Get the currency
    ///
    /// # Errors
    ///
    /// Returns an error if no items have been loaded yet.
    pub fn currency(&self) -> Result<&'static Currency, FixtureError> {
        Ok(self.catalogue()?.currency())
    }

    /// Get all offers
    pub fn offers(&self) -> &OfferSet {
        &self.offers
    }

    /// Get the basket
    pub fn basket(&self) -> &Basket {
        &self.basket
    }

    /// Create a pricing engine over the loaded catalogue and offers
    ///
    /// # Errors
    ///
    /// Returns an error if no items have been loaded yet.
    pub fn engine(&self) -> Result<PricingEngine<'_, ItemCatalogue<'static>>, FixtureError> {
        Ok(PricingEngine::new(self.catalogue()?, &self.offers))
    }
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}
