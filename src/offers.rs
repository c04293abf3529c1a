//! Offers
//!
//! Promotional offers and the ordered set of offers a basket is priced against.

use rust_decimal::Decimal;
use slotmap::{SlotMap, new_key_type};
use smallvec::SmallVec;
use thiserror::Error;

use crate::{discounts::Discount, items::ItemKey};

pub mod applications;

new_key_type! {
    /// Offer Key
    pub struct OfferKey;
}

/// Errors raised when an offer's configuration is invalid, or an offer is missing.
#[derive(Debug, Error, PartialEq)]
pub enum OfferError {
    /// The offer does not target any item.
    #[error("offer must apply to at least one item")]
    NoItems,

    /// Percentage rate outside of `[0, 100]`.
    #[error("percentage rate {0} is outside of 0..=100")]
    InvalidPercentage(Decimal),

    /// The buy quantity of a buy-N-get-M-free offer was zero.
    #[error("buy quantity must be greater than zero")]
    InvalidBuyQuantity,

    /// The free quantity of a buy-N-get-M-free offer was not smaller than the buy quantity.
    #[error("free quantity {free} must be less than buy quantity {buy}")]
    InvalidFreeQuantity {
        /// Configured buy quantity
        buy: u32,

        /// Configured free quantity
        free: u32,
    },

    /// The group size of a cheapest-from-set offer was zero.
    #[error("group size must be greater than zero")]
    InvalidGroupSize,

    /// No offer exists with the given key.
    #[error("Offer {0:?} not found")]
    NotFound(OfferKey),
}

/// A promotional offer targeting a set of items.
#[derive(Debug, Clone)]
pub struct Offer {
    items: SmallVec<[ItemKey; 4]>,
    discount: Option<Discount>,
    description: String,
}

impl Offer {
    /// Create a new offer.
    ///
    /// An offer without a discount is valid and never contributes to a basket's discount.
    ///
    /// # Errors
    ///
    /// Returns an [`OfferError`] if no items are given, or the discount parameters are invalid.
    pub fn new(
        items: impl IntoIterator<Item = ItemKey>,
        discount: Option<Discount>,
        description: impl Into<String>,
    ) -> Result<Self, OfferError> {
        if let Some(discount) = &discount {
            validate(discount)?;
        }

        let mut offer = Self {
            items: SmallVec::new(),
            discount,
            description: description.into(),
        };

        items.into_iter().for_each(|item| offer.add_item(item));

        if offer.items.is_empty() {
            return Err(OfferError::NoItems);
        }

        Ok(offer)
    }

    /// Create a percentage offer; `rate` is in percentage points.
    ///
    /// # Errors
    ///
    /// Returns an [`OfferError`] if no items are given or `rate` is outside of `[0, 100]`.
    pub fn percentage(
        items: impl IntoIterator<Item = ItemKey>,
        rate: Decimal,
        description: impl Into<String>,
    ) -> Result<Self, OfferError> {
        Self::new(items, Some(Discount::Percentage { rate }), description)
    }

    /// Create a buy-N-get-M-free offer.
    ///
    /// # Errors
    ///
    /// Returns an [`OfferError`] if no items are given, `buy` is zero, or `free >= buy`.
    pub fn buy_n_get_m_free(
        items: impl IntoIterator<Item = ItemKey>,
        buy: u32,
        free: u32,
        description: impl Into<String>,
    ) -> Result<Self, OfferError> {
        Self::new(items, Some(Discount::BuyNGetMFree { buy, free }), description)
    }

    /// Create a cheapest-from-set offer.
    ///
    /// # Errors
    ///
    /// Returns an [`OfferError`] if no items are given or `group_size` is zero.
    pub fn cheapest_from_set(
        items: impl IntoIterator<Item = ItemKey>,
        group_size: u32,
        description: impl Into<String>,
    ) -> Result<Self, OfferError> {
        Self::new(
            items,
            Some(Discount::CheapestFromSet { group_size }),
            description,
        )
    }

    /// Add an item to the offer; already targeted items are ignored.
    pub fn add_item(&mut self, item: ItemKey) {
        if !self.applies_to(item) {
            self.items.push(item);
        }
    }

    /// Return whether the offer targets the given item.
    pub fn applies_to(&self, item: ItemKey) -> bool {
        self.items.contains(&item)
    }

    /// Return the targeted items
    pub fn items(&self) -> &[ItemKey] {
        &self.items
    }

    /// Return the discount, if one is set
    pub fn discount(&self) -> Option<&Discount> {
        self.discount.as_ref()
    }

    /// Return the description
    pub fn description(&self) -> &str {
        &self.description
    }
}

fn validate(discount: &Discount) -> Result<(), OfferError> {
    match *discount {
        Discount::Percentage { rate } => {
            if rate < Decimal::ZERO || rate > Decimal::ONE_HUNDRED {
                return Err(OfferError::InvalidPercentage(rate));
            }
        }
        Discount::BuyNGetMFree { buy, free } => {
            if buy == 0 {
                return Err(OfferError::InvalidBuyQuantity);
            }

            if free >= buy {
                return Err(OfferError::InvalidFreeQuantity { buy, free });
            }
        }
        Discount::CheapestFromSet { group_size } => {
            if group_size == 0 {
                return Err(OfferError::InvalidGroupSize);
            }
        }
    }

    Ok(())
}

/// Ordered collection of offers.
///
/// Offers iterate in insertion order, including after removals.
#[derive(Debug, Clone, Default)]
pub struct OfferSet {
    offers: SlotMap<OfferKey, Offer>,
    order: Vec<OfferKey>,
}

impl OfferSet {
    /// Create an empty offer set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an offer, returning its newly generated key.
    pub fn insert(&mut self, offer: Offer) -> OfferKey {
        let key = self.offers.insert(offer);

        self.order.push(key);

        key
    }

    /// Remove an offer.
    ///
    /// # Errors
    ///
    /// Returns [`OfferError::NotFound`] if the key is unknown.
    pub fn remove(&mut self, key: OfferKey) -> Result<Offer, OfferError> {
        let offer = self.offers.remove(key).ok_or(OfferError::NotFound(key))?;

        self.order.retain(|&ordered| ordered != key);

        Ok(offer)
    }

    /// Get an offer by key.
    ///
    /// # Errors
    ///
    /// Returns [`OfferError::NotFound`] if the key is unknown.
    pub fn get(&self, key: OfferKey) -> Result<&Offer, OfferError> {
        self.offers.get(key).ok_or(OfferError::NotFound(key))
    }

    /// Iterate over all offers in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (OfferKey, &Offer)> {
        self.order
            .iter()
            .filter_map(|&key| self.offers.get(key).map(|offer| (key, offer)))
    }

    /// Iterate over the offers that target the given item, in insertion order.
    pub fn matching(&self, item: ItemKey) -> impl Iterator<Item = (OfferKey, &Offer)> {
        self.iter().filter(move |(_, offer)| offer.applies_to(item))
    }

    /// Number of offers in the set.
    pub fn len(&self) -> usize {
        self.offers.len()
    }

    /// Check if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.offers.is_empty()
    }
}
