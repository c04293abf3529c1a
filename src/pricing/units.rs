//! Discount Units
//!
//! Matches basket lines to the offers targeting them, and classifies every match by the shape
//! of its discount: per-line offers yield one [`SingleItemUnit`] per line, set-based offers pool
//! all of their matched lines into a single [`MultiItemUnit`].

use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use slotmap::SecondaryMap;
use smallvec::{SmallVec, smallvec};

use crate::{
    basket::{Basket, BasketLine},
    catalogue::{Catalogue, CatalogueError},
    discounts::{Discount, DiscountKind},
    items::{Item, ItemKey},
    offers::{Offer, OfferKey, OfferSet},
};

/// Discount rule applied to a single basket line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineDiscount {
    /// Percentage points off the line total
    Percentage {
        /// Percentage points
        rate: Decimal,
    },

    /// `free` units free for every full group of `buy`
    BuyNGetMFree {
        /// Group size
        buy: u32,

        /// Free units per full group
        free: u32,
    },
}

impl LineDiscount {
    /// Return the discount kind.
    pub fn kind(&self) -> DiscountKind {
        match self {
            LineDiscount::Percentage { .. } => DiscountKind::Percentage,
            LineDiscount::BuyNGetMFree { .. } => DiscountKind::BuyNGetMFree,
        }
    }
}

/// A basket line paired with one per-line offer.
#[derive(Debug, Clone, PartialEq)]
pub struct SingleItemUnit<'a> {
    /// Offer providing the discount
    pub offer: OfferKey,

    /// Item on the basket line
    pub item: ItemKey,

    /// Catalogue unit price of the item
    pub price: Money<'a, Currency>,

    /// Basket quantity of the item
    pub quantity: u32,

    /// Discount rule
    pub discount: LineDiscount,
}

/// One basket line's contribution to a pooled set.
#[derive(Debug, Clone, PartialEq)]
pub struct PooledItem<'a> {
    /// Item on the basket line
    pub item: ItemKey,

    /// Catalogue unit price of the item
    pub price: Money<'a, Currency>,

    /// Basket quantity of the item
    pub quantity: u32,
}

/// Every basket line matched by one set-based offer.
#[derive(Debug, Clone, PartialEq)]
pub struct MultiItemUnit<'a> {
    /// Offer providing the discount
    pub offer: OfferKey,

    /// Number of pooled instances per group
    pub group_size: u32,

    /// Matched lines, in basket order
    pub pool: SmallVec<[PooledItem<'a>; 4]>,
}

/// Discount units collected for one pricing computation.
#[derive(Debug, Default)]
pub struct DiscountUnits<'a> {
    single: SmallVec<[SingleItemUnit<'a>; 10]>,
    multi: SmallVec<[MultiItemUnit<'a>; 4]>,
}

impl<'a> DiscountUnits<'a> {
    /// Resolve every basket line and collect the discount units of the offers matching it.
    ///
    /// Offers without a discount contribute nothing, as do lines no offer targets.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogueError::ItemNotFound`] if any basket line references an unknown item;
    /// no units are returned in that case.
    pub fn collect<C: Catalogue<'a>>(
        catalogue: &C,
        offers: &OfferSet,
        basket: &Basket,
    ) -> Result<Self, CatalogueError> {
        let mut units = Self::default();
        let mut pools = SecondaryMap::new();

        for line in basket.iter() {
            let item = catalogue.find(line.item)?;

            for (offer_key, offer) in offers.matching(line.item) {
                units.push(&mut pools, offer_key, offer, line, item);
            }
        }

        units.multi = offers
            .iter()
            .filter_map(|(offer_key, _)| pools.remove(offer_key))
            .collect();

        Ok(units)
    }

    fn push(
        &mut self,
        pools: &mut SecondaryMap<OfferKey, MultiItemUnit<'a>>,
        offer_key: OfferKey,
        offer: &Offer,
        line: &BasketLine,
        item: &Item<'a>,
    ) {
        let Some(discount) = offer.discount() else {
            return;
        };

        let line_discount = match *discount {
            Discount::Percentage { rate } => LineDiscount::Percentage { rate },
            Discount::BuyNGetMFree { buy, free } => LineDiscount::BuyNGetMFree { buy, free },
            Discount::CheapestFromSet { group_size } => {
                let pooled = PooledItem {
                    item: line.item,
                    price: *item.price(),
                    quantity: line.quantity,
                };

                if let Some(unit) = pools.get_mut(offer_key) {
                    unit.pool.push(pooled);
                } else {
                    pools.insert(
                        offer_key,
                        MultiItemUnit {
                            offer: offer_key,
                            group_size,
                            pool: smallvec![pooled],
                        },
                    );
                }

                return;
            }
        };

        self.single.push(SingleItemUnit {
            offer: offer_key,
            item: line.item,
            price: *item.price(),
            quantity: line.quantity,
            discount: line_discount,
        });
    }

    /// Single-item units, in basket line order.
    pub fn single(&self) -> &[SingleItemUnit<'a>] {
        &self.single
    }

    /// Multi-item units, one per matched set-based offer, in offer order.
    pub fn multi(&self) -> impl Iterator<Item = &MultiItemUnit<'a>> {
        self.multi.iter()
    }
}
