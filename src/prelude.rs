//! Pricer prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    basket::{Basket, BasketError, BasketLine},
    catalogue::{Catalogue, CatalogueError, ItemCatalogue},
    discounts::{Discount, DiscountError, DiscountKind},
    items::{Item, ItemKey},
    offers::{Offer, OfferError, OfferKey, OfferSet, applications::OfferApplication},
    pricing::{BoundPricer, PricingEngine, PricingError},
    receipt::{Receipt, ReceiptError},
};
