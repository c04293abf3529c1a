//! Pricer
//!
//! Pricer prices shopping baskets against a catalogue of items and a set of promotional offers,
//! producing a subtotal, the total discount earned and the amount to pay.
//!
//! ```
//! use pricer::prelude::*;
//! use rust_decimal::Decimal;
//! use rusty_money::{Money, iso::GBP};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut catalogue = ItemCatalogue::new("Groceries", GBP);
//! let beans = catalogue.insert(Item::new("Baked Beans", Money::from_minor(99, GBP)))?;
//!
//! let mut offers = OfferSet::new();
//! offers.insert(Offer::percentage([beans], Decimal::from(10), "10% off beans")?);
//!
//! let basket = Basket::with_lines([(beans, 10)])?;
//! let receipt = PricingEngine::new(&catalogue, &offers).compute(&basket)?;
//!
//! assert_eq!(receipt.total(), Money::from_minor(891, GBP));
//! # Ok(())
//! # }
//! ```

pub mod basket;
pub mod catalogue;
pub mod discounts;
pub mod fixtures;
pub mod items;
pub mod offers;
pub mod prelude;
pub mod pricing;
pub mod receipt;
pub mod utils;
