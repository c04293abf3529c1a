//! Pricing
//!
//! Prices a basket against a catalogue and a set of offers. Each matching offer is turned into a
//! discount unit, every unit is priced independently and the results are summed into a
//! [`Receipt`].

use rusty_money::{Money, MoneyError, iso::Currency};
use smallvec::{SmallVec, smallvec};
use thiserror::Error;
use tracing::{debug, trace};

use crate::{
    basket::Basket,
    catalogue::{Catalogue, CatalogueError},
    discounts::{DiscountError, DiscountKind},
    offers::{OfferSet, applications::OfferApplication},
    pricing::units::{DiscountUnits, MultiItemUnit, SingleItemUnit},
    receipt::Receipt,
};

pub mod multi_item;
pub mod single_item;
pub mod units;

/// Errors that abort pricing a basket.
#[derive(Debug, Error)]
pub enum PricingError {
    /// A basket line references an item the catalogue doesn't have.
    #[error(transparent)]
    Catalogue(#[from] CatalogueError),

    /// A discount could not be calculated.
    #[error(transparent)]
    Discount(#[from] DiscountError),

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Stateless pricing pipeline over a catalogue and an offer set.
#[derive(Debug)]
pub struct PricingEngine<'e, C> {
    catalogue: &'e C,
    offers: &'e OfferSet,
}

impl<'e, C> PricingEngine<'e, C> {
    /// Create a new engine.
    pub fn new(catalogue: &'e C, offers: &'e OfferSet) -> Self {
        Self { catalogue, offers }
    }

    /// Replace the catalogue.
    #[must_use]
    pub fn with_catalogue(self, catalogue: &'e C) -> Self {
        Self { catalogue, ..self }
    }

    /// Replace the offer set.
    #[must_use]
    pub fn with_offers(self, offers: &'e OfferSet) -> Self {
        Self { offers, ..self }
    }

    /// Catalogue used for item lookups
    pub fn catalogue(&self) -> &'e C {
        self.catalogue
    }

    /// Offers applied to every basket
    pub fn offers(&self) -> &'e OfferSet {
        self.offers
    }

    /// Bind the engine to a basket.
    pub fn bind<'b>(&self, basket: &'b Basket) -> BoundPricer<'_, 'b, 'e, C> {
        BoundPricer {
            engine: self,
            basket,
        }
    }
}

impl<'a, C: Catalogue<'a>> PricingEngine<'_, C> {
    /// Price a basket.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if a basket line references an unknown item, or a discount
    /// cannot be calculated. No partial result is returned.
    #[tracing::instrument(
        name = "price_basket",
        skip_all,
        fields(lines = basket.len(), offers = self.offers.len()),
        err
    )]
    pub fn compute(&self, basket: &Basket) -> Result<Receipt<'a>, PricingError> {
        let currency = self.catalogue.currency();
        let subtotal = self.subtotal(basket)?;

        let units = DiscountUnits::collect(self.catalogue, self.offers, basket)?;

        debug!(
            single = units.single().len(),
            multi = units.multi().count(),
            "collected discount units"
        );

        let mut applications: SmallVec<[OfferApplication<'a>; 8]> = SmallVec::new();

        for unit in units.single() {
            applications.push(apply_single(unit)?);
        }

        for unit in units.multi() {
            applications.push(apply_multi(unit, currency)?);
        }

        let discount = sum_discounts(&applications, currency)?;

        debug!(
            subtotal = %subtotal,
            discount = %discount,
            "priced basket"
        );

        Ok(Receipt::new(applications, subtotal, discount, currency)?)
    }

    /// Sum of `price × quantity` over every basket line.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if a basket line references an unknown item, or the sum
    /// overflows.
    pub fn subtotal(&self, basket: &Basket) -> Result<Money<'a, Currency>, PricingError> {
        let currency = self.catalogue.currency();

        basket.iter().try_fold(
            Money::from_minor(0, currency),
            |acc, line| -> Result<_, PricingError> {
                let item = self.catalogue.find(line.item)?;
                let amount = line_total(item.price(), line.quantity)?;

                Ok(acc.add(amount)?)
            },
        )
    }

    /// Total discount earned by the basket.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] under the same conditions as [`PricingEngine::compute`].
    pub fn discount(&self, basket: &Basket) -> Result<Money<'a, Currency>, PricingError> {
        let currency = self.catalogue.currency();
        let units = DiscountUnits::collect(self.catalogue, self.offers, basket)?;

        let single = units.single().iter().try_fold(
            Money::from_minor(0, currency),
            |acc, unit| -> Result<_, PricingError> {
                Ok(acc.add(single_item::calculate_discount(unit)?)?)
            },
        )?;

        units
            .multi()
            .try_fold(single, |acc, unit| -> Result<_, PricingError> {
                Ok(acc.add(multi_item::calculate_discount(unit, currency)?)?)
            })
    }
}

fn line_total<'a>(
    price: &Money<'a, Currency>,
    quantity: u32,
) -> Result<Money<'a, Currency>, DiscountError> {
    let minor = price
        .to_minor_units()
        .checked_mul(i64::from(quantity))
        .ok_or(DiscountError::Overflow)?;

    Ok(Money::from_minor(minor, price.currency()))
}

fn apply_single<'a>(unit: &SingleItemUnit<'a>) -> Result<OfferApplication<'a>, PricingError> {
    let discount = single_item::calculate_discount(unit)?;

    trace!(
        offer = ?unit.offer,
        item = ?unit.item,
        kind = unit.discount.kind().name(),
        quantity = unit.quantity,
        discount = %discount,
        "single item discount"
    );

    Ok(OfferApplication {
        offer: unit.offer,
        kind: unit.discount.kind(),
        items: smallvec![unit.item],
        quantity: unit.quantity,
        original_price: line_total(&unit.price, unit.quantity)?,
        discount,
    })
}

fn apply_multi<'a>(
    unit: &MultiItemUnit<'a>,
    currency: &'a Currency,
) -> Result<OfferApplication<'a>, PricingError> {
    let discount = multi_item::calculate_discount(unit, currency)?;

    let original_price = unit.pool.iter().try_fold(
        Money::from_minor(0, currency),
        |acc, pooled| -> Result<_, PricingError> {
            Ok(acc.add(line_total(&pooled.price, pooled.quantity)?)?)
        },
    )?;

    let quantity = unit
        .pool
        .iter()
        .try_fold(0u32, |acc, pooled| acc.checked_add(pooled.quantity))
        .ok_or(DiscountError::Overflow)?;

    trace!(
        offer = ?unit.offer,
        pooled = unit.pool.len(),
        quantity,
        discount = %discount,
        "multi item discount"
    );

    Ok(OfferApplication {
        offer: unit.offer,
        kind: DiscountKind::CheapestFromSet,
        items: unit.pool.iter().map(|pooled| pooled.item).collect(),
        quantity,
        original_price,
        discount,
    })
}

fn sum_discounts<'a>(
    applications: &[OfferApplication<'a>],
    currency: &'a Currency,
) -> Result<Money<'a, Currency>, MoneyError> {
    applications
        .iter()
        .try_fold(Money::from_minor(0, currency), |acc, app| {
            acc.add(app.discount)
        })
}

/// A pricing engine bound to one basket.
#[derive(Debug)]
pub struct BoundPricer<'p, 'b, 'e, C> {
    engine: &'p PricingEngine<'e, C>,
    basket: &'b Basket,
}

impl<'a, C: Catalogue<'a>> BoundPricer<'_, '_, '_, C> {
    /// Price the bound basket.
    ///
    /// # Errors
    ///
    /// See [`PricingEngine::compute`].
    pub fn compute(&self) -> Result<Receipt<'a>, PricingError> {
        self.engine.compute(self.basket)
    }

    /// Subtotal of the bound basket.
    ///
    /// # Errors
    ///
    /// See [`PricingEngine::subtotal`].
    pub fn subtotal(&self) -> Result<Money<'a, Currency>, PricingError> {
        self.engine.subtotal(self.basket)
    }

    /// Discount of the bound basket.
    ///
    /// # Errors
    ///
    /// See [`PricingEngine::discount`].
    pub fn discount(&self) -> Result<Money<'a, Currency>, PricingError> {
        self.engine.discount(self.basket)
    }

    /// Total of the bound basket.
    ///
    /// # Errors
    ///
    /// See [`PricingEngine::compute`].
    pub fn total(&self) -> Result<Money<'a, Currency>, PricingError> {
        Ok(self.compute()?.total())
    }
}
