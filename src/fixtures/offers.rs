//! Offer Fixtures

use serde::Deserialize;
use tracing::warn;

use crate::{
    discounts::Discount,
    fixtures::{FixtureError, offers::discount::DiscountFixtureConfig},
    items::ItemKey,
    offers::Offer,
};

mod discount;

pub use discount::parse_rate;

/// Wrapper for offers in YAML
#[derive(Debug, Deserialize)]
pub struct OffersFixture {
    /// Offers, in the order they are applied
    pub offers: Vec<OfferFixture>,
}

/// Offer fixture from YAML
#[derive(Debug, Deserialize)]
pub struct OfferFixture {
    /// Key used to look the offer up after loading
    pub key: String,

    /// Offer description
    pub description: String,

    /// Item fixture keys the offer targets
    pub items: Vec<String>,

    /// Discount configuration
    pub discount: DiscountFixtureConfig,
}

impl OfferFixture {
    /// Convert to an [`Offer`], resolving item fixture keys with `resolve`.
    ///
    /// # Errors
    ///
    /// Returns an error if an item key cannot be resolved, the rate cannot be parsed, or the
    /// offer configuration is invalid.
    pub fn try_into_offer(
        self,
        resolve: impl Fn(&str) -> Result<ItemKey, FixtureError>,
    ) -> Result<Offer, FixtureError> {
        let items = self
            .items
            .iter()
            .map(|key| resolve(key))
            .collect::<Result<Vec<_>, _>>()?;

        let discount = Option::<Discount>::try_from(self.discount)?;

        if discount.is_none() {
            warn!(
                offer = %self.key,
                "unrecognised discount type, offer will not discount"
            );
        }

        Ok(Offer::new(items, discount, self.description)?)
    }
}
