//! Receipt
//!
//! The priced result of a basket: subtotal, discount and total, along with one
//! [`OfferApplication`] per discount unit so every saving can be traced back to its offer.

use std::io;

use decimal_percentage::Percentage;
use rust_decimal::{Decimal, prelude::FromPrimitive};
use rusty_money::{Money, MoneyError, iso::Currency};
use smallvec::SmallVec;
use tabled::{
    builder::Builder,
    settings::{
        Alignment, Color, Style,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    catalogue::{Catalogue, CatalogueError},
    offers::{Offer, OfferKey, OfferSet, applications::OfferApplication},
};

/// Errors that can occur when building or rendering a receipt.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// Wrapper for money errors.
    #[error(transparent)]
    Money(#[from] MoneyError),

    /// Error finding an item in the catalogue.
    #[error(transparent)]
    Catalogue(#[from] CatalogueError),

    /// IO error
    #[error("IO error")]
    IO,
}

/// Final receipt for a priced basket.
#[derive(Debug, Clone)]
pub struct Receipt<'a> {
    /// Applications in the order they were calculated
    applications: SmallVec<[OfferApplication<'a>; 8]>,

    /// Total cost before any discount
    subtotal: Money<'a, Currency>,

    /// Sum of all application discounts
    discount: Money<'a, Currency>,

    /// Subtotal less discount
    total: Money<'a, Currency>,

    /// Currency used for all monetary values
    currency: &'a Currency,
}

impl<'a> Receipt<'a> {
    /// Create a new receipt; the total is always `subtotal - discount` and is not floored at zero.
    ///
    /// # Errors
    ///
    /// Returns a [`MoneyError`] if the subtotal and discount are in different currencies.
    pub fn new(
        applications: SmallVec<[OfferApplication<'a>; 8]>,
        subtotal: Money<'a, Currency>,
        discount: Money<'a, Currency>,
        currency: &'a Currency,
    ) -> Result<Self, MoneyError> {
        let total = subtotal.sub(discount)?;

        Ok(Self {
            applications,
            subtotal,
            discount,
            total,
            currency,
        })
    }

    /// Total cost before any discount
    pub fn subtotal(&self) -> Money<'a, Currency> {
        self.subtotal
    }

    /// Total discount from all applied offers
    pub fn discount(&self) -> Money<'a, Currency> {
        self.discount
    }

    /// Total amount to pay
    pub fn total(&self) -> Money<'a, Currency> {
        self.total
    }

    /// Currency used for all monetary values.
    pub fn currency(&self) -> &'a Currency {
        self.currency
    }

    /// Every offer application, including those which earned no discount.
    pub fn applications(&self) -> &[OfferApplication<'a>] {
        &self.applications
    }

    /// Applications produced by a given offer.
    pub fn applications_for_offer(
        &self,
        offer: OfferKey,
    ) -> impl Iterator<Item = &OfferApplication<'a>> {
        self.applications
            .iter()
            .filter(move |app| app.offer == offer)
    }

    /// Calculates the discount as a percentage of the subtotal
    pub fn savings_percent(&self) -> Percentage {
        let subtotal_minor = self.subtotal.to_minor_units();

        if subtotal_minor == 0 {
            return Percentage::from(0.0);
        }

        // Avoid integer division truncation by doing the ratio in decimal space.
        let discount_dec = Decimal::from_i64(self.discount.to_minor_units()).unwrap_or(Decimal::ZERO);
        let subtotal_dec = Decimal::from_i64(subtotal_minor).unwrap_or(Decimal::ONE);

        Percentage::from(discount_dec / subtotal_dec)
    }

    /// Writes the receipt as a table followed by a summary.
    ///
    /// # Errors
    ///
    /// Returns an error if an applied item is missing from the catalogue, or the receipt cannot
    /// be written.
    pub fn write_to<'c>(
        &self,
        mut out: impl io::Write,
        catalogue: &impl Catalogue<'c>,
        offers: &OfferSet,
    ) -> Result<(), ReceiptError> {
        let mut builder = Builder::default();

        builder.push_record(["", "Offer", "Type", "Items", "Qty", "Full Price", "Discount"]);

        for (idx, app) in self.applications.iter().enumerate() {
            let description = offers
                .get(app.offer)
                .map_or("<unknown>", Offer::description);

            let names = app
                .items
                .iter()
                .map(|&key| catalogue.find(key).map(|item| item.name().to_string()))
                .collect::<Result<Vec<_>, _>>()?;

            builder.push_record([
                format!("#{:<3}", idx + 1),
                description.to_string(),
                app.kind.description().to_string(),
                names.join("\n"),
                app.quantity.to_string(),
                format!("{}", app.original_price),
                format!("-{}", app.discount),
            ]);
        }

        let mut table = builder.build();

        table.with(Style::modern_rounded());
        table.modify(Rows::first(), Color::BOLD);
        table.modify(Columns::new(4..7), Alignment::right());

        writeln!(out, "\n{table}").map_err(|_err| ReceiptError::IO)?;

        self.write_summary(&mut out)
    }

    fn write_summary(&self, out: &mut impl io::Write) -> Result<(), ReceiptError> {
        let percent_points = (self.savings_percent() * Decimal::ONE_HUNDRED).round_dp(2);

        let rows = [
            (" Subtotal:", format!("{}", self.subtotal)),
            (
                " Discount:",
                format!("({percent_points}%) -{}", self.discount),
            ),
            (" Total:", format!("{}", self.total)),
        ];

        let value_width = rows.iter().map(|(_, value)| value.len()).max().unwrap_or(0);

        for (label, value) in rows {
            writeln!(out, "{label:<11}{value:>value_width$}").map_err(|_err| ReceiptError::IO)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use rusty_money::iso::{GBP, USD};
    use smallvec::smallvec;
    use testresult::TestResult;

    use crate::{
        catalogue::ItemCatalogue,
        discounts::DiscountKind,
        items::{Item, ItemKey},
        offers::Offer,
    };

    use super::*;

    fn application(offer: OfferKey, item: ItemKey, discount: i64) -> OfferApplication<'static> {
        OfferApplication {
            offer,
            kind: DiscountKind::BuyNGetMFree,
            items: smallvec![item],
            quantity: 4,
            original_price: Money::from_minor(396, GBP),
            discount: Money::from_minor(discount, GBP),
        }
    }

    #[test]
    fn total_is_subtotal_less_discount() -> TestResult {
        let receipt = Receipt::new(
            SmallVec::new(),
            Money::from_minor(516, GBP),
            Money::from_minor(198, GBP),
            GBP,
        )?;

        assert_eq!(receipt.total(), Money::from_minor(318, GBP));
        assert_eq!(receipt.currency(), GBP);

        Ok(())
    }

    #[test]
    fn total_is_not_floored_at_zero() -> TestResult {
        let receipt = Receipt::new(
            SmallVec::new(),
            Money::from_minor(100, GBP),
            Money::from_minor(150, GBP),
            GBP,
        )?;

        assert_eq!(receipt.total(), Money::from_minor(-50, GBP));

        Ok(())
    }

    #[test]
    fn new_rejects_currency_mismatch() {
        let result = Receipt::new(
            SmallVec::new(),
            Money::from_minor(100, GBP),
            Money::from_minor(10, USD),
            GBP,
        );

        assert!(result.is_err());
    }

    #[test]
    fn savings_percent_is_relative_to_subtotal() -> TestResult {
        let receipt = Receipt::new(
            SmallVec::new(),
            Money::from_minor(400, GBP),
            Money::from_minor(100, GBP),
            GBP,
        )?;

        assert_eq!(
            receipt.savings_percent(),
            Percentage::from(Decimal::new(25, 2))
        );

        Ok(())
    }

    #[test]
    fn savings_percent_zero_for_empty_basket() -> TestResult {
        let receipt = Receipt::new(
            SmallVec::new(),
            Money::from_minor(0, GBP),
            Money::from_minor(0, GBP),
            GBP,
        )?;

        assert_eq!(receipt.savings_percent(), Percentage::from(0.0));

        Ok(())
    }

    #[test]
    fn applications_for_offer_filters_by_key() -> TestResult {
        let mut catalogue = ItemCatalogue::new("Groceries", GBP);
        let beans = catalogue.insert(Item::new("Baked Beans", Money::from_minor(99, GBP)))?;

        let mut offers = OfferSet::new();
        let bogof = offers.insert(Offer::buy_n_get_m_free([beans], 2, 1, "BOGOF")?);
        let other = offers.insert(Offer::buy_n_get_m_free([beans], 4, 1, "4 for 3")?);

        let receipt = Receipt::new(
            smallvec![application(bogof, beans, 198), application(other, beans, 99)],
            Money::from_minor(396, GBP),
            Money::from_minor(297, GBP),
            GBP,
        )?;

        let discounts: Vec<i64> = receipt
            .applications_for_offer(bogof)
            .map(|app| app.discount.to_minor_units())
            .collect();

        assert_eq!(discounts, vec![198]);
        assert_eq!(receipt.applications().len(), 2);

        Ok(())
    }

    #[test]
    fn write_to_renders_applications_and_summary() -> TestResult {
        let mut catalogue = ItemCatalogue::new("Groceries", GBP);
        let beans = catalogue.insert(Item::new("Baked Beans", Money::from_minor(99, GBP)))?;

        let mut offers = OfferSet::new();
        let bogof = offers.insert(Offer::buy_n_get_m_free([beans], 2, 1, "Beans BOGOF")?);

        let receipt = Receipt::new(
            smallvec![application(bogof, beans, 198)],
            Money::from_minor(396, GBP),
            Money::from_minor(198, GBP),
            GBP,
        )?;

        let mut out = Vec::new();
        receipt.write_to(&mut out, &catalogue, &offers)?;

        let rendered = String::from_utf8(out)?;

        assert!(rendered.contains("Beans BOGOF"));
        assert!(rendered.contains("Baked Beans"));
        assert!(rendered.contains("Buy N items and get M free"));
        assert!(rendered.contains("Subtotal:"));
        assert!(rendered.contains("Total:"));
        assert!(rendered.contains("(50.00%)"));

        Ok(())
    }

    #[test]
    fn write_to_missing_item_returns_error() -> TestResult {
        let catalogue = ItemCatalogue::new("Groceries", GBP);
        let offers = OfferSet::new();

        let receipt = Receipt::new(
            smallvec![application(OfferKey::default(), ItemKey::default(), 0)],
            Money::from_minor(0, GBP),
            Money::from_minor(0, GBP),
            GBP,
        )?;

        let result = receipt.write_to(Vec::new(), &catalogue, &offers);

        assert!(matches!(result, Err(ReceiptError::Catalogue(_))));

        Ok(())
    }
}
