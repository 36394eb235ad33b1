//! Tax engine
//!
//! Determines the rate charged on each line item from its region's policy and
//! aggregates a cart's tax, rounded up to the nearest 0.05.

use rust_decimal::{Decimal, RoundingStrategy};
use thiserror::Error;

use crate::{items::LineItem, regions::NoSuchRegion, store::ConfigStore};

/// Smallest step of a rounded tax amount.
const NICKEL: Decimal = Decimal::from_parts(5, 0, 0, false, 2);

/// Errors raised while pricing or taxing line items. Each aborts the cart being processed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TaxError {
    /// The item cannot be taxed
    #[error("invalid item `{product}`: {reason}")]
    InvalidItem {
        /// Product name
        product: String,
        /// Why the item was rejected
        reason: &'static str,
    },

    /// The item's region has no tax policy
    #[error(transparent)]
    NoSuchRegion(#[from] NoSuchRegion),

    /// Decimal arithmetic overflowed
    #[error("amount overflow while pricing `{product}`")]
    Overflow {
        /// Product being priced when the overflow happened
        product: String,
    },
}

/// Per-line and per-cart tax calculations over a [`ConfigStore`].
#[derive(Debug, Clone, Copy)]
pub struct TaxEngine<'a> {
    store: &'a ConfigStore,
}

impl<'a> TaxEngine<'a> {
    /// Creates a tax engine reading prices and policies from `store`.
    pub fn new(store: &'a ConfigStore) -> Self {
        Self { store }
    }

    /// Rate applied to an item: zero when its category is exempt in its
    /// region, otherwise the region's rate. Items without a region are taxed as `NA`.
    ///
    /// # Errors
    ///
    /// - [`TaxError::InvalidItem`]: the item has a zero quantity.
    /// - [`TaxError::NoSuchRegion`]: the item's region has no policy.
    pub fn rate_for(&self, item: &LineItem) -> Result<Decimal, TaxError> {
        validate(item)?;

        let policy = self.store.policy_of(item.region())?;

        Ok(policy.rate_for_category(item.category()))
    }

    /// Exact, unrounded tax on one line: `unit price × quantity × rate`.
    ///
    /// An item with no resolvable price is taxed on a unit price of zero.
    ///
    /// # Errors
    ///
    /// Returns a [`TaxError`] if the rate cannot be determined or the amount overflows.
    pub fn line_tax(&self, item: &LineItem) -> Result<Decimal, TaxError> {
        let rate = self.rate_for(item)?;
        let unit_price = self.store.unit_price(item).unwrap_or(Decimal::ZERO);

        unit_price
            .checked_mul(Decimal::from(item.quantity()))
            .and_then(|line_total| line_total.checked_mul(rate))
            .ok_or_else(|| overflow(item))
    }

    /// Exact, unrounded tax over all items.
    ///
    /// # Errors
    ///
    /// Returns the first [`TaxError`] raised by any item.
    pub fn exact_tax(&self, items: &[LineItem]) -> Result<Decimal, TaxError> {
        items.iter().try_fold(Decimal::ZERO, |acc, item| {
            acc.checked_add(self.line_tax(item)?)
                .ok_or_else(|| overflow(item))
        })
    }

    /// Total tax over all items, rounded with [`round_up_to_nickel`].
    ///
    /// # Errors
    ///
    /// Returns the first [`TaxError`] raised by any item.
    pub fn total_tax(&self, items: &[LineItem]) -> Result<Decimal, TaxError> {
        Ok(round_up_to_nickel(self.exact_tax(items)?))
    }
}

/// Rounds a tax amount half-up to one decimal place, then adds 0.05 if that
/// rounded below the exact amount.
///
/// The result is a multiple of 0.05 and never less than `tax`:
/// `9.73 → 9.75`, `9.75 → 9.80`, `9.76 → 9.80`.
pub fn round_up_to_nickel(tax: Decimal) -> Decimal {
    let rounded = tax.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero);

    if tax > rounded {
        rounded + NICKEL
    } else {
        rounded
    }
}

fn validate(item: &LineItem) -> Result<(), TaxError> {
    if item.quantity() == 0 {
        return Err(TaxError::InvalidItem {
            product: item.product_name().to_string(),
            reason: "quantity must be positive",
        });
    }

    Ok(())
}

fn overflow(item: &LineItem) -> TaxError {
    TaxError::Overflow {
        product: item.product_name().to_string(),
    }
}
