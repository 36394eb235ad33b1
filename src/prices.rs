//! Prices

use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use thiserror::Error;

/// A catalog or inline unit price was negative.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("price {price} for product `{product}` is negative")]
pub struct NegativePrice {
    /// Product the price was declared for
    pub product: String,

    /// The offending price
    pub price: Decimal,
}

/// Unit prices keyed by product name. Keys are case-sensitive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PriceCatalog {
    prices: FxHashMap<String, Decimal>,
}

impl PriceCatalog {
    /// Creates an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the unit price of a product.
    ///
    /// # Errors
    ///
    /// Returns [`NegativePrice`] if `price` is below zero.
    pub fn insert(&mut self, product: impl Into<String>, price: Decimal) -> Result<(), NegativePrice> {
        let product = product.into();

        if price < Decimal::ZERO {
            return Err(NegativePrice { product, price });
        }

        self.prices.insert(product, price);

        Ok(())
    }

    /// Builder-style variant of [`PriceCatalog::insert`].
    ///
    /// # Errors
    ///
    /// Returns [`NegativePrice`] if `price` is below zero.
    pub fn with(mut self, product: impl Into<String>, price: Decimal) -> Result<Self, NegativePrice> {
        self.insert(product, price)?;

        Ok(self)
    }

    /// Unit price of a product, if the catalog lists it
    pub fn get(&self, product: &str) -> Option<Decimal> {
        self.prices.get(product).copied()
    }

    /// Number of products in the catalog
    pub fn len(&self) -> usize {
        self.prices.len()
    }

    /// Whether the catalog is empty
    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }
}
