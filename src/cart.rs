//! Cart totals

use rust_decimal::Decimal;
use tracing::warn;

use crate::{
    items::LineItem,
    store::ConfigStore,
    tax::{TaxEngine, TaxError},
};

/// Subtotal, rounded tax and total of one cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartTotals {
    /// Sum of unit price × quantity
    pub subtotal: Decimal,

    /// Rounded tax
    pub tax: Decimal,

    /// Subtotal plus tax
    pub total: Decimal,
}

/// Subtotal, tax and total of a list of line items.
#[derive(Debug, Clone, Copy)]
pub struct CartEngine<'a> {
    store: &'a ConfigStore,
    tax: TaxEngine<'a>,
}

impl<'a> CartEngine<'a> {
    /// Creates a cart engine over `store`.
    pub fn new(store: &'a ConfigStore) -> Self {
        Self {
            store,
            tax: TaxEngine::new(store),
        }
    }

    /// Unit price of an item: inline price, else catalog price, else `None`.
    pub fn unit_price(&self, item: &LineItem) -> Option<Decimal> {
        self.store.unit_price(item)
    }

    /// Sum of unit price × quantity, tax excluded.
    ///
    /// Items whose price cannot be resolved contribute zero and log a warning.
    ///
    /// # Errors
    ///
    /// Returns [`TaxError::Overflow`] if the sum does not fit in a [`Decimal`].
    pub fn subtotal(&self, items: &[LineItem]) -> Result<Decimal, TaxError> {
        items.iter().try_fold(Decimal::ZERO, |acc, item| {
            let Some(unit_price) = self.unit_price(item) else {
                warn!(product = item.product_name(), "price missing, counted as zero");

                return Ok(acc);
            };

            unit_price
                .checked_mul(Decimal::from(item.quantity()))
                .and_then(|line_total| acc.checked_add(line_total))
                .ok_or_else(|| TaxError::Overflow {
                    product: item.product_name().to_string(),
                })
        })
    }

    /// Rounded tax over all items.
    ///
    /// # Errors
    ///
    /// See [`TaxEngine::total_tax`].
    pub fn tax(&self, items: &[LineItem]) -> Result<Decimal, TaxError> {
        self.tax.total_tax(items)
    }

    /// Subtotal plus rounded tax.
    ///
    /// # Errors
    ///
    /// Returns a [`TaxError`] if either the subtotal or tax cannot be computed.
    pub fn total(&self, items: &[LineItem]) -> Result<Decimal, TaxError> {
        Ok(self.totals(items)?.total)
    }

    /// Subtotal, tax and total, each computed once.
    ///
    /// # Errors
    ///
    /// Returns a [`TaxError`] if any item is invalid or an amount overflows.
    pub fn totals(&self, items: &[LineItem]) -> Result<CartTotals, TaxError> {
        let subtotal = self.subtotal(items)?;
        let tax = self.tax(items)?;

        let total = subtotal.checked_add(tax).ok_or_else(|| TaxError::Overflow {
            product: "total".to_string(),
        })?;

        Ok(CartTotals {
            subtotal,
            tax,
            total,
        })
    }
}
