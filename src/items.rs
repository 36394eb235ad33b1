//! Items

use rust_decimal::Decimal;

use crate::regions::Region;

/// A single purchased product on a cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineItem {
    product_name: String,
    quantity: u32,
    category: String,
    region: Option<Region>,
    price: Option<Decimal>,
}

impl LineItem {
    /// Creates a line item with no region and no inline price.
    pub fn new(product_name: impl Into<String>, quantity: u32, category: impl Into<String>) -> Self {
        Self {
            product_name: product_name.into(),
            quantity,
            category: category.into(),
            region: None,
            price: None,
        }
    }

    /// Sets the region the item is sold in
    #[must_use]
    pub fn with_region(mut self, region: Region) -> Self {
        self.region = Some(region);
        self
    }

    /// Sets an inline unit price that takes precedence over the catalog
    #[must_use]
    pub fn with_price(mut self, price: Decimal) -> Self {
        self.price = Some(price);
        self
    }

    /// Catalog key of the product
    pub fn product_name(&self) -> &str {
        &self.product_name
    }

    /// Units purchased
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Product category, matched against exempt categories
    pub fn category(&self) -> &str {
        &self.category
    }

    /// Region used for tax. An item declared without one is taxed as [`Region::Na`].
    pub fn region(&self) -> Region {
        self.region.unwrap_or(Region::Na)
    }

    /// Region exactly as declared
    pub fn declared_region(&self) -> Option<Region> {
        self.region
    }

    /// Inline unit price, if any
    pub fn price(&self) -> Option<Decimal> {
        self.price
    }
}

/// A named, ordered collection of line items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cart {
    name: String,
    items: Vec<LineItem>,
}

impl Cart {
    /// Creates a cart. Items keep the order they are given in.
    pub fn new(name: impl Into<String>, items: impl Into<Vec<LineItem>>) -> Self {
        Self {
            name: name.into(),
            items: items.into(),
        }
    }

    /// Cart name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Items in declared order
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Get the number of items in the cart.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
