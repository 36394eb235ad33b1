//! Till
//!
//! Till is a point-of-sale receipt engine: it prices carts from a product
//! catalog, applies regional sales tax with category exemptions, and renders
//! fixed-width receipts.

pub mod cart;
pub mod driver;
pub mod items;
pub mod prices;
pub mod receipt;
pub mod regions;
pub mod store;
pub mod tax;
