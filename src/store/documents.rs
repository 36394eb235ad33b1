//! Shapes of the JSON configuration documents.

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::{
    items::{Cart, LineItem},
    prices::PriceCatalog,
    regions::{Region, RegionPolicy, TaxPolicies},
    store::{InvalidConfig, ordered::Ordered},
};

/// `prices.json`: product name to unit price.
#[derive(Debug, Deserialize)]
#[serde(transparent)]
pub(crate) struct PricesDocument(Ordered<Decimal>);

impl PricesDocument {
    pub(crate) fn into_catalog(self) -> Result<PriceCatalog, InvalidConfig> {
        let mut catalog = PriceCatalog::new();

        for (product, price) in self.0 {
            catalog.insert(product, price)?;
        }

        Ok(catalog)
    }
}

/// `locations.json`: region policies under a `locations` key.
#[derive(Debug, Deserialize)]
pub(crate) struct LocationsDocument {
    locations: Ordered<LocationDocument>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LocationDocument {
    tax_rate: Decimal,
    exempt_categories: Vec<String>,
}

impl LocationsDocument {
    pub(crate) fn into_policies(self) -> Result<TaxPolicies, InvalidConfig> {
        let mut policies = TaxPolicies::new();

        for (code, location) in self.locations {
            let region: Region = code.parse()?;

            policies.insert(
                region,
                RegionPolicy::new(location.tax_rate, location.exempt_categories),
            )?;
        }

        Ok(policies)
    }
}

/// `carts.json`: cart name to purchase key to purchase.
#[derive(Debug, Deserialize)]
#[serde(transparent)]
pub(crate) struct CartsDocument(Ordered<Ordered<PurchaseDocument>>);

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PurchaseDocument {
    product_name: String,
    quantity: u32,
    category: String,
    #[serde(default)]
    location: Option<String>,
    #[serde(default)]
    price: Option<Decimal>,
}

impl CartsDocument {
    pub(crate) fn into_carts(self) -> Result<Vec<Cart>, InvalidConfig> {
        self.0
            .into_iter()
            .map(|(name, purchases)| {
                let items = purchases
                    .into_iter()
                    .map(|(_key, purchase)| purchase.into_line_item())
                    .collect::<Result<Vec<_>, _>>()?;

                Ok(Cart::new(name, items))
            })
            .collect()
    }
}

impl PurchaseDocument {
    fn into_line_item(self) -> Result<LineItem, InvalidConfig> {
        let mut item = LineItem::new(self.product_name, self.quantity, self.category);

        if let Some(code) = self.location {
            item = item.with_region(code.parse()?);
        }

        if let Some(price) = self.price {
            item = item.with_price(price);
        }

        Ok(item)
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;
    use crate::regions::{PolicyError, UnknownRegion};

    #[test]
    fn prices_parse_as_exact_decimals() -> TestResult {
        let document: PricesDocument =
            serde_json::from_str(r#"{ "book": 17.99, "potato_chips": 3.99, "tiny": 0.1 }"#)?;

        let catalog = document.into_catalog()?;

        assert_eq!(catalog.get("book"), Some(Decimal::new(1799, 2)));
        assert_eq!(catalog.get("potato_chips"), Some(Decimal::new(399, 2)));
        assert_eq!(catalog.get("tiny"), Some(Decimal::new(1, 1)));

        Ok(())
    }

    #[test]
    fn negative_catalog_price_is_invalid() -> TestResult {
        let document: PricesDocument = serde_json::from_str(r#"{ "book": -1 }"#)?;

        assert!(matches!(
            document.into_catalog(),
            Err(InvalidConfig::Price(_))
        ));

        Ok(())
    }

    #[test]
    fn locations_build_policies() -> TestResult {
        let document: LocationsDocument = serde_json::from_str(
            r#"{
                "locations": {
                    "CA": { "taxRate": 0.0975, "exemptCategories": ["food"] },
                    "NY": { "taxRate": 0.08875, "exemptCategories": ["food", "clothing"] }
                }
            }"#,
        )?;

        let policies = document.into_policies()?;

        assert_eq!(policies.get(Region::Ca)?.tax_rate(), Decimal::new(975, 4));
        assert!(policies.get(Region::Ny)?.is_exempt("clothing"));
        assert!(policies.get(Region::Na)?.tax_rate().is_zero());

        Ok(())
    }

    #[test]
    fn unknown_location_code_is_invalid() -> TestResult {
        let document: LocationsDocument = serde_json::from_str(
            r#"{ "locations": { "TX": { "taxRate": 0.0625, "exemptCategories": [] } } }"#,
        )?;

        assert!(matches!(
            document.into_policies(),
            Err(InvalidConfig::UnknownRegion(UnknownRegion(code))) if code == "TX"
        ));

        Ok(())
    }

    #[test]
    fn out_of_range_rate_is_invalid() -> TestResult {
        let document: LocationsDocument = serde_json::from_str(
            r#"{ "locations": { "CA": { "taxRate": 9.75, "exemptCategories": [] } } }"#,
        )?;

        assert!(matches!(
            document.into_policies(),
            Err(InvalidConfig::Policy(PolicyError::RateOutOfRange { .. }))
        ));

        Ok(())
    }

    #[test]
    fn non_numeric_rate_fails_to_parse() {
        let result = serde_json::from_str::<LocationsDocument>(
            r#"{ "locations": { "CA": { "taxRate": "lots", "exemptCategories": [] } } }"#,
        );

        assert!(result.is_err());
    }

    #[test]
    fn carts_keep_declared_order_and_optional_fields() -> TestResult {
        let document: CartsDocument = serde_json::from_str(
            r#"{
                "case 2": {
                    "p1": { "productName": "book", "quantity": 1, "category": "misc", "location": "NY" },
                    "p2": { "productName": "pencil", "quantity": 3, "category": "misc", "location": "NY", "price": 1.5 }
                },
                "case 1": {
                    "p1": { "productName": "potato_chips", "quantity": 1, "category": "misc" }
                }
            }"#,
        )?;

        let carts = document.into_carts()?;
        let names: Vec<&str> = carts.iter().map(Cart::name).collect();

        assert_eq!(names, ["case 2", "case 1"]);

        let case_2 = carts.first().ok_or("missing first cart")?;
        let pencil = case_2.items().get(1).ok_or("missing pencil")?;

        assert_eq!(pencil.product_name(), "pencil");
        assert_eq!(pencil.declared_region(), Some(Region::Ny));
        assert_eq!(pencil.price(), Some(Decimal::new(15, 1)));

        let case_1 = carts.get(1).ok_or("missing second cart")?;
        let chips = case_1.items().first().ok_or("missing chips")?;

        assert_eq!(chips.declared_region(), None);
        assert_eq!(chips.price(), None);

        Ok(())
    }

    #[test]
    fn unknown_cart_location_is_invalid() -> TestResult {
        let document: CartsDocument = serde_json::from_str(
            r#"{ "c": { "p": { "productName": "book", "quantity": 1, "category": "misc", "location": "ZZ" } } }"#,
        )?;

        assert!(matches!(
            document.into_carts(),
            Err(InvalidConfig::UnknownRegion(_))
        ));

        Ok(())
    }

    #[test]
    fn purchase_without_quantity_fails_to_parse() {
        let result = serde_json::from_str::<CartsDocument>(
            r#"{ "c": { "p": { "productName": "book", "category": "misc" } } }"#,
        );

        assert!(result.is_err());
    }
}
