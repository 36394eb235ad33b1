//! Config store
//!
//! Loads the price catalog, region policies and carts once at start-up and
//! serves read-only lookups for the engines.

use std::{
    fs,
    io,
    path::{Path, PathBuf},
};

use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

use crate::{
    items::{Cart, LineItem},
    prices::{NegativePrice, PriceCatalog},
    regions::{NoSuchRegion, PolicyError, Region, RegionPolicy, TaxPolicies, UnknownRegion},
    store::documents::{CartsDocument, LocationsDocument, PricesDocument},
};

mod documents;
mod ordered;

/// File name of the price catalog document
pub const PRICES_FILE: &str = "prices.json";

/// File name of the region policy document
pub const LOCATIONS_FILE: &str = "locations.json";

/// File name of the carts document
pub const CARTS_FILE: &str = "carts.json";

/// Configuration loading errors. All of them are fatal.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A document could not be read
    #[error("failed to read {}: {source}", .file.display())]
    Io {
        /// Document path
        file: PathBuf,
        /// Underlying IO error
        #[source]
        source: io::Error,
    },

    /// A document is not valid JSON or is missing a required field
    #[error("failed to parse {}: {source}", .file.display())]
    Json {
        /// Document path
        file: PathBuf,
        /// Underlying parse error
        #[source]
        source: serde_json::Error,
    },

    /// A document parsed but its contents are inconsistent
    #[error("invalid configuration in {}: {source}", .file.display())]
    Invalid {
        /// Document path
        file: PathBuf,
        /// What was wrong
        #[source]
        source: InvalidConfig,
    },
}

/// Reasons a configuration is internally inconsistent.
#[derive(Debug, Error, PartialEq)]
pub enum InvalidConfig {
    /// A region code outside the known set
    #[error(transparent)]
    UnknownRegion(#[from] UnknownRegion),

    /// A region policy failed validation
    #[error(transparent)]
    Policy(#[from] PolicyError),

    /// A catalog price failed validation
    #[error(transparent)]
    Price(#[from] NegativePrice),

    /// A purchase with a quantity of zero
    #[error("cart `{cart}`: product `{product}` has a quantity of zero")]
    ZeroQuantity {
        /// Cart name
        cart: String,
        /// Product name
        product: String,
    },

    /// A purchase in a region that has no tax policy
    #[error("cart `{cart}`: product `{product}` references region {region} which has no tax policy")]
    MissingPolicy {
        /// Cart name
        cart: String,
        /// Product name
        product: String,
        /// Region referenced by the purchase
        region: Region,
    },

    /// Two carts share a name
    #[error("cart `{0}` is declared more than once")]
    DuplicateCart(String),
}

/// Immutable catalog, policies and carts.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    catalog: PriceCatalog,
    policies: TaxPolicies,
    carts: Vec<Cart>,
}

impl ConfigStore {
    /// Builds a store from in-memory parts.
    ///
    /// A product missing from the catalog is not an error; it is priced at zero
    /// when totals are computed.
    ///
    /// # Errors
    ///
    /// Returns an [`InvalidConfig`] if cart names repeat, a purchase has a zero
    /// quantity or a negative inline price, or a purchase references a region
    /// without a policy.
    pub fn new(
        catalog: PriceCatalog,
        policies: TaxPolicies,
        carts: impl Into<Vec<Cart>>,
    ) -> Result<Self, InvalidConfig> {
        let carts = carts.into();

        for (idx, cart) in carts.iter().enumerate() {
            if carts.iter().take(idx).any(|seen| seen.name() == cart.name()) {
                return Err(InvalidConfig::DuplicateCart(cart.name().to_string()));
            }

            for item in cart.items() {
                if item.quantity() == 0 {
                    return Err(InvalidConfig::ZeroQuantity {
                        cart: cart.name().to_string(),
                        product: item.product_name().to_string(),
                    });
                }

                if let Some(price) = item.price()
                    && price < Decimal::ZERO
                {
                    return Err(InvalidConfig::Price(NegativePrice {
                        product: item.product_name().to_string(),
                        price,
                    }));
                }

                if !policies.contains(item.region()) {
                    return Err(InvalidConfig::MissingPolicy {
                        cart: cart.name().to_string(),
                        product: item.product_name().to_string(),
                        region: item.region(),
                    });
                }
            }
        }

        Ok(Self {
            catalog,
            policies,
            carts,
        })
    }

    /// Loads `prices.json`, `locations.json` and `carts.json` from `dir`.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] naming the offending file if a document is
    /// missing, malformed, or inconsistent.
    pub fn load(dir: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let dir = dir.as_ref();

        let prices_path = dir.join(PRICES_FILE);
        let catalog = read_document::<PricesDocument>(&prices_path)?
            .into_catalog()
            .map_err(|source| invalid(&prices_path, source))?;

        let locations_path = dir.join(LOCATIONS_FILE);
        let policies = read_document::<LocationsDocument>(&locations_path)?
            .into_policies()
            .map_err(|source| invalid(&locations_path, source))?;

        let carts_path = dir.join(CARTS_FILE);
        let carts = read_document::<CartsDocument>(&carts_path)?
            .into_carts()
            .map_err(|source| invalid(&carts_path, source))?;

        let store =
            Self::new(catalog, policies, carts).map_err(|source| invalid(&carts_path, source))?;

        debug!(
            dir = %dir.display(),
            products = store.catalog.len(),
            carts = store.carts.len(),
            "configuration loaded"
        );

        Ok(store)
    }

    /// Catalog price of a product
    pub fn price_of(&self, product: &str) -> Option<Decimal> {
        self.catalog.get(product)
    }

    /// Tax policy of a region.
    ///
    /// # Errors
    ///
    /// Returns [`NoSuchRegion`] if the region has no policy.
    pub fn policy_of(&self, region: Region) -> Result<&RegionPolicy, NoSuchRegion> {
        self.policies.get(region)
    }

    /// Carts in declared order
    pub fn carts(&self) -> &[Cart] {
        &self.carts
    }

    /// Looks up a cart by name
    pub fn cart(&self, name: &str) -> Option<&Cart> {
        self.carts.iter().find(|cart| cart.name() == name)
    }

    /// Unit price of a line item: its inline price, else the catalog price.
    pub fn unit_price(&self, item: &LineItem) -> Option<Decimal> {
        item.price().or_else(|| self.price_of(item.product_name()))
    }
}

fn read_document<T: DeserializeOwned>(file: &Path) -> Result<T, ConfigError> {
    let contents = fs::read_to_string(file).map_err(|source| ConfigError::Io {
        file: file.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&contents).map_err(|source| ConfigError::Json {
        file: file.to_path_buf(),
        source,
    })
}

fn invalid(file: &Path, source: InvalidConfig) -> ConfigError {
    ConfigError::Invalid {
        file: file.to_path_buf(),
        source,
    }
}
