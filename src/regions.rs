//! Regions

use std::{fmt, str::FromStr};

use rust_decimal::Decimal;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::Deserialize;
use thiserror::Error;

/// Sales tax region a line item is sold in.
///
/// The set is closed. Policies for each region live in [`TaxPolicies`], the
/// enum itself carries no tax data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Region {
    /// California
    Ca,

    /// New York
    Ny,

    /// Not applicable: no sales tax, no exemptions.
    Na,
}

impl Region {
    /// All known regions, in declaration order.
    pub const ALL: [Region; 3] = [Region::Ca, Region::Ny, Region::Na];

    /// The two letter code used in configuration documents.
    pub fn code(self) -> &'static str {
        match self {
            Region::Ca => "CA",
            Region::Ny => "NY",
            Region::Na => "NA",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Error returned when parsing a region code that is not in the closed set.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown region code `{0}`")]
pub struct UnknownRegion(pub String);

impl FromStr for Region {
    type Err = UnknownRegion;

    fn from_str(code: &str) -> Result<Self, Self::Err> {
        Region::ALL
            .into_iter()
            .find(|region| region.code() == code)
            .ok_or_else(|| UnknownRegion(code.to_string()))
    }
}

/// No policy is configured for a region.
#[derive(Debug, Error, PartialEq, Eq, Clone, Copy)]
#[error("no tax policy configured for region {0}")]
pub struct NoSuchRegion(pub Region);

/// Errors raised when registering a region policy.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PolicyError {
    /// Tax rates must lie in `[0, 1)`.
    #[error("tax rate {rate} for region {region} is outside [0, 1)")]
    RateOutOfRange {
        /// Region the rate was declared for
        region: Region,
        /// The offending rate
        rate: Decimal,
    },

    /// The `NA` region is fixed at a zero rate with no exemptions.
    #[error("region NA must have a zero tax rate and no exempt categories")]
    TaxedNotApplicable,
}

/// Tax rate and exempt categories for one region.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RegionPolicy {
    tax_rate: Decimal,
    exempt_categories: FxHashSet<String>,
}

impl RegionPolicy {
    /// Creates a policy from a rate and the categories it does not tax.
    pub fn new<I, S>(tax_rate: Decimal, exempt_categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tax_rate,
            exempt_categories: exempt_categories.into_iter().map(Into::into).collect(),
        }
    }

    /// A policy that taxes nothing.
    pub fn untaxed() -> Self {
        Self::default()
    }

    /// The region's sales tax rate
    pub fn tax_rate(&self) -> Decimal {
        self.tax_rate
    }

    /// Whether `category` is exempt. Matching is exact and case-sensitive.
    pub fn is_exempt(&self, category: &str) -> bool {
        self.exempt_categories.contains(category)
    }

    /// The rate charged on a line of the given category.
    pub fn rate_for_category(&self, category: &str) -> Decimal {
        if self.is_exempt(category) {
            Decimal::ZERO
        } else {
            self.tax_rate
        }
    }

    fn is_untaxed(&self) -> bool {
        self.tax_rate.is_zero() && self.exempt_categories.is_empty()
    }
}

/// Immutable table of region policies.
///
/// `NA` is always present with an untaxed policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxPolicies {
    policies: FxHashMap<Region, RegionPolicy>,
}

impl TaxPolicies {
    /// Creates a table holding only the untaxed `NA` policy.
    pub fn new() -> Self {
        let mut policies = FxHashMap::default();
        policies.insert(Region::Na, RegionPolicy::untaxed());

        Self { policies }
    }

    /// Registers the policy for a region, replacing any previous one.
    ///
    /// # Errors
    ///
    /// - [`PolicyError::RateOutOfRange`]: the rate is negative or not below one.
    /// - [`PolicyError::TaxedNotApplicable`]: a taxing policy was given for `NA`.
    pub fn insert(&mut self, region: Region, policy: RegionPolicy) -> Result<(), PolicyError> {
        let rate = policy.tax_rate();

        if rate < Decimal::ZERO || rate >= Decimal::ONE {
            return Err(PolicyError::RateOutOfRange { region, rate });
        }

        if region == Region::Na && !policy.is_untaxed() {
            return Err(PolicyError::TaxedNotApplicable);
        }

        self.policies.insert(region, policy);

        Ok(())
    }

    /// Builder-style variant of [`TaxPolicies::insert`].
    ///
    /// # Errors
    ///
    /// Same as [`TaxPolicies::insert`].
    pub fn with(mut self, region: Region, policy: RegionPolicy) -> Result<Self, PolicyError> {
        self.insert(region, policy)?;

        Ok(self)
    }

    /// Looks up the policy for a region.
    ///
    /// # Errors
    ///
    /// Returns [`NoSuchRegion`] if no policy was registered for `region`.
    pub fn get(&self, region: Region) -> Result<&RegionPolicy, NoSuchRegion> {
        self.policies.get(&region).ok_or(NoSuchRegion(region))
    }

    /// Whether a policy is registered for `region`.
    pub fn contains(&self, region: Region) -> bool {
        self.policies.contains_key(&region)
    }
}

impl Default for TaxPolicies {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn ny() -> RegionPolicy {
        RegionPolicy::new(Decimal::new(8875, 5), ["food", "clothing"])
    }

    #[test]
    fn region_codes_round_trip_through_from_str() -> TestResult {
        for region in Region::ALL {
            assert_eq!(region.code().parse::<Region>()?, region);
        }

        Ok(())
    }

    #[test]
    fn region_from_str_rejects_unknown_and_lowercase_codes() {
        assert_eq!("TX".parse::<Region>(), Err(UnknownRegion("TX".to_string())));
        assert!("ca".parse::<Region>().is_err());
    }

    #[test]
    fn region_deserializes_from_uppercase_code() -> TestResult {
        let region: Region = serde_json::from_str("\"NY\"")?;

        assert_eq!(region, Region::Ny);

        Ok(())
    }

    #[test]
    fn exempt_category_has_zero_rate() {
        let policy = ny();

        assert!(policy.is_exempt("clothing"));
        assert_eq!(policy.rate_for_category("clothing"), Decimal::ZERO);
        assert_eq!(policy.rate_for_category("misc"), Decimal::new(8875, 5));
    }

    #[test]
    fn category_matching_is_case_sensitive() {
        let policy = ny();

        assert!(!policy.is_exempt("Food"));
        assert_eq!(policy.rate_for_category("Food"), Decimal::new(8875, 5));
    }

    #[test]
    fn new_table_has_untaxed_na_only() -> TestResult {
        let policies = TaxPolicies::new();

        assert_eq!(policies.get(Region::Na)?, &RegionPolicy::untaxed());
        assert_eq!(policies.get(Region::Ca), Err(NoSuchRegion(Region::Ca)));

        Ok(())
    }

    #[test]
    fn insert_rejects_rate_of_one_or_more() {
        let mut policies = TaxPolicies::new();
        let result = policies.insert(Region::Ca, RegionPolicy::new(Decimal::ONE, ["food"]));

        assert_eq!(
            result,
            Err(PolicyError::RateOutOfRange {
                region: Region::Ca,
                rate: Decimal::ONE,
            })
        );
    }

    #[test]
    fn insert_rejects_negative_rate() {
        let mut policies = TaxPolicies::new();
        let rate = Decimal::new(-1, 2);

        assert!(matches!(
            policies.insert(Region::Ny, RegionPolicy::new(rate, Vec::<String>::new())),
            Err(PolicyError::RateOutOfRange { .. })
        ));
    }

    #[test]
    fn insert_rejects_taxing_na() {
        let mut policies = TaxPolicies::new();

        assert_eq!(
            policies.insert(Region::Na, RegionPolicy::new(Decimal::new(5, 2), ["food"])),
            Err(PolicyError::TaxedNotApplicable)
        );
        assert_eq!(
            policies.insert(Region::Na, RegionPolicy::untaxed()),
            Ok(())
        );
    }

    #[test]
    fn with_chains_inserts() -> TestResult {
        let policies = TaxPolicies::new()
            .with(Region::Ca, RegionPolicy::new(Decimal::new(975, 4), ["food"]))?
            .with(Region::Ny, ny())?;

        assert!(policies.contains(Region::Ca));
        assert_eq!(policies.get(Region::Ny)?.tax_rate(), Decimal::new(8875, 5));

        Ok(())
    }
}
