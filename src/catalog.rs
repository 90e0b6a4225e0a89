//! Catalog boundary: listings, normalized product names, ingest reporting
//!
//! The site-specific scrapers hand over raw `(name, price, old_price,
//! source)` records. This module normalizes the names, keeps every other
//! field as opaque payload, and reports each record it refuses instead of
//! dropping it silently, so the matcher's input guarantees stay auditable.

use crate::algorithms::normalize::normalize_name;
use ahash::AHashSet;
use log::warn;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// A normalized product name.
///
/// Construction runs the canonical normalization pipeline; the value is
/// immutable afterwards and has no identity beyond its characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ProductName(String);

// Deserialization goes back through normalization so a name read from
// the outside can never carry an unnormalized value.
impl<'de> Deserialize<'de> for ProductName {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::new(&raw))
    }
}

impl ProductName {
    /// Normalize `raw` into a product name.
    ///
    /// May produce an empty name if nothing survives normalization;
    /// callers decide whether that is an error at their boundary.
    #[must_use]
    pub fn new(raw: &str) -> Self {
        Self(normalize_name(raw))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ProductName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One scraped listing, as the ingestion collaborators produce it.
///
/// Prices are integer currency units; `old_price == 0` means the retailer
/// showed no pre-discount price, exactly as the scraped data encodes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    /// Product name as displayed on the retailer page
    pub name: String,
    /// Current (discounted) price
    pub price: u64,
    /// Listed price before discount; 0 when the retailer shows none
    pub old_price: u64,
    /// Retailer identifier
    pub source: String,
}

/// Why an ingested record was not added to the catalog.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkipReason {
    /// Nothing left of the name after normalization
    #[error("name is empty after normalization")]
    EmptyName,

    /// An earlier record already claimed the same normalized name
    #[error("duplicate of an earlier listing with the same normalized name")]
    DuplicateName,
}

/// A record refused at the catalog boundary, kept for reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skipped {
    /// Raw name of the refused record
    pub name: String,
    pub reason: SkipReason,
}

/// Ordered catalog of `(ProductName, payload)` entries.
///
/// Index position is the sole linkage back to the payload; the matcher
/// reports winners by index. Names and payloads live in parallel columns
/// so the matcher can borrow the full name column as a corpus without
/// touching the payloads.
#[derive(Debug, Clone)]
pub struct Catalog<T> {
    names: Vec<ProductName>,
    payloads: Vec<T>,
}

impl<T> Default for Catalog<T> {
    fn default() -> Self {
        Self {
            names: Vec::new(),
            payloads: Vec::new(),
        }
    }
}

impl<T> Catalog<T> {
    /// Build a catalog from `(raw name, payload)` pairs.
    ///
    /// Keeps the first record for every normalized name; empty names and
    /// later duplicates come back as [`Skipped`] records instead of being
    /// silently discarded.
    pub fn from_pairs<S, I>(pairs: I) -> (Self, Vec<Skipped>)
    where
        S: AsRef<str>,
        I: IntoIterator<Item = (S, T)>,
    {
        let mut catalog = Self::default();
        let mut skipped = Vec::new();
        let mut seen: AHashSet<String> = AHashSet::new();

        for (raw, payload) in pairs {
            let raw = raw.as_ref();
            let name = ProductName::new(raw);

            if name.is_empty() {
                warn!("skipping listing with empty normalized name: {:?}", raw);
                skipped.push(Skipped {
                    name: raw.to_string(),
                    reason: SkipReason::EmptyName,
                });
                continue;
            }
            if !seen.insert(name.as_str().to_string()) {
                warn!("skipping duplicate listing: {:?}", raw);
                skipped.push(Skipped {
                    name: raw.to_string(),
                    reason: SkipReason::DuplicateName,
                });
                continue;
            }

            catalog.names.push(name);
            catalog.payloads.push(payload);
        }

        (catalog, skipped)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Normalized names, in catalog order.
    #[must_use]
    pub fn names(&self) -> &[ProductName] {
        &self.names
    }

    /// Normalized name of the entry at `index`.
    #[must_use]
    pub fn name(&self, index: usize) -> Option<&ProductName> {
        self.names.get(index)
    }

    /// Payload of the entry at `index`.
    #[must_use]
    pub fn payload(&self, index: usize) -> Option<&T> {
        self.payloads.get(index)
    }

    /// Iterate `(name, payload)` entries in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = (&ProductName, &T)> {
        self.names.iter().zip(self.payloads.iter())
    }
}

impl Catalog<Listing> {
    /// Build a catalog straight from scraped listings, using each
    /// listing's own name and carrying the listing as payload.
    pub fn from_listings(listings: Vec<Listing>) -> (Self, Vec<Skipped>) {
        Self::from_pairs(listings.into_iter().map(|l| (l.name.clone(), l)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(name: &str, price: u64, old_price: u64, source: &str) -> Listing {
        Listing {
            name: name.to_string(),
            price,
            old_price,
            source: source.to_string(),
        }
    }

    #[test]
    fn test_product_name_normalizes() {
        let name = ProductName::new("  iPhone 13 (128GB) Blue ");
        assert_eq!(name.as_str(), "iphone 13 128gb blue");
        assert!(!name.is_empty());
        assert!(ProductName::new(" -- ").is_empty());
    }

    #[test]
    fn test_from_listings_keeps_order_and_payloads() {
        let (catalog, skipped) = Catalog::from_listings(vec![
            listing("iPhone 13 128GB (Blue)", 18_990_000, 21_990_000, "cps"),
            listing("Samsung Galaxy S21", 15_990_000, 0, "hhm"),
        ]);

        assert!(skipped.is_empty());
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.name(0).unwrap().as_str(), "iphone 13 128gb blue");
        assert_eq!(catalog.payload(1).unwrap().source, "hhm");
        assert_eq!(catalog.iter().count(), 2);
    }

    #[test]
    fn test_empty_names_are_reported() {
        let (catalog, skipped) = Catalog::from_pairs(vec![("!!!", 1u32), ("nokia 3310", 2u32)]);

        assert_eq!(catalog.len(), 1);
        assert_eq!(skipped.len(), 1);
        assert_eq!(skipped[0].name, "!!!");
        assert_eq!(skipped[0].reason, SkipReason::EmptyName);
    }

    #[test]
    fn test_duplicates_keep_first_and_report_rest() {
        // Same product, differently punctuated: identical after normalization
        let (catalog, skipped) = Catalog::from_pairs(vec![
            ("iPhone 13 128GB", "cps"),
            ("iphone-13 128gb", "hhm"),
        ]);

        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.payload(0), Some(&"cps"));
        assert_eq!(skipped.len(), 1);
        assert_eq!(skipped[0].reason, SkipReason::DuplicateName);
        assert_eq!(skipped[0].name, "iphone-13 128gb");
    }

    #[test]
    fn test_skip_reason_messages() {
        assert_eq!(
            SkipReason::EmptyName.to_string(),
            "name is empty after normalization"
        );
        assert_eq!(
            SkipReason::DuplicateName.to_string(),
            "duplicate of an earlier listing with the same normalized name"
        );
    }
}
