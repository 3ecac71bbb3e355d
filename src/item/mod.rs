//! Listing records and their identity
//!
//! This module defines:
//! - The [`Item`] record produced by a site adapter
//! - The identity hash used as both dedup key and storage primary key
//! - The price filter applied before an item can become known
//! - Text normalization helpers shared by site adapters

mod normalize;

pub use normalize::{normalize_date, normalize_date_on, normalize_str};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::borrow::Cow;
use thiserror::Error;

/// One parsed listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Asking price, 0 when the listing does not specify one
    pub price: u64,
    pub title: String,
    /// Link to the listing, relative to the site root
    pub url: String,
    pub category: String,
    pub company: String,
    pub location: String,
    /// Normalized textual date as shown by the site
    pub date: String,
    pub photourls: Vec<String>,
}

/// A field that participates in an item's identity hash
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityField {
    Price,
    Title,
    Url,
    Category,
    Company,
    Location,
    Date,
    PhotoUrls,
}

/// Field order used unless an adapter overrides it
///
/// Changing this list changes the identity of every item ever stored.
pub const DEFAULT_IDENTITY_FIELDS: [IdentityField; 8] = [
    IdentityField::Price,
    IdentityField::Title,
    IdentityField::Url,
    IdentityField::Category,
    IdentityField::Company,
    IdentityField::Location,
    IdentityField::Date,
    IdentityField::PhotoUrls,
];

impl Item {
    /// Returns the textual form of a field as fed into the identity hash
    pub fn field_text(&self, field: IdentityField) -> Cow<'_, str> {
        match field {
            IdentityField::Price => Cow::Owned(self.price.to_string()),
            IdentityField::Title => Cow::Borrowed(&self.title),
            IdentityField::Url => Cow::Borrowed(&self.url),
            IdentityField::Category => Cow::Borrowed(&self.category),
            IdentityField::Company => Cow::Borrowed(&self.company),
            IdentityField::Location => Cow::Borrowed(&self.location),
            IdentityField::Date => Cow::Borrowed(&self.date),
            IdentityField::PhotoUrls => Cow::Owned(format!("{:?}", self.photourls)),
        }
    }
}

/// Computes the identity hash of an item
///
/// Each field in `fields` is encoded as UTF-8 and fed into SHA-256 in order.
/// Two items with equal values on those fields always hash the same.
///
/// # Returns
///
/// The lowercase hex digest (64 characters)
pub fn hash_item(item: &Item, fields: &[IdentityField]) -> String {
    let mut hasher = Sha256::new();
    for field in fields {
        hasher.update(item.field_text(*field).as_bytes());
    }
    hex::encode(hasher.finalize())
}

/// Inclusive price filter
///
/// `max: None` means there is no upper bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PriceRange {
    pub min: u64,
    pub max: Option<u64>,
}

impl PriceRange {
    /// Builds a range from configured bounds, where a max of zero or less
    /// means "unbounded"
    pub fn from_bounds(min: u64, max: i64) -> Self {
        let max = if max > 0 { Some(max as u64) } else { None };
        Self { min, max }
    }

    /// Returns true if an item with this price passes the filter
    pub fn accepts(&self, price: u64) -> bool {
        if price < self.min {
            return false;
        }
        match self.max {
            Some(max) if price > max => false,
            _ => true,
        }
    }
}

/// Reasons a raw listing block could not be turned into an [`Item`]
#[derive(Debug, Error)]
pub enum ItemParseError {
    #[error("missing element: {0}")]
    MissingElement(&'static str),

    #[error("missing attribute {attribute} on {element}")]
    MissingAttribute {
        element: &'static str,
        attribute: &'static str,
    },

    #[error("invalid price: {0}")]
    InvalidPrice(String),
}
