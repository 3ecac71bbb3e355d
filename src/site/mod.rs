//! Site adapters
//!
//! Everything that depends on one marketplace's URL scheme and HTML layout
//! lives behind [`SiteAdapter`]. The crawl loop only sees URLs, item blocks
//! and [`Item`]s.

mod avito;

pub use avito::AvitoAdapter;

use crate::item::{IdentityField, Item, ItemParseError, DEFAULT_IDENTITY_FIELDS};
use crate::SiteError;
use scraper::{ElementRef, Html, Selector};
use std::fmt;
use url::Url;

/// One search results page: the "extended parameters" of a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageQuery {
    pub terms: Vec<String>,
    pub category: String,
    pub page: u32,
}

impl fmt::Display for PageQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, {}, page {}",
            self.terms.join(" "),
            self.category,
            self.page
        )
    }
}

/// Capabilities a marketplace must provide to be crawled
pub trait SiteAdapter {
    /// Short name used in log lines
    fn name(&self) -> &str;

    /// Builds the search URL for one results page
    fn build_url(&self, query: &PageQuery) -> Result<Url, SiteError>;

    /// Inspects the whole page before items are extracted
    ///
    /// Returning an error abandons the page, e.g. when the site answered a
    /// different query than the one that was asked.
    fn post_parse_hook(&self, _page: &Html) -> Result<(), SiteError> {
        Ok(())
    }

    /// Selects the raw listing blocks on a results page
    fn select_item_blocks<'a>(&self, page: &'a Html) -> Vec<ElementRef<'a>>;

    /// Turns one listing block into an [`Item`]
    fn parse_block(&self, block: ElementRef<'_>) -> Result<Item, ItemParseError>;

    /// One human-readable entry for terminal output
    fn render_item(&self, item: &Item) -> String;

    /// Ordered field list the identity hash is computed over
    fn hash_fields(&self) -> &[IdentityField] {
        &DEFAULT_IDENTITY_FIELDS
    }

    /// Resolves a photo reference found in an item into a fetchable URL
    fn photo_url(&self, raw: &str) -> Option<Url>;
}

/// Diagnostic view of a listing block that failed to parse
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockDiagnostics {
    pub attributes: Vec<(String, String)>,
    pub links: Vec<String>,
}

/// Collects a block's own attributes and every link or image reference
/// inside it
pub fn describe_block(block: ElementRef<'_>) -> BlockDiagnostics {
    let attributes = block
        .value()
        .attrs()
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect();

    let mut links = Vec::new();
    if let Ok(selector) = Selector::parse("a[href], img[src]") {
        for element in block.select(&selector) {
            let link = element
                .value()
                .attr("href")
                .or_else(|| element.value().attr("src"));
            if let Some(link) = link {
                links.push(link.to_string());
            }
        }
    }

    BlockDiagnostics { attributes, links }
}
