//! Session state for the crawler
//!
//! The only state a crawl session carries between pages is the set of items
//! it already knows about, keyed by identity hash.

mod known_items;

pub use known_items::KnownItems;
