//! Output module for terminal rendering and crawl summaries
//!
//! This module handles:
//! - Rendering items through the site adapter
//! - Reporting crawl session counters and store statistics

pub mod stats;

pub use stats::{load_statistics, print_report, print_statistics, CrawlReport, StoreStatistics};

use crate::item::Item;
use crate::site::SiteAdapter;

/// Renders every item with the adapter's display format
pub fn render_items<'a, A, I>(adapter: &A, items: I) -> String
where
    A: SiteAdapter + ?Sized,
    I: IntoIterator<Item = &'a Item>,
{
    items
        .into_iter()
        .map(|item| adapter.render_item(item))
        .collect()
}

/// Prints every item to stdout with the adapter's display format
pub fn print_items<'a, A, I>(adapter: &A, items: I)
where
    A: SiteAdapter + ?Sized,
    I: IntoIterator<Item = &'a Item>,
{
    print!("{}", render_items(adapter, items));
}
