//! Crawl and store statistics
//!
//! This module provides the per-session counters kept by the crawler and
//! the summary of what the item store holds.

use crate::storage::{ItemStore, StorageResult};

/// Counters accumulated over one crawl session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlReport {
    /// Results pages requested
    pub pages_fetched: usize,

    /// Pages abandoned because of a site error
    pub pages_failed: usize,

    /// Listing blocks parsed into items
    pub items_parsed: usize,

    /// Parsed items dropped by the price filter
    pub items_rejected: usize,

    /// Listing blocks skipped because they could not be parsed
    pub parse_errors: usize,

    /// Items that were not known before this session
    pub new_items: usize,

    pub photos_downloaded: usize,
    pub photos_skipped: usize,
    pub photo_failures: usize,
}

/// Summary of the persistent item store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreStatistics {
    pub stored_items: u64,
}

/// Loads statistics from storage
pub fn load_statistics(store: &dyn ItemStore) -> StorageResult<StoreStatistics> {
    Ok(StoreStatistics {
        stored_items: store.count()?,
    })
}

/// Prints a session report to stdout
pub fn print_report(report: &CrawlReport) {
    println!("=== Crawl Report ===\n");

    println!("Pages:");
    println!("  Fetched: {}", report.pages_fetched);
    println!("  Failed: {}", report.pages_failed);
    println!();

    println!("Items:");
    println!("  Parsed: {}", report.items_parsed);
    println!("  Rejected by price: {}", report.items_rejected);
    println!("  Parse errors: {}", report.parse_errors);
    println!("  New: {}", report.new_items);
    println!();

    println!("Photos:");
    println!("  Downloaded: {}", report.photos_downloaded);
    println!("  Already present: {}", report.photos_skipped);
    println!("  Failed: {}", report.photo_failures);
}

/// Prints store statistics to stdout
pub fn print_statistics(stats: &StoreStatistics) {
    println!("=== Store Statistics ===\n");
    println!("  Stored items: {}", stats.stored_items);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::Item;
    use crate::storage::SqliteItemStore;

    #[test]
    fn test_load_statistics_counts_items() {
        let mut store = SqliteItemStore::new_in_memory().unwrap();
        assert_eq!(load_statistics(&store).unwrap().stored_items, 0);

        let item = Item {
            price: 1,
            title: "t".to_string(),
            url: "/t".to_string(),
            category: "c".to_string(),
            company: String::new(),
            location: String::new(),
            date: String::new(),
            photourls: vec![],
        };
        store.insert_missing(&[("h", &item)]).unwrap();

        assert_eq!(load_statistics(&store).unwrap().stored_items, 1);
    }
}
