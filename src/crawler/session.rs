//! Crawl session - the incremental crawl/dedup loop
//!
//! A session owns the known-items set. Each results page is fetched, parsed
//! into items, filtered by price and hashed; items whose hash is not known
//! yet become known, get their photos downloaded and are reported as new.

use crate::crawler::page::PageItems;
use crate::crawler::photos::{download_photo, photo_file_name};
use crate::crawler::CrawlParams;
use crate::fetcher::Fetcher;
use crate::item::{hash_item, Item};
use crate::output::CrawlReport;
use crate::site::{describe_block, PageQuery, SiteAdapter};
use crate::state::KnownItems;
use crate::storage::{ItemStore, StorageResult};
use crate::SiteError;
use scraper::Html;
use std::fs;

/// One crawl over the configured query x category x page space
pub struct CrawlSession<A, F> {
    adapter: A,
    fetcher: F,
    params: CrawlParams,
    known: KnownItems,
    report: CrawlReport,
}

impl<A: SiteAdapter, F: Fetcher> CrawlSession<A, F> {
    /// Creates a session with an empty known-items set
    pub fn new(adapter: A, fetcher: F, params: CrawlParams) -> Self {
        Self {
            adapter,
            fetcher,
            params,
            known: KnownItems::new(),
            report: CrawlReport::default(),
        }
    }

    pub fn adapter(&self) -> &A {
        &self.adapter
    }

    pub fn params(&self) -> &CrawlParams {
        &self.params
    }

    pub fn known(&self) -> &KnownItems {
        &self.known
    }

    /// Counters accumulated since the session was created
    pub fn report(&self) -> &CrawlReport {
        &self.report
    }

    /// Returns true if the item passes the configured price filter
    pub fn check_item(&self, item: &Item) -> bool {
        self.params.price.accepts(item.price)
    }

    /// Identity hash of an item under this site's field order
    pub fn hash_item(&self, item: &Item) -> String {
        hash_item(item, self.adapter.hash_fields())
    }

    /// Crawls every (query, category) pair and returns the hashes of all newly
    /// discovered items in discovery order
    ///
    /// Paging for a pair stops at the first page that yields nothing new, even
    /// if `max_pages` would allow more. Later pages with new items are missed
    /// in that case.
    pub fn refresh(&mut self) -> Vec<String> {
        let queries = self.params.queries.clone();
        let categories = self.params.categories.clone();
        let mut new_hashes = Vec::new();

        tracing::info!(
            "Refreshing {}: {} queries x {} categories, up to {} pages each",
            self.adapter.name(),
            queries.len(),
            categories.len(),
            self.params.max_pages
        );

        for terms in &queries {
            for category in &categories {
                for page in 1..=self.params.max_pages {
                    let query = PageQuery {
                        terms: terms.clone(),
                        category: category.clone(),
                        page,
                    };

                    let found = self.refresh_page(&query);
                    if found.is_empty() {
                        tracing::debug!("No new items on {}, moving on", query);
                        break;
                    }

                    tracing::debug!("{} new items on {}", found.len(), query);
                    new_hashes.extend(found);

                    if !self.params.page_delay.is_zero() {
                        std::thread::sleep(self.params.page_delay);
                    }
                }
            }
        }

        tracing::info!(
            "Refresh complete: {} new items, {} known",
            new_hashes.len(),
            self.known.len()
        );

        new_hashes
    }

    /// Fetches one results page and registers the items not seen before
    ///
    /// Site errors are logged and yield an empty list; they never abort the
    /// crawl. An item stays known even if its photos fail to download.
    pub fn refresh_page(&mut self, query: &PageQuery) -> Vec<String> {
        let url = match self.adapter.build_url(query) {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!("Attention: {}\t({})", e, query);
                self.report.pages_failed += 1;
                return Vec::new();
            }
        };

        let items = match self.get_items(url.as_str()) {
            Ok(items) => items,
            Err(e) => {
                tracing::warn!("Attention: {}\t({})", e, query);
                self.report.pages_failed += 1;
                return Vec::new();
            }
        };

        let mut new_hashes = Vec::new();
        for (hash, item) in items {
            if self.known.contains(&hash) {
                continue;
            }

            let photourls = item.photourls.clone();
            self.known.insert(hash.clone(), item);
            self.report.new_items += 1;
            self.download_item_photos(&hash, &photourls);
            new_hashes.push(hash);
        }

        new_hashes
    }

    /// Fetches and parses one results page
    ///
    /// There is no check against the known-items set here. An unreachable
    /// host yields an empty mapping; any other status than 200, a transport
    /// failure or the adapter's post-parse hook yield a [`SiteError`].
    pub fn get_items(&mut self, url: &str) -> Result<PageItems, SiteError> {
        self.report.pages_fetched += 1;

        let response = match self.fetcher.get(url) {
            Ok(response) => response,
            Err(e) if e.is_unreachable() => {
                tracing::warn!("{}", e);
                return Ok(PageItems::new());
            }
            Err(e) => {
                return Err(SiteError::Transport {
                    url: url.to_string(),
                    message: e.to_string(),
                })
            }
        };

        if response.status != 200 {
            return Err(SiteError::Status {
                status: response.status,
            });
        }

        let page = Html::parse_document(&response.text());
        self.adapter.post_parse_hook(&page)?;

        let mut items = PageItems::new();
        for block in self.adapter.select_item_blocks(&page) {
            match self.adapter.parse_block(block) {
                Ok(item) => {
                    self.report.items_parsed += 1;
                    if !self.check_item(&item) {
                        self.report.items_rejected += 1;
                        continue;
                    }
                    let hash = self.hash_item(&item);
                    items.insert(hash, item);
                }
                Err(e) => {
                    self.report.parse_errors += 1;
                    let diagnostics = describe_block(block);
                    tracing::warn!(
                        attributes = ?diagnostics.attributes,
                        links = ?diagnostics.links,
                        "Skipping listing that failed to parse: {}",
                        e
                    );
                }
            }
        }

        Ok(items)
    }

    /// Persists known items that the store does not have yet
    ///
    /// With `hashes`, only those items are considered; hashes that are not in
    /// the known-items set are skipped with a warning.
    ///
    /// # Returns
    ///
    /// The hashes actually inserted; empty when everything was already stored
    pub fn save(
        &self,
        store: &mut dyn ItemStore,
        hashes: Option<&[String]>,
    ) -> StorageResult<Vec<String>> {
        let records: Vec<(&str, &Item)> = match hashes {
            None => self
                .known
                .iter()
                .map(|(hash, item)| (hash.as_str(), item))
                .collect(),
            Some(hashes) => hashes
                .iter()
                .filter_map(|hash| match self.known.get(hash) {
                    Some(item) => Some((hash.as_str(), item)),
                    None => {
                        tracing::warn!("Not saving unknown item {}", hash);
                        None
                    }
                })
                .collect(),
        };

        let inserted = store.insert_missing(&records)?;
        tracing::info!(
            "Saved {} new items ({} already stored)",
            inserted.len(),
            records.len() - inserted.len()
        );

        Ok(inserted)
    }

    /// Replaces the known-items set with the full contents of `store`
    ///
    /// # Returns
    ///
    /// The number of items loaded
    pub fn load(&mut self, store: &dyn ItemStore) -> StorageResult<usize> {
        let items = store.load_all()?;
        let count = items.len();
        self.known.replace(items);
        tracing::info!("Loaded {} known items", count);
        Ok(count)
    }

    /// Stores an item's photos under `<photo_dir>/<hash>/`, skipping files
    /// that are already there
    fn download_item_photos(&mut self, hash: &str, photourls: &[String]) {
        let dir = self.params.photo_dir.join(hash);
        if let Err(e) = fs::create_dir_all(&dir) {
            tracing::warn!("Cannot create photo directory {}: {}", dir.display(), e);
            self.report.photo_failures += photourls.len();
            return;
        }

        for raw in photourls {
            let Some(url) = self.adapter.photo_url(raw) else {
                tracing::warn!("Cannot resolve photo URL {:?} of item {}", raw, hash);
                self.report.photo_failures += 1;
                continue;
            };
            let Some(name) = photo_file_name(&url) else {
                tracing::warn!("Photo URL {} has no file name", url);
                self.report.photo_failures += 1;
                continue;
            };

            let path = dir.join(name);
            if path.exists() {
                self.report.photos_skipped += 1;
                continue;
            }

            match download_photo(&self.fetcher, url.as_str(), &path) {
                Ok(()) => self.report.photos_downloaded += 1,
                Err(e) => {
                    tracing::warn!("Photo download failed for item {}: {}", hash, e);
                    self.report.photo_failures += 1;
                }
            }
        }
    }
}
