//! Adapter for the avito.ru search results layout
//!
//! A results page contains one block per listing:
//!
//! ```text
//! <div class="item ...">
//!   <div class="b-photo"><a><img src="//..."></a></div>
//!   <div class="description">
//!     <h3 class="title"><a href="/moskva/...">Title</a></h3>
//!     <div class="about">1 500 руб.</div>
//!     <div class="data">
//!       <p>Category<br>Company</p>
//!       <p>Location</p>
//!       <div class="date">Вчера 12:30</div>
//!     </div>
//!   </div>
//! </div>
//! ```

use crate::config::SiteConfig;
use crate::item::{normalize_date, normalize_str, Item, ItemParseError};
use crate::site::{PageQuery, SiteAdapter};
use crate::SiteError;
use scraper::{ElementRef, Html, Selector};
use url::Url;

const ITEM_BLOCKS: &str = r#"[class^="item"]"#;
const QUERY_CORRECTION: &str = r#"[class="catalog-correction"]"#;

pub struct AvitoAdapter {
    base: Url,
    location: String,
}

impl AvitoAdapter {
    pub fn new(config: &SiteConfig) -> Result<Self, url::ParseError> {
        let base = Url::parse(&config.base_url)?;
        if base.cannot_be_a_base() {
            return Err(url::ParseError::RelativeUrlWithCannotBeABaseBase);
        }
        Ok(Self {
            base,
            location: config.location.clone(),
        })
    }

    fn absolute(&self, relative: &str) -> String {
        self.base
            .join(relative)
            .map(|url| url.to_string())
            .unwrap_or_else(|_| format!("{}{}", self.base, relative))
    }
}

impl SiteAdapter for AvitoAdapter {
    fn name(&self) -> &str {
        "avito"
    }

    fn build_url(&self, query: &PageQuery) -> Result<Url, SiteError> {
        // Appended below the base path, which may lack a trailing slash
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| SiteError::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .extend(
                self.location
                    .split('/')
                    .chain(query.category.split('/'))
                    .filter(|segment| !segment.is_empty()),
            );

        url.query_pairs_mut()
            .append_pair("q", &query.terms.join(" "))
            .append_pair("p", &query.page.to_string());

        Ok(url)
    }

    fn post_parse_hook(&self, page: &Html) -> Result<(), SiteError> {
        if let Ok(selector) = Selector::parse(QUERY_CORRECTION) {
            if page.select(&selector).next().is_some() {
                return Err(SiteError::QueryCorrected);
            }
        }
        Ok(())
    }

    fn select_item_blocks<'a>(&self, page: &'a Html) -> Vec<ElementRef<'a>> {
        match Selector::parse(ITEM_BLOCKS) {
            Ok(selector) => page.select(&selector).collect(),
            Err(_) => Vec::new(),
        }
    }

    fn parse_block(&self, block: ElementRef<'_>) -> Result<Item, ItemParseError> {
        let description = child_with_class(block, "description")
            .ok_or(ItemParseError::MissingElement("description"))?;

        let about = child_with_class(description, "about")
            .ok_or(ItemParseError::MissingElement("about"))?;
        let price = parse_price(
            first_text(about).ok_or(ItemParseError::MissingElement("price text"))?,
        )?;

        let link = child_with_class(description, "title")
            .and_then(|title| child_named(title, "a"))
            .ok_or(ItemParseError::MissingElement("title link"))?;
        let title = normalize_str(
            first_text(link).ok_or(ItemParseError::MissingElement("title text"))?,
        );
        let url = link
            .value()
            .attr("href")
            .ok_or(ItemParseError::MissingAttribute {
                element: "title link",
                attribute: "href",
            })?
            .to_string();

        let data = child_with_class(description, "data")
            .ok_or(ItemParseError::MissingElement("data"))?;
        let mut paragraphs = data
            .children()
            .filter_map(ElementRef::wrap)
            .filter(|e| e.value().name() == "p");

        let category_and_company = paragraphs
            .next()
            .map(own_text)
            .ok_or(ItemParseError::MissingElement("category"))?;
        let category = category_and_company
            .first()
            .map(|s| normalize_str(s))
            .ok_or(ItemParseError::MissingElement("category"))?;
        let company = category_and_company
            .get(1)
            .map(|s| normalize_str(s))
            .unwrap_or_default();

        // Some listings have no location paragraph
        let location = paragraphs
            .next()
            .and_then(first_text)
            .map(normalize_str)
            .unwrap_or_default();

        let date = child_with_class(data, "date")
            .and_then(first_text)
            .ok_or(ItemParseError::MissingElement("date"))?;
        let date = normalize_str(&normalize_date(date));

        let photourls = child_with_class(block, "b-photo")
            .and_then(|photo| child_named(photo, "a"))
            .and_then(|a| child_named(a, "img"))
            .and_then(|img| img.value().attr("src"))
            .map(|src| vec![src.to_string()])
            .unwrap_or_default();

        Ok(Item {
            price,
            title,
            url,
            category,
            company,
            location,
            date,
            photourls,
        })
    }

    fn render_item(&self, item: &Item) -> String {
        format!(
            "\x1b[1;31m{}\x1b[0m\n\t{}\t{}\t{}\n\t{}\n",
            item.title,
            item.price,
            item.date,
            item.location,
            self.absolute(&item.url)
        )
    }

    fn photo_url(&self, raw: &str) -> Option<Url> {
        self.base.join(raw).ok()
    }
}

/// First child element whose class attribute is exactly `class`
fn child_with_class<'a>(element: ElementRef<'a>, class: &str) -> Option<ElementRef<'a>> {
    element
        .children()
        .filter_map(ElementRef::wrap)
        .find(|child| child.value().attr("class") == Some(class))
}

fn child_named<'a>(element: ElementRef<'a>, name: &str) -> Option<ElementRef<'a>> {
    element
        .children()
        .filter_map(ElementRef::wrap)
        .find(|child| child.value().name() == name)
}

/// Non-blank text nodes that are direct children of `element`
fn own_text(element: ElementRef<'_>) -> Vec<&str> {
    element
        .children()
        .filter_map(|node| node.value().as_text())
        .map(|text| &**text)
        .filter(|text| !text.trim().is_empty())
        .collect()
}

fn first_text(element: ElementRef<'_>) -> Option<&str> {
    own_text(element).into_iter().next()
}

/// Keeps only the digits of a price label; no digits means "not specified"
fn parse_price(text: &str) -> Result<u64, ItemParseError> {
    let digits: String = text.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return Ok(0);
    }
    digits
        .parse()
        .map_err(|_| ItemParseError::InvalidPrice(text.trim().to_string()))
}
