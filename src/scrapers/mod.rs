use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::ScraperConfig;
use crate::models::Platform;
use crate::utils::error::ScrapeError;

pub mod amazon;
pub mod flipkart;
pub mod generic;
pub mod session;

pub use amazon::AmazonScraper;
pub use flipkart::FlipkartScraper;
pub use generic::GenericScraper;
use session::BrowserSession;

/// The structured result of one extraction attempt. Price and image are
/// best-effort; a missing title fails the attempt instead.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductSnapshot {
    pub title: String,
    pub price: Option<Decimal>,
    pub currency: String,
    pub image_url: Option<String>,
    pub is_available: bool,
    pub product_key: String,
}

/// Capability contract shared by every platform scraper and the generic
/// fallback.
#[async_trait]
pub trait ProductScraper: Send + Sync {
    fn can_handle(&self, url: &str) -> bool;
    async fn scrape(&self, url: &str) -> Result<ProductSnapshot, ScrapeError>;
}

/// Ordered scraper dispatch: most specific platform matchers first, generic
/// fallback last. The fallback accepts any URL, so selection never fails.
pub struct ScraperRegistry {
    scrapers: Vec<Box<dyn ProductScraper>>,
    fallback: Box<dyn ProductScraper>,
}

impl ScraperRegistry {
    pub fn new(config: ScraperConfig) -> Self {
        Self::with_scrapers(
            vec![
                Box::new(AmazonScraper::new(config.clone())),
                Box::new(FlipkartScraper::new(config.clone())),
            ],
            Box::new(GenericScraper::new(config)),
        )
    }

    pub fn with_scrapers(
        scrapers: Vec<Box<dyn ProductScraper>>,
        fallback: Box<dyn ProductScraper>,
    ) -> Self {
        Self { scrapers, fallback }
    }

    pub fn select(&self, url: &str) -> &dyn ProductScraper {
        self.scrapers
            .iter()
            .find(|scraper| scraper.can_handle(url))
            .map(|scraper| scraper.as_ref())
            .unwrap_or(self.fallback.as_ref())
    }
}

/// Classifies a URL by storefront domain. Independent of which scraper ends
/// up handling the extraction.
pub fn detect_platform(url: &str) -> Platform {
    if url.contains("amazon.com") || url.contains("amazon.in") {
        Platform::Amazon
    } else if url.contains("flipkart.com") {
        Platform::Flipkart
    } else if url.contains("walmart.com") {
        Platform::Walmart
    } else if url.contains("aliexpress.com") {
        Platform::Aliexpress
    } else {
        Platform::Other
    }
}

/// Fetches the rendered HTML of a page inside a fresh browser session.
///
/// The blocking browser work runs on the blocking pool; an outer timeout
/// bounds the whole attempt (navigation timeout plus settle delay) so a hung
/// session can never stall a cycle indefinitely.
pub(crate) async fn fetch_page(
    config: &ScraperConfig,
    url: &str,
    accept_language: &str,
) -> Result<String, ScrapeError> {
    let user_agent = config.random_user_agent().to_string();
    let accept_language = accept_language.to_string();
    let nav_timeout = Duration::from_secs(config.nav_timeout_secs);
    let url = url.to_string();

    let fetch = tokio::task::spawn_blocking(move || {
        let session = BrowserSession::open(&user_agent, &accept_language, nav_timeout)?;
        session.navigate(&url)?;
        session.settle();
        session.content()
    });

    // Settle delay is at most 3s; the rest is slack for browser startup.
    match tokio::time::timeout(nav_timeout + Duration::from_secs(10), fetch).await {
        Err(_) => Err(ScrapeError::Timeout),
        Ok(Err(join_err)) => Err(ScrapeError::Browser(join_err.to_string())),
        Ok(Ok(result)) => result,
    }
}

/// First matching element's joined text, if any and non-empty.
pub(crate) fn first_text(document: &scraper::Html, selector: &str) -> Option<String> {
    let selector = scraper::Selector::parse(selector).ok()?;
    document
        .select(&selector)
        .next()
        .map(|el| el.text().collect::<Vec<_>>().join(" ").trim().to_string())
        .filter(|text| !text.is_empty())
}

/// First matching element's attribute value, if any and non-empty.
pub(crate) fn first_attr(document: &scraper::Html, selector: &str, attr: &str) -> Option<String> {
    let selector = scraper::Selector::parse(selector).ok()?;
    document
        .select(&selector)
        .next()
        .and_then(|el| el.value().attr(attr))
        .map(str::to_string)
        .filter(|value| !value.is_empty())
}
