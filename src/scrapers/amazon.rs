use async_trait::async_trait;
use regex::Regex;
use scraper::Html;
use std::sync::OnceLock;

use crate::config::ScraperConfig;
use crate::parse::{parse_currency, parse_price};
use crate::scrapers::{fetch_page, first_attr, first_text, ProductScraper, ProductSnapshot};
use crate::utils::error::ScrapeError;

/// Probed in order; the first selector yielding a parseable price wins.
const PRICE_SELECTORS: &[&str] = &[
    ".a-price .a-offscreen",
    "#priceblock_ourprice",
    "#priceblock_dealprice",
    ".a-price-whole",
];

pub struct AmazonScraper {
    config: ScraperConfig,
}

impl AmazonScraper {
    pub fn new(config: ScraperConfig) -> Self {
        Self { config }
    }
}

fn asin_regexes() -> &'static [Regex; 2] {
    static RE: OnceLock<[Regex; 2]> = OnceLock::new();
    RE.get_or_init(|| {
        [
            Regex::new(r"(?i)/dp/([A-Z0-9]{10})").unwrap(),
            Regex::new(r"(?i)/gp/product/([A-Z0-9]{10})").unwrap(),
        ]
    })
}

fn extract_product_key(url: &str) -> Option<String> {
    asin_regexes()
        .iter()
        .find_map(|re| re.captures(url))
        .map(|caps| caps[1].to_string())
}

pub(crate) fn parse_snapshot(html: &str, url: &str) -> Result<ProductSnapshot, ScrapeError> {
    let document = Html::parse_document(html);

    let title = first_text(&document, "#productTitle, #title").ok_or(ScrapeError::MissingTitle)?;

    let mut price = None;
    let mut currency = "USD".to_string();
    for selector in PRICE_SELECTORS {
        if let Some(text) = first_text(&document, selector) {
            if let Some(parsed) = parse_price(&text) {
                price = Some(parsed);
                if let Some(code) = parse_currency(&text) {
                    currency = code;
                }
                break;
            }
        }
    }

    let image_url = first_attr(&document, "#landingImage, #imgBlkFront", "src");

    let availability = first_text(&document, "#availability span")
        .unwrap_or_else(|| "In Stock".to_string())
        .to_lowercase();
    let is_available =
        !availability.contains("unavailable") && !availability.contains("out of stock");

    Ok(ProductSnapshot {
        title,
        price,
        currency,
        image_url,
        is_available,
        product_key: extract_product_key(url).unwrap_or_else(|| url.to_string()),
    })
}

#[async_trait]
impl ProductScraper for AmazonScraper {
    fn can_handle(&self, url: &str) -> bool {
        url.contains("amazon.com") || url.contains("amazon.in")
    }

    async fn scrape(&self, url: &str) -> Result<ProductSnapshot, ScrapeError> {
        let html = fetch_page(&self.config, url, "en-US,en;q=0.9").await?;
        parse_snapshot(&html, url)
    }
}
