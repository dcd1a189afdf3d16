use async_trait::async_trait;
use regex::Regex;
use scraper::Html;
use std::sync::OnceLock;

use crate::config::ScraperConfig;
use crate::parse::{parse_currency, parse_price};
use crate::scrapers::{fetch_page, first_attr, first_text, ProductScraper, ProductSnapshot};
use crate::utils::error::ScrapeError;

// Flipkart rotates its obfuscated class names; newer variants first.
const PRICE_SELECTORS: &[&str] = &[
    "div.Nx9bqj.CxhGGd",
    "div._30jeq3._16Jk6d",
    "div._25b18c div._30jeq3",
];

pub struct FlipkartScraper {
    config: ScraperConfig,
}

impl FlipkartScraper {
    pub fn new(config: ScraperConfig) -> Self {
        Self { config }
    }
}

fn pid_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)pid=([A-Z0-9]+)").unwrap())
}

fn extract_product_key(url: &str) -> Option<String> {
    pid_regex().captures(url).map(|caps| caps[1].to_string())
}

pub(crate) fn parse_snapshot(html: &str, url: &str) -> Result<ProductSnapshot, ScrapeError> {
    let document = Html::parse_document(html);

    let title =
        first_text(&document, "span.VU-ZEz, h1.yhB1nd").ok_or(ScrapeError::MissingTitle)?;

    let mut price = None;
    let mut currency = "INR".to_string();
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

    let image_url = first_attr(&document, "img.DByuf4", "src");

    // The add-to-cart button doubles as the stock signal.
    let button_text = first_text(&document, "button._2KpZ6l._2U9uOA")
        .unwrap_or_else(|| "ADD TO CART".to_string())
        .to_lowercase();
    let is_available = button_text.contains("add to cart") || button_text.contains("buy now");

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
impl ProductScraper for FlipkartScraper {
    fn can_handle(&self, url: &str) -> bool {
        url.contains("flipkart.com")
    }

    async fn scrape(&self, url: &str) -> Result<ProductSnapshot, ScrapeError> {
        let html = fetch_page(&self.config, url, "en-IN,en;q=0.9").await?;
        parse_snapshot(&html, url)
    }
}
