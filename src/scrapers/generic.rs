use async_trait::async_trait;
use rust_decimal::Decimal;
use scraper::Html;

use crate::config::ScraperConfig;
use crate::parse::{extract_candidate_prices, parse_currency};
use crate::scrapers::{fetch_page, first_attr, first_text, ProductScraper, ProductSnapshot};
use crate::utils::error::ScrapeError;

/// Heuristic probes for arbitrary storefronts, most explicit markup first.
/// `meta` entries are read via their `content` attribute.
const PRICE_SELECTORS: &[&str] = &[
    ".price",
    r#"meta[property="product:price:amount"]"#,
    r#"[class*="price"]"#,
    r#"[id*="price"]"#,
    "[data-price]",
    r#"meta[property="og:price:amount"]"#,
    r#"meta[itemprop="price"]"#,
];

const IMAGE_SELECTORS: &[&str] = &[
    r#"meta[property="og:image"]"#,
    r#"meta[name="twitter:image"]"#,
    r#"[class*="product"] img"#,
    r#"img[itemprop="image"]"#,
];

/// Fallback scraper: accepts every URL and works off heuristic selectors and
/// social/metadata markup instead of platform-specific structure.
pub struct GenericScraper {
    config: ScraperConfig,
}

impl GenericScraper {
    pub fn new(config: ScraperConfig) -> Self {
        Self { config }
    }
}

pub(crate) fn parse_snapshot(html: &str, url: &str) -> Result<ProductSnapshot, ScrapeError> {
    let document = Html::parse_document(html);

    let title = first_text(&document, "title").ok_or(ScrapeError::MissingTitle)?;

    let mut candidates: Vec<Decimal> = Vec::new();
    let mut currency: Option<String> = None;
    for selector in PRICE_SELECTORS {
        let text = if selector.starts_with("meta") {
            first_attr(&document, selector, "content")
        } else {
            first_text(&document, selector)
        };
        if let Some(text) = text {
            candidates.extend(extract_candidate_prices(&text));
            if currency.is_none() {
                currency = parse_currency(&text);
            }
        }
        if !candidates.is_empty() && currency.is_some() {
            break;
        }
    }

    // Generic pages often render a struck-through original price next to the
    // discounted one; the lowest plausible candidate is the likelier current
    // price.
    candidates.sort();
    candidates.dedup();
    let price = candidates.first().copied();

    let currency = currency
        .or_else(|| {
            first_attr(
                &document,
                r#"meta[property="product:price:currency"], meta[itemprop="priceCurrency"]"#,
                "content",
            )
        })
        .unwrap_or_else(|| "INR".to_string());

    let image_url = IMAGE_SELECTORS.iter().find_map(|selector| {
        if selector.starts_with("meta") {
            first_attr(&document, selector, "content")
        } else {
            first_attr(&document, selector, "src")
        }
    });

    // Structured availability markup is rare on arbitrary sites.
    Ok(ProductSnapshot {
        title,
        price,
        currency,
        image_url,
        is_available: true,
        product_key: url.to_string(),
    })
}

#[async_trait]
impl ProductScraper for GenericScraper {
    fn can_handle(&self, _url: &str) -> bool {
        true
    }

    async fn scrape(&self, url: &str) -> Result<ProductSnapshot, ScrapeError> {
        let html = fetch_page(&self.config, url, "en-US,en;q=0.9").await?;
        parse_snapshot(&html, url)
    }
}
