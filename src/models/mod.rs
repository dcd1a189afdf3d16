use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

pub mod notification;
pub mod price_history;
pub mod scrape_log;
pub mod tracked_item;

pub use notification::*;
pub use price_history::*;
pub use scrape_log::*;
pub use tracked_item::*;

/// Known storefront platforms. Classification is by URL substring and is
/// independent of which scraper ends up handling the page.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Amazon,
    Flipkart,
    Walmart,
    Aliexpress,
    Other,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Amazon => "amazon",
            Platform::Flipkart => "flipkart",
            Platform::Walmart => "walmart",
            Platform::Aliexpress => "aliexpress",
            Platform::Other => "other",
        }
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "amazon" => Ok(Platform::Amazon),
            "flipkart" => Ok(Platform::Flipkart),
            "walmart" => Ok(Platform::Walmart),
            "aliexpress" => Ok(Platform::Aliexpress),
            "other" => Ok(Platform::Other),
            other => Err(format!("unknown platform: {}", other)),
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    PriceDrop,
    BackInStock,
    TargetReached,
    ScrapingError,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::PriceDrop => "price_drop",
            EventKind::BackInStock => "back_in_stock",
            EventKind::TargetReached => "target_reached",
            EventKind::ScrapingError => "scraping_error",
        }
    }
}

impl FromStr for EventKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "price_drop" => Ok(EventKind::PriceDrop),
            "back_in_stock" => Ok(EventKind::BackInStock),
            "target_reached" => Ok(EventKind::TargetReached),
            "scraping_error" => Ok(EventKind::ScrapingError),
            other => Err(format!("unknown event kind: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ScrapeStatus {
    Success,
    Failed,
    RateLimited,
    Blocked,
}

impl ScrapeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScrapeStatus::Success => "success",
            ScrapeStatus::Failed => "failed",
            ScrapeStatus::RateLimited => "rate_limited",
            ScrapeStatus::Blocked => "blocked",
        }
    }
}

pub fn generate_id() -> String {
    Uuid::new_v4().simple().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_round_trip() {
        for platform in [
            Platform::Amazon,
            Platform::Flipkart,
            Platform::Walmart,
            Platform::Aliexpress,
            Platform::Other,
        ] {
            assert_eq!(platform.as_str().parse::<Platform>().unwrap(), platform);
        }
        assert!("ebay".parse::<Platform>().is_err());
    }

    #[test]
    fn test_event_kind_serialization() {
        assert_eq!(
            serde_json::to_string(&EventKind::PriceDrop).unwrap(),
            "\"price_drop\""
        );
        assert_eq!(
            serde_json::to_string(&EventKind::BackInStock).unwrap(),
            "\"back_in_stock\""
        );
        assert_eq!(
            serde_json::from_str::<EventKind>("\"target_reached\"").unwrap(),
            EventKind::TargetReached
        );
    }

    #[test]
    fn test_scrape_status_values() {
        assert_eq!(ScrapeStatus::RateLimited.as_str(), "rate_limited");
        assert_eq!(
            serde_json::to_string(&ScrapeStatus::Blocked).unwrap(),
            "\"blocked\""
        );
    }

    #[test]
    fn test_generate_id() {
        let id1 = generate_id();
        let id2 = generate_id();

        assert_ne!(id1, id2);
        assert_eq!(id1.len(), 32);
        assert!(id1.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
