use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::evaluator::ItemPatch;
use crate::models::{generate_id, Platform};
use crate::scrapers::ProductSnapshot;

pub const DEFAULT_CHECK_INTERVAL_HOURS: i64 = 24;

/// One user's subscription to a product page.
///
/// Price fields are only ever written by the evaluator pipeline; user edits
/// touch `target_price` and `check_interval_hours` alone. The currency is
/// fixed by the first successful scrape.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrackedItem {
    pub id: String,
    pub owner_id: String,
    pub url: String,
    pub platform: Platform,
    pub product_key: String,
    pub title: String,
    pub image_url: Option<String>,
    pub currency: String,
    pub current_price: Option<Decimal>,
    pub target_price: Option<Decimal>,
    pub lowest_price: Option<Decimal>,
    pub highest_price: Option<Decimal>,
    pub is_available: bool,
    pub last_checked_at: Option<DateTime<Utc>>,
    pub check_interval_hours: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTrackedItem {
    pub owner_id: String,
    pub url: String,
    pub target_price: Option<Decimal>,
}

impl TrackedItem {
    /// Builds the item from its first successful extraction. The first
    /// observed price seeds the lowest/highest bounds.
    pub fn from_snapshot(new: NewTrackedItem, platform: Platform, snapshot: &ProductSnapshot) -> Self {
        let now = Utc::now();
        Self {
            id: generate_id(),
            owner_id: new.owner_id,
            url: new.url,
            platform,
            product_key: snapshot.product_key.clone(),
            title: snapshot.title.clone(),
            image_url: snapshot.image_url.clone(),
            currency: snapshot.currency.clone(),
            current_price: snapshot.price,
            target_price: new.target_price,
            lowest_price: snapshot.price,
            highest_price: snapshot.price,
            is_available: snapshot.is_available,
            last_checked_at: Some(now),
            check_interval_hours: DEFAULT_CHECK_INTERVAL_HOURS,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether enough time has elapsed since the last check. Items that were
    /// never checked are always due.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        match self.last_checked_at {
            None => true,
            Some(checked) => {
                now.signed_duration_since(checked) >= Duration::hours(self.check_interval_hours)
            }
        }
    }

    /// Applies an evaluator patch in memory. `None` price fields in the patch
    /// leave the stored value untouched.
    pub fn apply(&mut self, patch: &ItemPatch) {
        if let Some(price) = patch.current_price {
            self.current_price = Some(price);
        }
        if let Some(price) = patch.lowest_price {
            self.lowest_price = Some(price);
        }
        if let Some(price) = patch.highest_price {
            self.highest_price = Some(price);
        }
        self.is_available = patch.is_available;
        self.last_checked_at = Some(patch.last_checked_at);
        self.updated_at = patch.last_checked_at;
    }
}
