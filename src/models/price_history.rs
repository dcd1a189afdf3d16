use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::generate_id;

/// One immutable point in an item's price history. Rows are append-only and
/// disappear only when the owning item is deleted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PriceObservation {
    pub id: String,
    pub item_id: String,
    pub price: Decimal,
    pub currency: String,
    pub is_available: bool,
    pub observed_at: DateTime<Utc>,
}

impl PriceObservation {
    pub fn new(item_id: String, price: Decimal, currency: String, is_available: bool) -> Self {
        Self {
            id: generate_id(),
            item_id,
            price,
            currency,
            is_available,
            observed_at: Utc::now(),
        }
    }
}
