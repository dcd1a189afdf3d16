use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{generate_id, EventKind};

/// A domain event produced by the change evaluator (or by the scheduler for
/// extraction failures during item creation). The item reference is absent
/// for creation failures where no item exists yet.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Notification {
    pub id: String,
    pub owner_id: String,
    pub item_id: Option<String>,
    pub kind: EventKind,
    pub title: String,
    pub message: String,
    pub old_price: Option<Decimal>,
    pub new_price: Option<Decimal>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(
        owner_id: String,
        item_id: Option<String>,
        kind: EventKind,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            id: generate_id(),
            owner_id,
            item_id,
            kind,
            title: title.into(),
            message: message.into(),
            old_price: None,
            new_price: None,
            is_read: false,
            created_at: Utc::now(),
        }
    }

    pub fn with_prices(mut self, old_price: Decimal, new_price: Decimal) -> Self {
        self.old_price = Some(old_price);
        self.new_price = Some(new_price);
        self
    }
}
