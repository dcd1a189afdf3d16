//! Pure change-detection logic shared by the scheduled cycle and the manual
//! refresh path. Both call sites persist exactly what this module decides.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{EventKind, Notification, TrackedItem};
use crate::scrapers::ProductSnapshot;

/// Minimum relative drop before a plain price-drop event fires.
const DROP_THRESHOLD_PCT: Decimal = Decimal::from_parts(5, 0, 0, false, 0);

/// Field updates to apply to the tracked item. `None` price fields mean
/// "leave the stored value untouched" — they are only set when a price was
/// extracted, and the min/max bounds only move toward the observed price.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ItemPatch {
    pub current_price: Option<Decimal>,
    pub lowest_price: Option<Decimal>,
    pub highest_price: Option<Decimal>,
    pub is_available: bool,
    pub last_checked_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct Evaluation {
    pub patch: ItemPatch,
    pub events: Vec<Notification>,
}

/// Maps (previous item state, new snapshot) to a state patch plus zero or
/// more domain events. Pure: identical inputs produce identical outputs.
pub fn evaluate(item: &TrackedItem, snapshot: &ProductSnapshot, now: DateTime<Utc>) -> Evaluation {
    let mut patch = ItemPatch {
        current_price: None,
        lowest_price: None,
        highest_price: None,
        is_available: snapshot.is_available,
        last_checked_at: now,
    };
    let mut events = Vec::new();

    if let Some(new_price) = snapshot.price {
        patch.current_price = Some(new_price);

        if item.lowest_price.map_or(true, |lowest| new_price < lowest) {
            patch.lowest_price = Some(new_price);
        }
        if item.highest_price.map_or(true, |highest| new_price > highest) {
            patch.highest_price = Some(new_price);
        }

        // Price events need a previous price to compare against; the first
        // observation only seeds the bounds.
        if let Some(old_price) = item.current_price {
            if new_price < old_price {
                let drop_pct = (old_price - new_price) / old_price * Decimal::ONE_HUNDRED;
                let target_hit = item.target_price.map_or(false, |target| new_price <= target);

                if target_hit {
                    events.push(target_reached_event(item, old_price, new_price, now));
                } else if drop_pct >= DROP_THRESHOLD_PCT {
                    events.push(price_drop_event(item, old_price, new_price, drop_pct, now));
                }
            }
        }
    }

    if !item.is_available && snapshot.is_available {
        events.push(back_in_stock_event(item, now));
    }

    Evaluation { patch, events }
}

fn price_drop_event(
    item: &TrackedItem,
    old_price: Decimal,
    new_price: Decimal,
    drop_pct: Decimal,
    now: DateTime<Utc>,
) -> Notification {
    Notification {
        id: crate::models::generate_id(),
        owner_id: item.owner_id.clone(),
        item_id: Some(item.id.clone()),
        kind: EventKind::PriceDrop,
        title: "Price Drop Alert".to_string(),
        message: format!(
            "{} price dropped from {} {} to {} {} ({}% off)",
            item.title,
            item.currency,
            old_price,
            item.currency,
            new_price,
            drop_pct.round_dp(1)
        ),
        old_price: Some(old_price),
        new_price: Some(new_price),
        is_read: false,
        created_at: now,
    }
}

fn target_reached_event(
    item: &TrackedItem,
    old_price: Decimal,
    new_price: Decimal,
    now: DateTime<Utc>,
) -> Notification {
    Notification {
        id: crate::models::generate_id(),
        owner_id: item.owner_id.clone(),
        item_id: Some(item.id.clone()),
        kind: EventKind::TargetReached,
        title: "Target Price Reached".to_string(),
        message: format!(
            "{} dropped to {} {}, at or below your target price",
            item.title, item.currency, new_price
        ),
        old_price: Some(old_price),
        new_price: Some(new_price),
        is_read: false,
        created_at: now,
    }
}

fn back_in_stock_event(item: &TrackedItem, now: DateTime<Utc>) -> Notification {
    Notification {
        id: crate::models::generate_id(),
        owner_id: item.owner_id.clone(),
        item_id: Some(item.id.clone()),
        kind: EventKind::BackInStock,
        title: "Back in Stock".to_string(),
        message: format!("{} is now back in stock!", item.title),
        old_price: None,
        new_price: None,
        is_read: false,
        created_at: now,
    }
}
