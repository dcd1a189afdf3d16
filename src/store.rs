//! Catalog persistence. The engine talks to storage through the narrow
//! [`CatalogStore`] trait; every call is its own atomic operation and the
//! engine never wraps multi-step sequences in a transaction.

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{FromRow, Row, SqlitePool};
use std::str::FromStr;

use crate::config::DatabaseConfig;
use crate::evaluator::ItemPatch;
use crate::models::{
    EventKind, Notification, Platform, PriceObservation, ScrapeLog, TrackedItem,
};
use crate::utils::error::Result;

#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Every item currently flagged available, across all owners. The
    /// scheduler reads this fresh each cycle.
    async fn list_available_items(&self) -> Result<Vec<TrackedItem>>;

    async fn list_items(&self, owner_id: &str) -> Result<Vec<TrackedItem>>;
    async fn get_item(&self, id: &str, owner_id: &str) -> Result<Option<TrackedItem>>;
    async fn get_item_by_url(&self, owner_id: &str, url: &str) -> Result<Option<TrackedItem>>;
    async fn insert_item(&self, item: &TrackedItem) -> Result<()>;

    /// Applies an evaluator patch. `None` price fields leave the stored
    /// column untouched.
    async fn apply_patch(&self, id: &str, patch: &ItemPatch) -> Result<()>;

    /// User-editable settings only; price fields are never touched here.
    /// `target_price` distinguishes "leave untouched" (outer `None`) from
    /// "clear the target" (`Some(None)`).
    async fn update_settings(
        &self,
        id: &str,
        owner_id: &str,
        target_price: Option<Option<Decimal>>,
        check_interval_hours: Option<i64>,
    ) -> Result<Option<TrackedItem>>;

    /// Deletes an item; its price history cascades.
    async fn delete_item(&self, id: &str, owner_id: &str) -> Result<bool>;

    async fn insert_observation(&self, observation: &PriceObservation) -> Result<()>;
    async fn list_observations(&self, item_id: &str, limit: i64) -> Result<Vec<PriceObservation>>;

    async fn insert_event(&self, event: &Notification) -> Result<()>;
    async fn list_events(
        &self,
        owner_id: &str,
        unread_only: bool,
        limit: i64,
    ) -> Result<Vec<Notification>>;
    async fn mark_event_read(&self, id: &str, owner_id: &str) -> Result<Option<Notification>>;
    async fn mark_all_events_read(&self, owner_id: &str) -> Result<u64>;
    async fn delete_event(&self, id: &str, owner_id: &str) -> Result<bool>;

    async fn insert_scrape_log(&self, log: &ScrapeLog) -> Result<()>;
}

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS tracked_items (
    id TEXT PRIMARY KEY,
    owner_id TEXT NOT NULL,
    url TEXT NOT NULL,
    platform TEXT NOT NULL,
    product_key TEXT NOT NULL,
    title TEXT NOT NULL,
    image_url TEXT,
    currency TEXT NOT NULL,
    current_price TEXT,
    target_price TEXT,
    lowest_price TEXT,
    highest_price TEXT,
    is_available INTEGER NOT NULL DEFAULT 1,
    last_checked_at TEXT,
    check_interval_hours INTEGER NOT NULL DEFAULT 24,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);
CREATE UNIQUE INDEX IF NOT EXISTS idx_items_owner_url ON tracked_items(owner_id, url);

CREATE TABLE IF NOT EXISTS price_history (
    id TEXT PRIMARY KEY,
    item_id TEXT NOT NULL REFERENCES tracked_items(id) ON DELETE CASCADE,
    price TEXT NOT NULL,
    currency TEXT NOT NULL,
    is_available INTEGER NOT NULL,
    observed_at TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_history_item ON price_history(item_id, observed_at);

CREATE TABLE IF NOT EXISTS notifications (
    id TEXT PRIMARY KEY,
    owner_id TEXT NOT NULL,
    item_id TEXT,
    kind TEXT NOT NULL,
    title TEXT NOT NULL,
    message TEXT NOT NULL,
    old_price TEXT,
    new_price TEXT,
    is_read INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_notifications_owner ON notifications(owner_id, created_at);

CREATE TABLE IF NOT EXISTS scrape_logs (
    id TEXT PRIMARY KEY,
    item_id TEXT,
    status TEXT NOT NULL,
    error_message TEXT,
    duration_ms INTEGER NOT NULL,
    created_at TEXT NOT NULL
);
"#;

pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(&config.url)
            .map_err(sqlx::Error::from)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(options)
            .await
            .map_err(sqlx::Error::from)?;

        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    async fn migrate(&self) -> Result<()> {
        for statement in SCHEMA.split(';').filter(|s| !s.trim().is_empty()) {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        Ok(())
    }
}

fn decode_decimal(row: &SqliteRow, column: &str) -> std::result::Result<Option<Decimal>, sqlx::Error> {
    let raw: Option<String> = row.try_get(column)?;
    raw.map(|text| {
        Decimal::from_str(&text).map_err(|e| sqlx::Error::ColumnDecode {
            index: column.to_string(),
            source: Box::new(e),
        })
    })
    .transpose()
}

fn bind_decimal(value: Option<Decimal>) -> Option<String> {
    value.map(|d| d.to_string())
}

impl FromRow<'_, SqliteRow> for TrackedItem {
    fn from_row(row: &SqliteRow) -> std::result::Result<Self, sqlx::Error> {
        let platform: String = row.try_get("platform")?;
        Ok(Self {
            id: row.try_get("id")?,
            owner_id: row.try_get("owner_id")?,
            url: row.try_get("url")?,
            platform: Platform::from_str(&platform).map_err(|e| sqlx::Error::ColumnDecode {
                index: "platform".to_string(),
                source: e.into(),
            })?,
            product_key: row.try_get("product_key")?,
            title: row.try_get("title")?,
            image_url: row.try_get("image_url")?,
            currency: row.try_get("currency")?,
            current_price: decode_decimal(row, "current_price")?,
            target_price: decode_decimal(row, "target_price")?,
            lowest_price: decode_decimal(row, "lowest_price")?,
            highest_price: decode_decimal(row, "highest_price")?,
            is_available: row.try_get("is_available")?,
            last_checked_at: row.try_get("last_checked_at")?,
            check_interval_hours: row.try_get("check_interval_hours")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

impl FromRow<'_, SqliteRow> for PriceObservation {
    fn from_row(row: &SqliteRow) -> std::result::Result<Self, sqlx::Error> {
        let price = decode_decimal(row, "price")?.ok_or_else(|| sqlx::Error::ColumnDecode {
            index: "price".to_string(),
            source: "price column is null".into(),
        })?;
        Ok(Self {
            id: row.try_get("id")?,
            item_id: row.try_get("item_id")?,
            price,
            currency: row.try_get("currency")?,
            is_available: row.try_get("is_available")?,
            observed_at: row.try_get("observed_at")?,
        })
    }
}

impl FromRow<'_, SqliteRow> for Notification {
    fn from_row(row: &SqliteRow) -> std::result::Result<Self, sqlx::Error> {
        let kind: String = row.try_get("kind")?;
        Ok(Self {
            id: row.try_get("id")?,
            owner_id: row.try_get("owner_id")?,
            item_id: row.try_get("item_id")?,
            kind: EventKind::from_str(&kind).map_err(|e| sqlx::Error::ColumnDecode {
                index: "kind".to_string(),
                source: e.into(),
            })?,
            title: row.try_get("title")?,
            message: row.try_get("message")?,
            old_price: decode_decimal(row, "old_price")?,
            new_price: decode_decimal(row, "new_price")?,
            is_read: row.try_get("is_read")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

#[async_trait]
impl CatalogStore for SqliteStore {
    async fn list_available_items(&self) -> Result<Vec<TrackedItem>> {
        let items = sqlx::query_as::<_, TrackedItem>(
            "SELECT * FROM tracked_items WHERE is_available = 1 ORDER BY created_at",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(items)
    }

    async fn list_items(&self, owner_id: &str) -> Result<Vec<TrackedItem>> {
        let items = sqlx::query_as::<_, TrackedItem>(
            "SELECT * FROM tracked_items WHERE owner_id = ? ORDER BY created_at DESC",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(items)
    }

    async fn get_item(&self, id: &str, owner_id: &str) -> Result<Option<TrackedItem>> {
        let item = sqlx::query_as::<_, TrackedItem>(
            "SELECT * FROM tracked_items WHERE id = ? AND owner_id = ?",
        )
        .bind(id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(item)
    }

    async fn get_item_by_url(&self, owner_id: &str, url: &str) -> Result<Option<TrackedItem>> {
        let item = sqlx::query_as::<_, TrackedItem>(
            "SELECT * FROM tracked_items WHERE owner_id = ? AND url = ?",
        )
        .bind(owner_id)
        .bind(url)
        .fetch_optional(&self.pool)
        .await?;
        Ok(item)
    }

    async fn insert_item(&self, item: &TrackedItem) -> Result<()> {
        sqlx::query(
            r#"INSERT INTO tracked_items (
                id, owner_id, url, platform, product_key, title, image_url,
                currency, current_price, target_price, lowest_price, highest_price,
                is_available, last_checked_at, check_interval_hours, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(&item.id)
        .bind(&item.owner_id)
        .bind(&item.url)
        .bind(item.platform.as_str())
        .bind(&item.product_key)
        .bind(&item.title)
        .bind(&item.image_url)
        .bind(&item.currency)
        .bind(bind_decimal(item.current_price))
        .bind(bind_decimal(item.target_price))
        .bind(bind_decimal(item.lowest_price))
        .bind(bind_decimal(item.highest_price))
        .bind(item.is_available)
        .bind(item.last_checked_at)
        .bind(item.check_interval_hours)
        .bind(item.created_at)
        .bind(item.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn apply_patch(&self, id: &str, patch: &ItemPatch) -> Result<()> {
        sqlx::query(
            r#"UPDATE tracked_items SET
                current_price = COALESCE(?, current_price),
                lowest_price = COALESCE(?, lowest_price),
                highest_price = COALESCE(?, highest_price),
                is_available = ?,
                last_checked_at = ?,
                updated_at = ?
            WHERE id = ?"#,
        )
        .bind(bind_decimal(patch.current_price))
        .bind(bind_decimal(patch.lowest_price))
        .bind(bind_decimal(patch.highest_price))
        .bind(patch.is_available)
        .bind(patch.last_checked_at)
        .bind(patch.last_checked_at)
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn update_settings(
        &self,
        id: &str,
        owner_id: &str,
        target_price: Option<Option<Decimal>>,
        check_interval_hours: Option<i64>,
    ) -> Result<Option<TrackedItem>> {
        if self.get_item(id, owner_id).await?.is_none() {
            return Ok(None);
        }

        // Each field updates separately: a bound NULL must be able to clear
        // the target, so COALESCE cannot stand in for "field absent" here.
        if let Some(target) = target_price {
            sqlx::query(
                "UPDATE tracked_items SET target_price = ?, updated_at = ? \
                 WHERE id = ? AND owner_id = ?",
            )
            .bind(bind_decimal(target))
            .bind(Utc::now())
            .bind(id)
            .bind(owner_id)
            .execute(&self.pool)
            .await?;
        }

        if let Some(interval) = check_interval_hours {
            sqlx::query(
                "UPDATE tracked_items SET check_interval_hours = ?, updated_at = ? \
                 WHERE id = ? AND owner_id = ?",
            )
            .bind(interval)
            .bind(Utc::now())
            .bind(id)
            .bind(owner_id)
            .execute(&self.pool)
            .await?;
        }

        self.get_item(id, owner_id).await
    }

    async fn delete_item(&self, id: &str, owner_id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM tracked_items WHERE id = ? AND owner_id = ?")
            .bind(id)
            .bind(owner_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn insert_observation(&self, observation: &PriceObservation) -> Result<()> {
        sqlx::query(
            r#"INSERT INTO price_history (id, item_id, price, currency, is_available, observed_at)
            VALUES (?, ?, ?, ?, ?, ?)"#,
        )
        .bind(&observation.id)
        .bind(&observation.item_id)
        .bind(observation.price.to_string())
        .bind(&observation.currency)
        .bind(observation.is_available)
        .bind(observation.observed_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn list_observations(&self, item_id: &str, limit: i64) -> Result<Vec<PriceObservation>> {
        let observations = sqlx::query_as::<_, PriceObservation>(
            "SELECT * FROM price_history WHERE item_id = ? ORDER BY observed_at DESC LIMIT ?",
        )
        .bind(item_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(observations)
    }

    async fn insert_event(&self, event: &Notification) -> Result<()> {
        sqlx::query(
            r#"INSERT INTO notifications (
                id, owner_id, item_id, kind, title, message,
                old_price, new_price, is_read, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(&event.id)
        .bind(&event.owner_id)
        .bind(&event.item_id)
        .bind(event.kind.as_str())
        .bind(&event.title)
        .bind(&event.message)
        .bind(bind_decimal(event.old_price))
        .bind(bind_decimal(event.new_price))
        .bind(event.is_read)
        .bind(event.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn list_events(
        &self,
        owner_id: &str,
        unread_only: bool,
        limit: i64,
    ) -> Result<Vec<Notification>> {
        let query = if unread_only {
            "SELECT * FROM notifications WHERE owner_id = ? AND is_read = 0 \
             ORDER BY created_at DESC LIMIT ?"
        } else {
            "SELECT * FROM notifications WHERE owner_id = ? ORDER BY created_at DESC LIMIT ?"
        };
        let events = sqlx::query_as::<_, Notification>(query)
            .bind(owner_id)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;
        Ok(events)
    }

    async fn mark_event_read(&self, id: &str, owner_id: &str) -> Result<Option<Notification>> {
        let result =
            sqlx::query("UPDATE notifications SET is_read = 1 WHERE id = ? AND owner_id = ?")
                .bind(id)
                .bind(owner_id)
                .execute(&self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        let event =
            sqlx::query_as::<_, Notification>("SELECT * FROM notifications WHERE id = ?")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(event)
    }

    async fn mark_all_events_read(&self, owner_id: &str) -> Result<u64> {
        let result = sqlx::query(
            "UPDATE notifications SET is_read = 1 WHERE owner_id = ? AND is_read = 0",
        )
        .bind(owner_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    async fn delete_event(&self, id: &str, owner_id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM notifications WHERE id = ? AND owner_id = ?")
            .bind(id)
            .bind(owner_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn insert_scrape_log(&self, log: &ScrapeLog) -> Result<()> {
        sqlx::query(
            r#"INSERT INTO scrape_logs (id, item_id, status, error_message, duration_ms, created_at)
            VALUES (?, ?, ?, ?, ?, ?)"#,
        )
        .bind(&log.id)
        .bind(&log.item_id)
        .bind(log.status.as_str())
        .bind(&log.error_message)
        .bind(log.duration_ms)
        .bind(log.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DatabaseConfig;
    use crate::models::NewTrackedItem;
    use crate::scrapers::ProductSnapshot;
    use rust_decimal_macros::dec;

    async fn memory_store() -> SqliteStore {
        // A shared in-memory database needs a single connection; each pool
        // connection would otherwise see its own empty database.
        SqliteStore::connect(&DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
        })
        .await
        .unwrap()
    }

    fn sample_item(owner: &str, url: &str) -> TrackedItem {
        TrackedItem::from_snapshot(
            NewTrackedItem {
                owner_id: owner.to_string(),
                url: url.to_string(),
                target_price: Some(dec!(80.00)),
            },
            crate::models::Platform::Other,
            &ProductSnapshot {
                title: "Widget".to_string(),
                price: Some(dec!(99.95)),
                currency: "USD".to_string(),
                image_url: None,
                is_available: true,
                product_key: url.to_string(),
            },
        )
    }

    #[tokio::test]
    async fn test_item_round_trip_preserves_decimal_prices() {
        let store = memory_store().await;
        let item = sample_item("alice", "https://store.example/widget");
        store.insert_item(&item).await.unwrap();

        let loaded = store
            .get_item(&item.id, "alice")
            .await
            .unwrap()
            .expect("item should exist");

        assert_eq!(loaded.current_price, Some(dec!(99.95)));
        assert_eq!(loaded.target_price, Some(dec!(80.00)));
        assert_eq!(loaded.lowest_price, Some(dec!(99.95)));
        assert_eq!(loaded.platform, crate::models::Platform::Other);
    }

    #[tokio::test]
    async fn test_get_item_scoped_to_owner() {
        let store = memory_store().await;
        let item = sample_item("alice", "https://store.example/widget");
        store.insert_item(&item).await.unwrap();

        assert!(store.get_item(&item.id, "bob").await.unwrap().is_none());
        assert!(store.get_item(&item.id, "alice").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_apply_patch_leaves_unset_prices_untouched() {
        let store = memory_store().await;
        let item = sample_item("alice", "https://store.example/widget");
        store.insert_item(&item).await.unwrap();

        // Availability-only patch: no price extracted this cycle.
        let patch = ItemPatch {
            current_price: None,
            lowest_price: None,
            highest_price: None,
            is_available: false,
            last_checked_at: Utc::now(),
        };
        store.apply_patch(&item.id, &patch).await.unwrap();

        let loaded = store.get_item(&item.id, "alice").await.unwrap().unwrap();
        assert_eq!(loaded.current_price, Some(dec!(99.95)));
        assert!(!loaded.is_available);
    }

    #[tokio::test]
    async fn test_apply_patch_moves_bounds() {
        let store = memory_store().await;
        let item = sample_item("alice", "https://store.example/widget");
        store.insert_item(&item).await.unwrap();

        let patch = ItemPatch {
            current_price: Some(dec!(89.00)),
            lowest_price: Some(dec!(89.00)),
            highest_price: None,
            is_available: true,
            last_checked_at: Utc::now(),
        };
        store.apply_patch(&item.id, &patch).await.unwrap();

        let loaded = store.get_item(&item.id, "alice").await.unwrap().unwrap();
        assert_eq!(loaded.current_price, Some(dec!(89.00)));
        assert_eq!(loaded.lowest_price, Some(dec!(89.00)));
        assert_eq!(loaded.highest_price, Some(dec!(99.95)));
    }

    #[tokio::test]
    async fn test_update_settings_ignores_foreign_owner() {
        let store = memory_store().await;
        let item = sample_item("alice", "https://store.example/widget");
        store.insert_item(&item).await.unwrap();

        let result = store
            .update_settings(&item.id, "bob", Some(Some(dec!(50))), None)
            .await
            .unwrap();
        assert!(result.is_none());

        let updated = store
            .update_settings(&item.id, "alice", Some(Some(dec!(50))), Some(6))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.target_price, Some(dec!(50)));
        assert_eq!(updated.check_interval_hours, 6);
    }

    #[tokio::test]
    async fn test_update_settings_distinguishes_clear_from_absent() {
        let store = memory_store().await;
        let item = sample_item("alice", "https://store.example/widget");
        store.insert_item(&item).await.unwrap();

        // Absent target leaves the stored value alone.
        let updated = store
            .update_settings(&item.id, "alice", None, Some(12))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.target_price, Some(dec!(80.00)));
        assert_eq!(updated.check_interval_hours, 12);

        // An explicit null clears it.
        let cleared = store
            .update_settings(&item.id, "alice", Some(None), None)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(cleared.target_price, None);
        assert_eq!(cleared.check_interval_hours, 12);
    }

    #[tokio::test]
    async fn test_delete_item_cascades_history() {
        let store = memory_store().await;
        let item = sample_item("alice", "https://store.example/widget");
        store.insert_item(&item).await.unwrap();
        store
            .insert_observation(&PriceObservation::new(
                item.id.clone(),
                dec!(99.95),
                "USD".to_string(),
                true,
            ))
            .await
            .unwrap();

        assert!(store.delete_item(&item.id, "alice").await.unwrap());

        let history = store.list_observations(&item.id, 10).await.unwrap();
        assert!(history.is_empty());
    }

    #[tokio::test]
    async fn test_event_read_state_transitions() {
        let store = memory_store().await;
        let event = Notification::new(
            "alice".to_string(),
            None,
            EventKind::PriceDrop,
            "Price Drop Alert",
            "Widget dropped",
        );
        store.insert_event(&event).await.unwrap();

        let unread = store.list_events("alice", true, 50).await.unwrap();
        assert_eq!(unread.len(), 1);

        let marked = store
            .mark_event_read(&event.id, "alice")
            .await
            .unwrap()
            .unwrap();
        assert!(marked.is_read);

        assert!(store.list_events("alice", true, 50).await.unwrap().is_empty());
        assert_eq!(store.list_events("alice", false, 50).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_mark_all_events_read_counts_rows() {
        let store = memory_store().await;
        for n in 0..3 {
            store
                .insert_event(&Notification::new(
                    "alice".to_string(),
                    None,
                    EventKind::PriceDrop,
                    "Price Drop Alert",
                    format!("drop {n}"),
                ))
                .await
                .unwrap();
        }

        assert_eq!(store.mark_all_events_read("alice").await.unwrap(), 3);
        assert_eq!(store.mark_all_events_read("alice").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_list_available_items_skips_unavailable() {
        let store = memory_store().await;
        let available = sample_item("alice", "https://store.example/a");
        let mut unavailable = sample_item("alice", "https://store.example/b");
        unavailable.is_available = false;
        store.insert_item(&available).await.unwrap();
        store.insert_item(&unavailable).await.unwrap();

        let items = store.list_available_items().await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, available.id);
    }
}
