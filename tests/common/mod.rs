//! In-memory test doubles for the tracker pipeline: a catalog store backed by
//! plain vectors and a scripted scraper with per-URL outcomes.

use async_trait::async_trait;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use pricehawk::evaluator::ItemPatch;
use pricehawk::models::{Notification, PriceObservation, ScrapeLog, TrackedItem};
use pricehawk::scrapers::{ProductScraper, ProductSnapshot};
use pricehawk::store::CatalogStore;
use pricehawk::utils::error::ScrapeError;
use pricehawk::{AppError, Result};
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Default)]
pub struct MemoryStore {
    pub items: Mutex<Vec<TrackedItem>>,
    pub observations: Mutex<Vec<PriceObservation>>,
    pub events: Mutex<Vec<Notification>>,
    pub logs: Mutex<Vec<ScrapeLog>>,
    /// When set, `apply_patch` fails, simulating a storage-layer outage.
    pub fail_apply_patch: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observation_count(&self) -> usize {
        self.observations.lock().unwrap().len()
    }

    pub fn events_snapshot(&self) -> Vec<Notification> {
        self.events.lock().unwrap().clone()
    }

    pub fn logs_snapshot(&self) -> Vec<ScrapeLog> {
        self.logs.lock().unwrap().clone()
    }

    pub fn item(&self, id: &str) -> Option<TrackedItem> {
        self.items.lock().unwrap().iter().find(|i| i.id == id).cloned()
    }
}

#[async_trait]
impl CatalogStore for MemoryStore {
    async fn list_available_items(&self) -> Result<Vec<TrackedItem>> {
        Ok(self
            .items
            .lock()
            .unwrap()
            .iter()
            .filter(|item| item.is_available)
            .cloned()
            .collect())
    }

    async fn list_items(&self, owner_id: &str) -> Result<Vec<TrackedItem>> {
        Ok(self
            .items
            .lock()
            .unwrap()
            .iter()
            .filter(|item| item.owner_id == owner_id)
            .cloned()
            .collect())
    }

    async fn get_item(&self, id: &str, owner_id: &str) -> Result<Option<TrackedItem>> {
        Ok(self
            .items
            .lock()
            .unwrap()
            .iter()
            .find(|item| item.id == id && item.owner_id == owner_id)
            .cloned())
    }

    async fn get_item_by_url(&self, owner_id: &str, url: &str) -> Result<Option<TrackedItem>> {
        Ok(self
            .items
            .lock()
            .unwrap()
            .iter()
            .find(|item| item.owner_id == owner_id && item.url == url)
            .cloned())
    }

    async fn insert_item(&self, item: &TrackedItem) -> Result<()> {
        self.items.lock().unwrap().push(item.clone());
        Ok(())
    }

    async fn apply_patch(&self, id: &str, patch: &ItemPatch) -> Result<()> {
        if self.fail_apply_patch.load(Ordering::SeqCst) {
            return Err(AppError::Internal("simulated write failure".to_string()));
        }
        let mut items = self.items.lock().unwrap();
        if let Some(item) = items.iter_mut().find(|item| item.id == id) {
            item.apply(patch);
        }
        Ok(())
    }

    async fn update_settings(
        &self,
        id: &str,
        owner_id: &str,
        target_price: Option<Option<Decimal>>,
        check_interval_hours: Option<i64>,
    ) -> Result<Option<TrackedItem>> {
        let mut items = self.items.lock().unwrap();
        let item = items
            .iter_mut()
            .find(|item| item.id == id && item.owner_id == owner_id);
        Ok(item.map(|item| {
            if let Some(target) = target_price {
                item.target_price = target;
            }
            if let Some(interval) = check_interval_hours {
                item.check_interval_hours = interval;
            }
            item.clone()
        }))
    }

    async fn delete_item(&self, id: &str, owner_id: &str) -> Result<bool> {
        let mut items = self.items.lock().unwrap();
        let before = items.len();
        items.retain(|item| !(item.id == id && item.owner_id == owner_id));
        let deleted = items.len() < before;
        if deleted {
            self.observations
                .lock()
                .unwrap()
                .retain(|obs| obs.item_id != id);
        }
        Ok(deleted)
    }

    async fn insert_observation(&self, observation: &PriceObservation) -> Result<()> {
        self.observations.lock().unwrap().push(observation.clone());
        Ok(())
    }

    async fn list_observations(&self, item_id: &str, limit: i64) -> Result<Vec<PriceObservation>> {
        Ok(self
            .observations
            .lock()
            .unwrap()
            .iter()
            .filter(|obs| obs.item_id == item_id)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn insert_event(&self, event: &Notification) -> Result<()> {
        self.events.lock().unwrap().push(event.clone());
        Ok(())
    }

    async fn list_events(
        &self,
        owner_id: &str,
        unread_only: bool,
        limit: i64,
    ) -> Result<Vec<Notification>> {
        Ok(self
            .events
            .lock()
            .unwrap()
            .iter()
            .filter(|event| event.owner_id == owner_id && (!unread_only || !event.is_read))
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn mark_event_read(&self, id: &str, owner_id: &str) -> Result<Option<Notification>> {
        let mut events = self.events.lock().unwrap();
        let event = events
            .iter_mut()
            .find(|event| event.id == id && event.owner_id == owner_id);
        Ok(event.map(|event| {
            event.is_read = true;
            event.clone()
        }))
    }

    async fn mark_all_events_read(&self, owner_id: &str) -> Result<u64> {
        let mut events = self.events.lock().unwrap();
        let mut updated = 0;
        for event in events
            .iter_mut()
            .filter(|event| event.owner_id == owner_id && !event.is_read)
        {
            event.is_read = true;
            updated += 1;
        }
        Ok(updated)
    }

    async fn delete_event(&self, id: &str, owner_id: &str) -> Result<bool> {
        let mut events = self.events.lock().unwrap();
        let before = events.len();
        events.retain(|event| !(event.id == id && event.owner_id == owner_id));
        Ok(events.len() < before)
    }

    async fn insert_scrape_log(&self, log: &ScrapeLog) -> Result<()> {
        self.logs.lock().unwrap().push(log.clone());
        Ok(())
    }
}

/// Per-URL scripted outcome for the stub scraper.
pub enum StubOutcome {
    Snapshot(ProductSnapshot),
    Failure,
}

/// Scraper double with scripted responses and an optional artificial delay,
/// used as the registry fallback so it catches every URL.
pub struct StubScraper {
    outcomes: Mutex<HashMap<String, StubOutcome>>,
    delay: Duration,
}

impl StubScraper {
    pub fn new() -> Self {
        Self {
            outcomes: Mutex::new(HashMap::new()),
            delay: Duration::ZERO,
        }
    }

    pub fn with_delay(delay: Duration) -> Self {
        Self {
            outcomes: Mutex::new(HashMap::new()),
            delay,
        }
    }

    pub fn succeed(self, url: &str, snapshot: ProductSnapshot) -> Self {
        self.outcomes
            .lock()
            .unwrap()
            .insert(url.to_string(), StubOutcome::Snapshot(snapshot));
        self
    }

    pub fn fail(self, url: &str) -> Self {
        self.outcomes
            .lock()
            .unwrap()
            .insert(url.to_string(), StubOutcome::Failure);
        self
    }
}

#[async_trait]
impl ProductScraper for StubScraper {
    fn can_handle(&self, _url: &str) -> bool {
        true
    }

    async fn scrape(&self, url: &str) -> std::result::Result<ProductSnapshot, ScrapeError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        match self.outcomes.lock().unwrap().get(url) {
            Some(StubOutcome::Snapshot(snapshot)) => Ok(snapshot.clone()),
            Some(StubOutcome::Failure) => {
                Err(ScrapeError::Navigation("scripted failure".to_string()))
            }
            None => Err(ScrapeError::Navigation(format!("no script for {url}"))),
        }
    }
}

pub fn snapshot(title: &str, price: Decimal, available: bool) -> ProductSnapshot {
    ProductSnapshot {
        title: title.to_string(),
        price: Some(price),
        currency: "USD".to_string(),
        image_url: None,
        is_available: available,
        product_key: title.to_string(),
    }
}
