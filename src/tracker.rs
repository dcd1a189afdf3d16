//! Scheduled price tracking. One background task walks the catalog on a fixed
//! interval; the same pipeline also backs manual refreshes and item creation
//! so every price write flows through the evaluator.

use chrono::Utc;
use rust_decimal::Decimal;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};
use url::Url;

use crate::config::TrackerConfig;
use crate::evaluator::{evaluate, Evaluation};
use crate::models::{
    EventKind, NewTrackedItem, Notification, PriceObservation, ScrapeLog, TrackedItem,
};
use crate::scrapers::{detect_platform, ProductSnapshot, ScraperRegistry};
use crate::store::CatalogStore;
use crate::utils::error::{AppError, Result};

struct Timer {
    shutdown: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

pub struct PriceTracker {
    store: Arc<dyn CatalogStore>,
    registry: Arc<ScraperRegistry>,
    config: TrackerConfig,
    running: AtomicBool,
    timer: Mutex<Option<Timer>>,
}

impl PriceTracker {
    pub fn new(
        store: Arc<dyn CatalogStore>,
        registry: Arc<ScraperRegistry>,
        config: TrackerConfig,
    ) -> Self {
        Self {
            store,
            registry,
            config,
            running: AtomicBool::new(false),
            timer: Mutex::new(None),
        }
    }

    /// Spawns the background timer. With `run_on_start` the first sweep runs
    /// immediately; otherwise it waits one full interval.
    pub async fn start(self: &Arc<Self>) {
        let mut timer = self.timer.lock().await;
        if timer.is_some() {
            warn!("price tracker already started");
            return;
        }

        let period = Duration::from_secs(self.config.poll_interval_minutes * 60);
        info!(
            interval_minutes = self.config.poll_interval_minutes,
            "starting price tracker"
        );

        let (shutdown, mut signal) = watch::channel(false);
        let run_on_start = self.config.run_on_start;
        let tracker = Arc::clone(self);
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            interval.tick().await; // first tick fires immediately; consume it
            if run_on_start {
                tracker.run_cycle().await;
            }
            loop {
                // Shutdown is only observed between cycles, so a sweep that is
                // already running completes before the task exits.
                tokio::select! {
                    _ = interval.tick() => tracker.run_cycle().await,
                    _ = signal.changed() => break,
                }
            }
        });
        *timer = Some(Timer { shutdown, handle });
    }

    /// Signals the timer task and waits for it to exit. An in-flight cycle
    /// finishes all of its writes first; nothing is aborted mid-item.
    pub async fn stop(&self) {
        let timer = self.timer.lock().await.take();
        if let Some(timer) = timer {
            let _ = timer.shutdown.send(true);
            if let Err(err) = timer.handle.await {
                error!(error = %err, "tracker task ended abnormally");
            }
            info!("price tracker stopped");
        }
    }

    /// Runs one tracking cycle. If a previous cycle is still in flight the
    /// call is a no-op: slow cycles are skipped, never queued or overlapped.
    pub async fn run_cycle(&self) {
        if self
            .running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            warn!("previous tracking cycle still running, skipping");
            return;
        }

        if let Err(err) = self.sweep().await {
            error!(error = %err, "tracking cycle failed");
        }

        self.running.store(false, Ordering::SeqCst);
    }

    /// Walks every due item sequentially with a fixed pause between items.
    async fn sweep(&self) -> Result<()> {
        let now = Utc::now();
        let items = self.store.list_available_items().await?;
        let due: Vec<TrackedItem> = items.into_iter().filter(|item| item.is_due(now)).collect();

        info!(due = due.len(), "tracking cycle started");

        let mut first = true;
        for item in &due {
            if !first {
                tokio::time::sleep(Duration::from_millis(self.config.item_delay_ms)).await;
            }
            first = false;

            // One bad item never aborts the cycle.
            if let Err(err) = self.check_item(item).await {
                error!(item_id = %item.id, url = %item.url, error = %err, "price check failed");
            }
        }

        info!(checked = due.len(), "tracking cycle finished");
        Ok(())
    }

    /// Scrapes one item and persists whatever the evaluator decides. Shared by
    /// the scheduled cycle and the manual refresh endpoint. Every outcome
    /// leaves exactly one audit row: `failed` for scrape or persistence
    /// errors, `success` only once every write landed.
    pub async fn check_item(&self, item: &TrackedItem) -> Result<Evaluation> {
        let started = Instant::now();
        let scraper = self.registry.select(&item.url);

        let snapshot = match scraper.scrape(&item.url).await {
            Ok(snapshot) => snapshot,
            Err(err) => {
                self.store
                    .insert_scrape_log(&ScrapeLog::failure(
                        Some(item.id.clone()),
                        err.to_string(),
                        started.elapsed(),
                    ))
                    .await?;
                return Err(err.into());
            }
        };

        let evaluation = evaluate(item, &snapshot, Utc::now());

        if let Err(err) = self.persist_evaluation(item, &snapshot, &evaluation).await {
            // Best-effort: the audit row must not mask the original failure.
            let log =
                ScrapeLog::failure(Some(item.id.clone()), err.to_string(), started.elapsed());
            if let Err(log_err) = self.store.insert_scrape_log(&log).await {
                error!(item_id = %item.id, error = %log_err, "could not record failed check");
            }
            return Err(err);
        }

        self.store
            .insert_scrape_log(&ScrapeLog::success(Some(item.id.clone()), started.elapsed()))
            .await?;

        Ok(evaluation)
    }

    async fn persist_evaluation(
        &self,
        item: &TrackedItem,
        snapshot: &ProductSnapshot,
        evaluation: &Evaluation,
    ) -> Result<()> {
        self.store.apply_patch(&item.id, &evaluation.patch).await?;

        if let Some(price) = snapshot.price {
            self.store
                .insert_observation(&PriceObservation::new(
                    item.id.clone(),
                    price,
                    item.currency.clone(),
                    snapshot.is_available,
                ))
                .await?;
        }

        for event in &evaluation.events {
            debug!(item_id = %item.id, kind = %event.kind.as_str(), "event emitted");
            self.store.insert_event(event).await?;
        }

        Ok(())
    }

    /// Creates a tracked item from a URL. The first scrape happens up front:
    /// if it fails, no item is created and the owner gets a scraping-error
    /// event instead.
    pub async fn create_item(
        &self,
        owner_id: &str,
        url: &str,
        target_price: Option<Decimal>,
    ) -> Result<TrackedItem> {
        Url::parse(url).map_err(|_| AppError::Validation(format!("Invalid URL: {url}")))?;

        if let Some(existing) = self.store.get_item_by_url(owner_id, url).await? {
            return Err(AppError::Validation(format!(
                "Already tracking this URL as \"{}\"",
                existing.title
            )));
        }

        let started = Instant::now();
        let scraper = self.registry.select(url);

        let snapshot = match scraper.scrape(url).await {
            Ok(snapshot) => snapshot,
            Err(err) => {
                self.store
                    .insert_scrape_log(&ScrapeLog::failure(None, err.to_string(), started.elapsed()))
                    .await?;
                self.store
                    .insert_event(&Notification::new(
                        owner_id.to_string(),
                        None,
                        EventKind::ScrapingError,
                        "Could Not Add Product",
                        format!("Failed to read product details from {url}: {err}"),
                    ))
                    .await?;
                return Err(err.into());
            }
        };

        self.store
            .insert_scrape_log(&ScrapeLog::success(None, started.elapsed()))
            .await?;

        let item = TrackedItem::from_snapshot(
            NewTrackedItem {
                owner_id: owner_id.to_string(),
                url: url.to_string(),
                target_price,
            },
            detect_platform(url),
            &snapshot,
        );

        self.store.insert_item(&item).await?;

        if let Some(price) = snapshot.price {
            self.store
                .insert_observation(&PriceObservation::new(
                    item.id.clone(),
                    price,
                    item.currency.clone(),
                    snapshot.is_available,
                ))
                .await?;
        }

        info!(item_id = %item.id, title = %item.title, "tracking new product");
        Ok(item)
    }
}
