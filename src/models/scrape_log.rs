use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::models::{generate_id, ScrapeStatus};

/// Audit record of one extraction attempt. Write-only from the engine's
/// perspective; never read back into decision logic.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScrapeLog {
    pub id: String,
    pub item_id: Option<String>,
    pub status: ScrapeStatus,
    pub error_message: Option<String>,
    pub duration_ms: i64,
    pub created_at: DateTime<Utc>,
}

impl ScrapeLog {
    pub fn success(item_id: Option<String>, duration: Duration) -> Self {
        Self {
            id: generate_id(),
            item_id,
            status: ScrapeStatus::Success,
            error_message: None,
            duration_ms: duration.as_millis() as i64,
            created_at: Utc::now(),
        }
    }

    pub fn failure(item_id: Option<String>, error: impl Into<String>, duration: Duration) -> Self {
        Self {
            id: generate_id(),
            item_id,
            status: ScrapeStatus::Failed,
            error_message: Some(error.into()),
            duration_ms: duration.as_millis() as i64,
            created_at: Utc::now(),
        }
    }
}
