use headless_chrome::{Browser, LaunchOptions, Tab};
use rand::Rng;
use std::ffi::OsStr;
use std::sync::Arc;
use std::time::Duration;

use crate::utils::error::ScrapeError;

/// An isolated headless-browser session for one extraction attempt.
///
/// Opening launches a fresh browser process so cookies, cache and
/// fingerprinting state never leak between attempts. The session is released
/// on drop, so every exit path (normal return or error) closes it without
/// duplicated cleanup calls.
pub struct BrowserSession {
    // Held so the browser process outlives the tab.
    _browser: Browser,
    tab: Arc<Tab>,
}

impl BrowserSession {
    pub fn open(
        user_agent: &str,
        accept_language: &str,
        nav_timeout: Duration,
    ) -> Result<Self, ScrapeError> {
        let options = LaunchOptions::default_builder()
            .headless(true)
            .sandbox(false)
            .window_size(Some((1920, 1080)))
            .args(vec![
                OsStr::new("--no-sandbox"),
                OsStr::new("--disable-dev-shm-usage"),
                OsStr::new("--disable-gpu"),
                OsStr::new("--disable-extensions"),
            ])
            .build()
            .map_err(|e| ScrapeError::Browser(e.to_string()))?;

        let browser = Browser::new(options).map_err(|e| ScrapeError::Browser(e.to_string()))?;
        let tab = browser
            .new_tab()
            .map_err(|e| ScrapeError::Browser(e.to_string()))?;

        tab.set_default_timeout(nav_timeout);
        tab.set_user_agent(user_agent, Some(accept_language), None)
            .map_err(|e| ScrapeError::Browser(e.to_string()))?;

        Ok(Self {
            _browser: browser,
            tab,
        })
    }

    /// Navigates and waits for minimal document readiness, not network idle.
    /// A page that cannot load within the timeout fails the attempt instead
    /// of hanging.
    pub fn navigate(&self, url: &str) -> Result<(), ScrapeError> {
        self.tab
            .navigate_to(url)
            .map_err(|e| ScrapeError::Navigation(e.to_string()))?;
        self.tab.wait_until_navigated().map_err(|e| {
            let message = e.to_string();
            if message.to_lowercase().contains("timeout") {
                ScrapeError::Timeout
            } else {
                ScrapeError::Navigation(message)
            }
        })?;
        Ok(())
    }

    /// Randomized 1-3s pause before reading content, to let client-side
    /// rendering finish.
    pub fn settle(&self) {
        let millis = rand::thread_rng().gen_range(1000..=3000);
        std::thread::sleep(Duration::from_millis(millis));
    }

    pub fn content(&self) -> Result<String, ScrapeError> {
        self.tab
            .get_content()
            .map_err(|e| ScrapeError::Browser(e.to_string()))
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        // Closing the tab is best-effort; the browser process itself exits
        // when the Browser handle drops.
        let _ = self.tab.close(true);
    }
}
