use config::{Config, ConfigError, Environment, File};
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub security: SecurityConfig,
    pub scraper: ScraperConfig,
    pub tracker: TrackerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub secret_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScraperConfig {
    /// Pool a random user-agent is drawn from for every browser session.
    pub user_agents: Vec<String>,
    /// Hard bound on page navigation; a slower page fails the attempt.
    pub nav_timeout_secs: u64,
    /// Reserved for a future parallel design; the cycle is sequential today.
    pub concurrent_limit: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackerConfig {
    /// Wall-clock period between cycle triggers.
    pub poll_interval_minutes: u64,
    /// Fixed pause between items within a cycle, to throttle request rate.
    pub item_delay_ms: u64,
    /// Run a sweep immediately at startup instead of waiting one interval.
    pub run_on_start: bool,
}

impl ScraperConfig {
    pub fn random_user_agent(&self) -> &str {
        self.user_agents
            .choose(&mut rand::thread_rng())
            .map(String::as_str)
            .unwrap_or("Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36")
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let settings = Config::builder()
            .add_source(File::with_name("config/default"))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(Environment::with_prefix("PRICEHAWK").separator("__"))
            .build()?;

        let config: AppConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Message(
                "Server port must be greater than 0".into(),
            ));
        }

        if self.database.max_connections == 0 {
            return Err(ConfigError::Message(
                "Database max_connections must be greater than 0".into(),
            ));
        }

        if self.security.secret_key.len() < 32 {
            return Err(ConfigError::Message(
                "Security secret_key must be at least 32 characters".into(),
            ));
        }

        if self.scraper.user_agents.is_empty() {
            return Err(ConfigError::Message(
                "Scraper user_agents pool must not be empty".into(),
            ));
        }

        if self.scraper.nav_timeout_secs == 0 {
            return Err(ConfigError::Message(
                "Scraper nav_timeout_secs must be greater than 0".into(),
            ));
        }

        if self.tracker.poll_interval_minutes == 0 {
            return Err(ConfigError::Message(
                "Tracker poll_interval_minutes must be greater than 0".into(),
            ));
        }

        Ok(())
    }
}
