use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

use crate::advisory::RiskTolerance;

#[derive(Clone, Serialize, Deserialize)]
pub struct Config {
    // Market data
    pub coingecko_base_url: String,
    pub coingecko_api_key: Option<String>,
    pub use_mock: bool,
    pub request_timeout_ms: u64,

    // Watch loop
    pub refresh_interval_ms: u64,
    pub chart_days: u32,
    pub markets_limit: u32,
    pub watchlist: Vec<String>,

    // Alerts
    pub alerts_path: Option<String>,
    pub slack_webhook_url: Option<String>,

    // Sizing
    pub risk_tolerance: RiskTolerance,
    pub balance_usd: f64,

    // Runtime
    pub tz: String,
    pub log_json: bool,

    // Persistence
    pub heartbeat_log_path: String,
    pub receipts_path: Option<String>,
}

// Keeps the API key out of logs.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("coingecko_base_url", &self.coingecko_base_url)
            .field("coingecko_api_key", &self.coingecko_api_key.as_ref().map(|_| "<redacted>"))
            .field("use_mock", &self.use_mock)
            .field("request_timeout_ms", &self.request_timeout_ms)
            .field("refresh_interval_ms", &self.refresh_interval_ms)
            .field("chart_days", &self.chart_days)
            .field("markets_limit", &self.markets_limit)
            .field("watchlist", &self.watchlist)
            .field("alerts_path", &self.alerts_path)
            .field("slack_webhook_url", &self.slack_webhook_url.as_ref().map(|_| "<redacted>"))
            .field("risk_tolerance", &self.risk_tolerance)
            .field("balance_usd", &self.balance_usd)
            .field("tz", &self.tz)
            .field("log_json", &self.log_json)
            .field("heartbeat_log_path", &self.heartbeat_log_path)
            .field("receipts_path", &self.receipts_path)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            coingecko_base_url: "https://api.coingecko.com/api/v3".to_string(),
            coingecko_api_key: None,
            use_mock: false,
            request_timeout_ms: 10_000,
            refresh_interval_ms: 30_000,
            chart_days: 1,
            markets_limit: 5,
            watchlist: vec![],
            alerts_path: None,
            slack_webhook_url: None,
            risk_tolerance: RiskTolerance::Medium,
            balance_usd: 1_000.0,
            tz: "UTC".to_string(),
            log_json: false,
            heartbeat_log_path: "./heartbeat.log".to_string(),
            receipts_path: None,
        }
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "y" | "on" => Some(true),
        "0" | "false" | "no" | "n" | "off" => Some(false),
        _ => None,
    }
}

fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key).ok().and_then(|v| parse_flag(&v)).unwrap_or(default)
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|x| x.trim().parse().ok())
}

fn env_non_empty(key: &str) -> Option<String> {
    std::env::var(key).ok().map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let d = Self::default();

        // Market data
        let coingecko_base_url = env_non_empty("COINGECKO_BASE_URL").unwrap_or(d.coingecko_base_url);
        let coingecko_api_key = env_non_empty("COINGECKO_API_KEY");
        let use_mock = env_bool("SONA_USE_MOCK", d.use_mock);
        let request_timeout_ms = env_parse::<u64>("SONA_REQUEST_TIMEOUT_MS").unwrap_or(d.request_timeout_ms);

        // Watch loop
        let refresh_interval_ms = env_parse::<u64>("SONA_REFRESH_INTERVAL_MS").unwrap_or(d.refresh_interval_ms);
        let chart_days = env_parse::<u32>("SONA_CHART_DAYS").unwrap_or(d.chart_days);
        let markets_limit = env_parse::<u32>("SONA_MARKETS_LIMIT").unwrap_or(d.markets_limit);
        let watchlist = env_non_empty("SONA_WATCHLIST").map(|s| split_list(&s)).unwrap_or_default();

        // Alerts
        let alerts_path = env_non_empty("SONA_ALERTS_PATH");
        let slack_webhook_url = env_non_empty("SLACK_WEBHOOK_URL");

        // Sizing
        let risk_tolerance = match env_non_empty("SONA_RISK_TOLERANCE") {
            Some(raw) => raw.parse()?,
            None => d.risk_tolerance,
        };
        let balance_usd = env_parse::<f64>("SONA_BALANCE_USD").unwrap_or(d.balance_usd);

        // Runtime
        let tz = env_non_empty("SONA_TZ").unwrap_or(d.tz);
        let log_json = env_bool("SONA_LOG_JSON", d.log_json);

        // Persistence
        let heartbeat_log_path = env_non_empty("SONA_HEARTBEAT_LOG").unwrap_or(d.heartbeat_log_path);
        let receipts_path = env_non_empty("SONA_RECEIPTS_PATH");

        let cfg = Self {
            coingecko_base_url,
            coingecko_api_key,
            use_mock,
            request_timeout_ms,
            refresh_interval_ms,
            chart_days,
            markets_limit,
            watchlist,
            alerts_path,
            slack_webhook_url,
            risk_tolerance,
            balance_usd,
            tz,
            log_json,
            heartbeat_log_path,
            receipts_path,
        };
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if self.request_timeout_ms == 0 {
            return Err(anyhow!("SONA_REQUEST_TIMEOUT_MS must be > 0"));
        }
        if self.refresh_interval_ms == 0 {
            return Err(anyhow!("SONA_REFRESH_INTERVAL_MS must be > 0"));
        }
        if self.chart_days == 0 {
            return Err(anyhow!("SONA_CHART_DAYS must be >= 1"));
        }
        if self.markets_limit == 0 || self.markets_limit > 250 {
            return Err(anyhow!("SONA_MARKETS_LIMIT must be within 1..=250"));
        }
        if !self.balance_usd.is_finite() || self.balance_usd < 0.0 {
            return Err(anyhow!("invalid SONA_BALANCE_USD"));
        }
        if self.tz.parse::<chrono_tz::Tz>().is_err() {
            return Err(anyhow!("invalid SONA_TZ: {}", self.tz));
        }
        Ok(())
    }
}
