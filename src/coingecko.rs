use std::time::Duration;

use anyhow::Result;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::config::Config;
use crate::domain::{CoinDetail, MarketChart, MarketCoin, SearchResult, SimplePriceMap};
use crate::fallback;

/// Thin CoinGecko v3 wrapper. Never surfaces transport errors: every call
/// degrades to the static fixture for its endpoint.
#[derive(Clone)]
pub struct CoinGeckoClient {
    base_url: String,
    api_key: Option<String>,
    use_mock: bool,
    http: Client,
}

impl CoinGeckoClient {
    pub fn new(cfg: &Config) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_millis(cfg.request_timeout_ms))
            .build()?;
        Ok(Self {
            base_url: cfg.coingecko_base_url.trim_end_matches('/').to_string(),
            api_key: cfg.coingecko_api_key.clone(),
            use_mock: cfg.use_mock,
            http,
        })
    }

    pub fn is_offline(&self) -> bool {
        self.use_mock || self.api_key.is_none()
    }

    pub async fn search(&self, query: &str) -> SearchResult {
        self.get_or("/search", &[("query", query.to_string())], fallback::search)
            .await
    }

    pub async fn simple_price(&self, ids: &[&str]) -> SimplePriceMap {
        let params = [
            ("ids", ids.join(",")),
            ("vs_currencies", "usd".to_string()),
            ("include_24hr_vol", "true".to_string()),
            ("include_24hr_change", "true".to_string()),
            ("include_last_updated_at", "true".to_string()),
        ];
        self.get_or("/simple/price", &params, fallback::simple_price).await
    }

    pub async fn coin_detail(&self, id: &str) -> CoinDetail {
        let params = [
            ("localization", "false".to_string()),
            ("tickers", "false".to_string()),
            ("market_data", "true".to_string()),
        ];
        self.get_or(&format!("/coins/{id}"), &params, fallback::coin_detail)
            .await
    }

    pub async fn market_chart(&self, id: &str, days: u32) -> MarketChart {
        let params = chart_params(days);
        self.get_or(&format!("/coins/{id}/market_chart"), &params, fallback::market_chart)
            .await
    }

    /// Top coins by market cap.
    pub async fn coin_markets(&self, per_page: u32, page: u32) -> Vec<MarketCoin> {
        let params = [
            ("vs_currency", "usd".to_string()),
            ("order", "market_cap_desc".to_string()),
            ("per_page", per_page.to_string()),
            ("page", page.to_string()),
            ("sparkline", "false".to_string()),
        ];
        self.get_or("/coins/markets", &params, fallback::coin_markets).await
    }

    async fn get_or<T, F>(&self, endpoint: &str, params: &[(&str, String)], fallback: F) -> T
    where
        T: DeserializeOwned,
        F: FnOnce() -> T,
    {
        if self.is_offline() {
            debug!(endpoint, "coingecko.offline");
            return fallback();
        }
        match self.get(endpoint, params).await {
            Ok(v) => v,
            Err(err) => {
                warn!(endpoint, error = %err, "coingecko.fallback");
                fallback()
            }
        }
    }

    async fn get<T: DeserializeOwned>(&self, endpoint: &str, params: &[(&str, String)]) -> Result<T> {
        let url = format!("{}{}", self.base_url, endpoint);
        let mut req = self.http.get(url).query(params);
        if let Some(key) = self.api_key.as_deref() {
            req = req.query(&[("x_cg_demo_api_key", key)]);
        }
        let resp = req.send().await?.error_for_status()?;
        Ok(resp.json().await?)
    }
}

/// Up to 90 days the provider picks hourly points on its own; `interval`
/// is only sent for longer ranges.
fn chart_params(days: u32) -> Vec<(&'static str, String)> {
    let mut params = vec![("vs_currency", "usd".to_string()), ("days", days.to_string())];
    if days > 90 {
        params.push(("interval", "daily".to_string()));
    }
    params
}
