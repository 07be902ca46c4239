use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Missing, NaN and infinite values all collapse to 0.
pub fn finite_or_zero(v: Option<f64>) -> f64 {
    match v {
        Some(x) if x.is_finite() => x,
        _ => 0.0,
    }
}

/// Provider wraps most monetary leaves as `{ "usd": ... }`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UsdAmount {
    #[serde(default)]
    pub usd: Option<f64>,
}

impl UsdAmount {
    pub fn new(usd: f64) -> Self {
        Self { usd: Some(usd) }
    }

    pub fn value(&self) -> f64 {
        finite_or_zero(self.usd)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketData {
    #[serde(default)]
    pub current_price: Option<UsdAmount>,
    #[serde(default)]
    pub market_cap: Option<UsdAmount>,
    #[serde(default)]
    pub total_volume: Option<UsdAmount>,
    #[serde(default)]
    pub price_change_percentage_24h: Option<f64>,
    #[serde(default)]
    pub circulating_supply: Option<f64>,
    #[serde(default)]
    pub total_supply: Option<f64>,
    #[serde(default)]
    pub ath: Option<UsdAmount>,
    #[serde(default)]
    pub ath_change_percentage: Option<UsdAmount>,
}

impl MarketData {
    pub fn current_price_usd(&self) -> f64 {
        self.current_price.as_ref().map(UsdAmount::value).unwrap_or(0.0)
    }

    pub fn market_cap_usd(&self) -> f64 {
        self.market_cap.as_ref().map(UsdAmount::value).unwrap_or(0.0)
    }

    pub fn total_volume_usd(&self) -> f64 {
        self.total_volume.as_ref().map(UsdAmount::value).unwrap_or(0.0)
    }

    pub fn price_change_pct_24h(&self) -> f64 {
        finite_or_zero(self.price_change_percentage_24h)
    }

    pub fn circulating_supply(&self) -> f64 {
        finite_or_zero(self.circulating_supply)
    }

    pub fn total_supply(&self) -> f64 {
        finite_or_zero(self.total_supply)
    }
}

/// `/coins/{id}` response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoinDetail {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub symbol: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub market_data: MarketData,
}

/// One entry of the `/simple/price` map.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimplePrice {
    #[serde(default)]
    pub usd: Option<f64>,
    #[serde(default)]
    pub usd_24h_vol: Option<f64>,
    #[serde(default)]
    pub usd_24h_change: Option<f64>,
    #[serde(default)]
    pub last_updated_at: Option<f64>,
}

/// `/simple/price` response, keyed by coin id.
pub type SimplePriceMap = HashMap<String, SimplePrice>;

/// `/coins/{id}/market_chart` response. Each point is `[timestamp_ms, value]`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketChart {
    #[serde(default)]
    pub prices: Vec<(f64, f64)>,
    #[serde(default)]
    pub market_caps: Vec<(f64, f64)>,
    #[serde(default)]
    pub total_volumes: Vec<(f64, f64)>,
}

impl MarketChart {
    pub fn price_values(&self) -> Vec<f64> {
        finite_values(&self.prices)
    }

    pub fn volume_values(&self) -> Vec<f64> {
        finite_values(&self.total_volumes)
    }
}

fn finite_values(points: &[(f64, f64)]) -> Vec<f64> {
    points.iter().map(|(_, v)| *v).filter(|v| v.is_finite()).collect()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchCoin {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub symbol: String,
    #[serde(default)]
    pub market_cap_rank: Option<u32>,
    #[serde(default)]
    pub thumb: Option<String>,
}

/// `/search` response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    #[serde(default)]
    pub coins: Vec<SearchCoin>,
}

/// One row of `/coins/markets`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketCoin {
    pub id: String,
    #[serde(default)]
    pub symbol: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub current_price: Option<f64>,
    #[serde(default)]
    pub market_cap: Option<f64>,
    #[serde(default)]
    pub market_cap_rank: Option<u32>,
    #[serde(default)]
    pub total_volume: Option<f64>,
    #[serde(default)]
    pub price_change_percentage_24h: Option<f64>,
    #[serde(default)]
    pub image: Option<String>,
}
