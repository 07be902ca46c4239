use std::collections::HashMap;

use chrono::Utc;
use rand::Rng;

use crate::domain::{
    CoinDetail, MarketChart, MarketCoin, MarketData, SearchCoin, SearchResult, SimplePrice, SimplePriceMap,
    UsdAmount,
};

const HOUR_MS: f64 = 3_600_000.0;

pub fn search() -> SearchResult {
    SearchResult {
        coins: vec![SearchCoin {
            id: "solana".into(),
            name: "Solana".into(),
            symbol: "SOL".into(),
            market_cap_rank: Some(5),
            thumb: None,
        }],
    }
}

pub fn simple_price() -> SimplePriceMap {
    let mut map = HashMap::new();
    map.insert(
        "solana".to_string(),
        SimplePrice {
            usd: Some(142.5),
            usd_24h_vol: Some(2_847_392_847.0),
            usd_24h_change: Some(3.42),
            last_updated_at: Some(Utc::now().timestamp() as f64),
        },
    );
    map
}

pub fn coin_detail() -> CoinDetail {
    CoinDetail {
        id: "solana".into(),
        symbol: "sol".into(),
        name: "Solana".into(),
        market_data: MarketData {
            current_price: Some(UsdAmount::new(142.5)),
            market_cap: Some(UsdAmount::new(68_430_000_000.0)),
            total_volume: Some(UsdAmount::new(2_847_392_847.0)),
            price_change_percentage_24h: Some(3.42),
            circulating_supply: Some(480_000_000.0),
            total_supply: Some(580_000_000.0),
            ath: Some(UsdAmount::new(260.0)),
            ath_change_percentage: Some(UsdAmount::new(-45.19)),
        },
    }
}

/// 24 hourly points ending now, lightly jittered.
pub fn market_chart() -> MarketChart {
    let now = Utc::now().timestamp_millis() as f64;
    let mut rng = rand::thread_rng();
    let mut series = |base: f64, spread: f64| -> Vec<(f64, f64)> {
        (0..24)
            .map(|i| (now - (24 - i) as f64 * HOUR_MS, base + rng.gen::<f64>() * spread))
            .collect()
    };

    MarketChart {
        prices: series(140.0, 5.0),
        market_caps: series(68_000_000_000.0, 2_000_000_000.0),
        total_volumes: series(2_500_000_000.0, 500_000_000.0),
    }
}

pub fn coin_markets() -> Vec<MarketCoin> {
    let row = |id: &str, symbol: &str, name: &str, price: f64, mcap: f64, rank: u32, volume: f64, change: f64| {
        MarketCoin {
            id: id.into(),
            symbol: symbol.into(),
            name: name.into(),
            current_price: Some(price),
            market_cap: Some(mcap),
            market_cap_rank: Some(rank),
            total_volume: Some(volume),
            price_change_percentage_24h: Some(change),
            image: None,
        }
    };

    vec![
        row("bitcoin", "btc", "Bitcoin", 96_420.32, 1_910_234_567_890.0, 1, 45_678_912_345.0, 2.34),
        row("ethereum", "eth", "Ethereum", 3_245.67, 390_123_456_789.0, 2, 23_456_789_012.0, -1.23),
        row("tether", "usdt", "Tether", 1.0002, 125_000_000_000.0, 3, 87_654_321_098.0, 0.01),
        row("binancecoin", "bnb", "BNB", 612.45, 89_123_456_789.0, 4, 1_987_654_321.0, 3.87),
        row("solana", "sol", "Solana", 142.5, 68_430_000_000.0, 5, 2_847_392_847.0, 3.42),
    ]
}
