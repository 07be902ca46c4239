pub mod advisory;
pub mod alerts;
pub mod coingecko;
pub mod config;
pub mod domain;
pub mod fallback;
pub mod journal;
pub mod logger;
pub mod notifier;
pub mod risk;
pub mod scanner;
pub mod time;

pub use domain::{CoinDetail, MarketChart, SimplePrice, SimplePriceMap};
pub use risk::{Gate, Recommendation, RiskAnalysis, RiskMetric, RiskScorer};
