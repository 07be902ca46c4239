use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

use crate::domain::{finite_or_zero, CoinDetail, MarketChart, SimplePriceMap};

pub const SIGNAL_SLIPPAGE: &str = "Slippage will hurt.";
pub const SIGNAL_WASH_TRADE: &str = "Wash trade barely any.";
pub const SIGNAL_MOMENTUM_DYING: &str = "Momentum is dying.";
pub const SIGNAL_CLEAN: &str = "This one is clean.";

/// Outcome of a single risk gate.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Gate {
    Pass,
    Fail,
    /// Not enough data to judge. Never counts as a pass.
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RiskMetric {
    pub status: &'static str,
    pub gate: Gate,
    /// 0..=100, higher is safer.
    pub score: u8,
}

impl RiskMetric {
    fn pass(status: &'static str, score: u8) -> Self {
        Self { status, gate: Gate::Pass, score }
    }

    fn fail(status: &'static str, score: u8) -> Self {
        Self { status, gate: Gate::Fail, score }
    }

    pub fn unknown() -> Self {
        Self { status: "unknown", gate: Gate::Unknown, score: 50 }
    }

    pub fn passed(&self) -> bool {
        self.gate == Gate::Pass
    }

    pub fn is_unknown(&self) -> bool {
        self.gate == Gate::Unknown
    }
}

// UI consumers read `{status, pass, score}`; `gate` rides along.
impl Serialize for RiskMetric {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("RiskMetric", 4)?;
        s.serialize_field("status", self.status)?;
        s.serialize_field("pass", &self.passed())?;
        s.serialize_field("score", &self.score)?;
        s.serialize_field("gate", &self.gate)?;
        s.end()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Recommendation {
    Enter,
    Wait,
    Cut,
    Reject,
}

impl Recommendation {
    pub fn from_score(score: u8) -> Self {
        if score >= 80 {
            Self::Enter
        } else if score >= 60 {
            Self::Wait
        } else if score >= 40 {
            Self::Cut
        } else {
            Self::Reject
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Enter => "enter",
            Self::Wait => "wait",
            Self::Cut => "cut",
            Self::Reject => "reject",
        }
    }
}

impl std::fmt::Display for Recommendation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskAnalysis {
    pub score: u8,
    pub liquidity: RiskMetric,
    pub wash_trade: RiskMetric,
    pub momentum: RiskMetric,
    pub slippage: RiskMetric,
    pub concentration: RiskMetric,
    pub signals: Vec<&'static str>,
    pub recommendation: Recommendation,
}

impl RiskAnalysis {
    /// Gate rows in display order.
    pub fn gates(&self) -> [(&'static str, &RiskMetric); 5] {
        [
            ("liquidity", &self.liquidity),
            ("wash trade", &self.wash_trade),
            ("momentum", &self.momentum),
            ("slippage", &self.slippage),
            ("concentration", &self.concentration),
        ]
    }
}

/// Stateless scorer turning provider snapshots into a 0-100 safety score.
pub struct RiskScorer;

impl RiskScorer {
    pub fn analyze(
        detail: &CoinDetail,
        simple_price: &SimplePriceMap,
        chart: Option<&MarketChart>,
    ) -> RiskAnalysis {
        let md = &detail.market_data;
        let quote = simple_price.get(&detail.id);

        let market_cap = md.market_cap_usd();
        let volume_24h = quote
            .and_then(|q| non_zero(q.usd_24h_vol))
            .unwrap_or_else(|| md.total_volume_usd());
        let change_24h = quote
            .and_then(|q| non_zero(q.usd_24h_change))
            .unwrap_or_else(|| md.price_change_pct_24h());

        let liquidity = score_liquidity(market_cap, volume_24h);
        let wash_trade = chart
            .map(|c| score_wash_trade(&c.volume_values()))
            .unwrap_or_else(RiskMetric::unknown);
        let momentum = score_momentum(change_24h);
        let slippage = chart
            .map(|c| score_slippage(&c.price_values(), volume_24h))
            .unwrap_or_else(RiskMetric::unknown);
        let concentration = score_concentration(md.circulating_supply(), md.total_supply());

        let score = composite_score(
            liquidity.score,
            wash_trade.score,
            momentum.score,
            slippage.score,
            concentration.score,
        );
        let signals = derive_signals(&liquidity, &wash_trade, &momentum, score);

        RiskAnalysis {
            score,
            liquidity,
            wash_trade,
            momentum,
            slippage,
            concentration,
            signals,
            recommendation: Recommendation::from_score(score),
        }
    }
}

fn non_zero(v: Option<f64>) -> Option<f64> {
    let x = finite_or_zero(v);
    (x != 0.0).then_some(x)
}

/// Weighted composite, rounded half-up. Weights are in percent so the sum
/// stays integral until the final division.
pub fn composite_score(liquidity: u8, wash_trade: u8, momentum: u8, slippage: u8, concentration: u8) -> u8 {
    let hundredths = 25 * u32::from(liquidity)
        + 25 * u32::from(wash_trade)
        + 20 * u32::from(momentum)
        + 15 * u32::from(slippage)
        + 15 * u32::from(concentration);
    ((hundredths + 50) / 100).min(100) as u8
}

pub fn derive_signals(
    liquidity: &RiskMetric,
    wash_trade: &RiskMetric,
    momentum: &RiskMetric,
    score: u8,
) -> Vec<&'static str> {
    let mut signals = Vec::new();
    if liquidity.score < 50 {
        signals.push(SIGNAL_SLIPPAGE);
    }
    // Fires on the clean end of the scale.
    if wash_trade.score > 70 {
        signals.push(SIGNAL_WASH_TRADE);
    }
    if momentum.score < 40 {
        signals.push(SIGNAL_MOMENTUM_DYING);
    }
    if score >= 70 {
        signals.push(SIGNAL_CLEAN);
    }
    signals
}

pub fn score_liquidity(market_cap: f64, volume_24h: f64) -> RiskMetric {
    let mut score: u8 = if market_cap > 1_000_000_000.0 {
        40
    } else if market_cap > 100_000_000.0 {
        30
    } else if market_cap > 10_000_000.0 {
        20
    } else {
        10
    };

    score += if volume_24h > 100_000_000.0 {
        30
    } else if volume_24h > 10_000_000.0 {
        20
    } else if volume_24h > 1_000_000.0 {
        10
    } else {
        0
    };

    let ratio = if market_cap > 0.0 { volume_24h / market_cap } else { 0.0 };
    score += if (0.1..=0.5).contains(&ratio) {
        30
    } else if ratio > 0.05 && ratio < 1.0 {
        15
    } else {
        0
    };

    if score >= 70 {
        RiskMetric::pass("strong", score)
    } else if score >= 50 {
        RiskMetric::pass("moderate", score)
    } else if score >= 30 {
        RiskMetric::fail("low", score)
    } else {
        RiskMetric::fail("very low", score)
    }
}

/// Volume dispersion relative to its mean (coefficient of variation).
pub fn score_wash_trade(volumes: &[f64]) -> RiskMetric {
    let Some(mean) = mean(volumes) else {
        return RiskMetric::unknown();
    };
    if mean <= 0.0 {
        return RiskMetric::unknown();
    }
    let variance = volumes.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / volumes.len() as f64;
    let dispersion = variance.sqrt() / mean;

    if dispersion > 0.8 {
        RiskMetric::fail("high wash trade", 30)
    } else if dispersion > 0.5 {
        RiskMetric::fail("moderate wash trade", 60)
    } else if dispersion > 0.3 {
        RiskMetric::pass("low", 80)
    } else {
        RiskMetric::pass("minimal", 100)
    }
}

pub fn score_momentum(change_pct_24h: f64) -> RiskMetric {
    let change = if change_pct_24h.is_finite() { change_pct_24h } else { 0.0 };

    if change > 10.0 && change < 50.0 {
        RiskMetric::pass("healthy", 90)
    } else if change >= 50.0 {
        RiskMetric::fail("overheated", 60)
    } else if change > 0.0 {
        RiskMetric::pass("building", 70)
    } else if change > -10.0 {
        RiskMetric::pass("consolidating", 50)
    } else {
        RiskMetric::fail("dying", 30)
    }
}

/// Price range over mean price, checked against the 24h volume depth.
pub fn score_slippage(prices: &[f64], volume_24h: f64) -> RiskMetric {
    let Some(volatility) = price_volatility(prices) else {
        return RiskMetric::unknown();
    };

    if volatility < 0.05 && volume_24h > 10_000_000.0 {
        RiskMetric::pass("safe", 95)
    } else if volatility < 0.1 && volume_24h > 1_000_000.0 {
        RiskMetric::pass("low", 80)
    } else if volatility < 0.2 {
        RiskMetric::pass("moderate", 60)
    } else if volatility < 0.4 {
        RiskMetric::fail("high", 40)
    } else {
        RiskMetric::fail("spike", 20)
    }
}

pub fn score_concentration(circulating_supply: f64, total_supply: f64) -> RiskMetric {
    if total_supply <= 0.0 {
        return RiskMetric::unknown();
    }
    let ratio = circulating_supply / total_supply;

    if ratio > 0.9 {
        RiskMetric::pass("low", 90)
    } else if ratio > 0.7 {
        RiskMetric::pass("acceptable", 75)
    } else if ratio > 0.5 {
        RiskMetric::pass("moderate", 60)
    } else if ratio > 0.3 {
        RiskMetric::fail("high", 40)
    } else {
        RiskMetric::fail("very high", 20)
    }
}

/// `(max - min) / mean`; `None` for an empty series or a non-positive mean.
pub fn price_volatility(prices: &[f64]) -> Option<f64> {
    let mean = mean(prices).filter(|m| *m > 0.0)?;
    let max = prices.iter().copied().fold(f64::MIN, f64::max);
    let min = prices.iter().copied().fold(f64::MAX, f64::min);
    Some((max - min) / mean)
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}
