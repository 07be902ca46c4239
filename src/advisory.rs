//! Presentation helpers layered on a finished [`RiskAnalysis`](crate::risk::RiskAnalysis).

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RiskTolerance {
    Low,
    Medium,
    High,
}

impl RiskTolerance {
    /// Share of the wallet committed at a perfect score.
    pub fn wallet_fraction(&self) -> f64 {
        match self {
            Self::Low => 0.05,
            Self::Medium => 0.10,
            Self::High => 0.20,
        }
    }
}

impl std::str::FromStr for RiskTolerance {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => Err(anyhow!("invalid risk tolerance: {other}")),
        }
    }
}

pub fn risk_level(score: u8) -> &'static str {
    if score >= 80 {
        "Low Risk"
    } else if score >= 60 {
        "Moderate"
    } else if score >= 40 {
        "High Risk"
    } else {
        "Very High Risk"
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Low,
    Moderate,
    High,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WashTradeSeverity {
    pub level: Severity,
    pub should_block: bool,
}

/// Maps a wash-trade status label onto a blocking decision.
pub fn wash_trade_severity(status: &str) -> WashTradeSeverity {
    let (level, should_block) = if status.contains("high") {
        (Severity::Critical, true)
    } else if status.contains("moderate") {
        (Severity::High, false)
    } else if status.contains("low") {
        (Severity::Moderate, false)
    } else {
        (Severity::Low, false)
    };
    WashTradeSeverity { level, should_block }
}

pub fn liquidity_label(market_cap: f64, volume_24h: f64) -> (&'static str, bool) {
    let ratio = if market_cap > 0.0 { volume_24h / market_cap } else { 0.0 };
    if market_cap > 1_000_000_000.0 && ratio > 0.1 {
        ("Excellent", true)
    } else if market_cap > 100_000_000.0 && ratio > 0.05 {
        ("Good", true)
    } else if market_cap > 10_000_000.0 {
        ("Moderate", true)
    } else {
        ("Low", false)
    }
}

pub fn market_cap_label(market_cap: f64) -> &'static str {
    if market_cap >= 10_000_000_000.0 {
        "Mega Cap"
    } else if market_cap >= 1_000_000_000.0 {
        "Large Cap"
    } else if market_cap >= 100_000_000.0 {
        "Mid Cap"
    } else if market_cap >= 10_000_000.0 {
        "Small Cap"
    } else if market_cap >= 1_000_000.0 {
        "Micro Cap"
    } else {
        "Nano Cap"
    }
}

/// Suggested position in USD: tolerance share of the balance, scaled by score.
pub fn position_size(balance_usd: f64, score: u8, tolerance: RiskTolerance) -> f64 {
    balance_usd * tolerance.wallet_fraction() * f64::from(score.min(100)) / 100.0
}

/// Rough price impact in percent. Zero liquidity yields `None`.
pub fn estimate_slippage_pct(trade_usd: f64, liquidity_usd: f64, volatility: f64) -> Option<f64> {
    if liquidity_usd <= 0.0 {
        return None;
    }
    Some(trade_usd / liquidity_usd * 100.0 * (1.0 + volatility))
}

pub fn format_usd_compact(value: f64) -> String {
    if value >= 1_000_000_000.0 {
        format!("${:.2}B", value / 1_000_000_000.0)
    } else if value >= 1_000_000.0 {
        format!("${:.2}M", value / 1_000_000.0)
    } else if value >= 1_000.0 {
        format!("${:.2}K", value / 1_000.0)
    } else {
        format!("${value:.2}")
    }
}

pub fn format_percentage(change: f64) -> String {
    let sign = if change >= 0.0 { "+" } else { "" };
    format!("{sign}{change:.2}%")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenInput {
    Address(String),
    Symbol(String),
    Name(String),
    Unknown(String),
}

impl TokenInput {
    pub fn value(&self) -> &str {
        match self {
            Self::Address(v) | Self::Symbol(v) | Self::Name(v) | Self::Unknown(v) => v,
        }
    }
}

fn is_evm_address(s: &str) -> bool {
    s.len() == 42 && s.starts_with("0x") && s[2..].chars().all(|c| c.is_ascii_hexdigit())
}

pub fn parse_token_input(input: &str) -> TokenInput {
    let trimmed = input.trim();
    if is_evm_address(trimmed) {
        return TokenInput::Address(trimmed.to_string());
    }
    let upper = trimmed.to_uppercase();
    if (2..=5).contains(&upper.len()) && upper.chars().all(|c| c.is_ascii_uppercase()) {
        return TokenInput::Symbol(upper);
    }
    if trimmed.chars().count() >= 2 {
        return TokenInput::Name(trimmed.to_string());
    }
    TokenInput::Unknown(trimmed.to_string())
}
