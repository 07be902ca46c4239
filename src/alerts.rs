use std::{fs, path::Path};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AlertMetric {
    Price,
    Volume,
    Score,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AlertCondition {
    Above,
    Below,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Alert {
    pub id: String,
    pub token_id: String,
    #[serde(rename = "type")]
    pub metric: AlertMetric,
    pub condition: AlertCondition,
    pub value: f64,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

/// Values an alert can be checked against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlertSnapshot {
    pub price_usd: f64,
    pub volume_24h_usd: f64,
    pub score: u8,
}

impl Alert {
    pub fn is_triggered(&self, snap: &AlertSnapshot) -> bool {
        let observed = match self.metric {
            AlertMetric::Price => snap.price_usd,
            AlertMetric::Volume => snap.volume_24h_usd,
            AlertMetric::Score => f64::from(snap.score),
        };
        match self.condition {
            AlertCondition::Above => observed > self.value,
            AlertCondition::Below => observed < self.value,
        }
    }

    pub fn describe(&self, snap: &AlertSnapshot) -> String {
        let (label, observed) = match self.metric {
            AlertMetric::Price => ("price", snap.price_usd),
            AlertMetric::Volume => ("volume", snap.volume_24h_usd),
            AlertMetric::Score => ("score", f64::from(snap.score)),
        };
        let dir = match self.condition {
            AlertCondition::Above => "above",
            AlertCondition::Below => "below",
        };
        format!("[{}] {} {label} {observed} is {dir} {}", self.id, self.token_id, self.value)
    }
}

pub fn load(path: impl AsRef<Path>) -> Result<Vec<Alert>> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(vec![]);
    }
    let raw = fs::read_to_string(path)?;
    serde_json::from_str(&raw).with_context(|| format!("parsing alerts from {}", path.display()))
}

pub fn evaluate<'a>(alerts: &'a [Alert], token_id: &str, snap: &AlertSnapshot) -> Vec<&'a Alert> {
    alerts
        .iter()
        .filter(|a| a.enabled && a.token_id == token_id && a.is_triggered(snap))
        .collect()
}
