use anyhow::{anyhow, Result};
use reqwest::Client;
use serde::Serialize;
use tracing::info;

use crate::alerts::{Alert, AlertSnapshot};
use crate::risk::Recommendation;

/// Pushes triggered alerts to a Slack webhook. Without a webhook every call
/// is a no-op, so dev setups need no Slack config.
#[derive(Clone)]
pub struct Notifier {
    slack_webhook_url: Option<String>,
    http: Client,
}

#[derive(Serialize)]
struct SlackPayload<'a> {
    text: &'a str,
}

pub fn format_alert_message(
    token: &str,
    recommendation: Recommendation,
    fired: &[&Alert],
    snap: &AlertSnapshot,
) -> String {
    let mut text = format!("*{token}* score {} ({recommendation})", snap.score);
    for alert in fired {
        text.push_str("\n• ");
        text.push_str(&alert.describe(snap));
    }
    text
}

impl Notifier {
    pub fn new(slack_webhook_url: Option<String>) -> Self {
        Self { slack_webhook_url, http: Client::new() }
    }

    pub fn is_enabled(&self) -> bool {
        self.slack_webhook_url.is_some()
    }

    pub async fn send_alerts(
        &self,
        token: &str,
        recommendation: Recommendation,
        fired: &[&Alert],
        snap: &AlertSnapshot,
    ) -> Result<()> {
        if fired.is_empty() {
            return Ok(());
        }
        info!(token, fired = fired.len(), "notifier.alerts");
        self.post(&format_alert_message(token, recommendation, fired, snap)).await
    }

    async fn post(&self, text: &str) -> Result<()> {
        let Some(url) = self.slack_webhook_url.as_deref() else {
            return Ok(());
        };

        let resp = self.http.post(url).json(&SlackPayload { text }).send().await?;
        if !resp.status().is_success() {
            return Err(anyhow!("slack webhook failed: {}", resp.status()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alerts::{AlertCondition, AlertMetric};

    fn snap() -> AlertSnapshot {
        AlertSnapshot { price_usd: 1.25, volume_24h_usd: 5e6, score: 35 }
    }

    #[test]
    fn message_lists_every_fired_alert() {
        let a = Alert {
            id: "7".into(),
            token_id: "pepe".into(),
            metric: AlertMetric::Score,
            condition: AlertCondition::Below,
            value: 40.0,
            enabled: true,
        };
        let msg = format_alert_message("Pepe / $PEPE", Recommendation::Reject, &[&a], &snap());
        assert!(msg.starts_with("*Pepe / $PEPE* score 35 (reject)"));
        assert!(msg.contains("[7] pepe score 35 is below 40"));
    }

    #[tokio::test]
    async fn missing_webhook_is_a_no_op() {
        let n = Notifier::new(None);
        assert!(!n.is_enabled());
        let a = Alert {
            id: "1".into(),
            token_id: "pepe".into(),
            metric: AlertMetric::Price,
            condition: AlertCondition::Above,
            value: 1.0,
            enabled: true,
        };
        n.send_alerts("pepe", Recommendation::Cut, &[&a], &snap()).await.unwrap();
    }
}
