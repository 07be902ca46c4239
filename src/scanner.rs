use std::time::Duration;

use anyhow::{anyhow, Result};
use serde::Serialize;
use tracing::{info, warn};

use crate::advisory::{
    format_percentage, format_usd_compact, parse_token_input, position_size, risk_level, TokenInput,
};
use crate::alerts::{self, Alert, AlertSnapshot};
use crate::coingecko::CoinGeckoClient;
use crate::config::Config;
use crate::domain::finite_or_zero;
use crate::{journal, logger};
use crate::notifier::Notifier;
use crate::risk::{price_volatility, RiskAnalysis, RiskScorer};

#[derive(Debug, Clone, Serialize)]
pub struct TokenReport {
    pub coin_id: String,
    /// "Name / $SYMBOL"
    pub detected_token: String,
    pub price_usd: f64,
    pub market_cap_usd: f64,
    pub volume_24h_usd: f64,
    /// Chart range over mean price, when the chart allows it.
    pub price_volatility: Option<f64>,
    pub analysis: RiskAnalysis,
}

impl TokenReport {
    pub fn alert_snapshot(&self) -> AlertSnapshot {
        AlertSnapshot {
            price_usd: self.price_usd,
            volume_24h_usd: self.volume_24h_usd,
            score: self.analysis.score,
        }
    }
}

/// search -> detail + quote + chart -> score.
pub async fn analyze_token(client: &CoinGeckoClient, query: &str, chart_days: u32) -> Result<TokenReport> {
    let input = parse_token_input(query);
    if let TokenInput::Unknown(raw) = &input {
        return Err(anyhow!("query too short: {raw:?}"));
    }
    let query = input.value();

    let found = client.search(query).await;
    let Some(coin) = found.coins.into_iter().next() else {
        return Err(anyhow!("token not found: {query}"));
    };
    let detected_token = format!("{} / ${}", coin.name, coin.symbol.to_uppercase());
    info!(query, input = ?input, coin_id = %coin.id, %detected_token, "scanner.detected");

    let ids = [coin.id.as_str()];
    let (detail, quotes, chart) = tokio::join!(
        client.coin_detail(&coin.id),
        client.simple_price(&ids),
        client.market_chart(&coin.id, chart_days),
    );

    let analysis = RiskScorer::analyze(&detail, &quotes, Some(&chart));

    let quote = quotes.get(&detail.id);
    let price_usd = quote
        .map(|q| finite_or_zero(q.usd))
        .filter(|p| *p != 0.0)
        .unwrap_or_else(|| detail.market_data.current_price_usd());
    let volume_24h_usd = quote
        .map(|q| finite_or_zero(q.usd_24h_vol))
        .filter(|v| *v != 0.0)
        .unwrap_or_else(|| detail.market_data.total_volume_usd());
    let price_volatility = price_volatility(&chart.price_values());

    info!(
        coin_id = %coin.id,
        score = analysis.score,
        recommendation = %analysis.recommendation,
        signals = ?analysis.signals,
        "scanner.analyzed"
    );

    Ok(TokenReport {
        coin_id: coin.id,
        detected_token,
        price_usd,
        market_cap_usd: detail.market_data.market_cap_usd(),
        volume_24h_usd,
        price_volatility,
        analysis,
    })
}

/// Logs the top-of-market listing.
pub async fn log_markets(client: &CoinGeckoClient, limit: u32) -> usize {
    let markets = client.coin_markets(limit, 1).await;
    for m in &markets {
        info!(
            rank = m.market_cap_rank.unwrap_or(0),
            id = %m.id,
            price = finite_or_zero(m.current_price),
            market_cap = %format_usd_compact(finite_or_zero(m.market_cap)),
            change_24h = %format_percentage(finite_or_zero(m.price_change_percentage_24h)),
            "scanner.market"
        );
    }
    markets.len()
}

/// Watch loop: market listing, watchlist analysis and alerts every refresh interval.
pub async fn run(cfg: Config) -> Result<()> {
    let client = CoinGeckoClient::new(&cfg)?;
    let notifier = Notifier::new(cfg.slack_webhook_url.clone());
    let watch_alerts: Vec<Alert> = match cfg.alerts_path.as_deref() {
        Some(path) => alerts::load(path)?,
        None => vec![],
    };

    info!(
        offline = client.is_offline(),
        watchlist = ?cfg.watchlist,
        alerts = watch_alerts.len(),
        notifier = notifier.is_enabled(),
        refresh_ms = cfg.refresh_interval_ms,
        "scanner.start"
    );

    let mut interval = tokio::time::interval(Duration::from_millis(cfg.refresh_interval_ms));
    let mut tick: u64 = 0;
    loop {
        interval.tick().await;
        tick += 1;

        let listed = log_markets(&client, cfg.markets_limit).await;

        let mut analyzed = 0;
        for query in &cfg.watchlist {
            let report = match analyze_token(&client, query, cfg.chart_days).await {
                Ok(r) => r,
                Err(err) => {
                    warn!(query = %query, error = %err, "scanner.analyze_failed");
                    continue;
                }
            };
            analyzed += 1;
            info!(
                coin_id = %report.coin_id,
                score = report.analysis.score,
                level = risk_level(report.analysis.score),
                "scanner.watch"
            );

            let position_usd = position_size(cfg.balance_usd, report.analysis.score, cfg.risk_tolerance);
            if let Err(err) = journal::record_analysis(&cfg, &report, position_usd) {
                warn!(coin_id = %report.coin_id, error = %err, "scanner.receipt_failed");
            }

            let snap = report.alert_snapshot();
            let fired = alerts::evaluate(&watch_alerts, &report.coin_id, &snap);
            if let Err(err) = notifier
                .send_alerts(&report.detected_token, report.analysis.recommendation, &fired, &snap)
                .await
            {
                warn!(error = %err, "scanner.notify_failed");
            }
        }

        info!(tick, listed, analyzed, "scanner.tick");
        if let Err(err) = logger::append_line(&cfg.heartbeat_log_path, &logger::heartbeat_line(tick, analyzed)) {
            warn!(error = %err, "scanner.heartbeat_failed");
        }
    }
}
