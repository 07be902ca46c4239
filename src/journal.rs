use anyhow::Result;
use std::{fs::OpenOptions, io::Write, path::Path};

use tracing::info;

use crate::advisory::{format_usd_compact, market_cap_label, risk_level};
use crate::config::Config;
use crate::scanner::TokenReport;
use crate::time;

/// Writes a receipt stamped in `cfg.tz` when `receipts_path` is set.
/// Returns whether anything was written.
pub fn record_analysis(cfg: &Config, report: &TokenReport, position_usd: f64) -> Result<bool> {
    let Some(path) = cfg.receipts_path.as_deref() else {
        return Ok(false);
    };
    let ts = time::local_timestamp(&cfg.tz)?;
    append_analysis_receipt(path, &ts, report, position_usd)?;
    info!(path, coin_id = %report.coin_id, "receipt.appended");
    Ok(true)
}

/// Appends one markdown receipt for an analyzed token.
pub fn append_analysis_receipt(
    receipts_md_path: impl AsRef<Path>,
    timestamp: &str,
    report: &TokenReport,
    position_usd: f64,
) -> Result<()> {
    let a = &report.analysis;

    let mut f = OpenOptions::new()
        .create(true)
        .append(true)
        .open(receipts_md_path)?;

    writeln!(f, "## {} ({})\n", report.detected_token, report.coin_id)?;
    writeln!(f, "- Time: {timestamp}")?;
    writeln!(f, "- Price (USD): {}", report.price_usd)?;
    writeln!(
        f,
        "- Market cap: {} ({})",
        format_usd_compact(report.market_cap_usd),
        market_cap_label(report.market_cap_usd)
    )?;
    writeln!(f, "- Volume 24h: {}", format_usd_compact(report.volume_24h_usd))?;
    writeln!(f, "- Score: {} / 100 ({})", a.score, risk_level(a.score))?;
    writeln!(f, "- Recommendation: {}", a.recommendation)?;
    writeln!(f, "- Suggested size (USD): {position_usd:.2}\n")?;

    writeln!(f, "| Gate | Status | Score | Pass |")?;
    writeln!(f, "|---|---|---|---|")?;
    for (name, m) in a.gates() {
        let mark = if m.is_unknown() { "?" } else if m.passed() { "yes" } else { "no" };
        writeln!(f, "| {name} | {} | {} | {mark} |", m.status, m.score)?;
    }
    writeln!(f)?;

    if !a.signals.is_empty() {
        writeln!(f, "### Signals\n")?;
        for s in &a.signals {
            writeln!(f, "- {s}")?;
        }
        writeln!(f)?;
    }
    writeln!(f, "---\n")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CoinDetail, SimplePriceMap};
    use crate::risk::RiskScorer;

    fn ghost_report() -> TokenReport {
        TokenReport {
            coin_id: "ghost".into(),
            detected_token: "Ghost / $GHST".into(),
            price_usd: 0.5,
            market_cap_usd: 0.0,
            volume_24h_usd: 10_000.0,
            price_volatility: None,
            analysis: RiskScorer::analyze(&CoinDetail::default(), &SimplePriceMap::new(), None),
        }
    }

    #[test]
    fn receipts_append_with_gate_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("receipts.md");
        let report = ghost_report();

        append_analysis_receipt(&path, "2026-01-01T00:00:00+00:00", &report, 0.0).unwrap();
        append_analysis_receipt(&path, "2026-01-01T01:00:00+00:00", &report, 0.0).unwrap();

        let body = std::fs::read_to_string(&path).unwrap();
        assert_eq!(body.matches("## Ghost / $GHST (ghost)").count(), 2);
        assert!(body.contains("| wash trade | unknown | 50 | ? |"));
        assert!(body.contains("| liquidity | very low | 10 | no |"));
        // 25*10 + 25*50 + 20*50 + 15*50 + 15*50 = 4000
        assert!(body.contains("- Score: 40 / 100 (High Risk)"));
        assert!(body.contains("- Recommendation: cut"));
        assert!(body.contains("- Market cap: $0.00 (Nano Cap)"));
    }

    #[test]
    fn record_is_a_noop_without_receipts_path() {
        let cfg = Config::default();
        assert!(cfg.receipts_path.is_none());
        assert!(!record_analysis(&cfg, &ghost_report(), 0.0).unwrap());
    }

    #[test]
    fn record_appends_each_call_with_local_time() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("watch.md");
        let cfg = Config {
            receipts_path: Some(path.to_string_lossy().into_owned()),
            tz: "Asia/Kolkata".into(),
            ..Config::default()
        };

        assert!(record_analysis(&cfg, &ghost_report(), 12.5).unwrap());
        assert!(record_analysis(&cfg, &ghost_report(), 12.5).unwrap());

        let body = std::fs::read_to_string(&path).unwrap();
        assert_eq!(body.matches("## Ghost / $GHST (ghost)").count(), 2);
        assert_eq!(body.matches("+05:30").count(), 2);
        assert!(body.contains("- Suggested size (USD): 12.50"));
    }
}
