use sona_intelligence::domain::{MarketData, UsdAmount};
use sona_intelligence::{CoinDetail, Gate, MarketChart, Recommendation, RiskAnalysis, RiskScorer, SimplePriceMap};

fn coin(market_cap: f64, volume: f64, change: f64, circulating: f64, total: f64) -> CoinDetail {
    CoinDetail {
        id: "token".into(),
        symbol: "tkn".into(),
        name: "Token".into(),
        market_data: MarketData {
            current_price: Some(UsdAmount::new(1.0)),
            market_cap: Some(UsdAmount::new(market_cap)),
            total_volume: Some(UsdAmount::new(volume)),
            price_change_percentage_24h: Some(change),
            circulating_supply: Some(circulating),
            total_supply: Some(total),
            ..MarketData::default()
        },
    }
}

fn hourly(values: &[f64]) -> Vec<(f64, f64)> {
    values
        .iter()
        .enumerate()
        .map(|(i, v)| (1_700_000_000_000.0 + i as f64 * 3_600_000.0, *v))
        .collect()
}

fn chart(prices: &[f64], volumes: &[f64]) -> MarketChart {
    MarketChart {
        prices: hourly(prices),
        market_caps: vec![],
        total_volumes: hourly(volumes),
    }
}

fn flat_chart() -> MarketChart {
    chart(&[100.0, 100.5, 101.0, 100.2, 100.8], &[3.0e8, 3.1e8, 2.9e8, 3.0e8, 3.05e8])
}

fn weighted(a: &RiskAnalysis) -> f64 {
    0.25 * f64::from(a.liquidity.score)
        + 0.25 * f64::from(a.wash_trade.score)
        + 0.20 * f64::from(a.momentum.score)
        + 0.15 * f64::from(a.slippage.score)
        + 0.15 * f64::from(a.concentration.score)
}

#[test]
fn large_cap_with_calm_chart_is_clean() {
    let a = RiskScorer::analyze(&coin(2e9, 3e8, 3.0, 95.0, 100.0), &SimplePriceMap::new(), Some(&flat_chart()));

    assert_eq!((a.liquidity.status, a.liquidity.gate), ("strong", Gate::Pass));
    assert_eq!((a.momentum.status, a.momentum.gate), ("building", Gate::Pass));
    assert_eq!((a.concentration.status, a.concentration.gate), ("low", Gate::Pass));
    assert!(a.score >= 70);
    assert!(a.signals.contains(&"This one is clean."));
    assert!(matches!(a.recommendation, Recommendation::Enter | Recommendation::Wait));
    // 25*100 + 25*100 + 20*70 + 15*95 + 15*90 = 9175
    assert_eq!(a.score, 92);
    assert_eq!(a.recommendation, Recommendation::Enter);
}

#[test]
fn micro_cap_without_supply_is_rejected() {
    let spiky = chart(&[0.01, 0.03, 0.005, 0.02], &[10.0, 10.0, 10.0, 40_000.0]);
    let a = RiskScorer::analyze(&coin(500_000.0, 10_000.0, 0.0, 1.0, 0.0), &SimplePriceMap::new(), Some(&spiky));

    assert_eq!((a.liquidity.status, a.liquidity.gate), ("very low", Gate::Fail));
    assert_eq!(a.concentration.status, "unknown");
    assert_eq!(a.concentration.score, 50);
    assert!(!a.concentration.passed());
    assert!(a.score < 40);
    assert_eq!(a.recommendation, Recommendation::Reject);
    assert!(a.signals.contains(&"Slippage will hurt."));
}

#[test]
fn erratic_volume_flags_wash_trading() {
    let c = chart(&[1.0, 1.0, 1.0, 1.0], &[10.0, 10.0, 10.0, 1_000.0]);
    let a = RiskScorer::analyze(&coin(2e9, 3e8, 3.0, 95.0, 100.0), &SimplePriceMap::new(), Some(&c));

    assert_eq!(a.wash_trade.status, "high wash trade");
    assert_eq!(a.wash_trade.score, 30);
    assert!(!a.wash_trade.passed());
    assert!(!a.signals.contains(&"Wash trade barely any."));
}

#[test]
fn steep_drop_reads_as_dying_momentum() {
    let a = RiskScorer::analyze(&coin(2e9, 3e8, -25.0, 95.0, 100.0), &SimplePriceMap::new(), Some(&flat_chart()));

    assert_eq!((a.momentum.status, a.momentum.score, a.momentum.gate), ("dying", 30, Gate::Fail));
    assert!(a.signals.contains(&"Momentum is dying."));
}

#[test]
fn missing_chart_leaves_chart_gates_unknown() {
    let inputs = [
        coin(2e9, 3e8, 3.0, 95.0, 100.0),
        coin(500_000.0, 10_000.0, -40.0, 1.0, 0.0),
        CoinDetail::default(),
    ];
    for detail in &inputs {
        let a = RiskScorer::analyze(detail, &SimplePriceMap::new(), None);
        for m in [&a.wash_trade, &a.slippage] {
            assert_eq!(m.status, "unknown");
            assert!(!m.passed());
            assert_eq!(m.score, 50);
            assert_eq!(m.gate, Gate::Unknown);
        }
    }
}

#[test]
fn empty_chart_series_leave_chart_gates_unknown() {
    let detail = coin(2e9, 3e8, 3.0, 95.0, 100.0);
    let empty = MarketChart::default();
    let with_empty = RiskScorer::analyze(&detail, &SimplePriceMap::new(), Some(&empty));
    let without = RiskScorer::analyze(&detail, &SimplePriceMap::new(), None);

    for m in [&with_empty.wash_trade, &with_empty.slippage] {
        assert_eq!((m.status, m.gate, m.score), ("unknown", Gate::Unknown, 50));
    }
    assert_eq!(with_empty.score, without.score);
    assert_eq!(with_empty.signals, without.signals);
}

#[test]
fn parabolic_move_is_overheated() {
    let a = RiskScorer::analyze(&coin(2e9, 3e8, 60.0, 95.0, 100.0), &SimplePriceMap::new(), None);
    assert_eq!((a.momentum.status, a.momentum.score, a.momentum.gate), ("overheated", 60, Gate::Fail));
}

#[test]
fn composite_matches_weighted_sum_and_ladder() {
    let charts = [None, Some(flat_chart()), Some(chart(&[1.0, 2.0], &[1.0, 9.0]))];
    let changes = [-30.0, -5.0, 0.0, 5.0, 20.0, 75.0];
    let caps = [(5e5, 1e4), (5e7, 3e7), (2e8, 5e5), (2e9, 3e8)];

    for chart in &charts {
        for &change in &changes {
            for &(mcap, vol) in &caps {
                let a = RiskScorer::analyze(&coin(mcap, vol, change, 50.0, 100.0), &SimplePriceMap::new(), chart.as_ref());
                assert!(a.score <= 100);
                // Half-up rounding of the weighted sum, same as floor(x + 0.5).
                assert_eq!(f64::from(a.score), (weighted(&a) + 0.5).floor());
                assert_eq!(a.recommendation, Recommendation::from_score(a.score));
            }
        }
    }
}

#[test]
fn recommendation_is_monotonic_in_score() {
    let rank = |r: Recommendation| match r {
        Recommendation::Reject => 0,
        Recommendation::Cut => 1,
        Recommendation::Wait => 2,
        Recommendation::Enter => 3,
    };
    let mut flips = 0;
    for s in 1..=100u8 {
        let (prev, cur) = (rank(Recommendation::from_score(s - 1)), rank(Recommendation::from_score(s)));
        assert!(cur >= prev);
        if cur != prev {
            assert_eq!(cur - prev, 1);
            flips += 1;
        }
    }
    assert_eq!(flips, 3);
}

#[test]
fn analyze_is_idempotent() {
    let detail = coin(2e8, 2e7, 12.0, 80.0, 100.0);
    let c = flat_chart();
    let first = RiskScorer::analyze(&detail, &SimplePriceMap::new(), Some(&c));
    let second = RiskScorer::analyze(&detail, &SimplePriceMap::new(), Some(&c));
    assert_eq!(first, second);
}

#[test]
fn provider_json_flows_through_scorer() {
    let detail: CoinDetail = serde_json::from_str(
        r#"{"id":"bonk","symbol":"bonk","name":"Bonk","market_data":{
            "market_cap":{"usd":1500000000},"total_volume":{"usd":1},
            "price_change_percentage_24h":-3.1,"circulating_supply":70,"total_supply":100}}"#,
    )
    .unwrap();
    let quotes: SimplePriceMap =
        serde_json::from_str(r#"{"bonk":{"usd":0.00002,"usd_24h_vol":300000000,"usd_24h_change":15.5}}"#).unwrap();
    let a = RiskScorer::analyze(&detail, &quotes, None);

    // quote volume wins: 40 + 30 + 30
    assert_eq!(a.liquidity.score, 100);
    assert_eq!(a.momentum.status, "healthy");
    // 0.7 is not > 0.7
    assert_eq!(a.concentration.status, "moderate");
    let json = serde_json::to_value(&a).unwrap();
    assert_eq!(json["slippage"]["status"], "unknown");
    assert_eq!(json["slippage"]["pass"], false);
}
