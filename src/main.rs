use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use sona_intelligence::advisory::{
    estimate_slippage_pct, format_percentage, format_usd_compact, liquidity_label, market_cap_label, position_size,
    risk_level, wash_trade_severity,
};
use sona_intelligence::coingecko::CoinGeckoClient;
use sona_intelligence::config::Config;
use sona_intelligence::scanner::{self, TokenReport};
use sona_intelligence::{journal, logger};

#[derive(Parser)]
#[command(name = "sona", version, about = "Token risk scoring over public market data")]
struct Cli {
    /// Serve fixtures instead of calling the market-data API.
    #[arg(long, global = true)]
    mock: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Score a single token by name, symbol or id.
    Analyze {
        query: String,
        /// Print the report as JSON.
        #[arg(long)]
        json: bool,
    },
    /// List the top coins by market cap.
    Markets {
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Refresh markets and watchlist on an interval.
    Watch,
}

fn print_report(report: &TokenReport, position_usd: f64) {
    let a = &report.analysis;
    println!("{} ({})", report.detected_token, report.coin_id);
    let (liq_label, _) = liquidity_label(report.market_cap_usd, report.volume_24h_usd);
    println!(
        "price ${}  mcap {} ({})  vol 24h {}  liquidity {liq_label}",
        report.price_usd,
        format_usd_compact(report.market_cap_usd),
        market_cap_label(report.market_cap_usd),
        format_usd_compact(report.volume_24h_usd)
    );
    println!(
        "score {}/100  {}  -> {}",
        a.score,
        risk_level(a.score),
        a.recommendation.as_str().to_uppercase()
    );
    for (name, m) in a.gates() {
        let mark = if m.is_unknown() { "??" } else if m.passed() { "ok" } else { "!!" };
        println!("  [{mark}] {name:<14} {:<20} {:>3}", m.status, m.score);
    }
    for s in &a.signals {
        println!("  > {s}");
    }
    if wash_trade_severity(a.wash_trade.status).should_block {
        println!("  wash trading detected: do not enter");
    }
    print!("suggested size ${position_usd:.2}");
    match report
        .price_volatility
        .and_then(|vol| estimate_slippage_pct(position_usd, report.volume_24h_usd, vol))
    {
        Some(pct) => println!("  est. slippage {pct:.4}%"),
        None => println!(),
    }
}

async fn analyze(cfg: &Config, client: &CoinGeckoClient, query: &str, json: bool) -> Result<()> {
    let report = scanner::analyze_token(client, query, cfg.chart_days).await?;
    let position_usd = position_size(cfg.balance_usd, report.analysis.score, cfg.risk_tolerance);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report, position_usd);
    }

    journal::record_analysis(cfg, &report, position_usd)?;
    Ok(())
}

async fn markets(cfg: &Config, client: &CoinGeckoClient, limit: Option<u32>) -> Result<()> {
    for m in client.coin_markets(limit.unwrap_or(cfg.markets_limit), 1).await {
        println!(
            "{:>4}  {:<12} {:>14}  {:>10}  {}",
            m.market_cap_rank.map(|r| r.to_string()).unwrap_or_default(),
            m.symbol.to_uppercase(),
            format!("${}", m.current_price.unwrap_or(0.0)),
            format_usd_compact(m.market_cap.unwrap_or(0.0)),
            format_percentage(m.price_change_percentage_24h.unwrap_or(0.0)),
        );
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load local .env if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let mut cfg = Config::from_env()?;
    cfg.use_mock |= cli.mock;

    logger::init_tracing(cfg.log_json);
    info!(?cfg, "boot");
    let client = CoinGeckoClient::new(&cfg)?;
    if client.is_offline() {
        warn!("no COINGECKO_API_KEY or mock mode on: serving fixture data");
    }

    match cli.command {
        Command::Analyze { query, json } => analyze(&cfg, &client, &query, json).await,
        Command::Markets { limit } => markets(&cfg, &client, limit).await,
        Command::Watch => scanner::run(cfg).await,
    }
}
