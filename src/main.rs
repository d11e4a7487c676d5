use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{Duration, TimeZone, Utc};
use colocation_optimizer::config::Config;
use colocation_optimizer::telemetry;
use colocation_optimizer::{CbcSolver, MarketRow, MarketSeries, ScenarioComparator};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    telemetry::init_tracing();
    let cfg = Config::load()?;

    let slot_width = Duration::minutes(cfg.market.period_minutes);
    let series = match std::env::args().nth(1) {
        Some(path) => {
            let raw = std::fs::read_to_string(&path)
                .with_context(|| format!("reading aligned series from {path}"))?;
            let rows: Vec<MarketRow> =
                serde_json::from_str(&raw).context("parsing aligned series rows")?;
            MarketSeries::from_rows(rows, slot_width)?
        }
        None => {
            info!("no input file given, using a synthetic demo day");
            demo_day(slot_width)?
        }
    };
    info!(periods = series.len(), "running scenario comparison");

    let solver = Arc::new(CbcSolver::new(std::time::Duration::from_secs(
        cfg.solver.time_limit_seconds,
    )));
    let comparator = ScenarioComparator::new(solver)
        .with_average_bid_ask_spread(cfg.market.average_bid_ask_spread_eur_mwh);
    let series = Arc::new(series);
    let report = comparator.compare(&series, &cfg.scenario()).await;

    println!("{}", serde_json::to_string_pretty(&report.summary())?);
    Ok(())
}

/// One synthetic trading day: evening-peaked prices depressed by midday
/// solar, and a daylight PV bell curve.
fn demo_day(slot_width: Duration) -> Result<MarketSeries> {
    let start = Utc.with_ymd_and_hms(2025, 1, 15, 0, 0, 0).unwrap();
    let n = (Duration::hours(24).num_seconds() / slot_width.num_seconds()) as i32;
    let rows = (0..n)
        .map(|i| {
            let hour = i as f64 * slot_width.num_seconds() as f64 / 3600.0;
            let daylight = ((hour - 7.0) / 10.0).clamp(0.0, 1.0);
            let pv_capacity_factor = (std::f64::consts::PI * daylight).sin().max(0.0);
            let day_ahead_price_eur_mwh = 55.0
                + 20.0 * ((hour - 19.0) * std::f64::consts::TAU / 24.0).cos()
                - 15.0 * pv_capacity_factor;
            MarketRow {
                start: start + slot_width * i,
                day_ahead_price_eur_mwh,
                pv_capacity_factor,
            }
        })
        .collect();
    Ok(MarketSeries::from_rows(rows, slot_width)?)
}
