//! End-to-end solves against the real CBC backend: the concrete arbitrage
//! scenarios, the solved-schedule invariants, and the absolute-value
//! linearization behavior.

use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{Duration, TimeZone, Utc};
use colocation_optimizer::{
    build_model, CbcSolver, MarketRow, MarketSeries, ScenarioComparator, ScenarioConfig,
    ScenarioMode, SolveStatus, SolveStrategy,
};

const TOL: f64 = 1e-6;

fn quarter_hour_series(prices: &[f64], capacity_factors: &[f64]) -> Arc<MarketSeries> {
    assert_eq!(prices.len(), capacity_factors.len());
    let base = Utc.with_ymd_and_hms(2025, 1, 15, 12, 0, 0).unwrap();
    let rows = prices
        .iter()
        .zip(capacity_factors)
        .enumerate()
        .map(|(i, (&price, &cf))| MarketRow {
            start: base + Duration::minutes(15 * i as i64),
            day_ahead_price_eur_mwh: price,
            pv_capacity_factor: cf,
        })
        .collect();
    Arc::new(MarketSeries::from_rows(rows, Duration::minutes(15)).unwrap())
}

fn arbitrage_config() -> ScenarioConfig {
    ScenarioConfig {
        battery_power_limit_mw: 1.0,
        battery_capacity_mwh: 1.0,
        pv_capacity_mw: 1.0,
        starting_soc_fraction: 0.0,
        allow_grid_charging: true,
        throughput_cost_eur_per_mwh: 0.0,
        scenario_mode: ScenarioMode::Colocation,
    }
}

fn comparator() -> ScenarioComparator {
    ScenarioComparator::new(Arc::new(CbcSolver::default()))
}

/// Independent check for the arbitrage scenarios: a state-space sweep over
/// the same bounded cumulative-sum problem, on a 0.25 MWh SOC grid (exact
/// for a 1 MW limit at 15-minute resolution).
fn max_arbitrage_profit(prices: &[f64]) -> f64 {
    const SOC_STATES: usize = 5; // 0, 0.25, .., 1.0 MWh
    let mut best = vec![f64::NEG_INFINITY; SOC_STATES];
    best[0] = 0.0;
    for &price in prices {
        let mut next = vec![f64::NEG_INFINITY; SOC_STATES];
        for (soc, &value) in best.iter().enumerate() {
            if !value.is_finite() {
                continue;
            }
            for delta in -1i64..=1 {
                let target = soc as i64 + delta;
                if !(0..SOC_STATES as i64).contains(&target) {
                    continue;
                }
                let profit = value - price * 0.25 * delta as f64;
                if profit > next[target as usize] {
                    next[target as usize] = profit;
                }
            }
        }
        best = next;
    }
    best.into_iter().fold(f64::NEG_INFINITY, f64::max)
}

#[tokio::test]
async fn scenario_a_captures_the_full_arbitrage_value() {
    let prices = [10.0, 50.0, 10.0, 50.0];
    let series = quarter_hour_series(&prices, &[0.0; 4]);
    let output = comparator()
        .run_scenario(&series, arbitrage_config())
        .await
        .unwrap();

    let expected = max_arbitrage_profit(&prices);
    assert!((expected - 20.0).abs() < TOL, "reference sweep disagrees");
    assert!(
        (output.objective_value_eur - expected).abs() < TOL,
        "objective {} != expected {expected}",
        output.objective_value_eur
    );

    // Charge at full power when cheap, discharge fully when expensive.
    for (t, &p) in output.power_mw.iter().enumerate() {
        let expected_p = if prices[t] < 30.0 { 1.0 } else { -1.0 };
        assert!((p - expected_p).abs() < TOL, "p[{t}] = {p}");
    }
}

#[tokio::test]
async fn scenario_b_prohibitive_throughput_cost_idles_the_battery() {
    let series = quarter_hour_series(&[10.0, 50.0, 10.0, 50.0], &[0.0; 4]);
    let config = ScenarioConfig {
        throughput_cost_eur_per_mwh: 1000.0,
        ..arbitrage_config()
    };
    let output = comparator().run_scenario(&series, config).await.unwrap();

    assert!(output.power_mw.iter().all(|p| p.abs() < TOL));
    assert!(output.objective_value_eur.abs() < TOL);
}

#[tokio::test]
async fn scenario_c_without_grid_charging_pv_bounds_charging() {
    let pv = [0.0, 1.0, 0.0, 1.0];
    let series = quarter_hour_series(&[10.0, 50.0, 10.0, 50.0], &pv);
    let config = ScenarioConfig {
        allow_grid_charging: false,
        ..arbitrage_config()
    };
    let output = comparator().run_scenario(&series, config).await.unwrap();

    for (t, &p) in output.power_mw.iter().enumerate() {
        assert!(p <= pv[t] + TOL, "p[{t}] = {p} exceeds pv {}", pv[t]);
        if pv[t] == 0.0 {
            assert!(p <= TOL, "battery charged without PV in period {t}");
        }
    }
}

#[tokio::test]
async fn solved_schedules_respect_soc_and_power_bounds() {
    let series = quarter_hour_series(
        &[30.0, 80.0, 5.0, 60.0, 40.0, 90.0],
        &[0.1, 0.4, 0.9, 0.8, 0.3, 0.0],
    );
    let config = ScenarioConfig {
        battery_capacity_mwh: 0.5,
        starting_soc_fraction: 40.0,
        throughput_cost_eur_per_mwh: 2.0,
        ..arbitrage_config()
    };
    let output = comparator()
        .run_scenario(&series, config.clone())
        .await
        .unwrap();

    for &soc in &output.soc_mwh {
        assert!(soc >= -TOL && soc <= config.battery_capacity_mwh + TOL, "soc {soc}");
    }
    for &p in &output.power_mw {
        assert!(p.abs() <= config.battery_power_limit_mw + TOL, "p {p}");
    }
    for (flow, (&pv, _)) in output
        .pv_to_battery_mw
        .iter()
        .zip(output.pv_mw.iter().zip(&output.power_mw))
    {
        assert!(*flow >= 0.0 && *flow <= pv.min(config.battery_power_limit_mw) + TOL);
    }

    // Alignment invariant: every sequence matches the series length.
    let n = series.len();
    assert_eq!(output.periods.len(), n);
    assert_eq!(output.power_mw.len(), n);
    assert_eq!(output.soc_mwh.len(), n);
    assert_eq!(output.cashflow_colocation_eur.len(), n);
    assert_eq!(output.cumulative_pnl_eur.len(), n);
    assert_eq!(output.prevented_slippage_eur.len(), n);
}

#[tokio::test]
async fn absolute_value_split_is_tight_at_optimality() {
    let series = quarter_hour_series(&[10.0, 50.0, 10.0, 50.0], &[0.0; 4]);
    // A positive throughput cost drives the split to the minimal sum.
    let config = ScenarioConfig {
        throughput_cost_eur_per_mwh: 1.0,
        ..arbitrage_config()
    };
    let model = build_model(&config, &series).unwrap();
    let result = CbcSolver::default().solve(model).await;
    assert_eq!(result.status, SolveStatus::Optimal);

    let assignment = result.assignment.unwrap();
    for t in 0..4 {
        let p = assignment.power_mw[t];
        let t1 = assignment.charge_split_mw[t];
        let t2 = assignment.discharge_split_mw[t];
        assert!((t1 - t2 - p).abs() < TOL, "tie violated in period {t}");
        assert!((t1 + t2 - p.abs()).abs() < TOL, "split not tight in period {t}");
        assert!(t1 >= -TOL && t2 >= -TOL);
    }
}

#[tokio::test]
async fn repeated_solves_are_deterministic() {
    let series = quarter_hour_series(
        &[30.0, 80.0, 5.0, 60.0],
        &[0.1, 0.4, 0.9, 0.8],
    );
    let config = ScenarioConfig {
        throughput_cost_eur_per_mwh: 2.0,
        ..arbitrage_config()
    };
    let comparator = comparator();
    let first = comparator
        .run_scenario(&series, config.clone())
        .await
        .unwrap();
    let second = comparator.run_scenario(&series, config).await.unwrap();
    assert!((first.objective_value_eur - second.objective_value_eur).abs() < 1e-9);
}

#[tokio::test]
async fn zero_time_limit_reports_solver_error_not_partial_results() {
    // A full day of quarter hours, so the solve cannot win the race against
    // an already-expired deadline.
    let prices: Vec<f64> = (0..96).map(|i| 30.0 + 40.0 * f64::from(i % 7)).collect();
    let series = quarter_hour_series(&prices, &vec![0.0; 96]);
    let model = build_model(&arbitrage_config(), &series).unwrap();
    let result = CbcSolver::new(StdDuration::ZERO).solve(model).await;
    assert!(matches!(result.status, SolveStatus::SolverError(_)));
    assert!(result.assignment.is_none());
}

#[tokio::test]
async fn colocation_is_worth_at_least_each_asset_alone() {
    let series = quarter_hour_series(
        &[20.0, 70.0, 10.0, 90.0, 45.0, 60.0, 15.0, 80.0],
        &[0.0, 0.2, 0.8, 1.0, 0.9, 0.5, 0.1, 0.0],
    );
    let base = ScenarioConfig {
        battery_capacity_mwh: 0.5,
        throughput_cost_eur_per_mwh: 1.0,
        ..arbitrage_config()
    };
    let report = comparator().compare(&series, &base).await;
    let colocation = report.colocation.unwrap();
    let battery_only = report.battery_only.unwrap();
    let pv_only = report.pv_only.unwrap();

    // The joint schedule can always replicate either single-asset schedule.
    assert!(colocation.final_pnl_eur() >= pv_only.final_pnl_eur() - TOL);
    assert!(colocation.final_pnl_eur() >= battery_only.final_pnl_eur() - TOL);
    assert!(battery_only.pv_mw.iter().all(|&pv| pv == 0.0));
}
