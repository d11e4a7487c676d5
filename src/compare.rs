//! Scenario Comparator
//!
//! Runs the model-build / solve / extract pipeline for the colocation and
//! battery-only variants of one configuration against the same market
//! series, evaluates the PV-only baseline in closed form, and assembles the
//! cashflow and cumulative P&L curves that let the three asset combinations
//! be compared on one time axis.

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::{
    ComparisonSummary, MarketSeries, ScenarioConfig, ScenarioMode, ScenarioOutput,
};
use crate::error::ScenarioError;
use crate::kpi;
use crate::optimizer::{
    build_model, effective_pv_mw, extract_series, validate, ExtractedSeries, SolveStrategy,
};

/// Outcome of one comparison run. Each scenario's result is independent:
/// one infeasible or failed solve never blocks or corrupts the others.
#[derive(Debug)]
pub struct ComparisonReport {
    pub colocation: Result<ScenarioOutput, ScenarioError>,
    pub battery_only: Result<ScenarioOutput, ScenarioError>,
    pub pv_only: Result<ScenarioOutput, ScenarioError>,
}

impl ComparisonReport {
    pub fn summary(&self) -> ComparisonSummary {
        ComparisonSummary {
            colocation_final_pnl_eur: self.colocation.as_ref().ok().map(ScenarioOutput::final_pnl_eur),
            battery_only_final_pnl_eur: self
                .battery_only
                .as_ref()
                .ok()
                .map(ScenarioOutput::final_pnl_eur),
            pv_only_final_pnl_eur: self.pv_only.as_ref().ok().map(ScenarioOutput::final_pnl_eur),
            prevented_slippage_total_eur: self
                .colocation
                .as_ref()
                .ok()
                .map(ScenarioOutput::total_prevented_slippage_eur),
        }
    }
}

pub struct ScenarioComparator {
    solver: Arc<dyn SolveStrategy>,
    average_bid_ask_spread_eur_mwh: f64,
}

impl ScenarioComparator {
    pub fn new(solver: Arc<dyn SolveStrategy>) -> Self {
        Self {
            solver,
            average_bid_ask_spread_eur_mwh: 1.0,
        }
    }

    pub fn with_average_bid_ask_spread(mut self, spread_eur_mwh: f64) -> Self {
        self.average_bid_ask_spread_eur_mwh = spread_eur_mwh;
        self
    }

    /// Runs colocation and battery-only concurrently against the shared
    /// series, plus the closed-form PV-only baseline.
    pub async fn compare(
        &self,
        series: &Arc<MarketSeries>,
        base: &ScenarioConfig,
    ) -> ComparisonReport {
        let (colocation, battery_only) = tokio::join!(
            self.run_scenario(series, base.with_mode(ScenarioMode::Colocation)),
            self.run_scenario(series, base.with_mode(ScenarioMode::BatteryOnly)),
        );
        let pv_only = self
            .pv_only_output(&base.with_mode(ScenarioMode::PvOnly), series);

        for (mode, outcome) in [
            (ScenarioMode::Colocation, &colocation),
            (ScenarioMode::BatteryOnly, &battery_only),
            (ScenarioMode::PvOnly, &pv_only),
        ] {
            match outcome {
                Ok(output) => info!(
                    %mode,
                    final_pnl_eur = output.final_pnl_eur(),
                    objective_value_eur = output.objective_value_eur,
                    "scenario solved"
                ),
                Err(error) => warn!(%mode, %error, "scenario failed"),
            }
        }

        ComparisonReport {
            colocation,
            battery_only,
            pv_only,
        }
    }

    /// Full pipeline for one LP-backed scenario. PV-only requests are
    /// answered in closed form without invoking the solver.
    pub async fn run_scenario(
        &self,
        series: &Arc<MarketSeries>,
        config: ScenarioConfig,
    ) -> Result<ScenarioOutput, ScenarioError> {
        if config.scenario_mode == ScenarioMode::PvOnly {
            return self.pv_only_output(&config, series);
        }
        let model = build_model(&config, series)?;
        let result = self.solver.solve(model).await;
        let extracted = extract_series(&result, &config, series)?;
        Ok(self.assemble_output(&config, series, extracted))
    }

    /// The no-battery baseline: battery power is identically zero, so the
    /// value is `sum(price * pv) / periods_per_hour` with no solve invoked.
    fn pv_only_output(
        &self,
        config: &ScenarioConfig,
        series: &MarketSeries,
    ) -> Result<ScenarioOutput, ScenarioError> {
        validate(config, series)?;
        let n = series.len();
        let extracted = ExtractedSeries {
            power_mw: vec![0.0; n],
            soc_mwh: vec![config.starting_soc_mwh(); n],
            pv_mw: effective_pv_mw(config, series),
            price_eur_mwh: series.prices().collect(),
            objective_value_eur: series
                .prices()
                .zip(effective_pv_mw(config, series))
                .map(|(price, pv)| price * pv)
                .sum::<f64>()
                / series.periods_per_hour(),
        };
        Ok(self.assemble_output(config, series, extracted))
    }

    fn assemble_output(
        &self,
        config: &ScenarioConfig,
        series: &MarketSeries,
        extracted: ExtractedSeries,
    ) -> ScenarioOutput {
        let step_h = 1.0 / series.periods_per_hour();

        let cashflow_colocation_eur: Vec<f64> = extracted
            .price_eur_mwh
            .iter()
            .zip(extracted.pv_mw.iter().zip(&extracted.power_mw))
            .map(|(price, (pv, p))| price * (pv - p) * step_h)
            .collect();
        let cashflow_pv_only_eur: Vec<f64> = extracted
            .price_eur_mwh
            .iter()
            .zip(&extracted.pv_mw)
            .map(|(price, pv)| price * pv * step_h)
            .collect();

        let pv_to_battery_mw = kpi::pv_to_battery(&extracted.power_mw, &extracted.pv_mw);
        let prevented_slippage_eur =
            kpi::prevented_slippage(self.average_bid_ask_spread_eur_mwh, &pv_to_battery_mw);

        ScenarioOutput {
            mode: config.scenario_mode,
            periods: series.periods().to_vec(),
            cumulative_pnl_eur: running_sum(&cashflow_colocation_eur),
            cumulative_pnl_pv_only_eur: running_sum(&cashflow_pv_only_eur),
            power_mw: extracted.power_mw,
            soc_mwh: extracted.soc_mwh,
            pv_mw: extracted.pv_mw,
            price_eur_mwh: extracted.price_eur_mwh,
            cashflow_colocation_eur,
            cashflow_pv_only_eur,
            pv_to_battery_mw,
            prevented_slippage_eur,
            objective_value_eur: extracted.objective_value_eur,
        }
    }
}

fn running_sum(values: &[f64]) -> Vec<f64> {
    let mut acc = 0.0;
    values
        .iter()
        .map(|v| {
            acc += v;
            acc
        })
        .collect()
}
