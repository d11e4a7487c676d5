//! Result Extractor
//!
//! Reads a solved assignment back into per-period sequences, in the exact
//! chronological order of the originating market series. No re-sorting or
//! de-duplication happens here; ordering is the aligner's contract,
//! validated at `MarketSeries` construction.

use crate::domain::{MarketSeries, ScenarioConfig};
use crate::error::ScenarioError;

use super::model::effective_pv_mw;
use super::solver::{SolveResult, SolveStatus};

/// Raw per-period sequences for one solved scenario, index-aligned to the
/// market series.
#[derive(Debug, Clone)]
pub struct ExtractedSeries {
    pub power_mw: Vec<f64>,
    pub soc_mwh: Vec<f64>,
    pub pv_mw: Vec<f64>,
    pub price_eur_mwh: Vec<f64>,
    pub objective_value_eur: f64,
}

pub fn extract_series(
    result: &SolveResult,
    config: &ScenarioConfig,
    series: &MarketSeries,
) -> Result<ExtractedSeries, ScenarioError> {
    let assignment = match &result.status {
        SolveStatus::Optimal => result.assignment.as_ref().ok_or_else(|| {
            ScenarioError::SolverUnavailable("optimal status without an assignment".into())
        })?,
        SolveStatus::Infeasible => return Err(ScenarioError::Infeasible),
        SolveStatus::SolverError(message) => {
            return Err(ScenarioError::SolverUnavailable(message.clone()))
        }
    };
    if assignment.power_mw.len() != series.len() {
        return Err(ScenarioError::SolverUnavailable(format!(
            "assignment has {} periods, series has {}",
            assignment.power_mw.len(),
            series.len()
        )));
    }

    // SOC mirrors the model's cumulative-sum expression over the solved
    // power values.
    let step_h = 1.0 / series.periods_per_hour();
    let mut level = config.starting_soc_mwh();
    let soc_mwh = assignment
        .power_mw
        .iter()
        .map(|p| {
            level += p * step_h;
            level
        })
        .collect();

    Ok(ExtractedSeries {
        power_mw: assignment.power_mw.clone(),
        soc_mwh,
        pv_mw: effective_pv_mw(config, series),
        price_eur_mwh: series.prices().collect(),
        objective_value_eur: assignment.objective_value_eur,
    })
}
