use serde::{Deserialize, Serialize};

use super::market::Period;
use super::scenario::ScenarioMode;

/// Everything derived from one solved scenario, index-aligned to the market
/// series it was built from. Read-only once produced; consumed by the
/// downstream visualization layer as JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioOutput {
    pub mode: ScenarioMode,
    pub periods: Vec<Period>,
    /// Signed battery power per period, MW. Positive = charging.
    pub power_mw: Vec<f64>,
    /// Stored energy at the end of each period, MWh.
    pub soc_mwh: Vec<f64>,
    /// Effective PV output per period, MW (zero in battery-only mode).
    pub pv_mw: Vec<f64>,
    pub price_eur_mwh: Vec<f64>,
    /// `price * (pv - p) / periods_per_hour` per period.
    pub cashflow_colocation_eur: Vec<f64>,
    /// `price * pv / periods_per_hour` per period, the no-battery baseline.
    pub cashflow_pv_only_eur: Vec<f64>,
    pub cumulative_pnl_eur: Vec<f64>,
    pub cumulative_pnl_pv_only_eur: Vec<f64>,
    /// PV output absorbed by battery charging rather than exported, MW.
    pub pv_to_battery_mw: Vec<f64>,
    /// Estimated trading-cost saving from internal netting, EUR per period.
    pub prevented_slippage_eur: Vec<f64>,
    /// LP objective value (or the closed-form sum for PV-only).
    pub objective_value_eur: f64,
}

impl ScenarioOutput {
    pub fn final_pnl_eur(&self) -> f64 {
        self.cumulative_pnl_eur.last().copied().unwrap_or(0.0)
    }

    pub fn total_prevented_slippage_eur(&self) -> f64 {
        self.prevented_slippage_eur.iter().sum()
    }
}

/// Scalar roll-up of a comparison run, one figure per scenario. `None` marks
/// a scenario that failed; its error is reported alongside, not here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonSummary {
    pub colocation_final_pnl_eur: Option<f64>,
    pub battery_only_final_pnl_eur: Option<f64>,
    pub pv_only_final_pnl_eur: Option<f64>,
    pub prevented_slippage_total_eur: Option<f64>,
}
