use serde::{Deserialize, Serialize};

/// Which asset combination a scenario optimizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioMode {
    /// Battery and PV behind one connection point, jointly optimized.
    Colocation,
    /// Battery alone: the PV series is treated as zero at model build time.
    /// The shared market input is never mutated to achieve this.
    BatteryOnly,
    /// PV alone: no battery decision exists, so the value is a closed-form
    /// sum and no LP is solved.
    PvOnly,
}

impl std::fmt::Display for ScenarioMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Colocation => write!(f, "colocation"),
            Self::BatteryOnly => write!(f, "battery_only"),
            Self::PvOnly => write!(f, "pv_only"),
        }
    }
}

/// Immutable input bundle for one optimization scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioConfig {
    pub battery_power_limit_mw: f64,
    pub battery_capacity_mwh: f64,
    pub pv_capacity_mw: f64,
    /// Stored energy at the start of the horizon, as a percentage of
    /// capacity (0-100).
    pub starting_soc_fraction: f64,
    /// When false, the battery may only charge from co-located PV output,
    /// never draw from the grid.
    pub allow_grid_charging: bool,
    /// Degradation/operating penalty per MWh charged or discharged.
    pub throughput_cost_eur_per_mwh: f64,
    pub scenario_mode: ScenarioMode,
}

impl ScenarioConfig {
    /// The same configuration under a different scenario mode. Used by the
    /// comparator to derive the battery-only and PV-only variants from one
    /// base configuration.
    pub fn with_mode(&self, scenario_mode: ScenarioMode) -> Self {
        Self {
            scenario_mode,
            ..self.clone()
        }
    }

    pub fn starting_soc_mwh(&self) -> f64 {
        self.battery_capacity_mwh * self.starting_soc_fraction / 100.0
    }
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            battery_power_limit_mw: 1.0,
            battery_capacity_mwh: 2.0,
            pv_capacity_mw: 1.0,
            starting_soc_fraction: 10.0,
            allow_grid_charging: true,
            throughput_cost_eur_per_mwh: 5.0,
            scenario_mode: ScenarioMode::Colocation,
        }
    }
}
