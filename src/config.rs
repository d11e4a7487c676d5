use anyhow::Result;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::domain::{ScenarioConfig, ScenarioMode};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub battery: BatteryConfig,
    pub pv: PvConfig,
    pub market: MarketConfig,
    pub solver: SolverConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatteryConfig {
    pub power_limit_mw: f64,
    pub capacity_mwh: f64,
    pub starting_soc_percent: f64,
    pub allow_grid_charging: bool,
    pub throughput_cost_eur_per_mwh: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PvConfig {
    pub capacity_mw: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketConfig {
    pub average_bid_ask_spread_eur_mwh: f64,
    pub period_minutes: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolverConfig {
    pub time_limit_seconds: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            battery: BatteryConfig {
                power_limit_mw: 0.1,
                capacity_mwh: 1.0,
                starting_soc_percent: 10.0,
                allow_grid_charging: true,
                throughput_cost_eur_per_mwh: 5.0,
            },
            pv: PvConfig { capacity_mw: 1.0 },
            market: MarketConfig {
                average_bid_ask_spread_eur_mwh: 1.0,
                period_minutes: 15,
            },
            solver: SolverConfig {
                time_limit_seconds: 30,
            },
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let figment = Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file("config/default.toml"))
            .merge(Env::prefixed("COLO__").split("__"));
        Ok(figment.extract()?)
    }

    /// The base scenario the comparator derives its variants from.
    pub fn scenario(&self) -> ScenarioConfig {
        ScenarioConfig {
            battery_power_limit_mw: self.battery.power_limit_mw,
            battery_capacity_mwh: self.battery.capacity_mwh,
            pv_capacity_mw: self.pv.capacity_mw,
            starting_soc_fraction: self.battery.starting_soc_percent,
            allow_grid_charging: self.battery.allow_grid_charging,
            throughput_cost_eur_per_mwh: self.battery.throughput_cost_eur_per_mwh,
            scenario_mode: ScenarioMode::Colocation,
        }
    }
}
