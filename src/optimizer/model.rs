//! Scenario Model Builder
//!
//! Translates a `ScenarioConfig` plus an aligned `MarketSeries` into one
//! `good_lp` problem instance: signed battery power per period, the
//! state-of-charge cumulative-sum expression with its bounds, the
//! absolute-value split for the throughput penalty, and the maximize
//! objective. The instance is owned by exactly one solve and discarded
//! after result extraction.

use good_lp::{constraint, variable, Constraint, Expression, ProblemVariables, Variable};

use crate::domain::{MarketSeries, ScenarioConfig, ScenarioMode};
use crate::error::ScenarioError;

/// A built, not-yet-solved optimization problem for one scenario.
pub struct ModelInstance {
    pub(crate) variables: ProblemVariables,
    /// Signed battery power per period, MW. Positive = charging.
    pub(crate) power: Vec<Variable>,
    /// Nonnegative split of `power` used to price `|p[t]|`: charge side.
    pub(crate) charge_split: Vec<Variable>,
    /// Nonnegative split of `power`: discharge side.
    pub(crate) discharge_split: Vec<Variable>,
    pub(crate) constraints: Vec<Constraint>,
    pub(crate) objective: Expression,
    // Coefficient copies kept for evaluating the objective at the optimum.
    pub(crate) prices: Vec<f64>,
    pub(crate) pv_mw: Vec<f64>,
    pub(crate) step_h: f64,
    pub(crate) throughput_cost: f64,
    n_periods: usize,
    mode: ScenarioMode,
}

impl std::fmt::Debug for ModelInstance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelInstance")
            .field("power", &self.power)
            .field("charge_split", &self.charge_split)
            .field("discharge_split", &self.discharge_split)
            .field("prices", &self.prices)
            .field("pv_mw", &self.pv_mw)
            .field("step_h", &self.step_h)
            .field("throughput_cost", &self.throughput_cost)
            .field("n_periods", &self.n_periods)
            .field("mode", &self.mode)
            .finish_non_exhaustive()
    }
}

impl ModelInstance {
    pub fn n_periods(&self) -> usize {
        self.n_periods
    }

    pub fn mode(&self) -> ScenarioMode {
        self.mode
    }
}

/// Auxiliary variable pair linearizing `|signed|`.
///
/// The pair satisfies `positive - negative == signed` with both halves
/// nonnegative. `penalty` is `cost_coefficient * (positive + negative)`; when
/// that term is *subtracted* under a maximize sense with a nonnegative
/// coefficient, any split with `positive + negative > |signed|` is strictly
/// dominated, so at optimality the sum equals `|signed|`. The equivalence
/// breaks for negative coefficients, which is why [`split_absolute`] rejects
/// them.
#[derive(Debug)]
pub struct AbsoluteSplit {
    pub positive: Variable,
    pub negative: Variable,
    pub tie: Constraint,
    pub penalty: Expression,
}

pub fn split_absolute(
    variables: &mut ProblemVariables,
    signed: Variable,
    cost_coefficient: f64,
) -> Result<AbsoluteSplit, ScenarioError> {
    if cost_coefficient < 0.0 {
        return Err(ScenarioError::configuration(format!(
            "absolute-value linearization requires a nonnegative cost coefficient, got {cost_coefficient}"
        )));
    }
    let positive = variables.add(variable().min(0.0));
    let negative = variables.add(variable().min(0.0));
    let tie = constraint!(positive - negative == signed);
    let penalty = cost_coefficient * (positive + negative);
    Ok(AbsoluteSplit {
        positive,
        negative,
        tie,
        penalty,
    })
}

/// PV output per period in MW as seen by the given scenario. Battery-only
/// scenarios see zero PV without the shared market input ever being mutated.
pub(crate) fn effective_pv_mw(config: &ScenarioConfig, series: &MarketSeries) -> Vec<f64> {
    match config.scenario_mode {
        ScenarioMode::BatteryOnly => vec![0.0; series.len()],
        ScenarioMode::Colocation | ScenarioMode::PvOnly => series
            .snapshots()
            .iter()
            .map(|s| s.pv_capacity_factor * config.pv_capacity_mw)
            .collect(),
    }
}

pub(crate) fn validate(config: &ScenarioConfig, series: &MarketSeries) -> Result<(), ScenarioError> {
    if series.is_empty() {
        return Err(ScenarioError::DataAlignment);
    }
    if config.battery_capacity_mwh <= 0.0 {
        return Err(ScenarioError::configuration(format!(
            "battery capacity must be positive, got {} MWh",
            config.battery_capacity_mwh
        )));
    }
    if config.battery_power_limit_mw < 0.0 {
        return Err(ScenarioError::configuration(format!(
            "battery power limit must be nonnegative, got {} MW",
            config.battery_power_limit_mw
        )));
    }
    if config.throughput_cost_eur_per_mwh < 0.0 {
        return Err(ScenarioError::configuration(format!(
            "throughput cost must be nonnegative, got {} EUR/MWh",
            config.throughput_cost_eur_per_mwh
        )));
    }
    Ok(())
}

/// Builds the LP for a colocation or battery-only scenario.
///
/// PV-only is a closed-form sum, not an LP; asking for a model in that mode
/// is a configuration error.
pub fn build_model(
    config: &ScenarioConfig,
    series: &MarketSeries,
) -> Result<ModelInstance, ScenarioError> {
    validate(config, series)?;
    if config.scenario_mode == ScenarioMode::PvOnly {
        return Err(ScenarioError::configuration(
            "pv-only scenarios are evaluated in closed form; no model to build",
        ));
    }

    let n = series.len();
    let step_h = 1.0 / series.periods_per_hour();
    let pv_mw = effective_pv_mw(config, series);
    let prices: Vec<f64> = series.prices().collect();
    let limit = config.battery_power_limit_mw;

    let mut variables = ProblemVariables::new();
    let mut constraints = Vec::new();

    // p[t], bounded by the power limit. Without grid charging the upper
    // bound becomes the co-located PV output of the period instead.
    let mut power = Vec::with_capacity(n);
    for t in 0..n {
        let p = if config.allow_grid_charging {
            variables.add(variable().min(-limit).max(limit))
        } else {
            let p = variables.add(variable().min(-limit));
            constraints.push(constraint!(p <= pv_mw[t]));
            p
        };
        power.push(p);
    }

    // soc[t] is a cumulative-sum expression over p, not a free variable; its
    // bounds are the real constraints on reachable power trajectories.
    let mut soc = Expression::from(config.starting_soc_mwh());
    for t in 0..n {
        soc += power[t] * step_h;
        constraints.push(constraint!(soc.clone() >= 0.0));
        constraints.push(constraint!(soc.clone() <= config.battery_capacity_mwh));
    }

    let mut charge_split = Vec::with_capacity(n);
    let mut discharge_split = Vec::with_capacity(n);
    let mut penalty = Expression::from(0.0);
    for t in 0..n {
        let split = split_absolute(
            &mut variables,
            power[t],
            config.throughput_cost_eur_per_mwh,
        )?;
        constraints.push(split.tie);
        penalty += split.penalty;
        charge_split.push(split.positive);
        discharge_split.push(split.negative);
    }

    // Market revenue from net export, minus the throughput penalty, both in
    // EUR (power in MW scaled by the slot width in hours).
    let revenue = (0..n)
        .map(|t| (prices[t] * step_h) * (Expression::from(pv_mw[t]) - power[t]))
        .sum::<Expression>();
    let objective = revenue - step_h * penalty;

    Ok(ModelInstance {
        variables,
        power,
        charge_split,
        discharge_split,
        constraints,
        objective,
        prices,
        pv_mw,
        step_h,
        throughput_cost: config.throughput_cost_eur_per_mwh,
        n_periods: n,
        mode: config.scenario_mode,
    })
}
