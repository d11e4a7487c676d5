//! Solver Adapter
//!
//! Hands a built `ModelInstance` to the external LP capability (CBC through
//! `good_lp`) and translates the outcome into a `SolveResult`. The adapter
//! never mutates the model's input data and never returns a partial
//! assignment: a timed-out or failed solve reports `SolverError`.

use std::time::Duration;

use async_trait::async_trait;
use good_lp::{default_solver, ResolutionError, Solution, SolverModel};
use tracing::{debug, warn};

use super::model::ModelInstance;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolveStatus {
    Optimal,
    Infeasible,
    SolverError(String),
}

/// Per-period value assignment at the optimum.
#[derive(Debug, Clone)]
pub struct SolvedAssignment {
    /// Signed battery power, MW. Positive = charging.
    pub power_mw: Vec<f64>,
    /// Charge side of the absolute-value split (`t1`).
    pub charge_split_mw: Vec<f64>,
    /// Discharge side of the absolute-value split (`t2`).
    pub discharge_split_mw: Vec<f64>,
    pub objective_value_eur: f64,
}

/// Outcome of one solve. Immutable once produced; `assignment` is present
/// exactly when the status is `Optimal`.
#[derive(Debug, Clone)]
pub struct SolveResult {
    pub status: SolveStatus,
    pub assignment: Option<SolvedAssignment>,
}

impl SolveResult {
    fn error(message: impl Into<String>) -> Self {
        Self {
            status: SolveStatus::SolverError(message.into()),
            assignment: None,
        }
    }
}

/// Strategy seam for the external solving capability, so tests and callers
/// can substitute backends without touching the pipeline.
#[async_trait]
pub trait SolveStrategy: Send + Sync {
    async fn solve(&self, model: ModelInstance) -> SolveResult;
}

/// CBC-backed solver. The blocking solve runs on a worker thread, bounded by
/// a caller-supplied time limit.
pub struct CbcSolver {
    time_limit: Duration,
}

impl CbcSolver {
    pub fn new(time_limit: Duration) -> Self {
        Self { time_limit }
    }
}

impl Default for CbcSolver {
    fn default() -> Self {
        Self {
            time_limit: Duration::from_secs(30),
        }
    }
}

#[async_trait]
impl SolveStrategy for CbcSolver {
    async fn solve(&self, model: ModelInstance) -> SolveResult {
        let n_periods = model.n_periods();
        let mode = model.mode();
        debug!(n_periods, %mode, "dispatching LP to CBC");

        let handle = tokio::task::spawn_blocking(move || solve_blocking(model));
        match tokio::time::timeout(self.time_limit, handle).await {
            Ok(Ok(result)) => result,
            Ok(Err(join_error)) => {
                warn!(%mode, %join_error, "solver worker failed");
                SolveResult::error(format!("solver worker failed: {join_error}"))
            }
            Err(_) => {
                warn!(%mode, timeout_s = self.time_limit.as_secs_f64(), "solve timed out");
                SolveResult::error(format!(
                    "solve exceeded the {:.1}s time limit",
                    self.time_limit.as_secs_f64()
                ))
            }
        }
    }
}

fn solve_blocking(model: ModelInstance) -> SolveResult {
    let mut problem = model.variables.maximise(model.objective).using(default_solver);
    for c in model.constraints {
        problem = problem.with(c);
    }

    match problem.solve() {
        Ok(solution) => {
            let power_mw: Vec<f64> = model.power.iter().map(|&v| solution.value(v)).collect();
            let charge_split_mw: Vec<f64> = model
                .charge_split
                .iter()
                .map(|&v| solution.value(v))
                .collect();
            let discharge_split_mw: Vec<f64> = model
                .discharge_split
                .iter()
                .map(|&v| solution.value(v))
                .collect();
            // Objective evaluated at the optimum: net-export revenue minus
            // the throughput penalty over the gross split.
            let objective_value_eur = model
                .prices
                .iter()
                .zip(model.pv_mw.iter().zip(power_mw.iter()))
                .map(|(price, (pv, p))| price * (pv - p) * model.step_h)
                .sum::<f64>()
                - model.throughput_cost
                    * charge_split_mw
                        .iter()
                        .zip(&discharge_split_mw)
                        .map(|(t1, t2)| (t1 + t2) * model.step_h)
                        .sum::<f64>();
            debug!(objective_value_eur, "solve optimal");
            SolveResult {
                status: SolveStatus::Optimal,
                assignment: Some(SolvedAssignment {
                    power_mw,
                    charge_split_mw,
                    discharge_split_mw,
                    objective_value_eur,
                }),
            }
        }
        Err(ResolutionError::Infeasible) => SolveResult {
            status: SolveStatus::Infeasible,
            assignment: None,
        },
        Err(other) => SolveResult::error(other.to_string()),
    }
}
