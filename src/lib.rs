//! Day-ahead co-location value estimator for battery + PV assets.
//!
//! Given an aligned price/PV series and a scenario configuration, builds a
//! time-indexed LP for the battery's charge/discharge schedule, solves it
//! through an external LP capability, and compares colocation, battery-only
//! and PV-only value on one time axis.

pub mod compare;
pub mod config;
pub mod domain;
pub mod error;
pub mod kpi;
pub mod optimizer;
pub mod telemetry;

pub use compare::{ComparisonReport, ScenarioComparator};
pub use domain::{
    ComparisonSummary, MarketRow, MarketSeries, MarketSnapshot, Period, ScenarioConfig,
    ScenarioMode, ScenarioOutput,
};
pub use error::ScenarioError;
pub use optimizer::{
    build_model, extract_series, CbcSolver, ModelInstance, SolveResult, SolveStatus, SolveStrategy,
};
