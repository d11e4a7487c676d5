use thiserror::Error;

/// Per-scenario failure taxonomy.
///
/// Every variant is fatal for the scenario it occurred in and only for that
/// scenario: the comparator reports each scenario's outcome independently.
#[derive(Debug, Clone, Error)]
pub enum ScenarioError {
    #[error("invalid scenario configuration: {0}")]
    Configuration(String),

    #[error("model is infeasible: no charge/discharge trajectory satisfies the constraints")]
    Infeasible,

    #[error("solver unavailable: {0}")]
    SolverUnavailable(String),

    #[error("price and PV series share no overlapping periods")]
    DataAlignment,
}

impl ScenarioError {
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }
}
