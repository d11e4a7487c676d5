use chrono::{DateTime, Duration, Utc};
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::error::ScenarioError;

/// One discrete market time slot, identified by its start timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    pub start: DateTime<Utc>,
}

/// Per-period market observation: day-ahead clearing price and normalized PV
/// output. Produced upstream by the time-series aligner, never mutated here.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    pub day_ahead_price_eur_mwh: f64,
    /// Fraction of installed PV capacity producing in this period, in [0, 1].
    pub pv_capacity_factor: f64,
}

/// One aligned input row as delivered by the aligner.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MarketRow {
    pub start: DateTime<Utc>,
    pub day_ahead_price_eur_mwh: f64,
    pub pv_capacity_factor: f64,
}

/// The full aligned price/PV table for one optimization run.
///
/// Invariants enforced at construction: non-empty, strictly increasing start
/// timestamps, uniform slot width. Every per-period sequence derived anywhere
/// in this crate is index-aligned to this series.
#[derive(Debug, Clone)]
pub struct MarketSeries {
    periods: Vec<Period>,
    snapshots: Vec<MarketSnapshot>,
    slot_width: Duration,
}

impl MarketSeries {
    pub fn from_rows(rows: Vec<MarketRow>, slot_width: Duration) -> Result<Self, ScenarioError> {
        if rows.is_empty() {
            return Err(ScenarioError::DataAlignment);
        }
        if slot_width <= Duration::zero() {
            return Err(ScenarioError::configuration("slot width must be positive"));
        }
        if !rows
            .iter()
            .tuple_windows()
            .all(|(a, b)| b.start - a.start == slot_width)
        {
            return Err(ScenarioError::configuration(
                "market rows are not uniformly spaced in chronological order",
            ));
        }
        for row in &rows {
            if !(0.0..=1.0).contains(&row.pv_capacity_factor) {
                return Err(ScenarioError::configuration(format!(
                    "pv capacity factor {} at {} is outside [0, 1]",
                    row.pv_capacity_factor, row.start
                )));
            }
        }

        let periods = rows.iter().map(|r| Period { start: r.start }).collect();
        let snapshots = rows
            .iter()
            .map(|r| MarketSnapshot {
                day_ahead_price_eur_mwh: r.day_ahead_price_eur_mwh,
                pv_capacity_factor: r.pv_capacity_factor,
            })
            .collect();
        Ok(Self {
            periods,
            snapshots,
            slot_width,
        })
    }

    pub fn len(&self) -> usize {
        self.periods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }

    pub fn periods(&self) -> &[Period] {
        &self.periods
    }

    pub fn snapshots(&self) -> &[MarketSnapshot] {
        &self.snapshots
    }

    pub fn prices(&self) -> impl Iterator<Item = f64> + '_ {
        self.snapshots.iter().map(|s| s.day_ahead_price_eur_mwh)
    }

    pub fn slot_width(&self) -> Duration {
        self.slot_width
    }

    /// Number of slots per hour, e.g. 4.0 for 15-minute periods.
    pub fn periods_per_hour(&self) -> f64 {
        3600.0 / self.slot_width.num_seconds() as f64
    }
}
