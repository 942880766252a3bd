//! Reducers for derived bootcamp statistics.
//!
//! A derived statistic lives on a parent record but is computed from its
//! children. The reduction itself is pure and lives here; reading the
//! children and persisting the result is the persistence layer's job.

use serde::{Deserialize, Serialize};

/// Granularity `averageCost` is rounded up to.
pub const COST_ROUNDING_STEP: f64 = 10.0;

/// How a set of child values collapses into one statistic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reducer {
    /// Arithmetic mean, unrounded.
    Mean,
    /// Arithmetic mean rounded up to the next multiple of [`COST_ROUNDING_STEP`].
    MeanCeilTen,
}

impl Reducer {
    /// Reduce `values` to a single statistic.
    ///
    /// Returns `None` when there are no values, which callers persist as a
    /// cleared (NULL) statistic.
    pub fn reduce(self, values: &[f64]) -> Option<f64> {
        if values.is_empty() {
            return None;
        }
        let mean = values.iter().sum::<f64>() / values.len() as f64;
        match self {
            Reducer::Mean => Some(mean),
            Reducer::MeanCeilTen => Some((mean / COST_ROUNDING_STEP).ceil() * COST_ROUNDING_STEP),
        }
    }
}

/// A derived field on the bootcamp record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StatField {
    AverageCost,
    AverageRating,
}

impl StatField {
    /// Storage column holding the statistic.
    pub fn column(self) -> &'static str {
        match self {
            StatField::AverageCost => "average_cost",
            StatField::AverageRating => "average_rating",
        }
    }

    /// Field name as it appears on the wire.
    pub fn wire_name(self) -> &'static str {
        match self {
            StatField::AverageCost => "averageCost",
            StatField::AverageRating => "averageRating",
        }
    }
}
