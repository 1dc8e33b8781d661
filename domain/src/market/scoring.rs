//! Per-dimension accuracy scoring - partial credit, not pass/fail.
//!
//! | Kind | Rule |
//! |------|------|
//! | Binary | 1.0 on exact match, else 0.0 |
//! | Range [min, max] | `max(0, 1 - 2*|p-a|/(max-min))` |
//! | Timeline (days) | stepped: exact 1.0, <=3d 0.8, <=7d 0.6, <=14d 0.4, else 0.2 |
//! | Missing outcome | neutral 0.5 - no reward, no penalty |

use crate::market::prediction::{DimensionKind, OutcomeValue, PredictionDimension};
use std::collections::HashMap;

/// Observed outcome values, keyed by dimension name
pub type OutcomeSet = HashMap<String, OutcomeValue>;

/// Score one dimension against an optionally-observed outcome
pub fn score_dimension(dimension: &PredictionDimension, actual: Option<&OutcomeValue>) -> f64 {
    let Some(actual) = actual else {
        return 0.5;
    };

    match dimension.kind {
        DimensionKind::Binary => {
            if dimension.predicted.as_bool() == actual.as_bool() {
                1.0
            } else {
                0.0
            }
        }
        DimensionKind::Range { min, max } => {
            let span = max - min;
            if span <= 0.0 {
                // Degenerate range; fall back to exact match
                return if dimension.predicted.as_number() == actual.as_number() {
                    1.0
                } else {
                    0.0
                };
            }
            let error = (dimension.predicted.as_number() - actual.as_number()).abs();
            (1.0 - 2.0 * error / span).max(0.0)
        }
        DimensionKind::TimelineDays => {
            let diff = (dimension.predicted.as_number() - actual.as_number()).abs();
            if diff == 0.0 {
                1.0
            } else if diff <= 3.0 {
                0.8
            } else if diff <= 7.0 {
                0.6
            } else if diff <= 14.0 {
                0.4
            } else {
                0.2
            }
        }
    }
}

/// Mean accuracy over an agent's dimensions against an outcome set
pub fn aggregate_accuracy(dimensions: &[PredictionDimension], outcomes: &OutcomeSet) -> f64 {
    if dimensions.is_empty() {
        return 0.0;
    }
    let sum: f64 = dimensions
        .iter()
        .map(|d| score_dimension(d, outcomes.get(&d.name)))
        .sum();
    sum / dimensions.len() as f64
}
