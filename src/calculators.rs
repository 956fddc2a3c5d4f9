use std::collections::BTreeMap;

use crate::error::{DiagramError, Result};

/// Output for the smallest item of an unbounded batch
pub const BASE_UNIT: f64 = 10.0;

/// Lowest intensity a bounded batch produces
pub const INTENSITY_FLOOR: f64 = 65.0;

/// Highest intensity a bounded batch produces
pub const INTENSITY_CEILING: f64 = 100.0;

/// Maps a batch of raw values onto an output scale.
///
/// Every call recomputes its bounds from the batch it is given; implementations
/// hold no state between calls.
pub trait ScalarCalculator {
    fn calculate<K: Ord + Clone>(&self, batch: &[(K, f64)]) -> Result<BTreeMap<K, f64>>;
}

/// Linear, open-ended scale relative to the batch minimum.
///
/// Scaling every value by the same factor leaves the output unchanged, except
/// that values under one are raised to one first.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnboundedCalculator;

/// Linear scale clamped into `[INTENSITY_FLOOR, INTENSITY_CEILING]`
#[derive(Debug, Clone, Copy, Default)]
pub struct BoundedCalculator;

fn bounds<K>(batch: &[(K, f64)]) -> Result<(f64, f64)> {
    let mut values = batch.iter().map(|(_, value)| *value);
    let first = values.next().ok_or(DiagramError::EmptyBatch)?;
    Ok(values.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v))))
}

impl ScalarCalculator for UnboundedCalculator {
    fn calculate<K: Ord + Clone>(&self, batch: &[(K, f64)]) -> Result<BTreeMap<K, f64>> {
        let (lo, _) = bounds(batch)?;

        if batch.len() == 1 {
            return Ok(batch
                .iter()
                .map(|(key, _)| (key.clone(), BASE_UNIT))
                .collect());
        }

        // Values under one unit (empty files) scale as one unit
        let min = lo.max(1.0);
        Ok(batch
            .iter()
            .map(|(key, value)| (key.clone(), BASE_UNIT * (value.max(1.0) / min)))
            .collect())
    }
}

impl ScalarCalculator for BoundedCalculator {
    fn calculate<K: Ord + Clone>(&self, batch: &[(K, f64)]) -> Result<BTreeMap<K, f64>> {
        let (lo, hi) = bounds(batch)?;

        if hi == lo {
            return Ok(batch
                .iter()
                .map(|(key, _)| (key.clone(), INTENSITY_CEILING))
                .collect());
        }

        let span = INTENSITY_CEILING - INTENSITY_FLOOR;
        Ok(batch
            .iter()
            .map(|(key, value)| {
                let output = INTENSITY_FLOOR + (value - lo) / (hi - lo) * span;
                (key.clone(), output)
            })
            .collect())
    }
}
