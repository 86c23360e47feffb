//! Trend segmentation of a numeric series.
//!
//! For a series `a` of length `n`, the trend has `n - 1` entries, one per
//! consecutive pair. `trend[i]` is the direction of the step `a[i] -> a[i+1]`.
//! Flat steps carry the previous direction, so a reversal is recorded only
//! at the first differing sample after a flat run.
//!
//! The first non-zero difference seeds `trend[0]`, and any leading flat
//! steps then carry that direction forward. Leading flats therefore take the
//! direction that follows them, since nothing precedes them.

use crate::domain::error::TradeTreeError;
use crate::domain::tick::MIN_TICKS;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Rising,
    Falling,
}

impl Direction {
    fn from_step(step: f64) -> Option<Self> {
        if step > 0.0 {
            Some(Direction::Rising)
        } else if step < 0.0 {
            Some(Direction::Falling)
        } else {
            None
        }
    }

    pub fn sign(self) -> i8 {
        match self {
            Direction::Rising => 1,
            Direction::Falling => -1,
        }
    }

    pub fn reversed(self) -> Self {
        match self {
            Direction::Rising => Direction::Falling,
            Direction::Falling => Direction::Rising,
        }
    }
}

pub fn find_trend(values: &[f64]) -> Result<Vec<Direction>, TradeTreeError> {
    if values.len() < MIN_TICKS {
        return Err(TradeTreeError::InsufficientData {
            len: values.len(),
            minimum: MIN_TICKS,
        });
    }

    let steps: Vec<f64> = values.windows(2).map(|w| w[1] - w[0]).collect();

    let seed = steps
        .iter()
        .find_map(|&d| Direction::from_step(d))
        .ok_or_else(|| TradeTreeError::Data {
            reason: format!("series of {} values never changes", values.len()),
        })?;

    let mut trend = Vec::with_capacity(steps.len());
    trend.push(seed);
    for &step in &steps[1..] {
        let prev = trend[trend.len() - 1];
        let next = match Direction::from_step(step) {
            None => prev,
            Some(dir) if dir == prev => prev,
            Some(_) => prev.reversed(),
        };
        trend.push(next);
    }

    Ok(trend)
}

/// `+1`/`-1` view of a trend.
pub fn signs(trend: &[Direction]) -> Vec<i8> {
    trend.iter().map(|d| d.sign()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_series() {
        let a = [
            0.056937, 0.056935, 0.056935, 0.056935, 0.056935, 0.056939, 0.056953, 0.056957,
        ];
        let trend = find_trend(&a).unwrap();
        assert_eq!(signs(&trend), vec![-1, -1, -1, -1, 1, 1, 1]);
    }

    #[test]
    fn alternating_series() {
        let trend = find_trend(&[11.0, 13.0, 10.0, 15.0, 9.0]).unwrap();
        assert_eq!(signs(&trend), vec![1, -1, 1, -1]);
    }

    #[test]
    fn flat_run_inherits_preceding_direction() {
        let trend = find_trend(&[1.0, 2.0, 2.0, 2.0, 1.0]).unwrap();
        assert_eq!(signs(&trend), vec![1, 1, 1, -1]);
    }

    #[test]
    fn leading_flats_take_first_direction() {
        let trend = find_trend(&[3.0, 3.0, 3.0, 2.0, 4.0]).unwrap();
        assert_eq!(signs(&trend), vec![-1, -1, -1, 1]);
    }

    #[test]
    fn two_values() {
        assert_eq!(signs(&find_trend(&[1.0, 2.0]).unwrap()), vec![1]);
        assert_eq!(signs(&find_trend(&[2.0, 1.0]).unwrap()), vec![-1]);
    }

    #[test]
    fn constant_series_is_data_error() {
        let err = find_trend(&[5.0, 5.0, 5.0]).unwrap_err();
        assert!(matches!(err, TradeTreeError::Data { .. }));
    }

    #[test]
    fn short_series_is_rejected() {
        assert!(matches!(
            find_trend(&[]),
            Err(TradeTreeError::InsufficientData { len: 0, minimum: 2 })
        ));
        assert!(matches!(
            find_trend(&[1.0]),
            Err(TradeTreeError::InsufficientData { len: 1, minimum: 2 })
        ));
    }

    #[test]
    fn length_is_one_less_than_input() {
        let values = [1.0, 1.5, 1.2, 1.2, 1.8, 2.0];
        assert_eq!(find_trend(&values).unwrap().len(), values.len() - 1);
    }
}
