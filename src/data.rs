//! Synthetic regression data for training runs.

use rand::{rngs::StdRng, SeedableRng};
use rand_distr::{Distribution, Uniform};
use thiserror::Error;

/// Features are sampled uniformly from `[-FEATURE_RANGE, FEATURE_RANGE]`.
const FEATURE_RANGE: f64 = 0.5;

/// Errors produced when generating a dataset.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("dataset needs at least one example and one feature (got {size} x {width})")]
    Empty { size: usize, width: usize },

    #[error("feature sampling: {0}")]
    Sampling(#[from] rand_distr::uniform::Error),
}

/// Inputs and targets, one row per example.
#[derive(Clone, Debug, PartialEq)]
pub struct Dataset {
    pub xs: Vec<Vec<f64>>,
    pub ys: Vec<f64>,
}

impl Dataset {
    #[must_use]
    pub fn len(&self) -> usize {
        self.ys.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ys.is_empty()
    }
}

/// `size` examples of `width` features with target `y = 2 * mean(x)`.
///
/// With one feature this is `y = 2x`. Targets stay within `[-1, 1]`, the
/// range of a tanh output. The same seed always yields the same data.
pub fn linear(size: usize, width: usize, seed: u64) -> Result<Dataset, DataError> {
    if size == 0 || width == 0 {
        return Err(DataError::Empty { size, width });
    }
    let dist: Uniform<f64> = Uniform::new_inclusive(-FEATURE_RANGE, FEATURE_RANGE)?;
    let mut rng = StdRng::seed_from_u64(seed);
    let xs: Vec<Vec<f64>> = (0..size)
        .map(|_| (0..width).map(|_| dist.sample(&mut rng)).collect())
        .collect();
    let ys = xs
        .iter()
        .map(|x| 2.0 * x.iter().sum::<f64>() / width as f64)
        .collect();
    Ok(Dataset { xs, ys })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn single_feature_targets_are_twice_the_input() {
        let data = linear(8, 1, 3).unwrap();
        assert_eq!(data.len(), 8);
        for (x, &y) in data.xs.iter().zip(&data.ys) {
            assert!(x[0].abs() <= FEATURE_RANGE);
            assert_relative_eq!(y, 2.0 * x[0]);
        }
    }

    #[test]
    fn multi_feature_targets_are_twice_the_mean_and_within_tanh_range() {
        let data = linear(32, 3, 9).unwrap();
        assert_eq!(data.xs.len(), 32);
        for (x, &y) in data.xs.iter().zip(&data.ys) {
            assert_eq!(x.len(), 3);
            assert!(x.iter().all(|v| (-FEATURE_RANGE..=FEATURE_RANGE).contains(v)));
            assert_relative_eq!(y, 2.0 * (x[0] + x[1] + x[2]) / 3.0, epsilon = 1e-12);
            assert!((-1.0..=1.0).contains(&y));
        }
    }

    #[test]
    fn same_seed_same_data() {
        assert_eq!(linear(5, 3, 11).unwrap(), linear(5, 3, 11).unwrap());
        assert_ne!(linear(5, 3, 11).unwrap(), linear(5, 3, 12).unwrap());
    }

    #[test]
    fn empty_shapes_are_rejected() {
        assert!(matches!(linear(0, 2, 0), Err(DataError::Empty { size: 0, width: 2 })));
        assert!(matches!(linear(3, 0, 0), Err(DataError::Empty { .. })));
    }
}
