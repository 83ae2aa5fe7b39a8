//! The core module
pub mod estimators;

use crate::config::Config;
use crate::core::estimators::SimpsonEstimators;
use crate::error::IntegrandError;
use serde::{Deserialize, Serialize};
use std::ops::Range;
use std::time::Duration;

/// Integrand trait
///
/// The integrand is shared read-only by all workers of a parallel integration, hence the
/// `Send + Sync` bound. It may be called any number of times, in any order.
///
/// Every closure `Fn(&[T]) -> T` is an integrand. Integrands that can fail are wrapped in
/// [`Fallible`].
pub trait Integrand<T>: Send + Sync {
    /// Evaluates the integrand at the point `x`, which has one coordinate per dimension.
    fn call(&self, x: &[T]) -> Result<T, IntegrandError>;
}

impl<T, F> Integrand<T> for F
where
    F: Fn(&[T]) -> T + Send + Sync,
{
    fn call(&self, x: &[T]) -> Result<T, IntegrandError> {
        Ok(self(x))
    }
}

/// Adapter for integrands that report failures instead of returning a value.
///
/// The first failure aborts the integration and is returned to the caller.
pub struct Fallible<F>(pub F);

impl<T, F> Integrand<T> for Fallible<F>
where
    F: Fn(&[T]) -> Result<T, IntegrandError> + Send + Sync,
{
    fn call(&self, x: &[T]) -> Result<T, IntegrandError> {
        (self.0)(x)
    }
}

/// The outcome of an integration.
///
/// Besides the value of the integral it records how it was obtained, so that runs with
/// different strategies can be compared with each other.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Estimate<T> {
    value: T,
    estimators: SimpsonEstimators<T>,
    config: Config,
    elapsed: Duration,
}

impl<T: Copy> Estimate<T> {
    /// Constructor
    pub(crate) fn new(
        value: T,
        estimators: SimpsonEstimators<T>,
        config: Config,
        elapsed: Duration,
    ) -> Self {
        Self {
            value,
            estimators,
            config,
            elapsed,
        }
    }

    /// Returns the estimate of the integral.
    pub fn value(&self) -> T {
        self.value
    }

    /// Returns the accumulated, unscaled sum together with the call counters.
    pub fn estimators(&self) -> &SimpsonEstimators<T> {
        &self.estimators
    }

    /// Returns the configuration the integral was computed with.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the wall-clock time spent in the reduction.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Destructure the estimate and return its components.
    pub fn destructure(self) -> (T, SimpsonEstimators<T>, Config, Duration) {
        (self.value, self.estimators, self.config, self.elapsed)
    }
}

/// Compute the number of cells on a given core, given the total number of cores
/// `n_cores`, the index `core` (zero-based) of the current thread as well as the
/// total number of cells `total_cells` to integrate combined on all cores.
pub(crate) fn compute_cells_for_core(core: usize, n_cores: usize, total_cells: usize) -> usize {
    // make sure passed data is valid
    debug_assert!(core < n_cores);

    let cells_per_core = cells_per_core(n_cores, total_cells);
    let start = (core * cells_per_core).min(total_cells);

    // the last cores might get fewer cells than the others, or none at all
    (start + cells_per_core).min(total_cells) - start
}

/// The contiguous range of cell indices integrated by `core`.
pub(crate) fn cell_range_for_core(core: usize, n_cores: usize, total_cells: usize) -> Range<usize> {
    let start = (core * cells_per_core(n_cores, total_cells)).min(total_cells);
    start..start + compute_cells_for_core(core, n_cores, total_cells)
}

fn cells_per_core(n_cores: usize, total_cells: usize) -> usize {
    // ceiling division without going through floating point
    total_cells / n_cores + usize::from(total_cells % n_cores != 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cells_per_core_simple() {
        let n_cores = 3;
        let total_cells = 17;
        let cells_per_core = (0..n_cores)
            .map(|core| compute_cells_for_core(core, n_cores, total_cells))
            .collect::<Vec<_>>();

        assert_eq!(cells_per_core, vec![6, 6, 5]);
        assert_eq!(total_cells, cells_per_core.into_iter().sum::<usize>());
    }

    #[test]
    fn test_cells_per_core() {
        let n_cores = 13;
        let total_cells = 16490248407;
        let total_cells_check: usize = (0..n_cores)
            .map(|core| compute_cells_for_core(core, n_cores, total_cells))
            .sum();
        assert_eq!(total_cells, total_cells_check);
    }

    #[test]
    fn test_more_cores_than_cells() {
        let ranges = (0..4)
            .map(|core| cell_range_for_core(core, 4, 2))
            .collect::<Vec<_>>();

        assert_eq!(ranges, vec![0..1, 1..2, 2..2, 2..2]);
    }

    #[test]
    fn test_ranges_are_contiguous() {
        let n_cores = 7;
        let total_cells = 100;
        let mut next = 0;

        for core in 0..n_cores {
            let range = cell_range_for_core(core, n_cores, total_cells);
            assert_eq!(range.start, next);
            next = range.end;
        }

        assert_eq!(next, total_cells);
    }

    #[test]
    fn test_closure_is_integrand() {
        let square = |x: &[f64]| x[0] * x[0];
        assert_eq!(Integrand::<f64>::call(&square, &[3.0]), Ok(9.0));

        let checked = Fallible(|x: &[f64]| {
            if x[0] < 0.0 {
                Err(IntegrandError::new("negative"))
            } else {
                Ok(x[0].sqrt())
            }
        });
        assert_eq!(Integrand::<f64>::call(&checked, &[4.0]), Ok(2.0));
        assert_eq!(
            Integrand::<f64>::call(&checked, &[-1.0]),
            Err(IntegrandError::new("negative"))
        );
    }
}
