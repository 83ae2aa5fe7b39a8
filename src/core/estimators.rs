//! This module contains the accumulator that collects integrand values.
use num_traits::Float;
use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign};

/// Running state of a Simpson integration: the unscaled sum of all integrand values visited so
/// far together with some bookkeeping.
///
/// Partial results computed on different cores are combined with `+`. Since the combination is
/// a plain sum, the result does not depend on how the cells were distributed, apart from
/// floating-point rounding.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SimpsonEstimators<T> {
    sum: T,
    calls: usize,
    cells: usize,
    non_finite_calls: usize,
}

impl<T: Float> Default for SimpsonEstimators<T> {
    fn default() -> Self {
        Self {
            sum: T::zero(),
            calls: 0,
            cells: 0,
            non_finite_calls: 0,
        }
    }
}

impl<T: Float> Add for SimpsonEstimators<T> {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            sum: self.sum + other.sum,
            calls: self.calls + other.calls,
            cells: self.cells + other.cells,
            non_finite_calls: self.non_finite_calls + other.non_finite_calls,
        }
    }
}

impl<T: Float + AddAssign> AddAssign for SimpsonEstimators<T> {
    fn add_assign(&mut self, other: Self) {
        self.sum += other.sum;
        self.calls += other.calls;
        self.cells += other.cells;
        self.non_finite_calls += other.non_finite_calls;
    }
}

impl<T: Float + AddAssign> SimpsonEstimators<T> {
    /// Adds the integrand `value` multiplied by its stencil `weight`.
    ///
    /// Non-finite values are added as well, so that they show up in the result, but they are
    /// also counted.
    pub(crate) fn update(&mut self, value: T, weight: T) {
        self.calls += 1;

        if !value.is_finite() {
            self.non_finite_calls += 1;
        }

        self.sum += weight * value;
    }

    /// Marks one more cell as finished.
    pub(crate) fn finish_cell(&mut self) {
        self.cells += 1;
    }
}

impl<T: Copy> SimpsonEstimators<T> {
    /// Returns the accumulated sum before it is multiplied with $\prod_i h_i / 6$.
    pub fn sum(&self) -> T {
        self.sum
    }

    /// Returns the number of times the integrand has been called.
    pub fn calls(&self) -> usize {
        self.calls
    }

    /// Returns the number of grid cells that have been integrated.
    pub fn cells(&self) -> usize {
        self.cells
    }

    /// Returns the number of times, $N_\mathrm{nf}$, the integrand has been called and its
    /// return value was non-finite.
    pub fn non_finite_calls(&self) -> usize {
        self.non_finite_calls
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update() {
        let mut estimators = SimpsonEstimators::<f64>::default();
        estimators.update(1.5, 1.0);
        estimators.update(2.0, 4.0);
        estimators.finish_cell();

        assert_eq!(estimators.sum(), 9.5);
        assert_eq!(estimators.calls(), 2);
        assert_eq!(estimators.cells(), 1);
        assert_eq!(estimators.non_finite_calls(), 0);
    }

    #[test]
    fn test_non_finite_values_are_counted() {
        let mut estimators = SimpsonEstimators::<f64>::default();
        estimators.update(f64::INFINITY, 1.0);
        estimators.update(1.0, 1.0);

        assert_eq!(estimators.calls(), 2);
        assert_eq!(estimators.non_finite_calls(), 1);
        assert!(estimators.sum().is_infinite());
    }

    #[test]
    fn test_add_and_add_assign_agree() {
        let mut e1 = SimpsonEstimators::<f64>::default();
        e1.update(1.25, 1.0);
        e1.finish_cell();
        let mut e2 = SimpsonEstimators::<f64>::default();
        e2.update(0.5, 4.0);
        e2.update(3.0, 1.0);
        e2.finish_cell();

        let sum = e1.clone() + e2.clone();
        e1 += e2;

        assert_eq!(sum, e1);
        assert_eq!(sum.sum(), 6.25);
        assert_eq!(sum.calls(), 3);
        assert_eq!(sum.cells(), 2);
    }
}
