//! Per-cell evaluation of the tensor-product Simpson rule.
//!
//! In one dimension Simpson's rule on a cell $[a, a + h]$ reads
//!
//! $$ \int_a^{a+h} f(x) \, \mathrm{d}x \approx \frac{h}{6} \left( f(a) + 4 f(a + h/2) + f(a + h)
//! \right) . $$
//!
//! The default [`Expansion::Stencil`] does not multiply with the weights $\{1, 4, 1\}$.
//! Instead, each dimension gets a row of six values, the left endpoint, four copies of the
//! midpoint and the right endpoint, and the integrand is evaluated at every point of the
//! cartesian product of the rows. Each of the $6^d$ points then carries weight one, and the
//! multiplicities reproduce the product weights of the separable $d$-dimensional rule. The
//! factor $\prod_i h_i / 6$ is applied once, after all cells have been summed.
//!
//! [`Expansion::Weighted`] evaluates each of the $3^d$ distinct points once and multiplies with
//! the product of the explicit weights instead. Both give the same estimate up to rounding.

use crate::core::estimators::SimpsonEstimators;
use crate::core::Integrand;
use crate::error::{Error, Result};
use crate::grid::{Grid, MixedRadix};
use num_traits::{Float, FromPrimitive};
use serde::{Deserialize, Serialize};
use std::ops::AddAssign;

/// Number of entries in a stencil row.
pub const STENCIL_LEN: usize = 6;

/// Number of distinct abscissae per dimension and cell.
pub const WEIGHTED_LEN: usize = 3;

/// Multiplicity of the left endpoint, midpoint and right endpoint in a stencil row.
const SIMPSON_WEIGHTS: [u8; WEIGHTED_LEN] = [1, 4, 1];

/// How the points of a single cell are enumerated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub enum Expansion {
    /// Six stencil entries per dimension, $6^d$ integrand calls per cell.
    Stencil,
    /// Three weighted abscissae per dimension, $3^d$ integrand calls per cell.
    Weighted,
}

impl Default for Expansion {
    fn default() -> Self {
        Self::Stencil
    }
}

impl Expansion {
    /// Returns the number of entries in each row.
    pub fn row_len(self) -> usize {
        match self {
            Self::Stencil => STENCIL_LEN,
            Self::Weighted => WEIGHTED_LEN,
        }
    }

    /// Returns the number of integrand calls per cell in `dim` dimensions.
    pub fn points_per_cell(self, dim: usize) -> Result<usize> {
        self.point_radix(dim).map(|radix| radix.size())
    }

    /// Returns the number system enumerating the points of a cell in `dim` dimensions.
    fn point_radix(self, dim: usize) -> Result<MixedRadix> {
        MixedRadix::uniform(self.row_len(), dim).ok_or(Error::Overflow {
            quantity: "points per cell",
        })
    }
}

/// Reusable buffers to evaluate the integrand on the cells of a grid.
///
/// One evaluator is created per worker, so that no allocation happens per cell or per point.
pub struct CellEvaluator<'a, T> {
    grid: &'a Grid<T>,
    expansion: Expansion,
    points: MixedRadix,
    /// Row-major table with `row_len` entries for each dimension.
    rows: Vec<T>,
    /// Stencil weight of each row entry, parallel to `rows`.
    weights: Vec<T>,
    coords: Vec<usize>,
    digits: Vec<usize>,
    x: Vec<T>,
}

impl<'a, T> CellEvaluator<'a, T>
where
    T: Float + FromPrimitive + AddAssign,
{
    /// Creates the buffers needed to evaluate cells of `grid` with the given `expansion`.
    pub fn new(grid: &'a Grid<T>, expansion: Expansion) -> Result<Self> {
        let dim = grid.dim();
        let row_len = expansion.row_len();
        let points = expansion.point_radix(dim)?;

        let row_weights = match expansion {
            Expansion::Stencil => vec![T::one(); STENCIL_LEN],
            Expansion::Weighted => SIMPSON_WEIGHTS
                .iter()
                .map(|&w| T::from_u8(w))
                .collect::<Option<Vec<_>>>()
                .ok_or(Error::Overflow {
                    quantity: "stencil weight",
                })?,
        };

        Ok(Self {
            grid,
            expansion,
            points,
            rows: vec![T::zero(); dim * row_len],
            weights: row_weights.repeat(dim),
            coords: vec![0; dim],
            digits: vec![0; dim],
            x: vec![T::zero(); dim],
        })
    }

    /// Returns the rows built for the last cell, one slice per dimension.
    pub fn rows(&self) -> impl Iterator<Item = &[T]> {
        self.rows.chunks(self.expansion.row_len())
    }

    /// Fills the rows with the abscissae of the cell with linear index `cell`.
    pub fn build_rows(&mut self, cell: usize) -> Result<()> {
        let two = T::from_u8(2).ok_or(Error::Overflow {
            quantity: "stencil midpoint",
        })?;
        let row_len = self.expansion.row_len();

        self.grid.decode_into(cell, &mut self.coords);

        for (dim, row) in self.rows.chunks_mut(row_len).enumerate() {
            let h = self.grid.widths()[dim];
            let origin = self.grid.cell_origin(dim, self.coords[dim])?;
            let mid = origin + h / two;

            // left endpoint, midpoint(s), right endpoint
            row[0] = origin;
            row[1..row_len - 1].iter_mut().for_each(|x| *x = mid);
            row[row_len - 1] = origin + h;
        }

        Ok(())
    }

    /// Adds the weighted integrand values of all points of the cell `cell` to `acc`.
    ///
    /// The points are enumerated by decoding an index in `[0, row_len^d)` with dimension 0
    /// first, which makes the order of the additions reproducible.
    pub fn evaluate_cell<I>(
        &mut self,
        integrand: &I,
        cell: usize,
        acc: &mut SimpsonEstimators<T>,
    ) -> Result<()>
    where
        I: Integrand<T> + ?Sized,
    {
        self.build_rows(cell)?;

        let row_len = self.expansion.row_len();

        for point in 0..self.points.size() {
            self.points.decode_into(point, &mut self.digits);

            let mut weight = T::one();
            for (dim, &digit) in self.digits.iter().enumerate() {
                self.x[dim] = self.rows[dim * row_len + digit];
                weight = weight * self.weights[dim * row_len + digit];
            }

            acc.update(integrand.call(&self.x)?, weight);
        }

        acc.finish_cell();

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_stencil_rows() {
        let grid = Grid::new(&[(4.0, 10.0), (1.0, 2.0)], &[3, 2]).unwrap();
        let mut evaluator = CellEvaluator::new(&grid, Expansion::Stencil).unwrap();

        // cell (2, 1)
        evaluator.build_rows(5).unwrap();
        let rows = evaluator.rows().collect::<Vec<_>>();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], &[8.0, 9.0, 9.0, 9.0, 9.0, 10.0]);
        assert_eq!(rows[1], &[1.5, 1.75, 1.75, 1.75, 1.75, 2.0]);
    }

    #[test]
    fn test_weighted_rows() {
        let grid = Grid::new(&[(0.0, 1.0)], &[4]).unwrap();
        let mut evaluator = CellEvaluator::new(&grid, Expansion::Weighted).unwrap();

        evaluator.build_rows(1).unwrap();
        let rows = evaluator.rows().collect::<Vec<_>>();

        assert_eq!(rows, vec![&[0.25, 0.375, 0.5][..]]);
    }

    #[test]
    fn test_points_per_cell() {
        assert_eq!(Expansion::Stencil.points_per_cell(3), Ok(216));
        assert_eq!(Expansion::Weighted.points_per_cell(3), Ok(27));
        assert_eq!(
            Expansion::Stencil.points_per_cell(100),
            Err(Error::Overflow {
                quantity: "points per cell"
            })
        );
    }

    #[test]
    fn test_evaluator_rejects_too_many_points() {
        let grid = Grid::new(&vec![(0.0, 1.0); 30], &vec![1; 30]).unwrap();

        assert_eq!(
            CellEvaluator::new(&grid, Expansion::Stencil).err(),
            Expansion::Stencil.points_per_cell(30).err()
        );
        assert!(CellEvaluator::new(&grid, Expansion::Weighted).is_ok());
    }

    #[test]
    fn test_point_order_is_dimension_zero_first() {
        let grid = Grid::new(&[(0.0, 1.0), (10.0, 11.0)], &[1, 1]).unwrap();
        let mut evaluator = CellEvaluator::new(&grid, Expansion::Weighted).unwrap();
        let visited = std::sync::Mutex::new(Vec::new());
        let record = |x: &[f64]| {
            visited.lock().unwrap().push((x[0], x[1]));
            0.0
        };

        let mut acc = SimpsonEstimators::default();
        evaluator.evaluate_cell(&record, 0, &mut acc).unwrap();

        let visited = visited.into_inner().unwrap();
        assert_eq!(visited.len(), 9);
        assert_eq!(&visited[..4], &[(0.0, 10.0), (0.5, 10.0), (1.0, 10.0), (0.0, 10.5)]);
        assert_eq!(visited[8], (1.0, 11.0));
    }

    #[test]
    fn test_single_cell_weights() {
        // one cell, the stencil sum of a constant is 6^d times the constant
        let grid = Grid::new(&[(0.0, 2.0), (0.0, 3.0)], &[1, 1]).unwrap();
        let calls = AtomicUsize::new(0);
        let one = |_: &[f64]| {
            calls.fetch_add(1, Ordering::Relaxed);
            1.0
        };

        for &(expansion, expected_calls) in &[(Expansion::Stencil, 36), (Expansion::Weighted, 9)] {
            calls.store(0, Ordering::Relaxed);
            let mut evaluator = CellEvaluator::new(&grid, expansion).unwrap();
            let mut acc = SimpsonEstimators::default();
            evaluator.evaluate_cell(&one, 0, &mut acc).unwrap();

            assert_eq!(acc.sum(), 36.0);
            assert_eq!(acc.calls(), expected_calls);
            assert_eq!(acc.cells(), 1);
            assert_eq!(calls.load(Ordering::Relaxed), expected_calls);
            assert_eq!(acc.sum() * grid.scale(), 6.0);
        }
    }
}
