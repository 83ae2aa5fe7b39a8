//! Decomposition of a box-shaped integration domain into a regular grid of cells.
//!
//! Cells are addressed by a single linear index in `[0, cells)`. The index is a mixed-radix
//! number whose digits are the per-dimension cell coordinates, dimension 0 being the least
//! significant digit. The same encoding, with a constant radix per dimension, enumerates the
//! points of a tensor-product stencil (see [`crate::stencil`]).

use crate::error::{Error, Result};
use num_traits::{Float, FromPrimitive};

/// A mixed-radix number system with one digit per dimension.
#[derive(Clone, Debug, PartialEq)]
pub struct MixedRadix {
    radices: Vec<usize>,
    size: usize,
}

impl MixedRadix {
    /// Creates the number system with the given `radices`. Returns `None` if the number of
    /// representable values, $\prod_i r_i$, does not fit into a `usize`.
    pub fn new(radices: Vec<usize>) -> Option<Self> {
        let size = radices
            .iter()
            .try_fold(1_usize, |acc, &r| acc.checked_mul(r))?;

        Some(Self { radices, size })
    }

    /// Creates the number system with `dim` digits that all share the same `radix`.
    pub fn uniform(radix: usize, dim: usize) -> Option<Self> {
        Self::new(vec![radix; dim])
    }

    /// Returns the radix of each digit.
    pub fn radices(&self) -> &[usize] {
        &self.radices
    }

    /// Returns the number of digits.
    pub fn len(&self) -> usize {
        self.radices.len()
    }

    /// Returns `true` if there are no digits.
    pub fn is_empty(&self) -> bool {
        self.radices.is_empty()
    }

    /// Returns how many different values can be represented, i.e. the product of the radices.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Writes the digits of `index` into `digits`, dimension 0 first.
    pub fn decode_into(&self, mut index: usize, digits: &mut [usize]) {
        debug_assert!(index < self.size);
        debug_assert_eq!(digits.len(), self.radices.len());

        for (digit, radix) in digits.iter_mut().zip(&self.radices) {
            *digit = index % radix;
            index /= radix;
        }
    }

    /// Returns the digits of `index`, dimension 0 first.
    pub fn decode(&self, index: usize) -> Vec<usize> {
        let mut digits = vec![0; self.radices.len()];
        self.decode_into(index, &mut digits);
        digits
    }

    /// Inverse of [`decode`](Self::decode).
    pub fn encode(&self, digits: &[usize]) -> usize {
        debug_assert_eq!(digits.len(), self.radices.len());

        digits
            .iter()
            .zip(&self.radices)
            .rev()
            .fold(0, |acc, (digit, radix)| acc * radix + digit)
    }
}

/// The grid of cells covering the integration domain.
#[derive(Clone, Debug)]
pub struct Grid<T> {
    lows: Vec<T>,
    widths: Vec<T>,
    radix: MixedRadix,
    scale: T,
}

impl<T> Grid<T>
where
    T: Float + FromPrimitive,
{
    /// Decomposes the box `domain`, given as one `(low, high)` pair per dimension, into
    /// `subdivisions[i]` cells along dimension `i`.
    ///
    /// All inputs are validated here, before any integrand evaluation can take place.
    pub fn new(domain: &[(T, T)], subdivisions: &[usize]) -> Result<Self> {
        if domain.len() != subdivisions.len() {
            return Err(Error::DimensionMismatch {
                domain: domain.len(),
                subdivisions: subdivisions.len(),
            });
        }

        if domain.is_empty() {
            return Err(Error::EmptyDomain);
        }

        if let Some(dim) = subdivisions.iter().position(|&n| n == 0) {
            return Err(Error::ZeroSubdivisions { dim });
        }

        // `!(low < high)` also rejects NaN bounds
        if let Some(dim) = domain
            .iter()
            .position(|&(low, high)| !(low < high) || !low.is_finite() || !high.is_finite())
        {
            return Err(Error::InvalidBounds { dim });
        }

        let radix =
            MixedRadix::new(subdivisions.to_vec()).ok_or(Error::Overflow { quantity: "cells" })?;

        let six = T::from_u8(6).ok_or(Error::Overflow {
            quantity: "stencil normalization",
        })?;

        let widths = domain
            .iter()
            .zip(subdivisions)
            .map(|(&(low, high), &n)| {
                T::from_usize(n)
                    .map(|cells| (high - low) / cells)
                    .ok_or(Error::Overflow {
                        quantity: "subdivision count",
                    })
            })
            .collect::<Result<Vec<_>>>()?;

        let scale = widths.iter().fold(T::one(), |acc, &h| acc * (h / six));

        Ok(Self {
            lows: domain.iter().map(|&(low, _)| low).collect(),
            widths,
            radix,
            scale,
        })
    }

    /// Returns the number of dimensions.
    pub fn dim(&self) -> usize {
        self.widths.len()
    }

    /// Returns the width $h_i$ of the cells in each dimension.
    pub fn widths(&self) -> &[T] {
        &self.widths
    }

    /// Returns the number of cells in each dimension.
    pub fn subdivisions(&self) -> &[usize] {
        self.radix.radices()
    }

    /// Returns the total number of cells, $\prod_i n_i$.
    pub fn cells(&self) -> usize {
        self.radix.size()
    }

    /// Returns the per-dimension coordinates of the cell with linear index `index`.
    pub fn decode(&self, index: usize) -> Vec<usize> {
        self.radix.decode(index)
    }

    /// Allocation-free version of [`decode`](Self::decode).
    pub fn decode_into(&self, index: usize, coords: &mut [usize]) {
        self.radix.decode_into(index, coords);
    }

    /// Returns the left endpoint, $a_i + c \, h_i$, of cell `coord` along dimension `dim`.
    pub fn cell_origin(&self, dim: usize, coord: usize) -> Result<T> {
        debug_assert!(coord < self.subdivisions()[dim]);

        T::from_usize(coord)
            .map(|c| self.lows[dim] + c * self.widths[dim])
            .ok_or(Error::Overflow {
                quantity: "cell coordinate",
            })
    }

    /// Returns the factor $\prod_i h_i / 6$ that turns the accumulated stencil sum into the
    /// integral.
    pub fn scale(&self) -> T {
        self.scale
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mixed_radix_decode() {
        let radix = MixedRadix::new(vec![3, 2, 4]).unwrap();
        assert_eq!(radix.size(), 24);
        assert_eq!(radix.decode(0), vec![0, 0, 0]);
        assert_eq!(radix.decode(1), vec![1, 0, 0]);
        assert_eq!(radix.decode(3), vec![0, 1, 0]);
        assert_eq!(radix.decode(6), vec![0, 0, 1]);
        assert_eq!(radix.decode(23), vec![2, 1, 3]);
    }

    #[test]
    fn test_mixed_radix_encode_inverts_decode() {
        let radix = MixedRadix::new(vec![5, 1, 3, 2]).unwrap();
        for index in 0..radix.size() {
            assert_eq!(radix.encode(&radix.decode(index)), index);
        }
    }

    #[test]
    fn test_mixed_radix_overflow() {
        assert!(MixedRadix::new(vec![usize::MAX, 2]).is_none());
        assert!(MixedRadix::uniform(6, 64).is_none());
        assert_eq!(MixedRadix::uniform(6, 3).unwrap().size(), 216);
    }

    #[test]
    fn test_grid_widths_and_origins() {
        let grid = Grid::new(&[(4.0, 10.0), (1.0, 2.0)], &[3, 4]).unwrap();

        assert_eq!(grid.dim(), 2);
        assert_eq!(grid.cells(), 12);
        assert_eq!(grid.subdivisions(), &[3, 4]);
        assert_eq!(grid.widths(), &[2.0, 0.25]);
        assert_eq!(grid.cell_origin(0, 2), Ok(8.0));
        assert_eq!(grid.cell_origin(1, 3), Ok(1.75));
        assert_eq!(grid.decode(7), vec![1, 2]);
        assert_eq!(grid.scale(), 2.0 / 6.0 * (0.25 / 6.0));
    }

    #[test]
    fn test_grid_rejects_malformed_input() {
        assert_eq!(
            Grid::<f64>::new(&[], &[]).unwrap_err(),
            Error::EmptyDomain
        );
        assert_eq!(
            Grid::new(&[(0.0, 1.0)], &[1, 2]).unwrap_err(),
            Error::DimensionMismatch {
                domain: 1,
                subdivisions: 2
            }
        );
        assert_eq!(
            Grid::new(&[(0.0, 1.0), (0.0, 1.0)], &[2, 0]).unwrap_err(),
            Error::ZeroSubdivisions { dim: 1 }
        );
        assert_eq!(
            Grid::new(&[(0.0, 1.0), (2.0, 2.0)], &[2, 2]).unwrap_err(),
            Error::InvalidBounds { dim: 1 }
        );
        assert_eq!(
            Grid::new(&[(1.0, 0.0)], &[2]).unwrap_err(),
            Error::InvalidBounds { dim: 0 }
        );
        assert_eq!(
            Grid::new(&[(f64::NAN, 1.0)], &[2]).unwrap_err(),
            Error::InvalidBounds { dim: 0 }
        );
        assert_eq!(
            Grid::new(&[(0.0, f64::INFINITY)], &[2]).unwrap_err(),
            Error::InvalidBounds { dim: 0 }
        );
    }

    #[test]
    fn test_grid_rejects_cell_overflow() {
        assert_eq!(
            Grid::new(&[(0.0, 1.0), (0.0, 1.0)], &[usize::MAX, 3]).unwrap_err(),
            Error::Overflow { quantity: "cells" }
        );
    }
}
