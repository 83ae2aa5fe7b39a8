#![warn(clippy::all, clippy::cargo, clippy::nursery, clippy::pedantic)]
#![warn(missing_docs)]

//! The crate `simpsonir` provides a [composite Simpson] cubature routine, which computes definite
//! integrals of scalar functions over axis-aligned boxes of arbitrary dimension. The same
//! integral can be computed sequentially or in parallel, which makes the crate suitable to
//! benchmark different reduction strategies against each other.
//!
//! # Features
//!
//! - **Generic numeric type**. The numeric type used in this library is not fixed, but instead a
//! generic parameter, so that the integration routines can be used with either `f32`, `f64`, or a
//! custom numeric type that implements the `Float` trait from the `num-traits` crate.
//! - **Interchangeable reduction strategies**. The cells of the grid can be summed on the calling
//! thread, on a fixed number of scoped threads that each get a contiguous range of cells, or with
//! a work-stealing map-reduce on the `rayon` thread pool. The result does not depend on the
//! chosen strategy, apart from floating-point rounding.
//! - **Fail fast**. Malformed domains are rejected before the integrand is called for the first
//! time, and an integrand that fails aborts the whole integration instead of silently
//! contributing a default value.
//! - **Callbacks**. Every finished integration can be reported, for example printed together with
//! its run time, or written to a JSON file for later comparison.
//!
//! # How do I get started?
//!
//! ```
//! use simpsonir::integrate;
//!
//! let f = |x: &[f64]| x[0] * x[0] - 2.0 * x[1];
//! let value = integrate(&f, &[(4.0, 10.0), (1.0, 2.0)], &[3, 3], true).unwrap();
//!
//! assert!((value - 294.0).abs() < 1e-9);
//! ```
//!
//! # What is ...?
//!
//! Given the box $[a_1, b_1] \times \cdots \times [a_d, b_d]$ and the number of *subdivisions*
//! $n_i$ per dimension, every axis is split into $n_i$ *cells* of width $h_i = (b_i - a_i) / n_i$.
//! On every cell the one-dimensional Simpson rule
//!
//! $$ \int_a^{a+h} f(x) \, \mathrm{d}x \approx \frac{h}{6} \left( f(a) + 4 f(a + h/2) + f(a + h)
//! \right) $$
//!
//! is applied along each dimension, which gives the tensor-product rule. We use the following
//! terms:
//!
//! - the number of *calls* is the number of times the integrand is evaluated, which is
//! $6^d \prod_i n_i$ for the default stencil expansion;
//! - the *integrand* is the function, $f(x_1, x_2, \ldots, x_d)$, that is being integrated,
//! - the number of *dimensions*, $d$, is number of dimensions of the integration domain,
//! - the *stencil* of a cell is the set of points the integrand is evaluated at.
//!
//! The rule is exact for polynomials of degree three or less in each variable.
//!
//! [composite Simpson]: https://en.wikipedia.org/wiki/Simpson%27s_rule

pub mod callbacks;
pub mod config;
pub mod core;
pub mod error;
pub mod grid;
pub mod integrators;
pub mod stencil;

pub use crate::config::{Config, Strategy};
pub use crate::core::estimators::SimpsonEstimators;
pub use crate::core::{Estimate, Fallible, Integrand};
pub use crate::error::{Error, IntegrandError, Result};
pub use crate::integrators::simpson::{integrate, integrate_with};
pub use crate::stencil::Expansion;
