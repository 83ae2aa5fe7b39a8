//! Simpson integrator
use crate::callbacks::{Callback, SinkCallback};
use crate::config::{Config, Strategy};
use crate::core::estimators::SimpsonEstimators;
use crate::core::*;
use crate::error::{Error, Result};
use crate::grid::Grid;
use crate::stencil::{CellEvaluator, Expansion};

use num_traits::{Float, FromPrimitive};
use rayon::prelude::*;
use std::ops::{AddAssign, Range};
use std::panic;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use crossbeam as cb;

/// Integrate the cells with indices in `cells`.
///
/// Stops early, with a partial sum, once `failed` is set by another core.
fn integrate_cells<T, I>(
    integrand: &I,
    grid: &Grid<T>,
    expansion: Expansion,
    cells: Range<usize>,
    failed: &AtomicBool,
) -> Result<SimpsonEstimators<T>>
where
    I: Integrand<T> + ?Sized,
    T: Float + AddAssign + FromPrimitive,
{
    let mut evaluator = CellEvaluator::new(grid, expansion)?;
    let mut estimators = SimpsonEstimators::default();

    for cell in cells {
        if failed.load(Ordering::Relaxed) {
            break;
        }

        if let Err(err) = evaluator.evaluate_cell(integrand, cell, &mut estimators) {
            failed.store(true, Ordering::Relaxed);
            return Err(err);
        }
    }

    Ok(estimators)
}

/// Walk over all cells in order on the calling thread.
fn integrate_sequentially<T, I>(
    integrand: &I,
    grid: &Grid<T>,
    expansion: Expansion,
) -> Result<SimpsonEstimators<T>>
where
    I: Integrand<T> + ?Sized,
    T: Float + AddAssign + FromPrimitive,
{
    integrate_cells(
        integrand,
        grid,
        expansion,
        0..grid.cells(),
        &AtomicBool::new(false),
    )
}

/// Integrate on `n_cores` scoped threads, each one summing a contiguous range of cells.
fn integrate_on_threads<T, I>(
    integrand: &I,
    grid: &Grid<T>,
    expansion: Expansion,
    n_cores: usize,
) -> Result<SimpsonEstimators<T>>
where
    I: Integrand<T> + ?Sized,
    T: Float + AddAssign + FromPrimitive + Send + Sync,
{
    let total_cells = grid.cells();
    // no core is left without a cell
    let n_cores = n_cores.min(total_cells);
    let failed = AtomicBool::new(false);
    let failed = &failed;

    // distribute the workload evenly across the cores
    let collect_results = cb::thread::scope(|s| {
        let mut handles = Vec::with_capacity(n_cores);

        for core in 0..n_cores {
            let cells = cell_range_for_core(core, n_cores, total_cells);

            // more cores than cells
            if cells.is_empty() {
                continue;
            }

            handles.push(s.spawn(move |_| {
                integrate_cells(integrand, grid, expansion, cells, failed)
            }));
        }

        // wait for the threads to finish; a panicking integrand panics the caller
        handles
            .into_iter()
            .map(|handle| handle.join().unwrap_or_else(|err| panic::resume_unwind(err)))
            .collect::<Vec<_>>()
    })
    .unwrap_or_else(|err| panic::resume_unwind(err));

    // accumulate the intermediate results; any failure discards all partial sums
    collect_results
        .into_iter()
        .try_fold(SimpsonEstimators::default(), |acc, result| {
            result.map(|estimators| acc + estimators)
        })
}

/// Parallel map-reduce over the cells on the `rayon` thread pool.
fn integrate_with_rayon<T, I>(
    integrand: &I,
    grid: &Grid<T>,
    expansion: Expansion,
) -> Result<SimpsonEstimators<T>>
where
    I: Integrand<T> + ?Sized,
    T: Float + AddAssign + FromPrimitive + Send + Sync,
{
    (0..grid.cells())
        .into_par_iter()
        .map_init(
            || CellEvaluator::new(grid, expansion),
            |evaluator, cell| {
                let evaluator = evaluator.as_mut().map_err(|err| err.clone())?;
                let mut estimators = SimpsonEstimators::default();
                evaluator.evaluate_cell(integrand, cell, &mut estimators)?;
                Ok(estimators)
            },
        )
        .try_reduce(SimpsonEstimators::default, |a, b| Ok(a + b))
}

/// Integrate `integrand` over the box `domain` using the composite Simpson rule with
/// `subdivisions[i]` cells along dimension `i`.
///
/// The cells are distributed as specified by the strategy in `config`; the `callback` is
/// informed once the integration has finished. All inputs are checked before the integrand is
/// called for the first time. A failing integrand aborts the integration and its error is
/// returned; a panicking integrand panics the caller.
pub fn integrate_with<T, I, C>(
    integrand: &I,
    domain: &[(T, T)],
    subdivisions: &[usize],
    config: &Config,
    callback: &C,
) -> Result<Estimate<T>>
where
    I: Integrand<T> + ?Sized,
    T: Float + AddAssign + FromPrimitive + Send + Sync,
    C: Callback<T> + ?Sized,
{
    config.validate()?;

    let grid = Grid::new(domain, subdivisions)?;
    let expansion = config.expansion();

    grid.cells()
        .checked_mul(expansion.points_per_cell(grid.dim())?)
        .ok_or(Error::Overflow {
            quantity: "integrand calls",
        })?;

    let start = Instant::now();

    let estimators = match config.strategy() {
        Strategy::Sequential => integrate_sequentially(integrand, &grid, expansion)?,
        Strategy::Threads { n_cores } => {
            integrate_on_threads(integrand, &grid, expansion, n_cores)?
        }
        Strategy::Rayon => integrate_with_rayon(integrand, &grid, expansion)?,
    };

    // normalize once, after all partial sums have been combined
    let value = estimators.sum() * grid.scale();

    let estimate = Estimate::new(value, estimators, *config, start.elapsed());
    callback.report(&estimate)?;

    Ok(estimate)
}

/// Integrate `integrand` over the box `domain` with `subdivisions[i]` cells along dimension `i`
/// and return the estimate of the integral.
///
/// If `parallel` is set the cells are distributed on one thread per logical CPU, otherwise they
/// are summed on the calling thread. See [`integrate_with`] for more control.
pub fn integrate<T, I>(
    integrand: &I,
    domain: &[(T, T)],
    subdivisions: &[usize],
    parallel: bool,
) -> Result<T>
where
    I: Integrand<T> + ?Sized,
    T: Float + AddAssign + FromPrimitive + Send + Sync,
{
    integrate_with(
        integrand,
        domain,
        subdivisions,
        &Config::from_parallel_flag(parallel),
        &SinkCallback {},
    )
    .map(|estimate| estimate.value())
}
