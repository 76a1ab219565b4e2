//! Midpoint integrator
//!
//! The integral over a box is approximated by the composite midpoint rule
//!
//! $$ I \approx \prod_{i=1}^d h_i \sum_{j_1=0}^{n-1} \cdots \sum_{j_d=0}^{n-1}
//! f \left( x_{1,j_1}, \ldots, x_{d,j_d} \right) $$
//!
//! which evaluates the integrand $n^d$ times. The outermost sum is split into contiguous chunks
//! that are evaluated on different threads, each with its own coordinate buffer, and the
//! partial sums are added up at the end.
use crate::callbacks::Callback;
use crate::core::estimators::PartialSum;
use crate::core::grid::Grid;
use crate::core::*;
use crate::error::Result;

use crossbeam as cb;
use log::debug;
use num_traits::Float;
use serde::{Deserialize, Serialize};
use std::convert::TryFrom;
use std::ops::Range;
use std::panic;

/// How the axes below the outermost one are walked.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Traversal {
    /// One level of recursion per axis, weighting each axis as the recursion unwinds.
    Recursive,
    /// A single loop over a multi-index, without recursion. The stack depth does not grow with
    /// the dimension.
    Odometer,
}

impl Default for Traversal {
    fn default() -> Self {
        Self::Odometer
    }
}

/// Evaluate the nested midpoint sum over the axes `axis..grid.dim()`.
///
/// The entries of `x` before `axis` must already hold the coordinates of the outer axes.
/// On the leaf level the integrand is evaluated at `x`; on every other level the sum over the
/// midpoints of the axis is multiplied with its step size, so the value returned for `axis = 0`
/// is the full quadrature sum.
pub fn integrate_recursive<T, I>(integrand: &I, grid: &Grid<T>, x: &mut [T], axis: usize) -> T
where
    T: Float,
    I: Integrand<T> + ?Sized,
{
    if axis == grid.dim() {
        return integrand.call(x);
    }

    let mut sum = T::zero();

    for &xi in grid.midpoints(axis) {
        x[axis] = xi;
        sum = sum + integrate_recursive(integrand, grid, x, axis + 1);
    }

    sum * grid.step(axis)
}

/// Same as [`integrate_recursive`], but walks the grid with an iterative multi-index.
///
/// The innermost axis changes fastest. The sum of all leaf values is weighted once with the
/// cell volume of the axes `axis..grid.dim()`.
pub fn integrate_odometer<T, I>(integrand: &I, grid: &Grid<T>, x: &mut [T], axis: usize) -> T
where
    T: Float,
    I: Integrand<T> + ?Sized,
{
    let dim = grid.dim();

    if axis >= dim {
        return integrand.call(x);
    }

    let n = grid.steps();

    if n == 0 {
        return T::zero();
    }

    let mut index = vec![0; dim - axis];

    for a in axis..dim {
        x[a] = grid.midpoints(a)[0];
    }

    let mut sum = T::zero();

    loop {
        sum = sum + integrand.call(x);

        // advance the multi-index, carrying into the outer axes
        let mut k = index.len();
        loop {
            if k == 0 {
                return sum * grid.cell_volume_from(axis);
            }

            k -= 1;
            let a = axis + k;
            index[k] += 1;

            if index[k] < n {
                x[a] = grid.midpoints(a)[index[k]];
                break;
            }

            index[k] = 0;
            x[a] = grid.midpoints(a)[0];
        }
    }
}

/// Perform the part `range` of the outermost loop on a single core.
///
/// The returned sum is not yet weighted with the step size of the outermost axis.
fn contribution_from_core<T, I>(
    integrand: &I,
    grid: &Grid<T>,
    seed: &[T],
    range: Range<usize>,
    traversal: Traversal,
) -> PartialSum<T>
where
    T: Float,
    I: Integrand<T> + ?Sized,
{
    // every core owns its coordinate buffer
    let mut x = seed.to_vec();

    let inner_axes = u32::try_from(grid.dim() - 1).unwrap_or(u32::MAX);
    let inner_calls = grid.steps().saturating_pow(inner_axes);

    grid.midpoints(0)[range]
        .iter()
        .fold(PartialSum::default(), |mut acc, &x0| {
            x[0] = x0;

            let inner = match traversal {
                Traversal::Recursive => integrate_recursive(integrand, grid, &mut x, 1),
                Traversal::Odometer => integrate_odometer(integrand, grid, &mut x, 1),
            };

            acc.update(inner, inner_calls);
            acc
        })
}

/// Integrate a validated `request` on `n_cores` threads.
///
/// The outermost axis is split evenly across the threads. A panic of the integrand on any thread
/// is resumed on the calling thread.
pub(crate) fn integrate_region<T, I>(
    integrand: &I,
    request: &IntegrationRequest<T>,
    n_cores: usize,
    traversal: Traversal,
) -> Checkpoint<T>
where
    I: Integrand<T> + ?Sized,
    T: Float + Send + Sync,
{
    let n_cores = n_cores.max(1);
    let steps = request.step_count();
    let bounds = request.bounds();
    let grid = Grid::new(bounds.lower(), bounds.upper(), steps);
    let seed = request.coordinates();

    debug!(
        "integrating {} dimensions with {} cells per axis on {} threads",
        grid.dim(),
        steps,
        n_cores
    );

    // distribute the outermost loop evenly across the cores
    let partials = cb::thread::scope(|s| {
        let mut handles = Vec::with_capacity(n_cores);

        for core in 0..n_cores {
            let range = compute_range_for_core(core, n_cores, steps);
            let grid = &grid;
            let seed = &seed;

            handles.push(s.spawn(move |_| {
                contribution_from_core(integrand, grid, seed, range, traversal)
            }));
        }

        // wait for the threads to finish
        handles
            .into_iter()
            .map(|handle| handle.join().unwrap_or_else(|e| panic::resume_unwind(e)))
            .collect::<Vec<_>>()
    })
    .unwrap_or_else(|e| panic::resume_unwind(e));

    let total = partials
        .into_iter()
        .fold(PartialSum::<T>::default(), |acc, p| acc + p)
        .scale(grid.step(0));

    Checkpoint::new(steps, n_cores, total.calls(), total.sum())
}

/// Integrate the `integrand` using `n_cores` cores and return the estimate of the integral.
///
/// The request is validated first; nothing is evaluated if it is malformed.
pub fn integrate<T, I>(integrand: &I, request: &IntegrationRequest<T>, n_cores: usize) -> Result<T>
where
    I: Integrand<T> + ?Sized,
    T: Float + Send + Sync,
{
    integrate_with(integrand, request, n_cores, Traversal::default())
        .map(|chkpt| chkpt.estimate())
}

/// Like [`integrate`], but with an explicit `traversal` and returning the full checkpoint.
pub fn integrate_with<T, I>(
    integrand: &I,
    request: &IntegrationRequest<T>,
    n_cores: usize,
    traversal: Traversal,
) -> Result<Checkpoint<T>>
where
    I: Integrand<T> + ?Sized,
    T: Float + Send + Sync,
{
    request.validate()?;

    Ok(integrate_region(integrand, request, n_cores, traversal))
}

/// Integrate the `integrand` once for every step count in `steps` using `n_cores` cores.
///
/// All other parameters are taken from `request`. After each run the `callback` is given the
/// checkpoints of all runs so far. Every step count is validated before the first run starts.
pub fn integrate_refinements<T, I>(
    integrand: &I,
    request: &IntegrationRequest<T>,
    n_cores: usize,
    traversal: Traversal,
    steps: &[T],
    callback: &impl Callback<T>,
) -> Result<Vec<Checkpoint<T>>>
where
    I: Integrand<T> + ?Sized,
    T: Float + Send + Sync,
{
    let requests = steps
        .iter()
        .map(|&n| {
            let refined = request.with_steps(n);
            refined.validate().map(|_| refined)
        })
        .collect::<std::result::Result<Vec<_>, _>>()?;

    // storage for the results of each run
    let mut checkpoints = Vec::with_capacity(requests.len());

    // runs are treated sequentially
    for refined in &requests {
        checkpoints.push(integrate_region(integrand, refined, n_cores, traversal));
        callback.print(&checkpoints)?;
    }

    Ok(checkpoints)
}
