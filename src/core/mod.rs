//! The core module
pub mod estimators;
pub mod grid;
pub mod partition;

use crate::error::ConfigurationError;
use num_traits::Float;
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Integrand trait
///
/// Every closure `Fn(&[T]) -> T` that can be shared between threads is an integrand.
pub trait Integrand<T>: Send + Sync {
    /// Evaluate the integrand at the point `x`.
    ///
    /// The first `dim` entries of `x` are the integration variables, any further entries are
    /// the fixed parameters of the coordinate seed (see [`IntegrationRequest::with_seed`]).
    fn call(&self, x: &[T]) -> T;
}

impl<T, F> Integrand<T> for F
where
    F: Fn(&[T]) -> T + Send + Sync,
{
    fn call(&self, x: &[T]) -> T {
        self(x)
    }
}

/// Convert a count into the numeric type `T`.
pub(crate) fn from_count<T: Float>(count: usize) -> T {
    T::from(count).unwrap_or_else(T::nan)
}

/// An axis-aligned box given by its lower and upper corners.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Bounds<T> {
    lower: Vec<T>,
    upper: Vec<T>,
}

impl<T> Bounds<T> {
    /// Constructor. The bounds are checked by [`IntegrationRequest::validate`].
    pub fn new(lower: Vec<T>, upper: Vec<T>) -> Self {
        Self { lower, upper }
    }

    /// The lower corner.
    pub fn lower(&self) -> &[T] {
        &self.lower
    }

    /// The upper corner.
    pub fn upper(&self) -> &[T] {
        &self.upper
    }

    /// The number of axes.
    pub fn dim(&self) -> usize {
        self.lower.len()
    }
}

impl<T: Float> Bounds<T> {
    /// The hyper-volume $\prod_i (u_i - l_i)$ of the box.
    pub fn volume(&self) -> T {
        self.lower
            .iter()
            .zip(&self.upper)
            .fold(T::one(), |acc, (&l, &u)| acc * (u - l))
    }
}

/// Everything needed to run one integration: the dimension, the domain, the step count and the
/// coordinate seed.
///
/// A request is immutable once built; the integrators only ever read from it.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct IntegrationRequest<T> {
    dim: usize,
    bounds: Bounds<T>,
    steps: T,
    #[serde(default)]
    seed: Vec<T>,
}

impl<T: Float> IntegrationRequest<T> {
    /// Integrate over the `dim`-dimensional box `[lower, upper]` subdividing every axis into
    /// `steps` cells. A fractional `steps` is truncated.
    pub fn new(dim: usize, lower: Vec<T>, upper: Vec<T>, steps: T) -> Self {
        Self {
            dim,
            bounds: Bounds::new(lower, upper),
            steps,
            seed: Vec::new(),
        }
    }

    /// Set the initial coordinate buffer.
    ///
    /// The first `dim` entries are overwritten with sample points; entries beyond `dim` are
    /// passed unchanged to every call of the integrand and can be used as fixed parameters.
    #[must_use]
    pub fn with_seed(mut self, seed: Vec<T>) -> Self {
        self.seed = seed;
        self
    }

    /// Returns a request with the same dimension, step count and seed over other `bounds`.
    #[must_use]
    pub fn with_bounds(&self, bounds: Bounds<T>) -> Self {
        Self {
            dim: self.dim,
            bounds,
            steps: self.steps,
            seed: self.seed.clone(),
        }
    }

    /// Returns a request with a different step count.
    #[must_use]
    pub fn with_steps(&self, steps: T) -> Self {
        Self {
            steps,
            ..self.clone()
        }
    }

    /// The number of integration variables.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// The integration domain.
    pub fn bounds(&self) -> &Bounds<T> {
        &self.bounds
    }

    /// The step count as given.
    pub fn steps(&self) -> T {
        self.steps
    }

    /// The coordinate seed as given.
    pub fn seed(&self) -> &[T] {
        &self.seed
    }

    /// The number of cells per axis, `trunc(steps)`.
    pub fn step_count(&self) -> usize {
        if self.steps.is_finite() && self.steps > T::zero() {
            self.steps.trunc().to_usize().unwrap_or(0)
        } else {
            0
        }
    }

    /// Returns the initial coordinate buffer: the seed, or zeros if there is none.
    pub fn coordinates(&self) -> Vec<T> {
        if self.seed.is_empty() {
            vec![T::zero(); self.dim]
        } else {
            self.seed.clone()
        }
    }

    /// Check the request, returning the first problem found.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.dim == 0 {
            return Err(ConfigurationError::ZeroDimension);
        }

        let lower = self.bounds.lower();
        let upper = self.bounds.upper();

        if lower.is_empty() {
            return Err(ConfigurationError::EmptyLowerBounds);
        }

        if upper.is_empty() {
            return Err(ConfigurationError::EmptyUpperBounds);
        }

        if lower.len() != self.dim || upper.len() != self.dim {
            return Err(ConfigurationError::BoundsLengthMismatch {
                dim: self.dim,
                lower: lower.len(),
                upper: upper.len(),
            });
        }

        for (axis, (&l, &u)) in lower.iter().zip(upper).enumerate() {
            if !l.is_finite() || !u.is_finite() {
                return Err(ConfigurationError::NonFiniteBound { axis });
            }

            if l > u {
                return Err(ConfigurationError::InvertedBounds { axis });
            }
        }

        if self.step_count() == 0 {
            return Err(ConfigurationError::InvalidStepCount);
        }

        if !self.seed.is_empty() && self.seed.len() < self.dim {
            return Err(ConfigurationError::SeedTooShort {
                dim: self.dim,
                len: self.seed.len(),
            });
        }

        Ok(())
    }

    /// Returns `true` if [`validate`](Self::validate) succeeds.
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
}

/// A checkpoint records the outcome of one integration run.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Checkpoint<T> {
    steps: usize,
    threads: usize,
    calls: usize,
    estimate: T,
}

impl<T: Copy> Checkpoint<T> {
    /// Constructor
    pub(crate) fn new(steps: usize, threads: usize, calls: usize, estimate: T) -> Self {
        Self {
            steps,
            threads,
            calls,
            estimate,
        }
    }

    /// Returns the number of cells per axis.
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Returns the number of threads the run was split across.
    pub fn threads(&self) -> usize {
        self.threads
    }

    /// Returns the number of times the integrand was evaluated.
    pub fn calls(&self) -> usize {
        self.calls
    }

    /// Returns the estimate of the integral.
    pub fn estimate(&self) -> T {
        self.estimate
    }
}

/// Compute the range of loop indices on a given core, given the total number of cores
/// `n_cores`, the index `core` (zero-based) of the current thread as well as the
/// total number of iterations `total` to perform combined on all cores.
pub(crate) fn compute_range_for_core(core: usize, n_cores: usize, total: usize) -> Range<usize> {
    // make sure passed data is valid
    debug_assert!(core < n_cores);
    let per_core = (total + n_cores - 1) / n_cores;

    // the last cores might get fewer or no iterations at all
    let start = (core * per_core).min(total);
    let end = (start + per_core).min(total);

    start..end
}
