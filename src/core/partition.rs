//! Decomposition of the integration domain across workers.
use super::{from_count, Bounds};
use crate::error::ConfigurationError;
use num_traits::Float;
use serde::{Deserialize, Serialize};

/// How the integration domain is split between `count` workers.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PartitionStrategy {
    /// Slice the given axis into `count` contiguous, non-overlapping pieces whose union is the
    /// full interval. All other axes are left untouched, so the sum of the workers' integrals
    /// is the integral over the whole domain.
    Axis(usize),
    /// Scale every axis by `1 / count` and shift it by `rank / count` of its length.
    ///
    /// Each worker integrates a shrunk copy of the domain along its diagonal. The workers'
    /// results only add up to the integral over the domain for a single worker. This strategy
    /// exists to reproduce results of older runs.
    ScaledCopy,
}

impl Default for PartitionStrategy {
    fn default() -> Self {
        Self::Axis(0)
    }
}

impl PartitionStrategy {
    /// Check that this strategy can be applied to a `dim`-dimensional domain.
    pub fn check(&self, dim: usize) -> Result<(), ConfigurationError> {
        match *self {
            Self::Axis(axis) if axis >= dim => {
                Err(ConfigurationError::PartitionAxisOutOfRange { axis, dim })
            }
            _ => Ok(()),
        }
    }

    /// Returns the part of `bounds` that worker `rank` out of `count` workers integrates.
    pub fn sub_domain<T: Float>(
        &self,
        bounds: &Bounds<T>,
        rank: usize,
        count: usize,
    ) -> Result<SubDomain<T>, ConfigurationError> {
        self.check(bounds.dim())?;
        debug_assert!(rank < count);

        let mut lower = bounds.lower().to_vec();
        let mut upper = bounds.upper().to_vec();

        let begin = from_count::<T>(rank);
        let end = from_count::<T>(rank + 1);
        let count_t = from_count::<T>(count);

        match *self {
            Self::Axis(axis) => {
                let width = upper[axis] - lower[axis];
                let start = lower[axis];
                lower[axis] = start + width * begin / count_t;
                // the last piece must end exactly at the upper bound
                if rank + 1 < count {
                    upper[axis] = start + width * end / count_t;
                }
            }
            Self::ScaledCopy => {
                for (l, u) in lower.iter_mut().zip(upper.iter_mut()) {
                    let range = *u - *l;
                    let start = *l;
                    *l = start + begin * (range / count_t);
                    *u = start + end * (range / count_t);
                }
            }
        }

        Ok(SubDomain {
            rank,
            count,
            bounds: Bounds::new(lower, upper),
        })
    }
}

/// The part of the domain assigned to a single worker for one integration run.
#[derive(Clone, Debug, PartialEq)]
pub struct SubDomain<T> {
    rank: usize,
    count: usize,
    bounds: Bounds<T>,
}

impl<T> SubDomain<T> {
    /// The worker this sub-domain belongs to.
    pub const fn rank(&self) -> usize {
        self.rank
    }

    /// The number of workers the domain was split across.
    pub const fn count(&self) -> usize {
        self.count
    }

    /// The bounds of this sub-domain.
    pub const fn bounds(&self) -> &Bounds<T> {
        &self.bounds
    }

    /// Destructure into the bounds.
    pub fn into_bounds(self) -> Bounds<T> {
        self.bounds
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn domain() -> Bounds<f64> {
        Bounds::new(vec![-2.0, -2.0, 0.0], vec![4.0, 6.0, 3.0])
    }

    #[test]
    fn test_single_worker_gets_everything() {
        for strategy in &[PartitionStrategy::Axis(1), PartitionStrategy::ScaledCopy] {
            let sub = strategy.sub_domain(&domain(), 0, 1).unwrap();
            assert_eq!(sub.bounds(), &domain());
            assert_eq!(sub.rank(), 0);
            assert_eq!(sub.count(), 1);
        }
    }

    #[test]
    fn test_axis_slices_tile_the_domain() {
        let count = 7;
        let strategy = PartitionStrategy::Axis(1);
        let subs = (0..count)
            .map(|rank| strategy.sub_domain(&domain(), rank, count).unwrap())
            .collect::<Vec<_>>();

        assert_eq!(subs[0].bounds().lower()[1], -2.0);
        assert_eq!(subs[count - 1].bounds().upper()[1], 6.0);

        for pair in subs.windows(2) {
            // contiguous and non-overlapping
            assert_eq!(pair[0].bounds().upper()[1], pair[1].bounds().lower()[1]);
        }

        for sub in &subs {
            // untouched axes
            assert_eq!(sub.bounds().lower()[0], -2.0);
            assert_eq!(sub.bounds().upper()[0], 4.0);
            assert_eq!(sub.bounds().lower()[2], 0.0);
            assert_eq!(sub.bounds().upper()[2], 3.0);
        }

        let total = subs.iter().map(|s| s.bounds().volume()).sum::<f64>();
        assert!((total - domain().volume()).abs() < 1e-12);
    }

    #[test]
    fn test_scaled_copy_shrinks_every_axis() {
        let sub = PartitionStrategy::ScaledCopy
            .sub_domain(&domain(), 1, 2)
            .unwrap();

        assert_eq!(sub.bounds().lower(), &[1.0, 2.0, 1.5]);
        assert_eq!(sub.bounds().upper(), &[4.0, 6.0, 3.0]);
    }

    #[test]
    fn test_axis_out_of_range() {
        assert_eq!(
            PartitionStrategy::Axis(3).sub_domain(&domain(), 0, 2),
            Err(ConfigurationError::PartitionAxisOutOfRange { axis: 3, dim: 3 })
        );
        assert!(PartitionStrategy::ScaledCopy.check(0).is_ok());
    }
}
