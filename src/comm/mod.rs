//! Communication between the workers of a distributed integration.
//!
//! A worker is one process (or, for [`LocalComm`], one thread standing in for a process). Workers
//! do not share memory; everything they agree on goes through a [`Communicator`]. Only three
//! kinds of collective operations are needed: broadcasting from the root, a barrier and a sum
//! reduction to the root.
mod local;
#[cfg(feature = "mpi")]
mod mpi;

pub use self::local::LocalComm;
#[cfg(feature = "mpi")]
pub use self::mpi::MpiComm;

use crate::error::Result;

/// The rank of the worker that owns the input and receives the result.
pub const ROOT: usize = 0;

/// Collective operations between the workers of a group.
///
/// Every worker of the group must call the same collective operations in the same order.
pub trait Communicator {
    /// The index of this worker, `0..size()`.
    fn rank(&self) -> usize;

    /// The number of workers in the group.
    fn size(&self) -> usize;

    /// Returns `true` for the worker with rank [`ROOT`].
    fn is_root(&self) -> bool {
        self.rank() == ROOT
    }

    /// Block until every worker of the group has reached the barrier.
    fn barrier(&self) -> Result<()>;

    /// Replace `flag` on every worker with the value it has on the root.
    fn broadcast_flag(&self, flag: &mut bool) -> Result<()>;

    /// Replace `values` on every worker with the values the root has. The length of `values`
    /// on the other workers does not matter.
    fn broadcast_values(&self, values: &mut Vec<f64>) -> Result<()>;

    /// Sum `local` over all workers. The root receives the sum, all others `None`.
    fn reduce_sum(&self, local: f64) -> Result<Option<f64>>;
}

/// A group consisting of a single worker. All collective operations are trivial.
#[derive(Clone, Copy, Debug, Default)]
pub struct SingleProcess;

impl Communicator for SingleProcess {
    fn rank(&self) -> usize {
        ROOT
    }

    fn size(&self) -> usize {
        1
    }

    fn barrier(&self) -> Result<()> {
        Ok(())
    }

    fn broadcast_flag(&self, _: &mut bool) -> Result<()> {
        Ok(())
    }

    fn broadcast_values(&self, _: &mut Vec<f64>) -> Result<()> {
        Ok(())
    }

    fn reduce_sum(&self, local: f64) -> Result<Option<f64>> {
        Ok(Some(local))
    }
}
