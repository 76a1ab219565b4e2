//! MPI-specific implementation of the collective operations.
use super::{Communicator, ROOT};
use crate::error::{Error, Result};
use mpi::collective::SystemOperation;
use mpi::topology::SimpleCommunicator;
use mpi::traits::{Communicator as MpiCommunicator, CommunicatorCollectives, Root};
use std::convert::TryFrom;

/// A worker of an MPI communicator, one per rank.
///
/// Only the thread that created the communicator calls into MPI, so the MPI library does not need
/// more than `MPI_THREAD_FUNNELED` support even when the integration itself runs on many threads.
pub struct MpiComm {
    world: SimpleCommunicator,
}

impl MpiComm {
    /// Wrap the given communicator, usually `mpi::initialize()?.world()`.
    pub fn new(world: SimpleCommunicator) -> Self {
        Self { world }
    }

    /// The wrapped communicator.
    pub fn world(&self) -> &SimpleCommunicator {
        &self.world
    }
}

impl Communicator for MpiComm {
    fn rank(&self) -> usize {
        self.world.rank() as usize
    }

    fn size(&self) -> usize {
        self.world.size() as usize
    }

    fn barrier(&self) -> Result<()> {
        self.world.barrier();
        Ok(())
    }

    fn broadcast_flag(&self, flag: &mut bool) -> Result<()> {
        let mut raw = u8::from(*flag);
        self.world
            .process_at_rank(ROOT as mpi::Rank)
            .broadcast_into(&mut raw);
        *flag = raw != 0;
        Ok(())
    }

    fn broadcast_values(&self, values: &mut Vec<f64>) -> Result<()> {
        let root = self.world.process_at_rank(ROOT as mpi::Rank);

        let mut len = values.len() as u64;
        root.broadcast_into(&mut len);

        if !self.is_root() {
            let len = usize::try_from(len)
                .map_err(|_| Error::Communication(format!("cannot receive {} values", len)))?;
            values.clear();
            values.resize(len, 0.0);
        }

        root.broadcast_into(&mut values[..]);
        Ok(())
    }

    fn reduce_sum(&self, local: f64) -> Result<Option<f64>> {
        let root = self.world.process_at_rank(ROOT as mpi::Rank);

        if self.is_root() {
            let mut global = 0.0;
            root.reduce_into_root(&local, &mut global, SystemOperation::sum());
            Ok(Some(global))
        } else {
            root.reduce_into(&local, SystemOperation::sum());
            Ok(None)
        }
    }
}
