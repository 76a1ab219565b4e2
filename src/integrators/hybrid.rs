//! Hybrid integrator: several workers, each running several threads.
//!
//! All workers of a group call [`integrate`] together. The root checks the request and tells the
//! others whether to proceed, then sends them the request. After a barrier every worker
//! integrates its part of the domain on its own threads, and the partial results are summed up on
//! the root.
use crate::comm::Communicator;
use crate::config::HybridConfig;
use crate::core::partition::PartitionStrategy;
use crate::core::{Integrand, IntegrationRequest};
use crate::error::{Error, Result};
use crate::integrators::midpoint;

use log::{debug, info, warn};

/// Number of entries before the payload of an encoded request.
const HEADER: usize = 7;

/// Wire codes of the partition strategies.
const AXIS: f64 = 0.0;
const SCALED_COPY: f64 = 1.0;

fn encode_request(request: &IntegrationRequest<f64>, partition: PartitionStrategy) -> Vec<f64> {
    let bounds = request.bounds();
    let seed = request.seed();

    let (kind, axis) = match partition {
        PartitionStrategy::Axis(axis) => (AXIS, axis),
        PartitionStrategy::ScaledCopy => (SCALED_COPY, 0),
    };

    let mut wire = Vec::with_capacity(HEADER + 2 * bounds.dim() + seed.len());
    wire.extend_from_slice(&[
        request.dim() as f64,
        request.steps(),
        bounds.lower().len() as f64,
        bounds.upper().len() as f64,
        seed.len() as f64,
        kind,
        axis as f64,
    ]);
    wire.extend_from_slice(bounds.lower());
    wire.extend_from_slice(bounds.upper());
    wire.extend_from_slice(seed);
    wire
}

fn decode_request(wire: &[f64]) -> Result<(IntegrationRequest<f64>, PartitionStrategy)> {
    let malformed = || Error::Communication("received a malformed integration request".into());

    let count = |value: f64| {
        if value.is_finite() && value >= 0.0 && value.fract() == 0.0 {
            Ok(value as usize)
        } else {
            Err(malformed())
        }
    };

    if wire.len() < HEADER {
        return Err(malformed());
    }

    let dim = count(wire[0])?;
    let steps = wire[1];
    let n_lower = count(wire[2])?;
    let n_upper = count(wire[3])?;
    let n_seed = count(wire[4])?;

    let partition = if wire[5] == AXIS {
        PartitionStrategy::Axis(count(wire[6])?)
    } else if wire[5] == SCALED_COPY {
        PartitionStrategy::ScaledCopy
    } else {
        return Err(malformed());
    };

    let payload = &wire[HEADER..];
    let expected = n_lower
        .checked_add(n_upper)
        .and_then(|n| n.checked_add(n_seed))
        .ok_or_else(malformed)?;

    if payload.len() != expected {
        return Err(malformed());
    }

    let (lower, rest) = payload.split_at(n_lower);
    let (upper, seed) = rest.split_at(n_upper);

    let request =
        IntegrationRequest::new(dim, lower.to_vec(), upper.to_vec(), steps).with_seed(seed.to_vec());

    Ok((request, partition))
}

/// Validate the request on the root and make every worker agree on the outcome.
///
/// Only the root's `request` is looked at. If the root rejects it, the root returns the reason
/// and every other worker returns [`Error::RejectedByRoot`], so either all workers proceed or
/// none does.
pub fn validate_at_root<C>(
    comm: &C,
    request: Option<&IntegrationRequest<f64>>,
    config: &HybridConfig,
) -> Result<()>
where
    C: Communicator + ?Sized,
{
    let outcome = if comm.is_root() {
        Some(match request {
            Some(request) => request
                .validate()
                .and_then(|_| config.partition.check(request.dim()))
                .map_err(Error::from),
            None => Err(Error::MissingRequest),
        })
    } else {
        None
    };

    let mut valid = outcome.as_ref().map_or(false, |o| o.is_ok());
    comm.broadcast_flag(&mut valid)?;

    match outcome {
        Some(Err(err)) => {
            warn!("rejecting integration request: {}", err);
            Err(err)
        }
        _ if !valid => Err(Error::RejectedByRoot),
        _ => Ok(()),
    }
}

/// Send the root's request and partition strategy to every worker and wait until all of them
/// have it.
///
/// Must only be called after [`validate_at_root`] succeeded. The `partition` of workers other
/// than the root is ignored, so every worker splits the domain the way the root validated it.
pub fn share_request<C>(
    comm: &C,
    request: Option<&IntegrationRequest<f64>>,
    partition: PartitionStrategy,
) -> Result<(IntegrationRequest<f64>, PartitionStrategy)>
where
    C: Communicator + ?Sized,
{
    let mut wire = if comm.is_root() {
        encode_request(request.ok_or(Error::MissingRequest)?, partition)
    } else {
        Vec::new()
    };

    comm.broadcast_values(&mut wire)?;
    let shared = decode_request(&wire)?;

    // nobody starts computing before everyone has the same view of the problem
    comm.barrier()?;

    Ok(shared)
}

/// Integrate on every worker of `comm` and return the integral on the root.
///
/// `request` is only needed on the root; the other workers may pass `None`. Every worker must
/// be given the same `integrand`. The partition strategy is taken from the root's `config`;
/// the thread count and traversal are chosen by every worker itself. Workers other than the
/// root return `0.0`.
pub fn integrate<C, I>(
    comm: &C,
    integrand: &I,
    request: Option<&IntegrationRequest<f64>>,
    config: &HybridConfig,
) -> Result<f64>
where
    C: Communicator + ?Sized,
    I: Integrand<f64> + ?Sized,
{
    validate_at_root(comm, request, config)?;
    let (request, partition) = share_request(comm, request, config.partition)?;

    let (rank, size) = (comm.rank(), comm.size());
    let sub_domain = partition.sub_domain(request.bounds(), rank, size)?;
    let local_request = request.with_bounds(sub_domain.into_bounds());
    let threads = config.threads_per_worker(size);

    debug!(
        "worker {}/{}: integrating over {:?} on {} threads",
        rank,
        size,
        local_request.bounds(),
        threads
    );

    let local = midpoint::integrate_region(integrand, &local_request, threads, config.traversal);

    debug!(
        "worker {}/{}: partial result {} from {} calls",
        rank,
        size,
        local.estimate(),
        local.calls()
    );

    match comm.reduce_sum(local.estimate())? {
        Some(global) => {
            info!("integral estimate from {} workers: {}", size, global);
            Ok(global)
        }
        None => Ok(0.0),
    }
}
