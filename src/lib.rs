#![warn(clippy::all, clippy::cargo, clippy::nursery, clippy::pedantic)]
#![warn(missing_docs)]

//! The crate `mpintir` provides routines to approximate definite multi-dimensional [integrals]
//! over axis-aligned boxes with the composite [midpoint rule], in parallel on many threads and,
//! optionally, on many processes.
//!
//! # Features
//!
//! - **Generic numeric type**. The single-process integrators work with every type that
//! implements the `Float` trait from the `num-traits` crate, for instance `f32` or `f64`.
//! - **Hybrid parallelism**. The work is split across workers (processes, connected via MPI with
//! the `mpi` feature) and, within each worker, across threads. The result does not depend on
//! the number of threads or workers beyond floating-point rounding.
//! - **Validation first**. Malformed requests are rejected before the integrand is evaluated
//! even once. In a distributed run the root decides and all workers fail or proceed together.
//! - **Refinement runs**. The same integral can be computed for a sequence of step counts, with
//! a callback reporting each result, for example to a JSON file.
//!
//! # What is ...?
//!
//! This section is a dictionary of terms that are used in this documentation. Given
//!
//! $$ I = \int_{l_1}^{u_1} \mathrm{d} x_1 \cdots \int_{l_d}^{u_d} \mathrm{d} x_d \, f(x_1,
//! \ldots, x_d) $$
//!
//! we approximate $I$ by subdividing every axis into $n$ cells of width
//! $h_i = (u_i - l_i) / n$ and evaluating $f$ at the center of every cell:
//!
//! $$ I \approx \prod_{i=1}^d h_i \sum_{j_1=0}^{n-1} \cdots \sum_{j_d=0}^{n-1} f \left(
//! l_1 + (j_1 + \tfrac{1}{2}) h_1, \ldots, l_d + (j_d + \tfrac{1}{2}) h_d \right) $$
//!
//! We use the following terms:
//!
//! - the number of *steps*, $n$, is the number of cells per axis;
//! - the number of *calls*, $n^d$, is the number of times the integrand is evaluated. We assume
//! that this is the expensive operation;
//! - the *integrand* is the function, $f(x_1, x_2, \ldots, x_d)$, that is being integrated;
//! - the number of *dimensions*, $d$, is the number of integration variables;
//! - a *worker* is one member of a group of processes integrating together; the *root* is the
//! worker with rank zero, which owns the input and receives the result.
//!
//! [integrals]: https://en.wikipedia.org/wiki/Integral
//! [midpoint rule]: https://en.wikipedia.org/wiki/Riemann_sum#Midpoint_rule

pub mod callbacks;
pub mod comm;
pub mod config;
pub mod core;
pub mod error;
pub mod integrators;

pub use crate::core::*;
pub use crate::error::{ConfigurationError, Error, Result};
