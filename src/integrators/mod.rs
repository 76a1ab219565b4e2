//! Integration routines.
pub mod hybrid;
pub mod midpoint;
