//! Partial results and how they are combined.
use num_traits::Float;
use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign};

/// The contribution of one thread or worker to a quadrature sum.
///
/// Partial sums are combined with `+`; `PartialSum::default()` is the neutral element, so a
/// collection of partial sums can be folded in any order. The result only depends on the order
/// through floating-point rounding.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
pub struct PartialSum<T> {
    sum: T,
    calls: usize,
}

impl<T> PartialSum<T> {
    /// Constructor.
    pub const fn new(sum: T, calls: usize) -> Self {
        Self { sum, calls }
    }

    /// Returns the number of integrand evaluations that went into this sum.
    pub const fn calls(&self) -> usize {
        self.calls
    }
}

impl<T: Copy> PartialSum<T> {
    /// Returns the accumulated (weighted) sum.
    pub fn sum(&self) -> T {
        self.sum
    }
}

impl<T: Float> PartialSum<T> {
    /// Add `value`, which was obtained from `calls` integrand evaluations.
    pub fn update(&mut self, value: T, calls: usize) {
        self.sum = self.sum + value;
        self.calls = self.calls.saturating_add(calls);
    }

    /// Multiply the sum with the weight `h` of an axis.
    pub fn scale(self, h: T) -> Self {
        Self {
            sum: self.sum * h,
            calls: self.calls,
        }
    }
}

impl<T: Float> Default for PartialSum<T> {
    fn default() -> Self {
        Self {
            sum: T::zero(),
            calls: 0,
        }
    }
}

impl<T: Float> Add for PartialSum<T> {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            sum: self.sum + other.sum,
            calls: self.calls.saturating_add(other.calls),
        }
    }
}

impl<T: Float> AddAssign for PartialSum<T> {
    fn add_assign(&mut self, other: Self) {
        self.update(other.sum, other.calls);
    }
}
