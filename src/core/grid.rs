//! The midpoint grid of a hyper-rectangle.
//!
//! Each axis $[l, u]$ is subdivided into $n$ cells of width $h = (u - l) / n$, and the $i$-th
//! cell is sampled at its center
//!
//! $$ x_i = l + \left( i + \tfrac{1}{2} \right) h, \qquad i = 0, \ldots, n - 1. $$
use super::from_count;
use num_traits::Float;

/// Returns the width of one of the `n` cells of the interval `[lower, upper]`.
pub fn step_size<T: Float>(lower: T, upper: T, n: T) -> T {
    (upper - lower) / n
}

/// Returns the center of cell `i` of an axis starting at `lower` with cell width `h`.
pub fn midpoint<T: Float>(lower: T, h: T, i: T) -> T {
    let half = T::one() / (T::one() + T::one());
    lower + (i + half) * h
}

/// Iterator over the midpoints of one axis.
#[derive(Clone, Debug)]
pub struct Midpoints<T> {
    lower: T,
    h: T,
    index: usize,
    remaining: usize,
}

impl<T: Float> Midpoints<T> {
    /// Midpoints of the `n` cells of `[lower, upper]`.
    pub fn new(lower: T, upper: T, n: usize) -> Self {
        Self {
            lower,
            h: step_size(lower, upper, from_count(n)),
            index: 0,
            remaining: n,
        }
    }

    /// The cell width.
    pub fn step(&self) -> T {
        self.h
    }
}

impl<T: Float> Iterator for Midpoints<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if self.remaining == 0 {
            return None;
        }

        let x = midpoint(self.lower, self.h, from_count(self.index));
        self.index += 1;
        self.remaining -= 1;

        Some(x)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T: Float> ExactSizeIterator for Midpoints<T> {}

/// A single axis of a [`Grid`].
#[derive(Clone, Debug)]
struct Axis<T> {
    step: T,
    midpoints: Vec<T>,
}

/// Precomputed midpoints and step sizes of all axes of a hyper-rectangle.
#[derive(Clone, Debug)]
pub struct Grid<T> {
    axes: Vec<Axis<T>>,
    steps: usize,
}

impl<T: Float> Grid<T> {
    /// Subdivide every axis of the box `[lower, upper]` into `steps` cells.
    pub fn new(lower: &[T], upper: &[T], steps: usize) -> Self {
        debug_assert_eq!(lower.len(), upper.len());

        let axes = lower
            .iter()
            .zip(upper)
            .map(|(&l, &u)| {
                let midpoints = Midpoints::new(l, u, steps);
                Axis {
                    step: midpoints.step(),
                    midpoints: midpoints.collect(),
                }
            })
            .collect();

        Self { axes, steps }
    }

    /// The number of axes.
    pub fn dim(&self) -> usize {
        self.axes.len()
    }

    /// The number of cells per axis.
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// The cell width along `axis`.
    pub fn step(&self, axis: usize) -> T {
        self.axes[axis].step
    }

    /// All midpoints along `axis`.
    pub fn midpoints(&self, axis: usize) -> &[T] {
        &self.axes[axis].midpoints
    }

    /// The volume of one grid cell, $\prod_i h_i$, restricted to the axes `from..dim`.
    pub fn cell_volume_from(&self, from: usize) -> T {
        self.axes[from..]
            .iter()
            .fold(T::one(), |acc, axis| acc * axis.step)
    }
}
