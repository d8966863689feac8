//! Odometer-style enumeration of multi-indices.

use std::iter::FusedIterator;

use crate::{Result, StridedError};

/// Step `current` to the next multi-index in `[lower, upper)`, dimension 0
/// varying fastest.
///
/// Returns `false` once every combination has been visited; `current` is
/// then back at `lower`.
///
/// ```rust
/// use sx_strided::next_variation;
///
/// let mut idx = [0, 0];
/// let mut seen = vec![idx];
/// while next_variation(&[0, 0], &mut idx, &[2, 2]) {
///     seen.push(idx);
/// }
/// assert_eq!(seen, vec![[0, 0], [1, 0], [0, 1], [1, 1]]);
/// ```
pub fn next_variation<const N: usize>(
    lower: &[usize; N],
    current: &mut [usize; N],
    upper: &[usize; N],
) -> bool {
    for i in 0..N {
        current[i] += 1;
        if current[i] < upper[i] {
            return true;
        }
        current[i] = lower[i];
    }
    false
}

/// Starting indices of every 1-D lane along one axis.
///
/// The lane axis is pinned to 0 and every other dimension runs over its
/// extent, dimension 0 fastest.
#[derive(Debug, Clone)]
pub struct Lanes<const N: usize> {
    current: [usize; N],
    upper: [usize; N],
    done: bool,
}

impl<const N: usize> Lanes<N> {
    /// # Errors
    /// Returns [`StridedError::InvalidAxis`] if `axis >= N`.
    pub fn new(extents: [usize; N], axis: usize) -> Result<Self> {
        if axis >= N {
            return Err(StridedError::InvalidAxis { axis, rank: N });
        }
        let mut upper = extents;
        upper[axis] = 1;
        Ok(Self {
            current: [0; N],
            done: extents.contains(&0),
            upper,
        })
    }
}

impl<const N: usize> Iterator for Lanes<N> {
    type Item = [usize; N];

    fn next(&mut self) -> Option<[usize; N]> {
        if self.done {
            return None;
        }
        let start = self.current;
        self.done = !next_variation(&[0; N], &mut self.current, &self.upper);
        Some(start)
    }
}

impl<const N: usize> FusedIterator for Lanes<N> {}
