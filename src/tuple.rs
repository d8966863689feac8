//! Fixed-rank index tuples.
//!
//! [`IndexTuple`] is a thin wrapper over `[usize; N]` used for both extents
//! and multi-indices. The arity is part of the type, so handing a rank-3
//! tuple to a rank-2 view is a compile error; [`TryFrom<&[usize]>`] covers
//! the case where the length is only known at runtime.

use std::ops::{Deref, DerefMut, Index, IndexMut};

use crate::{Result, StridedError};

/// A rank-sized tuple of unsigned integers. Defaults to all zeros.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IndexTuple<const N: usize>([usize; N]);

/// Extent of every dimension, dimension 0 first.
pub type Extents<const N: usize> = IndexTuple<N>;

/// A multi-index into a view, dimension 0 first.
pub type Indices<const N: usize> = IndexTuple<N>;

impl<const N: usize> IndexTuple<N> {
    #[inline]
    pub const fn new(values: [usize; N]) -> Self {
        Self(values)
    }

    #[inline]
    pub const fn zeros() -> Self {
        Self([0; N])
    }

    #[inline]
    pub const fn rank(&self) -> usize {
        N
    }

    #[inline]
    pub fn as_array(&self) -> &[usize; N] {
        &self.0
    }

    #[inline]
    pub fn into_array(self) -> [usize; N] {
        self.0
    }

    /// Product of all entries (element count when used as extents).
    #[inline]
    pub fn product(&self) -> usize {
        self.0.iter().product()
    }

    /// Whether any entry is zero (an empty shape when used as extents).
    #[inline]
    pub fn contains_zero(&self) -> bool {
        self.0.contains(&0)
    }
}

impl<const N: usize> Default for IndexTuple<N> {
    fn default() -> Self {
        Self::zeros()
    }
}

impl<const N: usize> From<[usize; N]> for IndexTuple<N> {
    #[inline]
    fn from(values: [usize; N]) -> Self {
        Self(values)
    }
}

impl<const N: usize> From<IndexTuple<N>> for [usize; N] {
    #[inline]
    fn from(tuple: IndexTuple<N>) -> Self {
        tuple.0
    }
}

impl From<usize> for IndexTuple<1> {
    #[inline]
    fn from(value: usize) -> Self {
        Self([value])
    }
}

impl<const N: usize> TryFrom<&[usize]> for IndexTuple<N> {
    type Error = StridedError;

    fn try_from(values: &[usize]) -> Result<Self> {
        let array: [usize; N] = values
            .try_into()
            .map_err(|_| StridedError::RankMismatch(values.len(), N))?;
        Ok(Self(array))
    }
}

impl<const N: usize> Deref for IndexTuple<N> {
    type Target = [usize; N];

    #[inline]
    fn deref(&self) -> &[usize; N] {
        &self.0
    }
}

impl<const N: usize> DerefMut for IndexTuple<N> {
    #[inline]
    fn deref_mut(&mut self) -> &mut [usize; N] {
        &mut self.0
    }
}

impl<const N: usize> Index<usize> for IndexTuple<N> {
    type Output = usize;

    #[inline]
    fn index(&self, dim: usize) -> &usize {
        &self.0[dim]
    }
}

impl<const N: usize> IndexMut<usize> for IndexTuple<N> {
    #[inline]
    fn index_mut(&mut self, dim: usize) -> &mut usize {
        &mut self.0[dim]
    }
}

impl<const N: usize> AsRef<[usize]> for IndexTuple<N> {
    fn as_ref(&self) -> &[usize] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_zero() {
        let t = Indices::<3>::default();
        assert_eq!(t.into_array(), [0, 0, 0]);
        assert_eq!(t.rank(), 3);
    }

    #[test]
    fn test_from_scalar_rank_one() {
        let e: Extents<1> = 7.into();
        assert_eq!(e[0], 7);
        assert_eq!(e.product(), 7);
    }

    #[test]
    fn test_from_array_elementwise() {
        let e = Extents::from([2, 3, 4]);
        assert_eq!(e[0], 2);
        assert_eq!(e[2], 4);
        assert_eq!(e.product(), 24);
        assert!(!e.contains_zero());
    }

    #[test]
    fn test_try_from_slice_checks_arity() {
        let ok = Indices::<2>::try_from(&[1usize, 2][..]).unwrap();
        assert_eq!(ok.into_array(), [1, 2]);

        let err = Indices::<2>::try_from(&[1usize, 2, 3][..]).unwrap_err();
        assert_eq!(err, StridedError::RankMismatch(3, 2));
    }

    #[test]
    fn test_deref_mut_exposes_plain_array() {
        let mut t = Indices::<2>::zeros();
        t[1] = 5;
        t.iter_mut().for_each(|v| *v += 1);
        assert_eq!(*t.as_array(), [1, 6]);
    }

    #[test]
    fn test_zero_extent_detected() {
        assert!(Extents::from([3, 0, 2]).contains_zero());
        assert_eq!(Extents::from([3, 0, 2]).product(), 0);
    }
}
