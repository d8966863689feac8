//! Traversal of a view in physical memory order.
//!
//! A [`LinearCursor`] is a multi-index plus the data needed to step it:
//! the dimension permutation by ascending stride magnitude and the
//! cumulative products of the permuted extents. Stepping is an odometer
//! over the permuted dimensions; random access goes through a linear
//! ordinal in the same permuted order.
//!
//! Cursors carry no reference to their view, so they are plain `Copy`
//! values. Resolving a cursor to an element happens through
//! [`StridedArrayView::at`] or the iterators below.

use std::cmp::Ordering;
use std::iter::FusedIterator;
use std::ops::{Add, AddAssign, Sub, SubAssign};

use crate::order::{permuted_cumprod, stride_order};
use crate::view::{StridedArrayView, StridedArrayViewMut};

/// `x mod y` with the result always in `[0, y)`, so negative `x` wraps
/// around continuously instead of truncating toward zero.
///
/// ```rust
/// use sx_strided::cyclic_remainder;
///
/// assert_eq!(cyclic_remainder(7, 3), 1);
/// assert_eq!(cyclic_remainder(-1, 3), 2);
/// assert_eq!(cyclic_remainder(-3, 3), 0);
/// ```
///
/// # Panics
/// Panics if `y` is zero.
#[inline]
pub fn cyclic_remainder(x: isize, y: usize) -> usize {
    assert!(y > 0, "cyclic remainder by zero");
    x.rem_euclid(y as isize) as usize
}

/// Position of a linear traversal over a view of fixed shape.
#[derive(Debug, Clone, Copy)]
pub struct LinearCursor<const N: usize> {
    indices: [usize; N],
    extents: [usize; N],
    perm: [usize; N],
    cumprod: [usize; N],
}

impl<const N: usize> LinearCursor<N> {
    fn prepared(extents: [usize; N], strides: &[isize; N]) -> Self {
        const { assert!(N > 0, "traversal requires rank > 0") };
        let perm = stride_order(strides);
        Self {
            indices: [0; N],
            cumprod: permuted_cumprod(&extents, &perm),
            extents,
            perm,
        }
    }

    /// Cursor at the first element. For an empty view this is the end cursor.
    pub(crate) fn new_begin(extents: [usize; N], strides: &[isize; N]) -> Self {
        let cursor = Self::prepared(extents, strides);
        if extents.contains(&0) {
            cursor.into_end()
        } else {
            cursor
        }
    }

    /// The one-past-last cursor: the slowest dimension sits at its extent,
    /// every other coordinate at zero.
    pub(crate) fn new_end(extents: [usize; N], strides: &[isize; N]) -> Self {
        Self::prepared(extents, strides).into_end()
    }

    fn into_end(mut self) -> Self {
        let slowest = self.perm[N - 1];
        self.indices = [0; N];
        self.indices[slowest] = self.extents[slowest];
        self
    }

    /// The current multi-index, dimension 0 first.
    #[inline]
    pub fn indices(&self) -> &[usize; N] {
        &self.indices
    }

    /// Dimensions ordered from fastest to slowest.
    #[inline]
    pub fn permutation(&self) -> &[usize; N] {
        &self.perm
    }

    #[inline]
    fn total(&self) -> usize {
        self.cumprod[self.perm[N - 1]]
    }

    /// True at the one-past-last position.
    #[inline]
    pub fn is_end(&self) -> bool {
        let slowest = self.perm[N - 1];
        self.total() == 0 || self.indices[slowest] >= self.extents[slowest]
    }

    /// Step to the next element (`++`).
    pub fn advance(&mut self) {
        debug_assert!(!self.is_end(), "advancing past the end");
        for i in 0..N {
            let dim = self.perm[i];
            self.indices[dim] += 1;
            if self.indices[dim] < self.extents[dim] || i + 1 == N {
                return;
            }
            self.indices[dim] = 0;
        }
    }

    /// Step to the previous element (`--`).
    pub fn retreat(&mut self) {
        debug_assert!(self.to_linear_idx() > 0, "retreating before the beginning");
        for i in 0..N {
            let dim = self.perm[i];
            if self.indices[dim] > 0 {
                self.indices[dim] -= 1;
                return;
            }
            self.indices[dim] = self.extents[dim] - 1;
        }
    }

    /// Linear ordinal of the current position in traversal order. The end
    /// cursor maps to the element count.
    pub fn to_linear_idx(&self) -> usize {
        let mut n = 0;
        let mut stride = 1;
        for &dim in &self.perm {
            n += self.indices[dim] * stride;
            stride = self.cumprod[dim];
        }
        n
    }

    /// Move to linear ordinal `n`.
    ///
    /// # Panics
    /// Panics unless `0 <= n <= len`.
    pub fn from_linear_idx(&mut self, n: isize) {
        let total = self.total();
        assert!(
            n >= 0 && n as usize <= total,
            "linear index {n} outside [0, {total}]"
        );
        if total == 0 {
            *self = self.into_end();
            return;
        }
        let mut stride = 1usize;
        for i in 0..N {
            let dim = self.perm[i];
            let q = n.div_euclid(stride as isize);
            self.indices[dim] = if i + 1 == N {
                q as usize
            } else {
                cyclic_remainder(q, self.extents[dim])
            };
            stride = self.cumprod[dim];
        }
    }

    /// Random-access step (`+= n`); `n` may be negative.
    pub fn offset_by(&mut self, n: isize) {
        if n != 0 {
            self.from_linear_idx(self.to_linear_idx() as isize + n);
        }
    }

    /// Signed number of steps from `other` to `self`.
    pub fn distance(&self, other: &Self) -> isize {
        debug_assert!(self.same_traversal(other), "cursors of different views");
        self.to_linear_idx() as isize - other.to_linear_idx() as isize
    }

    #[inline]
    fn same_traversal(&self, other: &Self) -> bool {
        self.extents == other.extents && self.perm == other.perm
    }
}

impl<const N: usize> PartialEq for LinearCursor<N> {
    fn eq(&self, other: &Self) -> bool {
        debug_assert!(self.same_traversal(other), "cursors of different views");
        if self.total() == 0 {
            return true;
        }
        self.indices == other.indices
    }
}

impl<const N: usize> Eq for LinearCursor<N> {}

impl<const N: usize> PartialOrd for LinearCursor<N> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<const N: usize> Ord for LinearCursor<N> {
    fn cmp(&self, other: &Self) -> Ordering {
        debug_assert!(self.same_traversal(other), "cursors of different views");
        if self.total() == 0 {
            return Ordering::Equal;
        }
        // most significant (slowest) dimension first
        for &dim in self.perm.iter().rev() {
            match self.indices[dim].cmp(&other.indices[dim]) {
                Ordering::Equal => continue,
                ord => return ord,
            }
        }
        Ordering::Equal
    }
}

impl<const N: usize> AddAssign<isize> for LinearCursor<N> {
    fn add_assign(&mut self, n: isize) {
        self.offset_by(n);
    }
}

impl<const N: usize> SubAssign<isize> for LinearCursor<N> {
    fn sub_assign(&mut self, n: isize) {
        self.offset_by(-n);
    }
}

impl<const N: usize> Add<isize> for LinearCursor<N> {
    type Output = Self;

    fn add(mut self, n: isize) -> Self {
        self.offset_by(n);
        self
    }
}

impl<const N: usize> Sub<isize> for LinearCursor<N> {
    type Output = Self;

    fn sub(mut self, n: isize) -> Self {
        self.offset_by(-n);
        self
    }
}

impl<const N: usize> Sub for LinearCursor<N> {
    type Output = isize;

    fn sub(self, other: Self) -> isize {
        self.distance(&other)
    }
}

// ============================================================================
// Element iterators
// ============================================================================

/// Iterator over the elements of a view in stride order.
///
/// Created by [`StridedArrayView::iter`]. Supports iteration from both ends
/// and `O(rank)` skipping through [`Iterator::nth`].
#[derive(Debug, Clone)]
pub struct LinearIter<'a, T, const N: usize> {
    view: StridedArrayView<'a, T, N>,
    front: LinearCursor<N>,
    back: LinearCursor<N>,
    remaining: usize,
}

impl<'a, T, const N: usize> LinearIter<'a, T, N> {
    fn new(view: StridedArrayView<'a, T, N>) -> Self {
        Self {
            front: view.begin(),
            back: view.end(),
            remaining: view.len(),
            view,
        }
    }

    #[inline]
    fn next_position(&mut self) -> Option<[usize; N]> {
        if self.remaining == 0 {
            return None;
        }
        let indices = *self.front.indices();
        self.remaining -= 1;
        if self.remaining > 0 {
            self.front.advance();
        } else {
            self.front = self.back;
        }
        Some(indices)
    }

    #[inline]
    fn next_back_position(&mut self) -> Option<[usize; N]> {
        if self.remaining == 0 {
            return None;
        }
        self.back.retreat();
        self.remaining -= 1;
        Some(*self.back.indices())
    }

    fn skip_positions(&mut self, n: usize) {
        if n >= self.remaining {
            self.remaining = 0;
            self.front = self.back;
        } else {
            self.front.offset_by(n as isize);
            self.remaining -= n;
        }
    }

    #[inline]
    fn element(&self, indices: &[usize; N]) -> &'a T {
        &self.view.data[self.view.offset_of(indices)]
    }
}

impl<'a, T, const N: usize> Iterator for LinearIter<'a, T, N> {
    type Item = &'a T;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let indices = self.next_position()?;
        Some(self.element(&indices))
    }

    fn nth(&mut self, n: usize) -> Option<Self::Item> {
        self.skip_positions(n);
        self.next()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T, const N: usize> DoubleEndedIterator for LinearIter<'_, T, N> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let indices = self.next_back_position()?;
        Some(self.element(&indices))
    }
}

impl<T, const N: usize> ExactSizeIterator for LinearIter<'_, T, N> {}

impl<T, const N: usize> FusedIterator for LinearIter<'_, T, N> {}

/// Iterator yielding `(indices, element)` pairs in stride order.
///
/// Created by [`StridedArrayView::indexed_iter`].
#[derive(Debug, Clone)]
pub struct IndexedIter<'a, T, const N: usize> {
    inner: LinearIter<'a, T, N>,
}

impl<'a, T, const N: usize> Iterator for IndexedIter<'a, T, N> {
    type Item = ([usize; N], &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        let indices = self.inner.next_position()?;
        Some((indices, self.inner.element(&indices)))
    }

    fn nth(&mut self, n: usize) -> Option<Self::Item> {
        self.inner.skip_positions(n);
        self.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T, const N: usize> DoubleEndedIterator for IndexedIter<'_, T, N> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let indices = self.inner.next_back_position()?;
        Some((indices, self.inner.element(&indices)))
    }
}

impl<T, const N: usize> ExactSizeIterator for IndexedIter<'_, T, N> {}

impl<T, const N: usize> FusedIterator for IndexedIter<'_, T, N> {}

// ============================================================================
// View entry points
// ============================================================================

impl<'a, T, const N: usize> StridedArrayView<'a, T, N> {
    /// Cursor at the first element in traversal order.
    pub fn begin(&self) -> LinearCursor<N> {
        LinearCursor::new_begin(self.extents, &self.strides)
    }

    /// The one-past-last cursor.
    pub fn end(&self) -> LinearCursor<N> {
        LinearCursor::new_end(self.extents, &self.strides)
    }

    /// Element at a cursor position.
    ///
    /// # Panics
    /// Panics on the end cursor.
    pub fn at(&self, cursor: &LinearCursor<N>) -> &'a T {
        assert!(!cursor.is_end(), "dereferencing the end cursor");
        self.get(*cursor.indices())
    }

    /// Iterate over the elements, fastest-varying stride first.
    ///
    /// # Example
    /// ```rust
    /// use sx_strided::StridedArrayView;
    ///
    /// let data = [1, 2, 3, 4];
    /// let view = StridedArrayView::new(&data, [2, 2], [1, 2], 0).unwrap();
    /// // column-major strides: dimension 0 moves fastest
    /// assert_eq!(view.iter().copied().collect::<Vec<_>>(), vec![1, 2, 3, 4]);
    /// ```
    pub fn iter(&self) -> LinearIter<'a, T, N> {
        LinearIter::new(*self)
    }

    /// Iterate over `(indices, element)` pairs in traversal order.
    pub fn indexed_iter(&self) -> IndexedIter<'a, T, N> {
        IndexedIter { inner: self.iter() }
    }
}

impl<T, const N: usize> StridedArrayViewMut<'_, T, N> {
    pub fn begin(&self) -> LinearCursor<N> {
        self.as_view().begin()
    }

    pub fn end(&self) -> LinearCursor<N> {
        self.as_view().end()
    }

    pub fn iter(&self) -> LinearIter<'_, T, N> {
        self.as_view().iter()
    }
}

impl<'a, T, const N: usize> IntoIterator for StridedArrayView<'a, T, N> {
    type Item = &'a T;
    type IntoIter = LinearIter<'a, T, N>;

    fn into_iter(self) -> Self::IntoIter {
        LinearIter::new(self)
    }
}

impl<'a, T, const N: usize> IntoIterator for &StridedArrayView<'a, T, N> {
    type Item = &'a T;
    type IntoIter = LinearIter<'a, T, N>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::Layout;
    use std::collections::HashSet;

    fn iota(n: usize) -> Vec<i32> {
        (0..n as i32).collect()
    }

    #[test]
    fn test_cyclic_remainder() {
        assert_eq!(cyclic_remainder(0, 4), 0);
        assert_eq!(cyclic_remainder(5, 4), 1);
        assert_eq!(cyclic_remainder(-1, 4), 3);
        assert_eq!(cyclic_remainder(-4, 4), 0);
        assert_eq!(cyclic_remainder(-5, 4), 3);
    }

    #[test]
    #[should_panic(expected = "cyclic remainder by zero")]
    fn test_cyclic_remainder_zero_modulus_panics() {
        let _ = cyclic_remainder(3, 0);
    }

    #[test]
    fn test_row_major_traversal() {
        let data = iota(6);
        let view = StridedArrayView::new(&data, [2, 3], [3, 1], 0).unwrap();
        assert_eq!(view.iter().copied().collect::<Vec<_>>(), vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_transposed_traversal_follows_memory() {
        let data = iota(6);
        let view = StridedArrayView::new(&data, [2, 3], [3, 1], 0).unwrap().t();
        assert_eq!(view.iter().copied().collect::<Vec<_>>(), vec![0, 1, 2, 3, 4, 5]);
        let indices: Vec<_> = view.indexed_iter().map(|(i, _)| i).collect();
        assert_eq!(indices[..3], [[0, 0], [1, 0], [2, 0]]);
    }

    #[test]
    fn test_negative_stride_traversal() {
        let data = iota(5);
        let view = StridedArrayView::new(&data, [5], [1], 0).unwrap().reversed(0);
        assert_eq!(view.iter().copied().collect::<Vec<_>>(), vec![4, 3, 2, 1, 0]);
    }

    #[test]
    fn test_end_cursor_shape() {
        let data = iota(24);
        let view = StridedArrayView::new(&data, [2, 3, 4], [12, 4, 1], 0).unwrap();
        let end = view.end();
        assert_eq!(end.indices(), &[2, 0, 0]);
        assert!(end.is_end());
        assert_eq!(end.to_linear_idx(), 24);

        let col = StridedArrayView::with_layout(&data, [2, 3, 4], Layout::ColumnMajor).unwrap();
        assert_eq!(col.end().indices(), &[0, 0, 4]);
    }

    #[test]
    fn test_advance_reaches_end() {
        let data = iota(6);
        let view = StridedArrayView::new(&data, [3, 2], [1, 3], 0).unwrap();
        let mut it = view.begin();
        let end = view.end();
        let mut steps = 0;
        while it != end {
            it.advance();
            steps += 1;
        }
        assert_eq!(steps, 6);
    }

    #[test]
    fn test_retreat_from_end() {
        let data = iota(24);
        let view = StridedArrayView::new(&data, [2, 3, 4], [12, 4, 1], 0).unwrap();
        let mut it = view.end();
        it.retreat();
        assert_eq!(it.indices(), &[1, 2, 3]);
        assert_eq!(*view.at(&it), 23);
        it.retreat();
        assert_eq!(it.indices(), &[1, 2, 2]);
    }

    #[test]
    fn test_random_access_matches_repeated_increment() {
        let data = iota(60);
        let view = StridedArrayView::new(&data, [3, 4, 5], [1, 15, 3], 0).unwrap();
        let begin = view.begin();
        let mut stepped = begin;
        for n in 0..=60 {
            let jumped = begin + n as isize;
            assert_eq!(jumped.indices(), stepped.indices(), "n = {n}");
            assert_eq!(jumped.to_linear_idx(), n);
            if n < 60 {
                stepped.advance();
            }
        }
        assert!(stepped.is_end());
    }

    #[test]
    fn test_negative_offsets() {
        let data = iota(12);
        let view = StridedArrayView::new(&data, [3, 4], [4, 1], 0).unwrap();
        let end = view.end();
        let it = end - 5;
        assert_eq!(it.indices(), &[1, 3]);
        assert_eq!(end - it, 5);
        assert_eq!(it - end, -5);

        let mut back = it;
        back -= 7;
        assert_eq!(back, view.begin());
    }

    #[test]
    #[should_panic(expected = "outside")]
    fn test_offset_past_end_panics() {
        let data = iota(4);
        let view = StridedArrayView::new(&data, [4], [1], 0).unwrap();
        let _ = view.begin() + 5;
    }

    #[test]
    fn test_cursor_ordering() {
        let data = iota(12);
        let view = StridedArrayView::new(&data, [3, 4], [4, 1], 0).unwrap();
        let a = view.begin() + 3;
        let b = view.begin() + 4;
        assert!(a < b);
        assert!(b < view.end());
        assert_eq!(a.cmp(&a), Ordering::Equal);
        // [0, 3] precedes [1, 0] in row-major traversal
        assert_eq!(a.indices(), &[0, 3]);
        assert_eq!(b.indices(), &[1, 0]);
    }

    #[test]
    fn test_empty_view_begin_equals_end() {
        let data: [i32; 0] = [];
        let view = StridedArrayView::new(&data, [3, 0], [1, 3], 0).unwrap();
        assert_eq!(view.begin(), view.end());
        assert!(view.begin().is_end());
        assert_eq!(view.iter().count(), 0);
    }

    #[test]
    fn test_iterator_covers_each_index_once() {
        let data = iota(24);
        let view = StridedArrayView::new(&data, [2, 3, 4], [12, 4, 1], 0)
            .unwrap()
            .permute([2, 0, 1]);
        let seen: HashSet<[usize; 3]> = view.indexed_iter().map(|(i, _)| i).collect();
        assert_eq!(seen.len(), 24);
        for (indices, &value) in view.indexed_iter() {
            assert_eq!(view[indices], value);
        }
    }

    #[test]
    fn test_double_ended_and_exact_size() {
        let data = iota(6);
        let view = StridedArrayView::new(&data, [2, 3], [3, 1], 0).unwrap();
        let mut it = view.iter();
        assert_eq!(it.len(), 6);
        assert_eq!(it.next(), Some(&0));
        assert_eq!(it.next_back(), Some(&5));
        assert_eq!(it.len(), 4);
        let rest: Vec<_> = it.rev().copied().collect();
        assert_eq!(rest, vec![4, 3, 2, 1]);
    }

    #[test]
    fn test_nth_skips() {
        let data = iota(24);
        let view = StridedArrayView::new(&data, [2, 3, 4], [12, 4, 1], 0).unwrap();
        let mut it = view.iter();
        assert_eq!(it.nth(10), Some(&10));
        assert_eq!(it.next(), Some(&11));
        assert_eq!(it.nth(100), None);
        assert_eq!(it.next(), None);
    }

    #[test]
    fn test_into_iterator_for_view() {
        let data = [1.5, 2.5, 3.0];
        let view = StridedArrayView::from_contiguous(&data[..]);
        let mut total = 0.0;
        for x in &view {
            total += x;
        }
        assert_eq!(total, 7.0);
    }
}
