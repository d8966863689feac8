//! Strided array views.
//!
//! This module provides [`StridedArrayView`] and [`StridedArrayViewMut`]:
//! non-owning handles that interpret a borrowed slice as an `N`-dimensional
//! array through per-axis extents and element strides.
//!
//! Key features:
//! - Zero-copy views over borrowed memory
//! - Const-generic rank, so arity errors are compile errors
//! - Arbitrary strides: negative, permuted, overlapping
//! - Lazy transformations (select, slice, permute, transpose, reverse)
//! - Element-wise deep copy between same-shaped views (`<<=`)
//!
//! A view stores the buffer it borrows, the extents, the strides and the
//! offset of element `[0, .., 0]`. Every access is resolved through slice
//! indexing, so a view whose strides were set up wrongly panics instead of
//! reading foreign memory.

use std::fmt;
use std::ops::{Index, IndexMut, ShlAssign};

use crate::slice::{AxisArg, SliceBounds};
use crate::tuple::{Extents, Indices};
use crate::{Result, StridedError};

/// Memory layout used to derive contiguous strides from extents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Layout {
    /// C order: the last index varies fastest.
    #[default]
    RowMajor,
    /// Fortran order: the first index varies fastest.
    ColumnMajor,
}

impl Layout {
    /// Contiguous strides for `extents` in this layout.
    pub fn strides<const N: usize>(self, extents: &[usize; N]) -> [isize; N] {
        match self {
            Layout::RowMajor => row_major_strides(extents),
            Layout::ColumnMajor => col_major_strides(extents),
        }
    }
}

/// Compute row-major strides (C default: last index varies fastest).
///
/// # Panics
/// May panic if the element count overflows `isize`.
pub fn row_major_strides<const N: usize>(extents: &[usize; N]) -> [isize; N] {
    let mut strides = [1isize; N];
    for i in (0..N.saturating_sub(1)).rev() {
        strides[i] = strides[i + 1] * extents[i + 1] as isize;
    }
    strides
}

/// Compute column-major strides (Fortran default: first index varies fastest).
///
/// # Panics
/// May panic if the element count overflows `isize`.
pub fn col_major_strides<const N: usize>(extents: &[usize; N]) -> [isize; N] {
    let mut strides = [1isize; N];
    for i in 1..N {
        strides[i] = strides[i - 1] * extents[i - 1] as isize;
    }
    strides
}

/// Compile-time sized nested arrays that can be viewed with contiguous
/// row-major strides: `[T; A]`, `[[T; B]; A]`, `[[[T; C]; B]; A]` and
/// `[[[[T; D]; C]; B]; A]`.
pub trait FixedArray<T, const N: usize> {
    /// Extents derived from the static shape, outermost first.
    fn extents(&self) -> [usize; N];

    fn as_flat(&self) -> &[T];

    fn as_flat_mut(&mut self) -> &mut [T];
}

impl<T, const A: usize> FixedArray<T, 1> for [T; A] {
    fn extents(&self) -> [usize; 1] {
        [A]
    }

    fn as_flat(&self) -> &[T] {
        self
    }

    fn as_flat_mut(&mut self) -> &mut [T] {
        self
    }
}

impl<T, const A: usize, const B: usize> FixedArray<T, 2> for [[T; B]; A] {
    fn extents(&self) -> [usize; 2] {
        [A, B]
    }

    fn as_flat(&self) -> &[T] {
        self.as_flattened()
    }

    fn as_flat_mut(&mut self) -> &mut [T] {
        self.as_flattened_mut()
    }
}

impl<T, const A: usize, const B: usize, const C: usize> FixedArray<T, 3> for [[[T; C]; B]; A] {
    fn extents(&self) -> [usize; 3] {
        [A, B, C]
    }

    fn as_flat(&self) -> &[T] {
        self.as_flattened().as_flattened()
    }

    fn as_flat_mut(&mut self) -> &mut [T] {
        self.as_flattened_mut().as_flattened_mut()
    }
}

impl<T, const A: usize, const B: usize, const C: usize, const D: usize> FixedArray<T, 4>
    for [[[[T; D]; C]; B]; A]
{
    fn extents(&self) -> [usize; 4] {
        [A, B, C, D]
    }

    fn as_flat(&self) -> &[T] {
        self.as_flattened().as_flattened().as_flattened()
    }

    fn as_flat_mut(&mut self) -> &mut [T] {
        self.as_flattened_mut()
            .as_flattened_mut()
            .as_flattened_mut()
    }
}

// ============================================================================
// StridedArrayView
// ============================================================================

/// An immutable strided view over borrowed memory.
///
/// # Type Parameters
/// - `'a`: Lifetime of the underlying data
/// - `T`: Element type
/// - `N`: Number of dimensions (const generic)
///
/// Views are `Copy`: assigning one view to another replaces the buffer,
/// extents and strides together.
///
/// # Example
/// ```rust
/// use sx_strided::StridedArrayView;
///
/// let data = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
/// let view: StridedArrayView<'_, f64, 2> =
///     StridedArrayView::new(&data, [2, 3], [3, 1], 0).unwrap();
/// assert_eq!(view[[1, 0]], 4.0);
/// ```
pub struct StridedArrayView<'a, T, const N: usize> {
    pub(crate) data: &'a [T],
    pub(crate) extents: [usize; N],
    pub(crate) strides: [isize; N],
    pub(crate) offset: usize,
}

impl<T, const N: usize> Clone for StridedArrayView<'_, T, N> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, const N: usize> Copy for StridedArrayView<'_, T, N> {}

impl<T, const N: usize> fmt::Debug for StridedArrayView<'_, T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StridedArrayView")
            .field("extents", &self.extents)
            .field("strides", &self.strides)
            .field("offset", &self.offset)
            .finish()
    }
}

impl<'a, T, const N: usize> StridedArrayView<'a, T, N> {
    /// Create a new strided view.
    ///
    /// # Arguments
    /// - `data`: The underlying buffer
    /// - `extents`: Size of each dimension
    /// - `strides`: Stride for each dimension (in elements, can be negative)
    /// - `offset`: Position of element `[0, .., 0]` in `data`
    ///
    /// # Errors
    /// Returns an error if some reachable element lies outside `data`.
    pub fn new(
        data: &'a [T],
        extents: impl Into<Extents<N>>,
        strides: [isize; N],
        offset: usize,
    ) -> Result<Self> {
        let extents = extents.into().into_array();
        validate_bounds(data.len(), &extents, &strides, offset)?;
        Ok(Self {
            data,
            extents,
            strides,
            offset,
        })
    }

    /// Create a view without bounds validation.
    ///
    /// # Safety
    /// The caller must ensure that every in-bounds multi-index maps inside
    /// `data`. Accesses are still checked by slice indexing, so a violation
    /// panics on access rather than reading foreign memory.
    pub unsafe fn new_unchecked(
        data: &'a [T],
        extents: [usize; N],
        strides: [isize; N],
        offset: usize,
    ) -> Self {
        Self {
            data,
            extents,
            strides,
            offset,
        }
    }

    /// Assemble a view from parts the caller already validated.
    #[inline]
    pub(crate) fn from_parts(
        data: &'a [T],
        extents: [usize; N],
        strides: [isize; N],
        offset: usize,
    ) -> Self {
        Self {
            data,
            extents,
            strides,
            offset,
        }
    }

    /// Create a contiguous view with strides derived from `layout`.
    pub fn with_layout(data: &'a [T], extents: impl Into<Extents<N>>, layout: Layout) -> Result<Self> {
        let extents = extents.into();
        check_capacity(data.len(), &extents)?;
        let extents = extents.into_array();
        Ok(Self {
            data,
            strides: layout.strides(&extents),
            extents,
            offset: 0,
        })
    }

    /// View a fixed-size nested array with its static shape.
    pub fn from_array<A: FixedArray<T, N> + ?Sized>(array: &'a A) -> Self {
        let extents = array.extents();
        Self {
            data: array.as_flat(),
            strides: row_major_strides(&extents),
            extents,
            offset: 0,
        }
    }

    /// Returns the extent of each dimension.
    #[inline]
    pub fn extents(&self) -> &[usize; N] {
        &self.extents
    }

    /// Returns the extent of dimension `dim`.
    #[inline]
    pub fn extent(&self, dim: usize) -> usize {
        self.extents[dim]
    }

    /// Returns the stride for each dimension.
    #[inline]
    pub fn strides(&self) -> &[isize; N] {
        &self.strides
    }

    /// Returns the stride of dimension `dim`.
    #[inline]
    pub fn stride(&self, dim: usize) -> isize {
        self.strides[dim]
    }

    /// Returns the position of element `[0, .., 0]` in the buffer.
    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Returns the number of dimensions.
    #[inline]
    pub fn ndim(&self) -> usize {
        N
    }

    /// Returns the total number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.extents.iter().product()
    }

    /// Returns true if any extent is zero.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.extents.contains(&0)
    }

    /// Returns the whole borrowed buffer.
    #[inline]
    pub fn data(&self) -> &'a [T] {
        self.data
    }

    /// Returns a raw pointer to element `[0, .., 0]`.
    #[inline]
    pub fn as_ptr(&self) -> *const T {
        self.data.as_ptr().wrapping_add(self.offset)
    }

    /// True if both views describe the same elements of the same buffer.
    pub fn is_same_view(&self, other: &StridedArrayView<'_, T, N>) -> bool {
        std::ptr::eq(self.as_ptr(), other.as_ptr())
            && self.extents == other.extents
            && self.strides == other.strides
    }

    /// Check if the view is contiguous in memory (row-major order).
    pub fn is_contiguous(&self) -> bool {
        let mut expected = 1isize;
        for i in (0..N).rev() {
            if self.extents[i] <= 1 {
                continue;
            }
            if self.strides[i] != expected {
                return false;
            }
            expected *= self.extents[i] as isize;
        }
        true
    }

    /// Get the contiguous slice if the whole view is row-major contiguous.
    pub fn as_slice(&self) -> Option<&'a [T]> {
        // an empty view may carry any offset
        if self.is_empty() {
            return Some(&[]);
        }
        if self.is_contiguous() {
            let len = self.len();
            Some(&self.data[self.offset..self.offset + len])
        } else {
            None
        }
    }

    /// Compute the buffer position for the given multi-index.
    #[inline]
    pub(crate) fn offset_of(&self, indices: &[usize; N]) -> usize {
        linear_offset(self.offset, &self.strides, indices)
    }

    /// Get the element at the given index.
    ///
    /// # Panics
    /// Panics if any coordinate is out of range.
    #[inline]
    pub fn get(&self, indices: [usize; N]) -> &'a T {
        check_index(&self.extents, &indices);
        &self.data[self.offset_of(&indices)]
    }

    /// Get the element at the given index, or `None` if it is out of range.
    #[inline]
    pub fn try_get(&self, indices: [usize; N]) -> Option<&'a T> {
        if indices.iter().zip(&self.extents).any(|(&i, &e)| i >= e) {
            return None;
        }
        self.data.get(self.offset_of(&indices))
    }

    /// Get an element without checking coordinates against the extents.
    ///
    /// # Safety
    /// The index must be within the extents and the view must have been
    /// constructed with valid strides.
    #[inline]
    pub unsafe fn get_unchecked(&self, indices: [usize; N]) -> &'a T {
        self.data.get_unchecked(self.offset_of(&indices))
    }

    /// Restrict every dimension to a sub-range, keeping the rank.
    ///
    /// # Panics
    /// Panics if a slice does not fit inside its dimension.
    pub fn slice(&self, bounds: [SliceBounds; N]) -> Self {
        match self.try_slice(bounds) {
            Ok(view) => view,
            Err(err) => panic!("invalid slice: {err}"),
        }
    }

    /// Fallible form of [`StridedArrayView::slice`].
    pub fn try_slice(&self, bounds: [SliceBounds; N]) -> Result<Self> {
        let (extents, offset) = slice_layout(&self.extents, &self.strides, self.offset, &bounds)?;
        Ok(Self {
            data: self.data,
            extents,
            strides: self.strides,
            offset,
        })
    }

    /// Mixed index/slice selection.
    ///
    /// An [`AxisArg::Index`] fixes that coordinate and removes the dimension;
    /// an [`AxisArg::Slice`] keeps it. The result rank `M` must equal the
    /// number of slice arguments and be at least 1. For an all-index
    /// argument list use [`get`](Self::get), which returns the element.
    ///
    /// # Panics
    /// Panics if the number of slices differs from `M` or an argument does
    /// not fit its dimension.
    ///
    /// # Example
    /// ```rust
    /// use sx_strided::{s, StridedArrayView};
    ///
    /// let data: Vec<i32> = (0..24).collect();
    /// let v: StridedArrayView<'_, i32, 3> = StridedArrayView::new(&data, [2, 3, 4], [12, 4, 1], 0).unwrap();
    /// let col: StridedArrayView<'_, i32, 1> = v.select(s![1, .., 2]);
    /// assert_eq!(col.iter().copied().collect::<Vec<_>>(), vec![14, 18, 22]);
    /// ```
    ///
    /// Selecting with indices only does not compile:
    /// ```compile_fail
    /// use sx_strided::{s, StridedArrayView};
    ///
    /// let data = [1, 2, 3, 4];
    /// let v: StridedArrayView<'_, i32, 2> = StridedArrayView::new(&data, [2, 2], [2, 1], 0).unwrap();
    /// let _scalar: StridedArrayView<'_, i32, 0> = v.select(s![1, 1]);
    /// ```
    pub fn select<const M: usize>(&self, args: [AxisArg; N]) -> StridedArrayView<'a, T, M> {
        match self.try_select(args) {
            Ok(view) => view,
            Err(err) => panic!("invalid selection: {err}"),
        }
    }

    /// Fallible form of [`StridedArrayView::select`].
    pub fn try_select<const M: usize>(&self, args: [AxisArg; N]) -> Result<StridedArrayView<'a, T, M>> {
        let (extents, strides, offset) =
            select_layout::<N, M>(&self.extents, &self.strides, self.offset, &args)?;
        Ok(StridedArrayView {
            data: self.data,
            extents,
            strides,
            offset,
        })
    }

    /// Fix dimension `axis` at `index`, returning a view of rank `N - 1`.
    ///
    /// # Panics
    /// Panics if `axis` or `index` is out of range.
    pub fn index_axis<const M: usize>(&self, axis: usize, index: usize) -> StridedArrayView<'a, T, M> {
        const { assert!(M + 1 == N, "index_axis removes exactly one dimension") };
        let (extents, strides, offset) =
            index_axis_layout::<N, M>(&self.extents, &self.strides, self.offset, axis, index);
        StridedArrayView {
            data: self.data,
            extents,
            strides,
            offset,
        }
    }

    /// Permute dimensions according to the given permutation.
    ///
    /// # Panics
    /// Panics if `perm` is not a permutation of `0..N`.
    pub fn permute(self, perm: [usize; N]) -> Self {
        let (extents, strides) = permute_layout(&self.extents, &self.strides, &perm);
        Self {
            extents,
            strides,
            ..self
        }
    }

    /// Reverse dimension `axis` by negating its stride.
    pub fn reversed(self, axis: usize) -> Self {
        let (strides, offset) = reverse_layout(&self.extents, &self.strides, self.offset, axis);
        Self {
            strides,
            offset,
            ..self
        }
    }
}

// 2D-specific operations
impl<'a, T> StridedArrayView<'a, T, 2> {
    /// Transpose a 2D view (swap dimensions).
    ///
    /// This is a zero-copy operation that just swaps extents and strides.
    #[inline]
    pub fn t(self) -> StridedArrayView<'a, T, 2> {
        self.permute([1, 0])
    }

    /// Number of rows.
    #[inline]
    pub fn nrows(&self) -> usize {
        self.extents[0]
    }

    /// Number of columns.
    #[inline]
    pub fn ncols(&self) -> usize {
        self.extents[1]
    }
}

impl<'a, T> StridedArrayView<'a, T, 1> {
    /// View any contiguous source (anything with a length and a data
    /// pointer, e.g. `Vec<T>`, `[T]`, `Box<[T]>`) with unit stride.
    pub fn from_contiguous<S: AsRef<[T]> + ?Sized>(source: &'a S) -> Self {
        let data = source.as_ref();
        Self {
            data,
            extents: [data.len()],
            strides: [1],
            offset: 0,
        }
    }
}

impl<'a, T> From<&'a [T]> for StridedArrayView<'a, T, 1> {
    fn from(data: &'a [T]) -> Self {
        Self::from_contiguous(data)
    }
}

impl<'a, T> From<&'a Vec<T>> for StridedArrayView<'a, T, 1> {
    fn from(data: &'a Vec<T>) -> Self {
        Self::from_contiguous(data)
    }
}

impl<'a, T, const N: usize> From<StridedArrayViewMut<'a, T, N>> for StridedArrayView<'a, T, N> {
    fn from(view: StridedArrayViewMut<'a, T, N>) -> Self {
        view.into_view()
    }
}

impl<T, const N: usize> Index<[usize; N]> for StridedArrayView<'_, T, N> {
    type Output = T;

    #[inline]
    fn index(&self, indices: [usize; N]) -> &T {
        self.get(indices)
    }
}

impl<T, const N: usize> Index<Indices<N>> for StridedArrayView<'_, T, N> {
    type Output = T;

    #[inline]
    fn index(&self, indices: Indices<N>) -> &T {
        self.get(indices.into_array())
    }
}

// ============================================================================
// StridedArrayViewMut
// ============================================================================

/// A mutable strided view over borrowed memory.
///
/// Same as [`StridedArrayView`] but allows writes. Layout transformations
/// consume the view so that two mutable aliases never coexist.
pub struct StridedArrayViewMut<'a, T, const N: usize> {
    data: &'a mut [T],
    extents: [usize; N],
    strides: [isize; N],
    offset: usize,
}

impl<T, const N: usize> fmt::Debug for StridedArrayViewMut<'_, T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StridedArrayViewMut")
            .field("extents", &self.extents)
            .field("strides", &self.strides)
            .field("offset", &self.offset)
            .finish()
    }
}

impl<'a, T, const N: usize> StridedArrayViewMut<'a, T, N> {
    /// Create a new mutable strided view.
    ///
    /// # Errors
    /// Returns an error if some reachable element lies outside `data`.
    pub fn new(
        data: &'a mut [T],
        extents: impl Into<Extents<N>>,
        strides: [isize; N],
        offset: usize,
    ) -> Result<Self> {
        let extents = extents.into().into_array();
        validate_bounds(data.len(), &extents, &strides, offset)?;
        Ok(Self {
            data,
            extents,
            strides,
            offset,
        })
    }

    /// Create a view without bounds validation.
    ///
    /// # Safety
    /// The caller must ensure that every in-bounds multi-index maps inside
    /// `data`.
    pub unsafe fn new_unchecked(
        data: &'a mut [T],
        extents: [usize; N],
        strides: [isize; N],
        offset: usize,
    ) -> Self {
        Self {
            data,
            extents,
            strides,
            offset,
        }
    }

    #[inline]
    pub(crate) fn from_parts(
        data: &'a mut [T],
        extents: [usize; N],
        strides: [isize; N],
        offset: usize,
    ) -> Self {
        Self {
            data,
            extents,
            strides,
            offset,
        }
    }

    /// Create a contiguous mutable view with strides derived from `layout`.
    pub fn with_layout(
        data: &'a mut [T],
        extents: impl Into<Extents<N>>,
        layout: Layout,
    ) -> Result<Self> {
        let extents = extents.into();
        check_capacity(data.len(), &extents)?;
        let extents = extents.into_array();
        Ok(Self {
            data,
            strides: layout.strides(&extents),
            extents,
            offset: 0,
        })
    }

    /// Mutably view a fixed-size nested array with its static shape.
    pub fn from_array<A: FixedArray<T, N> + ?Sized>(array: &'a mut A) -> Self {
        let extents = array.extents();
        Self {
            data: array.as_flat_mut(),
            strides: row_major_strides(&extents),
            extents,
            offset: 0,
        }
    }

    #[inline]
    pub fn extents(&self) -> &[usize; N] {
        &self.extents
    }

    #[inline]
    pub fn extent(&self, dim: usize) -> usize {
        self.extents[dim]
    }

    #[inline]
    pub fn strides(&self) -> &[isize; N] {
        &self.strides
    }

    #[inline]
    pub fn stride(&self, dim: usize) -> isize {
        self.strides[dim]
    }

    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    #[inline]
    pub fn ndim(&self) -> usize {
        N
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.extents.iter().product()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.extents.contains(&0)
    }

    /// Returns a raw pointer to element `[0, .., 0]`.
    #[inline]
    pub fn as_ptr(&self) -> *const T {
        self.data.as_ptr().wrapping_add(self.offset)
    }

    /// Returns a mutable raw pointer to element `[0, .., 0]`.
    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.data.as_mut_ptr().wrapping_add(self.offset)
    }

    #[inline]
    pub(crate) fn offset_of(&self, indices: &[usize; N]) -> usize {
        linear_offset(self.offset, &self.strides, indices)
    }

    /// Reborrow as an immutable view.
    #[inline]
    pub fn as_view(&self) -> StridedArrayView<'_, T, N> {
        StridedArrayView {
            data: self.data,
            extents: self.extents,
            strides: self.strides,
            offset: self.offset,
        }
    }

    /// Convert into an immutable view with the full lifetime.
    #[inline]
    pub fn into_view(self) -> StridedArrayView<'a, T, N> {
        StridedArrayView {
            data: self.data,
            extents: self.extents,
            strides: self.strides,
            offset: self.offset,
        }
    }

    /// Reborrow as a shorter-lived mutable view.
    #[inline]
    pub fn reborrow(&mut self) -> StridedArrayViewMut<'_, T, N> {
        StridedArrayViewMut {
            data: self.data,
            extents: self.extents,
            strides: self.strides,
            offset: self.offset,
        }
    }

    /// Get the element at the given index.
    ///
    /// # Panics
    /// Panics if any coordinate is out of range.
    #[inline]
    pub fn get(&self, indices: [usize; N]) -> &T {
        check_index(&self.extents, &indices);
        &self.data[self.offset_of(&indices)]
    }

    /// Get a mutable reference to the element at the given index.
    ///
    /// # Panics
    /// Panics if any coordinate is out of range.
    #[inline]
    pub fn get_mut(&mut self, indices: [usize; N]) -> &mut T {
        check_index(&self.extents, &indices);
        let pos = self.offset_of(&indices);
        &mut self.data[pos]
    }

    /// Set the element at the given index.
    ///
    /// # Panics
    /// Panics if any coordinate is out of range.
    #[inline]
    pub fn set(&mut self, indices: [usize; N], value: T) {
        *self.get_mut(indices) = value;
    }

    /// Restrict every dimension to a sub-range, keeping the rank.
    ///
    /// # Panics
    /// Panics if a slice does not fit inside its dimension.
    pub fn slice(self, bounds: [SliceBounds; N]) -> Self {
        match self.try_slice(bounds) {
            Ok(view) => view,
            Err(err) => panic!("invalid slice: {err}"),
        }
    }

    /// Fallible form of [`StridedArrayViewMut::slice`].
    pub fn try_slice(self, bounds: [SliceBounds; N]) -> Result<Self> {
        let (extents, offset) = slice_layout(&self.extents, &self.strides, self.offset, &bounds)?;
        Ok(Self {
            extents,
            offset,
            ..self
        })
    }

    /// Mixed index/slice selection; see [`StridedArrayView::select`].
    pub fn select<const M: usize>(self, args: [AxisArg; N]) -> StridedArrayViewMut<'a, T, M> {
        match self.try_select(args) {
            Ok(view) => view,
            Err(err) => panic!("invalid selection: {err}"),
        }
    }

    /// Fallible form of [`StridedArrayViewMut::select`].
    pub fn try_select<const M: usize>(
        self,
        args: [AxisArg; N],
    ) -> Result<StridedArrayViewMut<'a, T, M>> {
        let (extents, strides, offset) =
            select_layout::<N, M>(&self.extents, &self.strides, self.offset, &args)?;
        Ok(StridedArrayViewMut {
            data: self.data,
            extents,
            strides,
            offset,
        })
    }

    /// Fix dimension `axis` at `index`, returning a view of rank `N - 1`.
    pub fn index_axis<const M: usize>(self, axis: usize, index: usize) -> StridedArrayViewMut<'a, T, M> {
        const { assert!(M + 1 == N, "index_axis removes exactly one dimension") };
        let (extents, strides, offset) =
            index_axis_layout::<N, M>(&self.extents, &self.strides, self.offset, axis, index);
        StridedArrayViewMut {
            data: self.data,
            extents,
            strides,
            offset,
        }
    }

    /// Permute dimensions, consuming the mutable view.
    pub fn permute(self, perm: [usize; N]) -> Self {
        let (extents, strides) = permute_layout(&self.extents, &self.strides, &perm);
        Self {
            extents,
            strides,
            ..self
        }
    }

    /// Reverse dimension `axis` by negating its stride.
    pub fn reversed(self, axis: usize) -> Self {
        let (strides, offset) = reverse_layout(&self.extents, &self.strides, self.offset, axis);
        Self {
            strides,
            offset,
            ..self
        }
    }

    /// Apply `f` to every element in traversal order.
    ///
    /// Overlapping strides visit a shared element once per index that maps
    /// to it.
    pub fn map_inplace(&mut self, mut f: impl FnMut(&mut T)) {
        let mut cursor = self.as_view().begin();
        let end = self.as_view().end();
        while cursor != end {
            let pos = self.offset_of(cursor.indices());
            f(&mut self.data[pos]);
            cursor.advance();
        }
    }

    /// Set every element to `value`.
    pub fn fill(&mut self, value: T)
    where
        T: Clone,
    {
        self.map_inplace(|x| *x = value.clone());
    }

    /// Deep copy from a view of identical extents, element by element.
    ///
    /// Elements are written in this view's traversal order; the source is
    /// read at the same logical index, so differing strides are fine.
    ///
    /// # Errors
    /// Returns [`StridedError::ShapeMismatch`] if the extents differ.
    pub fn copy_from<U>(&mut self, src: &StridedArrayView<'_, U, N>) -> Result<()>
    where
        U: Clone,
        T: From<U>,
    {
        if self.extents != src.extents {
            return Err(StridedError::ShapeMismatch(
                self.extents.to_vec(),
                src.extents.to_vec(),
            ));
        }
        let mut cursor = self.as_view().begin();
        let end = self.as_view().end();
        while cursor != end {
            let indices = *cursor.indices();
            let pos = self.offset_of(&indices);
            self.data[pos] = T::from(src.get(indices).clone());
            cursor.advance();
        }
        Ok(())
    }
}

impl<'a, T> StridedArrayViewMut<'a, T, 1> {
    /// Mutably view any contiguous source with unit stride.
    pub fn from_contiguous<S: AsMut<[T]> + ?Sized>(source: &'a mut S) -> Self {
        let data = source.as_mut();
        Self {
            extents: [data.len()],
            strides: [1],
            offset: 0,
            data,
        }
    }

    /// Deep copy from a sequence whose length equals the extent.
    pub fn copy_from_slice<U>(&mut self, src: &[U]) -> Result<()>
    where
        U: Clone,
        T: From<U>,
    {
        self.copy_from(&StridedArrayView::from_contiguous(src))
    }
}

impl<'a, T> From<&'a mut [T]> for StridedArrayViewMut<'a, T, 1> {
    fn from(data: &'a mut [T]) -> Self {
        Self::from_contiguous(data)
    }
}

impl<'a, T> From<&'a mut Vec<T>> for StridedArrayViewMut<'a, T, 1> {
    fn from(data: &'a mut Vec<T>) -> Self {
        Self::from_contiguous(data)
    }
}

impl<T, const N: usize> Index<[usize; N]> for StridedArrayViewMut<'_, T, N> {
    type Output = T;

    #[inline]
    fn index(&self, indices: [usize; N]) -> &T {
        self.get(indices)
    }
}

impl<T, const N: usize> IndexMut<[usize; N]> for StridedArrayViewMut<'_, T, N> {
    #[inline]
    fn index_mut(&mut self, indices: [usize; N]) -> &mut T {
        self.get_mut(indices)
    }
}

impl<T, const N: usize> Index<Indices<N>> for StridedArrayViewMut<'_, T, N> {
    type Output = T;

    #[inline]
    fn index(&self, indices: Indices<N>) -> &T {
        self.get(indices.into_array())
    }
}

impl<T, const N: usize> IndexMut<Indices<N>> for StridedArrayViewMut<'_, T, N> {
    #[inline]
    fn index_mut(&mut self, indices: Indices<N>) -> &mut T {
        self.get_mut(indices.into_array())
    }
}

// ============================================================================
// Deep copy operator (`dst <<= src`)
// ============================================================================

fn copy_or_panic<T, U, const N: usize>(
    dst: &mut StridedArrayViewMut<'_, T, N>,
    src: &StridedArrayView<'_, U, N>,
) where
    U: Clone,
    T: From<U>,
{
    if let Err(err) = dst.copy_from(src) {
        panic!("`<<=` requires identical extents: {err}");
    }
}

impl<T, U, const N: usize> ShlAssign<StridedArrayView<'_, U, N>> for StridedArrayViewMut<'_, T, N>
where
    U: Clone,
    T: From<U>,
{
    fn shl_assign(&mut self, src: StridedArrayView<'_, U, N>) {
        copy_or_panic(self, &src);
    }
}

impl<T, U, const N: usize> ShlAssign<&StridedArrayViewMut<'_, U, N>>
    for StridedArrayViewMut<'_, T, N>
where
    U: Clone,
    T: From<U>,
{
    fn shl_assign(&mut self, src: &StridedArrayViewMut<'_, U, N>) {
        copy_or_panic(self, &src.as_view());
    }
}

impl<T, U> ShlAssign<&[U]> for StridedArrayViewMut<'_, T, 1>
where
    U: Clone,
    T: From<U>,
{
    fn shl_assign(&mut self, src: &[U]) {
        copy_or_panic(self, &StridedArrayView::from_contiguous(src));
    }
}

// ============================================================================
// Layout helpers
// ============================================================================

#[inline]
fn linear_offset<const N: usize>(offset: usize, strides: &[isize; N], indices: &[usize; N]) -> usize {
    let mut pos = offset as isize;
    for i in 0..N {
        pos += indices[i] as isize * strides[i];
    }
    pos as usize
}

#[inline]
fn check_index<const N: usize>(extents: &[usize; N], indices: &[usize; N]) {
    for i in 0..N {
        assert!(
            indices[i] < extents[i],
            "index {} out of bounds for dim {} with extent {}",
            indices[i],
            i,
            extents[i]
        );
    }
}

/// Move `offset` by `steps` along an axis with `stride`.
#[inline]
fn shift(offset: usize, steps: usize, stride: isize) -> usize {
    (offset as isize + steps as isize * stride) as usize
}

fn check_capacity<const N: usize>(len: usize, extents: &Extents<N>) -> Result<()> {
    // Layout strides are partial products of the nonzero extents.
    extents
        .iter()
        .try_fold(1usize, |acc, &e| acc.checked_mul(e.max(1)))
        .filter(|&n| n <= isize::MAX as usize)
        .ok_or(StridedError::OffsetOverflow)?;
    let required = extents.product();
    if required > len {
        return Err(StridedError::BufferTooSmall { required, len });
    }
    Ok(())
}

// An empty result keeps the parent offset so its origin never leaves the buffer.
fn slice_layout<const N: usize>(
    extents: &[usize; N],
    strides: &[isize; N],
    offset: usize,
    bounds: &[SliceBounds; N],
) -> Result<([usize; N], usize)> {
    let mut new_extents = [0usize; N];
    let mut new_offset = offset;
    for axis in 0..N {
        let (from, len) = bounds[axis].try_resolve(axis, extents[axis])?;
        new_extents[axis] = len;
        if len > 0 {
            new_offset = shift(new_offset, from, strides[axis]);
        }
    }
    if new_extents.contains(&0) {
        new_offset = offset;
    }
    Ok((new_extents, new_offset))
}

fn select_layout<const N: usize, const M: usize>(
    extents: &[usize; N],
    strides: &[isize; N],
    offset: usize,
    args: &[AxisArg; N],
) -> Result<([usize; M], [isize; M], usize)> {
    const { assert!(M <= N, "a selection cannot increase the rank") };
    const { assert!(M > 0, "a selection needs a slice argument; use `get` for all-index access") };
    let kept = args.iter().filter(|a| a.is_slice()).count();
    if kept != M {
        return Err(StridedError::RankMismatch(kept, M));
    }

    let mut new_extents = [0usize; M];
    let mut new_strides = [0isize; M];
    let mut new_offset = offset;
    let mut out = 0;
    for axis in 0..N {
        match args[axis] {
            AxisArg::Index(i) => {
                if i >= extents[axis] {
                    return Err(StridedError::SliceOutOfBounds {
                        axis,
                        from: i,
                        len: 1,
                        extent: extents[axis],
                    });
                }
                new_offset = shift(new_offset, i, strides[axis]);
            }
            AxisArg::Slice(bounds) => {
                let (from, len) = bounds.try_resolve(axis, extents[axis])?;
                if len > 0 {
                    new_offset = shift(new_offset, from, strides[axis]);
                }
                new_extents[out] = len;
                new_strides[out] = strides[axis];
                out += 1;
            }
        }
    }
    if new_extents.contains(&0) {
        new_offset = offset;
    }
    Ok((new_extents, new_strides, new_offset))
}

fn index_axis_layout<const N: usize, const M: usize>(
    extents: &[usize; N],
    strides: &[isize; N],
    offset: usize,
    axis: usize,
    index: usize,
) -> ([usize; M], [isize; M], usize) {
    assert!(axis < N, "invalid axis {axis} for rank {N}");
    assert!(
        index < extents[axis],
        "index {index} out of bounds for dim {axis} with extent {}",
        extents[axis]
    );
    let mut new_extents = [0usize; M];
    let mut new_strides = [0isize; M];
    for (out, dim) in (0..N).filter(|&d| d != axis).enumerate() {
        new_extents[out] = extents[dim];
        new_strides[out] = strides[dim];
    }
    (new_extents, new_strides, shift(offset, index, strides[axis]))
}

fn permute_layout<const N: usize>(
    extents: &[usize; N],
    strides: &[isize; N],
    perm: &[usize; N],
) -> ([usize; N], [isize; N]) {
    assert!(is_permutation(perm), "invalid permutation {perm:?}");
    (
        std::array::from_fn(|i| extents[perm[i]]),
        std::array::from_fn(|i| strides[perm[i]]),
    )
}

fn reverse_layout<const N: usize>(
    extents: &[usize; N],
    strides: &[isize; N],
    offset: usize,
    axis: usize,
) -> ([isize; N], usize) {
    assert!(axis < N, "invalid axis {axis} for rank {N}");
    let mut new_strides = *strides;
    new_strides[axis] = -strides[axis];
    let new_offset = if extents.contains(&0) {
        offset
    } else {
        shift(offset, extents[axis] - 1, strides[axis])
    };
    (new_strides, new_offset)
}

/// Validate that all reachable offsets stay within `[0, len)`.
fn validate_bounds<const N: usize>(
    len: usize,
    extents: &[usize; N],
    strides: &[isize; N],
    offset: usize,
) -> Result<()> {
    // Empty array - no access needed
    if extents.contains(&0) {
        return Ok(());
    }
    let mut min_offset = isize::try_from(offset).map_err(|_| StridedError::OffsetOverflow)?;
    let mut max_offset = min_offset;
    for (&extent, &stride) in extents.iter().zip(strides.iter()) {
        if extent > 1 {
            let end = stride
                .checked_mul(extent as isize - 1)
                .ok_or(StridedError::OffsetOverflow)?;
            if end >= 0 {
                max_offset = max_offset
                    .checked_add(end)
                    .ok_or(StridedError::OffsetOverflow)?;
            } else {
                min_offset = min_offset
                    .checked_add(end)
                    .ok_or(StridedError::OffsetOverflow)?;
            }
        }
    }
    if min_offset < 0 || max_offset as usize >= len {
        return Err(StridedError::OffsetOverflow);
    }
    Ok(())
}

fn is_permutation<const N: usize>(perm: &[usize; N]) -> bool {
    let mut seen = [false; N];
    for &p in perm {
        if p >= N || seen[p] {
            return false;
        }
        seen[p] = true;
    }
    true
}

// ============================================================================
// Rayon parallel iteration support (feature-gated)
// ============================================================================

#[cfg(feature = "parallel")]
mod parallel {
    use super::*;
    use rayon::iter::plumbing::{bridge_unindexed, Folder, UnindexedConsumer, UnindexedProducer};
    use rayon::prelude::*;

    /// Splits a view along its largest dimension until the halves are
    /// single lanes, then walks each part in stride order.
    struct StridedProducer<'a, T, const N: usize> {
        view: StridedArrayView<'a, T, N>,
    }

    impl<'a, T: Sync, const N: usize> UnindexedProducer for StridedProducer<'a, T, N> {
        type Item = &'a T;

        fn split(self) -> (Self, Option<Self>) {
            let view = self.view;
            let Some((max_dim, &max_extent)) =
                view.extents.iter().enumerate().max_by_key(|&(_, e)| *e)
            else {
                return (self, None);
            };
            if max_extent <= 1 {
                return (self, None);
            }

            let mid = max_extent / 2;
            let mut left = view;
            let mut right = view;
            left.extents[max_dim] = mid;
            right.extents[max_dim] = max_extent - mid;
            right.offset = shift(view.offset, mid, view.strides[max_dim]);

            (Self { view: left }, Some(Self { view: right }))
        }

        fn fold_with<F>(self, folder: F) -> F
        where
            F: Folder<Self::Item>,
        {
            folder.consume_iter(self.view.iter())
        }
    }

    /// Parallel iterator over the elements of a [`StridedArrayView`].
    pub struct ParStridedIter<'a, T, const N: usize> {
        view: StridedArrayView<'a, T, N>,
    }

    impl<'a, T: Sync, const N: usize> ParallelIterator for ParStridedIter<'a, T, N> {
        type Item = &'a T;

        fn drive_unindexed<C>(self, consumer: C) -> C::Result
        where
            C: UnindexedConsumer<Self::Item>,
        {
            bridge_unindexed(StridedProducer { view: self.view }, consumer)
        }
    }

    impl<'a, T: Sync, const N: usize> StridedArrayView<'a, T, N> {
        /// Returns a parallel iterator over the elements.
        ///
        /// # Example
        /// ```ignore
        /// use rayon::prelude::*;
        ///
        /// let total: f64 = view.par_iter().sum();
        /// ```
        pub fn par_iter(&self) -> ParStridedIter<'a, T, N> {
            ParStridedIter { view: *self }
        }
    }

    impl<'a, T: Sync, const N: usize> IntoParallelIterator for &StridedArrayView<'a, T, N> {
        type Item = &'a T;
        type Iter = ParStridedIter<'a, T, N>;

        fn into_par_iter(self) -> Self::Iter {
            self.par_iter()
        }
    }
}

#[cfg(feature = "parallel")]
pub use parallel::ParStridedIter;
