//! Owned contiguous N-dimensional array.
//!
//! [`MultiArray`] owns a `Vec<T>` holding exactly `product(extents)`
//! elements in a [`Layout`]. Views are obtained through the explicit
//! [`MultiArray::view`] / [`MultiArray::view_mut`] accessors and borrow the
//! array, so no view can outlive a reallocation.

use std::ops::{Index, IndexMut, ShlAssign};

use crate::iter::LinearCursor;
use crate::tuple::Extents;
use crate::view::{Layout, StridedArrayView, StridedArrayViewMut};
use crate::{Result, StridedError};

/// Owned N-dimensional array with contiguous storage.
#[derive(Debug, Clone, PartialEq)]
pub struct MultiArray<T, const N: usize> {
    data: Vec<T>,
    extents: [usize; N],
    strides: [isize; N],
    layout: Layout,
}

impl<T, const N: usize> MultiArray<T, N> {
    /// Create an array filled with `T::default()` in row-major order.
    pub fn new(extents: impl Into<Extents<N>>) -> Self
    where
        T: Default,
    {
        Self::from_fn(extents, Layout::RowMajor, |_| T::default())
    }

    /// Create an array filled with `T::default()` in the given layout.
    pub fn with_layout(extents: impl Into<Extents<N>>, layout: Layout) -> Self
    where
        T: Default,
    {
        Self::from_fn(extents, layout, |_| T::default())
    }

    /// Create a row-major array with every element set to `value`.
    pub fn from_elem(extents: impl Into<Extents<N>>, value: T) -> Self
    where
        T: Clone,
    {
        let extents = extents.into().into_array();
        let len = extents.iter().product();
        Self {
            data: vec![value; len],
            strides: Layout::RowMajor.strides(&extents),
            extents,
            layout: Layout::RowMajor,
        }
    }

    /// Create an array by evaluating `f` at every multi-index.
    ///
    /// `f` is called in storage order.
    pub fn from_fn<F>(extents: impl Into<Extents<N>>, layout: Layout, mut f: F) -> Self
    where
        F: FnMut([usize; N]) -> T,
    {
        let extents = extents.into().into_array();
        let strides = layout.strides(&extents);
        let len = extents.iter().product();
        let mut data = Vec::with_capacity(len);
        if len > 0 {
            // For contiguous strides the traversal ordinal is the storage position.
            let mut cursor = LinearCursor::new_begin(extents, &strides);
            for _ in 0..len {
                data.push(f(*cursor.indices()));
                cursor.advance();
            }
        }
        Self {
            data,
            extents,
            strides,
            layout,
        }
    }

    /// Wrap an existing buffer.
    ///
    /// # Errors
    /// Returns [`StridedError::ShapeMismatch`] unless `data.len()` equals
    /// the product of `extents`.
    pub fn from_vec(data: Vec<T>, extents: impl Into<Extents<N>>, layout: Layout) -> Result<Self> {
        let extents = extents.into();
        if data.len() != extents.product() {
            return Err(StridedError::ShapeMismatch(
                vec![data.len()],
                extents.as_ref().to_vec(),
            ));
        }
        let extents = extents.into_array();
        Ok(Self {
            data,
            strides: layout.strides(&extents),
            extents,
            layout,
        })
    }

    /// Materialize a row-major copy of any view.
    pub fn from_view(view: &StridedArrayView<'_, T, N>) -> Self
    where
        T: Clone,
    {
        match view.as_slice() {
            Some(contiguous) => Self {
                data: contiguous.to_vec(),
                extents: *view.extents(),
                strides: Layout::RowMajor.strides(view.extents()),
                layout: Layout::RowMajor,
            },
            None => Self::from_fn(*view.extents(), Layout::RowMajor, |idx| view.get(idx).clone()),
        }
    }

    /// Borrow the array as an immutable view.
    #[inline]
    pub fn view(&self) -> StridedArrayView<'_, T, N> {
        StridedArrayView::from_parts(&self.data, self.extents, self.strides, 0)
    }

    /// Borrow the array as a mutable view.
    #[inline]
    pub fn view_mut(&mut self) -> StridedArrayViewMut<'_, T, N> {
        StridedArrayViewMut::from_parts(&mut self.data, self.extents, self.strides, 0)
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
    pub fn layout(&self) -> Layout {
        self.layout
    }

    #[inline]
    pub fn ndim(&self) -> usize {
        N
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn as_ptr(&self) -> *const T {
        self.data.as_ptr()
    }

    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Number of elements the buffer can hold without reallocating.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.data.capacity()
    }

    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// Change the extents, keeping every element whose index lies inside
    /// both the old and the new shape. New positions get `fill`.
    pub fn resize(&mut self, extents: impl Into<Extents<N>>, fill: T)
    where
        T: Clone,
    {
        let extents = extents.into().into_array();
        tracing::trace!(
            old = ?self.extents,
            new = ?extents,
            capacity = self.data.capacity(),
            "reallocating multi_array"
        );
        let old = self.view();
        let resized = Self::from_fn(extents, self.layout, |idx| match old.try_get(idx) {
            Some(value) => value.clone(),
            None => fill.clone(),
        });
        *self = resized;
    }

    /// Reserve capacity for at least `additional` more elements.
    pub fn reserve(&mut self, additional: usize) {
        tracing::trace!(
            len = self.data.len(),
            additional,
            "reserving multi_array storage"
        );
        self.data.reserve(additional);
    }

    /// Set every element to `value`.
    pub fn fill(&mut self, value: T)
    where
        T: Clone,
    {
        self.data.fill(value);
    }
}

impl<T, const N: usize> Index<[usize; N]> for MultiArray<T, N> {
    type Output = T;

    #[inline]
    fn index(&self, indices: [usize; N]) -> &T {
        self.view().get(indices)
    }
}

impl<T, const N: usize> IndexMut<[usize; N]> for MultiArray<T, N> {
    #[inline]
    fn index_mut(&mut self, indices: [usize; N]) -> &mut T {
        for i in 0..N {
            assert!(
                indices[i] < self.extents[i],
                "index {} out of bounds for dim {} with extent {}",
                indices[i],
                i,
                self.extents[i]
            );
        }
        let pos: isize = indices
            .iter()
            .zip(&self.strides)
            .map(|(&i, &s)| i as isize * s)
            .sum();
        &mut self.data[pos as usize]
    }
}

impl<'a, T, const N: usize> From<&'a MultiArray<T, N>> for StridedArrayView<'a, T, N> {
    fn from(array: &'a MultiArray<T, N>) -> Self {
        array.view()
    }
}

impl<T, U, const N: usize> ShlAssign<StridedArrayView<'_, U, N>> for MultiArray<T, N>
where
    U: Clone,
    T: From<U>,
{
    fn shl_assign(&mut self, src: StridedArrayView<'_, U, N>) {
        let mut dst = self.view_mut();
        dst <<= src;
    }
}

impl<T, U, const N: usize> ShlAssign<&MultiArray<U, N>> for MultiArray<T, N>
where
    U: Clone,
    T: From<U>,
{
    fn shl_assign(&mut self, src: &MultiArray<U, N>) {
        let mut dst = self.view_mut();
        dst <<= src.view();
    }
}

impl<T, U, const N: usize> ShlAssign<&MultiArray<U, N>> for StridedArrayViewMut<'_, T, N>
where
    U: Clone,
    T: From<U>,
{
    fn shl_assign(&mut self, src: &MultiArray<U, N>) {
        *self <<= src.view();
    }
}
