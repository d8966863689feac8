//! Non-owning strided multidimensional array views.
//!
//! A [`StridedArrayView`] interprets externally owned memory as an
//! `N`-dimensional array described by per-axis extents and element strides.
//! Strides may be negative, permuted or overlapping, so transposes, reversals
//! and sub-blocks are all zero-copy views over the same buffer.
//!
//! # Core Types
//!
//! - [`StridedArrayView`] / [`StridedArrayViewMut`]: borrowed views
//! - [`MultiArray`]: owned contiguous array exposing itself through
//!   [`MultiArray::view`] / [`MultiArray::view_mut`]
//! - [`IndexTuple`] ([`Extents`], [`Indices`]): fixed-rank index tuples
//! - [`SliceBounds`], [`END`], [`length`]: MATLAB-style slice endpoints
//! - [`LinearCursor`], [`LinearIter`]: traversal in physical memory order
//!
//! # Example
//!
//! ```rust
//! use sx_strided::{length, s, Layout, SliceBounds, StridedArrayView, END};
//!
//! let data = [1, 2, 3, 4, 5, 6];
//! let view: StridedArrayView<'_, i32, 2> =
//!     StridedArrayView::with_layout(&data, [2, 3], Layout::RowMajor).unwrap();
//! assert_eq!(view[[1, 2]], 6);
//!
//! // Row 1, columns from `end - 2` spanning two elements.
//! let row: StridedArrayView<'_, i32, 1> = view.select(s![1, SliceBounds::new(END - 2, length(2))]);
//! assert_eq!(row.iter().copied().collect::<Vec<_>>(), vec![5, 6]);
//!
//! // Transposed views are still traversed in memory order.
//! let t = view.t();
//! assert_eq!(t.iter().copied().collect::<Vec<_>>(), vec![1, 2, 3, 4, 5, 6]);
//! ```
//!
//! # Traversal Order
//!
//! Iteration visits dimensions by ascending stride magnitude rather than by
//! declaration order, so a transposed or permuted view is walked without
//! jumping around memory. The logical index of every visited element is
//! available through [`StridedArrayView::indexed_iter`].

pub mod algorithm;
mod iter;
mod multi_array;
mod order;
pub mod slice;
pub mod sort;
mod tuple;
pub mod variation;
pub mod view;

// ============================================================================
// Index tuples and slicing
// ============================================================================
pub use slice::{length, AxisArg, End, Endpoint, SliceBounds, Upper, END};
pub use tuple::{Extents, IndexTuple, Indices};

// ============================================================================
// View types and traversal
// ============================================================================
pub use iter::{cyclic_remainder, IndexedIter, LinearCursor, LinearIter};
pub use multi_array::MultiArray;
pub use order::{permuted_cumprod, stride_order};
pub use view::{
    col_major_strides, row_major_strides, FixedArray, Layout, StridedArrayView,
    StridedArrayViewMut,
};

#[cfg(feature = "parallel")]
pub use view::ParStridedIter;

// ============================================================================
// Consumers of the view interface
// ============================================================================
pub use sort::{argmax_along, sort_along, sorted_along, sortperm_along};
pub use variation::{next_variation, Lanes};

/// Build a `[AxisArg; N]` selector for [`StridedArrayView::select`].
///
/// Each argument is either an index (fixes the axis and removes it from the
/// result) or anything convertible into a [`SliceBounds`] (keeps the axis).
///
/// ```rust
/// use sx_strided::{s, SliceBounds, END};
///
/// let args = s![2, .., SliceBounds::new(1, END - 1)];
/// assert_eq!(args.len(), 3);
/// ```
#[macro_export]
macro_rules! s {
    ($($arg:expr),+ $(,)?) => {
        [$($crate::AxisArg::from($arg)),+]
    };
}

// ============================================================================
// Error types
// ============================================================================

/// Errors that can occur while building or combining strided views.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum StridedError {
    /// Ranks do not match.
    #[error("rank mismatch: {0} vs {1}")]
    RankMismatch(usize, usize),

    /// Shapes are incompatible for the operation.
    #[error("shape mismatch: {0:?} vs {1:?}")]
    ShapeMismatch(Vec<usize>, Vec<usize>),

    /// Invalid axis index for the given rank.
    #[error("invalid axis {axis} for rank {rank}")]
    InvalidAxis { axis: usize, rank: usize },

    /// A reachable element offset falls outside the borrowed buffer.
    #[error("offset overflow while computing element position")]
    OffsetOverflow,

    /// The buffer holds fewer elements than the extents require.
    #[error("buffer too small: {required} elements required, {len} available")]
    BufferTooSmall { required: usize, len: usize },

    /// A slice does not fit inside its dimension.
    #[error("slice [{from}, {from}+{len}) out of bounds for axis {axis} with extent {extent}")]
    SliceOutOfBounds {
        axis: usize,
        from: usize,
        len: usize,
        extent: usize,
    },
}

/// Result type for strided view operations.
pub type Result<T> = std::result::Result<T, StridedError>;
