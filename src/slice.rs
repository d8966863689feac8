//! Slice endpoint algebra.
//!
//! A slice along one dimension is written the MATLAB way and only resolved
//! once the extent of that dimension is known:
//!
//! | expression                               | meaning                       |
//! |------------------------------------------|-------------------------------|
//! | `SliceBounds::new(2, END)`               | `[2, extent)`                 |
//! | `SliceBounds::new(END - 3, length(2))`   | two elements from `extent-3`  |
//! | `SliceBounds::ALL` or `..`               | the whole dimension           |
//!
//! Lower bounds are [`Endpoint`]s and can never be a length; upper bounds are
//! [`Upper`]s, which add the `length = k` form.

use std::ops::{Range, RangeFrom, RangeFull, RangeInclusive, RangeTo, RangeToInclusive, Sub};

use crate::{Result, StridedError};

/// The `end` sentinel. `END` resolves to the extent of the dimension and
/// `END - k` to `extent - k`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct End;

/// The `end` sentinel value.
pub const END: End = End;

impl Sub<usize> for End {
    type Output = Endpoint;

    #[inline]
    fn sub(self, k: usize) -> Endpoint {
        Endpoint::FromEnd(k)
    }
}

/// A lower slice bound: an absolute index or an offset back from `END`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Absolute(usize),
    FromEnd(usize),
}

impl Endpoint {
    /// Resolve against the extent of the dimension.
    ///
    /// # Panics
    /// Panics if a `FromEnd` offset exceeds the extent.
    #[inline]
    pub fn resolve(self, extent: usize) -> usize {
        match self {
            Endpoint::Absolute(i) => i,
            Endpoint::FromEnd(k) => {
                assert!(k <= extent, "end - {k} underflows extent {extent}");
                extent - k
            }
        }
    }

    fn checked_resolve(self, extent: usize) -> Option<usize> {
        match self {
            Endpoint::Absolute(i) => Some(i),
            Endpoint::FromEnd(k) => extent.checked_sub(k),
        }
    }
}

impl From<usize> for Endpoint {
    #[inline]
    fn from(i: usize) -> Self {
        Endpoint::Absolute(i)
    }
}

impl From<i32> for Endpoint {
    #[inline]
    fn from(i: i32) -> Self {
        assert!(i >= 0, "negative slice bound {i}");
        Endpoint::Absolute(i as usize)
    }
}

impl From<End> for Endpoint {
    #[inline]
    fn from(_: End) -> Self {
        Endpoint::FromEnd(0)
    }
}

/// An upper slice bound: an index, an offset back from `END`, or a length
/// counted from the lower bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upper {
    Absolute(usize),
    FromEnd(usize),
    Length(usize),
}

/// Build the `length = k` upper bound.
#[inline]
pub const fn length(k: usize) -> Upper {
    Upper::Length(k)
}

impl Upper {
    /// Resolve to an exclusive end index given the already resolved lower
    /// bound `from`.
    ///
    /// # Panics
    /// Panics if a `FromEnd` offset exceeds the extent.
    #[inline]
    pub fn resolve_after(self, from: usize, extent: usize) -> usize {
        match self {
            Upper::Absolute(i) => i,
            Upper::FromEnd(k) => Endpoint::FromEnd(k).resolve(extent),
            Upper::Length(len) => from + len,
        }
    }

    fn checked_resolve_after(self, from: usize, extent: usize) -> Option<usize> {
        match self {
            Upper::Absolute(i) => Some(i),
            Upper::FromEnd(k) => extent.checked_sub(k),
            Upper::Length(len) => from.checked_add(len),
        }
    }
}

impl From<Endpoint> for Upper {
    #[inline]
    fn from(e: Endpoint) -> Self {
        match e {
            Endpoint::Absolute(i) => Upper::Absolute(i),
            Endpoint::FromEnd(k) => Upper::FromEnd(k),
        }
    }
}

impl From<usize> for Upper {
    #[inline]
    fn from(i: usize) -> Self {
        Upper::Absolute(i)
    }
}

impl From<i32> for Upper {
    #[inline]
    fn from(i: i32) -> Self {
        Upper::from(Endpoint::from(i))
    }
}

impl From<End> for Upper {
    #[inline]
    fn from(_: End) -> Self {
        Upper::FromEnd(0)
    }
}

/// A symbolic slice of one dimension, resolved lazily against its extent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SliceBounds {
    pub from: Endpoint,
    pub to_or_length: Upper,
}

impl SliceBounds {
    /// The entire dimension: `from = 0`, `to = END`.
    pub const ALL: SliceBounds = SliceBounds {
        from: Endpoint::Absolute(0),
        to_or_length: Upper::FromEnd(0),
    };

    #[inline]
    pub fn new(from: impl Into<Endpoint>, to_or_length: impl Into<Upper>) -> Self {
        Self {
            from: from.into(),
            to_or_length: to_or_length.into(),
        }
    }

    /// Resolve to `(from, length)` for a dimension of the given extent.
    ///
    /// # Panics
    /// Panics if an `END - k` offset exceeds the extent or the upper bound
    /// lies before the lower bound. Use [`SliceBounds::try_resolve`] to get
    /// an error instead, including a check against the extent itself.
    pub fn resolve(&self, extent: usize) -> (usize, usize) {
        let from = self.from.resolve(extent);
        let len = match self.to_or_length {
            Upper::Length(len) => len,
            upper => {
                let to = upper.resolve_after(from, extent);
                assert!(to >= from, "slice end {to} precedes start {from}");
                to - from
            }
        };
        (from, len)
    }

    /// Resolve to `(from, length)`, rejecting slices that do not fit inside
    /// `[0, extent)`. `axis` is only used for the error report.
    pub fn try_resolve(&self, axis: usize, extent: usize) -> Result<(usize, usize)> {
        let out_of_bounds = |from: usize, len: usize| StridedError::SliceOutOfBounds {
            axis,
            from,
            len,
            extent,
        };
        let from = self
            .from
            .checked_resolve(extent)
            .ok_or_else(|| out_of_bounds(0, 0))?;
        let to = self
            .to_or_length
            .checked_resolve_after(from, extent)
            .ok_or_else(|| out_of_bounds(from, 0))?;
        if to < from {
            return Err(out_of_bounds(from, 0));
        }
        if to > extent {
            return Err(out_of_bounds(from, to - from));
        }
        Ok((from, to - from))
    }
}

impl Default for SliceBounds {
    fn default() -> Self {
        Self::ALL
    }
}

impl From<RangeFull> for SliceBounds {
    fn from(_: RangeFull) -> Self {
        Self::ALL
    }
}

impl From<Range<usize>> for SliceBounds {
    fn from(r: Range<usize>) -> Self {
        Self::new(r.start, r.end)
    }
}

impl From<RangeFrom<usize>> for SliceBounds {
    fn from(r: RangeFrom<usize>) -> Self {
        Self::new(r.start, END)
    }
}

impl From<RangeTo<usize>> for SliceBounds {
    fn from(r: RangeTo<usize>) -> Self {
        Self::new(0, r.end)
    }
}

impl From<RangeInclusive<usize>> for SliceBounds {
    fn from(r: RangeInclusive<usize>) -> Self {
        Self::new(*r.start(), *r.end() + 1)
    }
}

impl From<RangeToInclusive<usize>> for SliceBounds {
    fn from(r: RangeToInclusive<usize>) -> Self {
        Self::new(0, r.end + 1)
    }
}

/// One per-dimension argument of a mixed index/slice selection.
///
/// `Index` fixes the coordinate and drops the dimension from the result;
/// `Slice` keeps the dimension with adjusted extent and origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisArg {
    Index(usize),
    Slice(SliceBounds),
}

impl AxisArg {
    #[inline]
    pub fn is_slice(&self) -> bool {
        matches!(self, AxisArg::Slice(_))
    }
}

impl From<usize> for AxisArg {
    fn from(i: usize) -> Self {
        AxisArg::Index(i)
    }
}

impl From<i32> for AxisArg {
    fn from(i: i32) -> Self {
        assert!(i >= 0, "negative index {i}");
        AxisArg::Index(i as usize)
    }
}

macro_rules! impl_axis_arg_from_slice {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl From<$ty> for AxisArg {
                fn from(s: $ty) -> Self {
                    AxisArg::Slice(SliceBounds::from(s))
                }
            }
        )+
    };
}

impl_axis_arg_from_slice!(
    RangeFull,
    Range<usize>,
    RangeFrom<usize>,
    RangeTo<usize>,
    RangeInclusive<usize>,
    RangeToInclusive<usize>,
);

impl From<SliceBounds> for AxisArg {
    fn from(s: SliceBounds) -> Self {
        AxisArg::Slice(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_resolve() {
        assert_eq!(Endpoint::from(4usize).resolve(10), 4);
        assert_eq!(Endpoint::from(END).resolve(10), 10);
        assert_eq!((END - 3).resolve(10), 7);
    }

    #[test]
    fn test_slice_to_end() {
        assert_eq!(SliceBounds::new(2usize, END).resolve(10), (2, 8));
    }

    #[test]
    fn test_slice_from_end_with_length() {
        assert_eq!(SliceBounds::new(END - 3, length(2)).resolve(10), (7, 2));
    }

    #[test]
    fn test_slice_all() {
        assert_eq!(SliceBounds::ALL.resolve(10), (0, 10));
        assert_eq!(SliceBounds::from(..).resolve(4), (0, 4));
        assert_eq!(SliceBounds::default().resolve(0), (0, 0));
    }

    #[test]
    fn test_slice_absolute_upper() {
        assert_eq!(SliceBounds::new(1usize, 4usize).resolve(10), (1, 3));
        assert_eq!(SliceBounds::new(1usize, END - 1).resolve(10), (1, 8));
    }

    #[test]
    fn test_slice_from_ranges() {
        assert_eq!(SliceBounds::from(2..5).resolve(10), (2, 3));
        assert_eq!(SliceBounds::from(6..).resolve(10), (6, 4));
        assert_eq!(SliceBounds::from(..3).resolve(10), (0, 3));
        assert_eq!(SliceBounds::from(2..=5).resolve(10), (2, 4));
        assert_eq!(SliceBounds::from(..=0).resolve(10), (0, 1));
    }

    #[test]
    fn test_slice_resolution_is_deferred() {
        let s = SliceBounds::new(END - 2, END);
        assert_eq!(s.resolve(5), (3, 2));
        assert_eq!(s.resolve(100), (98, 2));
    }

    #[test]
    fn test_try_resolve_rejects_overrun() {
        let err = SliceBounds::new(8usize, length(5)).try_resolve(1, 10).unwrap_err();
        assert_eq!(
            err,
            StridedError::SliceOutOfBounds {
                axis: 1,
                from: 8,
                len: 5,
                extent: 10
            }
        );
        assert!(SliceBounds::new(END - 11, END).try_resolve(0, 10).is_err());
        assert!(SliceBounds::new(5usize, 3usize).try_resolve(0, 10).is_err());
        assert_eq!(SliceBounds::new(8usize, length(2)).try_resolve(0, 10), Ok((8, 2)));
    }

    #[test]
    #[should_panic(expected = "precedes start")]
    fn test_resolve_reversed_panics() {
        SliceBounds::new(5usize, 3usize).resolve(10);
    }

    #[test]
    fn test_axis_arg_conversions() {
        assert_eq!(AxisArg::from(3usize), AxisArg::Index(3));
        assert!(AxisArg::from(..).is_slice());
        assert_eq!(
            AxisArg::from(SliceBounds::new(END - 1, END)),
            AxisArg::Slice(SliceBounds {
                from: Endpoint::FromEnd(1),
                to_or_length: Upper::FromEnd(0),
            })
        );
    }
}
