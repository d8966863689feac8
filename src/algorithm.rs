//! Small numeric utilities over views and sorted sequences.

use std::cmp::Ordering;
use std::ops::{Div, MulAssign};

use num_traits::{Float, NumCast, ToPrimitive, Zero};

use crate::view::{StridedArrayView, StridedArrayViewMut};

/// For every value, the first position in `sorted` whose element is not
/// less than it (a vectorized lower bound).
///
/// ```rust
/// use sx_strided::{algorithm::searchsorted, StridedArrayView};
///
/// let a = [10, 20, 30];
/// let pos = searchsorted(&StridedArrayView::from_contiguous(&a[..]), &[5, 20, 25, 99]);
/// assert_eq!(pos, vec![0, 1, 2, 3]);
/// ```
pub fn searchsorted<T: PartialOrd>(sorted: &StridedArrayView<'_, T, 1>, values: &[T]) -> Vec<usize> {
    values
        .iter()
        .map(|v| {
            let (mut lo, mut hi) = (0, sorted.len());
            while lo < hi {
                let mid = lo + (hi - lo) / 2;
                if sorted.get([mid]) < v {
                    lo = mid + 1;
                } else {
                    hi = mid;
                }
            }
            lo
        })
        .collect()
}

/// Number of occurrences of each value in `0..=max(values)`.
pub fn bincount(values: &[usize]) -> Vec<usize> {
    let mut counts = Vec::new();
    bincount_into(&mut counts, values);
    counts
}

/// Like [`bincount`] but reuses `counts`, which is resized to
/// `max(values) + 1` and overwritten.
pub fn bincount_into(counts: &mut Vec<usize>, values: &[usize]) {
    counts.clear();
    if let Some(&max) = values.iter().max() {
        counts.resize(max + 1, 0);
    }
    for &v in values {
        counts[v] += 1;
    }
}

/// Sum of all elements of a view of any rank.
pub fn sum<T, const N: usize>(view: &StridedArrayView<'_, T, N>) -> T
where
    T: Zero + Copy,
{
    view.iter().fold(T::zero(), |acc, &x| acc + x)
}

/// Arithmetic mean in the element type.
///
/// The sum is accumulated in `f64`, so neither the element count nor the
/// total has to fit in `T`. Integer element types truncate toward zero like
/// integer division. Returns `None` for an empty view, or when an element or
/// the mean has no `f64`/`T` representation.
pub fn mean<T, const N: usize>(view: &StridedArrayView<'_, T, N>) -> Option<T>
where
    T: Copy + NumCast,
{
    if view.is_empty() {
        return None;
    }
    let total = view
        .iter()
        .try_fold(0.0f64, |acc, x| ToPrimitive::to_f64(x).map(|v| acc + v))?;
    NumCast::from(total / view.len() as f64)
}

/// Elements of sorted `a` not present in sorted `b` (multiset semantics).
pub fn set_difference<T: Ord + Clone>(a: &[T], b: &[T]) -> Vec<T> {
    let mut out = Vec::with_capacity(a.len());
    let (mut i, mut j) = (0, 0);
    while i < a.len() {
        if j == b.len() {
            out.extend_from_slice(&a[i..]);
            break;
        }
        match a[i].cmp(&b[j]) {
            Ordering::Less => {
                out.push(a[i].clone());
                i += 1;
            }
            Ordering::Greater => j += 1,
            Ordering::Equal => {
                i += 1;
                j += 1;
            }
        }
    }
    out
}

/// Elements present in both sorted inputs (multiset semantics).
pub fn set_intersection<T: Ord + Clone>(a: &[T], b: &[T]) -> Vec<T> {
    let mut out = Vec::with_capacity(a.len().min(b.len()));
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            Ordering::Less => i += 1,
            Ordering::Greater => j += 1,
            Ordering::Equal => {
                out.push(a[i].clone());
                i += 1;
                j += 1;
            }
        }
    }
    out
}

/// Remove consecutive duplicates.
pub fn unique_inplace<T: PartialEq>(values: &mut Vec<T>) {
    values.dedup();
}

/// Sort, then remove duplicates.
pub fn sort_unique_inplace<T: Ord>(values: &mut Vec<T>) {
    values.sort_unstable();
    values.dedup();
}

/// Multiply every element by `factor`.
pub fn scale<T, const N: usize>(view: &mut StridedArrayViewMut<'_, T, N>, factor: T)
where
    T: MulAssign + Copy,
{
    view.map_inplace(|x| *x *= factor);
}

/// Replace every element `x` by `x / divisor`.
pub fn div_scalar<T, const N: usize>(view: &mut StridedArrayViewMut<'_, T, N>, divisor: T)
where
    T: Div<Output = T> + Copy,
{
    view.map_inplace(|x| *x = *x / divisor);
}

/// Replace every element `x` by `numerator / x`.
pub fn rdiv_scalar<T, const N: usize>(view: &mut StridedArrayViewMut<'_, T, N>, numerator: T)
where
    T: Div<Output = T> + Copy,
{
    view.map_inplace(|x| *x = numerator / *x);
}

/// Natural logarithm of every element.
pub fn ln_inplace<T: Float, const N: usize>(view: &mut StridedArrayViewMut<'_, T, N>) {
    view.map_inplace(|x| *x = x.ln());
}

/// `lo <= x && x <= hi`
#[inline]
pub fn leq_and_leq<T: PartialOrd>(lo: T, x: T, hi: T) -> bool {
    lo <= x && x <= hi
}

/// `lo < x && x <= hi`
#[inline]
pub fn less_and_leq<T: PartialOrd>(lo: T, x: T, hi: T) -> bool {
    lo < x && x <= hi
}

/// `lo < x && x < hi`
#[inline]
pub fn less_and_less<T: PartialOrd>(lo: T, x: T, hi: T) -> bool {
    lo < x && x < hi
}
