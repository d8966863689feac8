//! Axis-wise sorting and reductions over strided views.
//!
//! Every function walks all 1-D lanes along one free axis (see [`Lanes`])
//! and processes each lane independently. Elements are compared with
//! `PartialOrd`; incomparable pairs (e.g. NaN) are treated as equal.

use std::cmp::Ordering;

use crate::multi_array::MultiArray;
use crate::variation::Lanes;
use crate::view::{Layout, StridedArrayView, StridedArrayViewMut};
use crate::{Result, StridedError};

#[inline]
fn compare<T: PartialOrd>(a: &T, b: &T) -> Ordering {
    a.partial_cmp(b).unwrap_or(Ordering::Equal)
}

fn check_axis<const N: usize>(axis: usize) -> Result<()> {
    if axis >= N {
        return Err(StridedError::InvalidAxis { axis, rank: N });
    }
    Ok(())
}

/// Sort every lane along `axis` in place, ascending.
///
/// # Errors
/// Returns [`StridedError::InvalidAxis`] if `axis >= N`.
pub fn sort_along<T, const N: usize>(view: &mut StridedArrayViewMut<'_, T, N>, axis: usize) -> Result<()>
where
    T: PartialOrd + Clone,
{
    check_axis::<N>(axis)?;
    tracing::debug!(axis, extents = ?view.extents(), "sort_along");

    let axis_len = view.extent(axis);
    let mut lane_buf: Vec<T> = Vec::with_capacity(axis_len);
    for start in Lanes::new(*view.extents(), axis)? {
        let mut idx = start;
        lane_buf.clear();
        for k in 0..axis_len {
            idx[axis] = k;
            lane_buf.push(view.get(idx).clone());
        }

        lane_buf.sort_by(compare);

        for (k, value) in lane_buf.drain(..).enumerate() {
            idx[axis] = k;
            view.set(idx, value);
        }
    }
    Ok(())
}

/// Sorted copy of `view`, every lane along `axis` ascending.
pub fn sorted_along<T, const N: usize>(view: &StridedArrayView<'_, T, N>, axis: usize) -> Result<MultiArray<T, N>>
where
    T: PartialOrd + Clone,
{
    check_axis::<N>(axis)?;
    let mut result = MultiArray::from_view(view);
    sort_along(&mut result.view_mut(), axis)?;
    Ok(result)
}

/// Indices that would sort each lane along `axis`.
///
/// The result has the extents of `view`; entry `k` of a lane holds the
/// position in that lane of its `k`-th smallest element. The sort is
/// stable, so equal elements keep their order.
pub fn sortperm_along<T, const N: usize>(
    view: &StridedArrayView<'_, T, N>,
    axis: usize,
) -> Result<MultiArray<usize, N>>
where
    T: PartialOrd,
{
    check_axis::<N>(axis)?;
    tracing::debug!(axis, extents = ?view.extents(), "sortperm_along");

    let axis_len = view.extent(axis);
    let mut result = MultiArray::<usize, N>::with_layout(*view.extents(), Layout::RowMajor);
    let mut idx_buf: Vec<usize> = Vec::with_capacity(axis_len);
    for start in Lanes::new(*view.extents(), axis)? {
        idx_buf.clear();
        idx_buf.extend(0..axis_len);
        let lane_elem = |k: usize| {
            let mut idx = start;
            idx[axis] = k;
            view.get(idx)
        };
        idx_buf.sort_by(|&a, &b| compare(lane_elem(a), lane_elem(b)));

        let mut idx = start;
        for (k, &p) in idx_buf.iter().enumerate() {
            idx[axis] = k;
            result[idx] = p;
        }
    }
    Ok(result)
}

/// Position of the maximum of each lane along `axis`.
///
/// The result keeps the rank of `view` with extent 1 along `axis` (0 if the
/// axis itself is empty). When several elements share the maximum, the
/// first one wins.
pub fn argmax_along<T, const N: usize>(
    view: &StridedArrayView<'_, T, N>,
    axis: usize,
) -> Result<MultiArray<usize, N>>
where
    T: PartialOrd,
{
    check_axis::<N>(axis)?;
    tracing::debug!(axis, extents = ?view.extents(), "argmax_along");

    let axis_len = view.extent(axis);
    let mut out_extents = *view.extents();
    out_extents[axis] = axis_len.min(1);
    let mut result = MultiArray::<usize, N>::with_layout(out_extents, Layout::RowMajor);
    if axis_len == 0 {
        return Ok(result);
    }

    for start in Lanes::new(*view.extents(), axis)? {
        let mut idx = start;
        let mut best = 0;
        let mut best_value = view.get(idx);
        for k in 1..axis_len {
            idx[axis] = k;
            let value = view.get(idx);
            if compare(value, best_value) == Ordering::Greater {
                best = k;
                best_value = value;
            }
        }
        result[start] = best;
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::s;

    fn matrix(data: &[f64], rows: usize, cols: usize) -> StridedArrayView<'_, f64, 2> {
        StridedArrayView::with_layout(data, [rows, cols], Layout::RowMajor).unwrap()
    }

    #[test]
    fn test_sort_along_rows() {
        let mut data = vec![3.0, 1.0, 2.0, 6.0, 5.0, 4.0];
        let mut view = StridedArrayViewMut::with_layout(&mut data, [2, 3], Layout::RowMajor).unwrap();
        sort_along(&mut view, 1).unwrap();
        assert_eq!(data, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn test_sort_along_columns() {
        let mut data = vec![3, 1, 2, 0, 5, 4];
        let mut view = StridedArrayViewMut::with_layout(&mut data, [2, 3], Layout::RowMajor).unwrap();
        sort_along(&mut view, 0).unwrap();
        assert_eq!(data, vec![0, 1, 2, 3, 5, 4]);
    }

    #[test]
    fn test_sort_along_transposed_view() {
        let mut data = vec![3, 1, 2, 0, 5, 4];
        let mut view = StridedArrayViewMut::with_layout(&mut data, [2, 3], Layout::RowMajor)
            .unwrap()
            .permute([1, 0]);
        // lanes along axis 0 of the transpose are rows of the buffer
        sort_along(&mut view, 0).unwrap();
        assert_eq!(data, vec![1, 2, 3, 0, 4, 5]);
    }

    #[test]
    fn test_sorted_along_leaves_source() {
        let data = [2.0, 1.0, 0.5, 3.0];
        let view = matrix(&data, 2, 2);
        let sorted = sorted_along(&view, 1).unwrap();
        assert_eq!(sorted.as_slice(), &[1.0, 2.0, 0.5, 3.0]);
        assert_eq!(data, [2.0, 1.0, 0.5, 3.0]);
    }

    #[test]
    fn test_sorted_along_empty_view() {
        let data = [1.0, 2.0, 3.0, 4.0, 5.0];
        let view = StridedArrayView::<f64, 2>::new(&data, [0, 3], [3, 1], 7).unwrap();
        for axis in 0..2 {
            let sorted = sorted_along(&view, axis).unwrap();
            assert_eq!(sorted.extents(), &[0, 3]);
            assert!(sorted.as_slice().is_empty());
        }
    }

    #[test]
    fn test_sortperm_along_is_stable() {
        let data = [2.0, 1.0, 2.0, 0.0];
        let view = StridedArrayView::from_contiguous(&data[..]);
        let perm = sortperm_along(&view, 0).unwrap();
        assert_eq!(perm.as_slice(), &[3, 1, 0, 2]);
    }

    #[test]
    fn test_sortperm_along_matrix() {
        let data = [5.0, 4.0, 1.0, 2.0, 9.0, 0.0];
        let view = matrix(&data, 2, 3);
        let perm = sortperm_along(&view, 0).unwrap();
        assert_eq!(perm.extents(), &[2, 3]);
        assert_eq!(perm.as_slice(), &[1, 0, 1, 0, 1, 0]);
    }

    #[test]
    fn test_argmax_along() {
        let data = [1.0, 7.0, 7.0, 4.0, 2.0, 9.0];
        let view = matrix(&data, 2, 3);

        let rows = argmax_along(&view, 1).unwrap();
        assert_eq!(rows.extents(), &[2, 1]);
        assert_eq!(rows.as_slice(), &[1, 2]);

        let cols = argmax_along(&view, 0).unwrap();
        assert_eq!(cols.extents(), &[1, 3]);
        assert_eq!(cols.as_slice(), &[1, 0, 1]);
    }

    #[test]
    fn test_argmax_along_selected_subview() {
        let data: Vec<f64> = (0..24).map(|x| ((x * 7) % 11) as f64).collect();
        let cube = StridedArrayView::<f64, 3>::with_layout(&data, [2, 3, 4], Layout::RowMajor).unwrap();
        let plane: StridedArrayView<'_, f64, 2> = cube.select(s![1, .., ..]);
        let best = argmax_along(&plane, 1).unwrap();
        for i in 0..3 {
            let row: Vec<f64> = (0..4).map(|j| plane[[i, j]]).collect();
            let max = row.iter().cloned().fold(f64::MIN, f64::max);
            assert_eq!(row[best[[i, 0]]], max);
        }
    }

    #[test]
    fn test_invalid_axis() {
        let data = [1.0, 2.0];
        let view = matrix(&data, 1, 2);
        assert_eq!(
            argmax_along(&view, 2).unwrap_err(),
            StridedError::InvalidAxis { axis: 2, rank: 2 }
        );
        assert!(sortperm_along(&view, 5).is_err());
        assert!(sorted_along(&view, 2).is_err());
    }
}
