use approx::assert_relative_eq;
use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};
use std::collections::HashSet;
use sx_strided::{
    length, s, Layout, MultiArray, SliceBounds, StridedArrayView, StridedArrayViewMut, END,
};

fn random_permutation<const N: usize>(rng: &mut StdRng) -> [usize; N] {
    let mut perm: [usize; N] = std::array::from_fn(|i| i);
    perm.shuffle(rng);
    perm
}

#[test]
fn test_shape_and_size_queries() {
    let data = vec![0.0f64; 24];
    let view = StridedArrayView::<f64, 3>::with_layout(&data, [2, 3, 4], Layout::RowMajor).unwrap();
    assert_eq!(view.extent(0), 2);
    assert_eq!(view.extent(1), 3);
    assert_eq!(view.extent(2), 4);
    assert_eq!(view.len(), 24);
    assert!(!view.is_empty());

    let empty = StridedArrayView::<f64, 3>::with_layout(&data, [2, 0, 4], Layout::RowMajor).unwrap();
    assert_eq!(empty.len(), 0);
    assert!(empty.is_empty());
}

#[test]
fn test_row_and_column_major_strides() {
    let data = [0u8; 24];
    let c = StridedArrayView::<u8, 3>::with_layout(&data, [2, 3, 4], Layout::RowMajor).unwrap();
    assert_eq!(c.strides(), &[12, 4, 1]);
    let f = StridedArrayView::<u8, 3>::with_layout(&data, [2, 3, 4], Layout::ColumnMajor).unwrap();
    assert_eq!(f.strides(), &[1, 2, 6]);
}

#[test]
fn test_index_equivalence() {
    let data = [1, 2, 3, 4, 5, 6];
    let view = StridedArrayView::<i32, 2>::with_layout(&data, [2, 3], Layout::RowMajor).unwrap();
    assert_eq!(view[[0, 0]], 1);
    assert_eq!(view[[0, 2]], 3);
    assert_eq!(view[[1, 0]], 4);
    assert_eq!(*view.get([1, 2]), 6);
}

#[test]
fn test_deep_copy_row_from_column_major() {
    let mut rng = StdRng::seed_from_u64(7);
    let src: Vec<f64> = (0..60).map(|_| rng.gen_range(-1.0..1.0)).collect();
    let mut dst = vec![0.0f64; 60];

    let b = StridedArrayView::<f64, 3>::with_layout(&src, [3, 4, 5], Layout::ColumnMajor).unwrap();
    {
        let mut a = StridedArrayViewMut::<f64, 3>::with_layout(&mut dst, [3, 4, 5], Layout::RowMajor).unwrap();
        a <<= b;
    }
    let a = StridedArrayView::<f64, 3>::with_layout(&dst, [3, 4, 5], Layout::RowMajor).unwrap();
    for (idx, &value) in b.indexed_iter() {
        assert_relative_eq!(a[idx], value);
    }
}

#[test]
fn test_iteration_covers_index_space_for_random_permutations() {
    let mut rng = StdRng::seed_from_u64(42);
    let data: Vec<i64> = (0..120).collect();
    let base = StridedArrayView::<i64, 4>::with_layout(&data, [2, 3, 4, 5], Layout::RowMajor).unwrap();

    for _ in 0..20 {
        let perm = random_permutation::<4>(&mut rng);
        let view = base.permute(perm);
        let mut seen = HashSet::new();
        let mut count = 0;
        for (idx, &value) in view.indexed_iter() {
            assert_eq!(view[idx], value);
            assert!(seen.insert(idx), "index {idx:?} visited twice");
            count += 1;
        }
        assert_eq!(count, view.len());
        // every element of the buffer is reached exactly once
        let mut values: Vec<i64> = view.iter().copied().collect();
        values.sort_unstable();
        assert_eq!(values, data);
    }
}

#[test]
fn test_permuted_traversal_follows_memory() {
    let mut rng = StdRng::seed_from_u64(3);
    let data: Vec<i64> = (0..120).collect();
    let base = StridedArrayView::<i64, 4>::with_layout(&data, [2, 3, 4, 5], Layout::ColumnMajor).unwrap();
    for _ in 0..10 {
        let view = base.permute(random_permutation::<4>(&mut rng));
        let values: Vec<i64> = view.iter().copied().collect();
        assert_eq!(values, data);
    }
}

#[test]
fn test_linear_index_round_trip() {
    let mut rng = StdRng::seed_from_u64(11);
    let data: Vec<u32> = (0..60).collect();
    let base = StridedArrayView::<u32, 3>::with_layout(&data, [3, 4, 5], Layout::RowMajor).unwrap();

    for _ in 0..5 {
        let view = base.permute(random_permutation::<3>(&mut rng)).reversed(rng.gen_range(0..3));
        let size = view.len();
        let mut it = view.begin();
        for start in 0..=size {
            let mut stepped = it;
            for n in 0..=(size - start) {
                let mut jumped = it;
                jumped.from_linear_idx((it.to_linear_idx() + n) as isize);
                assert_eq!(jumped.indices(), stepped.indices());
                assert_eq!(it + n as isize, stepped);
                if !stepped.is_end() {
                    stepped.advance();
                }
            }
            if start < size {
                it.advance();
            }
        }
        assert_eq!(it, view.end());
    }
}

#[test]
fn test_slice_resolution() {
    assert_eq!(SliceBounds::new(2, END).resolve(10), (2, 8));
    assert_eq!(SliceBounds::new(END - 3, length(2)).resolve(10), (7, 2));
    assert_eq!(SliceBounds::ALL.resolve(10), (0, 10));
}

#[test]
fn test_mixed_selection_matches_direct_indexing() {
    let data: Vec<i32> = (0..120).collect();
    let view = StridedArrayView::<i32, 4>::with_layout(&data, [2, 3, 4, 5], Layout::RowMajor).unwrap();
    let sub: StridedArrayView<'_, i32, 2> =
        view.select(s![1, SliceBounds::new(END - 2, END), 3, SliceBounds::new(1, length(3))]);
    assert_eq!(sub.extents(), &[2, 3]);
    for i in 0..2 {
        for j in 0..3 {
            assert_eq!(sub[[i, j]], view[[1, 1 + i, 3, 1 + j]]);
        }
    }
}

#[test]
fn test_reallocation_keeps_view_anchored() {
    let mut a = MultiArray::from_fn([3, 3], Layout::RowMajor, |[i, j]| (10 * i + j) as f64);
    for round in 1..=4 {
        let n = 3 * (round + 1);
        a.resize([n, n], -1.0);
        let view = a.view();
        assert_eq!(view.data().as_ptr(), a.as_slice().as_ptr());
        assert_eq!(view.as_ptr(), a.as_ptr());
        for i in 0..n {
            for j in 0..n {
                let expected = if i < 3 && j < 3 { (10 * i + j) as f64 } else { -1.0 };
                assert_relative_eq!(a[[i, j]], expected);
                assert_relative_eq!(view[[i, j]], expected);
            }
        }
    }
}
