//! Dimension ordering by stride magnitude.
//!
//! Traversal visits the dimension with the smallest `|stride|` fastest, so
//! consecutive elements are as close together in memory as the layout
//! allows, whatever the logical order of the dimensions.

/// Permutation of `0..N` sorted by ascending stride magnitude.
///
/// The strides and an identity permutation are co-sorted as one sequence
/// of pairs keyed on `|stride|`. The sort is stable, so dimensions with equal
/// stride magnitude keep their declaration order. `result[0]` is the
/// fastest-varying dimension.
pub fn stride_order<const N: usize>(strides: &[isize; N]) -> [usize; N] {
    let mut pairs: [(usize, usize); N] = std::array::from_fn(|i| (strides[i].unsigned_abs(), i));
    pairs.sort_by_key(|&(magnitude, _)| magnitude);
    pairs.map(|(_, dim)| dim)
}

/// Cumulative products of the extents taken in `perm` order, stored at the
/// permuted position: `cumprod[perm[i]] = extents[perm[0]] * .. * extents[perm[i]]`.
pub fn permuted_cumprod<const N: usize>(extents: &[usize; N], perm: &[usize; N]) -> [usize; N] {
    let mut cumprod = [0usize; N];
    let mut acc = 1usize;
    for &dim in perm {
        acc *= extents[dim];
        cumprod[dim] = acc;
    }
    cumprod
}
