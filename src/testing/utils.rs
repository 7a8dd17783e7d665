use std::cmp::Ordering;

/// Fill `order` with the indices that sort `values` ascending.
///
/// The sort is stable, so tied values keep their column order. `order` is
/// reused across calls to keep allocations per row predictable.
pub fn sort_permutation<T>(values: &[T], order: &mut Vec<usize>)
where
    T: PartialOrd,
{
    order.clear();
    order.extend(0..values.len());
    order.sort_by(|&a, &b| values[a].partial_cmp(&values[b]).unwrap_or(Ordering::Equal));
}

/// Write `sorted[i]` into `out[order[i]]`, undoing a [`sort_permutation`].
pub fn scatter_by_permutation<T>(sorted: &[T], order: &[usize], out: &mut [T])
where
    T: Copy,
{
    debug_assert_eq!(sorted.len(), order.len());
    debug_assert_eq!(out.len(), order.len());
    for (&value, &orig_idx) in sorted.iter().zip(order) {
        out[orig_idx] = value;
    }
}
