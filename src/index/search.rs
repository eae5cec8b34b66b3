//! Exact-Match Search over Sorted Identifier Arrays
//!
//! Every identifier lookup in the catalogue reduces to the same primitive:
//! find the rows whose value equals a needle in a large 1-D array that is
//! sorted ascending, either directly or through a precomputed permutation
//! (`haystack[permutation[i]]` ascending in `i`).
//!
//! For each needle we compute the leftmost and rightmost insertion points.
//! The needle matches iff they differ, and the leftmost point (mapped back
//! through the permutation) is the returned row. Cost is O(log n) per needle.

use ndarray::ArrayView1;

/// Run `f` on the haystack as a contiguous slice
///
/// Strided or reversed views are copied once per call.
fn with_slice<T: Copy, R>(haystack: ArrayView1<'_, T>, f: impl FnOnce(&[T]) -> R) -> R {
    match haystack.as_slice() {
        Some(values) => f(values),
        None => f(&haystack.to_vec()),
    }
}

/// Locate a single needle; returns its row in the haystack's own index space
fn locate<T: Ord + Copy>(haystack: &[T], permutation: Option<&[usize]>, needle: T) -> Option<usize> {
    match permutation {
        Some(p) => {
            let left = p.partition_point(|&i| haystack[i] < needle);
            let right = p.partition_point(|&i| haystack[i] <= needle);
            (left < right).then(|| p[left])
        }
        None => {
            let left = haystack.partition_point(|&v| v < needle);
            let right = haystack.partition_point(|&v| v <= needle);
            (left < right).then_some(left)
        }
    }
}

/// Search for every needle, one result per needle
///
/// Misses come back as `None`, so the output always lines up with `needles`.
/// With duplicate values the first row in sorted order is returned.
pub fn search<T: Ord + Copy>(
    haystack: ArrayView1<'_, T>,
    needles: &[T],
    permutation: Option<&[usize]>,
) -> Vec<Option<usize>> {
    debug_assert!(permutation.map_or(true, |p| p.len() == haystack.len()));

    with_slice(haystack, |values| {
        needles
            .iter()
            .map(|&needle| locate(values, permutation, needle))
            .collect()
    })
}

/// Search for every needle, keeping only the matches
///
/// The result is shorter than `needles` whenever something is missing, and
/// nothing says which needle missed. Use [`search`] when that matters.
pub fn search_matched<T: Ord + Copy>(
    haystack: ArrayView1<'_, T>,
    needles: &[T],
    permutation: Option<&[usize]>,
) -> Vec<usize> {
    search(haystack, needles, permutation)
        .into_iter()
        .flatten()
        .collect()
}

/// Search for a single needle
pub fn search_one<T: Ord + Copy>(
    haystack: ArrayView1<'_, T>,
    needle: T,
    permutation: Option<&[usize]>,
) -> Option<usize> {
    with_slice(haystack, |values| locate(values, permutation, needle))
}

/// Stable ascending sort permutation of `values`
pub fn argsort<T: Ord>(values: ArrayView1<'_, T>) -> Vec<usize> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[a].cmp(&values[b]));
    order
}
