//! Top-K selection
//!
//! **Problem**: ranking a frequency table by full sort is O(N log N) and its
//! tie order depends on the sort's stability.
//!
//! **Solution**: min-heap Top-K selection, O(N log K), with an explicit
//! tie-break: among equal values the lower index (first seen) wins.

use crate::{Error, Result};
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

/// A candidate in the heap. Greater means "ranks higher".
#[derive(Debug)]
struct Ranked<V> {
    value: V,
    index: usize,
}

impl<V: Ord> PartialEq for Ranked<V> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<V: Ord> Eq for Ranked<V> {}

impl<V: Ord> Ord for Ranked<V> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Higher value first, then earlier index
        self.value
            .cmp(&other.value)
            .then_with(|| other.index.cmp(&self.index))
    }
}

impl<V: Ord> PartialOrd for Ranked<V> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Indices of the `k` largest values, best first.
///
/// Ties are broken by position: the value seen first ranks higher. When
/// `k >= values.len()` every index is returned, fully ranked.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] if `k` is zero.
///
/// # Examples
///
/// ```rust
/// use beer_styles::topk::top_k_indices;
///
/// let counts = [3, 9, 3, 1, 9];
/// assert_eq!(top_k_indices(&counts, 3)?, vec![1, 4, 0]);
/// # Ok::<(), beer_styles::Error>(())
/// ```
pub fn top_k_indices<V: Ord + Copy>(values: &[V], k: usize) -> Result<Vec<usize>> {
    if k == 0 {
        return Err(Error::InvalidInput("k must be greater than 0".to_string()));
    }

    let mut heap: BinaryHeap<Reverse<Ranked<V>>> = BinaryHeap::with_capacity(k.min(values.len()));

    for (index, &value) in values.iter().enumerate() {
        let item = Ranked { value, index };
        if heap.len() < k {
            heap.push(Reverse(item));
        } else if let Some(Reverse(worst)) = heap.peek() {
            if item > *worst {
                heap.pop();
                heap.push(Reverse(item));
            }
        }
    }

    // into_sorted_vec is ascending over Reverse, i.e. best first
    Ok(heap
        .into_sorted_vec()
        .into_iter()
        .map(|Reverse(item)| item.index)
        .collect())
}
