// Min-max heap primitives (Atkinson, Sack, Santoro & Strothotte, 1986).
//
// A min-max heap is a complete binary tree whose levels alternate
// between min-ordered and max-ordered, root first: a node on a min
// level is ≤ everything below it, a node on a max level is ≥
// everything below it. The overall minimum therefore sits at the root
// and the overall maximum at one of the root's children, so both ends
// are readable in O(1).
//
// Every function here operates on a caller-supplied sub-range of some
// larger buffer: a slice for the storage, and where the operation
// changes the number of live elements, an explicit live count. The
// container owning the buffer slices one partition at a time out of it;
// nothing in this module owns memory.

use crate::error::Error;
use crate::heap_index::has_grandparent;
use crate::heap_index::has_parent;
use crate::heap_index::index_grandparent;
use crate::heap_index::index_left;
use crate::heap_index::index_parent;
use crate::heap_index::index_right;
use crate::heap_index::is_child_of;
use crate::heap_index::on_min_level;

/// The minimum element, at the root.
#[inline(always)]
pub fn peek_min<T: Ord>(heap: &[T]) -> Result<&T, Error> {
    heap.first().ok_or(Error::Empty)
}

/// The maximum element.
#[inline(always)]
pub fn peek_max<T: Ord>(heap: &[T]) -> Result<&T, Error> {
    if heap.is_empty() {
        return Err(Error::Empty);
    }
    Ok(&heap[max_index(heap)])
}

/// Index of the maximum element: the root of a trivial heap, otherwise
/// the larger of the root's children.
#[inline(always)]
#[must_use]
pub fn max_index<T: Ord>(heap: &[T]) -> usize {
    debug_assert!(!heap.is_empty());
    if heap.len() <= 1 {
        return 0;
    }
    let mut m = 1;
    if heap.len() > 2 && heap[2] > heap[1] {
        m = 2;
    }
    m
}

/// Index of the smallest child or grandchild of `i`, or `None` if `i`
/// is a leaf. Candidates are visited children first so a tie resolves
/// to the shallowest, leftmost index.
#[inline]
fn min_descendant<T: Ord>(heap: &[T], i: usize) -> Option<usize> {
    let l = index_left(i);
    if l >= heap.len() {
        return None;
    }
    let r = index_right(i);
    let mut m = l;
    for c in [r, index_left(l), index_right(l), index_left(r), index_right(r)] {
        if c < heap.len() && heap[c] < heap[m] {
            m = c;
        }
    }
    Some(m)
}

/// Mirror of [`min_descendant`].
#[inline]
fn max_descendant<T: Ord>(heap: &[T], i: usize) -> Option<usize> {
    let l = index_left(i);
    if l >= heap.len() {
        return None;
    }
    let r = index_right(i);
    let mut m = l;
    for c in [r, index_left(l), index_right(l), index_left(r), index_right(r)] {
        if c < heap.len() && heap[c] > heap[m] {
            m = c;
        }
    }
    Some(m)
}

/// Sift the element at `i` down, assuming `i` sits on a min level.
///
/// A smaller child swaps in place and stops there; a smaller grandchild
/// swaps, gets checked against its max-level parent, and the walk
/// continues from the grandchild's slot.
pub fn sift_down_min<T: Ord>(heap: &mut [T], mut i: usize) {
    debug_assert!(heap.is_empty() || on_min_level(i));
    while let Some(m) = min_descendant(heap, i) {
        if is_child_of(i, m) {
            if heap[m] < heap[i] {
                heap.swap(m, i);
            }
            return;
        }
        if heap[m] < heap[i] {
            heap.swap(m, i);
            let p = index_parent(m);
            if heap[m] > heap[p] {
                heap.swap(m, p);
            }
            i = m;
        } else {
            return;
        }
    }
}

/// Mirror of [`sift_down_min`] for an `i` on a max level.
pub fn sift_down_max<T: Ord>(heap: &mut [T], mut i: usize) {
    debug_assert!(heap.is_empty() || !on_min_level(i));
    while let Some(m) = max_descendant(heap, i) {
        if is_child_of(i, m) {
            if heap[m] > heap[i] {
                heap.swap(m, i);
            }
            return;
        }
        if heap[m] > heap[i] {
            heap.swap(m, i);
            let p = index_parent(m);
            if heap[m] < heap[p] {
                heap.swap(m, p);
            }
            i = m;
        } else {
            return;
        }
    }
}

/// Sift down, dispatching on the level parity of `i`.
#[inline]
pub fn sift_down<T: Ord>(heap: &mut [T], i: usize) {
    if on_min_level(i) {
        sift_down_min(heap, i);
    } else {
        sift_down_max(heap, i);
    }
}

/// Bubble the element at `i` up along min levels.
pub fn bubble_up_min<T: Ord>(heap: &mut [T], mut i: usize) {
    debug_assert!(heap.is_empty() || on_min_level(i));
    while has_grandparent(i) {
        let g = index_grandparent(i);
        if heap[i] < heap[g] {
            heap.swap(i, g);
            i = g;
        } else {
            return;
        }
    }
}

/// Mirror of [`bubble_up_min`] along max levels.
pub fn bubble_up_max<T: Ord>(heap: &mut [T], mut i: usize) {
    debug_assert!(heap.is_empty() || !on_min_level(i));
    while has_grandparent(i) {
        let g = index_grandparent(i);
        if heap[i] > heap[g] {
            heap.swap(i, g);
            i = g;
        } else {
            return;
        }
    }
}

/// Bubble up, re-routing to the other kind of level when the element is
/// on the wrong side of its parent.
pub fn bubble_up<T: Ord>(heap: &mut [T], i: usize) {
    if on_min_level(i) {
        if has_parent(i) && heap[i] > heap[index_parent(i)] {
            let p = index_parent(i);
            heap.swap(i, p);
            bubble_up_max(heap, p);
        } else {
            bubble_up_min(heap, i);
        }
    } else if has_parent(i) && heap[i] < heap[index_parent(i)] {
        let p = index_parent(i);
        heap.swap(i, p);
        bubble_up_min(heap, p);
    } else {
        bubble_up_max(heap, i);
    }
}

/// Turn an arbitrary slice into a min-max heap in place.
///
/// Floyd's construction adapted to the alternating levels: sift every
/// internal node down, last parent first. O(n).
pub fn make_heap<T: Ord>(heap: &mut [T]) {
    if heap.len() > 1 {
        for i in (0..=index_parent(heap.len() - 1)).rev() {
            sift_down(heap, i);
        }
    }
}

/// Append `value` and restore the invariant.
///
/// `heap` is the full storage of the run; `len` is its live count and
/// is incremented on success.
pub fn add<T: Ord>(value: T, heap: &mut [T], len: &mut usize) -> Result<(), Error> {
    if *len == heap.len() {
        return Err(Error::CapacityExceeded { capacity: heap.len() });
    }
    heap[*len] = value;
    *len += 1;
    bubble_up(&mut heap[..*len], *len - 1);
    Ok(())
}

/// Add to a run that is allowed to overflow: when full, the current
/// maximum is evicted to make room and returned as `Some(max)`.
///
/// The capacity is `heap.len()` and must be at least 1. After an
/// eviction the run still holds exactly `heap.len()` live elements.
pub fn ripple_add<T: Ord>(value: T, heap: &mut [T], len: &mut usize) -> Option<T> {
    debug_assert!(!heap.is_empty());
    debug_assert!(*len <= heap.len());
    if *len < heap.len() {
        heap[*len] = value;
        *len += 1;
        bubble_up(&mut heap[..*len], *len - 1);
        return None;
    }
    let m = if heap.len() > 1 { max_index(heap) } else { 0 };
    let evicted = std::mem::replace(&mut heap[m], value);
    if heap.len() > 1 {
        // A replacement smaller than the root must become the new root
        // before sifting, or the root-min property is lost.
        if heap[m] < heap[0] {
            heap.swap(0, m);
        }
        sift_down(heap, m);
    }
    Some(evicted)
}

/// Replace the element at `index` of a live run with `value`, restore
/// the invariant, and return the old element.
pub fn replace_at<T: Ord>(value: T, index: usize, heap: &mut [T]) -> Result<T, Error> {
    if heap.is_empty() {
        return Err(Error::Empty);
    }
    if index >= heap.len() {
        return Err(Error::OutOfRange { index, len: heap.len() });
    }
    let old = std::mem::replace(&mut heap[index], value);
    if on_min_level(index) {
        if heap[index] < old {
            bubble_up_min(heap, index);
        } else {
            if has_parent(index) && heap[index_parent(index)] < heap[index] {
                heap.swap(index_parent(index), index);
            }
            sift_down_min(heap, index);
        }
    } else if heap[index] > old {
        bubble_up_max(heap, index);
    } else {
        if has_parent(index) && heap[index] < heap[index_parent(index)] {
            heap.swap(index_parent(index), index);
        }
        sift_down_max(heap, index);
    }
    Ok(old)
}

/// Remove and return the element at `index`, refilling the slot with
/// the last live element.
pub fn remove_at<T: Ord + Clone>(index: usize, heap: &mut [T], len: &mut usize) -> Result<T, Error> {
    if *len == 0 {
        return Err(Error::Empty);
    }
    if index >= *len {
        return Err(Error::OutOfRange { index, len: *len });
    }
    let last = heap[*len - 1].clone();
    let old = replace_at(last, index, &mut heap[..*len])?;
    *len -= 1;
    Ok(old)
}

/// Remove and return the minimum.
pub fn remove_min<T: Ord + Clone>(heap: &mut [T], len: &mut usize) -> Result<T, Error> {
    if *len == 0 {
        return Err(Error::Empty);
    }
    let value = heap[0].clone();
    heap.swap(0, *len - 1);
    *len -= 1;
    sift_down(&mut heap[..*len], 0);
    Ok(value)
}

/// Remove and return the maximum.
pub fn remove_max<T: Ord + Clone>(heap: &mut [T], len: &mut usize) -> Result<T, Error> {
    if *len == 0 {
        return Err(Error::Empty);
    }
    let m = max_index(&heap[..*len]);
    remove_at(m, heap, len)
}

/// Panics unless `heap` is a valid min-max heap.
///
/// Checking each node against its children and grandchildren is enough;
/// the ordering against deeper descendants follows transitively.
#[cfg(any(test, feature = "verify"))]
pub fn assert_valid<T: Ord>(heap: &[T]) {
    for i in 0..heap.len() {
        let l = index_left(i);
        let r = index_right(i);
        for c in [l, r, index_left(l), index_right(l), index_left(r), index_right(r)] {
            if c >= heap.len() {
                continue;
            }
            if on_min_level(i) {
                assert!(
                    heap[i] <= heap[c],
                    "min-level [{i}] !<= descendant [{c}] in heap of len={}",
                    heap.len(),
                );
            } else {
                assert!(
                    heap[i] >= heap[c],
                    "max-level [{i}] !>= descendant [{c}] in heap of len={}",
                    heap.len(),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;
    use rand_chacha::rand_core::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn build(values: &[u32]) -> Vec<u32> {
        let mut heap = values.to_vec();
        make_heap(&mut heap);
        assert_valid(&heap);
        heap
    }

    #[test]
    fn empty_heap_reports_empty() {
        let heap: [u32; 0] = [];
        assert_eq!(peek_min(&heap), Err(Error::Empty));
        assert_eq!(peek_max(&heap), Err(Error::Empty));
        let mut heap: [u32; 0] = [];
        let mut len = 0;
        assert_eq!(remove_min(&mut heap, &mut len), Err(Error::Empty));
        assert_eq!(remove_max(&mut heap, &mut len), Err(Error::Empty));
        assert_eq!(remove_at(0, &mut heap, &mut len), Err(Error::Empty));
    }

    #[test]
    fn make_heap_exposes_both_ends() {
        let heap = build(&[3, 1, 4, 1, 5, 9, 2, 6, 5, 3, 5]);
        assert_eq!(*peek_min(&heap).unwrap(), 1);
        assert_eq!(*peek_max(&heap).unwrap(), 9);
    }

    #[test]
    fn add_keeps_both_ends_current() {
        let mut heap = vec![0u32; 64];
        let mut len = 0;
        let mut lo = u32::MAX;
        let mut hi = u32::MIN;
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..64 {
            let v = rng.random::<u32>() % 1000;
            lo = lo.min(v);
            hi = hi.max(v);
            add(v, &mut heap, &mut len).unwrap();
            assert_valid(&heap[..len]);
            assert_eq!(*peek_min(&heap[..len]).unwrap(), lo);
            assert_eq!(*peek_max(&heap[..len]).unwrap(), hi);
        }
        assert_eq!(
            add(0, &mut heap, &mut len),
            Err(Error::CapacityExceeded { capacity: 64 })
        );
    }

    #[test]
    fn remove_min_drains_ascending() {
        let mut heap = build(&[8, 2, 5, 7, 1, 4, 3, 6, 0, 9]);
        let mut len = heap.len();
        let mut drained = vec![];
        while len > 0 {
            drained.push(remove_min(&mut heap, &mut len).unwrap());
            assert_valid(&heap[..len]);
        }
        assert_eq!(drained, vec![0, 1, 2, 3, 4, 5, 6, 7, 8, 9]);
    }

    #[test]
    fn remove_max_drains_descending() {
        let mut heap = build(&[8, 2, 5, 7, 1, 4, 3, 6, 0, 9]);
        let mut len = heap.len();
        let mut drained = vec![];
        while len > 0 {
            drained.push(remove_max(&mut heap, &mut len).unwrap());
            assert_valid(&heap[..len]);
        }
        assert_eq!(drained, vec![9, 8, 7, 6, 5, 4, 3, 2, 1, 0]);
    }

    #[test]
    fn heap_sorts_strings() {
        let mut heap = vec![String::new(); 6];
        let mut len = 0;
        for name in ["c", "e", "f", "a", "d", "b"] {
            add(name.to_string(), &mut heap, &mut len).unwrap();
        }
        let mut drained = vec![];
        while len > 0 {
            drained.push(remove_min(&mut heap, &mut len).unwrap());
        }
        assert_eq!(drained, vec!["a", "b", "c", "d", "e", "f"]);
    }

    #[test]
    fn ripple_add_fills_then_evicts_the_max() {
        let mut heap = vec![0u32; 5];
        let mut len = 0;
        for v in [30, 10, 50, 20, 40] {
            assert_eq!(ripple_add(v, &mut heap, &mut len), None);
        }
        assert_eq!(len, 5);
        // Full: each add must push out the current maximum.
        assert_eq!(ripple_add(25, &mut heap, &mut len), Some(50));
        assert_valid(&heap);
        assert_eq!(ripple_add(35, &mut heap, &mut len), Some(40));
        assert_valid(&heap);
        // A value above the current max evicts the max and stays itself.
        assert_eq!(ripple_add(99, &mut heap, &mut len), Some(35));
        assert_valid(&heap);
        assert_eq!(*peek_max(&heap).unwrap(), 99);
        assert_eq!(len, 5);
    }

    #[test]
    fn ripple_add_on_unit_capacity() {
        // The root is the single element; no compare-against-root step.
        let mut heap = vec![0u32; 1];
        let mut len = 0;
        assert_eq!(ripple_add(7, &mut heap, &mut len), None);
        assert_eq!(ripple_add(3, &mut heap, &mut len), Some(7));
        assert_eq!(heap[0], 3);
        assert_eq!(ripple_add(9, &mut heap, &mut len), Some(3));
        assert_eq!(heap[0], 9);
        assert_eq!(len, 1);
    }

    #[test]
    fn ripple_add_min_replacement_reaches_the_root() {
        let mut heap = build(&[10, 20, 30, 40, 50]);
        let mut len = heap.len();
        assert_eq!(ripple_add(5, &mut heap, &mut len), Some(50));
        assert_valid(&heap);
        assert_eq!(*peek_min(&heap).unwrap(), 5);
    }

    #[test]
    fn replace_at_returns_the_old_value() {
        let mut heap = build(&[10, 20, 30, 40, 50]);
        let old = replace_at(35, 0, &mut heap).unwrap();
        assert_eq!(old, 10);
        assert_valid(&heap);
        assert_eq!(*peek_min(&heap).unwrap(), 20);
        assert_eq!(*peek_max(&heap).unwrap(), 50);

        let m = max_index(&heap);
        let old = replace_at(15, m, &mut heap).unwrap();
        assert_eq!(old, 50);
        assert_valid(&heap);
        assert_eq!(*peek_max(&heap).unwrap(), 40);
    }

    #[test]
    fn replace_at_bounds_are_checked() {
        let mut heap = build(&[1, 2, 3]);
        assert_eq!(
            replace_at(9, 3, &mut heap),
            Err(Error::OutOfRange { index: 3, len: 3 })
        );
    }

    #[test]
    fn remove_at_keeps_the_rest_intact() {
        let values = [9u32, 3, 7, 1, 5, 8, 2, 6, 4, 0];
        for victim in 0..values.len() {
            let mut heap = build(&values);
            let mut len = heap.len();
            let removed = remove_at(victim, &mut heap, &mut len).unwrap();
            assert_valid(&heap[..len]);
            let mut rest = heap[..len].to_vec();
            rest.sort_unstable();
            let mut expected: Vec<u32> = values.to_vec();
            expected.retain(|&v| v != removed);
            expected.sort_unstable();
            assert_eq!(rest, expected);
        }
    }

    #[test]
    fn random_mutations_preserve_the_invariant() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        for round in 0..50 {
            let size = 1 + (round % 17);
            let mut heap = vec![0i64; size];
            let mut len = 0;
            for _ in 0..size {
                add(rng.random::<i64>() % 100, &mut heap, &mut len).unwrap();
                assert_valid(&heap[..len]);
            }
            for _ in 0..(3 * size) {
                match rng.random::<u32>() % 3 {
                    0 => {
                        let evicted = ripple_add(rng.random::<i64>() % 100, &mut heap, &mut len);
                        assert!(evicted.is_some());
                    }
                    1 => {
                        let i = rng.random_range(0..len);
                        replace_at(rng.random::<i64>() % 100, i, &mut heap[..len]).unwrap();
                    }
                    _ => {
                        let i = rng.random_range(0..len);
                        remove_at(i, &mut heap, &mut len).unwrap();
                        add(rng.random::<i64>() % 100, &mut heap, &mut len).unwrap();
                    }
                }
                assert_valid(&heap[..len]);
                let lo = heap[..len].iter().min().unwrap();
                let hi = heap[..len].iter().max().unwrap();
                assert_eq!(peek_min(&heap[..len]).unwrap(), lo);
                assert_eq!(peek_max(&heap[..len]).unwrap(), hi);
            }
        }
    }
}
