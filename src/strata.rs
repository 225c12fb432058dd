// The partitioned container.
//
// One contiguous buffer, carved into runs of sizes 1, 3, 5, … (see
// `partition`), each run a min-max heap (see `minmax_heap`), with every
// element of run p ≤ every element of run p+1. The layout buys
// O(1) min/max, O(√N · log √N) insert and remove, and O(√N) search,
// all without a single pointer.
//
// ```text
//  run:       0    1            2
//  buffer:  | 2 | 3   5   4 | 6   9   8   6   7 | ...
//            min   each run individually heap-ordered
// ```
//
// Only the final run may be partially filled; an insert that lands in
// an earlier (full) run evicts that run's maximum and carries it
// forward, and a remove from an earlier run refills the hole by pulling
// the final run's minimum backward through every run in between.

use crate::error::Error;
use crate::minmax_heap;
use crate::partition::count_in_partition;
use crate::partition::final_partition;
use crate::partition::next_square;
use crate::partition::partition_size;
use crate::partition::partition_start;

/// Fresh buffers start at this many slots (rounded up to a square).
const MIN_ALLOCATION: usize = 4;

/// An ordered container over one contiguous buffer of √N min-max heap
/// runs: a searchable double-ended priority queue.
///
/// Elements need a total order, value copies, and a default value for
/// unoccupied buffer slots. Duplicates are allowed; `remove` strikes an
/// unspecified one of them.
#[derive(Debug)]
pub struct Strata<T>
where
    T: Ord + Clone + Default,
{
    buf: Box<[T]>,
    count: usize,
    fixed: bool,
}

/// Where `locate` found a value: the absolute buffer index, the owning
/// partition, and the offset inside that partition.
struct Located {
    index: usize,
    partition: usize,
    offset: usize,
}

impl<T> Strata<T>
where
    T: Ord + Clone + Default,
{
    /// An empty, growable container. Allocates nothing.
    pub fn new() -> Self {
        Self {
            buf: Vec::new().into_boxed_slice(),
            count: 0,
            fixed: false,
        }
    }

    /// An empty container with room for at least `reserve` elements,
    /// rounded up to the next perfect square. With `allow_resize`
    /// false the container never grows past that storage.
    pub fn with_capacity(reserve: usize, allow_resize: bool) -> Self {
        let storage = next_square(reserve);
        Self {
            buf: vec![T::default(); storage].into_boxed_slice(),
            count: 0,
            fixed: !allow_resize,
        }
    }

    /// Build from an existing range of values (bulk build: sort, then
    /// heapify each run).
    pub fn from_slice(values: &[T], allow_resize: bool) -> Self {
        Self::build(values, values.len(), allow_resize)
    }

    /// Like [`Strata::from_slice`], but sized for `storage` slots
    /// rather than for the values alone.
    pub fn from_slice_with_storage(values: &[T], storage: usize, allow_resize: bool) -> Self {
        Self::build(values, storage, allow_resize)
    }

    fn build(values: &[T], target: usize, allow_resize: bool) -> Self {
        debug_assert!(target >= values.len());
        let mut this = Self::new();
        // Round up only when the container may resize; a fixed-size
        // build keeps its exact requested storage.
        this.reallocate(target, allow_resize);
        this.buf[..values.len()].clone_from_slice(values);
        this.count = values.len();
        this.rebuild();
        this.fixed = !allow_resize;
        this.verify();
        this
    }

    /// Number of live elements.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.count
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Physical storage in slots.
    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Whether the container refuses to grow.
    #[inline(always)]
    pub fn is_fixed(&self) -> bool {
        self.fixed
    }

    /// The smallest element, at the root of the first run.
    #[inline(always)]
    pub fn min(&self) -> Result<&T, Error> {
        minmax_heap::peek_min(self.as_slice())
    }

    /// The largest element, at the top of the final run.
    #[inline(always)]
    pub fn max(&self) -> Result<&T, Error> {
        let last = self.final_partition();
        let start = partition_start(last);
        minmax_heap::peek_max(&self.buf[start..start + self.count_in_partition(last)])
    }

    /// Read-only access to raw storage slot `index`.
    ///
    /// The order of elements is the buffer order, not the sorted order;
    /// it only obeys the partition invariants.
    pub fn get(&self, index: usize) -> Result<&T, Error> {
        if index >= self.count {
            return Err(Error::OutOfRange { index, len: self.count });
        }
        Ok(&self.buf[index])
    }

    /// The live elements, in buffer order.
    #[inline(always)]
    pub fn as_slice(&self) -> &[T] {
        &self.buf[..self.count]
    }

    /// Iterate the live elements in buffer order.
    #[inline(always)]
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.as_slice().iter()
    }

    /// The buffer index holding `value`, if present. With duplicates,
    /// which one is found is unspecified.
    pub fn find(&self, value: &T) -> Option<usize> {
        self.locate(value).map(|hit| hit.index)
    }

    pub fn contains(&self, value: &T) -> bool {
        self.locate(value).is_some()
    }

    /// Insert a value, growing the buffer if needed.
    ///
    /// The value lands in the run whose range covers it; if that run is
    /// full its displaced maximum ripples forward through the following
    /// runs until one has room (the final, partial run always does).
    pub fn insert(&mut self, value: T) -> Result<(), Error> {
        if self.count == self.buf.len() {
            if self.fixed {
                return Err(Error::CapacityExceeded { capacity: self.buf.len() });
            }
            self.grow()?;
        }
        let mut p = self.find_partition(&value, true);
        let mut value = value;
        loop {
            let mut live = self.count_in_partition(p);
            let run = self.partition_storage_mut(p);
            if live == run.len() && value >= run[minmax_heap::max_index(run)] {
                // A value no smaller than a full run's maximum belongs
                // past that run; rippling it in would strand the
                // displaced maximum to the right of a larger value.
                // The runs are all full exactly at square sizes, so a
                // fresh maximum walks to the empty run at the end.
                p += 1;
                continue;
            }
            match minmax_heap::ripple_add(value, run, &mut live) {
                None => break,
                Some(evicted) => {
                    // The evicted maximum is ≤ everything already in
                    // the next run, so carrying it forward keeps the
                    // inter-run ordering.
                    value = evicted;
                    p += 1;
                }
            }
        }
        self.count += 1;
        self.verify();
        Ok(())
    }

    /// Remove one occurrence of `value`. Returns whether anything was
    /// removed; removing an absent value is not an error.
    ///
    /// A hit in the final run is struck directly. A hit in an earlier
    /// run leaves a hole that must be refilled from the right: the
    /// final run gives up its minimum, which ripples backward through
    /// every intermediate run (each swaps it for its own minimum) until
    /// it lands in the victim's slot.
    pub fn remove(&mut self, value: &T) -> bool {
        let Some(hit) = self.locate(value) else {
            return false;
        };
        let last = self.final_partition();
        if hit.partition == last {
            let mut live = self.count_in_partition(last);
            minmax_heap::remove_at(hit.offset, self.partition_storage_mut(last), &mut live)
                .expect("located element lies within the final run");
        } else {
            let mut live = self.count_in_partition(last);
            let mut carry = minmax_heap::remove_min(self.partition_storage_mut(last), &mut live)
                .expect("the final run is never empty while elements remain");
            for q in (hit.partition + 1..last).rev() {
                let qlive = self.count_in_partition(q);
                let run = self.partition_storage_mut(q);
                carry = minmax_heap::replace_at(carry, 0, &mut run[..qlive])
                    .expect("runs before the final one are full");
            }
            let plive = self.count_in_partition(hit.partition);
            let run = self.partition_storage_mut(hit.partition);
            minmax_heap::replace_at(carry, hit.offset, &mut run[..plive])
                .expect("located element lies within its run");
        }
        self.count -= 1;
        self.verify();
        true
    }

    // Implementation details

    #[inline(always)]
    fn final_partition(&self) -> usize {
        final_partition(self.count)
    }

    #[inline(always)]
    fn count_in_partition(&self, p: usize) -> usize {
        count_in_partition(self.count, p)
    }

    /// Storage range of partition `p`, clamped to the buffer end: with
    /// non-square (fixed) storage the final run may own fewer slots
    /// than its nominal 2p+1.
    fn partition_storage_mut(&mut self, p: usize) -> &mut [T] {
        let start = partition_start(p);
        let end = (start + partition_size(p)).min(self.buf.len());
        &mut self.buf[start..end]
    }

    /// Live elements of partition `p`.
    fn partition_live(&self, p: usize) -> &[T] {
        let start = partition_start(p);
        &self.buf[start..start + self.count_in_partition(p)]
    }

    /// The maximum of partition `p`, which must be non-empty.
    fn partition_max(&self, p: usize) -> &T {
        let run = self.partition_live(p);
        &run[minmax_heap::max_index(run)]
    }

    /// Binary search for the partition whose [min, max] range covers
    /// `value`, over the per-partition ranges (every run's min is its
    /// root, its max is one peek away).
    ///
    /// With `for_insert` the acceptance test widens to an ordered
    /// try-list, first match wins: value inside the range; value below
    /// the range but no lower than the previous run's max; value below
    /// the first run's max; value above the final run's min. A plain
    /// search that misses returns 0 and the caller detects the miss by
    /// scanning.
    fn find_partition(&self, value: &T, for_insert: bool) -> usize {
        if self.count == 0 {
            return 0;
        }
        let mut left = 0;
        let mut right = self.final_partition();
        while left <= right {
            let mid = (left + right) / 2;
            let run = self.partition_live(mid);
            let lo = &run[0];
            let hi = &run[minmax_heap::max_index(run)];
            if (lo <= value && value <= hi)
                || (for_insert
                    && ((mid > 0 && value <= hi && self.partition_max(mid - 1) <= value)
                        || (mid == 0 && value <= hi)
                        || (mid == self.final_partition() && lo <= value)))
            {
                return mid;
            }
            if hi < value {
                left = mid + 1;
            } else {
                if mid == 0 {
                    // The right end is unsigned and cannot pass zero.
                    break;
                }
                right = mid - 1;
            }
        }
        0
    }

    /// Find `value`: binary search for the candidate partition, then a
    /// linear scan of that run's live range (inside a run only the
    /// heap invariant holds, so a scan it is, and the run is O(√N)).
    fn locate(&self, value: &T) -> Option<Located> {
        if self.count == 0 {
            return None;
        }
        let p = self.find_partition(value, false);
        let start = partition_start(p);
        let offset = self.partition_live(p).iter().position(|x| x == value)?;
        Some(Located {
            index: start + offset,
            partition: p,
            offset,
        })
    }

    /// Swap the buffer for one of `new_size` slots (or release it when
    /// zero), keeping the live prefix.
    fn reallocate(&mut self, new_size: usize, round_up: bool) {
        if new_size == 0 {
            log::trace!("releasing buffer ({} slots)", self.buf.len());
            self.buf = Vec::new().into_boxed_slice();
            self.count = 0;
            return;
        }
        // Allocation sizes should always be perfect squares.
        let new_size = if round_up { next_square(new_size) } else { new_size };
        log::trace!("reallocating storage {} -> {} slots", self.buf.len(), new_size);
        let mut fresh = vec![T::default(); new_size].into_boxed_slice();
        let keep = self.count.min(new_size);
        fresh[..keep].clone_from_slice(&self.buf[..keep]);
        self.buf = fresh;
    }

    fn resize(&mut self, new_size: usize, round_up: bool) -> Result<(), Error> {
        if self.fixed {
            return Err(Error::ResizeForbidden);
        }
        self.reallocate(new_size, round_up);
        Ok(())
    }

    /// Double the storage (rounded up to the next square), starting
    /// from [`MIN_ALLOCATION`] on a fresh container.
    fn grow(&mut self) -> Result<(), Error> {
        let next = if self.buf.is_empty() {
            MIN_ALLOCATION
        } else {
            2 * self.buf.len()
        };
        self.resize(next, true)
    }

    /// Bulk build: sort the whole live range ascending (which makes the
    /// inter-run ordering hold by construction), then heapify each run
    /// in place. Run 0 has one slot and is trivially a heap.
    fn rebuild(&mut self) {
        self.buf[..self.count].sort_unstable();
        for p in 1..=final_partition(self.count) {
            let start = partition_start(p);
            let live = count_in_partition(self.count, p);
            minmax_heap::make_heap(&mut self.buf[start..start + live]);
        }
    }

    #[inline(always)]
    #[cfg(not(any(test, feature = "verify")))]
    fn verify(&self) {
        // Checked only with the `verify` feature.
    }

    #[inline(always)]
    #[cfg(any(test, feature = "verify"))]
    fn verify(&self) {
        self.assert_invariants();
    }

    /// Panics unless every container invariant holds: live count within
    /// storage, square storage (growable containers), full runs before
    /// the final one, each run a min-max heap, and adjacent runs in
    /// order.
    #[cfg(any(test, feature = "verify"))]
    pub fn assert_invariants(&self) {
        assert!(self.count <= self.buf.len());
        if !self.fixed {
            let k = self.buf.len().isqrt();
            assert_eq!(
                k * k,
                self.buf.len(),
                "storage {} is not a perfect square",
                self.buf.len(),
            );
        }
        if self.count == 0 {
            return;
        }
        let last = self.final_partition();
        for p in 0..=last {
            let live = self.count_in_partition(p);
            if p < last {
                assert_eq!(live, partition_size(p), "run {p} before the final one is not full");
            } else {
                assert!(live >= 1 && live <= partition_size(p));
            }
            minmax_heap::assert_valid(self.partition_live(p));
            if p < last {
                assert!(
                    self.partition_max(p) <= &self.buf[partition_start(p + 1)],
                    "max of run {p} leaks past the min of run {}",
                    p + 1,
                );
            }
        }
    }
}

impl<T> Default for Strata<T>
where
    T: Ord + Clone + Default,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for Strata<T>
where
    T: Ord + Clone + Default,
{
    /// Deep copy: the live range is copied into a freshly allocated
    /// buffer of the source's storage size.
    fn clone(&self) -> Self {
        let mut buf = vec![T::default(); self.buf.len()].into_boxed_slice();
        buf[..self.count].clone_from_slice(&self.buf[..self.count]);
        Self {
            buf,
            count: self.count,
            fixed: self.fixed,
        }
    }
}

impl<'a, T> IntoIterator for &'a Strata<T>
where
    T: Ord + Clone + Default,
{
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
