// Partition geometry.
//
// The buffer is carved into runs whose sizes are the consecutive odd
// numbers, so partition p holds 2p+1 slots and the first p partitions
// hold exactly p² slots between them:
//
// ```text
// partition:   0   1           2                   3
// buffer:    | 0 | 1   2   3 | 4   5   6   7   8 | 9  ...  15 | ...
//            1 slot  3 slots        5 slots          7 slots
// ```
//
// Squares fall out everywhere: partition p starts at p², a buffer of
// k² slots holds exactly k partitions, and the partition owning buffer
// index i is √i rounded down.

/// Number of slots in partition `p`.
///
/// ```
/// use strata::partition::partition_size;
/// assert_eq!(partition_size(0), 1);
/// assert_eq!(partition_size(1), 3);
/// assert_eq!(partition_size(4), 9);
/// ```
#[inline(always)]
#[must_use]
pub fn partition_size(p: usize) -> usize {
    2 * p + 1
}

/// First buffer index of partition `p`.
///
/// ```
/// use strata::partition::partition_start;
/// assert_eq!(partition_start(0), 0);
/// assert_eq!(partition_start(1), 1);
/// assert_eq!(partition_start(2), 4);
/// assert_eq!(partition_start(3), 9);
/// ```
#[inline(always)]
#[must_use]
pub fn partition_start(p: usize) -> usize {
    p * p
}

/// Last buffer index of partition `p`, inclusive.
///
/// ```
/// use strata::partition::partition_end;
/// assert_eq!(partition_end(0), 0);
/// assert_eq!(partition_end(1), 3);
/// assert_eq!(partition_end(2), 8);
/// ```
#[inline(always)]
#[must_use]
pub fn partition_end(p: usize) -> usize {
    p * p + 2 * p
}

/// The partition owning buffer index `i`.
///
/// ```
/// use strata::partition::partition_of_index;
/// assert_eq!(partition_of_index(0), 0);
/// assert_eq!(partition_of_index(3), 1);
/// assert_eq!(partition_of_index(4), 2);
/// assert_eq!(partition_of_index(8), 2);
/// assert_eq!(partition_of_index(9), 3);
/// ```
#[inline(always)]
#[must_use]
pub fn partition_of_index(i: usize) -> usize {
    i.isqrt()
}

/// Index of the last non-empty partition for a container of `count`
/// elements; 0 when empty.
///
/// ```
/// use strata::partition::final_partition;
/// assert_eq!(final_partition(0), 0);
/// assert_eq!(final_partition(1), 0);
/// assert_eq!(final_partition(2), 1);
/// assert_eq!(final_partition(4), 1);
/// assert_eq!(final_partition(5), 2);
/// assert_eq!(final_partition(9), 2);
/// assert_eq!(final_partition(10), 3);
/// ```
#[inline(always)]
#[must_use]
pub fn final_partition(count: usize) -> usize {
    if count == 0 { 0 } else { ceil_sqrt(count) - 1 }
}

/// Number of live elements in partition `p` of a container holding
/// `count` elements. Partitions before the final one are always full;
/// the final one holds whatever is left past the p² slots before it.
///
/// ```
/// use strata::partition::count_in_partition;
/// assert_eq!(count_in_partition(9, 0), 1);
/// assert_eq!(count_in_partition(9, 1), 3);
/// assert_eq!(count_in_partition(9, 2), 5);
/// assert_eq!(count_in_partition(6, 2), 2);
/// assert_eq!(count_in_partition(5, 2), 1);
/// ```
#[inline(always)]
#[must_use]
pub fn count_in_partition(count: usize, p: usize) -> usize {
    if p < final_partition(count) {
        partition_size(p)
    } else {
        debug_assert!(count >= partition_start(p));
        count - partition_start(p)
    }
}

/// ⌈√n⌉ without going through floats.
///
/// ```
/// use strata::partition::ceil_sqrt;
/// assert_eq!(ceil_sqrt(0), 0);
/// assert_eq!(ceil_sqrt(1), 1);
/// assert_eq!(ceil_sqrt(2), 2);
/// assert_eq!(ceil_sqrt(4), 2);
/// assert_eq!(ceil_sqrt(5), 3);
/// assert_eq!(ceil_sqrt(9), 3);
/// ```
#[inline(always)]
#[must_use]
pub fn ceil_sqrt(n: usize) -> usize {
    let r = n.isqrt();
    if r * r == n { r } else { r + 1 }
}

/// The smallest perfect square ≥ `n`.
///
/// ```
/// use strata::partition::next_square;
/// assert_eq!(next_square(0), 0);
/// assert_eq!(next_square(1), 1);
/// assert_eq!(next_square(8), 9);
/// assert_eq!(next_square(9), 9);
/// assert_eq!(next_square(17), 25);
/// ```
#[inline(always)]
#[must_use]
pub fn next_square(n: usize) -> usize {
    let r = ceil_sqrt(n);
    r * r
}
