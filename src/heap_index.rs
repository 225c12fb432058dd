// Index arithmetic for the implicit binary tree embedded in an array.
//
// A run of the buffer is traversed as a complete binary tree using the
// usual 0-based layout:
//
// ```text
//                           0                 ← min level
//              1                         2    ← max level
//       3            4            5         6 ← min level
//   7      8      9     10    11    12   ...  ← max level
// ```
//
// Moving around costs one or two shifts,
//   - Up:         `(i-1)/2`
//   - Down-left:  `2i + 1`
//   - Down-right: `2i + 2`
//
// Levels alternate between min-ordered and max-ordered, root first, so
// the parity of `log2(i+1)` tells which kind of level an index sits on.

/// The parent index.
///
/// ```
/// use strata::heap_index::index_parent;
/// assert_eq!(index_parent(1), 0);
/// assert_eq!(index_parent(2), 0);
/// assert_eq!(index_parent(3), 1);
/// assert_eq!(index_parent(4), 1);
/// assert_eq!(index_parent(25), 12);
/// ```
#[inline(always)]
#[must_use]
pub fn index_parent(i: usize) -> usize {
    debug_assert!(i > 0);
    (i - 1) / 2
}

/// The left child index.
///
/// ```
/// use strata::heap_index::index_left;
/// assert_eq!(index_left(0), 1);
/// assert_eq!(index_left(1), 3);
/// assert_eq!(index_left(3), 7);
/// assert_eq!(index_left(11), 23);
/// ```
#[inline(always)]
#[must_use]
pub fn index_left(i: usize) -> usize {
    2 * i + 1
}

/// The right child index.
///
/// ```
/// use strata::heap_index::index_right;
/// assert_eq!(index_right(0), 2);
/// assert_eq!(index_right(1), 4);
/// assert_eq!(index_right(2), 6);
/// assert_eq!(index_right(6), 14);
/// ```
#[inline(always)]
#[must_use]
pub fn index_right(i: usize) -> usize {
    2 * (i + 1)
}

/// The grandparent index.
///
/// ```
/// use strata::heap_index::index_grandparent;
/// assert_eq!(index_grandparent(3), 0);
/// assert_eq!(index_grandparent(6), 0);
/// assert_eq!(index_grandparent(7), 1);
/// assert_eq!(index_grandparent(12), 2);
/// ```
#[inline(always)]
#[must_use]
pub fn index_grandparent(i: usize) -> usize {
    debug_assert!(i > 2);
    index_parent(index_parent(i))
}

/// Whether `i` has a parent (everything but the root does).
#[inline(always)]
#[must_use]
pub fn has_parent(i: usize) -> bool {
    i > 0
}

/// Whether `i` has a grandparent (everything below the first two levels).
#[inline(always)]
#[must_use]
pub fn has_grandparent(i: usize) -> bool {
    i > 2
}

/// Whether `c` is a direct child of `i`.
///
/// ```
/// use strata::heap_index::is_child_of;
/// assert!(is_child_of(0, 1));
/// assert!(is_child_of(0, 2));
/// assert!(!is_child_of(0, 3));
/// assert!(is_child_of(5, 12));
/// ```
#[inline(always)]
#[must_use]
pub fn is_child_of(i: usize, c: usize) -> bool {
    c == index_left(i) || c == index_right(i)
}

/// Whether `i` sits on a min level.
///
/// The root is a min level and levels alternate, so `i` is min-ordered
/// exactly when `log2(i+1)` is even.
///
/// ```
/// use strata::heap_index::on_min_level;
/// assert!(on_min_level(0));
/// assert!(!on_min_level(1));
/// assert!(!on_min_level(2));
/// assert!((3..=6).all(on_min_level));
/// assert!(!(7..=14).any(on_min_level));
/// ```
#[inline(always)]
#[must_use]
pub fn on_min_level(i: usize) -> bool {
    (i + 1).ilog2() % 2 == 0
}
