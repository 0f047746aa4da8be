//! # Position Arithmetic
//!
//! Closed-form navigation over 1-based element positions. Positions are
//! assigned in post-order: every leaf is followed by the parents it
//! completes.
//!
//! ```text
//! height 2:          7
//!                  /   \
//! height 1:      3       6        10
//!               / \     / \      /  \
//! height 0:    1   2   4   5    8    9   11
//! ```
//!
//! A complete mountain of height `h` holds `2^(h+1) - 1` elements, so the
//! peaks of an MMR with `n` elements are found by peeling off the largest
//! `2^k - 1` that still fits, the same way a binary counter is read.

/// Number of significant bits in `n`.
pub fn bit_length(n: u64) -> u32 {
    u64::BITS - n.leading_zeros()
}

/// True when `n` is of the form `2^k - 1` with `k >= 1`.
pub fn all_ones(n: u64) -> bool {
    n != 0 && n & n.wrapping_add(1) == 0
}

/// Move from a position to the equivalent position in the leftmost mountain
/// of the same height class by removing the largest left subtree.
pub fn jump_left(n: u64) -> u64 {
    n - ((1u64 << (bit_length(n) - 1)) - 1)
}

/// Height of the node at `position` (0 for leaves).
///
/// Position 0 does not exist; it reports height 0.
pub fn height(position: u64) -> u32 {
    if position == 0 {
        return 0;
    }
    let mut h = position;
    while !all_ones(h) {
        h = jump_left(h);
    }
    bit_length(h) - 1
}

/// Distance between two siblings of height `h`.
pub fn sibling_offset(h: u32) -> u64 {
    (2u64 << h) - 1
}

/// Distance from a left child of height `h` to its parent.
pub fn parent_offset(h: u32) -> u64 {
    2u64 << h
}

/// True when the node at `position` is the right child of its parent.
///
/// A right child is immediately followed by its parent, which is one level
/// higher.
pub fn is_right_child(position: u64) -> bool {
    height(position + 1) == height(position) + 1
}

/// True when the node at `position` is a leaf.
pub fn is_leaf(position: u64) -> bool {
    position != 0 && height(position) == 0
}

/// Peak positions, left to right (highest mountain first), of an MMR holding
/// `elements_count` elements.
///
/// Returns `None` when no sequence of appends produces that many elements
/// (2, 5, 6, 9, ...).
pub fn find_peaks(elements_count: u64) -> Option<Vec<u64>> {
    if elements_count == 0 {
        return Some(Vec::new());
    }
    let mut mountain = u64::MAX >> elements_count.leading_zeros();
    let mut remaining = elements_count;
    let mut shift = 0u64;
    let mut peaks = Vec::with_capacity(bit_length(elements_count) as usize);
    while mountain > 0 {
        if mountain <= remaining {
            shift += mountain;
            peaks.push(shift);
            remaining -= mountain;
        }
        mountain >>= 1;
    }
    if remaining > 0 {
        return None;
    }
    Some(peaks)
}

/// True when `elements_count` is a reachable MMR size.
pub fn is_valid_size(elements_count: u64) -> bool {
    find_peaks(elements_count).is_some()
}

/// Number of elements after appending `leaf_count` leaves, or `None` when
/// that count does not fit in a `u64`.
pub fn leaf_count_to_elements_count(leaf_count: u64) -> Option<u64> {
    leaf_count
        .checked_mul(2)?
        .checked_sub(u64::from(leaf_count.count_ones()))
}

/// Number of leaves in an MMR of `elements_count` elements, or `None` for an
/// unreachable size.
pub fn elements_count_to_leaf_count(elements_count: u64) -> Option<u64> {
    if elements_count == 0 {
        return Some(0);
    }
    let mut remaining = u128::from(elements_count);
    let mut mountain_leaves = 1u128 << (bit_length(elements_count) - 1);
    let mut leaf_count = 0u128;
    while mountain_leaves > 0 {
        let mountain_elements = 2 * mountain_leaves - 1;
        if mountain_elements <= remaining {
            leaf_count += mountain_leaves;
            remaining -= mountain_elements;
        }
        mountain_leaves >>= 1;
    }
    if remaining > 0 {
        return None;
    }
    u64::try_from(leaf_count).ok()
}

/// Element position of the leaf with 1-based `leaf_index`.
pub fn leaf_index_to_position(leaf_index: u64) -> Option<u64> {
    if leaf_index == 0 {
        return None;
    }
    leaf_count_to_elements_count(leaf_index - 1)?.checked_add(1)
}

/// 1-based leaf index of the leaf at `position`; `None` for internal nodes.
pub fn position_to_leaf_index(position: u64) -> Option<u64> {
    if !is_leaf(position) {
        return None;
    }
    elements_count_to_leaf_count(position - 1).map(|n| n + 1)
}

/// The walk from an element to the peak that contains it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProofPath {
    /// Sibling positions, bottom-up.
    pub siblings: Vec<u64>,
    /// Position of the containing peak.
    pub peak_position: u64,
    /// Index of the containing peak in [`find_peaks()`] order.
    pub peak_index: usize,
}

/// Compute the sibling positions between `position` and its peak in an MMR
/// of `elements_count` elements.
///
/// Returns `None` when the size is unreachable or the position is outside
/// `1..=elements_count`.
pub fn proof_path(position: u64, elements_count: u64) -> Option<ProofPath> {
    if position == 0 || position > elements_count {
        return None;
    }
    let peaks = find_peaks(elements_count)?;
    let mut siblings = Vec::new();
    let mut current = position;
    loop {
        if let Ok(peak_index) = peaks.binary_search(&current) {
            return Some(ProofPath {
                siblings,
                peak_position: current,
                peak_index,
            });
        }
        let h = height(current);
        if is_right_child(current) {
            siblings.push(current - sibling_offset(h));
            current += 1;
        } else {
            siblings.push(current + sibling_offset(h));
            current += parent_offset(h);
        }
        if current > elements_count {
            return None;
        }
    }
}
