//! # Domain-Separated SHA-256 Hasher
//!
//! Same tree shape as the Keccak hasher, with a one-byte tag per input
//! class so that no leaf, node, peak merge, or root preimage can be
//! reinterpreted as another:
//!
//! - Leaf: `SHA256(0x00 ‖ position ‖ value)`
//! - Node: `SHA256(0x01 ‖ position ‖ left ‖ right)`
//! - Peak merge: `SHA256(0x02 ‖ left ‖ right)`
//! - Root: `SHA256(0x03 ‖ elements_count ‖ bag)`
//!
//! Positions and counts are 32-byte big-endian words.

use mmr_core::Bytes32;
use sha2::{Digest, Sha256};

use crate::hasher::{HashAlgorithm, Hasher};

const LEAF_TAG: u8 = 0x00;
const NODE_TAG: u8 = 0x01;
const PEAK_TAG: u8 = 0x02;
const ROOT_TAG: u8 = 0x03;

/// SHA-256 over a tag byte followed by 32-byte words.
fn sha256_tagged(tag: u8, words: &[&Bytes32]) -> Bytes32 {
    let mut hasher = Sha256::new();
    hasher.update([tag]);
    for word in words {
        hasher.update(word.as_bytes());
    }
    Bytes32::new(hasher.finalize().into())
}

/// Domain-separated SHA-256 hasher.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256Hasher;

impl Sha256Hasher {
    /// Create a new hasher.
    pub fn new() -> Self {
        Self
    }
}

impl Hasher for Sha256Hasher {
    fn algorithm(&self) -> HashAlgorithm {
        HashAlgorithm::Sha256
    }

    fn hash_leaf(&self, position: u64, value: &Bytes32) -> Bytes32 {
        sha256_tagged(LEAF_TAG, &[&Bytes32::from_u64(position), value])
    }

    fn hash_node(&self, position: u64, left: &Bytes32, right: &Bytes32) -> Bytes32 {
        sha256_tagged(NODE_TAG, &[&Bytes32::from_u64(position), left, right])
    }

    fn merge_peaks(&self, left: &Bytes32, right: &Bytes32) -> Bytes32 {
        sha256_tagged(PEAK_TAG, &[left, right])
    }

    fn hash_root(&self, elements_count: u64, bag: &Bytes32) -> Bytes32 {
        sha256_tagged(ROOT_TAG, &[&Bytes32::from_u64(elements_count), bag])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leaf_known_vector() {
        // hashlib.sha256(b"\x00" + (1).to_bytes(32, "big") * 2).hexdigest()
        let h = Sha256Hasher::new();
        assert_eq!(
            h.hash_leaf(1, &Bytes32::from_u64(1)).to_hex(),
            "92f50b380070012611040fcf287ecf94338cb4d6b9609b13b52827bfd222f495"
        );
    }

    #[test]
    fn node_known_vector() {
        let h = Sha256Hasher::new();
        let l1 = h.hash_leaf(1, &Bytes32::from_u64(1));
        let l2 = h.hash_leaf(2, &Bytes32::from_u64(2));
        assert_eq!(
            h.hash_node(3, &l1, &l2).to_hex(),
            "861e75a9abaf381ec97c7ac61f8302d64abf8bb77aa3204bc835581356052cd4"
        );
    }

    #[test]
    fn empty_root_known_vector() {
        let h = Sha256Hasher::new();
        assert_eq!(
            h.hash_peaks(&[], 0).to_hex(),
            "dc48a742ae32cfd66352372d6120ed14d6629fc166246b05ff8b03e23804701f"
        );
    }

    #[test]
    fn tags_separate_leaf_from_peak_merge() {
        let h = Sha256Hasher::new();
        let a = Bytes32::from_u64(1);
        let b = Bytes32::from_u64(2);
        assert_ne!(h.hash_leaf(1, &b), h.merge_peaks(&a, &b));
    }

    #[test]
    fn position_changes_leaf_digest() {
        let h = Sha256Hasher::new();
        let v = Bytes32::from_u64(5);
        assert_ne!(h.hash_leaf(1, &v), h.hash_leaf(2, &v));
    }
}
