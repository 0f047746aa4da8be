//! # Keccak-256 Hasher (EVM compatible)
//!
//! Reproduces the accumulator the on-chain verifier was written against.
//! All integers are 32-byte big-endian words and `pair(a, b)` is
//! `keccak256(a ‖ b)`, i.e. Solidity `keccak256(abi.encode(a, b))`:
//!
//! - leaf at position `p` with value `v`: `pair(p, v)`
//! - internal node at position `p`: `pair(p, pair(left, right))`
//! - peak merge: `pair(left, right)`
//! - root: `pair(elements_count, bag)`
//!
//! No extra domain tag is used; the position prefix already separates
//! leaves from internal nodes, and changing it would break verifier
//! compatibility.

use mmr_core::Bytes32;
use sha3::{Digest, Keccak256};

use crate::hasher::{HashAlgorithm, Hasher};

/// Compute `keccak256(left ‖ right)`.
pub fn keccak_pair(left: &Bytes32, right: &Bytes32) -> Bytes32 {
    let mut hasher = Keccak256::new();
    hasher.update(left.as_bytes());
    hasher.update(right.as_bytes());
    Bytes32::new(hasher.finalize().into())
}

/// Keccak-256 hasher matching the Solidity verifier.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeccakHasher;

impl KeccakHasher {
    /// Create a new hasher.
    pub fn new() -> Self {
        Self
    }
}

impl Hasher for KeccakHasher {
    fn algorithm(&self) -> HashAlgorithm {
        HashAlgorithm::Keccak
    }

    fn hash_leaf(&self, position: u64, value: &Bytes32) -> Bytes32 {
        keccak_pair(&Bytes32::from_u64(position), value)
    }

    fn hash_node(&self, position: u64, left: &Bytes32, right: &Bytes32) -> Bytes32 {
        keccak_pair(&Bytes32::from_u64(position), &keccak_pair(left, right))
    }

    fn merge_peaks(&self, left: &Bytes32, right: &Bytes32) -> Bytes32 {
        keccak_pair(left, right)
    }

    fn hash_root(&self, elements_count: u64, bag: &Bytes32) -> Bytes32 {
        keccak_pair(&Bytes32::from_u64(elements_count), bag)
    }
}
