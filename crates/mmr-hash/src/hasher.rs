//! # Hasher Capability
//!
//! The engine never calls a hash primitive directly. It goes through
//! [`Hasher`], so the primitive (and its domain separation) can be swapped
//! without touching the append or proof logic.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use mmr_core::Bytes32;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::keccak::KeccakHasher;
use crate::sha256::Sha256Hasher;

/// Hash primitive selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    /// Keccak-256, EVM compatible.
    #[default]
    Keccak,
    /// SHA-256 with domain tags.
    Sha256,
}

impl HashAlgorithm {
    /// Returns the algorithm identifier string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Keccak => "keccak",
            Self::Sha256 => "sha256",
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An algorithm name that is not recognised.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown hash algorithm {0:?} (expected \"keccak\" or \"sha256\")")]
pub struct UnknownAlgorithm(pub String);

impl FromStr for HashAlgorithm {
    type Err = UnknownAlgorithm;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "keccak" | "keccak256" => Ok(Self::Keccak),
            "sha256" | "sha-256" => Ok(Self::Sha256),
            other => Err(UnknownAlgorithm(other.to_string())),
        }
    }
}

/// Hashing operations the MMR engine needs.
///
/// Implementations are pure and cheap to share across tasks.
pub trait Hasher: Send + Sync {
    /// Which primitive this hasher uses.
    fn algorithm(&self) -> HashAlgorithm;

    /// Digest of a leaf holding `value` at element `position`.
    fn hash_leaf(&self, position: u64, value: &Bytes32) -> Bytes32;

    /// Digest of the internal node at `position` with the given children.
    fn hash_node(&self, position: u64, left: &Bytes32, right: &Bytes32) -> Bytes32;

    /// One step of folding two peaks together.
    fn merge_peaks(&self, left: &Bytes32, right: &Bytes32) -> Bytes32;

    /// Bind a bag of peaks to the elements count.
    fn hash_root(&self, elements_count: u64, bag: &Bytes32) -> Bytes32;

    /// Fold peaks right to left into a single digest.
    ///
    /// No peaks bag to [`Bytes32::ZERO`]; a single peak bags to itself.
    fn bag_peaks(&self, peaks: &[Bytes32]) -> Bytes32 {
        match peaks {
            [] => Bytes32::ZERO,
            [only] => *only,
            [rest @ .., second_last, last] => rest
                .iter()
                .rev()
                .fold(self.merge_peaks(second_last, last), |acc, peak| {
                    self.merge_peaks(peak, &acc)
                }),
        }
    }

    /// Root commitment over the ordered peaks and the elements count.
    fn hash_peaks(&self, peaks: &[Bytes32], elements_count: u64) -> Bytes32 {
        self.hash_root(elements_count, &self.bag_peaks(peaks))
    }
}

impl<H: Hasher + ?Sized> Hasher for Box<H> {
    fn algorithm(&self) -> HashAlgorithm {
        (**self).algorithm()
    }
    fn hash_leaf(&self, position: u64, value: &Bytes32) -> Bytes32 {
        (**self).hash_leaf(position, value)
    }
    fn hash_node(&self, position: u64, left: &Bytes32, right: &Bytes32) -> Bytes32 {
        (**self).hash_node(position, left, right)
    }
    fn merge_peaks(&self, left: &Bytes32, right: &Bytes32) -> Bytes32 {
        (**self).merge_peaks(left, right)
    }
    fn hash_root(&self, elements_count: u64, bag: &Bytes32) -> Bytes32 {
        (**self).hash_root(elements_count, bag)
    }
}

impl<H: Hasher + ?Sized> Hasher for Arc<H> {
    fn algorithm(&self) -> HashAlgorithm {
        (**self).algorithm()
    }
    fn hash_leaf(&self, position: u64, value: &Bytes32) -> Bytes32 {
        (**self).hash_leaf(position, value)
    }
    fn hash_node(&self, position: u64, left: &Bytes32, right: &Bytes32) -> Bytes32 {
        (**self).hash_node(position, left, right)
    }
    fn merge_peaks(&self, left: &Bytes32, right: &Bytes32) -> Bytes32 {
        (**self).merge_peaks(left, right)
    }
    fn hash_root(&self, elements_count: u64, bag: &Bytes32) -> Bytes32 {
        (**self).hash_root(elements_count, bag)
    }
}

/// Build a boxed hasher for a runtime-selected algorithm.
pub fn hasher_for(algorithm: HashAlgorithm) -> Box<dyn Hasher> {
    match algorithm {
        HashAlgorithm::Keccak => Box::new(KeccakHasher::new()),
        HashAlgorithm::Sha256 => Box::new(Sha256Hasher::new()),
    }
}
