//! # mmr-hash: Hashers for the MMR Accumulator
//!
//! Provides the hashing capability the engine is parameterised over:
//!
//! - **Keccak-256** ([`KeccakHasher`]): bit-exact with the Solidity
//!   verifier and the JavaScript accumulator the proofs are consumed by.
//!   This is the default and the only choice for on-chain verification.
//! - **SHA-256** ([`Sha256Hasher`]): the same tree shape with one-byte
//!   domain tags, for off-chain logs.
//!
//! Both bind every digest to its element position and bind the root to the
//! elements count, so two trees with equal peaks but different shapes never
//! share a root.

pub mod hasher;
pub mod keccak;
pub mod sha256;

pub use hasher::{hasher_for, HashAlgorithm, Hasher, UnknownAlgorithm};
pub use keccak::KeccakHasher;
pub use sha256::Sha256Hasher;
