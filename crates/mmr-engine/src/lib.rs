//! # mmr-engine: Merkle Mountain Range Accumulator
//!
//! An append-only, verifiable log. Append values one at a time, commit to
//! the whole history with one root, and prove any earlier element with a
//! logarithmic proof, without rehashing the history.
//!
//! The engine is generic over a [`mmr_store::NodeStore`] and a
//! [`mmr_hash::Hasher`]; neither is a global. Verification ([`verify`]) is
//! pure and needs only a hasher.
//!
//! ```text
//! append(v) ─▶ leaf ─▶ merge equal-height peaks ─▶ store batch ─▶ root
//! proof(p)  ─▶ sibling digests to p's peak + all peaks
//! verify    ─▶ fold siblings ─▶ compare peak ─▶ bag peaks ─▶ compare root
//! ```
//!
//! With the default Keccak hasher, roots and proofs are bit-exact with the
//! Solidity verifier; [`VerificationCall::abi_encode`] produces its calldata
//! arguments.

pub mod abi;
pub mod config;
pub mod mmr;
pub mod proof;
pub mod verify;

pub use abi::{abi_encode_digest, abi_encode_digests};
pub use config::{ConfigError, MmrConfig, ProofPolicy, StoreConfig};
pub use mmr::{AppendResult, DynMmr, Mmr};
pub use proof::{Proof, VerificationCall};
pub use verify::{verify_node_proof, verify_proof};
