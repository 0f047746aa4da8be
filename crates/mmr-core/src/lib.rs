//! # mmr-core: Foundational Types for the MMR Accumulator
//!
//! Every other crate in the workspace depends on `mmr-core`; it depends on
//! nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **One word type.** `Bytes32` is both the encoded leaf value and every
//!    digest, mirroring the `bytes32` slots of the on-chain verifier.
//!
//! 2. **Canonical value encoding.** Values enter the accumulator only through
//!    [`encoding::encode_value()`], which produces the 32-byte big-endian word
//!    the verifier expects. Prover and verifier cannot disagree on encoding.
//!
//! 3. **Closed-form positions.** All tree navigation is arithmetic over
//!    1-based element positions ([`position`]). No tree is mirrored in memory.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `mmr-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod bytes32;
pub mod encoding;
pub mod error;
pub mod node;
pub mod position;

// Re-export primary types for ergonomic imports.
pub use bytes32::Bytes32;
pub use encoding::{decode_value, encode_value};
pub use error::{EncodingError, MmrError, StoreError};
pub use node::{Node, NodeKind};
