//! # Inclusion Proofs
//!
//! [`Proof`] is what the engine hands out; [`VerificationCall`] is the same
//! proof arranged as the argument tuple of the Solidity verifier:
//!
//! ```text
//! verifyProof(uint256 index, bytes32 value, bytes32[] proof,
//!             bytes32[] peaks, uint256 pos, bytes32 rootHash)
//! ```

use mmr_core::{Bytes32, MmrError};
use mmr_hash::Hasher;
use serde::{Deserialize, Serialize};

use crate::abi;
use crate::verify::{verify_node_proof, verify_proof};

/// An inclusion proof for one element against a given elements count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proof {
    /// Position of the proven element.
    pub element_position: u64,
    /// Digest stored at that position.
    pub element_digest: Bytes32,
    /// Sibling digests from the element up to its peak.
    pub siblings_hashes: Vec<Bytes32>,
    /// Every peak at `elements_count`, left to right.
    pub peaks_hashes: Vec<Bytes32>,
    /// Index of the peak containing the element.
    pub peak_index: usize,
    /// Elements count the proof was generated against.
    pub elements_count: u64,
}

impl Proof {
    /// Check that `value` is the leaf this proof is for.
    pub fn verify<H: Hasher + ?Sized>(
        &self,
        hasher: &H,
        value: &Bytes32,
        expected_root: &Bytes32,
    ) -> Result<bool, MmrError> {
        verify_proof(
            hasher,
            value,
            self.element_position,
            &self.siblings_hashes,
            &self.peaks_hashes,
            self.elements_count,
            expected_root,
        )
    }

    /// Check the proof using the element digest it carries, for leaves and
    /// internal nodes alike.
    pub fn verify_digest<H: Hasher + ?Sized>(
        &self,
        hasher: &H,
        expected_root: &Bytes32,
    ) -> Result<bool, MmrError> {
        verify_node_proof(
            hasher,
            &self.element_digest,
            self.element_position,
            &self.siblings_hashes,
            &self.peaks_hashes,
            self.elements_count,
            expected_root,
        )
    }

    /// Arrange the proof as the on-chain verifier's arguments.
    pub fn to_verification_call(&self, value: Bytes32, root_hash: Bytes32) -> VerificationCall {
        VerificationCall {
            index: self.element_position,
            value,
            proof: self.siblings_hashes.clone(),
            peaks: self.peaks_hashes.clone(),
            pos: self.elements_count,
            root_hash,
        }
    }
}

/// Arguments of the Solidity `verifyProof` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationCall {
    /// Element position of the leaf.
    pub index: u64,
    /// Encoded leaf value.
    pub value: Bytes32,
    /// Sibling digests.
    pub proof: Vec<Bytes32>,
    /// Peak digests.
    pub peaks: Vec<Bytes32>,
    /// Elements count.
    pub pos: u64,
    /// Expected root.
    pub root_hash: Bytes32,
}

impl VerificationCall {
    /// Standard ABI encoding of
    /// `(uint256, bytes32, bytes32[], bytes32[], uint256, bytes32)`.
    pub fn abi_encode(&self) -> Vec<u8> {
        const HEAD: usize = 6 * 32;
        let proof_offset = HEAD;
        let peaks_offset = proof_offset + abi::array_tail_len(self.proof.len());

        let mut out = Vec::with_capacity(peaks_offset + abi::array_tail_len(self.peaks.len()));
        out.extend_from_slice(Bytes32::from_u64(self.index).as_bytes());
        out.extend_from_slice(self.value.as_bytes());
        out.extend_from_slice(Bytes32::from_u64(proof_offset as u64).as_bytes());
        out.extend_from_slice(Bytes32::from_u64(peaks_offset as u64).as_bytes());
        out.extend_from_slice(Bytes32::from_u64(self.pos).as_bytes());
        out.extend_from_slice(self.root_hash.as_bytes());
        abi::push_array(&mut out, &self.proof);
        abi::push_array(&mut out, &self.peaks);
        out
    }

    /// [`Self::abi_encode`] as `0x`-prefixed hex.
    pub fn abi_encode_hex(&self) -> String {
        abi::to_hex(&self.abi_encode())
    }
}
