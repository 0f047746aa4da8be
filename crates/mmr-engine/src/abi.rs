//! # Solidity ABI Encoding
//!
//! Just enough of the contract ABI to hand proofs and roots to the on-chain
//! verifier: static `uint256`/`bytes32` words and `bytes32[]` arrays, laid
//! out as a tuple of head words followed by the dynamic tails.

use mmr_core::Bytes32;

const WORD: usize = 32;

/// Hex-encode ABI output with a `0x` prefix.
pub fn to_hex(encoded: &[u8]) -> String {
    format!("0x{}", hex::encode(encoded))
}

/// Encode a single `bytes32`.
pub fn abi_encode_digest(digest: &Bytes32) -> Vec<u8> {
    digest.as_bytes().to_vec()
}

/// Encode a single `bytes32[]` argument: offset, length, then elements.
pub fn abi_encode_digests(digests: &[Bytes32]) -> Vec<u8> {
    let mut out = Vec::with_capacity(WORD * (2 + digests.len()));
    out.extend_from_slice(Bytes32::from_u64(WORD as u64).as_bytes());
    push_array(&mut out, digests);
    out
}

/// Byte length of an encoded `bytes32[]` tail (length word plus elements).
pub(crate) fn array_tail_len(len: usize) -> usize {
    WORD * (1 + len)
}

/// Append the tail of a `bytes32[]`: its length, then each element.
pub(crate) fn push_array(out: &mut Vec<u8>, digests: &[Bytes32]) {
    out.extend_from_slice(Bytes32::from_u64(digests.len() as u64).as_bytes());
    for digest in digests {
        out.extend_from_slice(digest.as_bytes());
    }
}
