//! # Value Encoding
//!
//! Reduces appended values to the canonical 32-byte big-endian,
//! zero-padded integer word. This is a bit-exact compatibility boundary:
//! an on-chain verifier receives the same word as its `bytes32 value`
//! argument, so the rule here must match `hexZeroPad(BigNumber.from(v), 32)`.
//!
//! Accepted inputs:
//! - decimal strings in `0 ..= 2^256 - 1` (leading zeros allowed);
//! - `0x`-prefixed hex of 1 to 64 nibbles, left-padded.

use crate::bytes32::Bytes32;
use crate::error::EncodingError;

/// Encode a decimal or `0x`-hex value string into its canonical word.
pub fn encode_value(value: &str) -> Result<Bytes32, EncodingError> {
    let value = value.trim();
    if let Some(digits) = value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
    {
        return encode_hex(digits);
    }
    encode_decimal(value)
}

/// Decode a word back into its canonical decimal string (no leading zeros).
pub fn decode_value(word: &Bytes32) -> String {
    let mut n = word.into_inner();
    let mut digits: Vec<u8> = Vec::with_capacity(78);
    while n.iter().any(|b| *b != 0) {
        let mut rem = 0u32;
        for byte in n.iter_mut() {
            let cur = (rem << 8) | u32::from(*byte);
            *byte = (cur / 10) as u8;
            rem = cur % 10;
        }
        digits.push(b'0' + rem as u8);
    }
    if digits.is_empty() {
        return "0".to_string();
    }
    digits.reverse();
    digits.into_iter().map(char::from).collect()
}

fn encode_decimal(digits: &str) -> Result<Bytes32, EncodingError> {
    if digits.is_empty() {
        return Err(EncodingError::Empty);
    }
    let mut acc = [0u8; 32];
    for c in digits.chars() {
        let d = c.to_digit(10).ok_or(EncodingError::InvalidDigit(c))?;
        if !mul_add(&mut acc, 10, d) {
            return Err(EncodingError::Overflow);
        }
    }
    Ok(Bytes32::new(acc))
}

fn encode_hex(digits: &str) -> Result<Bytes32, EncodingError> {
    if digits.is_empty() {
        return Err(EncodingError::Empty);
    }
    if digits.len() > 64 {
        return Err(EncodingError::Overflow);
    }
    let padded = format!("{digits:0>64}");
    let mut out = [0u8; 32];
    hex::decode_to_slice(&padded, &mut out)
        .map_err(|e| EncodingError::InvalidHex(e.to_string()))?;
    Ok(Bytes32::new(out))
}

/// `acc = acc * mul + add` over a big-endian 256-bit integer.
/// Returns `false` on overflow.
fn mul_add(acc: &mut [u8; 32], mul: u32, add: u32) -> bool {
    let mut carry = add;
    for byte in acc.iter_mut().rev() {
        let v = u32::from(*byte) * mul + carry;
        *byte = (v & 0xff) as u8;
        carry = v >> 8;
    }
    carry == 0
}
