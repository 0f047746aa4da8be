//! # Proof Verification
//!
//! Pure functions: no store, no engine state. A proof is checked in two
//! stages. The sibling path must lead from the element to the peak that
//! contains it, and the peaks must bag to the expected root for the claimed
//! elements count.
//!
//! A proof that fails either stage yields `Ok(false)`. Errors are reserved
//! for inputs whose shape cannot belong to any MMR: an unreachable elements
//! count, a position outside it, or the wrong number of siblings or peaks.

use mmr_core::position::{self, ProofPath};
use mmr_core::{Bytes32, MmrError};
use mmr_hash::Hasher;

/// Verify that `value` was appended at leaf `element_position`.
pub fn verify_proof<H: Hasher + ?Sized>(
    hasher: &H,
    value: &Bytes32,
    element_position: u64,
    siblings_hashes: &[Bytes32],
    peaks_hashes: &[Bytes32],
    elements_count: u64,
    expected_root: &Bytes32,
) -> Result<bool, MmrError> {
    let path = checked_path(element_position, siblings_hashes, peaks_hashes, elements_count)?;
    if !position::is_leaf(element_position) {
        return Err(MmrError::InvalidInput(format!(
            "position {element_position} is an internal node; a leaf value cannot be proven there"
        )));
    }
    let leaf = hasher.hash_leaf(element_position, value);
    Ok(fold_and_compare(
        hasher,
        leaf,
        element_position,
        &path,
        siblings_hashes,
        peaks_hashes,
        elements_count,
        expected_root,
    ))
}

/// Verify that `element_digest` is stored at `element_position`, which may be
/// a leaf or an internal node.
pub fn verify_node_proof<H: Hasher + ?Sized>(
    hasher: &H,
    element_digest: &Bytes32,
    element_position: u64,
    siblings_hashes: &[Bytes32],
    peaks_hashes: &[Bytes32],
    elements_count: u64,
    expected_root: &Bytes32,
) -> Result<bool, MmrError> {
    let path = checked_path(element_position, siblings_hashes, peaks_hashes, elements_count)?;
    Ok(fold_and_compare(
        hasher,
        *element_digest,
        element_position,
        &path,
        siblings_hashes,
        peaks_hashes,
        elements_count,
        expected_root,
    ))
}

fn checked_path(
    element_position: u64,
    siblings_hashes: &[Bytes32],
    peaks_hashes: &[Bytes32],
    elements_count: u64,
) -> Result<ProofPath, MmrError> {
    let peak_positions = position::find_peaks(elements_count).ok_or_else(|| {
        MmrError::InvalidInput(format!("{elements_count} is not a reachable elements count"))
    })?;
    if element_position == 0 || element_position > elements_count {
        return Err(MmrError::InvalidPosition {
            position: element_position,
            elements_count,
        });
    }
    let path = position::proof_path(element_position, elements_count).ok_or_else(|| {
        MmrError::InvalidInput(format!(
            "no path from position {element_position} to a peak of {elements_count}"
        ))
    })?;
    if siblings_hashes.len() != path.siblings.len() {
        return Err(MmrError::InvalidInput(format!(
            "expected {} siblings for position {element_position}, got {}",
            path.siblings.len(),
            siblings_hashes.len()
        )));
    }
    if peaks_hashes.len() != peak_positions.len() {
        return Err(MmrError::InvalidInput(format!(
            "expected {} peaks for elements count {elements_count}, got {}",
            peak_positions.len(),
            peaks_hashes.len()
        )));
    }
    Ok(path)
}

#[allow(clippy::too_many_arguments)]
fn fold_and_compare<H: Hasher + ?Sized>(
    hasher: &H,
    start: Bytes32,
    element_position: u64,
    path: &ProofPath,
    siblings_hashes: &[Bytes32],
    peaks_hashes: &[Bytes32],
    elements_count: u64,
    expected_root: &Bytes32,
) -> bool {
    let mut current = element_position;
    let mut digest = start;
    for sibling in siblings_hashes {
        let h = position::height(current);
        if position::is_right_child(current) {
            current += 1;
            digest = hasher.hash_node(current, sibling, &digest);
        } else {
            current += position::parent_offset(h);
            digest = hasher.hash_node(current, &digest, sibling);
        }
    }

    if peaks_hashes.get(path.peak_index) != Some(&digest) {
        tracing::debug!(element_position, peak_index = path.peak_index, "path does not reach peak");
        return false;
    }
    let root = hasher.hash_peaks(peaks_hashes, elements_count);
    if root != *expected_root {
        tracing::debug!(element_position, elements_count, "peaks do not bag to expected root");
        return false;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use mmr_hash::KeccakHasher;

    fn hex(s: &str) -> Bytes32 {
        Bytes32::from_hex(s).unwrap()
    }

    // Position 4 at count 7 after appending 1, 2, 3, 4. The siblings are
    // recorded in the JavaScript accumulator's example.js; the peak and the
    // root were produced by this crate.
    fn position_four_at_seven() -> (Vec<Bytes32>, Vec<Bytes32>) {
        let siblings = vec![
            hex("04cde762ef08b6b6c5ded8e8c4c0b3f4e5c9ad7342c88fcc93681b4588b73f05"),
            hex("f11f11f59e71ab2021e5d939a15985d1b329a7515384f5f0b33fe39db58f5bf6"),
        ];
        let peaks = vec![hex("d5bf0ccaa6c13a4ad1e671dc9699affc319c735e91a2154d9cd0d0e00030a9dc")];
        (siblings, peaks)
    }

    fn root_at_seven() -> Bytes32 {
        hex("cbd55f3f5a7a54dbc0189df36d0db9abdd5ecfa0bf59d4a9094169563b0e5c53")
    }

    #[test]
    fn recorded_proof_verifies() {
        let (siblings, peaks) = position_four_at_seven();
        let ok = verify_proof(
            &KeccakHasher::new(),
            &Bytes32::from_u64(3),
            4,
            &siblings,
            &peaks,
            7,
            &root_at_seven(),
        )
        .unwrap();
        assert!(ok);
    }

    #[test]
    fn wrong_value_is_false_not_error() {
        let (siblings, peaks) = position_four_at_seven();
        let ok = verify_proof(
            &KeccakHasher::new(),
            &Bytes32::from_u64(4),
            4,
            &siblings,
            &peaks,
            7,
            &root_at_seven(),
        )
        .unwrap();
        assert!(!ok);
    }

    #[test]
    fn wrong_root_is_false() {
        let (siblings, peaks) = position_four_at_seven();
        let ok = verify_proof(
            &KeccakHasher::new(),
            &Bytes32::from_u64(3),
            4,
            &siblings,
            &peaks,
            7,
            &Bytes32::ZERO,
        )
        .unwrap();
        assert!(!ok);
    }

    #[test]
    fn malformed_shapes_are_errors() {
        let h = KeccakHasher::new();
        let v = Bytes32::from_u64(3);
        let root = root_at_seven();
        let (siblings, peaks) = position_four_at_seven();

        // Unreachable count.
        assert!(matches!(
            verify_proof(&h, &v, 4, &siblings, &peaks, 6, &root),
            Err(MmrError::InvalidInput(_))
        ));
        // Position outside the count.
        assert!(matches!(
            verify_proof(&h, &v, 8, &siblings, &peaks, 7, &root),
            Err(MmrError::InvalidPosition { position: 8, elements_count: 7 })
        ));
        assert!(matches!(
            verify_proof(&h, &v, 0, &siblings, &peaks, 7, &root),
            Err(MmrError::InvalidPosition { .. })
        ));
        // Too few siblings.
        assert!(matches!(
            verify_proof(&h, &v, 4, &siblings[..1], &peaks, 7, &root),
            Err(MmrError::InvalidInput(_))
        ));
        // Too many peaks.
        let extra = vec![peaks[0], peaks[0]];
        assert!(matches!(
            verify_proof(&h, &v, 4, &siblings, &extra, 7, &root),
            Err(MmrError::InvalidInput(_))
        ));
        // Leaf value for an internal position.
        assert!(matches!(
            verify_proof(&h, &v, 3, &[siblings[0]], &peaks, 7, &root),
            Err(MmrError::InvalidInput(_))
        ));
    }

    #[test]
    fn internal_node_proof() {
        // Node 3 at count 7: sibling is node 6, peak is 7.
        let h = KeccakHasher::new();
        let node3 = hex("f11f11f59e71ab2021e5d939a15985d1b329a7515384f5f0b33fe39db58f5bf6");
        let leaf4 = hex("83ec6a1f0257b830b5e016457c9cf1435391bf56cc98f369a58a54fe93772465");
        let leaf5 = hex("04cde762ef08b6b6c5ded8e8c4c0b3f4e5c9ad7342c88fcc93681b4588b73f05");
        let node6 = h.hash_node(6, &leaf4, &leaf5);
        let (_, peaks) = position_four_at_seven();

        assert!(verify_node_proof(&h, &node3, 3, &[node6], &peaks, 7, &root_at_seven()).unwrap());
        assert!(!verify_node_proof(&h, &node6, 3, &[node3], &peaks, 7, &root_at_seven()).unwrap());
    }

    #[test]
    fn peak_element_has_empty_path() {
        let h = KeccakHasher::new();
        let peaks = vec![
            hex("f11f11f59e71ab2021e5d939a15985d1b329a7515384f5f0b33fe39db58f5bf6"),
            hex("83ec6a1f0257b830b5e016457c9cf1435391bf56cc98f369a58a54fe93772465"),
        ];
        let root = hex("9cf52726b5c1f29825fa3757402809afeb76f510e83e95559d9a5504a243b373");
        assert!(verify_proof(&h, &Bytes32::from_u64(3), 4, &[], &peaks, 4, &root).unwrap());
    }
}
