//! # The MMR Engine
//!
//! [`Mmr`] owns no tree. Its only state is what the store holds; peaks,
//! paths and counts are recomputed from the elements count with the
//! arithmetic in [`mmr_core::position`].
//!
//! ## Append
//!
//! A new leaf goes to position `elements_count + 1`. While the position
//! after the newest node is its parent (`height(p + 1) > height(p)`), the
//! two rightmost peaks are merged into that parent. This is binary carry
//! propagation over the leaf count: the 4th, 8th, 16th ... leaf cascades.
//! The leaf and all parents it completes are written as one batch.

use std::sync::Arc;

use mmr_core::position;
use mmr_core::{encode_value, Bytes32, MmrError, Node, StoreError};
use mmr_hash::{hasher_for, Hasher};
use mmr_store::NodeStore;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{MmrConfig, ProofPolicy};
use crate::proof::Proof;

/// An engine whose store and hasher were chosen at runtime.
pub type DynMmr = Mmr<Arc<dyn NodeStore>, Box<dyn Hasher>>;

/// Outcome of one append.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppendResult {
    /// 1-based index of the new leaf among leaves (the new leaf count).
    pub leaf_index: u64,
    /// Element position the leaf was stored at.
    pub element_position: u64,
    /// Elements count after the append, parents included.
    pub elements_count: u64,
    /// Root over the new peaks and elements count.
    pub root_hash: Bytes32,
}

/// Merkle Mountain Range over a node store and a hasher.
///
/// `append` takes `&mut self`: one engine is the single writer of its
/// accumulator. Reads take `&self`.
#[derive(Debug)]
pub struct Mmr<S, H> {
    store: S,
    hasher: H,
    policy: ProofPolicy,
}

impl DynMmr {
    /// Build an engine from configuration, opening the configured store.
    pub async fn from_config(config: &MmrConfig) -> Result<Self, MmrError> {
        let store = config.store.open(&config.mmr_id).await?;
        let hasher = hasher_for(config.hasher);
        debug!(
            hasher = %config.hasher,
            mmr_id = %config.mmr_id,
            policy = ?config.proof_policy,
            "opened accumulator"
        );
        Ok(Mmr::new(store, hasher).with_policy(config.proof_policy))
    }
}

impl<S: NodeStore, H: Hasher> Mmr<S, H> {
    /// Create an engine with the default [`ProofPolicy::LeavesOnly`].
    pub fn new(store: S, hasher: H) -> Self {
        Self {
            store,
            hasher,
            policy: ProofPolicy::default(),
        }
    }

    /// Replace the proof policy.
    pub fn with_policy(mut self, policy: ProofPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The hasher.
    pub fn hasher(&self) -> &H {
        &self.hasher
    }

    /// The active proof policy.
    pub fn policy(&self) -> ProofPolicy {
        self.policy
    }

    /// Current elements count (leaves plus internal nodes).
    pub async fn elements_count(&self) -> Result<u64, MmrError> {
        Ok(self.store.elements_count().await?)
    }

    /// Current number of leaves.
    pub async fn leaves_count(&self) -> Result<u64, MmrError> {
        let count = self.elements_count().await?;
        position::elements_count_to_leaf_count(count).ok_or_else(|| corrupt_count(count))
    }

    /// Encode `value` (decimal or `0x` hex) and append it.
    pub async fn append(&mut self, value: &str) -> Result<AppendResult, MmrError> {
        let word = encode_value(value)?;
        self.append_word(word).await
    }

    /// Append an already encoded 32-byte value.
    pub async fn append_word(&mut self, value: Bytes32) -> Result<AppendResult, MmrError> {
        let count = self.elements_count().await?;
        let leaves = position::elements_count_to_leaf_count(count).ok_or_else(|| corrupt_count(count))?;
        let mut peaks = self.peak_nodes(count).await?;

        let leaf_position = count + 1;
        let leaf_digest = self.hasher.hash_leaf(leaf_position, &value);
        let mut batch = vec![Node::leaf(leaf_position, leaf_digest, value)];
        peaks.push((leaf_position, leaf_digest));

        let mut current = leaf_position;
        let mut height = 0u32;
        while position::height(current + 1) > height {
            let (Some((right_pos, right)), Some((left_pos, left))) = (peaks.pop(), peaks.pop()) else {
                return Err(MmrError::Store(StoreError::Corrupt(format!(
                    "merge at position {} has no left sibling peak",
                    current + 1
                ))));
            };
            current += 1;
            height += 1;
            let digest = self.hasher.hash_node(current, &left, &right);
            debug!(position = current, height, left = left_pos, right = right_pos, "merged peaks");
            batch.push(Node::internal(current, digest, height, left_pos, right_pos));
            peaks.push((current, digest));
        }

        let elements_count = self.store.set(batch).await?;
        if elements_count != current {
            return Err(MmrError::Store(StoreError::Corrupt(format!(
                "store reports elements count {elements_count} after writing up to {current}"
            ))));
        }

        let peak_digests: Vec<Bytes32> = peaks.iter().map(|(_, d)| *d).collect();
        let root_hash = self.hasher.hash_peaks(&peak_digests, elements_count);
        let result = AppendResult {
            leaf_index: leaves + 1,
            element_position: leaf_position,
            elements_count,
            root_hash,
        };
        debug!(
            leaf_index = result.leaf_index,
            element_position = leaf_position,
            elements_count,
            root = %root_hash,
            "appended leaf"
        );
        Ok(result)
    }

    /// Append values in order, returning one result per value.
    pub async fn append_many<I, V>(&mut self, values: I) -> Result<Vec<AppendResult>, MmrError>
    where
        I: IntoIterator<Item = V>,
        V: AsRef<str>,
    {
        let mut results = Vec::new();
        for value in values {
            results.push(self.append(value.as_ref()).await?);
        }
        Ok(results)
    }

    /// Peak digests at the current elements count, highest mountain first.
    pub async fn peaks(&self) -> Result<Vec<Bytes32>, MmrError> {
        let count = self.elements_count().await?;
        self.peaks_at(count).await
    }

    /// Peak digests at a historical elements count.
    pub async fn peaks_at(&self, elements_count: u64) -> Result<Vec<Bytes32>, MmrError> {
        self.check_historical(elements_count).await?;
        Ok(self
            .peak_nodes(elements_count)
            .await?
            .into_iter()
            .map(|(_, digest)| digest)
            .collect())
    }

    /// Current root.
    pub async fn root_hash(&self) -> Result<Bytes32, MmrError> {
        let count = self.elements_count().await?;
        self.root_at(count).await
    }

    /// Root at a historical elements count.
    pub async fn root_at(&self, elements_count: u64) -> Result<Bytes32, MmrError> {
        let peaks = self.peaks_at(elements_count).await?;
        Ok(self.hasher.hash_peaks(&peaks, elements_count))
    }

    /// Prove the element at `element_position` against the current count.
    pub async fn proof(&self, element_position: u64) -> Result<Proof, MmrError> {
        let count = self.elements_count().await?;
        self.proof_at(element_position, count).await
    }

    /// Prove the element at `element_position` against a historical count.
    pub async fn proof_at(&self, element_position: u64, elements_count: u64) -> Result<Proof, MmrError> {
        self.check_historical(elements_count).await?;
        if element_position == 0 || element_position > elements_count {
            return Err(MmrError::InvalidPosition {
                position: element_position,
                elements_count,
            });
        }
        if self.policy == ProofPolicy::LeavesOnly && !position::is_leaf(element_position) {
            return Err(MmrError::NotALeaf(element_position));
        }
        let path = position::proof_path(element_position, elements_count).ok_or_else(|| {
            MmrError::InvalidInput(format!(
                "no path from position {element_position} to a peak of {elements_count}"
            ))
        })?;

        let element = self.node(element_position).await?;
        let siblings_hashes = self.digests(&path.siblings).await?;
        let peaks_hashes: Vec<Bytes32> = self
            .peak_nodes(elements_count)
            .await?
            .into_iter()
            .map(|(_, digest)| digest)
            .collect();

        debug!(
            element_position,
            elements_count,
            siblings = siblings_hashes.len(),
            peak_index = path.peak_index,
            "generated proof"
        );
        Ok(Proof {
            element_position,
            element_digest: element.digest,
            siblings_hashes,
            peaks_hashes,
            peak_index: path.peak_index,
            elements_count,
        })
    }

    /// Check a leaf proof against this accumulator's root at the proof's
    /// elements count.
    pub async fn verify_proof(&self, proof: &Proof, value: &Bytes32) -> Result<bool, MmrError> {
        let root = self.root_at(proof.elements_count).await?;
        proof.verify(&self.hasher, value, &root)
    }

    /// The stored node at `position`.
    pub async fn node(&self, position: u64) -> Result<Node, MmrError> {
        self.store
            .get(position)
            .await?
            .ok_or(MmrError::NotFound(position))
    }

    async fn digests(&self, positions: &[u64]) -> Result<Vec<Bytes32>, MmrError> {
        let nodes = self.store.get_many(positions).await?;
        positions
            .iter()
            .zip(nodes)
            .map(|(&p, node)| node.map(|n| n.digest).ok_or(MmrError::NotFound(p)))
            .collect()
    }

    async fn peak_nodes(&self, elements_count: u64) -> Result<Vec<(u64, Bytes32)>, MmrError> {
        let positions = position::find_peaks(elements_count).ok_or_else(|| {
            MmrError::InvalidInput(format!("{elements_count} is not a reachable elements count"))
        })?;
        let digests = self.digests(&positions).await?;
        Ok(positions.into_iter().zip(digests).collect())
    }

    async fn check_historical(&self, elements_count: u64) -> Result<(), MmrError> {
        let current = self.elements_count().await?;
        if elements_count > current {
            return Err(MmrError::InvalidInput(format!(
                "elements count {elements_count} is ahead of the accumulator ({current})"
            )));
        }
        if !position::is_valid_size(elements_count) {
            return Err(MmrError::InvalidInput(format!(
                "{elements_count} is not a reachable elements count"
            )));
        }
        Ok(())
    }
}

fn corrupt_count(count: u64) -> MmrError {
    MmrError::Store(StoreError::Corrupt(format!(
        "store holds {count} elements, which no sequence of appends produces"
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mmr_hash::{KeccakHasher, Sha256Hasher};
    use mmr_store::MemoryStore;

    fn hex(s: &str) -> Bytes32 {
        Bytes32::from_hex(s).unwrap()
    }

    fn keccak_mmr() -> Mmr<MemoryStore, KeccakHasher> {
        Mmr::new(MemoryStore::new(), KeccakHasher::new())
    }

    #[tokio::test]
    async fn empty_accumulator() {
        let mmr = keccak_mmr();
        assert_eq!(mmr.elements_count().await.unwrap(), 0);
        assert_eq!(mmr.leaves_count().await.unwrap(), 0);
        assert!(mmr.peaks().await.unwrap().is_empty());
        assert_eq!(
            mmr.root_hash().await.unwrap(),
            hex("ad3228b676f7d3cd4284a5443f17f1962b36e491b30a40b2405849e597ba5fb5")
        );
        assert!(matches!(
            mmr.proof(1).await,
            Err(MmrError::InvalidPosition { position: 1, elements_count: 0 })
        ));
    }

    #[tokio::test]
    async fn first_append_never_merges() {
        let mut mmr = keccak_mmr();
        let r = mmr.append("1").await.unwrap();
        assert_eq!(r.leaf_index, 1);
        assert_eq!(r.element_position, 1);
        assert_eq!(r.elements_count, 1);
        assert_eq!(
            r.root_hash,
            hex("edb38a93e6e2e82dbb40826a878df1d817a37ef13fcaa25248649a90fa47497b")
        );
        assert_eq!(mmr.peaks().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn second_append_merges_once() {
        let mut mmr = keccak_mmr();
        mmr.append("1").await.unwrap();
        let r = mmr.append("2").await.unwrap();
        assert_eq!(r.element_position, 2);
        assert_eq!(r.elements_count, 3);
        let parent = mmr.node(3).await.unwrap();
        assert_eq!(parent.height, 1);
        assert_eq!(parent.kind, mmr_core::NodeKind::Internal { left: 1, right: 2 });
        assert_eq!(
            parent.digest,
            hex("f11f11f59e71ab2021e5d939a15985d1b329a7515384f5f0b33fe39db58f5bf6")
        );
    }

    #[tokio::test]
    async fn fourth_append_cascades() {
        let mut mmr = keccak_mmr();
        mmr.append_many(["1", "2", "3"]).await.unwrap();
        let r = mmr.append("4").await.unwrap();
        assert_eq!(r.element_position, 5);
        assert_eq!(r.elements_count, 7);
        assert_eq!(mmr.node(6).await.unwrap().height, 1);
        assert_eq!(mmr.node(7).await.unwrap().height, 2);
        assert_eq!(mmr.peaks().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn stored_root_matches_append_result() {
        let mut mmr = keccak_mmr();
        for v in 1..=9u64 {
            let r = mmr.append(&v.to_string()).await.unwrap();
            assert_eq!(mmr.root_hash().await.unwrap(), r.root_hash);
            assert_eq!(mmr.root_at(r.elements_count).await.unwrap(), r.root_hash);
        }
    }

    #[tokio::test]
    async fn leaves_only_policy_rejects_internal_nodes() {
        let mut mmr = keccak_mmr();
        mmr.append_many(["1", "2", "3"]).await.unwrap();
        assert!(matches!(mmr.proof(3).await, Err(MmrError::NotALeaf(3))));
    }

    #[tokio::test]
    async fn any_element_policy_proves_internal_nodes() {
        let mut mmr = Mmr::new(MemoryStore::new(), Sha256Hasher::new()).with_policy(ProofPolicy::AnyElement);
        mmr.append_many(["1", "2", "3", "4"]).await.unwrap();
        let proof = mmr.proof(3).await.unwrap();
        assert_eq!(proof.siblings_hashes.len(), 1);
        let root = mmr.root_hash().await.unwrap();
        assert!(proof.verify_digest(mmr.hasher(), &root).unwrap());
    }

    #[tokio::test]
    async fn historical_reads() {
        let mut mmr = keccak_mmr();
        let results = mmr.append_many(["1", "2", "3", "4", "5"]).await.unwrap();
        let at_four = &results[2];
        assert_eq!(mmr.root_at(4).await.unwrap(), at_four.root_hash);
        assert_eq!(mmr.peaks_at(4).await.unwrap().len(), 2);

        let old = mmr.proof_at(4, 4).await.unwrap();
        assert!(old.siblings_hashes.is_empty());
        assert!(mmr.verify_proof(&old, &Bytes32::from_u64(3)).await.unwrap());

        assert!(matches!(mmr.peaks_at(5).await, Err(MmrError::InvalidInput(_))));
        assert!(matches!(mmr.root_at(100).await, Err(MmrError::InvalidInput(_))));
        assert!(matches!(
            mmr.proof_at(5, 4).await,
            Err(MmrError::InvalidPosition { position: 5, elements_count: 4 })
        ));
    }

    #[tokio::test]
    async fn rejects_bad_value_strings() {
        let mut mmr = keccak_mmr();
        assert!(matches!(mmr.append("-1").await, Err(MmrError::Encoding(_))));
        assert_eq!(mmr.elements_count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn missing_node_is_not_found() {
        let store = MemoryStore::new();
        store
            .set(vec![Node::leaf(1, Bytes32::ZERO, Bytes32::ZERO)])
            .await
            .unwrap();
        let mmr = Mmr::new(store, KeccakHasher::new());
        assert!(matches!(mmr.node(2).await, Err(MmrError::NotFound(2))));
    }

    #[tokio::test]
    async fn dyn_engine_from_config() {
        let config = MmrConfig::default();
        let mut mmr = DynMmr::from_config(&config).await.unwrap();
        let r = mmr.append("1").await.unwrap();
        assert_eq!(
            r.root_hash,
            hex("edb38a93e6e2e82dbb40826a878df1d817a37ef13fcaa25248649a90fa47497b")
        );
    }
}
