//! Store failures seen through the engine: backend errors come back as
//! `MmrError::Store` unchanged, and a batch that lost a race with another
//! writer is rejected without touching the store.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use mmr_core::{Bytes32, MmrError, Node, StoreError};
use mmr_engine::Mmr;
use mmr_hash::KeccakHasher;
use mmr_store::{MemoryStore, NodeStore};

/// Reads pass through; writes fail once `broken` is set.
#[derive(Default)]
struct FailingStore {
    inner: MemoryStore,
    broken: AtomicBool,
}

#[async_trait]
impl NodeStore for FailingStore {
    async fn get(&self, position: u64) -> Result<Option<Node>, StoreError> {
        self.inner.get(position).await
    }

    async fn set(&self, nodes: Vec<Node>) -> Result<u64, StoreError> {
        if self.broken.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("disk full".to_string()));
        }
        self.inner.set(nodes).await
    }

    async fn elements_count(&self) -> Result<u64, StoreError> {
        self.inner.elements_count().await
    }
}

/// Lets another writer append one leaf between the engine's read of the
/// elements count and its batch write.
#[derive(Default)]
struct RacingStore {
    inner: MemoryStore,
    armed: AtomicBool,
}

#[async_trait]
impl NodeStore for RacingStore {
    async fn get(&self, position: u64) -> Result<Option<Node>, StoreError> {
        self.inner.get(position).await
    }

    async fn set(&self, nodes: Vec<Node>) -> Result<u64, StoreError> {
        if self.armed.swap(false, Ordering::SeqCst) {
            let next = self.inner.elements_count().await? + 1;
            self.inner
                .set(vec![Node::leaf(next, Bytes32::ZERO, Bytes32::ZERO)])
                .await?;
        }
        self.inner.set(nodes).await
    }

    async fn elements_count(&self) -> Result<u64, StoreError> {
        self.inner.elements_count().await
    }
}

#[tokio::test]
async fn backend_failure_surfaces_as_store_error() {
    let mut mmr = Mmr::new(FailingStore::default(), KeccakHasher::new());
    mmr.append_many(["1", "2"]).await.unwrap();
    let root = mmr.root_hash().await.unwrap();

    mmr.store().broken.store(true, Ordering::SeqCst);
    let err = mmr.append("3").await.unwrap_err();
    assert!(
        matches!(&err, MmrError::Store(StoreError::Backend(msg)) if msg == "disk full"),
        "unexpected error: {err}"
    );
    assert_eq!(mmr.elements_count().await.unwrap(), 3);
    assert_eq!(mmr.root_hash().await.unwrap(), root);

    mmr.store().broken.store(false, Ordering::SeqCst);
    let r = mmr.append("3").await.unwrap();
    assert_eq!(r.element_position, 4);
    assert_eq!(r.elements_count, 4);
}

#[tokio::test]
async fn batch_behind_another_writer_is_rejected() {
    let mut mmr = Mmr::new(RacingStore::default(), KeccakHasher::new());
    mmr.append_many(["1", "2"]).await.unwrap();

    mmr.store().armed.store(true, Ordering::SeqCst);
    let err = mmr.append("3").await.unwrap_err();
    assert!(
        matches!(
            err,
            MmrError::Store(StoreError::NonContiguous { expected: 5, found: 4 })
        ),
        "unexpected error: {err}"
    );

    // Only the other writer's leaf landed.
    let store = &mmr.store().inner;
    assert_eq!(store.elements_count().await.unwrap(), 4);
    let node = store.get(4).await.unwrap().unwrap();
    assert_eq!(node.digest, Bytes32::ZERO);
    assert!(store.get(5).await.unwrap().is_none());
}
