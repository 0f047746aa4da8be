//! In-memory node store.

use std::sync::Arc;

use async_trait::async_trait;
use mmr_core::{Node, StoreError};
use parking_lot::RwLock;

use crate::{check_batch, NodeStore};

/// Thread-safe, cloneable in-memory node store.
///
/// Positions are dense, so nodes live in a vector indexed by
/// `position - 1`. The lock is `parking_lot` and is never held across an
/// `.await`. Clones share the same nodes.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    nodes: Arc<RwLock<Vec<Node>>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of every stored node in position order.
    pub fn nodes(&self) -> Vec<Node> {
        self.nodes.read().clone()
    }
}

#[async_trait]
impl NodeStore for MemoryStore {
    async fn get(&self, position: u64) -> Result<Option<Node>, StoreError> {
        let Some(index) = position.checked_sub(1) else {
            return Ok(None);
        };
        let nodes = self.nodes.read();
        Ok(usize::try_from(index)
            .ok()
            .and_then(|i| nodes.get(i))
            .copied())
    }

    async fn set(&self, batch: Vec<Node>) -> Result<u64, StoreError> {
        let mut nodes = self.nodes.write();
        let count = check_batch(nodes.len() as u64, &batch)?;
        nodes.extend(batch);
        Ok(count)
    }

    async fn elements_count(&self) -> Result<u64, StoreError> {
        Ok(self.nodes.read().len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mmr_core::Bytes32;

    #[tokio::test]
    async fn set_and_get() {
        let store = MemoryStore::new();
        let l1 = Node::leaf(1, Bytes32::from_u64(11), Bytes32::from_u64(1));
        let l2 = Node::leaf(2, Bytes32::from_u64(12), Bytes32::from_u64(2));
        let p3 = Node::internal(3, Bytes32::from_u64(13), 1, 1, 2);

        assert_eq!(store.set(vec![l1]).await.unwrap(), 1);
        assert_eq!(store.set(vec![l2, p3]).await.unwrap(), 3);

        assert_eq!(store.get(0).await.unwrap(), None);
        assert_eq!(store.get(2).await.unwrap(), Some(l2));
        assert_eq!(store.get(3).await.unwrap(), Some(p3));
        assert_eq!(store.get(4).await.unwrap(), None);
        assert_eq!(store.elements_count().await.unwrap(), 3);
        assert_eq!(
            store.get_many(&[3, 1, 9]).await.unwrap(),
            vec![Some(p3), Some(l1), None]
        );
    }

    #[tokio::test]
    async fn rejected_batch_writes_nothing() {
        let store = MemoryStore::new();
        let l1 = Node::leaf(1, Bytes32::from_u64(11), Bytes32::from_u64(1));
        let gap = Node::leaf(3, Bytes32::from_u64(13), Bytes32::from_u64(3));

        let err = store.set(vec![l1, gap]).await.unwrap_err();
        assert!(matches!(err, StoreError::NonContiguous { expected: 2, found: 3 }));
        assert_eq!(store.elements_count().await.unwrap(), 0);
        assert!(store.nodes().is_empty());
    }

    #[tokio::test]
    async fn clones_share_state() {
        let store = MemoryStore::new();
        let reader = store.clone();
        store
            .set(vec![Node::leaf(1, Bytes32::ZERO, Bytes32::ZERO)])
            .await
            .unwrap();
        assert_eq!(reader.elements_count().await.unwrap(), 1);
    }
}
