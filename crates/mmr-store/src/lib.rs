//! # mmr-store: Node Stores for the MMR Accumulator
//!
//! The engine reads and writes nodes only through [`NodeStore`]. Two
//! backends ship with the workspace:
//!
//! - [`MemoryStore`]: a `parking_lot` guarded vector, for tests and
//!   short-lived accumulators.
//! - [`SqliteStore`]: durable storage via SQLx; several accumulators can
//!   share one database file, keyed by an MMR id.
//!
//! ## Batch Contract
//!
//! Each append hands the store one batch: the new leaf followed by every
//! parent it completed. A backend must write the whole batch or nothing, and
//! must reject a batch that does not start at `elements_count + 1` with
//! [`StoreError::NonContiguous`]. The elements count is derived from the
//! stored positions, so it advances in the same write as the nodes.

pub mod memory;
pub mod sqlite;

use std::sync::Arc;

use async_trait::async_trait;
use mmr_core::{Node, StoreError};

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Persistent mapping from 1-based element position to node.
///
/// All methods take `&self`; backends synchronise internally so a store can
/// be shared between a writer and concurrent readers.
#[async_trait]
pub trait NodeStore: Send + Sync {
    /// Fetch the node at `position`, if stored.
    async fn get(&self, position: u64) -> Result<Option<Node>, StoreError>;

    /// Fetch several nodes, preserving the order of `positions`.
    async fn get_many(&self, positions: &[u64]) -> Result<Vec<Option<Node>>, StoreError> {
        let mut nodes = Vec::with_capacity(positions.len());
        for &position in positions {
            nodes.push(self.get(position).await?);
        }
        Ok(nodes)
    }

    /// Atomically write one append batch and return the new elements count.
    async fn set(&self, nodes: Vec<Node>) -> Result<u64, StoreError>;

    /// Number of elements (leaves and internal nodes) stored.
    async fn elements_count(&self) -> Result<u64, StoreError>;
}

#[async_trait]
impl<S: NodeStore + ?Sized> NodeStore for Arc<S> {
    async fn get(&self, position: u64) -> Result<Option<Node>, StoreError> {
        (**self).get(position).await
    }

    async fn get_many(&self, positions: &[u64]) -> Result<Vec<Option<Node>>, StoreError> {
        (**self).get_many(positions).await
    }

    async fn set(&self, nodes: Vec<Node>) -> Result<u64, StoreError> {
        (**self).set(nodes).await
    }

    async fn elements_count(&self) -> Result<u64, StoreError> {
        (**self).elements_count().await
    }
}

/// Check that `nodes` continues a store currently holding `elements_count`
/// elements with no gaps. Returns the count after the batch.
pub(crate) fn check_batch(elements_count: u64, nodes: &[Node]) -> Result<u64, StoreError> {
    let mut expected = elements_count + 1;
    for node in nodes {
        if node.position != expected {
            tracing::warn!(
                expected,
                found = node.position,
                "rejected non-contiguous node batch"
            );
            return Err(StoreError::NonContiguous {
                expected,
                found: node.position,
            });
        }
        expected += 1;
    }
    Ok(expected - 1)
}
