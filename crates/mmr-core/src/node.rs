//! # Stored Nodes
//!
//! A node is written once, at append time, and never mutated. Leaves keep
//! the encoded value they commit to; internal nodes keep the positions of
//! their children.

use serde::{Deserialize, Serialize};

use crate::bytes32::Bytes32;

/// What a node commits to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NodeKind {
    /// A leaf holding the canonical word of an appended value.
    Leaf {
        /// The encoded value.
        value: Bytes32,
    },
    /// An internal node created by merging two equal-height subtrees.
    Internal {
        /// Position of the left child.
        left: u64,
        /// Position of the right child.
        right: u64,
    },
}

/// A node of the MMR as persisted by a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    /// 1-based element position.
    pub position: u64,
    /// Digest stored at this position.
    pub digest: Bytes32,
    /// Height of the node (0 for leaves).
    pub height: u32,
    /// Leaf value or child positions.
    #[serde(flatten)]
    pub kind: NodeKind,
}

impl Node {
    /// Build a leaf node.
    pub fn leaf(position: u64, digest: Bytes32, value: Bytes32) -> Self {
        Self {
            position,
            digest,
            height: 0,
            kind: NodeKind::Leaf { value },
        }
    }

    /// Build an internal node.
    pub fn internal(position: u64, digest: Bytes32, height: u32, left: u64, right: u64) -> Self {
        Self {
            position,
            digest,
            height,
            kind: NodeKind::Internal { left, right },
        }
    }

    /// True for leaves.
    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf { .. })
    }

    /// The leaf value, if this is a leaf.
    pub fn value(&self) -> Option<Bytes32> {
        match self.kind {
            NodeKind::Leaf { value } => Some(value),
            NodeKind::Internal { .. } => None,
        }
    }
}
