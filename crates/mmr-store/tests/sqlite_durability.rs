//! Nodes written through one `SqliteStore` must be visible, unchanged, to a
//! store reopened on the same file.

use mmr_core::{Bytes32, Node};
use mmr_store::{NodeStore, SqliteStore};

#[tokio::test]
async fn reopened_store_sees_committed_nodes() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nodes.db");

    let l1 = Node::leaf(1, Bytes32::from_u64(101), Bytes32::from_u64(1));
    let l2 = Node::leaf(2, Bytes32::from_u64(102), Bytes32::from_u64(2));
    let p3 = Node::internal(3, Bytes32::from_u64(103), 1, 1, 2);

    {
        let store = SqliteStore::open(&path, "log").await.unwrap();
        store.set(vec![l1]).await.unwrap();
        store.set(vec![l2, p3]).await.unwrap();
        store.close().await;
    }

    let store = SqliteStore::open(&path, "log").await.unwrap();
    assert_eq!(store.elements_count().await.unwrap(), 3);
    assert_eq!(
        store.get_many(&[1, 2, 3]).await.unwrap(),
        vec![Some(l1), Some(l2), Some(p3)]
    );

    // The next batch continues from the persisted count.
    let l4 = Node::leaf(4, Bytes32::from_u64(104), Bytes32::from_u64(3));
    assert_eq!(store.set(vec![l4]).await.unwrap(), 4);
    assert!(store.set(vec![l4]).await.is_err());
}

#[tokio::test]
async fn two_ids_share_one_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("shared.db");

    let first = SqliteStore::open(&path, "first").await.unwrap();
    let second = SqliteStore::open(&path, "second").await.unwrap();

    first
        .set(vec![Node::leaf(1, Bytes32::from_u64(1), Bytes32::from_u64(1))])
        .await
        .unwrap();
    second
        .set(vec![Node::leaf(1, Bytes32::from_u64(2), Bytes32::from_u64(2))])
        .await
        .unwrap();

    assert_eq!(first.get(1).await.unwrap().unwrap().digest, Bytes32::from_u64(1));
    assert_eq!(second.get(1).await.unwrap().unwrap().digest, Bytes32::from_u64(2));
}
