//! # SQLite Node Store
//!
//! Durable storage for one or more accumulators in a single SQLite
//! database. Every row is keyed by `(mmr_id, position)`:
//!
//! ```sql
//! mmr_nodes(mmr_id, position, height, digest, value, left_child, right_child)
//! ```
//!
//! Leaves carry `value` and no children; internal nodes carry both child
//! positions and no value. The elements count is `MAX(position)` for the id,
//! so a committed batch and the count it implies can never disagree.

use std::path::Path;
use std::str::FromStr;

use async_trait::async_trait;
use mmr_core::{Bytes32, Node, NodeKind, StoreError};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use crate::{check_batch, NodeStore};

const CREATE_TABLE: &str = "CREATE TABLE IF NOT EXISTS mmr_nodes (
    mmr_id      TEXT    NOT NULL,
    position    INTEGER NOT NULL,
    height      INTEGER NOT NULL,
    digest      BLOB    NOT NULL,
    value       BLOB,
    left_child  INTEGER,
    right_child INTEGER,
    PRIMARY KEY (mmr_id, position)
)";

fn backend(err: sqlx::Error) -> StoreError {
    StoreError::Backend(err.to_string())
}

fn to_sql(n: u64) -> Result<i64, StoreError> {
    i64::try_from(n).map_err(|_| StoreError::Backend(format!("position {n} exceeds SQLite INTEGER")))
}

fn from_sql(n: i64, column: &str) -> Result<u64, StoreError> {
    u64::try_from(n).map_err(|_| StoreError::Corrupt(format!("negative {column}: {n}")))
}

/// Node store backed by an SQLx SQLite pool.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
    mmr_id: String,
}

impl SqliteStore {
    /// Open (creating if needed) the database file at `path`.
    pub async fn open(path: impl AsRef<Path>, mmr_id: impl Into<String>) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::new()
            .filename(path.as_ref())
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect_with(options)
            .await
            .map_err(backend)?;
        Self::from_pool(pool, mmr_id).await
    }

    /// Connect using an SQLx URL such as `sqlite://nodes.db` or
    /// `sqlite::memory:`.
    ///
    /// In-memory databases are private to one connection, so the pool is
    /// limited to a single connection that is never recycled.
    pub async fn connect(url: &str, mmr_id: impl Into<String>) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(url)
            .map_err(backend)?
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(backend)?;
        Self::from_pool(pool, mmr_id).await
    }

    /// Use an existing pool. Creates the schema if it is missing.
    pub async fn from_pool(pool: SqlitePool, mmr_id: impl Into<String>) -> Result<Self, StoreError> {
        sqlx::query(CREATE_TABLE)
            .execute(&pool)
            .await
            .map_err(backend)?;
        let mmr_id = mmr_id.into();
        tracing::debug!(%mmr_id, "sqlite node store ready");
        Ok(Self { pool, mmr_id })
    }

    /// The accumulator id rows are keyed by.
    pub fn mmr_id(&self) -> &str {
        &self.mmr_id
    }

    /// The underlying pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close the pool, waiting for connections to be released.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl NodeStore for SqliteStore {
    async fn get(&self, position: u64) -> Result<Option<Node>, StoreError> {
        let row = sqlx::query_as::<_, NodeRow>(
            "SELECT position, height, digest, value, left_child, right_child
             FROM mmr_nodes WHERE mmr_id = ? AND position = ?",
        )
        .bind(&self.mmr_id)
        .bind(to_sql(position)?)
        .fetch_optional(&self.pool)
        .await
        .map_err(backend)?;

        row.map(NodeRow::into_node).transpose()
    }

    async fn set(&self, nodes: Vec<Node>) -> Result<u64, StoreError> {
        let mut tx = self.pool.begin().await.map_err(backend)?;

        let current: Option<i64> =
            sqlx::query_scalar("SELECT MAX(position) FROM mmr_nodes WHERE mmr_id = ?")
                .bind(&self.mmr_id)
                .fetch_one(&mut *tx)
                .await
                .map_err(backend)?;
        let current = current.map(|n| from_sql(n, "position")).transpose()?.unwrap_or(0);
        let count = check_batch(current, &nodes)?;

        for node in &nodes {
            let (value, left, right) = match node.kind {
                NodeKind::Leaf { value } => (Some(value.as_bytes().to_vec()), None, None),
                NodeKind::Internal { left, right } => (None, Some(to_sql(left)?), Some(to_sql(right)?)),
            };
            sqlx::query(
                "INSERT INTO mmr_nodes (mmr_id, position, height, digest, value, left_child, right_child)
                 VALUES (?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(&self.mmr_id)
            .bind(to_sql(node.position)?)
            .bind(i64::from(node.height))
            .bind(node.digest.as_bytes().to_vec())
            .bind(value)
            .bind(left)
            .bind(right)
            .execute(&mut *tx)
            .await
            .map_err(backend)?;
        }

        tx.commit().await.map_err(backend)?;
        tracing::debug!(mmr_id = %self.mmr_id, elements_count = count, "committed node batch");
        Ok(count)
    }

    async fn elements_count(&self) -> Result<u64, StoreError> {
        let current: Option<i64> =
            sqlx::query_scalar("SELECT MAX(position) FROM mmr_nodes WHERE mmr_id = ?")
                .bind(&self.mmr_id)
                .fetch_one(&self.pool)
                .await
                .map_err(backend)?;
        Ok(current.map(|n| from_sql(n, "position")).transpose()?.unwrap_or(0))
    }
}

/// Internal row type for SQLx mapping.
#[derive(sqlx::FromRow)]
struct NodeRow {
    position: i64,
    height: i64,
    digest: Vec<u8>,
    value: Option<Vec<u8>>,
    left_child: Option<i64>,
    right_child: Option<i64>,
}

impl NodeRow {
    fn into_node(self) -> Result<Node, StoreError> {
        let position = from_sql(self.position, "position")?;
        let height = u32::try_from(self.height)
            .map_err(|_| StoreError::Corrupt(format!("height {} at position {position}", self.height)))?;
        let digest = Bytes32::from_slice(&self.digest)
            .map_err(|e| StoreError::Corrupt(format!("digest at position {position}: {e}")))?;

        match (self.value, self.left_child, self.right_child) {
            (Some(value), None, None) => {
                let value = Bytes32::from_slice(&value)
                    .map_err(|e| StoreError::Corrupt(format!("value at position {position}: {e}")))?;
                Ok(Node::leaf(position, digest, value))
            }
            (None, Some(left), Some(right)) => Ok(Node::internal(
                position,
                digest,
                height,
                from_sql(left, "left_child")?,
                from_sql(right, "right_child")?,
            )),
            _ => Err(StoreError::Corrupt(format!(
                "node at position {position} is neither a leaf nor an internal node"
            ))),
        }
    }
}
