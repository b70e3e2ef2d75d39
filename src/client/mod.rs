//! Snapshot API client

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::classify::SnapshotType;
use crate::error::Result;

pub mod snapshell;

pub use snapshell::SnapshellClient;

/// Snapshot API client trait
#[async_trait]
pub trait SnapshotApi: Send + Sync {
    /// Upload captured content and get back the created snapshot
    async fn create_snapshot(&self, request: &SnapshotRequest) -> Result<CreatedSnapshot>;
}

/// Request body for snapshot creation. Field names follow the server's
/// JSON contract.
#[derive(Debug, Clone, Serialize)]
pub struct SnapshotRequest {
    /// Human-readable snapshot label
    pub label: String,

    /// Content type driving the renderer
    #[serde(rename = "type")]
    pub snapshot_type: SnapshotType,

    /// Raw captured output
    pub content: String,

    /// Whether the snapshot is private to the owning account
    #[serde(rename = "isPrivate")]
    pub is_private: bool,

    /// Days until the snapshot expires
    #[serde(rename = "expiresInDays")]
    pub expires_in_days: u32,
}

/// A successfully created snapshot
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedSnapshot {
    /// Server-assigned snapshot identifier
    pub id: String,
}
