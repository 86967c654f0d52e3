// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Media asset data structures.
//!
//! Assets are owned by the lifecycle manager. Everything else sees them
//! through immutable [`AssetSnapshot`]s.

use crate::util::geometry::MediaDimensions;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Stable, session-unique asset identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetId(pub u64);

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Where an asset is in its upload/processing lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetStatus {
    Uploading,
    Ready,
    Processing,
    Processed,
    Failed,
}

impl AssetStatus {
    /// Short label for list views.
    pub fn label(&self) -> &'static str {
        match self {
            AssetStatus::Uploading => "Uploading",
            AssetStatus::Ready => "Ready",
            AssetStatus::Processing => "Processing",
            AssetStatus::Processed => "Processed",
            AssetStatus::Failed => "Failed",
        }
    }

    /// True while a background operation for the asset is outstanding.
    pub fn is_busy(&self) -> bool {
        matches!(self, AssetStatus::Uploading | AssetStatus::Processing)
    }
}

/// Result reported by a processing collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessingOutcome {
    /// Processing finished; carries a reference to the processed output.
    Success(String),
    /// Processing failed; carries a human readable detail.
    Failure(String),
}

/// A media asset tracked for the current session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MediaAsset {
    pub id: AssetId,
    pub name: String,
    pub status: AssetStatus,
    /// Known once the upload has been confirmed.
    pub original_dimensions: Option<MediaDimensions>,
    pub processed_reference: Option<String>,
    pub error_detail: Option<String>,
}

impl MediaAsset {
    /// Create a new asset in the `Uploading` state.
    pub fn new(id: AssetId, name: String) -> Self {
        Self {
            id,
            name,
            status: AssetStatus::Uploading,
            original_dimensions: None,
            processed_reference: None,
            error_detail: None,
        }
    }
}

/// Immutable view of the asset collection at one point in time.
pub type AssetSnapshot = Arc<[MediaAsset]>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_asset_is_uploading() {
        let asset = MediaAsset::new(AssetId(1), "clip.png".to_string());
        assert_eq!(asset.status, AssetStatus::Uploading);
        assert!(asset.original_dimensions.is_none());
        assert!(asset.processed_reference.is_none());
        assert!(asset.error_detail.is_none());
    }

    #[test]
    fn test_status_serializes_lowercase() {
        let json = serde_json::to_string(&AssetStatus::Processed).unwrap();
        assert_eq!(json, "\"processed\"");
        assert!(AssetStatus::Processing.is_busy());
        assert!(!AssetStatus::Failed.is_busy());
    }
}
