// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Error types for the geometry, selection and lifecycle layers.
//!
//! These are all local, synchronous failures reported to the immediate
//! caller. Asynchronous processing failures are not errors here: they are
//! recorded on the asset itself.

use crate::models::asset::{AssetId, AssetStatus};
use crate::models::region::SelectionRectangle;
use crate::util::geometry::MediaDimensions;
use thiserror::Error;

/// Faults computing an aspect-fit mapping.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// The container has no usable area yet; retry once layout settles.
    #[error("container has no area ({width}x{height})")]
    DegenerateContainer { width: f64, height: f64 },

    /// Media dimensions must both be non-zero.
    #[error("media has no area ({width}x{height})")]
    EmptyMedia { width: u32, height: u32 },
}

/// Faults from the region selection controller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    /// No confirmed, non-degenerate selection is available.
    #[error("no region is selected")]
    NoSelection,
}

/// Validation failures from the asset lifecycle manager.
///
/// None of these mutate asset state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LifecycleError {
    #[error("asset {0} does not exist")]
    UnknownAsset(AssetId),

    #[error("asset {id} is {status:?}, which does not allow this operation")]
    InvalidState { id: AssetId, status: AssetStatus },

    #[error("region {region} lies outside the {}x{} media of asset {id}", .dimensions.width, .dimensions.height)]
    RegionOutOfBounds {
        id: AssetId,
        region: SelectionRectangle,
        dimensions: MediaDimensions,
    },

    #[error("asset {0} already has a processing request in flight")]
    AlreadyProcessing(AssetId),
}
