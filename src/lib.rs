// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! VEIL - region selection and censoring for images and video frames.
//!
//! The library holds the parts that do not depend on a GUI:
//!
//! - [`util::geometry`]: aspect-fit placement and coordinate transforms
//! - [`selection`]: the drag-to-select state machine
//! - [`lifecycle`]: the asset manager and its collaborator traits
//! - [`io`]: image loading, censoring and local collaborators

pub mod config;
pub mod error;
pub mod io;
pub mod lifecycle;
pub mod models;
pub mod selection;
pub mod util;
