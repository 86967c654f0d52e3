// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! I/O operations: media files, local collaborators and config files.

pub mod local;
pub mod media;
pub mod serialization;
