// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Data model for assets and selected regions.

pub mod asset;
pub mod region;
