// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Application configuration.
//!
//! Loaded from the file named by `VEIL_CONFIG`, or `veil.yaml` in the
//! working directory. A missing file means defaults, and every field may be
//! omitted.

use crate::io::media::CensorMode;
use crate::io::serialization;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable that overrides the config file location.
pub const CONFIG_ENV_VAR: &str = "VEIL_CONFIG";

/// Config file looked up when the variable is unset.
pub const DEFAULT_CONFIG_FILE: &str = "veil.yaml";

/// Log verbosity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Convert to log crate's LevelFilter.
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub window: WindowConfig,

    /// Default log level; `RUST_LOG` still takes precedence.
    #[serde(default)]
    pub log_level: LogLevel,

    #[serde(default)]
    pub censor: CensorConfig,
}

/// Initial window geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowConfig {
    #[serde(default = "default_window_size")]
    pub size: [f32; 2],
    #[serde(default = "default_min_window_size")]
    pub min_size: [f32; 2],
}

fn default_window_size() -> [f32; 2] {
    [1280.0, 720.0]
}

fn default_min_window_size() -> [f32; 2] {
    [800.0, 600.0]
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            size: default_window_size(),
            min_size: default_min_window_size(),
        }
    }
}

/// Settings for the local censoring collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CensorConfig {
    #[serde(default)]
    pub mode: CensorMode,

    /// Edge length in pixels of pixelation blocks
    #[serde(default = "default_block_size")]
    pub block_size: u32,

    /// Where censored files and job manifests are written
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Artificial delay before a job runs, in milliseconds
    #[serde(default)]
    pub simulated_latency_ms: u64,
}

fn default_block_size() -> u32 {
    16
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("censored")
}

impl Default for CensorConfig {
    fn default() -> Self {
        Self {
            mode: CensorMode::default(),
            block_size: default_block_size(),
            output_dir: default_output_dir(),
            simulated_latency_ms: 0,
        }
    }
}

impl Config {
    /// Load from the configured location, falling back to defaults when no
    /// file exists there.
    pub fn load() -> Result<Self> {
        let path = std::env::var_os(CONFIG_ENV_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        serialization::import(path)
    }
}
