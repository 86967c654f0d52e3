// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! VEIL - desktop front end.
//!
//! Upload images, drag a region over the preview and send it off to be
//! censored. All state rules live in the `veil` library; this binary only
//! renders and forwards input.

mod app;
mod ui;

use anyhow::Result;
use app::VeilApp;
use veil::config::Config;

fn main() -> Result<()> {
    let config = Config::load()?;

    // RUST_LOG overrides the configured level
    env_logger::Builder::new()
        .filter_level(config.log_level.to_level_filter())
        .parse_default_env()
        .init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(config.window.size)
            .with_min_inner_size(config.window.min_size)
            .with_title("VEIL - Region Censoring"),
        ..Default::default()
    };

    eframe::run_native(
        "VEIL",
        options,
        Box::new(|_cc| Ok(Box::new(VeilApp::new(config)))),
    )
    .map_err(|e| anyhow::anyhow!("Application error: {}", e))?;

    Ok(())
}
