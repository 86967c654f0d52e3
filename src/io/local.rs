// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Local stand-ins for the remote upload and processing services.
//!
//! Each request runs on its own background thread and reports back through
//! a [`Completion`] channel that the UI thread drains. Nothing here touches
//! the asset manager directly.

use crate::config::CensorConfig;
use crate::io::media::{self, CensorMode};
use crate::io::serialization;
use crate::lifecycle::{Completion, ProcessingCollaborator, ProcessingJob, UploadCollaborator};
use crate::models::asset::{AssetId, ProcessingOutcome};
use crate::util::geometry::MediaDimensions;
use anyhow::{anyhow, Context, Result};
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Source files of uploaded assets, shared by the uploader and the censor.
#[derive(Debug, Clone, Default)]
pub struct LocalStore {
    sources: Arc<Mutex<HashMap<AssetId, PathBuf>>>,
}

impl LocalStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn insert(&self, id: AssetId, path: PathBuf) {
        let mut sources = self.sources.lock().unwrap_or_else(|e| e.into_inner());
        sources.insert(id, path);
    }

    pub fn source(&self, id: AssetId) -> Option<PathBuf> {
        let sources = self.sources.lock().unwrap_or_else(|e| e.into_inner());
        sources.get(&id).cloned()
    }

    /// Forget the source of a deleted asset.
    pub fn remove(&self, id: AssetId) -> Option<PathBuf> {
        let mut sources = self.sources.lock().unwrap_or_else(|e| e.into_inner());
        sources.remove(&id)
    }
}

/// "Uploads" by decoding the file locally and keeping its path.
pub struct LocalUploader {
    store: LocalStore,
    sender: Sender<Completion>,
}

impl LocalUploader {
    pub fn new(store: LocalStore, sender: Sender<Completion>) -> Self {
        Self { store, sender }
    }
}

impl UploadCollaborator for LocalUploader {
    fn upload(&mut self, id: AssetId, source: PathBuf) {
        let store = self.store.clone();
        let sender = self.sender.clone();

        std::thread::spawn(move || {
            let completion = match media::load_image(&source) {
                Ok(preview) => {
                    store.insert(id, source);
                    Completion::Uploaded {
                        id,
                        dimensions: MediaDimensions::new(preview.width, preview.height),
                        preview: Some(preview),
                    }
                }
                Err(e) => Completion::UploadFailed {
                    id,
                    detail: format!("{:#}", e),
                },
            };
            // The receiver is gone only when the app is shutting down.
            let _ = sender.send(completion);
        });
    }
}

/// Record written next to each censored file.
#[derive(Debug, Serialize)]
struct CensorManifest<'a> {
    job: &'a ProcessingJob,
    source: &'a Path,
    output: &'a Path,
    mode: CensorMode,
}

/// Censors regions of still images on background threads.
pub struct LocalCensor {
    store: LocalStore,
    sender: Sender<Completion>,
    config: CensorConfig,
}

impl LocalCensor {
    pub fn new(store: LocalStore, sender: Sender<Completion>, config: CensorConfig) -> Self {
        Self { store, sender, config }
    }
}

impl ProcessingCollaborator for LocalCensor {
    fn process(&mut self, job: ProcessingJob) {
        let source = self.store.source(job.asset_id);
        let sender = self.sender.clone();
        let config = self.config.clone();

        std::thread::spawn(move || {
            if config.simulated_latency_ms > 0 {
                std::thread::sleep(Duration::from_millis(config.simulated_latency_ms));
            }

            let outcome = source
                .ok_or_else(|| anyhow!("No stored source for asset {}", job.asset_id))
                .and_then(|source| run_censor_job(&job, &source, &config));
            let outcome = match outcome {
                Ok(output) => ProcessingOutcome::Success(output.display().to_string()),
                Err(e) => {
                    log::error!("Censor job for asset {} failed: {:#}", job.asset_id, e);
                    ProcessingOutcome::Failure(format!("{:#}", e))
                }
            };

            let _ = sender.send(Completion::Processed {
                id: job.asset_id,
                outcome,
            });
        });
    }
}

/// Censor `source` according to `job` and write the result plus a JSON
/// manifest into the output directory. Returns the output image path.
///
/// Each run gets its own file, so earlier outputs of the same asset stay
/// intact.
pub fn run_censor_job(job: &ProcessingJob, source: &Path, config: &CensorConfig) -> Result<PathBuf> {
    let mut img = image::open(source)
        .with_context(|| format!("Failed to open image {}", source.display()))?
        .to_rgba8();

    let dimensions = MediaDimensions::new(img.width(), img.height());
    if !job.region.fits_within(dimensions) {
        return Err(anyhow!(
            "Region {} is outside the {}x{} image",
            job.region,
            dimensions.width,
            dimensions.height
        ));
    }

    media::censor_region(&mut img, job.region, config.mode, config.block_size);

    std::fs::create_dir_all(&config.output_dir)
        .with_context(|| format!("Failed to create {}", config.output_dir.display()))?;

    let stem = source.file_stem().and_then(|s| s.to_str()).unwrap_or("asset");
    let (id, run) = (job.asset_id.0, job.run);
    let output = config.output_dir.join(format!("{stem}.censored-{id}-{run}.png"));
    img.save(&output)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    let manifest = CensorManifest {
        job,
        source,
        output: &output,
        mode: config.mode,
    };
    serialization::export_json(&manifest, &output.with_extension("json"))?;

    log::info!("Censored {} -> {}", source.display(), output.display());
    Ok(output)
}
