// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Asset lifecycle management.
//!
//! [`AssetManager`] owns the canonical asset list for a session and enforces
//! the status transitions:
//!
//! ```text
//! Uploading  --upload_succeeded-->      Ready
//! Uploading  --upload_failed---->       Failed
//! Ready      --begin_processing-->      Processing
//! Processed  --begin_processing-->      Processing
//! Failed     --begin_processing-->      Processing   (dimensions known)
//! Processing --Success----------->      Processed
//! Processing --Failure----------->      Failed
//! (any)      --delete_asset------>      removed
//! ```
//!
//! Work is handed to collaborators that return immediately; their results
//! come back later as [`Completion`] messages and are applied on the same
//! thread that owns the manager.

use crate::error::LifecycleError;
use crate::models::asset::{AssetId, AssetSnapshot, AssetStatus, MediaAsset, ProcessingOutcome};
use crate::models::region::SelectionRectangle;
use crate::util::geometry::MediaDimensions;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver, Sender};

/// A request to censor one region of one asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessingJob {
    pub asset_id: AssetId,
    pub region: SelectionRectangle,
    /// Session-unique sequence number, starting at 1. Outputs of different
    /// runs for the same asset never share a name.
    pub run: u64,
}

/// Starts uploads. Must not block; results arrive as [`Completion`]s.
pub trait UploadCollaborator {
    fn upload(&mut self, id: AssetId, source: PathBuf);
}

/// Starts processing jobs. Must not block; results arrive as [`Completion`]s.
pub trait ProcessingCollaborator {
    fn process(&mut self, job: ProcessingJob);
}

/// Decoded preview pixels that travel with an upload result.
#[derive(Debug, Clone)]
pub struct Preview {
    pub width: u32,
    pub height: u32,
    /// RGBA8, row-major
    pub pixels: Vec<u8>,
}

/// Asynchronous result delivered by a collaborator.
#[derive(Debug, Clone)]
pub enum Completion {
    Uploaded {
        id: AssetId,
        dimensions: MediaDimensions,
        preview: Option<Preview>,
    },
    UploadFailed {
        id: AssetId,
        detail: String,
    },
    Processed {
        id: AssetId,
        outcome: ProcessingOutcome,
    },
}

impl Completion {
    pub fn asset_id(&self) -> AssetId {
        match self {
            Completion::Uploaded { id, .. }
            | Completion::UploadFailed { id, .. }
            | Completion::Processed { id, .. } => *id,
        }
    }
}

/// Owner of the session's media assets.
pub struct AssetManager {
    assets: Vec<MediaAsset>,
    next_id: u64,
    next_run: u64,
    processor: Box<dyn ProcessingCollaborator>,
    subscribers: Vec<Sender<AssetSnapshot>>,
    snapshot: AssetSnapshot,
}

impl AssetManager {
    pub fn new(processor: Box<dyn ProcessingCollaborator>) -> Self {
        Self {
            assets: Vec::new(),
            next_id: 1,
            next_run: 1,
            processor,
            subscribers: Vec::new(),
            snapshot: Vec::new().into(),
        }
    }

    /// Current immutable view of all assets, in registration order.
    pub fn list_assets(&self) -> AssetSnapshot {
        self.snapshot.clone()
    }

    pub fn get(&self, id: AssetId) -> Option<&MediaAsset> {
        self.assets.iter().find(|a| a.id == id)
    }

    /// Receive a fresh snapshot after every change.
    pub fn subscribe(&mut self) -> Receiver<AssetSnapshot> {
        let (sender, receiver) = channel();
        self.subscribers.push(sender);
        receiver
    }

    /// Track a new upload. The asset starts in `Uploading`.
    pub fn register_upload(&mut self, name: impl Into<String>) -> AssetId {
        let id = AssetId(self.next_id);
        self.next_id += 1;
        let asset = MediaAsset::new(id, name.into());
        log::info!("Registered upload {} ({})", id, asset.name);
        self.assets.push(asset);
        self.publish();
        id
    }

    /// Register an upload and hand it to `uploader` in one step.
    pub fn start_upload(
        &mut self,
        uploader: &mut dyn UploadCollaborator,
        name: impl Into<String>,
        source: PathBuf,
    ) -> AssetId {
        let id = self.register_upload(name);
        uploader.upload(id, source);
        id
    }

    /// Returns `Ok(false)` when the asset was deleted before the result arrived.
    pub fn upload_succeeded(&mut self, id: AssetId, dimensions: MediaDimensions) -> Result<bool, LifecycleError> {
        if dimensions.width == 0 || dimensions.height == 0 {
            return self.upload_failed(id, format!("media has no area ({}x{})", dimensions.width, dimensions.height));
        }
        let Some(asset) = self.upload_target(id)? else {
            return Ok(false);
        };
        asset.status = AssetStatus::Ready;
        asset.original_dimensions = Some(dimensions);
        log::info!("Asset {} ready ({}x{})", id, dimensions.width, dimensions.height);
        self.publish();
        Ok(true)
    }

    pub fn upload_failed(&mut self, id: AssetId, detail: impl Into<String>) -> Result<bool, LifecycleError> {
        let Some(asset) = self.upload_target(id)? else {
            return Ok(false);
        };
        let detail = detail.into();
        log::warn!("Upload of asset {} failed: {}", id, detail);
        asset.status = AssetStatus::Failed;
        asset.error_detail = Some(detail);
        self.publish();
        Ok(true)
    }

    /// Resolve the asset an upload result applies to. Results for ids that
    /// were issued but later deleted resolve to `None`.
    fn upload_target(&mut self, id: AssetId) -> Result<Option<&mut MediaAsset>, LifecycleError> {
        let issued = id.0 > 0 && id.0 < self.next_id;
        match self.assets.iter_mut().find(|a| a.id == id) {
            Some(asset) if asset.status == AssetStatus::Uploading => Ok(Some(asset)),
            Some(asset) => Err(LifecycleError::InvalidState {
                id,
                status: asset.status,
            }),
            None if issued => {
                log::debug!("Discarding upload result for deleted asset {}", id);
                Ok(None)
            }
            None => Err(LifecycleError::UnknownAsset(id)),
        }
    }

    /// Move an asset to `Processing` and submit `region` for censoring.
    ///
    /// The status change is visible immediately; the outcome arrives later
    /// through [`AssetManager::on_processing_result`].
    pub fn begin_processing(&mut self, id: AssetId, region: SelectionRectangle) -> Result<(), LifecycleError> {
        let asset = self
            .assets
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or(LifecycleError::UnknownAsset(id))?;

        let dimensions = match (asset.status, asset.original_dimensions) {
            (AssetStatus::Processing, _) => return Err(LifecycleError::AlreadyProcessing(id)),
            (AssetStatus::Ready | AssetStatus::Processed | AssetStatus::Failed, Some(dimensions)) => dimensions,
            (status, _) => return Err(LifecycleError::InvalidState { id, status }),
        };

        if !region.fits_within(dimensions) {
            return Err(LifecycleError::RegionOutOfBounds {
                id,
                region,
                dimensions,
            });
        }

        asset.status = AssetStatus::Processing;
        asset.error_detail = None;
        let run = self.next_run;
        self.next_run += 1;
        log::info!("Processing asset {} region {} (run {})", id, region, run);
        self.publish();

        self.processor.process(ProcessingJob {
            asset_id: id,
            region,
            run,
        });
        Ok(())
    }

    /// Apply a processing result. Results for deleted assets, or for assets
    /// that are not currently processing, are discarded and return `false`.
    pub fn on_processing_result(&mut self, id: AssetId, outcome: ProcessingOutcome) -> bool {
        let Some(asset) = self.assets.iter_mut().find(|a| a.id == id) else {
            log::debug!("Discarding processing result for missing asset {}", id);
            return false;
        };
        if asset.status != AssetStatus::Processing {
            log::warn!("Discarding processing result for asset {} in state {:?}", id, asset.status);
            return false;
        }

        match outcome {
            ProcessingOutcome::Success(reference) => {
                log::info!("Asset {} processed: {}", id, reference);
                asset.status = AssetStatus::Processed;
                asset.processed_reference = Some(reference);
            }
            ProcessingOutcome::Failure(detail) => {
                log::warn!("Processing of asset {} failed: {}", id, detail);
                asset.status = AssetStatus::Failed;
                asset.error_detail = Some(detail);
            }
        }
        self.publish();
        true
    }

    /// Apply any collaborator result. Upload results that do not fit the
    /// asset's state are logged and dropped.
    ///
    /// Returns whether the result changed an asset. Callers holding
    /// per-asset resources for the result (such as a preview) should drop
    /// them on `false`.
    pub fn apply(&mut self, completion: Completion) -> bool {
        let result = match completion {
            Completion::Uploaded { id, dimensions, .. } => self.upload_succeeded(id, dimensions),
            Completion::UploadFailed { id, detail } => self.upload_failed(id, detail),
            Completion::Processed { id, outcome } => Ok(self.on_processing_result(id, outcome)),
        };
        result.unwrap_or_else(|e| {
            log::warn!("Ignoring upload result: {}", e);
            false
        })
    }

    /// Remove an asset regardless of status. Any in-flight work is not
    /// cancelled; its result will be discarded on arrival.
    pub fn delete_asset(&mut self, id: AssetId) -> Option<MediaAsset> {
        let index = self.assets.iter().position(|a| a.id == id)?;
        let asset = self.assets.remove(index);
        log::info!("Deleted asset {} ({}, was {:?})", id, asset.name, asset.status);
        self.publish();
        Some(asset)
    }

    fn publish(&mut self) {
        self.snapshot = self.assets.clone().into();
        let snapshot = &self.snapshot;
        self.subscribers.retain(|s| s.send(snapshot.clone()).is_ok());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Records submitted jobs instead of running them.
    #[derive(Clone, Default)]
    struct RecordingProcessor {
        jobs: Rc<RefCell<Vec<ProcessingJob>>>,
    }

    impl ProcessingCollaborator for RecordingProcessor {
        fn process(&mut self, job: ProcessingJob) {
            self.jobs.borrow_mut().push(job);
        }
    }

    #[derive(Default)]
    struct RecordingUploader {
        uploads: Vec<(AssetId, PathBuf)>,
    }

    impl UploadCollaborator for RecordingUploader {
        fn upload(&mut self, id: AssetId, source: PathBuf) {
            self.uploads.push((id, source));
        }
    }

    fn manager() -> (AssetManager, Rc<RefCell<Vec<ProcessingJob>>>) {
        let processor = RecordingProcessor::default();
        let jobs = processor.jobs.clone();
        (AssetManager::new(Box::new(processor)), jobs)
    }

    fn ready_asset(manager: &mut AssetManager) -> AssetId {
        let id = manager.register_upload("clip.png");
        manager.upload_succeeded(id, MediaDimensions::new(1920, 1080)).unwrap();
        id
    }

    fn region() -> SelectionRectangle {
        SelectionRectangle::new(100, 100, 400, 300).unwrap()
    }

    fn status(manager: &AssetManager, id: AssetId) -> AssetStatus {
        manager.get(id).unwrap().status
    }

    #[test]
    fn test_upload_lifecycle() {
        let (mut m, _) = manager();
        let id = m.register_upload("clip.png");
        assert_eq!(status(&m, id), AssetStatus::Uploading);

        m.upload_succeeded(id, MediaDimensions::new(640, 480)).unwrap();
        let asset = m.get(id).unwrap();
        assert_eq!(asset.status, AssetStatus::Ready);
        assert_eq!(asset.original_dimensions, Some(MediaDimensions::new(640, 480)));

        let err = m.upload_succeeded(id, MediaDimensions::new(640, 480)).unwrap_err();
        assert_eq!(err, LifecycleError::InvalidState { id, status: AssetStatus::Ready });
    }

    #[test]
    fn test_upload_failure_is_recorded() {
        let (mut m, _) = manager();
        let id = m.register_upload("broken.png");
        m.upload_failed(id, "unsupported format").unwrap();
        let asset = m.get(id).unwrap();
        assert_eq!(asset.status, AssetStatus::Failed);
        assert_eq!(asset.error_detail.as_deref(), Some("unsupported format"));

        // Without dimensions there is nothing to process.
        let err = m.begin_processing(id, region()).unwrap_err();
        assert_eq!(err, LifecycleError::InvalidState { id, status: AssetStatus::Failed });
    }

    #[test]
    fn test_start_upload_hands_off_to_collaborator() {
        let (mut m, _) = manager();
        let mut uploader = RecordingUploader::default();
        let id = m.start_upload(&mut uploader, "a.png", PathBuf::from("/tmp/a.png"));
        assert_eq!(uploader.uploads, vec![(id, PathBuf::from("/tmp/a.png"))]);
        assert_eq!(status(&m, id), AssetStatus::Uploading);
    }

    #[test]
    fn test_ids_are_unique_and_not_reused() {
        let (mut m, _) = manager();
        let a = m.register_upload("a");
        m.delete_asset(a);
        let b = m.register_upload("b");
        assert_ne!(a, b);
    }

    #[test]
    fn test_second_begin_processing_is_rejected_until_result() {
        let (mut m, jobs) = manager();
        let id = ready_asset(&mut m);

        m.begin_processing(id, region()).unwrap();
        assert_eq!(status(&m, id), AssetStatus::Processing);
        assert_eq!(jobs.borrow().len(), 1);

        let err = m.begin_processing(id, region()).unwrap_err();
        assert_eq!(err, LifecycleError::AlreadyProcessing(id));
        assert_eq!(jobs.borrow().len(), 1);

        m.on_processing_result(id, ProcessingOutcome::Success("out/clip.png".into()));
        assert_eq!(status(&m, id), AssetStatus::Processed);
        assert_eq!(m.get(id).unwrap().processed_reference.as_deref(), Some("out/clip.png"));

        m.begin_processing(id, region()).unwrap();
        assert_eq!(status(&m, id), AssetStatus::Processing);
        assert_eq!(jobs.borrow().len(), 2);
        assert_eq!(
            jobs.borrow()[1],
            ProcessingJob {
                asset_id: id,
                region: region(),
                run: 2
            }
        );
    }

    #[test]
    fn test_runs_are_numbered_across_assets() {
        let (mut m, jobs) = manager();
        let a = ready_asset(&mut m);
        let b = ready_asset(&mut m);
        m.begin_processing(a, region()).unwrap();
        m.begin_processing(b, region()).unwrap();
        m.on_processing_result(a, ProcessingOutcome::Success("a".into()));
        m.begin_processing(a, region()).unwrap();

        let runs: Vec<(AssetId, u64)> = jobs.borrow().iter().map(|j| (j.asset_id, j.run)).collect();
        assert_eq!(runs, vec![(a, 1), (b, 2), (a, 3)]);
    }

    #[test]
    fn test_reprocessing_keeps_previous_reference_until_result() {
        let (mut m, _) = manager();
        let id = ready_asset(&mut m);
        m.begin_processing(id, region()).unwrap();
        m.on_processing_result(id, ProcessingOutcome::Success("first".into()));

        m.begin_processing(id, region()).unwrap();
        assert_eq!(m.get(id).unwrap().processed_reference.as_deref(), Some("first"));

        m.on_processing_result(id, ProcessingOutcome::Success("second".into()));
        assert_eq!(m.get(id).unwrap().processed_reference.as_deref(), Some("second"));
    }

    #[test]
    fn test_processing_failure_is_recorded_and_retryable() {
        let (mut m, jobs) = manager();
        let id = ready_asset(&mut m);
        m.begin_processing(id, region()).unwrap();
        m.on_processing_result(id, ProcessingOutcome::Failure("encoder crashed".into()));

        let asset = m.get(id).unwrap();
        assert_eq!(asset.status, AssetStatus::Failed);
        assert_eq!(asset.error_detail.as_deref(), Some("encoder crashed"));

        m.begin_processing(id, region()).unwrap();
        assert_eq!(status(&m, id), AssetStatus::Processing);
        assert!(m.get(id).unwrap().error_detail.is_none());
        assert_eq!(jobs.borrow().len(), 2);
    }

    #[test]
    fn test_begin_processing_validation_does_not_mutate() {
        let (mut m, jobs) = manager();
        let uploading = m.register_upload("pending.png");
        let err = m.begin_processing(uploading, region()).unwrap_err();
        assert_eq!(
            err,
            LifecycleError::InvalidState {
                id: uploading,
                status: AssetStatus::Uploading
            }
        );

        let id = ready_asset(&mut m);
        let too_big = SelectionRectangle::new(0, 0, 1921, 1080).unwrap();
        let err = m.begin_processing(id, too_big).unwrap_err();
        assert!(matches!(err, LifecycleError::RegionOutOfBounds { .. }));
        let negative = SelectionRectangle::new(-1, 0, 10, 10).unwrap();
        assert!(m.begin_processing(id, negative).is_err());
        assert_eq!(status(&m, id), AssetStatus::Ready);

        let err = m.begin_processing(AssetId(999), region()).unwrap_err();
        assert_eq!(err, LifecycleError::UnknownAsset(AssetId(999)));
        assert!(jobs.borrow().is_empty());
    }

    #[test]
    fn test_full_frame_region_is_in_bounds() {
        let (mut m, _) = manager();
        let id = ready_asset(&mut m);
        let full = SelectionRectangle::new(0, 0, 1920, 1080).unwrap();
        assert!(m.begin_processing(id, full).is_ok());
    }

    #[test]
    fn test_late_result_after_delete_is_discarded() {
        let (mut m, _) = manager();
        let id = ready_asset(&mut m);
        m.begin_processing(id, region()).unwrap();

        let removed = m.delete_asset(id).unwrap();
        assert_eq!(removed.status, AssetStatus::Processing);
        let before = m.list_assets();

        assert!(!m.on_processing_result(id, ProcessingOutcome::Success("late".into())));
        assert!(m.get(id).is_none());
        assert_eq!(m.list_assets(), before);
        assert!(m.list_assets().is_empty());
    }

    #[test]
    fn test_late_upload_after_delete_is_discarded() {
        let (mut m, _) = manager();
        let id = m.register_upload("gone.png");
        m.delete_asset(id);
        assert_eq!(m.upload_succeeded(id, MediaDimensions::new(10, 10)), Ok(false));
        assert_eq!(m.upload_failed(id, "late"), Ok(false));
        assert!(m.list_assets().is_empty());

        let err = m.upload_succeeded(AssetId(42), MediaDimensions::new(10, 10)).unwrap_err();
        assert_eq!(err, LifecycleError::UnknownAsset(AssetId(42)));
    }

    #[test]
    fn test_stray_result_for_idle_asset_is_ignored() {
        let (mut m, _) = manager();
        let id = ready_asset(&mut m);
        assert!(!m.on_processing_result(id, ProcessingOutcome::Success("stray".into())));
        assert_eq!(status(&m, id), AssetStatus::Ready);
        assert!(m.get(id).unwrap().processed_reference.is_none());
    }

    #[test]
    fn test_zero_sized_upload_fails_asset() {
        let (mut m, _) = manager();
        let id = m.register_upload("empty.png");
        m.upload_succeeded(id, MediaDimensions::new(0, 10)).unwrap();
        assert_eq!(status(&m, id), AssetStatus::Failed);
    }

    #[test]
    fn test_delete_unknown_asset_returns_none() {
        let (mut m, _) = manager();
        assert!(m.delete_asset(AssetId(5)).is_none());
    }

    #[test]
    fn test_apply_dispatches_completions() {
        let (mut m, _) = manager();
        let id = m.register_upload("clip.png");
        assert!(m.apply(Completion::Uploaded {
            id,
            dimensions: MediaDimensions::new(320, 240),
            preview: None,
        }));
        assert_eq!(status(&m, id), AssetStatus::Ready);

        m.begin_processing(id, SelectionRectangle::new(0, 0, 10, 10).unwrap()).unwrap();
        let completion = Completion::Processed {
            id,
            outcome: ProcessingOutcome::Failure("boom".into()),
        };
        assert_eq!(completion.asset_id(), id);
        assert!(m.apply(completion));
        assert_eq!(status(&m, id), AssetStatus::Failed);

        // Wrong-state upload result is dropped.
        assert!(!m.apply(Completion::UploadFailed { id, detail: "dup".into() }));
        assert_eq!(m.get(id).unwrap().error_detail.as_deref(), Some("boom"));
    }

    #[test]
    fn test_upload_for_deleted_asset_is_not_applied() {
        let (mut m, _) = manager();
        let id = m.register_upload("gone.png");
        m.delete_asset(id);

        let applied = m.apply(Completion::Uploaded {
            id,
            dimensions: MediaDimensions::new(16, 8),
            preview: Some(Preview {
                width: 16,
                height: 8,
                pixels: vec![0; 16 * 8 * 4],
            }),
        });
        assert!(!applied);
        assert!(m.get(id).is_none());
        assert!(!m.apply(Completion::UploadFailed { id, detail: "late".into() }));
    }

    #[test]
    fn test_subscribers_receive_snapshots() {
        let (mut m, _) = manager();
        let updates = m.subscribe();
        let id = m.register_upload("clip.png");
        m.upload_succeeded(id, MediaDimensions::new(10, 10)).unwrap();

        let snapshots: Vec<AssetSnapshot> = updates.try_iter().collect();
        assert_eq!(snapshots.len(), 2);
        assert_eq!(snapshots[0][0].status, AssetStatus::Uploading);
        assert_eq!(snapshots[1][0].status, AssetStatus::Ready);

        // Snapshots are detached from later changes.
        let held = m.list_assets();
        m.delete_asset(id);
        assert_eq!(held.len(), 1);
        assert!(m.list_assets().is_empty());
    }

    #[test]
    fn test_dropped_subscriber_is_pruned() {
        let (mut m, _) = manager();
        drop(m.subscribe());
        let kept = m.subscribe();
        m.register_upload("a");
        assert_eq!(m.subscribers.len(), 1);
        assert_eq!(kept.try_iter().count(), 1);
    }
}
