// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Main application state and egui App implementation.
//!
//! Owns the asset manager and the selection controller, drains collaborator
//! results once per frame and routes panel actions to the library.

use crate::ui::{assets, canvas, toolbar};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver};
use std::time::Duration;
use veil::config::Config;
use veil::io::local::{LocalCensor, LocalStore, LocalUploader};
use veil::io::media::SUPPORTED_EXTENSIONS;
use veil::lifecycle::{AssetManager, Completion, Preview};
use veil::models::asset::{AssetId, AssetSnapshot, AssetStatus};
use veil::selection::{SelectionController, SelectionEvent};
use veil::util::geometry::{ContainerBox, MediaDimensions};

/// Main application state.
pub struct VeilApp {
    /// Canonical asset collection
    manager: AssetManager,

    /// Latest snapshot published by the manager
    assets: AssetSnapshot,
    snapshots: Receiver<AssetSnapshot>,

    uploader: LocalUploader,
    /// Source paths shared with the local collaborators
    store: LocalStore,
    completions: Receiver<Completion>,

    /// Region selection for the active asset
    selector: SelectionController,

    /// Asset shown in the selector
    active_asset: Option<AssetId>,

    /// Last surface size handed to the selector
    container: Option<ContainerBox>,

    /// Preview textures by asset
    textures: HashMap<AssetId, egui::TextureHandle>,

    /// Last message for the status bar
    status_message: Option<String>,
}

impl VeilApp {
    pub fn new(config: Config) -> Self {
        let (sender, completions) = channel();
        let store = LocalStore::new();
        let censor = LocalCensor::new(store.clone(), sender.clone(), config.censor.clone());
        let mut manager = AssetManager::new(Box::new(censor));
        let snapshots = manager.subscribe();

        log::info!(
            "Censoring with {:?} into {}",
            config.censor.mode,
            config.censor.output_dir.display()
        );

        Self {
            assets: manager.list_assets(),
            manager,
            snapshots,
            uploader: LocalUploader::new(store.clone(), sender),
            store,
            completions,
            selector: SelectionController::new(),
            active_asset: None,
            container: None,
            textures: HashMap::new(),
            status_message: None,
        }
    }

    fn open_files(&mut self) {
        let Some(paths) = rfd::FileDialog::new()
            .add_filter("Images", SUPPORTED_EXTENSIONS)
            .pick_files()
        else {
            return;
        };

        for path in paths {
            self.upload(path);
        }
    }

    fn upload(&mut self, path: PathBuf) {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let id = self.manager.start_upload(&mut self.uploader, name, path);
        if self.active_asset.is_none() {
            self.activate(id);
        }
    }

    /// Make `id` the asset shown in the selector (dialog-open trigger).
    fn activate(&mut self, id: AssetId) {
        self.active_asset = Some(id);

        let Some(dims) = self.manager.get(id).and_then(|a| a.original_dimensions) else {
            // Nothing to map until the upload reports its size; the canvas
            // re-sends the surface size on the next frame.
            self.selector = SelectionController::new();
            self.container = None;
            return;
        };
        let result = match self.container {
            Some(container) => self.selector.open(dims, container),
            None => self.selector.media_metadata_available(dims),
        };
        if let Err(e) = result {
            log::debug!("Selector not ready for asset {}: {}", id, e);
        }
    }

    fn delete(&mut self, id: AssetId) {
        if self.manager.delete_asset(id).is_some() {
            self.textures.remove(&id);
            self.store.remove(id);
            if self.active_asset == Some(id) {
                self.active_asset = None;
                self.selector = SelectionController::new();
                self.container = None;
            }
            self.status_message = None;
        }
    }

    fn censor_selection(&mut self) {
        let Some(id) = self.active_asset else {
            return;
        };
        let region = match self.selector.confirm_selection() {
            Ok(region) => region,
            Err(e) => {
                self.status_message = Some(e.to_string());
                return;
            }
        };

        match self.manager.begin_processing(id, region) {
            Ok(()) => {
                self.selector.reset();
                self.status_message = Some(format!("Censoring region {} of asset {}", region, id));
            }
            Err(e) => {
                log::warn!("Rejected processing request: {}", e);
                self.status_message = Some(e.to_string());
            }
        }
    }

    fn can_censor(&self) -> bool {
        let status = self
            .active_asset
            .and_then(|id| self.manager.get(id))
            .map(|a| a.status);
        let accepts = matches!(
            status,
            Some(AssetStatus::Ready | AssetStatus::Processed | AssetStatus::Failed)
        );
        accepts && self.selector.confirm_selection().is_ok()
    }

    /// Apply finished background work to the manager.
    fn drain_completions(&mut self, ctx: &egui::Context) {
        while let Ok(mut completion) = self.completions.try_recv() {
            let id = completion.asset_id();
            let uploaded = match &mut completion {
                Completion::Uploaded { dimensions, preview, .. } => Some((*dimensions, preview.take())),
                _ => None,
            };

            if !self.manager.apply(completion) {
                // Late upload for a deleted asset; the worker may have
                // stored its source after `delete` ran.
                if uploaded.is_some() && self.manager.get(id).is_none() {
                    self.store.remove(id);
                }
                continue;
            }

            if let Some((dimensions, preview)) = uploaded {
                if let Some(preview) = preview {
                    self.install_texture(ctx, id, &preview);
                }
                if self.active_asset == Some(id) {
                    self.media_ready(dimensions);
                }
            }

            if let Some(asset) = self.manager.get(id) {
                if let Some(detail) = asset.error_detail.as_ref().filter(|_| asset.status == AssetStatus::Failed) {
                    self.status_message = Some(format!("{}: {}", asset.name, detail));
                }
            }
        }

        while let Ok(snapshot) = self.snapshots.try_recv() {
            self.assets = snapshot;
        }
    }

    fn media_ready(&mut self, dims: MediaDimensions) {
        if let Err(e) = self.selector.media_metadata_available(dims) {
            log::debug!("Selector not ready: {}", e);
        }
    }

    fn install_texture(&mut self, ctx: &egui::Context, id: AssetId, preview: &Preview) {
        let size = [preview.width as usize, preview.height as usize];
        let color_image = egui::ColorImage::from_rgba_unmultiplied(size, &preview.pixels);
        let texture = ctx.load_texture(format!("asset-{}", id.0), color_image, egui::TextureOptions::LINEAR);
        self.textures.insert(id, texture);
    }

    fn handle_keys(&mut self, ctx: &egui::Context) {
        if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            self.selector.reset();
        }

        if ctx.wants_keyboard_input() {
            return;
        }

        if ctx.input(|i| i.key_pressed(egui::Key::Enter)) && self.can_censor() {
            self.censor_selection();
        }

        if ctx.input(|i| i.key_pressed(egui::Key::Delete)) {
            if let Some(id) = self.active_asset {
                self.delete(id);
            }
        }
    }
}

impl eframe::App for VeilApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.drain_completions(ctx);

        // Keep polling while background work is outstanding
        if self.assets.iter().any(|a| a.status.is_busy()) {
            ctx.request_repaint_after(Duration::from_millis(100));
        }

        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Open Media...").clicked() {
                        self.open_files();
                        ui.close_menu();
                    }
                    ui.separator();
                    if ui.button("Quit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });
            });
        });

        let has_selection = self.selector.confirm_selection().is_ok();
        let can_censor = self.can_censor();
        let toolbar_action = egui::TopBottomPanel::top("toolbar")
            .show(ctx, |ui| toolbar::show(ui, has_selection, can_censor))
            .inner;
        match toolbar_action {
            toolbar::ToolbarAction::Open => self.open_files(),
            toolbar::ToolbarAction::Censor => self.censor_selection(),
            toolbar::ToolbarAction::ClearSelection => self.selector.reset(),
            toolbar::ToolbarAction::None => {}
        }

        let assets_action = egui::SidePanel::left("assets")
            .default_width(250.0)
            .show(ctx, |ui| assets::show(ui, &self.assets, self.active_asset))
            .inner;
        match assets_action {
            assets::AssetsAction::Activate(id) => self.activate(id),
            assets::AssetsAction::Delete(id) => self.delete(id),
            assets::AssetsAction::None => {}
        }

        self.handle_keys(ctx);

        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.horizontal(|ui| {
                match self.selector.confirm_selection() {
                    Ok(region) => ui.label(format!("Selection: {}", region)),
                    Err(_) => ui.label("No selection"),
                };
                if let Some(message) = &self.status_message {
                    ui.separator();
                    ui.label(message.as_str());
                }
            });
        });

        let texture = self.active_asset.and_then(|id| self.textures.get(&id));
        let event = egui::CentralPanel::default()
            .show(ctx, |ui| canvas::show(ui, texture, &mut self.selector, &mut self.container))
            .inner;

        match event {
            SelectionEvent::Completed(region) => {
                self.status_message = Some(format!("Selected {}x{} px", region.width(), region.height()));
            }
            SelectionEvent::Cancelled => self.status_message = None,
            _ => {}
        }
    }
}
