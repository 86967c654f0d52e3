// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Asset list panel.
//!
//! Read-only view of the manager's latest snapshot. Clicks are returned as
//! actions; the panel never changes asset state itself.

use veil::models::asset::{AssetId, AssetStatus, MediaAsset};

/// Result of asset panel interaction.
pub enum AssetsAction {
    None,
    Activate(AssetId),
    Delete(AssetId),
}

fn status_color(status: AssetStatus) -> egui::Color32 {
    match status {
        AssetStatus::Uploading | AssetStatus::Processing => egui::Color32::LIGHT_BLUE,
        AssetStatus::Ready => egui::Color32::from_gray(200),
        AssetStatus::Processed => egui::Color32::LIGHT_GREEN,
        AssetStatus::Failed => egui::Color32::LIGHT_RED,
    }
}

/// Display the asset list.
pub fn show(ui: &mut egui::Ui, assets: &[MediaAsset], active: Option<AssetId>) -> AssetsAction {
    let mut action = AssetsAction::None;

    ui.heading("Assets");
    ui.separator();

    if assets.is_empty() {
        ui.label(egui::RichText::new("No media yet").weak());
        return action;
    }

    egui::ScrollArea::vertical().show(ui, |ui| {
        for asset in assets {
            ui.horizontal(|ui| {
                if ui
                    .selectable_label(active == Some(asset.id), asset.name.as_str())
                    .clicked()
                {
                    action = AssetsAction::Activate(asset.id);
                }
                if ui.small_button("🗑").on_hover_text("Delete").clicked() {
                    action = AssetsAction::Delete(asset.id);
                }
            });

            ui.horizontal(|ui| {
                if asset.status.is_busy() {
                    ui.spinner();
                }
                ui.label(
                    egui::RichText::new(asset.status.label())
                        .small()
                        .color(status_color(asset.status)),
                );
                if let Some(dims) = asset.original_dimensions {
                    ui.label(egui::RichText::new(format!("{}x{}", dims.width, dims.height)).small().weak());
                }
            });

            if let Some(reference) = &asset.processed_reference {
                ui.label(egui::RichText::new(format!("→ {}", reference)).small().weak());
            }
            if let Some(detail) = &asset.error_detail {
                ui.label(
                    egui::RichText::new(detail)
                        .small()
                        .color(egui::Color32::LIGHT_RED),
                );
            }

            ui.separator();
        }
    });

    action
}
