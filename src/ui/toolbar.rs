// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Toolbar with the selection and processing commands.

/// Command chosen from the toolbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolbarAction {
    None,
    Open,
    Censor,
    ClearSelection,
}

/// Display the toolbar. `can_censor` is true when a region is selected and
/// the active asset accepts a new processing request.
pub fn show(ui: &mut egui::Ui, has_selection: bool, can_censor: bool) -> ToolbarAction {
    let mut action = ToolbarAction::None;

    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 8.0;

        if ui.button("📂 Open...").clicked() {
            action = ToolbarAction::Open;
        }

        ui.separator();

        if ui
            .add_enabled(can_censor, egui::Button::new("▇ Censor region (Enter)"))
            .clicked()
        {
            action = ToolbarAction::Censor;
        }

        if ui
            .add_enabled(has_selection, egui::Button::new("✖ Clear selection (Esc)"))
            .clicked()
        {
            action = ToolbarAction::ClearSelection;
        }

        ui.separator();

        let hint = if has_selection {
            "Drag again to replace the selection, or censor it"
        } else {
            "Drag over the preview to select a region"
        };
        ui.label(egui::RichText::new(hint).italics().weak());
    });

    action
}
