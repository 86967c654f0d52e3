// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Region selector surface.
//!
//! Draws the active asset aspect-fitted into the available space and feeds
//! drag gestures to the [`SelectionController`]. The surface size is passed
//! to the controller only when it actually changes.

use veil::selection::{DisplayRect, SelectionController, SelectionEvent};
use veil::util::geometry::{ContainerBox, DisplayMapping, Point};

const LIVE_COLOR: egui::Color32 = egui::Color32::LIGHT_BLUE;
const SELECTED_COLOR: egui::Color32 = egui::Color32::from_rgb(255, 80, 80);

/// Display the selector surface and handle pointer interaction.
pub fn show(
    ui: &mut egui::Ui,
    texture: Option<&egui::TextureHandle>,
    selector: &mut SelectionController,
    last_container: &mut Option<ContainerBox>,
) -> SelectionEvent {
    ui.style_mut().visuals.extreme_bg_color = egui::Color32::from_gray(40);
    let available_size = ui.available_size();

    egui::Frame::canvas(ui.style())
        .show(ui, |ui| {
            ui.set_min_size(available_size);
            let (surface, response) = ui.allocate_exact_size(ui.available_size(), egui::Sense::drag());

            let container = ContainerBox::new(surface.width() as f64, surface.height() as f64);
            if *last_container != Some(container) {
                *last_container = Some(container);
                if let Err(e) = selector.container_resized(container) {
                    log::debug!("Selector surface not ready: {}", e);
                }
            }

            let Some(texture) = texture else {
                draw_placeholder(ui, surface, "Open an image to begin selecting regions");
                return SelectionEvent::Ignored;
            };
            let Some(mapping) = selector.mapping().copied() else {
                draw_placeholder(ui, surface, "Waiting for media...");
                return SelectionEvent::Ignored;
            };

            let image_rect = egui::Rect::from_min_size(
                surface.min + egui::vec2(mapping.offset_x as f32, mapping.offset_y as f32),
                egui::vec2(mapping.displayed_width as f32, mapping.displayed_height as f32),
            );
            ui.painter().image(
                texture.id(),
                image_rect,
                egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                egui::Color32::WHITE,
            );

            let event = handle_pointer(ui, &response, surface, selector);

            let painter = ui.painter();
            if let Some(rect) = selector.live_rect() {
                draw_rect(painter, surface, &mapping, rect, LIVE_COLOR);
            }
            if let (Some(rect), Ok(region)) = (selector.selected_display_rect(), selector.confirm_selection()) {
                let screen = draw_rect(painter, surface, &mapping, rect, SELECTED_COLOR);
                painter.text(
                    screen.left_top() - egui::vec2(0.0, 4.0),
                    egui::Align2::LEFT_BOTTOM,
                    format!("{}x{} px", region.width(), region.height()),
                    egui::FontId::proportional(12.0),
                    egui::Color32::WHITE,
                );
            }

            event
        })
        .inner
}

/// Translate egui drag callbacks into controller pointer events.
fn handle_pointer(
    ui: &egui::Ui,
    response: &egui::Response,
    surface: egui::Rect,
    selector: &mut SelectionController,
) -> SelectionEvent {
    let to_surface = |pos: egui::Pos2| Point::new((pos.x - surface.min.x) as f64, (pos.y - surface.min.y) as f64);

    if response.drag_started() {
        let origin = ui
            .input(|i| i.pointer.press_origin())
            .or(response.interact_pointer_pos());
        if let Some(pos) = origin {
            selector.pointer_down(to_surface(pos));
        }
    }

    if response.drag_stopped() {
        let release = response
            .interact_pointer_pos()
            .or_else(|| ui.input(|i| i.pointer.latest_pos()));
        return match release {
            Some(pos) => selector.pointer_up(to_surface(pos)),
            None => selector.pointer_leave(),
        };
    }

    if response.dragged() {
        if let Some(pos) = response.interact_pointer_pos() {
            if surface.contains(pos) {
                return selector.pointer_move(to_surface(pos));
            }
            return selector.pointer_leave();
        }
    }

    SelectionEvent::Ignored
}

/// Draw a displayed-space rectangle and return its screen rect.
fn draw_rect(
    painter: &egui::Painter,
    surface: egui::Rect,
    mapping: &DisplayMapping,
    rect: DisplayRect,
    color: egui::Color32,
) -> egui::Rect {
    let origin = mapping.displayed_to_surface(rect.min);
    let screen = egui::Rect::from_min_size(
        surface.min + egui::vec2(origin.x as f32, origin.y as f32),
        egui::vec2(rect.width() as f32, rect.height() as f32),
    );
    painter.rect_filled(screen, 0.0, color.gamma_multiply(0.15));
    painter.rect_stroke(screen, 0.0, egui::Stroke::new(2.0, color));
    screen
}

fn draw_placeholder(ui: &egui::Ui, surface: egui::Rect, message: &str) {
    ui.painter().text(
        surface.center(),
        egui::Align2::CENTER_CENTER,
        message,
        egui::FontId::proportional(16.0),
        egui::Color32::from_gray(180),
    );
}
