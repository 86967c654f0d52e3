// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Drag-to-select region controller.
//!
//! Turns pointer gestures on an aspect-fitted preview into a rectangle in
//! original media pixels. The controller is pure state: it never performs
//! I/O and only hands validated rectangles back to its caller.
//!
//! The display mapping is recomputed only on three named triggers:
//! [`SelectionController::open`], [`SelectionController::container_resized`]
//! and [`SelectionController::media_metadata_available`].

use crate::error::{GeometryError, SelectionError};
use crate::models::region::SelectionRectangle;
use crate::util::geometry::{
    compute_display_mapping, to_displayed_space, to_original_space, ContainerBox, DisplayMapping,
    MediaDimensions, Point,
};

/// Gesture state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SelectionState {
    Idle,
    /// Pointer is held down. Positions are surface-relative, unclamped.
    Dragging { start: Point, end: Point },
    /// A gesture finished with a valid rectangle in original space.
    Selected(SelectionRectangle),
}

/// What a pointer event did to the controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SelectionEvent {
    Started,
    Dragging,
    Completed(SelectionRectangle),
    /// The drag collapsed to zero area and was discarded.
    Cancelled,
    /// The event does not apply in the current state.
    Ignored,
}

/// Axis-aligned rectangle in displayed space, for rendering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayRect {
    pub min: Point,
    pub max: Point,
}

impl DisplayRect {
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }
}

#[derive(Debug, Clone)]
pub struct SelectionController {
    state: SelectionState,
    media: Option<MediaDimensions>,
    container: Option<ContainerBox>,
    mapping: Option<DisplayMapping>,
}

impl Default for SelectionController {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectionController {
    pub fn new() -> Self {
        Self {
            state: SelectionState::Idle,
            media: None,
            container: None,
            mapping: None,
        }
    }

    pub fn state(&self) -> SelectionState {
        self.state
    }

    pub fn mapping(&self) -> Option<&DisplayMapping> {
        self.mapping.as_ref()
    }

    pub fn media(&self) -> Option<MediaDimensions> {
        self.media
    }

    /// Dialog-open trigger: start a fresh session for `media` in `container`.
    pub fn open(&mut self, media: MediaDimensions, container: ContainerBox) -> Result<(), GeometryError> {
        self.state = SelectionState::Idle;
        self.media = Some(media);
        self.container = Some(container);
        self.recompute()
    }

    /// Layout trigger: the rendering surface changed size.
    pub fn container_resized(&mut self, container: ContainerBox) -> Result<(), GeometryError> {
        self.container = Some(container);
        self.recompute()
    }

    /// Metadata trigger: the intrinsic media size became known or changed.
    pub fn media_metadata_available(&mut self, media: MediaDimensions) -> Result<(), GeometryError> {
        self.media = Some(media);
        self.recompute()
    }

    fn recompute(&mut self) -> Result<(), GeometryError> {
        let (Some(media), Some(container)) = (self.media, self.container) else {
            self.mapping = None;
            return Ok(());
        };

        match compute_display_mapping(media, container) {
            Ok(mapping) => {
                let bars = match (mapping.is_letterboxed(), mapping.is_pillarboxed()) {
                    (true, _) => "letterbox",
                    (_, true) => "pillarbox",
                    _ => "none",
                };
                log::debug!(
                    "Display mapping {:.1}x{:.1} at ({:.1}, {:.1}), bars: {}",
                    mapping.displayed_width,
                    mapping.displayed_height,
                    mapping.offset_x,
                    mapping.offset_y,
                    bars
                );
                self.mapping = Some(mapping);
                Ok(())
            }
            Err(e) => {
                log::warn!("Cannot map media into container: {}", e);
                self.mapping = None;
                if matches!(self.state, SelectionState::Dragging { .. }) {
                    self.state = SelectionState::Idle;
                }
                Err(e)
            }
        }
    }

    /// Begin a drag at a surface-relative position.
    pub fn pointer_down(&mut self, point: Point) -> SelectionEvent {
        if self.mapping.is_none() {
            return SelectionEvent::Ignored;
        }
        self.state = SelectionState::Dragging { start: point, end: point };
        SelectionEvent::Started
    }

    pub fn pointer_move(&mut self, point: Point) -> SelectionEvent {
        match &mut self.state {
            SelectionState::Dragging { end, .. } => {
                *end = point;
                SelectionEvent::Dragging
            }
            _ => SelectionEvent::Ignored,
        }
    }

    /// Release the pointer at a surface-relative position.
    pub fn pointer_up(&mut self, point: Point) -> SelectionEvent {
        match self.state {
            SelectionState::Dragging { start, .. } => self.finish(start, point),
            _ => SelectionEvent::Ignored,
        }
    }

    /// The pointer left the surface; finishes the drag at its last position.
    pub fn pointer_leave(&mut self) -> SelectionEvent {
        match self.state {
            SelectionState::Dragging { start, end } => self.finish(start, end),
            _ => SelectionEvent::Ignored,
        }
    }

    /// Return to `Idle`, dropping any drag or selection.
    pub fn reset(&mut self) {
        self.state = SelectionState::Idle;
    }

    fn finish(&mut self, start: Point, end: Point) -> SelectionEvent {
        self.state = SelectionState::Idle;

        let (Some(mapping), Some(media)) = (self.mapping, self.media) else {
            return SelectionEvent::Cancelled;
        };

        let rect = clamp_and_order(&mapping, start, end);
        if rect.min.x >= rect.max.x || rect.min.y >= rect.max.y {
            log::debug!("Discarding zero-area drag");
            return SelectionEvent::Cancelled;
        }

        let min = to_original_space(rect.min, &mapping, media);
        let max = to_original_space(rect.max, &mapping, media);
        match SelectionRectangle::from_corners(min, max) {
            Some(region) => {
                log::info!("Selected region {}", region);
                self.state = SelectionState::Selected(region);
                SelectionEvent::Completed(region)
            }
            None => {
                log::debug!("Discarding drag that rounds to zero area in original space");
                SelectionEvent::Cancelled
            }
        }
    }

    /// Return the selection clamped to the current media bounds.
    pub fn confirm_selection(&self) -> Result<SelectionRectangle, SelectionError> {
        let SelectionState::Selected(region) = self.state else {
            return Err(SelectionError::NoSelection);
        };
        let media = self.media.ok_or(SelectionError::NoSelection)?;
        region.clamped_to(media).ok_or(SelectionError::NoSelection)
    }

    /// The in-progress drag, normalized and clamped in displayed space.
    pub fn live_rect(&self) -> Option<DisplayRect> {
        let SelectionState::Dragging { start, end } = self.state else {
            return None;
        };
        let mapping = self.mapping?;
        Some(clamp_and_order(&mapping, start, end))
    }

    /// The finished selection scaled back into displayed space.
    pub fn selected_display_rect(&self) -> Option<DisplayRect> {
        let SelectionState::Selected(region) = self.state else {
            return None;
        };
        let mapping = self.mapping?;
        let media = self.media?;
        Some(DisplayRect {
            min: to_displayed_space(region.min(), &mapping, media),
            max: to_displayed_space(region.max(), &mapping, media),
        })
    }
}

/// Clamp both surface points into the displayed media and order them.
fn clamp_and_order(mapping: &DisplayMapping, start: Point, end: Point) -> DisplayRect {
    let (w, h) = (mapping.displayed_width, mapping.displayed_height);
    let a = mapping.surface_to_displayed(start).clamp_to(w, h);
    let b = mapping.surface_to_displayed(end).clamp_to(w, h);
    DisplayRect {
        min: Point::new(a.x.min(b.x), a.y.min(b.y)),
        max: Point::new(a.x.max(b.x), a.y.max(b.y)),
    }
}
