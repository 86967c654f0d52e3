// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Aspect-fit geometry and coordinate transforms.
//!
//! Media is rendered into a container of arbitrary size while keeping its
//! aspect ratio, which leaves bars either above/below (letterbox) or
//! left/right (pillarbox). This module computes where the visible pixels sit
//! and converts between the displayed rectangle and original media pixels.

use crate::error::GeometryError;
use serde::{Deserialize, Serialize};

/// A point in surface or displayed space (fractional screen pixels).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Clamp both coordinates into `[0, max_x] x [0, max_y]`.
    pub fn clamp_to(self, max_x: f64, max_y: f64) -> Self {
        Self {
            x: self.x.clamp(0.0, max_x),
            y: self.y.clamp(0.0, max_y),
        }
    }
}

/// A point in original media space. Not clamped, so it may fall outside
/// the media when derived from a drag past the visible area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PixelPoint {
    pub x: i64,
    pub y: i64,
}

impl PixelPoint {
    pub fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }
}

/// Intrinsic pixel size of a media file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MediaDimensions {
    pub width: u32,
    pub height: u32,
}

impl MediaDimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn aspect_ratio(&self) -> f64 {
        self.width as f64 / self.height as f64
    }
}

/// On-screen size of the surface the media is rendered into.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContainerBox {
    pub width: f64,
    pub height: f64,
}

impl ContainerBox {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    fn has_area(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// Placement of the visible media inside its container.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayMapping {
    pub displayed_width: f64,
    pub displayed_height: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl DisplayMapping {
    /// Convert a surface-relative position into displayed space.
    pub fn surface_to_displayed(&self, point: Point) -> Point {
        Point::new(point.x - self.offset_x, point.y - self.offset_y)
    }

    /// Convert a displayed-space position back onto the surface.
    pub fn displayed_to_surface(&self, point: Point) -> Point {
        Point::new(point.x + self.offset_x, point.y + self.offset_y)
    }

    /// True if the media fills the full container height (bars left/right).
    pub fn is_pillarboxed(&self) -> bool {
        self.offset_x > 0.0
    }

    /// True if the media fills the full container width (bars top/bottom).
    pub fn is_letterboxed(&self) -> bool {
        self.offset_y > 0.0
    }
}

/// Fit `media` into `container` preserving aspect ratio and centering it.
///
/// Media relatively wider than the container spans the full width and is
/// letterboxed; otherwise it spans the full height and is pillarboxed.
/// Equal aspect ratios take the second branch and produce zero offsets.
pub fn compute_display_mapping(
    media: MediaDimensions,
    container: ContainerBox,
) -> Result<DisplayMapping, GeometryError> {
    if media.width == 0 || media.height == 0 {
        return Err(GeometryError::EmptyMedia {
            width: media.width,
            height: media.height,
        });
    }
    if !container.has_area() {
        return Err(GeometryError::DegenerateContainer {
            width: container.width,
            height: container.height,
        });
    }

    let media_aspect = media.aspect_ratio();
    let container_aspect = container.width / container.height;

    let mapping = if media_aspect > container_aspect {
        let displayed_height = container.width / media_aspect;
        DisplayMapping {
            displayed_width: container.width,
            displayed_height,
            offset_x: 0.0,
            offset_y: (container.height - displayed_height) / 2.0,
        }
    } else {
        let displayed_width = container.height * media_aspect;
        DisplayMapping {
            displayed_width,
            displayed_height: container.height,
            offset_x: (container.width - displayed_width) / 2.0,
            offset_y: 0.0,
        }
    };

    Ok(mapping)
}

/// Scale a displayed-space point (offsets already removed) to original
/// media pixels, rounding to the nearest integer. No clamping.
pub fn to_original_space(point: Point, mapping: &DisplayMapping, media: MediaDimensions) -> PixelPoint {
    let scale_x = media.width as f64 / mapping.displayed_width;
    let scale_y = media.height as f64 / mapping.displayed_height;
    PixelPoint {
        x: (point.x * scale_x).round() as i64,
        y: (point.y * scale_y).round() as i64,
    }
}

/// Inverse of [`to_original_space`], without rounding.
pub fn to_displayed_space(pixel: PixelPoint, mapping: &DisplayMapping, media: MediaDimensions) -> Point {
    let scale_x = mapping.displayed_width / media.width as f64;
    let scale_y = mapping.displayed_height / media.height as f64;
    Point {
        x: pixel.x as f64 * scale_x,
        y: pixel.y as f64 * scale_y,
    }
}
