// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Validated selection rectangles.

use crate::util::geometry::{MediaDimensions, PixelPoint};
use serde::{Deserialize, Serialize};
use std::fmt;

/// An axis-aligned rectangle in original media pixels.
///
/// Construction guarantees `x1 < x2` and `y1 < y2`; a rectangle that would
/// violate this is never created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct SelectionRectangle {
    x1: i64,
    y1: i64,
    x2: i64,
    y2: i64,
}

impl SelectionRectangle {
    /// Build a rectangle from ordered corners, or `None` if it has no area.
    pub fn new(x1: i64, y1: i64, x2: i64, y2: i64) -> Option<Self> {
        (x1 < x2 && y1 < y2).then_some(Self { x1, y1, x2, y2 })
    }

    /// Build a rectangle from two ordered corner points.
    pub fn from_corners(min: PixelPoint, max: PixelPoint) -> Option<Self> {
        Self::new(min.x, min.y, max.x, max.y)
    }

    pub fn x1(&self) -> i64 {
        self.x1
    }

    pub fn y1(&self) -> i64 {
        self.y1
    }

    pub fn x2(&self) -> i64 {
        self.x2
    }

    pub fn y2(&self) -> i64 {
        self.y2
    }

    pub fn width(&self) -> i64 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> i64 {
        self.y2 - self.y1
    }

    pub fn min(&self) -> PixelPoint {
        PixelPoint::new(self.x1, self.y1)
    }

    pub fn max(&self) -> PixelPoint {
        PixelPoint::new(self.x2, self.y2)
    }

    /// True if the whole rectangle lies inside the media frame.
    pub fn fits_within(&self, dimensions: MediaDimensions) -> bool {
        self.x1 >= 0
            && self.y1 >= 0
            && self.x2 <= dimensions.width as i64
            && self.y2 <= dimensions.height as i64
    }

    /// Clamp both corners into the media frame. Returns `None` if the
    /// clamped rectangle has collapsed.
    pub fn clamped_to(&self, dimensions: MediaDimensions) -> Option<Self> {
        let w = dimensions.width as i64;
        let h = dimensions.height as i64;
        Self::new(
            self.x1.clamp(0, w),
            self.y1.clamp(0, h),
            self.x2.clamp(0, w),
            self.y2.clamp(0, h),
        )
    }
}

impl fmt::Display for SelectionRectangle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})-({}, {})", self.x1, self.y1, self.x2, self.y2)
    }
}

#[derive(Deserialize)]
struct RawRectangle {
    x1: i64,
    y1: i64,
    x2: i64,
    y2: i64,
}

// Deserialization goes through `new` so invalid rectangles are rejected.
impl<'de> Deserialize<'de> for SelectionRectangle {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = RawRectangle::deserialize(deserializer)?;
        SelectionRectangle::new(raw.x1, raw.y1, raw.x2, raw.y2).ok_or_else(|| {
            serde::de::Error::custom(format!(
                "rectangle ({}, {})-({}, {}) has no area",
                raw.x1, raw.y1, raw.x2, raw.y2
            ))
        })
    }
}
