// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Media file loading and region censoring.
//!
//! Still images only. Frames are decoded to RGBA8 so they can be shown in
//! egui and edited in place.

use crate::lifecycle::Preview;
use crate::models::region::SelectionRectangle;
use crate::util::geometry::MediaDimensions;
use anyhow::{Context, Result};
use image::{Rgba, RgbaImage};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// File extensions offered in the open dialog.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tiff", "tif", "webp"];

/// How a selected region is obscured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CensorMode {
    /// Fill the region with opaque black.
    #[default]
    Blackout,
    /// Replace each block with its average color.
    Pixelate,
}

/// Decode an image file into RGBA preview pixels.
pub fn load_image(path: &Path) -> Result<Preview> {
    let rgba = image::open(path)
        .with_context(|| format!("Failed to open image {}", path.display()))?
        .to_rgba8();
    let (width, height) = rgba.dimensions();
    log::info!("Loaded {}x{} image from {}", width, height, path.display());
    Ok(Preview {
        width,
        height,
        pixels: rgba.into_raw(),
    })
}

/// Obscure `region` of `img` in place. The region is clamped to the image.
pub fn censor_region(img: &mut RgbaImage, region: SelectionRectangle, mode: CensorMode, block_size: u32) {
    let Some(region) = region.clamped_to(MediaDimensions::new(img.width(), img.height())) else {
        return;
    };
    // Clamped coordinates are within 0..=u32 image bounds.
    let (x1, y1, x2, y2) = (
        region.x1() as u32,
        region.y1() as u32,
        region.x2() as u32,
        region.y2() as u32,
    );

    match mode {
        CensorMode::Blackout => {
            for y in y1..y2 {
                for x in x1..x2 {
                    img.put_pixel(x, y, Rgba([0, 0, 0, 255]));
                }
            }
        }
        CensorMode::Pixelate => {
            let block = block_size.max(1);
            let mut by = y1;
            while by < y2 {
                let bh = block.min(y2 - by);
                let mut bx = x1;
                while bx < x2 {
                    let bw = block.min(x2 - bx);
                    fill_block_average(img, bx, by, bw, bh);
                    bx += bw;
                }
                by += bh;
            }
        }
    }
}

fn fill_block_average(img: &mut RgbaImage, x0: u32, y0: u32, w: u32, h: u32) {
    let mut sum = [0u64; 4];
    for y in y0..y0 + h {
        for x in x0..x0 + w {
            let p = img.get_pixel(x, y);
            for (acc, channel) in sum.iter_mut().zip(p.0) {
                *acc += channel as u64;
            }
        }
    }
    let count = (w as u64 * h as u64).max(1);
    let avg = Rgba(sum.map(|s| (s / count) as u8));
    for y in y0..y0 + h {
        for x in x0..x0 + w {
            img.put_pixel(x, y, avg);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_fn(width, height, |x, y| {
            if (x + y) % 2 == 0 {
                Rgba([255, 255, 255, 255])
            } else {
                Rgba([0, 0, 0, 255])
            }
        })
    }

    #[test]
    fn test_blackout_only_touches_region() {
        let mut img = RgbaImage::from_pixel(8, 8, Rgba([200, 100, 50, 255]));
        let region = SelectionRectangle::new(2, 3, 5, 6).unwrap();
        censor_region(&mut img, region, CensorMode::Blackout, 4);

        for (x, y, p) in img.enumerate_pixels() {
            let inside = (2..5).contains(&x) && (3..6).contains(&y);
            if inside {
                assert_eq!(*p, Rgba([0, 0, 0, 255]), "({x}, {y})");
            } else {
                assert_eq!(*p, Rgba([200, 100, 50, 255]), "({x}, {y})");
            }
        }
    }

    #[test]
    fn test_pixelate_averages_blocks() {
        let mut img = checker(4, 4);
        let region = SelectionRectangle::new(0, 0, 4, 4).unwrap();
        censor_region(&mut img, region, CensorMode::Pixelate, 2);
        // Every 2x2 block of the checkerboard averages to mid grey.
        for p in img.pixels() {
            assert_eq!(*p, Rgba([127, 127, 127, 255]));
        }
    }

    #[test]
    fn test_pixelate_handles_partial_blocks() {
        let mut img = RgbaImage::from_pixel(5, 5, Rgba([10, 20, 30, 255]));
        let region = SelectionRectangle::new(0, 0, 5, 5).unwrap();
        censor_region(&mut img, region, CensorMode::Pixelate, 3);
        // Uniform input stays uniform regardless of block edges.
        assert!(img.pixels().all(|p| *p == Rgba([10, 20, 30, 255])));
    }

    #[test]
    fn test_region_outside_image_is_clamped() {
        let mut img = RgbaImage::from_pixel(4, 4, Rgba([255, 255, 255, 255]));
        let region = SelectionRectangle::new(-10, -10, 2, 2).unwrap();
        censor_region(&mut img, region, CensorMode::Blackout, 1);
        assert_eq!(*img.get_pixel(1, 1), Rgba([0, 0, 0, 255]));
        assert_eq!(*img.get_pixel(2, 2), Rgba([255, 255, 255, 255]));

        let far = SelectionRectangle::new(10, 10, 20, 20).unwrap();
        censor_region(&mut img, far, CensorMode::Blackout, 1);
        assert_eq!(*img.get_pixel(3, 3), Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn test_load_missing_file_reports_path() {
        let err = load_image(Path::new("/nonexistent/frame.png")).unwrap_err();
        assert!(format!("{:#}", err).contains("frame.png"));
    }
}
