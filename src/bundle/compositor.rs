//! Layer placement and compositing.
//!
//! Each layer is scaled relative to its asset's pixel size, centered on the
//! canvas, shifted by its translation, and cropped to the canvas bounds.
//! Layers that end up with no visible area are skipped.

use std::path::Path;

use image::RgbaImage;
use image::imageops;

use super::manifest::{Layer, Manifest, Position};
use crate::error::{IconError, Result};
use crate::imaging::{load_rgba, resize_contain};
use crate::svg::composite_over;

// ============================================================================
// Placement
// ============================================================================

/// Where a layer lands on the canvas and which part of it is visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    /// Size of the layer after scaling.
    pub scaled_width: u32,
    pub scaled_height: u32,
    /// Top-left of the visible region inside the scaled layer.
    pub crop_x: u32,
    pub crop_y: u32,
    /// Size of the visible region.
    pub visible_width: u32,
    pub visible_height: u32,
    /// Canvas position of the visible region, clamped to the canvas.
    pub left: u32,
    pub top: u32,
}

impl Placement {
    /// Returns true if part of the scaled layer falls outside the canvas.
    pub fn is_cropped(&self) -> bool {
        self.visible_width != self.scaled_width || self.visible_height != self.scaled_height
    }
}

/// Largest edge, in pixels, a layer may have after scaling.
pub const MAX_LAYER_DIMENSION: u32 = 8192;

/// Computes where an asset of `width x height` lands on a square canvas.
///
/// Returns `Ok(None)` when no part of the scaled layer is visible, including
/// when the scale or translation is not finite. A visible layer whose scaled
/// size exceeds [`MAX_LAYER_DIMENSION`] is a format error.
pub fn compute_placement(
    width: u32,
    height: u32,
    position: &Position,
    canvas_size: u32,
) -> Result<Option<Placement>> {
    let canvas = f64::from(canvas_size);
    let scaled_w = (f64::from(width) * position.scale).round();
    let scaled_h = (f64::from(height) * position.scale).round();
    let [dx, dy] = position.translation;

    let left = ((canvas - scaled_w) / 2.0 + dx).round();
    let top = ((canvas - scaled_h) / 2.0 + dy).round();

    // NaN fails every comparison, so non-finite input lands here too.
    let overlaps =
        |start: f64, extent: f64| extent > 0.0 && start < canvas && start + extent > 0.0;
    if !(overlaps(left, scaled_w) && overlaps(top, scaled_h)) {
        return Ok(None);
    }

    let limit = f64::from(MAX_LAYER_DIMENSION);
    if scaled_w > limit || scaled_h > limit {
        return Err(IconError::format(format!(
            "Layer scales to {scaled_w}x{scaled_h} pixels, above the {MAX_LAYER_DIMENSION}px limit"
        )));
    }

    // Both extents are in 1..=limit and both origins within one extent of
    // the canvas, so the integer math below cannot overflow.
    let canvas = i64::from(canvas_size);
    let (scaled_w, scaled_h) = (scaled_w as i64, scaled_h as i64);
    let (left, top) = (left as i64, top as i64);

    let crop_x = (-left).max(0);
    let crop_y = (-top).max(0);
    let visible_w = scaled_w.min(canvas - left) - crop_x;
    let visible_h = scaled_h.min(canvas - top) - crop_y;

    Ok(Some(Placement {
        scaled_width: scaled_w as u32,
        scaled_height: scaled_h as u32,
        crop_x: crop_x as u32,
        crop_y: crop_y as u32,
        visible_width: visible_w as u32,
        visible_height: visible_h as u32,
        left: left.max(0) as u32,
        top: top.max(0) as u32,
    }))
}

// ============================================================================
// Layer preparation
// ============================================================================

/// A layer resized and cropped, ready to be drawn at (`left`, `top`).
#[derive(Debug, Clone)]
pub struct PlacedLayer {
    pub name: String,
    pub image: RgbaImage,
    pub left: u32,
    pub top: u32,
}

/// Loads, scales, and crops one layer.
///
/// Returns `Ok(None)` for layers with no visible area. Layers too large to
/// scale are rejected before any pixels are allocated.
pub fn place_layer(layer: &Layer, assets_dir: &Path, canvas_size: u32) -> Result<Option<PlacedLayer>> {
    let image_path = assets_dir.join(&layer.image_name);
    if !image_path.is_file() {
        return Err(IconError::not_found(format!(
            "Layer image not found: {}",
            image_path.display()
        )));
    }

    let (width, height) = image::image_dimensions(&image_path).map_err(|e| {
        IconError::format(format!(
            "Cannot read dimensions of layer: {} ({e})",
            layer.image_name
        ))
    })?;

    let placement = compute_placement(width, height, &layer.position, canvas_size).map_err(|e| {
        IconError::format(format!("{e} (layer '{}')", layer.name))
    })?;
    let Some(placement) = placement else {
        log::debug!("layer '{}' lies entirely off-canvas, skipping", layer.name);
        return Ok(None);
    };

    let source = load_rgba(&image_path)?;
    let scaled = resize_contain(&source, placement.scaled_width, placement.scaled_height);

    let image = if placement.is_cropped() {
        imageops::crop_imm(
            &scaled,
            placement.crop_x,
            placement.crop_y,
            placement.visible_width,
            placement.visible_height,
        )
        .to_image()
    } else {
        scaled
    };

    log::debug!(
        "layer '{}': {}x{} -> {}x{} at ({}, {})",
        layer.name,
        width,
        height,
        image.width(),
        image.height(),
        placement.left,
        placement.top
    );

    Ok(Some(PlacedLayer {
        name: layer.name.clone(),
        image,
        left: placement.left,
        top: placement.top,
    }))
}

/// Prepares every layer of `manifest` in draw order.
///
/// Fails on the first missing or unreadable asset.
pub fn prepare_layers(manifest: &Manifest, assets_dir: &Path, canvas_size: u32) -> Result<Vec<PlacedLayer>> {
    let mut placed = Vec::new();
    for layer in manifest.layers() {
        if let Some(p) = place_layer(layer, assets_dir, canvas_size)? {
            placed.push(p);
        }
    }
    Ok(placed)
}

/// Draws prepared layers over `canvas`, later layers on top.
pub fn composite_layers(canvas: &mut RgbaImage, layers: &[PlacedLayer]) {
    for layer in layers {
        composite_over(canvas, &layer.image, layer.left, layer.top);
    }
}

// ============================================================================
// Tests
// ============================================================================
