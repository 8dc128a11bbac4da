//! Rasterization and compositing helpers built on resvg/tiny-skia.
//!
//! Banner ribbons are described as SVG markup and rasterized here; the
//! resulting RGBA buffers (and decoded layer assets) are blended onto canvases
//! with [`composite_over`].

use std::sync::{Arc, OnceLock};

use image::{Rgba, RgbaImage};
use resvg::tiny_skia::{Pixmap, Transform};
use resvg::usvg::{Options, Tree, fontdb};

use crate::error::{IconError, Result};

// ============================================================================
// SVG Rendering
// ============================================================================

/// System fonts, loaded once per process. Banner labels need a bold sans-serif.
fn font_database() -> Arc<fontdb::Database> {
    static FONTS: OnceLock<Arc<fontdb::Database>> = OnceLock::new();
    FONTS
        .get_or_init(|| {
            let mut db = fontdb::Database::new();
            db.load_system_fonts();
            log::debug!("loaded {} font faces for SVG text", db.len());
            Arc::new(db)
        })
        .clone()
}

/// Renders SVG markup to an RGBA image that fits within `size x size`.
///
/// The larger SVG dimension is scaled to `size`; aspect ratio is preserved.
pub fn render_svg(svg_data: &str, size: u32) -> Result<RgbaImage> {
    let mut opts = Options::default();
    opts.fontdb = font_database();

    let tree = Tree::from_str(svg_data, &opts)
        .map_err(|e| IconError::format(format!("Failed to parse SVG: {e}")))?;

    let svg_size = tree.size();
    let scale = size as f32 / svg_size.width().max(svg_size.height());
    let width = (svg_size.width() * scale).ceil() as u32;
    let height = (svg_size.height() * scale).ceil() as u32;

    let mut pixmap = Pixmap::new(width, height).ok_or_else(|| {
        IconError::format(format!("Cannot allocate {width}x{height} SVG surface"))
    })?;
    resvg::render(&tree, Transform::from_scale(scale, scale), &mut pixmap.as_mut());

    Ok(pixmap_to_rgba_image(&pixmap))
}

/// Converts a premultiplied tiny-skia pixmap into a straight-alpha RGBA image.
pub(crate) fn pixmap_to_rgba_image(pixmap: &Pixmap) -> RgbaImage {
    let mut img = RgbaImage::new(pixmap.width(), pixmap.height());
    for (dst, src) in img.pixels_mut().zip(pixmap.pixels()) {
        let c = src.demultiply();
        *dst = Rgba([c.red(), c.green(), c.blue(), c.alpha()]);
    }
    img
}

// ============================================================================
// Compositing
// ============================================================================

/// Blends `src` over `dest` with its top-left corner at (`x`, `y`).
///
/// Source pixels falling outside `dest` are ignored.
pub fn composite_over(dest: &mut RgbaImage, src: &RgbaImage, x: u32, y: u32) {
    for (sx, sy, src_pixel) in src.enumerate_pixels() {
        let (dx, dy) = (x + sx, y + sy);
        if dx >= dest.width() || dy >= dest.height() {
            continue;
        }
        let dst_pixel = dest.get_pixel_mut(dx, dy);
        *dst_pixel = alpha_blend(*src_pixel, *dst_pixel);
    }
}

/// Source-over blend of two straight-alpha pixels.
fn alpha_blend(src: Rgba<u8>, dst: Rgba<u8>) -> Rgba<u8> {
    match src[3] {
        255 => return src,
        0 => return dst,
        _ => {}
    }

    let sa = src[3] as f32 / 255.0;
    let da = dst[3] as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);
    if out_a <= 0.0 {
        return Rgba([0, 0, 0, 0]);
    }

    let channel = |s: u8, d: u8| {
        let out = (s as f32 * sa + d as f32 * da * (1.0 - sa)) / out_a;
        out.round().clamp(0.0, 255.0) as u8
    };

    Rgba([
        channel(src[0], dst[0]),
        channel(src[1], dst[1]),
        channel(src[2], dst[2]),
        (out_a * 255.0).round() as u8,
    ])
}

// ============================================================================
// Tests
// ============================================================================
