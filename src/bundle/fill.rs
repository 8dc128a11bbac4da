//! Background rendering for resolved manifest fills.

use image::RgbaImage;
use palette::Srgb;
use resvg::tiny_skia::{
    Color, GradientStop, LinearGradient, Paint, Pixmap, Point, Rect, SpreadMode, Transform,
};

use super::manifest::{Fill, Orientation};
use crate::color::{IconColor, color_to_hex};
use crate::error::{IconError, Result};
use crate::svg::pixmap_to_rgba_image;

/// Background used when a manifest has no usable fill.
const FALLBACK_BACKGROUND: [u8; 4] = [255, 255, 255, 255];

/// A rendered background and the color that represents it.
#[derive(Debug, Clone)]
pub struct RenderedFill {
    pub image: RgbaImage,
    /// The solid color, or the first gradient stop. Android adaptive icon
    /// backgrounds are matched against this.
    pub color: Srgb<u8>,
}

impl RenderedFill {
    /// The representative color as `#RRGGBB`.
    pub fn hex(&self) -> String {
        color_to_hex(self.color)
    }
}

/// Renders `fill` onto a new `size x size` canvas.
pub fn render_fill(fill: &Fill, size: u32) -> Result<RenderedFill> {
    match fill {
        Fill::Solid(color) => Ok(RenderedFill {
            image: RgbaImage::from_pixel(size, size, image::Rgba(color.to_rgba8())),
            color: color.rgb,
        }),
        Fill::Gradient { stops, orientation } => {
            let first = stops
                .first()
                .ok_or_else(|| IconError::format("Gradient fill has no color stops"))?;
            Ok(RenderedFill {
                image: render_gradient(stops, orientation, size)?,
                color: first.rgb,
            })
        }
        Fill::Absent => Ok(RenderedFill {
            image: RgbaImage::from_pixel(size, size, image::Rgba(FALLBACK_BACKGROUND)),
            color: Srgb::new(255, 255, 255),
        }),
    }
}

/// Rasterizes a linear gradient with evenly spaced stops.
///
/// Stop `i` of `n` sits at offset `i / (n - 1)`; a single stop sits at 0.
/// Orientation points are fractions of the canvas edge.
fn render_gradient(stops: &[IconColor], orientation: &Orientation, size: u32) -> Result<RgbaImage> {
    let mut pixmap = Pixmap::new(size, size)
        .ok_or_else(|| IconError::format(format!("Cannot allocate {size}x{size} canvas")))?;

    let n = stops.len();
    let gradient_stops: Vec<GradientStop> = stops
        .iter()
        .enumerate()
        .map(|(i, c)| {
            let offset = if n == 1 { 0.0 } else { i as f32 / (n - 1) as f32 };
            let [r, g, b, a] = c.to_rgba8();
            GradientStop::new(offset, Color::from_rgba8(r, g, b, a))
        })
        .collect();

    let edge = size as f32;
    let start = Point::from_xy(
        orientation.start.x as f32 * edge,
        orientation.start.y as f32 * edge,
    );
    let end = Point::from_xy(
        orientation.stop.x as f32 * edge,
        orientation.stop.y as f32 * edge,
    );

    match LinearGradient::new(start, end, gradient_stops, SpreadMode::Pad, Transform::identity()) {
        Some(shader) => {
            let rect = Rect::from_xywh(0.0, 0.0, edge, edge)
                .ok_or_else(|| IconError::format(format!("Invalid canvas size {size}")))?;
            let paint = Paint {
                shader,
                anti_alias: false,
                ..Paint::default()
            };
            pixmap.fill_rect(rect, &paint, Transform::identity(), None);
        }
        None => {
            // Non-finite orientation; paint the first stop flat.
            let [r, g, b, a] = stops[0].to_rgba8();
            pixmap.fill(Color::from_rgba8(r, g, b, a));
        }
    }

    Ok(pixmap_to_rgba_image(&pixmap))
}
