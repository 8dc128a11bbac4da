//! Raster primitives shared by the bundle reader and the variant generators.

use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

use image::imageops::{self, FilterType};
use image::{DynamicImage, ImageFormat, ImageReader, RgbaImage};
use tempfile::NamedTempFile;

use crate::error::{IconError, Result};
use crate::output::GenerationResult;
use crate::svg::render_svg;

/// Corner radius of Apple-style rounded icons, as a fraction of the edge length.
pub const CORNER_RADIUS_RATIO: f64 = 0.2237;

/// Format and dimensions of a validated source image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceImageMeta {
    pub width: u32,
    pub height: u32,
    pub format: ImageFormat,
}

/// Checks that `path` is a square PNG.
///
/// The format is sniffed from the file contents, not its extension.
pub fn validate_source_image(path: &Path) -> Result<SourceImageMeta> {
    let reader = ImageReader::open(path)?.with_guessed_format()?;

    let format = match reader.format() {
        Some(ImageFormat::Png) => ImageFormat::Png,
        Some(other) => {
            return Err(IconError::validation(format!(
                "Source image must be a PNG file (got {})",
                other.extensions_str().first().copied().unwrap_or("unknown")
            )));
        }
        None => {
            return Err(IconError::validation(
                "Source image must be a PNG file (got unknown)",
            ));
        }
    };

    let (width, height) = reader
        .into_dimensions()
        .map_err(|_| IconError::validation("Could not read image dimensions"))?;

    if width != height {
        return Err(IconError::validation(format!(
            "Source image must be square (got {width}x{height})"
        )));
    }

    Ok(SourceImageMeta {
        width,
        height,
        format,
    })
}

/// Opens an image from disk as RGBA.
pub fn load_rgba(path: &Path) -> Result<RgbaImage> {
    Ok(image::open(path)?.to_rgba8())
}

/// Resizes `src` to fit inside `width x height` preserving aspect ratio,
/// centering it on a fully transparent canvas of exactly that size.
pub fn resize_contain(src: &RgbaImage, width: u32, height: u32) -> RgbaImage {
    let (sw, sh) = src.dimensions();
    if sw == 0 || sh == 0 || width == 0 || height == 0 {
        return RgbaImage::new(width, height);
    }

    let ratio = (width as f64 / sw as f64).min(height as f64 / sh as f64);
    let fit_w = ((sw as f64 * ratio).round() as u32).clamp(1, width);
    let fit_h = ((sh as f64 * ratio).round() as u32).clamp(1, height);

    let resized = if (fit_w, fit_h) == (sw, sh) {
        src.clone()
    } else {
        imageops::resize(src, fit_w, fit_h, FilterType::Lanczos3)
    };

    if (fit_w, fit_h) == (width, height) {
        return resized;
    }

    let mut canvas = RgbaImage::new(width, height);
    let x = ((width - fit_w) / 2) as i64;
    let y = ((height - fit_h) / 2) as i64;
    imageops::replace(&mut canvas, &resized, x, y);
    canvas
}

/// Masks `img` to a rounded rectangle covering the whole image.
///
/// Pixels outside the rounded corners become transparent; edge pixels are
/// antialiased by the rasterized mask.
pub fn apply_rounded_corners(img: &mut RgbaImage) -> Result<()> {
    let (width, height) = img.dimensions();
    let size = width.max(height);
    let radius = (size as f64 * CORNER_RADIUS_RATIO).round();
    let mask_svg = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}"><rect x="0" y="0" width="{width}" height="{height}" rx="{radius}" ry="{radius}" fill="white"/></svg>"#
    );
    let mask = render_svg(&mask_svg, size)?;

    for (x, y, pixel) in img.enumerate_pixels_mut() {
        let coverage = mask.get_pixel_checked(x, y).map_or(0, |m| m[3]) as u32;
        pixel[3] = ((pixel[3] as u32 * coverage + 127) / 255) as u8;
    }
    Ok(())
}

/// Converts the color channels to luminance, keeping alpha.
pub fn grayscale(img: &RgbaImage) -> RgbaImage {
    DynamicImage::ImageLumaA8(imageops::grayscale_alpha(img)).to_rgba8()
}

/// Writes `img` as PNG to `path` and reports what was written.
///
/// The PNG is encoded into a temporary sibling file and renamed into place,
/// so a failed encode never leaves a partial file at `path`.
pub fn write_png(img: &RgbaImage, path: &Path) -> Result<GenerationResult> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(parent)?;
    {
        let mut writer = BufWriter::new(tmp.as_file_mut());
        img.write_to(&mut writer, ImageFormat::Png)?;
        writer.flush()?;
    }
    tmp.persist(path).map_err(|e| e.error)?;

    Ok(GenerationResult {
        file_path: path.to_path_buf(),
        width: img.width(),
        height: img.height(),
        size: fs::metadata(path)?.len(),
    })
}

/// Loads `input`, resizes it (contain) to `width x height`, and writes a PNG.
pub fn resize_image(
    input: &Path,
    width: u32,
    height: u32,
    output: &Path,
) -> Result<GenerationResult> {
    let src = load_rgba(input)?;
    write_png(&resize_contain(&src, width, height), output)
}
