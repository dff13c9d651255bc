use std::fs;
use std::path::{Path, PathBuf};

use image::{DynamicImage, Rgb, RgbImage, RgbaImage};

use crate::error::{Error, Result};
use crate::models::ResponsePart;

/// Derive a per-model output path by inserting `-tag` before the
/// extension. A filename without an extension gets `.png`.
pub fn tagged_output_path(filename: &Path, tag: &str) -> PathBuf {
    let stem = filename
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = filename
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_else(|| ".png".to_string());

    filename.with_file_name(format!("{}-{}{}", stem, tag, ext))
}

/// Walk the response parts in order: log text commentary, write each image
/// to the target. Returns the canonicalized path of the saved file, or
/// [`Error::NoImage`] when the response carried no image at all.
///
/// When a response carries several image parts they all target the same
/// path, so the last one wins.
// TODO: consider indexed filenames (stem-1.png, stem-2.png) for multi-image
// responses instead of overwriting.
pub fn persist_parts(parts: &[ResponsePart], target: &Path, model_label: &str) -> Result<PathBuf> {
    let mut saved = false;
    for part in parts {
        match part {
            ResponsePart::Text(text) => log::info!("Model response: {}", text),
            ResponsePart::Image(bytes) => {
                write_png(bytes, target)?;
                saved = true;
            }
        }
    }

    if saved {
        Ok(fs::canonicalize(target)?)
    } else {
        Err(Error::NoImage {
            model: model_label.to_string(),
        })
    }
}

/// Decode an image payload, normalize its color mode and write it to
/// `target` as PNG, creating parent directories as needed. RGBA pixels are
/// flattened onto an opaque white background using their own alpha as the
/// mask; any other non-RGB mode converts to plain RGB.
pub fn write_png(bytes: &[u8], target: &Path) -> Result<()> {
    if let Some(parent) = target.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let decoded = image::load_from_memory(bytes)?;
    let rgb = match decoded {
        DynamicImage::ImageRgb8(rgb) => rgb,
        DynamicImage::ImageRgba8(rgba) => flatten_onto_white(&rgba),
        other => other.to_rgb8(),
    };
    rgb.save_with_format(target, image::ImageFormat::Png)?;

    Ok(())
}

fn flatten_onto_white(rgba: &RgbaImage) -> RgbImage {
    let mut out = RgbImage::new(rgba.width(), rgba.height());
    for (x, y, pixel) in rgba.enumerate_pixels() {
        let alpha = pixel[3] as u32;
        let blend = |c: u8| ((c as u32 * alpha + 255 * (255 - alpha)) / 255) as u8;
        out.put_pixel(x, y, Rgb([blend(pixel[0]), blend(pixel[1]), blend(pixel[2])]));
    }
    out
}
