//! End-to-end placement pipeline.
//!
//! Ties the stages together: load the images, score the base with
//! [`crate::energy::forward_energy`], pick an anchor with
//! [`crate::locate::quiet_zone`], blend the overlay in with
//! [`crate::blending::composite`], and write the result. The in-memory
//! path is [`place_overlay`]; [`process_file`] wraps it with disk I/O and
//! optional debug artifacts.

use std::path::{Path, PathBuf};

use image::{DynamicImage, ImageFormat, RgbImage, RgbaImage};

use crate::blending::{self, Rect};
use crate::energy;
use crate::error::{Error, Result};
use crate::grid::EnergyGrid;
use crate::locate::{self, Coord};

/// File name of the raw energy rendering inside the artifact directory.
const ENERGY_ARTIFACT: &str = "energy.png";

/// File name of the smoothed energy rendering inside the artifact directory.
const SMOOTHED_ARTIFACT: &str = "smoothed.png";

/// Options controlling file processing behavior.
#[derive(Debug, Clone, Default)]
pub struct PlaceOptions {
    /// Where to write the composited image. Derived from the input path
    /// when unset, see [`default_output_path`].
    pub output: Option<PathBuf>,
    /// Write grayscale renderings of the raw and smoothed energy maps
    /// into this directory.
    pub artifact_dir: Option<PathBuf>,
    /// Enable verbose output.
    pub verbose: bool,
    /// Suppress non-error output.
    pub quiet: bool,
}

/// Where an overlay ended up on the base image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    /// Quiet-zone anchor the overlay was centered on.
    pub anchor: Coord,
    /// Region of the base image the overlay was painted into, shifted
    /// inside the top and left edges and truncated at the bottom and
    /// right.
    pub rect: Rect,
}

/// Result of processing a single base/overlay pair.
#[derive(Debug)]
pub struct PlaceReport {
    /// Path the composited image was written to.
    pub output: PathBuf,
    /// Placement chosen for the overlay.
    pub placement: Placement,
    /// Base image width in pixels.
    pub width: u32,
    /// Base image height in pixels.
    pub height: u32,
}

/// Place `overlay` in the visually quietest region of `base`, in-place.
///
/// Runs the full pipeline on decoded images: forward-energy scoring,
/// smoothed minimum search with the edge guard margin, overlay scaling,
/// and alpha blending.
///
/// # Errors
///
/// Returns [`Error::EmptyImage`] if either image has a zero dimension or
/// the base is too small to hold a scaled overlay, and
/// [`Error::PlacementOutsideImage`] if the anchor lands past the bottom
/// or right edge of the base.
pub fn place_overlay(base: &mut RgbImage, overlay: &RgbaImage) -> Result<Placement> {
    let (width, height) = base.dimensions();
    if width == 0 || height == 0 {
        return Err(Error::EmptyImage { width, height });
    }

    let energy = energy::forward_energy(base);
    let anchor = locate::quiet_zone(&energy);
    let rect = blending::composite(base, overlay, anchor)?;
    Ok(Placement { anchor, rect })
}

/// Load both images, place the overlay, and save the result.
///
/// The overlay must decode to a format with a real alpha channel; formats
/// without one are rejected rather than treated as fully opaque. With
/// `artifact_dir` set, grayscale renderings of the raw and smoothed
/// energy maps are written there before placement.
///
/// # Errors
///
/// Returns [`Error::Load`] if either input fails to decode,
/// [`Error::MissingAlpha`] for an overlay without transparency, any
/// placement error from [`place_overlay`], and I/O or encoding errors
/// from writing the output.
pub fn process_file(
    image_path: &Path,
    overlay_path: &Path,
    opts: &PlaceOptions,
) -> Result<PlaceReport> {
    let mut base = image::open(image_path)
        .map_err(|e| Error::Load {
            path: image_path.to_path_buf(),
            source: e,
        })?
        .to_rgb8();
    let (width, height) = base.dimensions();
    if width == 0 || height == 0 {
        return Err(Error::EmptyImage { width, height });
    }

    let overlay = load_overlay(overlay_path)?;

    let energy = energy::forward_energy(&base);
    if let Some(dir) = &opts.artifact_dir {
        write_artifacts(&energy, dir)?;
    }
    let anchor = locate::quiet_zone(&energy);
    let rect = blending::composite(&mut base, &overlay, anchor)?;

    let output = opts
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(image_path));
    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    save_image(&base, &output)?;

    Ok(PlaceReport {
        output,
        placement: Placement { anchor, rect },
        width,
        height,
    })
}

/// Load an overlay and require transparency.
///
/// The check runs on the decoded color type; converting to RGBA first
/// would fabricate an all-opaque channel and hide the problem.
fn load_overlay(path: &Path) -> Result<RgbaImage> {
    let decoded = image::open(path).map_err(|e| Error::Load {
        path: path.to_path_buf(),
        source: e,
    })?;
    if !decoded.color().has_alpha() {
        return Err(Error::MissingAlpha {
            path: path.to_path_buf(),
        });
    }
    Ok(decoded.to_rgba8())
}

fn write_artifacts(energy: &EnergyGrid, dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir)?;
    energy.to_gray_image().save(dir.join(ENERGY_ARTIFACT))?;
    energy
        .smoothed()
        .to_gray_image()
        .save(dir.join(SMOOTHED_ARTIFACT))?;
    Ok(())
}

/// Save an RGB image with format-specific quality settings.
///
/// JPEG output is encoded at maximum quality; PNG, WebP, and BMP go
/// through the default encoders.
///
/// # Errors
///
/// Returns [`Error::UnsupportedFormat`] for extensions outside that set,
/// or an encoding error if writing fails.
pub fn save_image(img: &RgbImage, path: &Path) -> Result<()> {
    let format =
        ImageFormat::from_path(path).map_err(|e| Error::UnsupportedFormat(e.to_string()))?;

    let dyn_img = DynamicImage::ImageRgb8(img.clone());

    match format {
        ImageFormat::Jpeg => {
            let file = std::fs::File::create(path)?;
            let mut encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(file, 100);
            encoder.encode_image(&dyn_img)?;
        }
        ImageFormat::Png | ImageFormat::WebP | ImageFormat::Bmp => {
            dyn_img.save(path)?;
        }
        _ => {
            return Err(Error::UnsupportedFormat(format!("{format:?}")));
        }
    }

    Ok(())
}

/// Generate a default output path from an input path.
///
/// Example: `"photo.jpg"` becomes `"photo_watermarked.jpg"`.
#[must_use]
pub fn default_output_path(input: &Path) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    let ext = input.extension().unwrap_or_default().to_string_lossy();
    let parent = input.parent().unwrap_or(Path::new("."));
    parent.join(format!("{stem}_watermarked.{ext}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, Rgba};

    #[test]
    fn default_output_path_appends_watermarked_suffix() {
        let p = default_output_path(Path::new("/tmp/photo.jpg"));
        assert_eq!(p, PathBuf::from("/tmp/photo_watermarked.jpg"));

        let p = default_output_path(Path::new("image.png"));
        assert_eq!(
            p.file_name().unwrap().to_str().unwrap(),
            "image_watermarked.png"
        );
    }

    #[test]
    fn flat_image_places_in_the_guard_band_corner() {
        let mut base = RgbImage::from_pixel(320, 240, Rgb([90, 90, 90]));
        let overlay = RgbaImage::from_pixel(100, 100, Rgba([255, 0, 0, 255]));

        let placement = place_overlay(&mut base, &overlay).unwrap();
        // Uniform energy: minimum at the origin, pushed in by 240 / 20.
        assert_eq!(placement.anchor, Coord { row: 12, col: 12 });
        assert_eq!(
            placement.rect,
            Rect {
                top: 0,
                left: 0,
                bottom: 30,
                right: 30,
            }
        );
        assert_eq!(*base.get_pixel(0, 0), Rgb([255, 0, 0]));
        assert_eq!(*base.get_pixel(29, 29), Rgb([255, 0, 0]));
        assert_eq!(*base.get_pixel(30, 30), Rgb([90, 90, 90]));
    }

    #[test]
    fn empty_base_is_rejected_before_analysis() {
        let mut base = RgbImage::new(0, 0);
        let overlay = RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 255]));
        assert!(matches!(
            place_overlay(&mut base, &overlay),
            Err(Error::EmptyImage {
                width: 0,
                height: 0
            })
        ));
    }
}
