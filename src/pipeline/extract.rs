use std::ops::RangeInclusive;
use std::path::Path;

use anyhow::{Context, Result};
use image::imageops::FilterType;
use image::RgbaImage;
use palette::Lab;
use rand::Rng;
use tracing::{debug, warn};

use crate::color::Color;
use crate::pipeline::assign::assign_tones;
use crate::pipeline::kmeans::{kmeans, Clustering};
use crate::theme::{ColorPaletteData, NEUTRAL_GRAY};

pub const DEFAULT_NUM_COLORS: usize = 9;
pub const MAX_DIM: u32 = 256;

/// Pixels with less opacity than this are ignored.
pub const MIN_ALPHA: u8 = 128;

/// Step size between sampled pixels, drawn per run. This is a step, not a
/// skip count: a step of 1 visits every pixel, 3 visits every third.
pub const STRIDE_RANGE: RangeInclusive<usize> = 1..=3;

/// k-means iteration budget, drawn per run.
pub const ITERATION_RANGE: RangeInclusive<usize> = 8..=12;

/// Tunables for image extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Number of k-means clusters.
    pub num_colors: usize,
    /// Larger images are downscaled to fit within this many pixels per side.
    pub max_dim: u32,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            num_colors: DEFAULT_NUM_COLORS,
            max_dim: MAX_DIM,
        }
    }
}

/// A palette together with the intermediate results that produced it.
#[derive(Debug, Clone)]
pub struct ExtractionReport {
    pub palette: ColorPaletteData,
    pub samples: usize,
    pub clustering: Clustering,
}

/// Read raw image bytes from disk.
pub fn read_image(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).with_context(|| {
        if !path.exists() {
            format!("file not found: {}", path.display())
        } else {
            format!("failed to read image: {}", path.display())
        }
    })
}

/// Decode image bytes and downscale to fit within `max_dim` (preserving
/// aspect ratio).
pub fn decode_image(bytes: &[u8], max_dim: u32) -> Result<RgbaImage> {
    let img = image::load_from_memory(bytes).context(
        "unsupported or corrupt image. Supported formats: PNG, JPEG, WebP, BMP, TIFF, GIF",
    )?;

    let img = if img.width() > max_dim || img.height() > max_dim {
        img.resize(max_dim, max_dim, FilterType::Lanczos3)
    } else {
        img
    };
    Ok(img.to_rgba8())
}

/// Load an image from disk and prepare it for sampling.
pub fn load_and_prepare(path: &Path, max_dim: u32) -> Result<RgbaImage> {
    let bytes = read_image(path)?;
    decode_image(&bytes, max_dim)
        .with_context(|| format!("unsupported or corrupt image: {}", path.display()))
}

/// Sample opaque pixels with a random stride and convert them to Lab.
pub fn sample_pixels<R: Rng + ?Sized>(img: &RgbaImage, rng: &mut R) -> Vec<Lab> {
    let stride = rng.gen_range(STRIDE_RANGE);
    let samples: Vec<Lab> = img
        .pixels()
        .step_by(stride)
        .filter(|p| p[3] >= MIN_ALPHA)
        .map(|p| Color::new(p[0], p[1], p[2]).to_lab())
        .collect();
    debug!(
        width = img.width(),
        height = img.height(),
        stride,
        samples = samples.len(),
        "sampled pixels"
    );
    samples
}

/// Run the full extraction on decoded pixels, keeping intermediate results.
pub fn extract_report<R: Rng + ?Sized>(
    img: &RgbaImage,
    num_colors: usize,
    rng: &mut R,
) -> ExtractionReport {
    let samples = sample_pixels(img, rng);
    if samples.is_empty() {
        warn!("image has no usable pixels, using neutral fallback palette");
        return ExtractionReport {
            palette: ColorPaletteData::uniform(NEUTRAL_GRAY),
            samples: 0,
            clustering: Clustering::default(),
        };
    }

    if num_colors < 3 {
        warn!(
            num_colors,
            "fewer clusters than tone bands, padding palette with fallback colors"
        );
    }
    let max_iter = rng.gen_range(ITERATION_RANGE);
    let clustering = kmeans(&samples, num_colors, max_iter, rng);
    for weight in clustering.weights() {
        debug!(
            index = weight.index,
            share = weight.percentage,
            color = %Color::from_lab(weight.centroid),
            "cluster"
        );
    }

    let palette = assign_tones(&clustering.centroids, rng);
    ExtractionReport {
        palette,
        samples: samples.len(),
        clustering,
    }
}

/// Extract a palette from decoded pixels. Never fails.
pub fn extract_palette_from_pixels<R: Rng + ?Sized>(
    img: &RgbaImage,
    num_colors: usize,
    rng: &mut R,
) -> ColorPaletteData {
    extract_report(img, num_colors, rng).palette
}

/// Decode image bytes and extract a palette. Fails only if decoding fails.
pub fn extract_palette_from_bytes<R: Rng + ?Sized>(
    bytes: &[u8],
    options: &ExtractOptions,
    rng: &mut R,
) -> Result<ColorPaletteData> {
    let img = decode_image(bytes, options.max_dim)?;
    Ok(extract_palette_from_pixels(&img, options.num_colors, rng))
}

/// Load an image file and extract a palette. Fails only if loading fails.
pub fn extract_palette_from_image<R: Rng + ?Sized>(
    path: &Path,
    options: &ExtractOptions,
    rng: &mut R,
) -> Result<ColorPaletteData> {
    let img = load_and_prepare(path, options.max_dim)?;
    Ok(extract_palette_from_pixels(&img, options.num_colors, rng))
}
