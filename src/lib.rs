//! Design-system palettes: procedural generation, image-based extraction
//! through Lab-space k-means, and WCAG contrast utilities.

pub mod backends;
pub mod cli;
pub mod color;
pub mod pipeline;
pub mod preview;
pub mod store;
pub mod theme;
pub mod tui;

pub use color::{get_contrast_ratio, rgb_to_hex, Color, PaletteColor};
pub use pipeline::contrast::{
    adjust_color_for_contrast, adjust_hex_for_contrast, get_varied_contrast_colors, ContrastTier,
    ThemeColors, VariedContrast,
};
pub use pipeline::extract::{
    extract_palette_from_bytes, extract_palette_from_image, extract_palette_from_pixels,
    ExtractOptions,
};
pub use pipeline::generate::generate_algorithmic_palette;
pub use store::PaletteStore;
pub use theme::{ColorCategory, ColorPaletteData, PaletteKey, ToneBand};
