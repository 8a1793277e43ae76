use std::path::PathBuf;

use clap::builder::TypedValueParser;
use clap::{Parser, Subcommand};

use crate::backends::ExportFormat;
use crate::pipeline::contrast::{ContrastTier, DEFAULT_MIN_CONTRAST};
use crate::pipeline::extract::{DEFAULT_NUM_COLORS, MAX_DIM};

/// Generate design-system color palettes, procedurally or from an image.
#[derive(Parser, Debug)]
#[command(name = "swatchbook", version, about)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Seed the random source for reproducible output
    #[arg(long, global = true)]
    pub seed: Option<u64>,

    /// Output format for the palette
    #[arg(short, long, value_enum, global = true, default_value_t = ExportFormat::Json)]
    pub format: ExportFormat,

    /// Write the palette to this file instead of stdout
    #[arg(short, long, global = true)]
    pub output: Option<PathBuf>,

    /// Print a colored terminal preview of the palette to stderr
    #[arg(long, global = true)]
    pub preview: bool,

    /// Open the interactive preview after generating
    #[arg(long, global = true)]
    pub tui: bool,

    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Generate a palette from hue rotations around a random base hue
    Generate,

    /// Extract a palette from an image
    Extract {
        /// Path to the input image
        image: PathBuf,

        /// Number of K-means clusters (at least one per tone band)
        #[arg(short = 'k', long = "colors", default_value_t = DEFAULT_NUM_COLORS,
              value_parser = clap::value_parser!(u16).range(3..=256).map(usize::from))]
        colors: usize,

        /// Downscale images larger than this many pixels per side
        #[arg(long, default_value_t = MAX_DIM)]
        max_dim: u32,
    },

    /// Adjust a foreground color until it is legible on a background
    Contrast {
        /// Foreground color as hex, e.g. "#AA7744"
        foreground: String,

        /// Background color as hex
        background: String,

        /// Minimum contrast ratio requested
        #[arg(long, default_value_t = DEFAULT_MIN_CONTRAST)]
        ratio: f64,

        /// Importance of the text; lower tiers relax the ratio
        #[arg(long, value_enum, default_value_t = ContrastTier::Primary)]
        tier: ContrastTier,
    },
}
