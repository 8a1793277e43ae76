use anyhow::Result;
use palette::Hsl;
use tracing::debug;

use crate::color::Color;
use crate::theme::{ColorPaletteData, PaletteKey, ToneBand};

/// Default minimum contrast ratio for body text (WCAG AA).
pub const DEFAULT_MIN_CONTRAST: f64 = 4.5;

const MAX_SEARCH_STEPS: usize = 20;

/// The search stops once the lightness bracket is this narrow (in percent).
const LIGHTNESS_TOLERANCE: f32 = 1.0;

/// How important a piece of text is. Less important text may use a looser
/// contrast target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ContrastTier {
    #[default]
    Primary,
    Secondary,
    Tertiary,
}

impl ContrastTier {
    /// The contrast ratio this tier actually requires for a requested ratio.
    pub fn target_ratio(self, requested: f64) -> f64 {
        match self {
            ContrastTier::Primary => requested,
            ContrastTier::Secondary => (requested * 0.8).max(2.5),
            ContrastTier::Tertiary => (requested * 0.7).max(2.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Lighten,
    Darken,
}

impl Direction {
    fn opposite(self) -> Self {
        match self {
            Direction::Lighten => Direction::Darken,
            Direction::Darken => Direction::Lighten,
        }
    }
}

/// Return `fg` with its HSL lightness moved just far enough to reach the
/// tier's contrast target against `bg`. Hue and saturation are kept.
///
/// Never fails: when the target is out of reach the candidate with the
/// highest contrast found is returned.
pub fn adjust_color_for_contrast(
    fg: Color,
    bg: Color,
    min_ratio: f64,
    tier: ContrastTier,
) -> Color {
    let target = tier.target_ratio(min_ratio);
    let current = Color::contrast_ratio(&fg, &bg);
    if current >= target {
        return fg;
    }

    let hsl = fg.to_hsl();
    let preferred = if bg.relative_luminance() > fg.relative_luminance() {
        Direction::Darken
    } else {
        Direction::Lighten
    };

    let first = search_lightness(hsl, bg, target, preferred);
    let first_ratio = Color::contrast_ratio(&first, &bg);
    if first_ratio >= target {
        return first;
    }

    let second = search_lightness(hsl, bg, target, preferred.opposite());
    let second_ratio = Color::contrast_ratio(&second, &bg);
    if second_ratio >= target || second_ratio > first_ratio {
        if second_ratio < target {
            debug!(fg = %fg, bg = %bg, required = target, reached = second_ratio, "contrast target out of reach");
        }
        return second;
    }

    debug!(fg = %fg, bg = %bg, required = target, reached = first_ratio, "contrast target out of reach");
    first
}

/// Hex-string form of [`adjust_color_for_contrast`].
pub fn adjust_hex_for_contrast(
    fg_hex: &str,
    bg_hex: &str,
    min_ratio: f64,
    tier: ContrastTier,
) -> Result<String> {
    let fg = Color::from_hex(fg_hex)?;
    let bg = Color::from_hex(bg_hex)?;
    Ok(adjust_color_for_contrast(fg, bg, min_ratio, tier).to_hex())
}

/// Binary search over lightness towards one extreme.
///
/// Colors passing the target form one contiguous stretch ending at the
/// extreme, so the search converges on the passing color nearest the
/// original lightness. Falls back to the extreme itself.
fn search_lightness(hsl: Hsl, bg: Color, target: f64, direction: Direction) -> Color {
    let current = hsl.lightness * 100.0;
    let (mut lo, mut hi, extreme) = match direction {
        Direction::Lighten => (current, 100.0, 100.0),
        Direction::Darken => (0.0, current, 0.0),
    };
    let mut best = with_lightness(hsl, extreme);

    for _ in 0..MAX_SEARCH_STEPS {
        if hi - lo <= LIGHTNESS_TOLERANCE {
            break;
        }
        let mid = (lo + hi) / 2.0;
        let candidate = with_lightness(hsl, mid);
        let passes = Color::contrast_ratio(&candidate, &bg) >= target;
        if passes {
            best = candidate;
        }
        match (direction, passes) {
            (Direction::Lighten, true) | (Direction::Darken, false) => hi = mid,
            (Direction::Lighten, false) | (Direction::Darken, true) => lo = mid,
        }
    }
    best
}

fn with_lightness(hsl: Hsl, percent: f32) -> Color {
    Color::from_hsl(Hsl::new(hsl.hue, hsl.saturation, percent / 100.0))
}

/// A text triad adjusted for legibility against one background.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariedContrast {
    pub primary: Color,
    pub secondary: Color,
    pub tertiary: Color,
}

/// Adjust three text colors against `bg`, each with its own tier.
pub fn get_varied_contrast_colors(
    bg: Color,
    primary: Color,
    secondary: Color,
    tertiary: Color,
    min_ratio: f64,
) -> VariedContrast {
    VariedContrast {
        primary: adjust_color_for_contrast(primary, bg, min_ratio, ContrastTier::Primary),
        secondary: adjust_color_for_contrast(secondary, bg, min_ratio, ContrastTier::Secondary),
        tertiary: adjust_color_for_contrast(tertiary, bg, min_ratio, ContrastTier::Tertiary),
    }
}

/// Ready-to-use UI colors derived from a palette: the primary light tone as
/// background, the dark triad as legible text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemeColors {
    pub background: Color,
    pub text: VariedContrast,
}

impl ThemeColors {
    pub fn derive(palette: &ColorPaletteData, min_ratio: f64) -> Self {
        let background = palette.get(PaletteKey::ALL[0]);
        let [primary, secondary, tertiary] = palette.band(ToneBand::Dark);
        Self {
            background,
            text: get_varied_contrast_colors(background, primary, secondary, tertiary, min_ratio),
        }
    }
}
