use std::ops::Range;

use palette::Hsl;
use rand::Rng;
use tracing::debug;

use crate::color::Color;
use crate::theme::ColorPaletteData;

/// Saturation and lightness ranges (in [0, 1]) for one tone band.
struct BandShape {
    saturation: Range<f32>,
    lightness: Range<f32>,
}

const LIGHT: BandShape = BandShape {
    saturation: 0.25..0.5,
    lightness: 0.86..0.96,
};

const MID: BandShape = BandShape {
    saturation: 0.4..0.7,
    lightness: 0.45..0.62,
};

const DARK: BandShape = BandShape {
    saturation: 0.15..0.4,
    lightness: 0.08..0.2,
};

/// Generate a palette from hue rotations around a random base hue.
///
/// Light and dark bands are analogous to the base hue; the mid band sits
/// roughly opposite it on the color wheel.
pub fn generate_algorithmic_palette<R: Rng + ?Sized>(rng: &mut R) -> ColorPaletteData {
    let base: f32 = rng.gen_range(0.0..360.0);
    let spread: f32 = rng.gen_range(20.0..40.0);
    let accent = base + rng.gen_range(150.0..210.0);
    debug!(base, spread, accent, "generating algorithmic palette");

    let light = triad(rng, base, spread, &LIGHT);
    let mid = triad(rng, accent, spread, &MID);
    let dark = triad(rng, base + spread / 2.0, spread / 2.0, &DARK);
    ColorPaletteData::new(light, mid, dark)
}

/// Three colors at `hue`, `hue + spread` and `hue - spread`, with lightness
/// stepping away from the band's first (most representative) color.
fn triad<R: Rng + ?Sized>(rng: &mut R, hue: f32, spread: f32, shape: &BandShape) -> [Color; 3] {
    let saturation = rng.gen_range(shape.saturation.clone());
    let lightness = rng.gen_range(shape.lightness.clone());
    let step = (shape.lightness.end - shape.lightness.start) / 4.0;

    [0.0f32, 1.0, -1.0].map(|k| {
        let h = (hue + k * spread).rem_euclid(360.0);
        let l = (lightness - k.abs() * step).clamp(0.0, 1.0);
        Color::from_hsl(Hsl::new(h, saturation, l))
    })
}
