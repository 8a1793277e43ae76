use std::cmp::Ordering;
use std::ops::RangeInclusive;

use palette::Lab;
use rand::Rng;
use tracing::debug;

use crate::color::{Color, PaletteColor};
use crate::theme::ColorPaletteData;

/// Refined colors keep their Lab lightness inside this range.
pub const LIGHTNESS_RANGE: RangeInclusive<f32> = 10.0..=90.0;

/// Chroma multiplier applied to `a` and `b` during refinement.
pub const CHROMA_SCALE: f32 = 0.85;

/// Colors at or below this lightness count as truly dark.
pub const TRULY_DARK_MAX_L: f32 = 45.0;

/// The dark band is pulled down to a lightness drawn from this range.
pub const DARKNESS_TARGET_RANGE: RangeInclusive<f32> = 30.0..=40.0;

/// Direction of the global lightness sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// Refined colors grouped into the three tone bands, in slot order.
#[derive(Debug, Clone, Default)]
pub struct ToneBuckets {
    pub light: Vec<PaletteColor>,
    pub mid: Vec<PaletteColor>,
    pub dark: Vec<PaletteColor>,
}

impl ToneBuckets {
    /// Map the buckets onto the nine named slots, padding short bands.
    pub fn into_palette(self) -> ColorPaletteData {
        fn colors(bucket: &[PaletteColor]) -> Vec<Color> {
            bucket.iter().map(|c| c.color).collect()
        }
        ColorPaletteData::from_bands(
            &colors(&self.light),
            &colors(&self.mid),
            &colors(&self.dark),
        )
    }
}

/// Desaturate slightly and keep lightness away from the extremes.
pub fn refine(lab: Lab) -> PaletteColor {
    let (min_l, max_l) = (*LIGHTNESS_RANGE.start(), *LIGHTNESS_RANGE.end());
    PaletteColor::from_lab(Lab::new(
        lab.l.clamp(min_l, max_l),
        lab.a * CHROMA_SCALE,
        lab.b * CHROMA_SCALE,
    ))
}

/// Turn cluster centroids into a labeled palette.
///
/// The sort direction and the darkness target are drawn from `rng`, so
/// repeated calls on the same centroids give different arrangements.
pub fn assign_tones<R: Rng + ?Sized>(centroids: &[Lab], rng: &mut R) -> ColorPaletteData {
    let direction = if rng.gen::<f64>() > 0.5 {
        SortDirection::Ascending
    } else {
        SortDirection::Descending
    };
    let darkness_target = rng.gen_range(DARKNESS_TARGET_RANGE);
    debug!(?direction, darkness_target, "assigning tone bands");
    bucket_tones(centroids, direction, darkness_target).into_palette()
}

/// Deterministic core of [`assign_tones`].
pub fn bucket_tones(
    centroids: &[Lab],
    direction: SortDirection,
    darkness_target: f32,
) -> ToneBuckets {
    let refined: Vec<PaletteColor> = centroids.iter().map(|&lab| refine(lab)).collect();
    let group = refined.len() / 3;

    let mut sorted = refined.clone();
    sorted.sort_by(|x, y| {
        let ord = x.lab.l.total_cmp(&y.lab.l);
        match direction {
            SortDirection::Ascending => ord,
            SortDirection::Descending => ord.reverse(),
        }
    });

    let mut light = sorted[..group].to_vec();
    let mut mid = sorted[group..2 * group].to_vec();
    let mut dark = sorted[2 * group..3 * group].to_vec();
    sort_by_b(&mut light);
    sort_by_b(&mut mid);
    sort_by_b(&mut dark);

    // The positional dark band depends on the sort direction; prefer colors
    // that are actually dark when there are enough of them.
    let mut truly_dark: Vec<PaletteColor> = refined
        .into_iter()
        .filter(|c| c.lab.l <= TRULY_DARK_MAX_L)
        .collect();
    if truly_dark.len() >= group {
        truly_dark.sort_by(|x, y| x.lab.l.total_cmp(&y.lab.l));
        truly_dark.truncate(group);
        sort_by_b(&mut truly_dark);
        dark = truly_dark;
    }

    for color in dark.iter_mut() {
        if color.lab.l > darkness_target {
            *color = color.with_lightness(darkness_target);
        }
    }

    ToneBuckets { light, mid, dark }
}

fn sort_by_b(colors: &mut [PaletteColor]) {
    colors.sort_by(|x, y| x.lab.b.partial_cmp(&y.lab.b).unwrap_or(Ordering::Equal));
}
