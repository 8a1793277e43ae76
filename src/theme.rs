use std::fmt;

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::color::Color;

/// One of the three tone groupings of a palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToneBand {
    Light,
    Mid,
    Dark,
}

impl ToneBand {
    pub const ALL: [ToneBand; 3] = [ToneBand::Light, ToneBand::Mid, ToneBand::Dark];

    pub fn prefix(self) -> &'static str {
        match self {
            ToneBand::Light => "light",
            ToneBand::Mid => "mid",
            ToneBand::Dark => "dark",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            ToneBand::Light => "Light Tones",
            ToneBand::Mid => "Mid Tones",
            ToneBand::Dark => "Dark Tones",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            ToneBand::Light => "Backgrounds and surfaces",
            ToneBand::Mid => "Accents, borders and interactive elements",
            ToneBand::Dark => "Text and high-emphasis foregrounds",
        }
    }

    fn offset(self) -> usize {
        match self {
            ToneBand::Light => 0,
            ToneBand::Mid => 3,
            ToneBand::Dark => 6,
        }
    }
}

/// A named palette slot: a tone band plus a 1-based rank within it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PaletteKey {
    pub band: ToneBand,
    rank: u8,
}

impl PaletteKey {
    /// All nine keys in canonical order (`light-1` .. `dark-3`).
    pub const ALL: [PaletteKey; 9] = [
        PaletteKey::new(ToneBand::Light, 1),
        PaletteKey::new(ToneBand::Light, 2),
        PaletteKey::new(ToneBand::Light, 3),
        PaletteKey::new(ToneBand::Mid, 1),
        PaletteKey::new(ToneBand::Mid, 2),
        PaletteKey::new(ToneBand::Mid, 3),
        PaletteKey::new(ToneBand::Dark, 1),
        PaletteKey::new(ToneBand::Dark, 2),
        PaletteKey::new(ToneBand::Dark, 3),
    ];

    const fn new(band: ToneBand, rank: u8) -> Self {
        Self { band, rank }
    }

    pub fn rank(self) -> u8 {
        self.rank
    }

    fn index(self) -> usize {
        self.band.offset() + self.rank as usize - 1
    }

    /// What the slot is intended for in a UI theme.
    pub fn role(self) -> &'static str {
        match (self.band, self.rank) {
            (ToneBand::Light, 1) => "Primary background",
            (ToneBand::Light, 2) => "Secondary background",
            (ToneBand::Light, _) => "Surface highlight",
            (ToneBand::Mid, 1) => "Primary accent",
            (ToneBand::Mid, 2) => "Secondary accent",
            (ToneBand::Mid, _) => "Borders and dividers",
            (ToneBand::Dark, 1) => "Primary text",
            (ToneBand::Dark, 2) => "Secondary text",
            (ToneBand::Dark, _) => "Tertiary text",
        }
    }
}

impl fmt::Display for PaletteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.band.prefix(), self.rank)
    }
}

/// Per-key hex literals substituted when a tone band comes up short.
pub const FALLBACK_COLORS: [Color; 9] = [
    Color::new(0xF5, 0xF5, 0xF5),
    Color::new(0xEE, 0xEE, 0xEE),
    Color::new(0xE0, 0xE0, 0xE0),
    Color::new(0x9E, 0x9E, 0x9E),
    Color::new(0x75, 0x75, 0x75),
    Color::new(0x61, 0x61, 0x61),
    Color::new(0x42, 0x42, 0x42),
    Color::new(0x30, 0x30, 0x30),
    Color::new(0x21, 0x21, 0x21),
];

/// Neutral gray used for every slot when an image has no usable pixels.
pub const NEUTRAL_GRAY: Color = Color::new(0x80, 0x80, 0x80);

/// The nine-color palette: `light-1..3`, `mid-1..3`, `dark-1..3`.
///
/// The first entry of each band is its most representative color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorPaletteData {
    colors: [Color; 9],
}

impl ColorPaletteData {
    pub fn new(light: [Color; 3], mid: [Color; 3], dark: [Color; 3]) -> Self {
        let mut colors = [Color::BLACK; 9];
        colors[0..3].copy_from_slice(&light);
        colors[3..6].copy_from_slice(&mid);
        colors[6..9].copy_from_slice(&dark);
        Self { colors }
    }

    /// Build a palette from up to three colors per band, padding each band
    /// with the per-key fallback literals.
    pub fn from_bands(light: &[Color], mid: &[Color], dark: &[Color]) -> Self {
        let mut colors = FALLBACK_COLORS;
        for (band, given) in [
            (ToneBand::Light, light),
            (ToneBand::Mid, mid),
            (ToneBand::Dark, dark),
        ] {
            for (i, color) in given.iter().take(3).enumerate() {
                colors[band.offset() + i] = *color;
            }
        }
        Self { colors }
    }

    pub fn uniform(color: Color) -> Self {
        Self { colors: [color; 9] }
    }

    pub fn fallback() -> Self {
        Self {
            colors: FALLBACK_COLORS,
        }
    }

    pub fn get(&self, key: PaletteKey) -> Color {
        self.colors[key.index()]
    }

    pub fn hex(&self, key: PaletteKey) -> String {
        self.get(key).to_hex()
    }

    pub fn band(&self, band: ToneBand) -> [Color; 3] {
        let o = band.offset();
        [self.colors[o], self.colors[o + 1], self.colors[o + 2]]
    }

    /// Iterate over the slots in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (PaletteKey, Color)> + '_ {
        PaletteKey::ALL.iter().map(move |&key| (key, self.get(key)))
    }

    /// The display grouping of this palette, one category per tone band.
    pub fn categories(&self) -> [ColorCategory; 3] {
        ToneBand::ALL.map(|band| self.category(band))
    }

    pub fn category(&self, band: ToneBand) -> ColorCategory {
        let swatches = PaletteKey::ALL
            .iter()
            .filter(|key| key.band == band)
            .map(|&key| Swatch {
                name: key.to_string(),
                value: self.hex(key),
                description: key.role(),
            })
            .collect();
        ColorCategory {
            band,
            name: band.title(),
            description: band.description(),
            swatches,
        }
    }
}

impl Default for ColorPaletteData {
    fn default() -> Self {
        Self::fallback()
    }
}

impl Serialize for ColorPaletteData {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(9))?;
        for (key, color) in self.iter() {
            map.serialize_entry(&key.to_string(), &color.to_hex())?;
        }
        map.end()
    }
}

/// A single named swatch within a category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Swatch {
    pub name: String,
    pub value: String,
    pub description: &'static str,
}

/// A described group of three swatches, derived from a palette for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorCategory {
    pub band: ToneBand,
    pub name: &'static str,
    pub description: &'static str,
    pub swatches: Vec<Swatch>,
}
