use anyhow::{bail, Result};
use palette::{FromColor, Hsl, IntoColor, Lab, Srgb};

/// Core color type used throughout the crate.
/// Wraps sRGB u8 components and provides conversions to Lab and HSL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0 };
    pub const WHITE: Color = Color {
        r: 255,
        g: 255,
        b: 255,
    };

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a hex color string like `#ff8800` or `FF8800`.
    pub fn from_hex(hex: &str) -> Result<Self> {
        let digits = hex.trim();
        let digits = digits.strip_prefix('#').unwrap_or(digits);
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            bail!("invalid hex color {hex:?}: expected 6 hex digits");
        }
        let r = u8::from_str_radix(&digits[0..2], 16)?;
        let g = u8::from_str_radix(&digits[2..4], 16)?;
        let b = u8::from_str_radix(&digits[4..6], 16)?;
        Ok(Self { r, g, b })
    }

    /// Serialize to uppercase hex `#RRGGBB`.
    pub fn to_hex(self) -> String {
        rgb_to_hex(self.r, self.g, self.b)
    }

    pub fn to_srgb_u8(self) -> Srgb<u8> {
        Srgb::new(self.r, self.g, self.b)
    }

    fn to_srgb_f32(self) -> Srgb<f32> {
        self.to_srgb_u8().into_format()
    }

    /// Convert to CIELAB (D65) for clustering and refinement.
    pub fn to_lab(self) -> Lab {
        self.to_srgb_f32().into_color()
    }

    /// Create from CIELAB. Out-of-gamut channels are clamped.
    pub fn from_lab(lab: Lab) -> Self {
        let srgb: Srgb<f32> = Srgb::from_color(lab);
        Self::from_srgb_f32_clamped(srgb)
    }

    /// Convert to HSL (hue in degrees, saturation and lightness in [0, 1]).
    pub fn to_hsl(self) -> Hsl {
        self.to_srgb_f32().into_color()
    }

    pub fn from_hsl(hsl: Hsl) -> Self {
        let srgb: Srgb<f32> = Srgb::from_color(hsl);
        Self::from_srgb_f32_clamped(srgb)
    }

    /// Clamp an Srgb<f32> to [0, 1] and convert to Color.
    fn from_srgb_f32_clamped(srgb: Srgb<f32>) -> Self {
        let r = (srgb.red.clamp(0.0, 1.0) * 255.0).round() as u8;
        let g = (srgb.green.clamp(0.0, 1.0) * 255.0).round() as u8;
        let b = (srgb.blue.clamp(0.0, 1.0) * 255.0).round() as u8;
        Self { r, g, b }
    }

    /// WCAG 2.1 relative luminance.
    pub fn relative_luminance(self) -> f64 {
        fn linearize(c: u8) -> f64 {
            let c = c as f64 / 255.0;
            if c <= 0.03928 {
                c / 12.92
            } else {
                ((c + 0.055) / 1.055).powf(2.4)
            }
        }
        0.2126 * linearize(self.r) + 0.7152 * linearize(self.g) + 0.0722 * linearize(self.b)
    }

    /// WCAG contrast ratio between two colors, in [1, 21].
    pub fn contrast_ratio(c1: &Color, c2: &Color) -> f64 {
        let l1 = c1.relative_luminance();
        let l2 = c2.relative_luminance();
        let (lighter, darker) = if l1 > l2 { (l1, l2) } else { (l2, l1) };
        (lighter + 0.05) / (darker + 0.05)
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl std::str::FromStr for Color {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        Color::from_hex(s)
    }
}

pub fn rgb_to_hex(r: u8, g: u8, b: u8) -> String {
    format!("#{r:02X}{g:02X}{b:02X}")
}

/// Contrast ratio between two hex colors.
pub fn get_contrast_ratio(hex_a: &str, hex_b: &str) -> Result<f64> {
    let a = Color::from_hex(hex_a)?;
    let b = Color::from_hex(hex_b)?;
    Ok(Color::contrast_ratio(&a, &b))
}

/// A resolved color carrying both its RGB/hex form and the Lab value it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct PaletteColor {
    pub color: Color,
    pub hex: String,
    pub lab: Lab,
}

impl PaletteColor {
    pub fn from_lab(lab: Lab) -> Self {
        let color = Color::from_lab(lab);
        Self {
            color,
            hex: color.to_hex(),
            lab,
        }
    }

    /// Replace the Lab lightness and recompute the RGB and hex forms.
    pub fn with_lightness(&self, l: f32) -> Self {
        Self::from_lab(Lab::new(l, self.lab.a, self.lab.b))
    }
}
