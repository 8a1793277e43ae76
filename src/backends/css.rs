use std::fmt::Write;

use anyhow::Result;

use crate::pipeline::contrast::{ThemeColors, DEFAULT_MIN_CONTRAST};
use crate::theme::ColorPaletteData;

use super::PaletteExporter;

/// CSS custom properties on `:root`, one per palette slot, plus the derived
/// background and text colors.
pub struct CssExporter;

impl PaletteExporter for CssExporter {
    fn name(&self) -> &str {
        "CSS"
    }

    fn extension(&self) -> &str {
        "css"
    }

    fn serialize(&self, palette: &ColorPaletteData) -> Result<String> {
        let theme = ThemeColors::derive(palette, DEFAULT_MIN_CONTRAST);

        let mut out = String::from(":root {\n");
        for (key, color) in palette.iter() {
            writeln!(out, "  --{key}: {color};")?;
        }
        writeln!(out, "  --background: {};", theme.background)?;
        writeln!(out, "  --text-primary: {};", theme.text.primary)?;
        writeln!(out, "  --text-secondary: {};", theme.text.secondary)?;
        writeln!(out, "  --text-tertiary: {};", theme.text.tertiary)?;
        out.push_str("}\n");
        Ok(out)
    }
}
