use std::io::Write;

use anyhow::Result;
use crossterm::queue;
use crossterm::style::{Color as TermColor, Print, ResetColor, SetBackgroundColor, SetForegroundColor};

use crate::color::Color;
use crate::theme::ColorPaletteData;

fn term_color(c: Color) -> TermColor {
    TermColor::Rgb {
        r: c.r,
        g: c.g,
        b: c.b,
    }
}

/// Write a colored preview of the palette: one line per tone band with the
/// slot name printed on its own color.
pub fn write_preview(out: &mut impl Write, palette: &ColorPaletteData) -> Result<()> {
    for category in palette.categories() {
        queue!(out, Print(format!("{:<12}", category.name)))?;
        for swatch in &category.swatches {
            let color = Color::from_hex(&swatch.value)?;
            let fg = if Color::contrast_ratio(&color, &Color::BLACK)
                >= Color::contrast_ratio(&color, &Color::WHITE)
            {
                Color::BLACK
            } else {
                Color::WHITE
            };
            queue!(
                out,
                SetBackgroundColor(term_color(color)),
                SetForegroundColor(term_color(fg)),
                Print(format!(" {} {} ", swatch.name, swatch.value)),
                ResetColor,
                Print(" "),
            )?;
        }
        queue!(out, Print("\n"))?;
    }
    out.flush()?;
    Ok(())
}
