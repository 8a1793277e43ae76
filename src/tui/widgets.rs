use ratatui::prelude::*;
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::color::Color as AppColor;
use crate::theme::{ColorPaletteData, PaletteKey};

const SWATCH_WIDTH: usize = 11;

/// A widget that renders the nine-color palette as one row of swatches per
/// tone band. Highlights the currently selected slot.
pub struct PaletteWidget<'a> {
    palette: &'a ColorPaletteData,
    selected: Option<usize>,
}

impl<'a> PaletteWidget<'a> {
    pub fn new(palette: &'a ColorPaletteData, selected: Option<usize>) -> Self {
        Self { palette, selected }
    }
}

fn to_color(c: &AppColor) -> Color {
    Color::Rgb(c.r, c.g, c.b)
}

/// Choose black or white foreground for readable text on the given background.
fn contrast_fg(c: &AppColor) -> Color {
    if AppColor::contrast_ratio(c, &AppColor::BLACK) >= AppColor::contrast_ratio(c, &AppColor::WHITE)
    {
        Color::Black
    } else {
        Color::White
    }
}

/// Build a row of three swatches for one band, each labeled with its key.
fn build_swatch_row(
    palette: &ColorPaletteData,
    keys: &[PaletteKey],
    start: usize,
    selected: Option<usize>,
) -> Line<'static> {
    let mut spans = vec![Span::raw("  ")];
    for (offset, key) in keys.iter().enumerate() {
        let c = palette.get(*key);
        let mut style = Style::default().bg(to_color(&c)).fg(contrast_fg(&c));
        if selected == Some(start + offset) {
            style = style.add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
        }
        spans.push(Span::styled(
            format!("{:^width$}", key.to_string(), width = SWATCH_WIDTH),
            style,
        ));
        spans.push(Span::raw(" "));
    }
    Line::from(spans)
}

/// Build the hex labels shown below a swatch row.
fn build_hex_row(palette: &ColorPaletteData, keys: &[PaletteKey]) -> Line<'static> {
    let mut spans = vec![Span::raw("  ")];
    for key in keys {
        spans.push(Span::styled(
            format!("{:^width$}", palette.hex(*key), width = SWATCH_WIDTH),
            Style::default().fg(Color::DarkGray),
        ));
        spans.push(Span::raw(" "));
    }
    Line::from(spans)
}

impl Widget for PaletteWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::bordered().title("Palette");
        let inner = block.inner(area);
        block.render(area, buf);

        let mut lines = Vec::new();
        for (band_index, category) in self.palette.categories().iter().enumerate() {
            let keys = &PaletteKey::ALL[band_index * 3..band_index * 3 + 3];
            lines.push(Line::from(format!("  {}", category.name)));
            lines.push(build_swatch_row(
                self.palette,
                keys,
                band_index * 3,
                self.selected,
            ));
            lines.push(build_hex_row(self.palette, keys));
            lines.push(Line::from(""));
        }

        // Info line for the selected slot, measured against the main background.
        if let Some(key) = self.selected.and_then(|i| PaletteKey::ALL.get(i).copied()) {
            let color = self.palette.get(key);
            let background = self.palette.get(PaletteKey::ALL[0]);
            let ratio = AppColor::contrast_ratio(&color, &background);
            lines.push(Line::from(vec![
                Span::raw("  "),
                Span::styled(
                    format!("  {key}  "),
                    Style::default().bg(to_color(&color)).fg(contrast_fg(&color)),
                ),
                Span::raw(format!(
                    "  {}  {}  contrast on light-1 {ratio:.1}:1",
                    key.role(),
                    color.to_hex(),
                )),
            ]));
        }

        Paragraph::new(lines).render(inner, buf);
    }
}
