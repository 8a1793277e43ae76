pub mod css;
pub mod json;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::theme::ColorPaletteData;

pub use css::CssExporter;
pub use json::JsonExporter;

/// A text format the palette can be written out as.
pub trait PaletteExporter {
    /// Human-readable format name.
    fn name(&self) -> &str;

    /// Conventional file extension, without the dot.
    fn extension(&self) -> &str;

    fn serialize(&self, palette: &ColorPaletteData) -> Result<String>;

    /// `path` with this format's extension added when it has none.
    fn output_path(&self, path: &Path) -> PathBuf {
        if path.extension().is_some() {
            path.to_path_buf()
        } else {
            path.with_extension(self.extension())
        }
    }

    /// Write the serialized palette to `path`.
    fn write_to(&self, palette: &ColorPaletteData, path: &Path) -> Result<()> {
        let content = self.serialize(palette)?;
        std::fs::write(path, content)
            .with_context(|| format!("failed to write {} palette to {}", self.name(), path.display()))
    }
}

/// Selectable export formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ExportFormat {
    #[default]
    Json,
    Css,
}

impl ExportFormat {
    pub fn exporter(self) -> Box<dyn PaletteExporter> {
        match self {
            ExportFormat::Json => Box::new(JsonExporter),
            ExportFormat::Css => Box::new(CssExporter),
        }
    }
}
