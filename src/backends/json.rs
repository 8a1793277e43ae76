use anyhow::{Context, Result};

use crate::theme::ColorPaletteData;

use super::PaletteExporter;

/// Pretty-printed JSON object keyed `light-1` .. `dark-3`.
pub struct JsonExporter;

impl PaletteExporter for JsonExporter {
    fn name(&self) -> &str {
        "JSON"
    }

    fn extension(&self) -> &str {
        "json"
    }

    fn serialize(&self, palette: &ColorPaletteData) -> Result<String> {
        let mut out =
            serde_json::to_string_pretty(palette).context("failed to serialize palette as JSON")?;
        out.push('\n');
        Ok(out)
    }
}
