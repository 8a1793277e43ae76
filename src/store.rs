use std::path::Path;
use std::sync::mpsc::{channel, Receiver, Sender};

use anyhow::Result;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use tracing::{debug, info};

use crate::pipeline::extract::{extract_palette_from_bytes, read_image, ExtractOptions};
use crate::pipeline::generate::generate_algorithmic_palette;
use crate::theme::{ColorCategory, ColorPaletteData, ToneBand};

/// Holds the one current palette and tells subscribers when it changes.
///
/// The store is the single writer: every update goes through `&mut self`.
/// Subscribers receive a copy of each new palette over a channel; dropped
/// receivers are pruned on the next publish.
pub struct PaletteStore {
    current: ColorPaletteData,
    source_image: Option<Vec<u8>>,
    options: ExtractOptions,
    rng: Box<dyn RngCore + Send>,
    subscribers: Vec<Sender<ColorPaletteData>>,
}

impl PaletteStore {
    /// A store with an entropy-seeded random source.
    pub fn new(options: ExtractOptions) -> Self {
        Self::with_rng(options, StdRng::from_entropy())
    }

    /// A store whose random choices are reproducible.
    pub fn with_seed(options: ExtractOptions, seed: u64) -> Self {
        Self::with_rng(options, StdRng::seed_from_u64(seed))
    }

    pub fn with_rng(options: ExtractOptions, rng: impl RngCore + Send + 'static) -> Self {
        Self {
            current: ColorPaletteData::default(),
            source_image: None,
            options,
            rng: Box::new(rng),
            subscribers: Vec::new(),
        }
    }

    pub fn current(&self) -> ColorPaletteData {
        self.current
    }

    pub fn category(&self, band: ToneBand) -> ColorCategory {
        self.current.category(band)
    }

    pub fn categories(&self) -> [ColorCategory; 3] {
        self.current.categories()
    }

    /// Bytes of the image the current palette was extracted from, if any.
    pub fn source_image(&self) -> Option<&[u8]> {
        self.source_image.as_deref()
    }

    pub fn subscribe(&mut self) -> Receiver<ColorPaletteData> {
        let (tx, rx) = channel();
        self.subscribers.push(tx);
        rx
    }

    /// Replace the current palette and notify subscribers.
    pub fn set_palette(&mut self, palette: ColorPaletteData) {
        self.current = palette;
        self.subscribers.retain(|tx| tx.send(palette).is_ok());
        debug!(subscribers = self.subscribers.len(), "palette published");
    }

    /// Replace the palette with a freshly generated algorithmic one.
    pub fn generate(&mut self) -> ColorPaletteData {
        let palette = generate_algorithmic_palette(&mut self.rng);
        self.source_image = None;
        self.set_palette(palette);
        palette
    }

    /// Extract a palette from image bytes and keep the bytes for
    /// [`PaletteStore::regenerate`]. On a decode error nothing changes.
    pub fn extract_from_bytes(&mut self, bytes: Vec<u8>) -> Result<ColorPaletteData> {
        let palette = extract_palette_from_bytes(&bytes, &self.options, &mut self.rng)?;
        info!(bytes = bytes.len(), "extracted palette from image");
        self.source_image = Some(bytes);
        self.set_palette(palette);
        Ok(palette)
    }

    pub fn extract_from_path(&mut self, path: &Path) -> Result<ColorPaletteData> {
        let bytes = read_image(path)?;
        self.extract_from_bytes(bytes)
    }

    /// Produce a new palette from the same source: the stored image when
    /// there is one, otherwise the algorithmic generator.
    pub fn regenerate(&mut self) -> Result<ColorPaletteData> {
        match self.source_image.take() {
            Some(bytes) => {
                let result = self.extract_from_bytes(bytes.clone());
                if result.is_err() {
                    self.source_image = Some(bytes);
                }
                result
            }
            None => Ok(self.generate()),
        }
    }

    /// Return to the default palette and forget the source image.
    pub fn reset(&mut self) {
        self.source_image = None;
        self.set_palette(ColorPaletteData::default());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use image::{ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;

    fn png_bytes(img: &RgbaImage) -> Vec<u8> {
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }

    fn store() -> PaletteStore {
        PaletteStore::with_seed(ExtractOptions::default(), 17)
    }

    #[test]
    fn starts_with_default_palette() {
        let store = store();
        assert_eq!(store.current(), ColorPaletteData::default());
        assert!(store.source_image().is_none());
    }

    #[test]
    fn subscribers_see_every_update() {
        let mut store = store();
        let rx = store.subscribe();
        let generated = store.generate();
        let uniform = ColorPaletteData::uniform(Color::new(1, 2, 3));
        store.set_palette(uniform);

        assert_eq!(rx.try_recv().unwrap(), generated);
        assert_eq!(rx.try_recv().unwrap(), uniform);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn dropped_subscribers_are_pruned() {
        let mut store = store();
        let rx = store.subscribe();
        drop(rx);
        store.generate();
        assert!(store.subscribers.is_empty());
    }

    #[test]
    fn extraction_keeps_source_for_regenerate() {
        let mut store = store();
        let img = RgbaImage::from_fn(12, 12, |x, y| Rgba([(x * 20) as u8, (y * 20) as u8, 60, 255]));
        let bytes = png_bytes(&img);

        store.extract_from_bytes(bytes.clone()).unwrap();
        assert_eq!(store.source_image(), Some(bytes.as_slice()));

        store.regenerate().unwrap();
        assert_eq!(store.source_image(), Some(bytes.as_slice()));
    }

    #[test]
    fn decode_failure_leaves_state_untouched() {
        let mut store = store();
        let before = store.generate();
        assert!(store.extract_from_bytes(b"garbage".to_vec()).is_err());
        assert_eq!(store.current(), before);
        assert!(store.source_image().is_none());
    }

    #[test]
    fn regenerate_without_image_uses_generator() {
        let mut store = store();
        let palette = store.regenerate().unwrap();
        assert_eq!(store.current(), palette);
        assert!(store.source_image().is_none());
    }

    #[test]
    fn transparent_upload_publishes_gray() {
        let mut store = store();
        let img = RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 0]));
        let palette = store.extract_from_bytes(png_bytes(&img)).unwrap();
        assert_eq!(palette, ColorPaletteData::uniform(crate::theme::NEUTRAL_GRAY));
    }

    #[test]
    fn reset_restores_default() {
        let mut store = store();
        store.generate();
        store.reset();
        assert_eq!(store.current(), ColorPaletteData::default());
        assert_eq!(store.category(ToneBand::Dark).name, "Dark Tones");
    }
}
