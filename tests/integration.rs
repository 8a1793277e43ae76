use std::path::{Path, PathBuf};
use std::process::Command;

use image::{Rgba, RgbaImage};
use rand::rngs::StdRng;
use rand::SeedableRng;

use swatchbook::pipeline::extract::{
    extract_palette_from_image, extract_palette_from_pixels, ExtractOptions,
};
use swatchbook::pipeline::kmeans::kmeans;
use swatchbook::theme::NEUTRAL_GRAY;
use swatchbook::{
    generate_algorithmic_palette, get_contrast_ratio, Color, ColorPaletteData, PaletteKey,
    PaletteStore, ToneBand,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn fixture_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
}

fn corners_image() -> RgbaImage {
    let mut img = RgbaImage::new(2, 2);
    img.put_pixel(0, 0, Rgba([255, 0, 0, 255]));
    img.put_pixel(1, 0, Rgba([0, 255, 0, 255]));
    img.put_pixel(0, 1, Rgba([0, 0, 255, 255]));
    img.put_pixel(1, 1, Rgba([0, 0, 0, 255]));
    img
}

fn create_photo(path: &Path) {
    let img = image::RgbImage::from_fn(96, 64, |x, y| {
        let r = 40 + ((x * 180) / 96) as u8;
        let g = 30 + ((y * 150) / 64) as u8;
        let b = 60 + (((x + y) * 90) / 160) as u8;
        image::Rgb([r, g, b])
    });
    img.save(path).unwrap();
}

fn create_transparent(path: &Path) {
    RgbaImage::from_pixel(16, 16, Rgba([30, 200, 90, 0]))
        .save(path)
        .unwrap();
}

fn ensure_fixtures() {
    let dir = fixture_dir();
    std::fs::create_dir_all(&dir).unwrap();

    let photo = dir.join("photo.png");
    if !photo.exists() {
        create_photo(&photo);
    }
    let transparent = dir.join("transparent.png");
    if !transparent.exists() {
        create_transparent(&transparent);
    }
    let text = dir.join("not_an_image.txt");
    if !text.exists() {
        std::fs::write(&text, "this is not an image").unwrap();
    }
}

fn is_hex(value: &str) -> bool {
    value.len() == 7 && value.starts_with('#') && value[1..].chars().all(|c| c.is_ascii_hexdigit())
}

fn assert_valid_palette(palette: &ColorPaletteData) {
    let json = serde_json::to_value(palette).unwrap();
    let object = json.as_object().unwrap();
    assert_eq!(object.len(), 9);
    for key in PaletteKey::ALL {
        let value = object[&key.to_string()].as_str().unwrap();
        assert!(is_hex(value), "{key} has invalid hex {value}");
    }
}

// ---------------------------------------------------------------------------
// Library behaviour
// ---------------------------------------------------------------------------

#[test]
fn four_corner_image_yields_full_palette_with_dark_entry() {
    let img = corners_image();
    for seed in 0..25 {
        let palette = extract_palette_from_pixels(&img, 9, &mut StdRng::seed_from_u64(seed));
        assert_valid_palette(&palette);
        let darkest = palette
            .band(ToneBand::Dark)
            .iter()
            .map(|c| c.to_lab().l)
            .fold(f32::INFINITY, f32::min);
        assert!(darkest <= 40.5, "seed {seed}: darkest dark entry has L {darkest}");
    }
}

#[test]
fn transparent_image_file_yields_gray_fallback() {
    ensure_fixtures();
    let palette = extract_palette_from_image(
        &fixture_dir().join("transparent.png"),
        &ExtractOptions::default(),
        &mut StdRng::seed_from_u64(1),
    )
    .unwrap();
    for (key, color) in palette.iter() {
        assert_eq!(color, NEUTRAL_GRAY, "{key}");
    }
}

#[test]
fn photo_extraction_is_reproducible_with_seed() {
    ensure_fixtures();
    let path = fixture_dir().join("photo.png");
    let options = ExtractOptions::default();
    let a = extract_palette_from_image(&path, &options, &mut StdRng::seed_from_u64(8)).unwrap();
    let b = extract_palette_from_image(&path, &options, &mut StdRng::seed_from_u64(8)).unwrap();
    assert_eq!(a, b);
    assert_valid_palette(&a);
}

#[test]
fn missing_image_is_an_error() {
    let result = extract_palette_from_image(
        Path::new("/nonexistent/image.png"),
        &ExtractOptions::default(),
        &mut StdRng::seed_from_u64(1),
    );
    assert!(result.unwrap_err().to_string().contains("file not found"));
}

#[test]
fn kmeans_single_color_gives_equal_centroids() {
    let lab = Color::new(12, 140, 200).to_lab();
    let result = kmeans(&vec![lab; 64], 9, 10, &mut StdRng::seed_from_u64(2));
    assert_eq!(result.centroids.len(), 9);
    for centroid in result.centroids {
        assert!((centroid.l - lab.l).abs() < 1e-3);
        assert!((centroid.a - lab.a).abs() < 1e-3);
        assert!((centroid.b - lab.b).abs() < 1e-3);
    }
}

#[test]
fn store_regenerates_from_uploaded_image() {
    ensure_fixtures();
    let mut store = PaletteStore::with_seed(ExtractOptions::default(), 99);
    let updates = store.subscribe();

    let first = store
        .extract_from_path(&fixture_dir().join("photo.png"))
        .unwrap();
    let second = store.regenerate().unwrap();

    assert_eq!(updates.try_recv().unwrap(), first);
    assert_eq!(updates.try_recv().unwrap(), second);
    assert!(store.source_image().is_some());
    assert_eq!(store.category(ToneBand::Light).swatches.len(), 3);
}

#[test]
fn generated_palette_round_trips_through_json() {
    let palette = generate_algorithmic_palette(&mut StdRng::seed_from_u64(21));
    assert_valid_palette(&palette);
    let json = serde_json::to_value(palette).unwrap();
    for (key, color) in palette.iter() {
        assert_eq!(json[key.to_string()], color.to_hex());
    }
}

#[test]
fn contrast_extremes() {
    assert_eq!(get_contrast_ratio("#FFFFFF", "#000000").unwrap(), 21.0);
    assert_eq!(get_contrast_ratio("#3A7BD5", "#3A7BD5").unwrap(), 1.0);
}

// ---------------------------------------------------------------------------
// CLI integration tests (run the actual binary)
// ---------------------------------------------------------------------------

fn cargo_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_swatchbook"))
}

#[test]
fn cli_generate_prints_json_palette() {
    let output = Command::new(cargo_bin())
        .args(["generate", "--seed", "5"])
        .output()
        .expect("failed to run binary");

    assert!(output.status.success(), "binary exited with error");
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let object = value.as_object().unwrap();
    assert_eq!(object.len(), 9);
    assert!(object.values().all(|v| is_hex(v.as_str().unwrap())));
}

#[test]
fn cli_seed_makes_output_stable() {
    ensure_fixtures();
    let run = || {
        Command::new(cargo_bin())
            .args([
                "extract",
                fixture_dir().join("photo.png").to_str().unwrap(),
                "--seed",
                "77",
            ])
            .output()
            .expect("failed to run binary")
    };
    let a = run();
    let b = run();
    assert!(a.status.success());
    assert_eq!(a.stdout, b.stdout);
}

#[test]
fn cli_css_output_flag_writes_file() {
    let tmp = std::env::temp_dir().join("swatchbook-test-cli-output");
    std::fs::create_dir_all(&tmp).unwrap();
    let out_path = tmp.join("palette.css");

    let output = Command::new(cargo_bin())
        .args([
            "generate",
            "--format",
            "css",
            "--output",
            out_path.to_str().unwrap(),
        ])
        .output()
        .expect("failed to run binary");

    assert!(output.status.success());
    let content = std::fs::read_to_string(&out_path).unwrap();
    assert!(content.starts_with(":root {"));
    assert!(content.contains("--dark-1: #"));

    std::fs::remove_dir_all(&tmp).unwrap();
}

#[test]
fn cli_output_without_extension_gets_format_extension() {
    let tmp = std::env::temp_dir().join("swatchbook-test-cli-extension");
    std::fs::create_dir_all(&tmp).unwrap();
    let bare = tmp.join("palette");

    let output = Command::new(cargo_bin())
        .args(["generate", "--format", "css", "-o", bare.to_str().unwrap()])
        .output()
        .expect("failed to run binary");

    assert!(output.status.success());
    let content = std::fs::read_to_string(tmp.join("palette.css")).unwrap();
    assert!(content.starts_with(":root {"));

    std::fs::remove_dir_all(&tmp).unwrap();
}

#[test]
fn cli_rejects_fewer_clusters_than_bands() {
    let output = Command::new(cargo_bin())
        .args(["extract", "whatever.png", "-k", "1"])
        .output()
        .expect("failed to run binary");

    assert!(!output.status.success());
}

#[test]
fn cli_contrast_reports_adjusted_color() {
    let output = Command::new(cargo_bin())
        .args(["contrast", "#AAAAAA", "#FFFFFF", "--ratio", "4.5"])
        .output()
        .expect("failed to run binary");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let mut parts = stdout.split_whitespace();
    let hex = parts.next().unwrap();
    let ratio: f64 = parts.next().unwrap().parse().unwrap();
    assert!(is_hex(hex));
    assert!(ratio >= 4.5, "ratio {ratio}");
}

#[test]
fn cli_help_output() {
    let output = Command::new(cargo_bin())
        .arg("--help")
        .output()
        .expect("failed to run binary");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("swatchbook"));
    assert!(stdout.contains("extract"));
    assert!(stdout.contains("--seed"));
    assert!(stdout.contains("--format"));
}

#[test]
fn cli_file_not_found_error() {
    let output = Command::new(cargo_bin())
        .args(["extract", "/nonexistent/image.png"])
        .output()
        .expect("failed to run binary");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("file not found"),
        "expected file-not-found error, got: {stderr}"
    );
}

#[test]
fn cli_unsupported_format_error() {
    ensure_fixtures();
    let output = Command::new(cargo_bin())
        .arg("extract")
        .arg(fixture_dir().join("not_an_image.txt"))
        .output()
        .expect("failed to run binary");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("unsupported"),
        "expected unsupported format error, got: {stderr}"
    );
}
