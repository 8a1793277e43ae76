use std::io::Write;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use swatchbook::cli::{Args, Command};
use swatchbook::pipeline::contrast::adjust_color_for_contrast;
use swatchbook::pipeline::extract::ExtractOptions;
use swatchbook::preview::write_preview;
use swatchbook::store::PaletteStore;
use swatchbook::tui::{self, TuiApp};
use swatchbook::Color;

fn main() -> Result<()> {
    let args = Args::parse();

    let filter = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let options = match &args.command {
        Command::Contrast {
            foreground,
            background,
            ratio,
            tier,
        } => return run_contrast(foreground, background, *ratio, *tier),
        Command::Generate => ExtractOptions::default(),
        Command::Extract {
            colors, max_dim, ..
        } => ExtractOptions {
            num_colors: *colors,
            max_dim: *max_dim,
        },
    };

    let mut store = match args.seed {
        Some(seed) => PaletteStore::with_seed(options, seed),
        None => PaletteStore::new(options),
    };
    let palette = match &args.command {
        Command::Extract { image, .. } => store.extract_from_path(image)?,
        _ => store.generate(),
    };

    let exporter = args.format.exporter();
    match &args.output {
        Some(path) => {
            let path = exporter.output_path(path);
            exporter.write_to(&palette, &path)?;
            info!(path = %path.display(), format = exporter.name(), "palette written");
        }
        None => {
            let content = exporter.serialize(&palette)?;
            std::io::stdout()
                .write_all(content.as_bytes())
                .context("failed to write palette to stdout")?;
        }
    }

    if args.preview {
        write_preview(&mut std::io::stderr(), &palette)?;
    }

    if args.tui {
        tui::run(TuiApp::new(store))?;
    }

    Ok(())
}

fn run_contrast(
    foreground: &str,
    background: &str,
    ratio: f64,
    tier: swatchbook::ContrastTier,
) -> Result<()> {
    let fg = Color::from_hex(foreground).context("invalid foreground color")?;
    let bg = Color::from_hex(background).context("invalid background color")?;
    let adjusted = adjust_color_for_contrast(fg, bg, ratio, tier);
    let achieved = Color::contrast_ratio(&adjusted, &bg);
    println!("{adjusted} {achieved:.2}");
    if achieved < tier.target_ratio(ratio) {
        info!(
            required = tier.target_ratio(ratio),
            achieved, "contrast target not reachable, printed closest color"
        );
    }
    Ok(())
}
