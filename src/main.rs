//! `pixel_image` example runner: inverts the colours of an RGB image.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pixel_image::{Image, Pixel, Rgb, SaveOptions};

/// Load an image, invert its colour channels and save the result.
#[derive(Parser, Debug)]
#[command(name = "pixel_image")]
#[command(version, about, long_about = None)]
struct Args {
    /// Input image path.
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output image path; the extension selects the format (bmp, png, jpg, pgm).
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// JPEG quality (1-100).
    #[arg(short, long, default_value = "100", value_name = "INT")]
    quality: u8,

    /// Never write an alpha channel, even if the input had one.
    #[arg(long)]
    no_alpha: bool,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let log_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("pixel_image={log_level}").into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    if let Err(err) = run(&args) {
        tracing::error!("{err:#}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

fn run(args: &Args) -> Result<()> {
    let image = Image::<Rgb, u8>::open(&args.input)
        .with_context(|| format!("Failed to read {}", args.input.display()))?;
    tracing::info!(
        width = image.width(),
        height = image.height(),
        channels = image.channel_count(),
        "Loaded input"
    );

    let inverted = image.map(|pixel| {
        Pixel::<Rgb, u8>::with_alpha(
            u8::MAX - pixel.r(),
            u8::MAX - pixel.g(),
            u8::MAX - pixel.b(),
            pixel.alpha(),
        )
    });

    let options = SaveOptions {
        alpha: !args.no_alpha && image.channel_count() == 4,
        quality: args.quality,
    };
    inverted
        .save_to_file(&args.output, &options)
        .with_context(|| format!("Failed to save {}", args.output.display()))?;

    tracing::info!(output = %args.output.display(), "Done");
    Ok(())
}
