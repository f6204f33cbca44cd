//! pixedit - apply filters and tonal adjustments to an image
//!
//! Loads one PNG or JPEG, runs the requested operations in order and saves
//! the result or prints a summary of it.

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod edit;
mod recipe;

#[derive(Parser, Debug)]
#[command(name = "pixedit")]
#[command(author, version, about = "Apply filters and adjustments to an image")]
#[command(long_about = "
Applies convolution filters and tonal adjustments to a PNG or JPEG image.

Filters run first in the order given, then adjustments, then recipe steps.

Filters:      blur, edge_detection, sharpen
Adjustments:  brightness (offset), contrast (factor >= 0), saturation (factor >= 0)

Examples:
  pixedit --image in.png --filter blur --strength 2 --save out.png
  pixedit --image in.jpg --adjust brightness -20 --adjust contrast 1.5 --save out.jpg
  pixedit --image in.png --filter edge_detection --save edges.png
  pixedit --image in.png --recipe look.yaml --save out.jpg --quality 85
  pixedit --image in.png --adjust saturation 0
")]
pub struct Cli {
    /// Input image (PNG or JPEG)
    #[arg(long, value_name = "PATH")]
    pub image: PathBuf,

    /// Filter to apply; repeatable
    #[arg(long, value_name = "NAME", action = ArgAction::Append)]
    pub filter: Vec<String>,

    /// Times each --filter is applied
    #[arg(long, default_value_t = 1, allow_negative_numbers = true)]
    pub strength: i64,

    /// Adjustment to apply; repeatable
    #[arg(
        long,
        num_args = 2,
        value_names = ["KIND", "VALUE"],
        action = ArgAction::Append,
        allow_negative_numbers = true
    )]
    pub adjust: Vec<String>,

    /// YAML recipe with further steps
    #[arg(long, value_name = "FILE")]
    pub recipe: Option<PathBuf>,

    /// Output path; format from the extension
    #[arg(long, value_name = "PATH")]
    pub save: Option<PathBuf>,

    /// JPEG quality (1-100)
    #[arg(long, default_value_t = pixedit_io::DEFAULT_JPEG_QUALITY,
          value_parser = clap::value_parser!(u8).range(1..=100))]
    pub quality: u8,

    /// Verbose output (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Number of threads (0 = auto)
    #[arg(short = 'j', long, default_value = "0")]
    pub threads: usize,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // Configure thread pool
    if cli.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(cli.threads)
            .build_global()
            .context("Failed to configure thread pool")?;
    }

    edit::run(&cli)
}
