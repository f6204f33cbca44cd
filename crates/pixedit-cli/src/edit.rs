//! Builds the operation list from the command line and runs it.

use crate::{recipe, Cli};
use anyhow::{Context, Result};
use pixedit_core::PixelBuffer;
use pixedit_io::SaveOptions;
use pixedit_ops::{adjust::mean_intensity, Operation, Pipeline};
use std::path::Path;
use tracing::{debug, info, trace};

/// Load image from path
pub fn load_image(path: &Path) -> Result<PixelBuffer> {
    pixedit_io::load(path).with_context(|| format!("Unable to open image: {}", path.display()))
}

/// Save image to path
pub fn save_image(path: &Path, buffer: &PixelBuffer, quality: u8) -> Result<()> {
    pixedit_io::save_with(path, buffer, SaveOptions { jpeg_quality: quality })
        .with_context(|| format!("Unable to save image: {}", path.display()))
}

/// Filters first, then adjustments, then recipe steps.
pub fn build_plan(cli: &Cli) -> Result<Vec<Operation>> {
    let mut ops = Vec::with_capacity(cli.filter.len() + cli.adjust.len() / 2);

    for name in &cli.filter {
        ops.push(Operation::filter(name, cli.strength).with_context(|| format!("--filter {name}"))?);
    }

    for pair in cli.adjust.chunks_exact(2) {
        let (kind, raw) = (&pair[0], &pair[1]);
        let value: f64 = raw
            .parse()
            .with_context(|| format!("--adjust {kind}: '{raw}' is not a number"))?;
        ops.push(Operation::adjust(kind, value).with_context(|| format!("--adjust {kind} {raw}"))?);
    }

    if let Some(path) = &cli.recipe {
        ops.extend(recipe::load(path)?);
    }

    debug!(steps = ops.len(), "plan built");
    Ok(ops)
}

/// One-line description of a buffer.
pub fn summary(buffer: &PixelBuffer, applied: usize) -> String {
    format!(
        "{}x{} {}, mean intensity {:.3}, {} operation(s) applied",
        buffer.width(),
        buffer.height(),
        buffer.mode(),
        mean_intensity(buffer),
        applied
    )
}

pub fn run(cli: &Cli) -> Result<()> {
    trace!(image = %cli.image.display(), "edit::run");

    // Resolve every name before touching the file system.
    let ops = build_plan(cli)?;

    let buffer = load_image(&cli.image)?;
    info!(w = buffer.width(), h = buffer.height(), mode = %buffer.mode(), "loaded");

    let mut pipeline = Pipeline::new(buffer);
    pipeline.run(&ops).context("Processing failed")?;

    let applied = pipeline.applied();
    let result = pipeline.into_buffer();
    match &cli.save {
        Some(path) => {
            save_image(path, &result, cli.quality)?;
            info!(path = %path.display(), applied, "saved");
        }
        None => println!("{}", summary(&result, applied)),
    }

    Ok(())
}
