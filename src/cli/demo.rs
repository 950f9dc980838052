use anyhow::{bail, Context, Result};
use log::info;
use std::path::PathBuf;

use npyfile::path::npy_path;
use npyfile::slice::TypedSlice;
use npyfile::writer::NpyWriter;

/// Simulate a camera capture loop and stream the frames to disk
pub fn run(output: PathBuf, frames: usize, height: usize, width: usize) -> Result<()> {
    if height == 0 || width == 0 {
        bail!("Frame size must be non-zero, got {}x{}", height, width);
    }

    let output = npy_path(output);
    info!("npyfile - Capture Demo");
    info!("======================");
    info!("Output: {}", output.display());
    info!("Capturing {} frames of {}x{} u16 pixels", frames, height, width);

    let mut writer = NpyWriter::create(&output).context("Failed to create npy writer")?;

    let mut frame = vec![0u16; height * width];
    for t in 0..frames {
        render_frame(&mut frame, t, height, width);
        let slice = TypedSlice::row_major(&frame, vec![height, width])?;
        writer.write(&slice).context("Failed to write frame")?;

        if (t + 1) % 25 == 0 {
            info!("  Captured {} frames...", t + 1);
        }
    }

    let stats = writer.close().context("Failed to finalize npy file")?;

    info!("Capture complete!");
    info!("  Output file: {}", output.display());
    info!("  {}", stats);
    info!("Load with: numpy.load({:?})", output.display().to_string());

    Ok(())
}

/// A bright spot drifting across a horizontal gradient
fn render_frame(frame: &mut [u16], t: usize, height: usize, width: usize) {
    let cx = (t * 3) % width;
    let cy = (t * 2) % height;
    for (i, row) in frame.chunks_exact_mut(width).enumerate() {
        for (j, pixel) in row.iter_mut().enumerate() {
            let gradient = (j * 1024 / width) as u16;
            let d2 = i.abs_diff(cy).pow(2) + j.abs_diff(cx).pow(2);
            let spot = if d2 < 16 { 40_000 } else { 0 };
            *pixel = gradient.saturating_add(spot);
        }
    }
}
