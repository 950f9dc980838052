//! # npyfile
//!
//! A command-line tool for streaming array frames into NumPy `.npy` files.
//!
//! ## Usage
//!
//! ```bash
//! # Stack raw little-endian u16 frames into one file
//! npyfile stack frame_*.raw -o capture.npy --dtype '<u2' --shape 480,640
//!
//! # Simulate a live capture
//! npyfile demo capture.npy --frames 500
//! ```

use anyhow::Result;
use clap::Parser;

mod cli;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli::init_logging(cli.verbosity());
    cli::dispatch(cli)
}
