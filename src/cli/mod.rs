use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Deserialize;
use std::path::PathBuf;

use npyfile::dtype::Endian;
use npyfile::layout::MemoryOrder;

mod config;
mod demo;
mod stack;

use stack::StackArgs;

/// npyfile - Stream array slices into NumPy .npy files
#[derive(Parser)]
#[command(name = "npyfile")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Memory order of the raw input frames.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderArg {
    /// Row-major (C) order
    #[default]
    C,
    /// Column-major (Fortran) order
    #[serde(alias = "fortran")]
    F,
}

impl From<OrderArg> for MemoryOrder {
    fn from(arg: OrderArg) -> Self {
        match arg {
            OrderArg::C => MemoryOrder::RowMajor,
            OrderArg::F => MemoryOrder::ColumnMajor,
        }
    }
}

/// Byte order of the raw input frames.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EndianArg {
    /// Little-endian
    Little,
    /// Big-endian
    Big,
    /// Byte order of this machine
    Native,
}

impl From<EndianArg> for Endian {
    fn from(arg: EndianArg) -> Self {
        match arg {
            EndianArg::Little => Endian::Little,
            EndianArg::Big => Endian::Big,
            EndianArg::Native => Endian::native(),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Stack raw frame files into one .npy file
    Stack {
        /// Raw input files, each holding one or more frames back to back
        #[arg(value_name = "INPUTS", required = true, num_args = 1..)]
        inputs: Vec<PathBuf>,

        /// Output .npy file path (".npy" is appended if missing)
        #[arg(short = 'o', long, value_name = "OUTPUT")]
        output: PathBuf,

        /// Element type, e.g. u16, float32 or <f8
        #[arg(short = 'd', long)]
        dtype: Option<String>,

        /// Per-frame shape, comma separated (e.g. 480,640)
        #[arg(short = 's', long, value_delimiter = ',')]
        shape: Option<Vec<usize>>,

        /// Memory order of each frame
        #[arg(long, value_enum)]
        order: Option<OrderArg>,

        /// Byte order of the input data (overrides any prefix in --dtype)
        #[arg(long, value_enum)]
        endian: Option<EndianArg>,

        /// Load settings from a TOML config file
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,

        // === Advanced tuning flags (hidden from --help) ===
        /// Header dictionary length in bytes (10 + N must be a multiple of 64)
        #[arg(long, hide = true)]
        header_len: Option<u16>,

        /// Write buffer capacity in bytes
        #[arg(long, hide = true)]
        buffer_capacity: Option<usize>,
    },

    /// Simulate a live capture and stream it to a .npy file
    Demo {
        /// Output .npy file path
        #[arg(value_name = "OUTPUT", default_value = "demo_capture.npy")]
        output: PathBuf,

        /// Number of frames to capture
        #[arg(short = 'n', long, default_value = "100")]
        frames: usize,

        /// Frame height in pixels
        #[arg(long, default_value = "48")]
        height: usize,

        /// Frame width in pixels
        #[arg(long, default_value = "64")]
        width: usize,
    },
}

impl Cli {
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }
}

pub fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

pub fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Stack {
            inputs,
            output,
            dtype,
            shape,
            order,
            endian,
            config,
            header_len,
            buffer_capacity,
        } => stack::run(StackArgs {
            inputs,
            output,
            dtype,
            shape,
            order,
            endian,
            config,
            header_len,
            buffer_capacity,
        }),
        Commands::Demo {
            output,
            frames,
            height,
            width,
        } => demo::run(output, frames, height, width),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_stack_command() {
        let cli = Cli::try_parse_from([
            "npyfile", "-vv", "stack", "a.raw", "b.raw", "-o", "out", "--dtype", "u16", "--shape",
            "480,640", "--order", "f", "--endian", "big",
        ])
        .unwrap();

        assert_eq!(cli.verbosity(), 2);
        match cli.command {
            Commands::Stack {
                inputs,
                output,
                dtype,
                shape,
                order,
                endian,
                config,
                ..
            } => {
                assert_eq!(inputs, vec![PathBuf::from("a.raw"), PathBuf::from("b.raw")]);
                assert_eq!(output, PathBuf::from("out"));
                assert_eq!(dtype.as_deref(), Some("u16"));
                assert_eq!(shape, Some(vec![480, 640]));
                assert_eq!(order, Some(OrderArg::F));
                assert_eq!(endian, Some(EndianArg::Big));
                assert!(config.is_none());
            }
            Commands::Demo { .. } => panic!("expected stack command"),
        }
    }

    #[test]
    fn test_stack_requires_inputs() {
        assert!(Cli::try_parse_from(["npyfile", "stack", "-o", "out"]).is_err());
    }

    #[test]
    fn test_demo_defaults() {
        let cli = Cli::try_parse_from(["npyfile", "demo"]).unwrap();
        assert_eq!(cli.verbosity(), 0);
        match cli.command {
            Commands::Demo {
                output,
                frames,
                height,
                width,
            } => {
                assert_eq!(output, PathBuf::from("demo_capture.npy"));
                assert_eq!((frames, height, width), (100, 48, 64));
            }
            Commands::Stack { .. } => panic!("expected demo command"),
        }
    }

    #[test]
    fn test_order_arg_maps_to_memory_order() {
        assert_eq!(MemoryOrder::from(OrderArg::C), MemoryOrder::RowMajor);
        assert_eq!(MemoryOrder::from(OrderArg::F), MemoryOrder::ColumnMajor);
        assert_eq!(Endian::from(EndianArg::Native), Endian::native());
    }
}
