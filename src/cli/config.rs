//! TOML configuration file support for the `stack` command.
//!
//! Settings that stay the same across captures can live in a config file
//! instead of being repeated on every invocation:
//!
//! ```toml
//! # npyfile.toml
//! [writer]
//! header_len = 4086
//! buffer_capacity = 1048576
//!
//! [stack]
//! dtype = "u16"
//! shape = [480, 640]
//! order = "c"
//! endian = "little"
//! ```
//!
//! Command-line flags take precedence over the file.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use npyfile::writer::WriterConfig;

use super::{EndianArg, OrderArg};

/// Root configuration structure for npyfile.toml files.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Writer tuning.
    #[serde(default)]
    pub writer: WriterSection,

    /// Frame description for the stack command.
    #[serde(default)]
    pub stack: StackSection,
}

/// `[writer]` table.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WriterSection {
    /// Header dictionary length in bytes.
    pub header_len: Option<u16>,

    /// Write buffer capacity in bytes.
    pub buffer_capacity: Option<usize>,
}

/// `[stack]` table.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StackSection {
    /// Element type, in any form `ElementType` parses.
    pub dtype: Option<String>,

    /// Per-frame shape.
    pub shape: Option<Vec<usize>>,

    /// Memory order of each frame.
    pub order: Option<OrderArg>,

    /// Byte order of the input data.
    pub endian: Option<EndianArg>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML configuration")
    }

    /// Writer configuration with file values applied over the defaults.
    pub fn writer_config(&self) -> WriterConfig {
        let defaults = WriterConfig::default();
        WriterConfig {
            header_len: self.writer.header_len.unwrap_or(defaults.header_len),
            buffer_capacity: self
                .writer
                .buffer_capacity
                .unwrap_or(defaults.buffer_capacity),
        }
    }
}
