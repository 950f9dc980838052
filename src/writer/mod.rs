//! # Streaming Writer Module
//!
//! Writes a sequence of same-shaped slices into one `.npy` file, one slice at
//! a time.
//!
//! ## Design Principles
//!
//! 1. **Streaming Architecture**: Slice bytes go straight to the body; nothing
//!    beyond the write buffer is held in memory.
//!
//! 2. **Deferred Header**: A fixed-size header region is reserved when the
//!    writer opens and filled in at close time, once the slice count is known.
//!    The output stream must therefore be seekable.
//!
//! 3. **Fixed Geometry**: Element type, shape and memory order are taken from
//!    the first slice. Every later slice is checked against them before any of
//!    its bytes are written.
//!
//! 4. **Empty Means Empty**: Closing a writer that never received a slice
//!    leaves a zero-byte file rather than a header describing zero slices.
//!
//! 5. **No Header Over a Torn Body**: A slice that fails part-way through
//!    poisons the writer, and a poisoned writer never writes its header.

mod config;
mod error;
mod stats;
mod writer_impl;


pub use config::WriterConfig;
pub use error::WriterError;
pub use stats::WriterStats;
pub use writer_impl::{NpyWriter, SliceDescriptor};
