//! # npyfile - Streaming NumPy `.npy` Writer
//!
//! `npyfile` writes a sequence of same-shaped array slices into a single
//! NumPy `.npy` file, one slice at a time. It is meant for data that arrives
//! sequentially (frames from a live camera, readings from a sensor loop) or
//! that does not fit into memory as a whole.
//!
//! ## Key Features
//!
//! - **Streaming**: Each slice is appended to the file as it arrives; only the
//!   write buffer is held in memory.
//!
//! - **Deferred Header**: A fixed-size header region is reserved up front and
//!   written at close time with the final shape `(slices, *slice_shape)`.
//!
//! - **Strict Geometry**: The first slice fixes element type, shape and memory
//!   order. Later slices that differ are rejected with a typed error before any
//!   of their bytes are written.
//!
//! - **Layout Preserving**: Row-major and column-major slices are written in
//!   their own byte order, never re-laid out.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use npyfile::slice::TypedSlice;
//! use npyfile::writer::NpyWriter;
//!
//! // ".npy" is appended to the file name
//! let mut writer = NpyWriter::create("frames")?;
//!
//! for t in 0..10u16 {
//!     let frame: Vec<u16> = (0..480 * 640).map(|i| (i as u16).wrapping_add(t)).collect();
//!     writer.write(&TypedSlice::row_major(&frame, vec![480, 640])?)?;
//! }
//!
//! let stats = writer.close()?;
//! println!("{}", stats); // shape [10 x 480 x 640]
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! The result loads with `numpy.load("frames.npy")` as a `(10, 480, 640)`
//! array.
//!
//! With the `ndarray` feature (enabled by default) arrays and views can be
//! written directly:
//!
//! ```rust,no_run
//! # #[cfg(feature = "ndarray")]
//! # {
//! use ndarray::{Array3, Axis};
//! use npyfile::writer::NpyWriter;
//!
//! let stack = Array3::<u8>::zeros((8, 16, 16));
//! let mut writer = NpyWriter::create("stack.npy")?;
//! for image in stack.axis_iter(Axis(0)) {
//!     writer.write(&image)?;
//! }
//! writer.close()?;
//! # }
//! # Ok::<(), npyfile::writer::WriterError>(())
//! ```
//!
//! ## Column-Major Slices
//!
//! Column-major slices are accepted and their bytes stored unchanged, one
//! block per slice, with `fortran_order: True` in the header. A reader that
//! loads the whole file applies column-major order to the full
//! `(slices, *slice_shape)` shape, so the stream axis varies fastest and the
//! loaded array does not hold the slices in its leading index. Each slice is
//! still recovered by reading its block of the body in column-major order.
//! Write row-major slices when the file must load as a stack.
//!
//! ## File Layout
//!
//! | Offset | Length | Content |
//! |--------|--------|---------|
//! | 0 | 6 | magic `\x93NUMPY` |
//! | 6 | 1 | major version (1) |
//! | 7 | 1 | minor version (0) |
//! | 8 | 2 | header length, u16 little-endian |
//! | 10 | header length (2038 by default) | ASCII dict, space padded |
//! | 10 + header length | rest | raw slice bytes in write order |
//!
//! A writer that receives no slices leaves an empty file.
//!
//! ## Architecture
//!
//! - [`writer`]: the streaming writer, its configuration and errors
//! - [`slice`]: the [`ArraySlice`](slice::ArraySlice) abstraction the writer consumes
//! - [`dtype`]: element types and their descriptor tokens
//! - [`layout`]: row-major / column-major classification
//! - [`header`]: header dictionary encoding
//! - [`path`]: `.npy` suffix normalization

#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]

pub mod dtype;
pub mod header;
pub mod layout;
pub mod path;
pub mod slice;
pub mod writer;

#[cfg(feature = "ndarray")]
mod ndarray_ext;

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::dtype::{DType, Element, ElementType, Endian};
    pub use crate::layout::MemoryOrder;
    pub use crate::path::npy_path;
    pub use crate::slice::{ArraySlice, SliceError, SliceView, TypedSlice};
    pub use crate::writer::{NpyWriter, SliceDescriptor, WriterConfig, WriterError, WriterStats};
}
