use std::fs::File;
use std::io::{BufWriter, Seek, SeekFrom, Write};
use std::path::Path;

use log::{debug, error, trace, warn};

use crate::dtype::ElementType;
use crate::header::Header;
use crate::layout::MemoryOrder;
use crate::path::npy_path;
use crate::slice::{byte_len, ArraySlice};

use super::config::WriterConfig;
use super::error::WriterError;
use super::stats::WriterStats;

/// Geometry fixed by the first slice and enforced on every later one
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SliceDescriptor {
    element_type: ElementType,
    shape: Vec<usize>,
    memory_order: MemoryOrder,
}

impl SliceDescriptor {
    fn of<S: ArraySlice + ?Sized>(slice: &S) -> Self {
        Self {
            element_type: slice.element_type(),
            shape: slice.shape().to_vec(),
            memory_order: slice.memory_order(),
        }
    }

    /// Element type of every slice
    pub fn element_type(&self) -> ElementType {
        self.element_type
    }

    /// Per-slice shape
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Memory order of every slice
    pub fn memory_order(&self) -> MemoryOrder {
        self.memory_order
    }

    /// Reject a slice whose geometry differs from this descriptor
    fn check<S: ArraySlice + ?Sized>(&self, slice: &S) -> Result<(), WriterError> {
        let element_type = slice.element_type();
        if element_type != self.element_type {
            return Err(WriterError::TypeMismatch {
                expected: self.element_type,
                actual: element_type,
            });
        }

        if slice.shape() != self.shape.as_slice() {
            return Err(WriterError::ShapeMismatch {
                expected: self.shape.clone(),
                actual: slice.shape().to_vec(),
            });
        }

        let memory_order = slice.memory_order();
        if memory_order != self.memory_order {
            return Err(WriterError::MemoryOrderMismatch {
                expected: self.memory_order,
                actual: memory_order,
            });
        }
        Ok(())
    }

    /// Header for `count` stacked slices; the stream axis always leads
    fn header(&self, count: u64) -> Header {
        let shape = std::iter::once(count)
            .chain(self.shape.iter().map(|&dim| dim as u64))
            .collect();
        Header::new(self.element_type, self.memory_order.is_fortran(), shape)
    }
}

/// Streaming writer for `.npy` files
///
/// Slices are appended to the body as they arrive; the header in front of
/// them is written once, when the writer is closed. A writer that is dropped
/// without an explicit [`close`](NpyWriter::close) closes itself, logging any
/// error it cannot return.
///
/// An I/O error while appending a slice may leave part of it in the body, so
/// the writer becomes unusable: later calls return [`WriterError::Poisoned`]
/// and no header is ever written, leaving a file no reader will accept.
///
/// # Column-major slices
///
/// Slice bytes are never re-laid out. Column-major slices are stored one
/// after another under a `(slices, *slice_shape)` header with
/// `fortran_order: True`, so a reader that loads the whole file applies
/// column-major order to the full shape and the stream axis varies fastest.
/// Element `[k, i, j]` of the loaded array is then *not* element `[i, j]` of
/// slice `k`. Each slice is recovered intact by reading its own block of
/// `slice_len` elements in column-major order.
pub struct NpyWriter<W: Write + Seek> {
    stream: Option<BufWriter<W>>,
    config: WriterConfig,
    header_offset: u64,
    descriptor: Option<SliceDescriptor>,
    slices_written: u64,
    body_bytes: u64,
    poisoned: bool,
}

impl NpyWriter<File> {
    /// Create a writer to a file path with the default configuration.
    ///
    /// `.npy` is appended to the file name if missing.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self, WriterError> {
        Self::create_with_config(path, WriterConfig::default())
    }

    /// Create a writer to a file path
    pub fn create_with_config<P: AsRef<Path>>(
        path: P,
        config: WriterConfig,
    ) -> Result<Self, WriterError> {
        config.validate()?;
        let path = npy_path(path);
        debug!("Creating npy file: {}", path.display());
        let file = File::create(&path)?;
        Self::new(file, config)
    }
}

impl<W: Write + Seek> NpyWriter<W> {
    /// Create a writer to any seekable stream.
    ///
    /// The header region starts at the stream's current position. The cursor
    /// is moved past it without writing, so a writer that never receives a
    /// slice leaves the stream untouched.
    pub fn new(stream: W, config: WriterConfig) -> Result<Self, WriterError> {
        config.validate()?;

        let mut stream = BufWriter::with_capacity(config.buffer_capacity, stream);
        let header_offset = stream.stream_position()?;
        stream.seek(SeekFrom::Start(header_offset + config.header_region_len()))?;
        debug!(
            "Reserved {} byte header region at offset {}",
            config.header_region_len(),
            header_offset
        );

        Ok(Self {
            stream: Some(stream),
            config,
            header_offset,
            descriptor: None,
            slices_written: 0,
            body_bytes: 0,
            poisoned: false,
        })
    }

    /// Append one slice to the body.
    ///
    /// The first slice fixes element type, shape and memory order; a later
    /// slice that differs in any of them is rejected before any of its bytes
    /// reach the stream.
    pub fn write<S: ArraySlice + ?Sized>(&mut self, slice: &S) -> Result<(), WriterError> {
        if self.stream.is_none() {
            return Err(WriterError::AlreadyClosed);
        }
        if self.poisoned {
            return Err(WriterError::Poisoned);
        }

        let data = slice.data();
        let expected = byte_len(slice.shape(), slice.element_type());
        if expected != Some(data.len()) {
            return Err(WriterError::DataLengthMismatch {
                expected: expected.unwrap_or(usize::MAX),
                actual: data.len(),
            });
        }

        if let Some(descriptor) = &self.descriptor {
            descriptor.check(slice)?;
        }

        let stream = self.stream.as_mut().ok_or(WriterError::AlreadyClosed)?;
        if let Err(e) = stream.write_all(&data) {
            // part of the slice may already be in the body
            self.poisoned = true;
            warn!(
                "Write of slice {} failed, writer poisoned: {}",
                self.slices_written + 1,
                e
            );
            return Err(e.into());
        }

        if self.descriptor.is_none() {
            let descriptor = SliceDescriptor::of(slice);
            debug!(
                "First slice: descr {}, shape {:?}, {} order",
                descriptor.element_type, descriptor.shape, descriptor.memory_order
            );
            self.descriptor = Some(descriptor);
        }
        self.slices_written += 1;
        self.body_bytes += data.len() as u64;
        trace!("Wrote slice {} ({} bytes)", self.slices_written, data.len());

        Ok(())
    }

    /// Append slices in order, stopping at the first error
    pub fn write_all_slices<I>(&mut self, slices: I) -> Result<(), WriterError>
    where
        I: IntoIterator,
        I::Item: ArraySlice,
    {
        for slice in slices {
            self.write(&slice)?;
        }
        Ok(())
    }

    /// Finalize the header and close the stream.
    ///
    /// With no slices written nothing is written at all, leaving an empty
    /// file. Afterwards the writer is terminal: `write` and a second `close`
    /// return [`WriterError::AlreadyClosed`]. A poisoned writer discards its
    /// buffer without writing a header and returns [`WriterError::Poisoned`].
    pub fn close(&mut self) -> Result<WriterStats, WriterError> {
        let stream = self.stream.take().ok_or(WriterError::AlreadyClosed)?;
        let (stats, _) = self.finalize(stream)?;
        Ok(stats)
    }

    /// Close the writer and hand back the underlying stream
    pub fn into_inner(mut self) -> Result<W, WriterError> {
        let stream = self.stream.take().ok_or(WriterError::AlreadyClosed)?;
        let (_, inner) = self.finalize(stream)?;
        Ok(inner)
    }

    fn finalize(&mut self, mut stream: BufWriter<W>) -> Result<(WriterStats, W), WriterError> {
        if self.poisoned {
            // drop buffered bytes instead of flushing them behind a failed write
            let _ = stream.into_parts();
            return Err(WriterError::Poisoned);
        }

        match &self.descriptor {
            Some(descriptor) => {
                let header = descriptor.header(self.slices_written);
                let encoded = header.encode(self.config.header_len)?;

                let end = stream.stream_position()?;
                stream.seek(SeekFrom::Start(self.header_offset))?;
                stream.write_all(&encoded)?;
                stream.seek(SeekFrom::Start(end))?;
            }
            None => {
                stream.seek(SeekFrom::Start(self.header_offset))?;
            }
        }
        stream.flush()?;

        let inner = stream
            .into_inner()
            .map_err(|e| WriterError::IoError(e.into_error()))?;

        let stats = self.stats();
        debug!("{}", stats);
        Ok((stats, inner))
    }

    /// Statistics of what has been written so far
    pub fn stats(&self) -> WriterStats {
        match &self.descriptor {
            Some(descriptor) => WriterStats {
                slices_written: self.slices_written,
                shape: descriptor.header(self.slices_written).shape,
                body_bytes: self.body_bytes,
                file_size_bytes: self.header_offset
                    + self.config.header_region_len()
                    + self.body_bytes,
            },
            None => WriterStats {
                slices_written: 0,
                shape: Vec::new(),
                body_bytes: 0,
                file_size_bytes: self.header_offset,
            },
        }
    }

    /// Number of slices appended so far
    pub fn slices_written(&self) -> u64 {
        self.slices_written
    }

    /// Geometry fixed by the first slice, if any
    pub fn descriptor(&self) -> Option<&SliceDescriptor> {
        self.descriptor.as_ref()
    }

    /// Whether the writer has been closed
    pub fn is_closed(&self) -> bool {
        self.stream.is_none()
    }

    /// Whether a failed write has made the writer unusable
    pub fn is_poisoned(&self) -> bool {
        self.poisoned
    }

    /// Configuration in use
    pub fn config(&self) -> &WriterConfig {
        &self.config
    }
}

impl<W: Write + Seek> Drop for NpyWriter<W> {
    fn drop(&mut self) {
        if let Some(stream) = self.stream.take() {
            match self.finalize(stream) {
                Ok(_) => {}
                Err(WriterError::Poisoned) => {
                    warn!("Dropped poisoned npy writer; header not written")
                }
                Err(e) => error!("Failed to finalize npy file on drop: {}", e),
            }
        }
    }
}
