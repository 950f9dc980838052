//! The array-slice abstraction consumed by the writer.
//!
//! The writer needs exactly four things from a slice: its element type, its
//! shape, its memory-order classification and its raw bytes in that order.
//! [`ArraySlice`] exposes those; [`SliceView`] and [`TypedSlice`] are the
//! library-free implementations, and `ndarray` arrays implement it when the
//! `ndarray` feature is enabled.

use std::borrow::Cow;

use crate::dtype::{Element, ElementType};
use crate::layout::MemoryOrder;

/// Errors raised when building a slice from raw parts
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SliceError {
    /// Buffer length does not match the shape
    #[error("buffer length {actual} does not match shape {shape:?} (expected {expected})")]
    LengthMismatch {
        /// Shape that was requested
        shape: Vec<usize>,
        /// Length the shape requires (bytes or elements)
        expected: usize,
        /// Length provided
        actual: usize,
    },

    /// Size of the shape does not fit in `usize`
    #[error("shape {0:?} is too large to address")]
    ShapeOverflow(Vec<usize>),
}

/// One unit of data appended along the leading (stream) axis
pub trait ArraySlice {
    /// Element type of every value in the slice
    fn element_type(&self) -> ElementType;

    /// Per-slice shape; empty for a scalar slice
    fn shape(&self) -> &[usize];

    /// Memory-order classification of [`ArraySlice::data`]
    fn memory_order(&self) -> MemoryOrder;

    /// Raw element bytes, laid out in [`ArraySlice::memory_order`]
    fn data(&self) -> Cow<'_, [u8]>;
}

impl<T: ArraySlice + ?Sized> ArraySlice for &T {
    fn element_type(&self) -> ElementType {
        (**self).element_type()
    }

    fn shape(&self) -> &[usize] {
        (**self).shape()
    }

    fn memory_order(&self) -> MemoryOrder {
        (**self).memory_order()
    }

    fn data(&self) -> Cow<'_, [u8]> {
        (**self).data()
    }
}

/// Number of elements in `shape`, or `None` on overflow
pub(crate) fn element_count(shape: &[usize]) -> Option<usize> {
    shape.iter().try_fold(1usize, |acc, &dim| acc.checked_mul(dim))
}

/// Number of bytes a slice of `shape` and `element_type` occupies
pub(crate) fn byte_len(shape: &[usize], element_type: ElementType) -> Option<usize> {
    element_count(shape)?.checked_mul(element_type.size())
}

/// Untyped, borrowed slice of already-encoded element bytes
///
/// Useful when frames arrive as raw buffers (sensor drivers, files, sockets),
/// possibly in a byte order other than the host's.
#[derive(Debug, Clone)]
pub struct SliceView<'a> {
    element_type: ElementType,
    shape: Vec<usize>,
    order: MemoryOrder,
    data: &'a [u8],
}

impl<'a> SliceView<'a> {
    /// Wrap `data` as a slice of `shape` densely packed in `order`.
    ///
    /// The declared order is re-classified: a column-major declaration on a
    /// shape that is also row-major contiguous becomes [`MemoryOrder::RowMajor`].
    pub fn new(
        element_type: ElementType,
        shape: impl Into<Vec<usize>>,
        order: MemoryOrder,
        data: &'a [u8],
    ) -> Result<Self, SliceError> {
        let shape = shape.into();
        let expected =
            byte_len(&shape, element_type).ok_or_else(|| SliceError::ShapeOverflow(shape.clone()))?;
        if expected != data.len() {
            return Err(SliceError::LengthMismatch {
                shape,
                expected,
                actual: data.len(),
            });
        }

        let order = order.classify_dense(&shape);
        Ok(Self {
            element_type,
            shape,
            order,
            data,
        })
    }
}

impl ArraySlice for SliceView<'_> {
    fn element_type(&self) -> ElementType {
        self.element_type
    }

    fn shape(&self) -> &[usize] {
        &self.shape
    }

    fn memory_order(&self) -> MemoryOrder {
        self.order
    }

    fn data(&self) -> Cow<'_, [u8]> {
        Cow::Borrowed(self.data)
    }
}

/// Borrowed slice of Rust scalars in host byte order
#[derive(Debug, Clone)]
pub struct TypedSlice<'a, T: Element> {
    values: &'a [T],
    shape: Vec<usize>,
    order: MemoryOrder,
}

impl<'a, T: Element> TypedSlice<'a, T> {
    /// Wrap `values` as a slice of `shape` densely packed in `order`
    pub fn new(
        values: &'a [T],
        shape: impl Into<Vec<usize>>,
        order: MemoryOrder,
    ) -> Result<Self, SliceError> {
        let shape = shape.into();
        let expected =
            element_count(&shape).ok_or_else(|| SliceError::ShapeOverflow(shape.clone()))?;
        if expected != values.len() {
            return Err(SliceError::LengthMismatch {
                shape,
                expected,
                actual: values.len(),
            });
        }

        let order = order.classify_dense(&shape);
        Ok(Self {
            values,
            shape,
            order,
        })
    }

    /// Row-major slice of `shape`
    pub fn row_major(values: &'a [T], shape: impl Into<Vec<usize>>) -> Result<Self, SliceError> {
        Self::new(values, shape, MemoryOrder::RowMajor)
    }

    /// Column-major slice of `shape`
    pub fn column_major(
        values: &'a [T],
        shape: impl Into<Vec<usize>>,
    ) -> Result<Self, SliceError> {
        Self::new(values, shape, MemoryOrder::ColumnMajor)
    }

    /// One-dimensional slice holding all of `values`
    pub fn from_values(values: &'a [T]) -> Self {
        Self {
            values,
            shape: vec![values.len()],
            order: MemoryOrder::RowMajor,
        }
    }
}

impl<T: Element> ArraySlice for TypedSlice<'_, T> {
    fn element_type(&self) -> ElementType {
        T::element_type()
    }

    fn shape(&self) -> &[usize] {
        &self.shape
    }

    fn memory_order(&self) -> MemoryOrder {
        self.order
    }

    fn data(&self) -> Cow<'_, [u8]> {
        Cow::Borrowed(bytemuck::cast_slice(self.values))
    }
}
