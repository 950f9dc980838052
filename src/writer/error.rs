use crate::dtype::ElementType;
use crate::layout::MemoryOrder;

/// Errors that can occur during writing
#[derive(Debug, thiserror::Error)]
pub enum WriterError {
    /// I/O error during file operations
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Slice element type differs from the first slice
    #[error("element type must not change: expected {expected}, got {actual}")]
    TypeMismatch {
        /// Element type fixed by the first slice
        expected: ElementType,
        /// Element type of the rejected slice
        actual: ElementType,
    },

    /// Slice shape differs from the first slice
    #[error("slice shape must not change: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        /// Shape fixed by the first slice
        expected: Vec<usize>,
        /// Shape of the rejected slice
        actual: Vec<usize>,
    },

    /// Slice memory order differs from the first slice
    #[error("memory layout must not change: expected {expected} order, got {actual} order")]
    MemoryOrderMismatch {
        /// Memory order fixed by the first slice
        expected: MemoryOrder,
        /// Memory order of the rejected slice
        actual: MemoryOrder,
    },

    /// Slice payload length does not match its shape and element type
    #[error("slice data is {actual} bytes, shape and element type require {expected}")]
    DataLengthMismatch {
        /// Byte length implied by shape and element type
        expected: usize,
        /// Byte length actually provided
        actual: usize,
    },

    /// Finalized header dictionary does not fit the reserved region
    #[error("header needs {required} bytes but only {available} are reserved")]
    HeaderTooLarge {
        /// Length of the dictionary string
        required: usize,
        /// Size of the reserved dictionary region
        available: usize,
    },

    /// An earlier write failed part-way; the body can no longer be trusted
    #[error("writer is unusable after a failed write")]
    Poisoned,

    /// Writer was already closed
    #[error("writer is already closed")]
    AlreadyClosed,

    /// Writer configuration is not usable
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
