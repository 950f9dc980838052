use std::fmt;

/// Statistics from a completed write operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriterStats {
    /// Number of slices written to the file
    pub slices_written: u64,
    /// Overall array shape recorded in the header; empty if nothing was written
    pub shape: Vec<u64>,
    /// Bytes of slice data in the body
    pub body_bytes: u64,
    /// End of the written data in the output stream: any bytes the stream
    /// held before the writer opened, plus header region and body. For a
    /// fresh file this is the file size (zero if nothing was written).
    pub file_size_bytes: u64,
}

impl fmt::Display for WriterStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dims = self
            .shape
            .iter()
            .map(u64::to_string)
            .collect::<Vec<_>>()
            .join(" x ");
        write!(
            f,
            "Wrote {} slices ({} bytes, shape [{}]) in {} bytes",
            self.slices_written, self.body_bytes, dims, self.file_size_bytes
        )
    }
}
