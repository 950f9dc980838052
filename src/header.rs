//! `.npy` version 1.0 header encoding.
//!
//! ```text
//! offset  length      content
//! 0       6           magic "\x93NUMPY"
//! 6       1           major version (1)
//! 7       1           minor version (0)
//! 8       2           header_len, u16 little-endian
//! 10      header_len  ASCII dict literal, right-padded with spaces
//! ```
//!
//! The header region has a fixed size chosen when the writer opens, so the
//! body can be streamed first and the header filled in at close time.

use std::io::Write;

use byteorder::{LittleEndian, WriteBytesExt};

use crate::dtype::ElementType;
use crate::writer::WriterError;

/// Magic token opening every `.npy` file
pub const MAGIC: &[u8; 6] = b"\x93NUMPY";

/// Format major version
pub const MAJOR_VERSION: u8 = 1;

/// Format minor version
pub const MINOR_VERSION: u8 = 0;

/// Bytes preceding the dictionary: magic, version and length field
pub const PREAMBLE_LEN: usize = 10;

/// Default size of the dictionary region; with the preamble the body starts
/// at offset 2048
pub const DEFAULT_HEADER_LEN: u16 = 2038;

/// NumPy aligns the start of the array data to this many bytes
pub const ARRAY_ALIGN: usize = 64;

/// Header fields of a finalized `.npy` file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    /// Element type, rendered as the `descr` field
    pub element_type: ElementType,
    /// Whether the body is in column-major order
    pub fortran_order: bool,
    /// Overall shape, stream axis first
    pub shape: Vec<u64>,
}

impl Header {
    /// Create a header
    pub fn new(element_type: ElementType, fortran_order: bool, shape: Vec<u64>) -> Self {
        Self {
            element_type,
            fortran_order,
            shape,
        }
    }

    /// Unpadded dictionary literal, e.g.
    /// `{'descr': '<f8', 'fortran_order': False, 'shape': (5, 3, 3,), }`
    pub fn dict(&self) -> String {
        let dims = self
            .shape
            .iter()
            .map(u64::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        let shape = if dims.is_empty() {
            "()".to_string()
        } else {
            format!("({},)", dims)
        };

        format!(
            "{{'descr': '{}', 'fortran_order': {}, 'shape': {}, }}",
            self.element_type.descr(),
            if self.fortran_order { "True" } else { "False" },
            shape
        )
    }

    /// Encode preamble and dictionary padded to exactly `header_len` bytes
    pub fn encode(&self, header_len: u16) -> Result<Vec<u8>, WriterError> {
        let mut buf = Vec::with_capacity(PREAMBLE_LEN + usize::from(header_len));
        self.write_to(&mut buf, header_len)?;
        Ok(buf)
    }

    /// Write preamble and dictionary padded to exactly `header_len` bytes
    pub fn write_to<W: Write>(&self, writer: &mut W, header_len: u16) -> Result<(), WriterError> {
        let dict = self.dict();
        let available = usize::from(header_len);
        if dict.len() > available {
            return Err(WriterError::HeaderTooLarge {
                required: dict.len(),
                available,
            });
        }

        writer.write_all(MAGIC)?;
        writer.write_u8(MAJOR_VERSION)?;
        writer.write_u8(MINOR_VERSION)?;
        writer.write_u16::<LittleEndian>(header_len)?;
        writer.write_all(dict.as_bytes())?;
        writer.write_all(&vec![b' '; available - dict.len()])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dtype::{DType, Endian};

    fn f8() -> ElementType {
        ElementType::new(DType::F64, Endian::Little)
    }

    #[test]
    fn test_dict_rendering() {
        let header = Header::new(f8(), false, vec![5, 3, 3]);
        assert_eq!(
            header.dict(),
            "{'descr': '<f8', 'fortran_order': False, 'shape': (5, 3, 3,), }"
        );

        let header = Header::new(ElementType::new(DType::U8, Endian::Big), true, vec![5]);
        assert_eq!(
            header.dict(),
            "{'descr': '|u1', 'fortran_order': True, 'shape': (5,), }"
        );
    }

    #[test]
    fn test_encode_layout() {
        let header = Header::new(f8(), false, vec![1, 2, 2]);
        let bytes = header.encode(DEFAULT_HEADER_LEN).unwrap();

        assert_eq!(bytes.len(), 2048);
        assert_eq!(&bytes[0..6], MAGIC);
        assert_eq!(bytes[6], 1);
        assert_eq!(bytes[7], 0);
        assert_eq!(u16::from_le_bytes([bytes[8], bytes[9]]), 2038);

        let dict = std::str::from_utf8(&bytes[10..]).unwrap();
        assert!(dict.starts_with("{'descr': '<f8'"));
        assert!(dict.trim_end().ends_with('}'));
        assert!(!dict.contains('\n'));
        assert!(dict.is_ascii());
    }

    #[test]
    fn test_exact_fit() {
        let header = Header::new(f8(), false, vec![3]);
        let len = header.dict().len() as u16;
        let bytes = header.encode(len).unwrap();
        assert_eq!(bytes.len(), PREAMBLE_LEN + usize::from(len));
    }

    #[test]
    fn test_header_too_large() {
        let header = Header::new(f8(), false, vec![1_000_000; 300]);
        let err = header.encode(DEFAULT_HEADER_LEN).unwrap_err();
        match err {
            WriterError::HeaderTooLarge {
                required,
                available,
            } => {
                assert!(required > available);
                assert_eq!(available, 2038);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_default_region_fits_many_dimensions() {
        let header = Header::new(f8(), true, vec![u64::from(u32::MAX); 64]);
        assert!(header.encode(DEFAULT_HEADER_LEN).is_ok());
    }
}
