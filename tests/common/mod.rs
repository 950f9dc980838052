//! Decoding helpers for checking what the writer produced.
//!
//! Dtype, order, shape and values come from `npyz`, a reader that shares no
//! code with the writer. Byte-level properties `npyz` does not care about
//! (version, header length, space padding, no newline) are checked by hand.

#![allow(dead_code)]

use std::path::Path;

pub const MAGIC: &[u8] = b"\x93NUMPY";

/// A decoded `.npy` file
#[derive(Debug)]
pub struct NpyFile {
    pub major: u8,
    pub minor: u8,
    pub header_len: usize,
    pub dict: String,
    pub descr: String,
    pub fortran_order: bool,
    pub shape: Vec<u64>,
    pub body: Vec<u8>,
}

impl NpyFile {
    /// Offset of the body from the start of the file
    pub fn body_offset(&self) -> usize {
        10 + self.header_len
    }

    /// Raw bytes of the `index`-th slice along the leading axis
    pub fn slice_bytes(&self, index: usize) -> &[u8] {
        let count = self.shape[0] as usize;
        let len = self.body.len() / count;
        &self.body[index * len..(index + 1) * len]
    }
}

pub fn read_npy(path: &Path) -> NpyFile {
    let bytes = std::fs::read(path).unwrap();
    parse_npy(&bytes)
}

pub fn parse_npy(bytes: &[u8]) -> NpyFile {
    assert!(bytes.len() >= 10, "file too short for a preamble");
    assert_eq!(&bytes[..6], MAGIC);

    let header_len = u16::from_le_bytes([bytes[8], bytes[9]]) as usize;
    assert_eq!((10 + header_len) % 64, 0, "body is not 64-byte aligned");
    let raw = std::str::from_utf8(&bytes[10..10 + header_len]).unwrap();
    assert!(raw.is_ascii());
    let dict = raw.trim_end_matches(' ').to_string();
    assert!(!dict.contains('\n'), "header must not contain a newline");
    assert!(dict.ends_with(", }"), "unexpected dict tail: {dict}");

    let npy = npyz::NpyFile::new(bytes).unwrap();
    let descr = match npy.dtype() {
        npyz::DType::Plain(type_str) => type_str.to_string(),
        other => panic!("expected a plain dtype, got {other:?}"),
    };

    NpyFile {
        major: bytes[6],
        minor: bytes[7],
        header_len,
        descr,
        fortran_order: matches!(npy.order(), npyz::Order::Fortran),
        shape: npy.shape().to_vec(),
        body: bytes[10 + header_len..].to_vec(),
        dict,
    }
}

/// Every element of the file, in the order it is stored
pub fn read_values<T: npyz::Deserialize>(path: &Path) -> Vec<T> {
    let bytes = std::fs::read(path).unwrap();
    npyz::NpyFile::new(&bytes[..]).unwrap().into_vec().unwrap()
}

/// Host-order bytes of a slice of plain values
pub fn ne_bytes<T: bytemuck::Pod>(values: &[T]) -> Vec<u8> {
    bytemuck::cast_slice(values).to_vec()
}
