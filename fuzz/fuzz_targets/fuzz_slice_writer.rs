#![no_main]

use libfuzzer_sys::fuzz_target;
use std::io::Cursor;

use npyfile::dtype::{DType, ElementType, Endian};
use npyfile::layout::MemoryOrder;
use npyfile::slice::SliceView;
use npyfile::writer::{NpyWriter, WriterConfig};

fuzz_target!(|data: &[u8]| {
    // First bytes pick the geometry, the rest is split into slices
    if data.len() < 4 {
        return;
    }
    let dtype = DType::ALL[data[0] as usize % DType::ALL.len()];
    let endian = if data[1] & 1 == 0 { Endian::Little } else { Endian::Big };
    let order = if data[1] & 2 == 0 { MemoryOrder::RowMajor } else { MemoryOrder::ColumnMajor };
    let rank = (data[2] % 4) as usize;
    let shape: Vec<usize> = (0..rank).map(|axis| 1 + (data[3] as usize >> (axis * 2)) % 4).collect();
    let element_type = ElementType::new(dtype, endian);
    let slice_len = shape.iter().product::<usize>() * element_type.size();

    let config = if data[1] & 4 == 0 { WriterConfig::compact() } else { WriterConfig::default() };
    let mut writer = match NpyWriter::new(Cursor::new(Vec::new()), config) {
        Ok(writer) => writer,
        Err(_) => return,
    };

    // Every chunk either fits the geometry or is rejected, never a panic
    for chunk in data[4..].chunks(slice_len.max(1)) {
        if let Ok(slice) = SliceView::new(element_type, shape.clone(), order, chunk) {
            let _ = writer.write(&slice);
        }
    }

    let written = writer.slices_written();
    if let Ok(cursor) = writer.into_inner() {
        let bytes = cursor.into_inner();
        if written == 0 {
            assert!(bytes.is_empty());
        } else {
            assert_eq!(&bytes[..6], b"\x93NUMPY");
        }
    }
});
