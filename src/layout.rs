//! Memory-order classification of slice layouts.
//!
//! Strides are measured in elements. A layout is row-major (C) contiguous when
//! walking the dimensions from last to first visits memory densely, and
//! column-major (Fortran) contiguous when walking from first to last does.
//! Axes of length 1 never affect contiguity, and an empty array is contiguous
//! both ways, matching NumPy's `flags.c_contiguous` / `flags.f_contiguous`.

use std::fmt;

/// Byte layout convention of a slice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MemoryOrder {
    /// Row-major, last index varies fastest ("C order")
    #[default]
    RowMajor,
    /// Column-major, first index varies fastest ("Fortran order")
    ColumnMajor,
}

impl MemoryOrder {
    /// Value of the header's `fortran_order` field
    pub fn is_fortran(self) -> bool {
        self == MemoryOrder::ColumnMajor
    }

    /// Classify a layout given in element strides.
    ///
    /// A layout counts as column-major only if it is Fortran contiguous and
    /// *not* also C contiguous. Everything else, including non-contiguous
    /// layouts, is row-major.
    pub fn classify(shape: &[usize], strides: &[isize]) -> Self {
        if is_f_contiguous(shape, strides) && !is_c_contiguous(shape, strides) {
            MemoryOrder::ColumnMajor
        } else {
            MemoryOrder::RowMajor
        }
    }

    /// Classify a densely packed layout declared to be in this order
    pub fn classify_dense(self, shape: &[usize]) -> Self {
        let strides = match self {
            MemoryOrder::RowMajor => c_strides(shape),
            MemoryOrder::ColumnMajor => f_strides(shape),
        };
        MemoryOrder::classify(shape, &strides)
    }
}

impl fmt::Display for MemoryOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemoryOrder::RowMajor => f.write_str("C"),
            MemoryOrder::ColumnMajor => f.write_str("Fortran"),
        }
    }
}

/// Dense row-major strides for `shape`
pub fn c_strides(shape: &[usize]) -> Vec<isize> {
    let mut strides = shape
        .iter()
        .rev()
        .scan(1isize, |acc, &dim| {
            let stride = *acc;
            *acc = acc.saturating_mul(dim.max(1) as isize);
            Some(stride)
        })
        .collect::<Vec<_>>();
    strides.reverse();
    strides
}

/// Dense column-major strides for `shape`
pub fn f_strides(shape: &[usize]) -> Vec<isize> {
    shape
        .iter()
        .scan(1isize, |acc, &dim| {
            let stride = *acc;
            *acc = acc.saturating_mul(dim.max(1) as isize);
            Some(stride)
        })
        .collect()
}

/// Whether `strides` describe a dense row-major layout of `shape`
pub fn is_c_contiguous(shape: &[usize], strides: &[isize]) -> bool {
    is_dense(shape.iter().rev().zip(strides.iter().rev()), shape)
}

/// Whether `strides` describe a dense column-major layout of `shape`
pub fn is_f_contiguous(shape: &[usize], strides: &[isize]) -> bool {
    is_dense(shape.iter().zip(strides.iter()), shape)
}

fn is_dense<'a>(axes: impl Iterator<Item = (&'a usize, &'a isize)>, shape: &[usize]) -> bool {
    if shape.contains(&0) {
        return true;
    }
    let mut expected = 1isize;
    for (&dim, &stride) in axes {
        if dim == 1 {
            continue;
        }
        if stride != expected {
            return false;
        }
        expected = expected.saturating_mul(dim as isize);
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dense_strides() {
        assert_eq!(c_strides(&[2, 3, 4]), vec![12, 4, 1]);
        assert_eq!(f_strides(&[2, 3, 4]), vec![1, 2, 6]);
        assert!(c_strides(&[]).is_empty());
    }

    #[test]
    fn test_matrix_orders() {
        assert_eq!(MemoryOrder::classify(&[3, 3], &[3, 1]), MemoryOrder::RowMajor);
        assert_eq!(MemoryOrder::classify(&[3, 3], &[1, 3]), MemoryOrder::ColumnMajor);
    }

    #[test]
    fn test_ambiguous_layouts_are_row_major() {
        // at most one axis longer than 1: both C and F contiguous
        assert_eq!(MemoryOrder::ColumnMajor.classify_dense(&[5]), MemoryOrder::RowMajor);
        assert_eq!(MemoryOrder::ColumnMajor.classify_dense(&[1, 7]), MemoryOrder::RowMajor);
        assert_eq!(MemoryOrder::ColumnMajor.classify_dense(&[7, 1, 1]), MemoryOrder::RowMajor);
        assert_eq!(MemoryOrder::ColumnMajor.classify_dense(&[]), MemoryOrder::RowMajor);
        assert_eq!(MemoryOrder::ColumnMajor.classify_dense(&[0, 4]), MemoryOrder::RowMajor);
        assert_eq!(MemoryOrder::ColumnMajor.classify_dense(&[2, 2]), MemoryOrder::ColumnMajor);
    }

    #[test]
    fn test_non_contiguous_is_row_major() {
        // every other column of a 3x6 row-major array
        assert!(!is_c_contiguous(&[3, 3], &[6, 2]));
        assert!(!is_f_contiguous(&[3, 3], &[6, 2]));
        assert_eq!(MemoryOrder::classify(&[3, 3], &[6, 2]), MemoryOrder::RowMajor);
    }

    #[test]
    fn test_unit_axes_ignore_stride() {
        assert!(is_c_contiguous(&[1, 4], &[99, 1]));
        assert!(is_f_contiguous(&[4, 1], &[1, -3]));
    }
}
