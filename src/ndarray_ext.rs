//! [`ArraySlice`] for `ndarray` arrays.
//!
//! The memory order is classified from the array's strides. Contiguous
//! arrays are written straight from their backing memory; anything else
//! (strided views, negative strides) is gathered in logical row-major order,
//! which is what NumPy does for non-contiguous arrays as well.

use std::borrow::Cow;

use ndarray::{ArrayBase, Data, Dimension};

use crate::dtype::{Element, ElementType};
use crate::layout::MemoryOrder;
use crate::slice::ArraySlice;

impl<A, S, D> ArraySlice for ArrayBase<S, D>
where
    A: Element,
    S: Data<Elem = A>,
    D: Dimension,
{
    fn element_type(&self) -> ElementType {
        A::element_type()
    }

    fn shape(&self) -> &[usize] {
        ArrayBase::shape(self)
    }

    fn memory_order(&self) -> MemoryOrder {
        MemoryOrder::classify(ArrayBase::shape(self), self.strides())
    }

    fn data(&self) -> Cow<'_, [u8]> {
        match ArraySlice::memory_order(self) {
            MemoryOrder::RowMajor => match self.as_slice() {
                Some(values) => Cow::Borrowed(bytemuck::cast_slice(values)),
                None => gather(self.iter()),
            },
            MemoryOrder::ColumnMajor => match self.as_slice_memory_order() {
                Some(values) => Cow::Borrowed(bytemuck::cast_slice(values)),
                None => gather(self.t().iter()),
            },
        }
    }
}

fn gather<'a, A: Element>(values: impl Iterator<Item = &'a A>) -> Cow<'static, [u8]> {
    let owned: Vec<A> = values.copied().collect();
    Cow::Owned(bytemuck::cast_slice(&owned).to_vec())
}
