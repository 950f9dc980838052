//! Element types and their `.npy` type-descriptor tokens.
//!
//! The descriptor string (`'<f8'`, `'|u1'`, ...) is the only type metadata
//! persisted in an `.npy` header, so the mapping below is a closed table that
//! must agree with NumPy's `dtype.str` for every supported kind.

use std::fmt;
use std::str::FromStr;

use half::f16;
use num_complex::Complex;

/// Errors produced when parsing an element type from text
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseDTypeError {
    /// Neither a NumPy type name nor a descriptor token
    #[error("unrecognized element type: '{0}'")]
    Unrecognized(String),

    /// `|` was used for a multi-byte element type
    #[error("byte order '|' is only valid for 1-byte types, not {0}")]
    AmbiguousByteOrder(DType),
}

/// Fixed-width scalar kinds that can be streamed into an `.npy` file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DType {
    /// 8-bit signed integer
    I8,
    /// 16-bit signed integer
    I16,
    /// 32-bit signed integer
    I32,
    /// 64-bit signed integer
    I64,
    /// 8-bit unsigned integer
    U8,
    /// 16-bit unsigned integer
    U16,
    /// 32-bit unsigned integer
    U32,
    /// 64-bit unsigned integer
    U64,
    /// IEEE 754 half precision float
    F16,
    /// IEEE 754 single precision float
    F32,
    /// IEEE 754 double precision float
    F64,
    /// Complex number made of two `f32`
    C64,
    /// Complex number made of two `f64`
    C128,
}

impl DType {
    /// Every supported kind, in NumPy's canonical order
    pub const ALL: [DType; 13] = [
        DType::I8,
        DType::I16,
        DType::I32,
        DType::I64,
        DType::U8,
        DType::U16,
        DType::U32,
        DType::U64,
        DType::F16,
        DType::F32,
        DType::F64,
        DType::C64,
        DType::C128,
    ];

    /// Size in bytes of a single element
    pub fn element_size(self) -> usize {
        match self {
            DType::I8 | DType::U8 => 1,
            DType::I16 | DType::U16 | DType::F16 => 2,
            DType::I32 | DType::U32 | DType::F32 => 4,
            DType::I64 | DType::U64 | DType::F64 | DType::C64 => 8,
            DType::C128 => 16,
        }
    }

    /// NumPy kind character (`i`, `u`, `f` or `c`)
    pub fn kind(self) -> char {
        match self {
            DType::I8 | DType::I16 | DType::I32 | DType::I64 => 'i',
            DType::U8 | DType::U16 | DType::U32 | DType::U64 => 'u',
            DType::F16 | DType::F32 | DType::F64 => 'f',
            DType::C64 | DType::C128 => 'c',
        }
    }

    /// NumPy type name, e.g. `"float64"`
    pub fn numpy_name(self) -> &'static str {
        match self {
            DType::I8 => "int8",
            DType::I16 => "int16",
            DType::I32 => "int32",
            DType::I64 => "int64",
            DType::U8 => "uint8",
            DType::U16 => "uint16",
            DType::U32 => "uint32",
            DType::U64 => "uint64",
            DType::F16 => "float16",
            DType::F32 => "float32",
            DType::F64 => "float64",
            DType::C64 => "complex64",
            DType::C128 => "complex128",
        }
    }

    /// Name of the matching Rust primitive, if there is one
    pub fn rust_name(self) -> Option<&'static str> {
        match self {
            DType::I8 => Some("i8"),
            DType::I16 => Some("i16"),
            DType::I32 => Some("i32"),
            DType::I64 => Some("i64"),
            DType::U8 => Some("u8"),
            DType::U16 => Some("u16"),
            DType::U32 => Some("u32"),
            DType::U64 => Some("u64"),
            DType::F16 => Some("f16"),
            DType::F32 => Some("f32"),
            DType::F64 => Some("f64"),
            DType::C64 | DType::C128 => None,
        }
    }

    fn from_kind_and_size(kind: char, size: usize) -> Option<Self> {
        DType::ALL
            .into_iter()
            .find(|d| d.kind() == kind && d.element_size() == size)
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.numpy_name())
    }
}

impl FromStr for DType {
    type Err = ParseDTypeError;

    /// Parses a NumPy type name (`"uint8"`, `"complex128"`, ...)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        DType::ALL
            .into_iter()
            .find(|d| d.numpy_name() == name || d.rust_name() == Some(name.as_str()))
            .ok_or_else(|| ParseDTypeError::Unrecognized(s.to_string()))
    }
}

/// Byte order of an element's binary encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endian {
    /// Least significant byte first (`<`)
    Little,
    /// Most significant byte first (`>`)
    Big,
    /// Single-byte elements have no byte order (`|`)
    NotApplicable,
}

impl Endian {
    /// Byte order of the host
    pub fn native() -> Self {
        if cfg!(target_endian = "big") {
            Endian::Big
        } else {
            Endian::Little
        }
    }

    /// Descriptor prefix character
    pub fn symbol(self) -> char {
        match self {
            Endian::Little => '<',
            Endian::Big => '>',
            Endian::NotApplicable => '|',
        }
    }
}

/// A scalar kind together with its byte order
///
/// For 1-byte kinds the byte order is always [`Endian::NotApplicable`], so two
/// `u8` element types compare equal no matter which order was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementType {
    dtype: DType,
    endian: Endian,
}

impl ElementType {
    /// Create an element type, normalizing the byte order of 1-byte kinds
    pub fn new(dtype: DType, endian: Endian) -> Self {
        let endian = match (dtype.element_size(), endian) {
            (1, _) => Endian::NotApplicable,
            (_, Endian::NotApplicable) => Endian::native(),
            (_, endian) => endian,
        };
        Self { dtype, endian }
    }

    /// Element type in host byte order
    pub fn native(dtype: DType) -> Self {
        Self::new(dtype, Endian::native())
    }

    /// Scalar kind
    pub fn dtype(&self) -> DType {
        self.dtype
    }

    /// Byte order
    pub fn endian(&self) -> Endian {
        self.endian
    }

    /// Size in bytes of a single element
    pub fn size(&self) -> usize {
        self.dtype.element_size()
    }

    /// Descriptor token as written to the header, e.g. `"<i4"`
    pub fn descr(&self) -> String {
        format!(
            "{}{}{}",
            self.endian.symbol(),
            self.dtype.kind(),
            self.dtype.element_size()
        )
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.descr())
    }
}

impl From<DType> for ElementType {
    fn from(dtype: DType) -> Self {
        ElementType::native(dtype)
    }
}

impl FromStr for ElementType {
    type Err = ParseDTypeError;

    /// Parses a descriptor token (`"<f8"`, `"|u1"`, `">c16"`) or a NumPy type
    /// name, which is taken in host byte order.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();
        let unrecognized = || ParseDTypeError::Unrecognized(s.to_string());

        let endian = match token.chars().next() {
            Some('<') => Endian::Little,
            Some('>') => Endian::Big,
            Some('|') => Endian::NotApplicable,
            Some('=') => Endian::native(),
            _ => return token.parse::<DType>().map(ElementType::native),
        };

        let mut rest = token[1..].chars();
        let kind = rest.next().ok_or_else(unrecognized)?;
        let size: usize = rest.as_str().parse().map_err(|_| unrecognized())?;
        let dtype = DType::from_kind_and_size(kind, size).ok_or_else(unrecognized)?;

        if endian == Endian::NotApplicable && size > 1 {
            return Err(ParseDTypeError::AmbiguousByteOrder(dtype));
        }
        Ok(ElementType::new(dtype, endian))
    }
}

/// Rust scalar types that map onto a [`DType`]
///
/// Values are always encoded in host byte order.
pub trait Element: bytemuck::Pod {
    /// The scalar kind this type is stored as
    const DTYPE: DType;

    /// Element type of this Rust type in host byte order
    fn element_type() -> ElementType {
        ElementType::native(Self::DTYPE)
    }
}

macro_rules! impl_element {
    ($($ty:ty => $dtype:ident),* $(,)?) => {
        $(
            impl Element for $ty {
                const DTYPE: DType = DType::$dtype;
            }
        )*
    };
}

impl_element! {
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    f16 => F16,
    f32 => F32,
    f64 => F64,
    Complex<f32> => C64,
    Complex<f64> => C128,
}
