//! Dense n-dimensional arrays and the dtype-erased buffer behind them
//
// An `NdArray` is a shape plus one contiguous row-major `Buffer`. The buffer
// is a tagged variant over the closed dtype set, which lets kernel dispatch
// branch on a runtime tag while the kernels themselves run on plain typed
// slices recovered through the `Element` trait. Arrays are immutable from a
// kernel's perspective; kernels that need to mutate copy into a private
// working buffer first.

use crate::dtype::DType;
use crate::error::Error;

/// Owned, contiguous storage for one array, tagged by element type.
#[derive(Debug, Clone, PartialEq)]
pub enum Buffer {
    Bool(Vec<bool>),
    I32(Vec<i32>),
    I64(Vec<i64>),
    F32(Vec<f32>),
    F64(Vec<f64>),
}

impl Buffer {
    #[inline]
    #[must_use]
    pub const fn dtype(&self) -> DType {
        match self {
            Self::Bool(_) => DType::Bool,
            Self::I32(_) => DType::Int32,
            Self::I64(_) => DType::Int64,
            Self::F32(_) => DType::Float32,
            Self::F64(_) => DType::Float64,
        }
    }

    /// Number of elements.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Bool(v) => v.len(),
            Self::I32(v) => v.len(),
            Self::I64(v) => v.len(),
            Self::F32(v) => v.len(),
            Self::F64(v) => v.len(),
        }
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One value of any supported dtype, as returned by full reductions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scalar {
    Bool(bool),
    I32(i32),
    I64(i64),
    F32(f32),
    F64(f64),
}

impl Scalar {
    #[inline]
    #[must_use]
    pub const fn dtype(self) -> DType {
        match self {
            Self::Bool(_) => DType::Bool,
            Self::I32(_) => DType::Int32,
            Self::I64(_) => DType::Int64,
            Self::F32(_) => DType::Float32,
            Self::F64(_) => DType::Float64,
        }
    }

    #[inline]
    #[must_use]
    pub const fn as_bool(self) -> Option<bool> {
        match self {
            Self::Bool(x) => Some(x),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub const fn as_i64(self) -> Option<i64> {
        match self {
            Self::I64(x) => Some(x),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub const fn as_f32(self) -> Option<f32> {
        match self {
            Self::F32(x) => Some(x),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub const fn as_f64(self) -> Option<f64> {
        match self {
            Self::F64(x) => Some(x),
            _ => None,
        }
    }
}

/// Bridge between concrete element types and the tagged `Buffer`/`Scalar`.
///
/// Kernel specializations are generic over `Element` and are instantiated
/// once per declared signature; this trait is what lets those instantiations
/// move typed data in and out of dtype-erased arrays.
pub trait Element: Copy + PartialOrd + 'static {
    const DTYPE: DType;

    fn into_buffer(data: Vec<Self>) -> Buffer;

    /// Typed view of a buffer; `None` when the tag does not match.
    fn slice(buf: &Buffer) -> Option<&[Self]>;

    fn scalar(self) -> Scalar;
}

macro_rules! impl_element {
    ($t:ty, $dtype:ident, $arm:ident) => {
        impl Element for $t {
            const DTYPE: DType = DType::$dtype;

            #[inline]
            fn into_buffer(data: Vec<Self>) -> Buffer {
                Buffer::$arm(data)
            }

            #[inline]
            fn slice(buf: &Buffer) -> Option<&[Self]> {
                match buf {
                    Buffer::$arm(v) => Some(v),
                    _ => None,
                }
            }

            #[inline]
            fn scalar(self) -> Scalar {
                Scalar::$arm(self)
            }
        }
    };
}

impl_element!(bool, Bool, Bool);
impl_element!(i32, Int32, I32);
impl_element!(i64, Int64, I64);
impl_element!(f32, Float32, F32);
impl_element!(f64, Float64, F64);

/// Dense n-dimensional array: a shape and one row-major contiguous buffer.
///
/// The shape is an ordered sequence of non-negative axis sizes; an empty
/// shape is a 0-dimensional scalar array holding exactly one element. The
/// flattened view is simply the underlying buffer, since storage is always
/// row-major contiguous.
#[derive(Debug, Clone, PartialEq)]
pub struct NdArray {
    shape: Vec<usize>,
    data: Buffer,
}

impl NdArray {
    /// Build an array from a shape and its row-major elements.
    ///
    /// Fails with [`Error::ShapeMismatch`] when the shape product does not
    /// equal the element count. The product of an empty shape is 1.
    pub fn from_vec<T: Element>(shape: Vec<usize>, data: Vec<T>) -> Result<Self, Error> {
        let expected: usize = shape.iter().product();
        if expected != data.len() {
            return Err(Error::ShapeMismatch {
                expected,
                found: data.len(),
            });
        }
        Ok(Self {
            shape,
            data: T::into_buffer(data),
        })
    }

    /// 0-dimensional array holding one value.
    #[must_use]
    pub fn from_scalar<T: Element>(value: T) -> Self {
        Self {
            shape: Vec::new(),
            data: T::into_buffer(vec![value]),
        }
    }

    #[inline]
    #[must_use]
    pub const fn dtype(&self) -> DType {
        self.data.dtype()
    }

    #[inline]
    #[must_use]
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    #[inline]
    #[must_use]
    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    /// Total number of elements.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    #[must_use]
    pub const fn buffer(&self) -> &Buffer {
        &self.data
    }

    /// Typed row-major flattened view; `None` when `T` is not the dtype.
    #[inline]
    #[must_use]
    pub fn flat<T: Element>(&self) -> Option<&[T]> {
        T::slice(&self.data)
    }
}
