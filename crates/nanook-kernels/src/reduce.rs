//! Axis-reduction dispatch and kernel specialization
//
// A `ReduceKernel` promotes one flat-slice reduction into an n-dimensional,
// axis-parameterized operation. Each kernel declares a fixed signature
// table (input dtype, output dtype); the first call with a given input
// dtype instantiates the matching specialization and stores it in a
// process-wide cache, and every later call with that dtype reuses it. The
// signature table is the whole of a kernel's type surface: calling with an
// undeclared dtype is a `TypeMismatch` error, never a silent cast.

use std::collections::HashMap;
use std::sync::{Mutex, OnceLock};

use nanook_core::{DType, Element, Error, NdArray, Scalar};

use crate::statistical::{logic, median as medians, minmax, sums, varstd};

/// One declared concrete instantiation of a kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signature {
    pub input: DType,
    pub output: DType,
}

/// A flat-slice reduction tied to one concrete (input, output) dtype pair.
///
/// Implementations are zero-sized markers; the dispatcher instantiates its
/// erased wrappers per marker, which is what "compiling a specialization"
/// means here: monomorphization at build time, selection at run time.
pub(crate) trait FlatReduce {
    type In: Element;
    type Out: Element;
    fn apply(a: &[Self::In]) -> Self::Out;
}

macro_rules! flat_op {
    ($op:ident, $in:ty, $out:ty, $func:path) => {
        pub(crate) struct $op;

        impl FlatReduce for $op {
            type In = $in;
            type Out = $out;

            #[inline(always)]
            fn apply(a: &[$in]) -> $out {
                $func(a)
            }
        }
    };
}

flat_op!(AllnanF32, f32, bool, logic::allnan);
flat_op!(AllnanF64, f64, bool, logic::allnan);
flat_op!(AnynanF32, f32, bool, logic::anynan);
flat_op!(AnynanF64, f64, bool, logic::anynan);
flat_op!(CountF32, f32, i64, logic::count);
flat_op!(CountF64, f64, i64, logic::count_f64);
flat_op!(NansumF32, f32, f32, sums::nansum);
flat_op!(NansumF64, f64, f64, sums::nansum_f64);
flat_op!(NanmeanF32, f32, f32, sums::nanmean);
flat_op!(NanmeanF64, f64, f64, sums::nanmean_f64);
flat_op!(NanvarF32, f32, f32, varstd::nanvar);
flat_op!(NanvarF64, f64, f64, varstd::nanvar_f64);
flat_op!(NanstdF32, f32, f32, varstd::nanstd);
flat_op!(NanstdF64, f64, f64, varstd::nanstd_f64);
flat_op!(NanminF32, f32, f32, minmax::nanmin);
flat_op!(NanminF64, f64, f64, minmax::nanmin);
flat_op!(NanmaxF32, f32, f32, minmax::nanmax);
flat_op!(NanmaxF64, f64, f64, minmax::nanmax);
flat_op!(NanargminF32, f32, i64, minmax::nanargmin);
flat_op!(NanargminF64, f64, i64, minmax::nanargmin);
flat_op!(NanargmaxF32, f32, i64, minmax::nanargmax);
flat_op!(NanargmaxF64, f64, i64, minmax::nanargmax);
flat_op!(MedianF32, f32, f32, medians::median);
flat_op!(MedianF64, f64, f64, medians::median);
flat_op!(NanmedianF32, f32, f32, medians::nanmedian);
flat_op!(NanmedianF64, f64, f64, medians::nanmedian);

/// One ready-to-call specialization: the erased whole-array and per-axis
/// entry points for a single input dtype.
#[derive(Clone, Copy)]
struct Specialized {
    all: fn(&NdArray) -> Scalar,
    axes: fn(&NdArray, &[usize]) -> NdArray,
}

struct Variant {
    sig: Signature,
    compile: fn() -> Specialized,
}

const fn output_dtype<K: FlatReduce>() -> DType {
    <K::Out as Element>::DTYPE
}

fn compile_variant<K: FlatReduce>() -> Specialized {
    Specialized {
        all: reduce_all_erased::<K>,
        axes: reduce_axes_erased::<K>,
    }
}

fn reduce_all_erased<K: FlatReduce>(a: &NdArray) -> Scalar {
    let data = a
        .flat::<K::In>()
        .expect("dtype already checked against the signature table");
    K::apply(data).scalar()
}

/// Row-major strides, in elements, for a shape.
fn row_major_strides(dims: &[usize]) -> Vec<usize> {
    let mut strides = vec![1usize; dims.len()];
    for d in (0..dims.len().saturating_sub(1)).rev() {
        strides[d] = strides[d + 1] * dims[d + 1];
    }
    strides
}

/// Buffer offset of the `idx`-th row-major combination over `dims`.
#[inline]
fn offset_at(mut idx: usize, dims: &[usize], strides: &[usize]) -> usize {
    let mut off = 0usize;
    for d in (0..dims.len()).rev() {
        off += (idx % dims[d]) * strides[d];
        idx /= dims[d];
    }
    off
}

/// Apply the kernel once per combination of kept-axis indices.
///
/// For every row-major combination of indices along the non-reduced axes,
/// the elements along the reduced axes are gathered in row-major order into
/// a scratch buffer and handed to the flat kernel; results assemble into an
/// array with the reduced axes removed (0-dimensional when every axis is
/// reduced). `axes` must already be validated, sorted, and deduplicated.
fn reduce_axes_erased<K: FlatReduce>(a: &NdArray, axes: &[usize]) -> NdArray {
    let data = a
        .flat::<K::In>()
        .expect("dtype already checked against the signature table");
    let dims = a.shape();
    let strides = row_major_strides(dims);

    let mut is_reduced = vec![false; dims.len()];
    for &ax in axes {
        is_reduced[ax] = true;
    }
    let mut keep_dims = Vec::new();
    let mut keep_strides = Vec::new();
    let mut red_dims = Vec::new();
    let mut red_strides = Vec::new();
    for (d, (&sz, &st)) in dims.iter().zip(&strides).enumerate() {
        if is_reduced[d] {
            red_dims.push(sz);
            red_strides.push(st);
        } else {
            keep_dims.push(sz);
            keep_strides.push(st);
        }
    }

    let out_len: usize = keep_dims.iter().product();
    let red_len: usize = red_dims.iter().product();
    let mut out: Vec<K::Out> = Vec::with_capacity(out_len);
    let mut scratch: Vec<K::In> = Vec::with_capacity(red_len);
    for oi in 0..out_len {
        let base = offset_at(oi, &keep_dims, &keep_strides);
        scratch.clear();
        for ri in 0..red_len {
            scratch.push(data[base + offset_at(ri, &red_dims, &red_strides)]);
        }
        out.push(K::apply(&scratch));
    }
    NdArray::from_vec(keep_dims, out).expect("output length equals the kept-shape product")
}

type ReduceCacheKey = (&'static str, DType);

/// Process-wide specialization cache.
///
/// Created empty at process start, populated on first use of each (kernel,
/// dtype) pair, never evicted; the kernel set is fixed and the dtype space
/// is small. The mutex makes concurrent first-use population idempotent
/// even though this library starts no threads of its own.
static REDUCE_CACHE: OnceLock<Mutex<HashMap<ReduceCacheKey, Specialized>>> = OnceLock::new();

/// An axis-generalized, dtype-dispatched reduction.
///
/// The statics below ([`NANSUM`], [`NANMEAN`], ...) are the kernel set;
/// each carries its declared signature table. Free functions like
/// [`nansum`] / [`nansum_axes`] wrap them for the common case.
pub struct ReduceKernel {
    name: &'static str,
    variants: &'static [Variant],
}

impl ReduceKernel {
    #[inline]
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The declared signature table, in declaration order.
    pub fn signatures(&self) -> impl Iterator<Item = Signature> + '_ {
        self.variants.iter().map(|v| v.sig)
    }

    fn specialize(&self, dtype: DType) -> Result<Specialized, Error> {
        let variant = self
            .variants
            .iter()
            .find(|v| v.sig.input == dtype)
            .ok_or(Error::TypeMismatch {
                kernel: self.name,
                found: dtype,
            })?;
        let cache = REDUCE_CACHE.get_or_init(|| Mutex::new(HashMap::new()));
        let mut map = cache.lock().expect("kernel cache lock poisoned");
        Ok(*map
            .entry((self.name, dtype))
            .or_insert_with(variant.compile))
    }

    /// Reduce the whole array (row-major flattened view) to one scalar.
    pub fn reduce_all(&self, a: &NdArray) -> Result<Scalar, Error> {
        let spec = self.specialize(a.dtype())?;
        Ok((spec.all)(a))
    }

    /// Reduce one or more axes; the output drops the reduced axes.
    ///
    /// Axes outside `[0, ndim)` fail with [`Error::IndexOutOfRange`].
    /// Duplicate axes are collapsed. Reducing every axis yields a
    /// 0-dimensional array; an empty `axes` slice applies the kernel to
    /// each element individually.
    pub fn reduce_axes(&self, a: &NdArray, axes: &[usize]) -> Result<NdArray, Error> {
        let ndim = a.ndim();
        for &ax in axes {
            if ax >= ndim {
                return Err(Error::IndexOutOfRange { axis: ax, ndim });
            }
        }
        let mut norm = axes.to_vec();
        norm.sort_unstable();
        norm.dedup();
        let spec = self.specialize(a.dtype())?;
        Ok((spec.axes)(a, &norm))
    }
}

macro_rules! ndreduce {
    ($(#[$meta:meta])* $static_name:ident, $name:literal, $f32_op:ty, $f64_op:ty) => {
        $(#[$meta])*
        pub static $static_name: ReduceKernel = ReduceKernel {
            name: $name,
            variants: &[
                Variant {
                    sig: Signature {
                        input: DType::Float32,
                        output: output_dtype::<$f32_op>(),
                    },
                    compile: compile_variant::<$f32_op>,
                },
                Variant {
                    sig: Signature {
                        input: DType::Float64,
                        output: output_dtype::<$f64_op>(),
                    },
                    compile: compile_variant::<$f64_op>,
                },
            ],
        };
    };
}

ndreduce!(
    /// True iff every element is NaN (vacuously true for empty input).
    ALLNAN, "allnan", AllnanF32, AllnanF64
);
ndreduce!(
    /// True iff at least one element is NaN.
    ANYNAN, "anynan", AnynanF32, AnynanF64
);
ndreduce!(
    /// Number of non-NaN elements, as int64.
    COUNT, "count", CountF32, CountF64
);
ndreduce!(
    /// Sum of non-NaN elements; 0 when none are present.
    NANSUM, "nansum", NansumF32, NansumF64
);
ndreduce!(
    /// Mean of non-NaN elements; NaN when none are present.
    NANMEAN, "nanmean", NanmeanF32, NanmeanF64
);
ndreduce!(
    /// Population variance (ddof = 0) of non-NaN elements; NaN when none.
    NANVAR, "nanvar", NanvarF32, NanvarF64
);
ndreduce!(
    /// Population standard deviation (ddof = 0); NaN when no data present.
    NANSTD, "nanstd", NanstdF32, NanstdF64
);
ndreduce!(
    /// Minimum non-NaN element; NaN when the slice is empty or all NaN.
    NANMIN, "nanmin", NanminF32, NanminF64
);
ndreduce!(
    /// Maximum non-NaN element; NaN when the slice is empty or all NaN.
    NANMAX, "nanmax", NanmaxF32, NanmaxF64
);
ndreduce!(
    /// Flattened-view index of the minimum non-NaN element; -1 sentinel
    /// when the slice is empty or all NaN (tolerant policy; see
    /// `statistical::minmax` for the strict variants).
    NANARGMIN, "nanargmin", NanargminF32, NanargminF64
);
ndreduce!(
    /// Flattened-view index of the maximum non-NaN element; -1 sentinel
    /// when the slice is empty or all NaN (tolerant policy).
    NANARGMAX, "nanargmax", NanargmaxF32, NanargmaxF64
);
ndreduce!(
    /// Exact median assuming NaN-free input (unspecified otherwise).
    MEDIAN, "median", MedianF32, MedianF64
);
ndreduce!(
    /// Exact median of non-NaN elements; NaN when empty or all NaN.
    NANMEDIAN, "nanmedian", NanmedianF32, NanmedianF64
);

macro_rules! reduce_fns {
    ($all:ident, $axes:ident, $kernel:ident) => {
        #[doc = concat!("Whole-array form of the [`", stringify!($kernel), "`] kernel.")]
        pub fn $all(a: &NdArray) -> Result<Scalar, Error> {
            $kernel.reduce_all(a)
        }

        #[doc = concat!("Axis-restricted form of the [`", stringify!($kernel), "`] kernel.")]
        pub fn $axes(a: &NdArray, axes: &[usize]) -> Result<NdArray, Error> {
            $kernel.reduce_axes(a, axes)
        }
    };
}

reduce_fns!(allnan, allnan_axes, ALLNAN);
reduce_fns!(anynan, anynan_axes, ANYNAN);
reduce_fns!(count, count_axes, COUNT);
reduce_fns!(nansum, nansum_axes, NANSUM);
reduce_fns!(nanmean, nanmean_axes, NANMEAN);
reduce_fns!(nanvar, nanvar_axes, NANVAR);
reduce_fns!(nanstd, nanstd_axes, NANSTD);
reduce_fns!(nanmin, nanmin_axes, NANMIN);
reduce_fns!(nanmax, nanmax_axes, NANMAX);
reduce_fns!(nanargmin, nanargmin_axes, NANARGMIN);
reduce_fns!(nanargmax, nanargmax_axes, NANARGMAX);
reduce_fns!(median, median_axes, MEDIAN);
reduce_fns!(nanmedian, nanmedian_axes, NANMEDIAN);
