//! Label-grouped reductions
//
// `group_reduce` partitions a values array by a same-length integer label
// array and reduces each partition independently: one growable buffer per
// group, filled in order of appearance, then one flat-kernel call per
// group. Negative labels mean "unassigned" and are silently excluded from
// every group. The number of groups comes from the caller, never from the
// label values; a label at or above `num_groups` is a caller contract
// violation and panics on the group-buffer index.
//
// Summation order inside a group is sequential for the f32 aggregates and
// 4-lane chunked for the f64 ones (the same flat kernels the axis
// dispatcher binds), which affects bit-exact reproducibility only.

use std::collections::HashMap;
use std::sync::{Mutex, OnceLock};

use nanook_core::{DType, Element, Error, NdArray};

use crate::statistical::{sums, varstd};

/// Integer label element: maps to a group index, or `None` for negative
/// "unassigned" labels.
pub trait GroupLabel: Element {
    fn group_index(self) -> Option<usize>;
}

impl GroupLabel for i32 {
    #[inline]
    fn group_index(self) -> Option<usize> {
        usize::try_from(self).ok()
    }
}

impl GroupLabel for i64 {
    #[inline]
    fn group_index(self) -> Option<usize> {
        usize::try_from(self).ok()
    }
}

/// One declared (values dtype, labels dtype, output dtype) instantiation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupSignature {
    pub values: DType,
    pub labels: DType,
    pub output: DType,
}

/// A flat aggregate tied to one concrete (values, labels, output) triple.
pub(crate) trait FlatGroupReduce {
    type Val: Element;
    type Lab: GroupLabel;
    type Out: Element;
    fn apply(group: &[Self::Val]) -> Self::Out;
}

macro_rules! group_op {
    ($op:ident, $val:ty, $lab:ty, $out:ty, $func:path) => {
        pub(crate) struct $op;

        impl FlatGroupReduce for $op {
            type Val = $val;
            type Lab = $lab;
            type Out = $out;

            #[inline(always)]
            fn apply(group: &[$val]) -> $out {
                $func(group)
            }
        }
    };
}

group_op!(GroupNanmeanF64I64, f64, i64, f64, sums::nanmean_f64);
group_op!(GroupNanmeanF64I32, f64, i32, f64, sums::nanmean_f64);
group_op!(GroupNanmeanF32I64, f32, i64, f32, sums::nanmean);
group_op!(GroupNanmeanF32I32, f32, i32, f32, sums::nanmean);
group_op!(GroupNansumF64I64, f64, i64, f64, sums::nansum_f64);
group_op!(GroupNansumF64I32, f64, i32, f64, sums::nansum_f64);
group_op!(GroupNansumF32I64, f32, i64, f32, sums::nansum);
group_op!(GroupNansumF32I32, f32, i32, f32, sums::nansum);
group_op!(GroupNanvarF64I64, f64, i64, f64, varstd::nanvar_f64);
group_op!(GroupNanvarF64I32, f64, i32, f64, varstd::nanvar_f64);
group_op!(GroupNanvarF32I64, f32, i64, f32, varstd::nanvar);
group_op!(GroupNanvarF32I32, f32, i32, f32, varstd::nanvar);
group_op!(GroupNanstdF64I64, f64, i64, f64, varstd::nanstd_f64);
group_op!(GroupNanstdF64I32, f64, i32, f64, varstd::nanstd_f64);
group_op!(GroupNanstdF32I64, f32, i64, f32, varstd::nanstd);
group_op!(GroupNanstdF32I32, f32, i32, f32, varstd::nanstd);

type GroupFn = fn(&NdArray, &NdArray, usize) -> NdArray;

struct GroupVariant {
    sig: GroupSignature,
    compile: fn() -> GroupFn,
}

fn compile_group_variant<K: FlatGroupReduce>() -> GroupFn {
    group_reduce_erased::<K>
}

fn group_reduce_erased<K: FlatGroupReduce>(
    values: &NdArray,
    labels: &NdArray,
    num_groups: usize,
) -> NdArray {
    let vals = values
        .flat::<K::Val>()
        .expect("values dtype already checked against the signature table");
    let labs = labels
        .flat::<K::Lab>()
        .expect("labels dtype already checked against the signature table");
    let mut groups: Vec<Vec<K::Val>> = vec![Vec::new(); num_groups];
    for (&v, &l) in vals.iter().zip(labs) {
        if let Some(g) = l.group_index() {
            groups[g].push(v);
        }
    }
    let mut out: Vec<K::Out> = Vec::with_capacity(num_groups);
    for group in &groups {
        out.push(K::apply(group));
    }
    NdArray::from_vec(vec![num_groups], out).expect("one output slot per group")
}

type GroupCacheKey = (&'static str, DType, DType);

/// Process-wide specialization cache for grouped kernels, keyed by
/// (kernel, values dtype, labels dtype). Same lifecycle as the reduce
/// cache: empty at start, populated on first use, never evicted.
static GROUP_CACHE: OnceLock<Mutex<HashMap<GroupCacheKey, GroupFn>>> = OnceLock::new();

/// A dtype-dispatched grouped aggregation.
pub struct GroupReduceKernel {
    name: &'static str,
    variants: &'static [GroupVariant],
}

impl GroupReduceKernel {
    #[inline]
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The declared signature table, in declaration order.
    pub fn signatures(&self) -> impl Iterator<Item = GroupSignature> + '_ {
        self.variants.iter().map(|v| v.sig)
    }

    fn specialize(&self, values: DType, labels: DType) -> Result<GroupFn, Error> {
        let variant = self
            .variants
            .iter()
            .find(|v| v.sig.values == values && v.sig.labels == labels)
            .ok_or_else(|| {
                // Report whichever dtype has no declared pairing at all
                let found = if self.variants.iter().any(|v| v.sig.values == values) {
                    labels
                } else {
                    values
                };
                Error::TypeMismatch {
                    kernel: self.name,
                    found,
                }
            })?;
        let cache = GROUP_CACHE.get_or_init(|| Mutex::new(HashMap::new()));
        let mut map = cache.lock().expect("group kernel cache lock poisoned");
        Ok(*map
            .entry((self.name, values, labels))
            .or_insert_with(variant.compile))
    }

    /// Aggregate `values` per distinct non-negative label.
    ///
    /// Both inputs are taken in their row-major flattened view and must
    /// hold the same number of elements ([`Error::ShapeMismatch`]
    /// otherwise). The output has shape `[num_groups]`; a group no value
    /// maps to yields whatever the aggregate returns for empty input (NaN
    /// for mean/var/std, 0 for sum). Labels in `[0, num_groups)` are the
    /// caller's responsibility; larger labels panic.
    pub fn group_reduce(
        &self,
        values: &NdArray,
        labels: &NdArray,
        num_groups: usize,
    ) -> Result<NdArray, Error> {
        if values.len() != labels.len() {
            return Err(Error::ShapeMismatch {
                expected: values.len(),
                found: labels.len(),
            });
        }
        let func = self.specialize(values.dtype(), labels.dtype())?;
        Ok(func(values, labels, num_groups))
    }
}

macro_rules! groupndreduce {
    ($(#[$meta:meta])* $static_name:ident, $name:literal,
     $f64i64:ty, $f64i32:ty, $f32i64:ty, $f32i32:ty) => {
        $(#[$meta])*
        pub static $static_name: GroupReduceKernel = GroupReduceKernel {
            name: $name,
            variants: &[
                GroupVariant {
                    sig: GroupSignature {
                        values: DType::Float64,
                        labels: DType::Int64,
                        output: DType::Float64,
                    },
                    compile: compile_group_variant::<$f64i64>,
                },
                GroupVariant {
                    sig: GroupSignature {
                        values: DType::Float64,
                        labels: DType::Int32,
                        output: DType::Float64,
                    },
                    compile: compile_group_variant::<$f64i32>,
                },
                GroupVariant {
                    sig: GroupSignature {
                        values: DType::Float32,
                        labels: DType::Int64,
                        output: DType::Float32,
                    },
                    compile: compile_group_variant::<$f32i64>,
                },
                GroupVariant {
                    sig: GroupSignature {
                        values: DType::Float32,
                        labels: DType::Int32,
                        output: DType::Float32,
                    },
                    compile: compile_group_variant::<$f32i32>,
                },
            ],
        };
    };
}

groupndreduce!(
    /// Per-group mean of non-NaN values; NaN for groups with no data.
    GROUP_NANMEAN, "group_nanmean",
    GroupNanmeanF64I64, GroupNanmeanF64I32, GroupNanmeanF32I64, GroupNanmeanF32I32
);
groupndreduce!(
    /// Per-group sum of non-NaN values; 0 for groups with no data.
    GROUP_NANSUM, "group_nansum",
    GroupNansumF64I64, GroupNansumF64I32, GroupNansumF32I64, GroupNansumF32I32
);
groupndreduce!(
    /// Per-group population variance (ddof = 0); NaN for groups with no data.
    GROUP_NANVAR, "group_nanvar",
    GroupNanvarF64I64, GroupNanvarF64I32, GroupNanvarF32I64, GroupNanvarF32I32
);
groupndreduce!(
    /// Per-group population standard deviation (ddof = 0); NaN for groups
    /// with no data.
    GROUP_NANSTD, "group_nanstd",
    GroupNanstdF64I64, GroupNanstdF64I32, GroupNanstdF32I64, GroupNanstdF32I32
);

macro_rules! group_fns {
    ($fn_name:ident, $kernel:ident) => {
        #[doc = concat!("Convenience wrapper around [`", stringify!($kernel), "`].")]
        pub fn $fn_name(
            values: &NdArray,
            labels: &NdArray,
            num_groups: usize,
        ) -> Result<NdArray, Error> {
            $kernel.group_reduce(values, labels, num_groups)
        }
    };
}

group_fns!(group_nanmean, GROUP_NANMEAN);
group_fns!(group_nansum, GROUP_NANSUM);
group_fns!(group_nanvar, GROUP_NANVAR);
group_fns!(group_nanstd, GROUP_NANSTD);
