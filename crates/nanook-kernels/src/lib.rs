//! NaN-aware reduction kernels for nanook (pure Rust, SIMD ready)
//
// Floating-point NaN is treated as missing data throughout: every `nan*`
// kernel skips NaN elements and follows one documented policy for inputs
// with no present data. Flat-slice kernels live under `statistical/`; the
// axis dispatcher in `reduce` promotes them to n-dimensional operations,
// and `grouped` partitions a values array by integer labels and reduces
// each partition.

pub mod grouped;
pub mod reduce;
pub mod select;
pub mod statistical;

pub use grouped::{
    group_nanmean, group_nanstd, group_nansum, group_nanvar, GroupReduceKernel, GroupSignature,
    GROUP_NANMEAN, GROUP_NANSTD, GROUP_NANSUM, GROUP_NANVAR,
};
pub use reduce::{
    allnan, allnan_axes, anynan, anynan_axes, count, count_axes, median, median_axes, nanargmax,
    nanargmax_axes, nanargmin, nanargmin_axes, nanmax, nanmax_axes, nanmean, nanmean_axes,
    nanmedian, nanmedian_axes, nanmin, nanmin_axes, nanstd, nanstd_axes, nansum, nansum_axes,
    nanvar, nanvar_axes, ReduceKernel, Signature, ALLNAN, ANYNAN, COUNT, MEDIAN, NANARGMAX,
    NANARGMIN, NANMAX, NANMEAN, NANMEDIAN, NANMIN, NANSTD, NANSUM, NANVAR,
};
