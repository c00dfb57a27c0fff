use nanook_core::Error;
use nanook_kernels::statistical::{logic, minmax, sums, varstd};

const NAN: f64 = f64::NAN;

fn approx_eq(a: f64, b: f64, eps: f64) {
    assert!((a - b).abs() <= eps, "{} !~= {}", a, b);
}

#[test]
fn test_allnan_anynan() {
    assert!(logic::allnan(&[NAN, NAN]));
    assert!(!logic::allnan(&[NAN, 1.0]));
    assert!(logic::anynan(&[NAN, 1.0]));
    assert!(!logic::anynan(&[1.0, 2.0]));
}

#[test]
fn test_allnan_anynan_empty() {
    // vacuous truth on empty input
    let empty: &[f64] = &[];
    assert!(logic::allnan(empty));
    assert!(!logic::anynan(empty));
}

#[test]
fn test_count() {
    assert_eq!(logic::count(&[NAN, NAN, 1.0]), 1);
    assert_eq!(logic::count::<f64>(&[]), 0);
    assert_eq!(logic::count(&[1.0f32, 2.0, 3.0]), 3);
}

#[test]
fn test_nansum() {
    assert_eq!(sums::nansum(&[1.0, 2.0, NAN]), 3.0);
    assert_eq!(sums::nansum(&[NAN, NAN]), 0.0);
    assert_eq!(sums::nansum::<f64>(&[]), 0.0);
}

#[test]
fn test_nanmean() {
    assert_eq!(sums::nanmean(&[1.0, 2.0, NAN]), 1.5);
    assert!(sums::nanmean(&[NAN, NAN]).is_nan());
    assert!(sums::nanmean::<f64>(&[]).is_nan());
}

#[test]
fn test_nan_free_inputs_match_plain_reductions() {
    let a: Vec<f64> = (1..=9).map(f64::from).collect();
    assert_eq!(sums::nansum(&a), a.iter().sum::<f64>());
    assert_eq!(sums::nanmean(&a), a.iter().sum::<f64>() / 9.0);
    assert_eq!(logic::count(&a), 9);
}

#[test]
fn test_nanvar_nanstd() {
    // present values 1, 2: mean 1.5, squared deviations 0.25 each
    assert_eq!(varstd::nanvar(&[1.0, 2.0, NAN]), 0.25);
    assert_eq!(varstd::nanstd(&[1.0, 2.0, NAN]), 0.5);
    // ddof is fixed at 0, so a single present value gives variance 0
    assert_eq!(varstd::nanvar(&[5.0, NAN]), 0.0);
    assert!(varstd::nanvar(&[NAN, NAN]).is_nan());
    assert!(varstd::nanstd::<f64>(&[]).is_nan());
}

#[test]
fn test_nanvar_reference() {
    let a = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
    approx_eq(varstd::nanvar(&a), 4.0, 1e-12);
    approx_eq(varstd::nanstd(&a), 2.0, 1e-12);
}

#[test]
fn test_nanmin_nanmax_tolerant() {
    assert_eq!(minmax::nanmax(&[1.0, 3.0, NAN, 2.0]), 3.0);
    assert_eq!(minmax::nanmin(&[1.0, 3.0, NAN, 2.0]), 1.0);
    assert!(minmax::nanmax(&[NAN, NAN]).is_nan());
    assert!(minmax::nanmin::<f64>(&[]).is_nan());
    // -inf still counts as found data
    assert_eq!(
        minmax::nanmax(&[f64::NEG_INFINITY, f64::NEG_INFINITY]),
        f64::NEG_INFINITY
    );
}

#[test]
fn test_nanargmax_nanargmin_tolerant() {
    assert_eq!(minmax::nanargmax(&[1.0, 3.0, NAN, 2.0]), 1);
    assert_eq!(minmax::nanargmin(&[1.0, 3.0, NAN, 0.5]), 3);
    // sentinel on all-NaN and empty input
    assert_eq!(minmax::nanargmax(&[NAN, NAN]), -1);
    assert_eq!(minmax::nanargmin::<f64>(&[]), -1);
}

#[test]
fn test_nanargmax_second_pass_resolves_neg_infinity() {
    // nothing beats the unbounded initial extremum, so the second linear
    // pass must find the actual -inf
    assert_eq!(minmax::nanargmax(&[NAN, f64::NEG_INFINITY, NAN]), 1);
    assert_eq!(minmax::nanargmin(&[NAN, f64::INFINITY]), 1);
}

#[test]
fn test_strict_variants() {
    assert_eq!(minmax::nanargmax_strict(&[1.0, 3.0, NAN, 2.0]), Ok(1));
    assert_eq!(minmax::nanmax_strict(&[1.0, 3.0]), Ok(3.0));

    let err = minmax::nanargmax_strict(&[NAN, NAN]).unwrap_err();
    assert_eq!(err, Error::EmptyInput("All-NaN slice encountered"));
    assert_eq!(format!("{err}"), "All-NaN slice encountered");

    let err = minmax::nanmin_strict::<f64>(&[]).unwrap_err();
    assert_eq!(err, Error::EmptyInput("attempt to reduce an empty slice"));
}

#[test]
fn test_f64_chunked_kernels_match_generic() {
    // 13 elements exercises the 4-lane main loop and the scalar tail;
    // integer-valued data keeps every summation order exact
    let mut a: Vec<f64> = (1..=13).map(f64::from).collect();
    a[2] = NAN;
    a[9] = NAN;
    assert_eq!(sums::nansum_f64(&a), sums::nansum(&a));
    assert_eq!(sums::nanmean_f64(&a), sums::nanmean(&a));
    assert_eq!(logic::count_f64(&a), logic::count(&a));
    approx_eq(varstd::nanvar_f64(&a), varstd::nanvar(&a), 1e-12);
    approx_eq(varstd::nanstd_f64(&a), varstd::nanstd(&a), 1e-12);
}

#[test]
fn test_f64_chunked_kernels_match_generic_long_inputs() {
    // every length mod 4 over a few hundred elements, NaNs scattered by a
    // fixed linear-congruential sequence; small integer values keep the
    // chunked and sequential summation orders bit-identical
    for n in [64usize, 127, 254, 509] {
        let mut state = 1u64;
        let a: Vec<f64> = (0..n)
            .map(|_| {
                state = state.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1);
                let r = state >> 33;
                if r % 5 == 0 {
                    NAN
                } else {
                    (r % 32) as f64
                }
            })
            .collect();
        assert_eq!(sums::nansum_f64(&a), sums::nansum(&a));
        assert_eq!(sums::nanmean_f64(&a), sums::nanmean(&a));
        assert_eq!(logic::count_f64(&a), logic::count(&a));
        // squared deviations are not integer-valued, so the chunked
        // accumulation order may shift the last bits
        approx_eq(varstd::nanvar_f64(&a), varstd::nanvar(&a), 1e-9);
        approx_eq(varstd::nanstd_f64(&a), varstd::nanstd(&a), 1e-9);
    }
}

#[test]
fn test_f64_chunked_kernels_all_nan_and_empty() {
    assert_eq!(sums::nansum_f64(&[NAN, NAN, NAN, NAN, NAN]), 0.0);
    assert!(sums::nanmean_f64(&[NAN, NAN, NAN, NAN, NAN]).is_nan());
    assert_eq!(logic::count_f64(&[]), 0);
    assert!(varstd::nanvar_f64(&[]).is_nan());
}

#[test]
fn test_f32_kernels() {
    let a = [1.0f32, f32::NAN, 3.0];
    assert_eq!(sums::nansum(&a), 4.0);
    assert_eq!(sums::nanmean(&a), 2.0);
    assert_eq!(minmax::nanargmax(&a), 2);
    assert!(logic::anynan(&a));
}
