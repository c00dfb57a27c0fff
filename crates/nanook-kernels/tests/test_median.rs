use nanook_kernels::select::{compact_nans, median_inplace, select_kth};
use nanook_kernels::statistical::median::{median, nanmedian};
use nanook_kernels::statistical::minmax::{nanmax, nanmin};

const NAN: f64 = f64::NAN;

/// Reference median: full sort, average of the middle two for even length.
fn sorted_median(a: &[f64]) -> f64 {
    if a.is_empty() {
        return NAN;
    }
    let mut buf = a.to_vec();
    buf.sort_by(f64::total_cmp);
    let k = buf.len() >> 1;
    if buf.len() & 1 == 1 {
        buf[k]
    } else {
        (buf[k - 1] + buf[k]) / 2.0
    }
}

#[test]
fn test_median_odd_even() {
    assert_eq!(median(&[3.0, 1.0, 2.0]), 2.0);
    assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), 2.5);
    assert_eq!(median(&[7.0]), 7.0);
    assert_eq!(median(&[1.0, 2.0]), 1.5);
    assert!(median::<f64>(&[]).is_nan());
}

#[test]
fn test_nanmedian() {
    assert_eq!(nanmedian(&[1.0, NAN, 3.0]), 2.0);
    assert!(nanmedian(&[NAN, NAN]).is_nan());
    assert!(nanmedian::<f64>(&[]).is_nan());
    assert_eq!(nanmedian(&[NAN, 5.0, NAN]), 5.0);
}

#[test]
fn test_median_nanmedian_agree_on_nan_free_input() {
    let cases: &[&[f64]] = &[
        &[3.0, 1.0, 2.0],
        &[4.0, 1.0, 3.0, 2.0],
        &[10.0, -3.0, 7.5, 0.0, 2.0, 2.0],
        &[1.0, 1.0, 1.0, 1.0, 1.0],
        &[-2.0, -1.0],
    ];
    for a in cases {
        let m = median(a);
        assert_eq!(m, nanmedian(a), "disagree on {a:?}");
        assert_eq!(m, sorted_median(a), "wrong median for {a:?}");
    }
}

#[test]
fn test_median_tie_heavy_inputs() {
    assert_eq!(median(&[2.0, 2.0, 2.0, 2.0]), 2.0);
    assert_eq!(median(&[1.0, 2.0, 2.0, 3.0]), 2.0);
    assert_eq!(median(&[2.0, 1.0, 2.0, 1.0, 2.0]), 2.0);
    assert_eq!(median(&[5.0, 5.0, 1.0, 5.0]), 5.0);
}

#[test]
fn test_nanmedian_permutation_invariant() {
    // selection must locate the same order statistics whatever the input order
    let perms: &[&[f64]] = &[
        &[5.0, 1.0, NAN, 3.0, 2.0, 4.0],
        &[NAN, 4.0, 3.0, 2.0, 1.0, 5.0],
        &[1.0, 2.0, 3.0, 4.0, 5.0, NAN],
        &[3.0, NAN, 5.0, 2.0, 4.0, 1.0],
    ];
    for a in perms {
        assert_eq!(nanmedian(a), 3.0, "wrong nanmedian for {a:?}");
    }
}

#[test]
fn test_median_bounded_by_extrema() {
    let cases: &[&[f64]] = &[
        &[3.0, 1.0, 2.0],
        &[4.0, 1.0, 3.0, 2.0],
        &[-10.0, 0.0, 10.0, 0.5],
        &[2.0, 2.0, 2.0],
    ];
    for a in cases {
        let m = nanmedian(a);
        assert!(nanmin(a) <= m && m <= nanmax(a), "unbounded median on {a:?}");
    }
}

#[test]
fn test_median_does_not_mutate_input() {
    let a = vec![4.0, 1.0, 3.0, 2.0];
    let before = a.clone();
    let _ = median(&a);
    let _ = nanmedian(&a);
    assert_eq!(a, before);
}

#[test]
fn test_compact_nans() {
    let mut buf = [NAN, 1.0, NAN, 2.0, 3.0, NAN];
    let n = compact_nans(&mut buf);
    assert_eq!(n, 3);
    // retained values all land in the head, order not preserved
    let mut head: Vec<f64> = buf[..n].to_vec();
    head.sort_by(f64::total_cmp);
    assert_eq!(head, vec![1.0, 2.0, 3.0]);
    assert!(buf[n..].iter().all(|x| x.is_nan()));
}

#[test]
fn test_compact_nans_edge_cases() {
    let mut empty: [f64; 0] = [];
    assert_eq!(compact_nans(&mut empty), 0);

    let mut all_nan = [NAN, NAN, NAN];
    assert_eq!(compact_nans(&mut all_nan), 0);

    let mut no_nan = [3.0, 1.0, 2.0];
    assert_eq!(compact_nans(&mut no_nan), 3);
    assert_eq!(no_nan, [3.0, 1.0, 2.0]);
}

#[test]
fn test_select_kth_against_full_sort() {
    let cases: &[&[f64]] = &[
        &[3.0, 1.0, 2.0],
        &[4.0, 1.0, 3.0, 2.0],
        &[9.0, 7.0, 5.0, 3.0, 1.0, 2.0, 4.0, 6.0, 8.0],
        &[1.0, 2.0, 2.0, 2.0, 3.0, 2.0],
        &[0.5],
    ];
    for a in cases {
        let mut sorted = a.to_vec();
        sorted.sort_by(f64::total_cmp);
        for k in 0..a.len() {
            let mut buf = a.to_vec();
            select_kth(&mut buf, k);
            assert_eq!(buf[k], sorted[k], "k={k} on {a:?}");
        }
    }
}

#[test]
fn test_median_inplace_even_rule() {
    // even length: average of buf[k] and the max of the lower partition
    let mut buf = [4.0, 1.0, 3.0, 2.0];
    assert_eq!(median_inplace(&mut buf), 2.5);

    let mut buf = [10.0, 10.0, 1.0, 1.0];
    assert_eq!(median_inplace(&mut buf), 5.5);
}

#[test]
fn test_median_f32() {
    assert_eq!(median(&[3.0f32, 1.0, 2.0]), 2.0);
    assert_eq!(nanmedian(&[1.0f32, f32::NAN, 3.0]), 2.0);
}
