/// Breakpoints used when there is nothing to classify.
pub const DEFAULT_BREAKS: [f64; 2] = [0.0, 1.0];

/// `k + 1` rank-interpolated quantile breakpoints of `values`.
///
/// Non-finite values are discarded and the rest sorted ascending. Breakpoint `i` sits at
/// fractional rank `pos = i * (n - 1) / k`, interpolated linearly between the sorted values
/// at `floor(pos)` and `min(floor(pos) + 1, n - 1)`. The first and last breakpoints are the
/// minimum and maximum. Without values the result is `[0, 1]`. `k == 0` is treated as 1.
pub fn quantiles(values: &[f64], k: usize) -> Vec<f64> {
    let mut sorted = values.iter().copied().filter(|v| v.is_finite()).collect::<Vec<_>>();
    if sorted.is_empty() { return DEFAULT_BREAKS.to_vec() }
    sorted.sort_by(f64::total_cmp);

    let k = k.max(1);
    let n = sorted.len();
    (0..=k)
        .map(|i| {
            let pos = (i * (n - 1)) as f64 / k as f64;
            let lo = pos.floor() as usize;
            let hi = (lo + 1).min(n - 1);
            let w = pos - lo as f64;
            sorted[lo] * (1.0 - w) + sorted[hi] * w
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: &[f64], expected: &[f64]) {
        assert_eq!(actual.len(), expected.len(), "{actual:?} vs {expected:?}");
        for (a, e) in actual.iter().zip(expected) {
            assert!((a - e).abs() < 1e-9, "{actual:?} vs {expected:?}");
        }
    }

    #[test]
    fn three_values_five_classes() {
        // pos = i * 2 / 5 → 0, 0.4, 0.8, 1.2, 1.6, 2
        assert_close(&quantiles(&[100.0, 300.0, 200.0], 5), &[100.0, 140.0, 180.0, 220.0, 260.0, 300.0]);
    }

    #[test]
    fn empty_input_is_default() {
        assert_eq!(quantiles(&[], 5), vec![0.0, 1.0]);
        assert_eq!(quantiles(&[f64::NAN, f64::INFINITY], 5), vec![0.0, 1.0]);
    }

    #[test]
    fn single_value_repeats() {
        assert_eq!(quantiles(&[7.0], 5), vec![7.0; 6]);
    }

    #[test]
    fn endpoints_are_min_and_max_and_non_decreasing() {
        let samples: &[&[f64]] = &[
            &[3.0, -1.0, 2.5, 2.5, 10.0, 0.0, 4.0],
            &[1.0, 2.0],
            &[5.0, 5.0, 5.0, 1.0],
            &[-0.1, 0.2, 1e6, 3.3, 7.7, 9.9, 12.0, 12.0, 15.5, 2.0, 8.0],
        ];
        for values in samples {
            let breaks = quantiles(values, 5);
            assert_eq!(breaks.len(), 6);
            let min = values.iter().copied().fold(f64::INFINITY, f64::min);
            let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            assert_eq!(breaks[0], min);
            assert_eq!(breaks[5], max);
            // interpolating between equal neighbours may land one ulp low
            assert!(breaks.windows(2).all(|w| w[0] <= w[1] + 1e-9 * w[1].abs().max(1.0)), "{breaks:?}");
        }
    }

    #[test]
    fn evenly_spaced_ranks_hit_sample_values() {
        // n - 1 = 10 is divisible by k = 5, so every breakpoint is a sample value.
        let values = (0..11).map(|v| (v * 10) as f64).collect::<Vec<_>>();
        assert_eq!(quantiles(&values, 5), vec![0.0, 20.0, 40.0, 60.0, 80.0, 100.0]);
    }

    #[test]
    fn zero_classes_behaves_like_one() {
        assert_eq!(quantiles(&[4.0, 1.0, 9.0], 0), vec![1.0, 9.0]);
    }
}
